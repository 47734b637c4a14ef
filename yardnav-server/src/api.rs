//! HTTP routes

use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    error_handling::HandleErrorLayer,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower::{ServiceBuilder, limit::GlobalConcurrencyLimitLayer, timeout::TimeoutLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};
use yardnav_core::{
    Coordinate, RoutePlan,
    model::{NetworkStats, Region},
    navigation::{NavigationEvent, NavigationTracker, PositionFix},
    plan_route,
};

use crate::{
    config::HttpConfig,
    error::{ApiError, handle_middleware_error},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>, http: &HttpConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(GlobalConcurrencyLimitLayer::new(http.concurrency_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(
            http.request_timeout_secs,
        )));

    Router::new()
        .route("/health", get(health))
        .route("/yards", get(list_yards))
        .route("/yards/{key}/slots", get(yard_slots))
        .route("/yards/{key}/route", post(route))
        .route("/navigation/{device}/start", post(start_navigation))
        .route("/navigation/{device}/fix", post(navigation_fix))
        .route("/navigation/{device}/stop", post(stop_navigation))
        .layer(middleware)
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "yards": state.catalog().len(),
    }))
}

#[derive(Debug, Serialize)]
pub struct YardSummary {
    pub key: String,
    pub name: String,
    pub default: bool,
    pub initial_region: Option<Region>,
    pub lots: usize,
    pub network: NetworkStats,
}

async fn list_yards(State(state): State<Arc<AppState>>) -> Json<Vec<YardSummary>> {
    let catalog = state.catalog();
    let default_key = &catalog.default_yard().meta.key;

    let yards = catalog
        .iter()
        .map(|yard| YardSummary {
            key: yard.meta.key.clone(),
            name: yard.meta.name.clone(),
            default: &yard.meta.key == default_key,
            initial_region: yard.meta.initial_region,
            lots: yard.slots().len(),
            network: yard.network().stats(),
        })
        .collect();
    Json(yards)
}

#[derive(Debug, Serialize)]
pub struct SlotGroup {
    pub slot_id: String,
    pub lots: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SlotsResponse {
    pub yard: String,
    pub groups: Vec<SlotGroup>,
    /// Lots without a slot group
    pub ungrouped: Vec<String>,
}

async fn yard_slots(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Json<SlotsResponse> {
    let yard = state.catalog().get_or_default(Some(&key));
    let slots = yard.slots();

    let groups = slots
        .slot_groups()
        .into_iter()
        .map(|slot_id| SlotGroup {
            slot_id: slot_id.to_string(),
            lots: slots
                .lots_in_group(slot_id)
                .map(|slot| slot.lot_id.clone())
                .collect(),
        })
        .collect();
    let ungrouped = slots
        .iter()
        .filter(|slot| slot.slot_id.is_none())
        .map(|slot| slot.lot_id.clone())
        .collect();

    Json(SlotsResponse {
        yard: yard.meta.key.clone(),
        groups,
        ungrouped,
    })
}

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub pickup_lot: String,
    pub drop_lot: String,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub yard: String,
    pub distance: String,
    pub eta: String,
    #[serde(flatten)]
    pub plan: RoutePlan,
    pub geojson: Value,
}

async fn route(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    let yard_key = {
        let yard = state.catalog().get_or_default(Some(&key));
        for lot in [&request.pickup_lot, &request.drop_lot] {
            if yard.slot(lot).is_none() {
                warn!(yard = %yard.meta.key, lot = %lot, "Route requested for an unknown lot");
                return Err(ApiError::SelectionInvalid);
            }
        }
        yard.meta.key.clone()
    };

    let planning_state = Arc::clone(&state);
    let planning_key = yard_key.clone();
    let plan = tokio::task::spawn_blocking(move || {
        let yard = planning_state.catalog().get_or_default(Some(&planning_key));
        plan_route(
            yard,
            &request.pickup_lot,
            &request.drop_lot,
            &planning_state.tracker_config().route,
        )
    })
    .await??
    .ok_or(ApiError::RouteNotAvailable)?;

    info!(
        yard = %yard_key,
        distance = %plan.formatted_distance(),
        eta = %plan.formatted_eta(),
        "Route planned"
    );
    Ok(Json(RouteResponse {
        yard: yard_key,
        distance: plan.formatted_distance(),
        eta: plan.formatted_eta(),
        geojson: serde_json::to_value(plan.to_geojson()?)?,
        plan,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    /// Falls back to the default yard
    #[serde(default)]
    pub yard: Option<String>,
    pub position: Coordinate,
    pub drop_lot: String,
}

#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    pub device: String,
    pub active: bool,
    pub cursor: Option<usize>,
    pub current_step: Option<usize>,
    pub events: Vec<NavigationEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<RoutePlan>,
}

impl NavigationResponse {
    fn new(device: String, tracker: Option<&NavigationTracker>, events: Vec<NavigationEvent>) -> Self {
        Self {
            device,
            active: tracker.is_some_and(NavigationTracker::is_active),
            cursor: tracker.and_then(NavigationTracker::cursor),
            current_step: tracker.and_then(|t| t.current_step()).map(|(idx, _)| idx),
            events,
            route: None,
        }
    }
}

async fn start_navigation(
    State(state): State<Arc<AppState>>,
    Path(device): Path<String>,
    Json(request): Json<StartRequest>,
) -> Result<Json<NavigationResponse>, ApiError> {
    if !request.position.is_finite() {
        return Err(ApiError::BadRequest(
            "position must have finite coordinates".to_string(),
        ));
    }

    // Held until the session is set up so fixes cannot interleave with it
    let tracker = state.tracker(&device);
    let guard = Arc::clone(&tracker).lock_owned().await;
    let planning_state = Arc::clone(&state);
    let (guard, events) = tokio::task::spawn_blocking(move || {
        let mut tracker = guard;
        let yard = planning_state
            .catalog()
            .get_or_default(request.yard.as_deref());
        let events = tracker.start(yard, request.position, &request.drop_lot);
        (tracker, events)
    })
    .await?;

    let response = events.map(|events| NavigationResponse {
        route: guard.plan().cloned(),
        ..NavigationResponse::new(device.clone(), Some(&*guard), events)
    });
    drop(guard);
    if !response.as_ref().is_ok_and(|response| response.active) {
        state.release_if_idle(&device, &tracker);
    }
    let response = response?;
    info!(device = %response.device, active = response.active, "Navigation start requested");
    Ok(Json(response))
}

async fn navigation_fix(
    State(state): State<Arc<AppState>>,
    Path(device): Path<String>,
    Json(fix): Json<PositionFix>,
) -> Json<NavigationResponse> {
    let Some(tracker) = state.existing_tracker(&device) else {
        debug!(device = %device, "Fix for a device without a navigation session");
        return Json(NavigationResponse::new(device, None, Vec::new()));
    };

    let mut guard = tracker.lock().await;
    let events = guard.handle_fix(&fix);
    if !events.is_empty() {
        debug!(device = %device, events = events.len(), "Fix produced navigation events");
    }
    let response = NavigationResponse::new(device, Some(&*guard), events);
    drop(guard);
    if !response.active {
        state.release_if_idle(&response.device, &tracker);
    }
    Json(response)
}

async fn stop_navigation(
    State(state): State<Arc<AppState>>,
    Path(device): Path<String>,
) -> Json<NavigationResponse> {
    let Some(tracker) = state.existing_tracker(&device) else {
        return Json(NavigationResponse::new(device, None, Vec::new()));
    };

    let mut guard = tracker.lock().await;
    let events = guard.stop();
    let response = NavigationResponse::new(device, Some(&*guard), events);
    drop(guard);
    state.release_if_idle(&response.device, &tracker);
    Json(response)
}
