use log::{debug, info, trace, warn};

use super::{
    ARRIVED_TEXT, ENDED_TEXT, NavigationEvent, PositionFix, TrackerConfig, UNAVAILABLE_TEXT,
    session::NavigationSession,
};
use crate::{
    Coordinate, Error, YardModel,
    geometry::{format_distance, haversine},
    routing::{InstructionStep, RoutePlan, StepKind, plan_route_from},
};

/// Idle/active state machine following a walker along a route
///
/// Fixes must be delivered one at a time, in arrival order. The progress
/// cursor only moves forward: a fix behind it is ignored for progress.
#[derive(Debug, Clone, Default)]
pub struct NavigationTracker {
    config: TrackerConfig,
    session: Option<NavigationSession>,
}

impl NavigationTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Route coordinate index reached so far
    pub fn cursor(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.cursor)
    }

    pub fn current_step(&self) -> Option<(usize, &InstructionStep)> {
        self.session
            .as_ref()
            .map(|s| (s.active_step, &s.plan.steps[s.active_step]))
    }

    pub fn plan(&self) -> Option<&RoutePlan> {
        self.session.as_ref().map(|s| &s.plan)
    }

    pub fn last_fix(&self) -> Option<PositionFix> {
        self.session.as_ref().and_then(|s| s.last_fix)
    }

    /// Plans a route from `position` to `drop_lot` and starts following it.
    /// An active session is torn down first.
    ///
    /// # Errors
    ///
    /// Returns an error only for inconsistent model data; "no route" is
    /// reported as a `RouteUnavailable` event.
    pub fn start(
        &mut self,
        model: &YardModel,
        position: Coordinate,
        drop_lot: &str,
    ) -> Result<Vec<NavigationEvent>, Error> {
        self.teardown();

        match plan_route_from(model, position, drop_lot, &self.config.route)? {
            Some(plan) => Ok(self.start_with_plan(plan)),
            None => {
                warn!("Unable to start navigation to lot {drop_lot}: no route");
                Ok(vec![NavigationEvent::RouteUnavailable {
                    text: UNAVAILABLE_TEXT.to_string(),
                }])
            }
        }
    }

    /// Starts following an already planned route
    pub fn start_with_plan(&mut self, plan: RoutePlan) -> Vec<NavigationEvent> {
        self.teardown();

        if plan.coordinates.len() < 2 || plan.steps.is_empty() {
            warn!("Refusing to navigate a degenerate route");
            return vec![NavigationEvent::RouteUnavailable {
                text: UNAVAILABLE_TEXT.to_string(),
            }];
        }

        info!(
            "Navigation started: {} over {} points, {} steps",
            plan.formatted_distance(),
            plan.coordinates.len(),
            plan.steps.len()
        );
        let text = plan.steps[0].text.clone();
        self.session = Some(NavigationSession::new(plan));

        vec![NavigationEvent::Started { text }]
    }

    /// Consumes one position fix
    pub fn handle_fix(&mut self, fix: &PositionFix) -> Vec<NavigationEvent> {
        let Some(session) = self.session.as_mut() else {
            trace!("Position fix ignored - no active navigation");
            return Vec::new();
        };
        if !fix.position.is_finite() {
            warn!("Ignoring non-finite position fix {:?}", fix.position);
            return Vec::new();
        }

        session.last_fix = Some(*fix);
        let mut events = Vec::new();

        let nearest = session.nearest_ahead(fix.position);
        if let Some(passed) = session.advance_to(nearest) {
            let current = *passed.end();
            debug!(
                "Progress advanced to point {nearest} of {}, step {current}",
                session.plan.coordinates.len()
            );

            if session.plan.steps[current].kind == StepKind::Arrive {
                info!("Destination reached");
                events.push(NavigationEvent::Arrived {
                    text: ARRIVED_TEXT.to_string(),
                });
                self.session = None;
                return events;
            }

            // A fix past the corner still announces the turn it walked through
            if let Some(step_index) = session.pass_steps(passed) {
                let text = session.plan.steps[step_index].text.clone();
                events.push(NavigationEvent::Instruction { step_index, text });
            }
        }

        if let Some((turn_index, turn_at)) = session.upcoming_turn() {
            let distance = haversine(fix.position, turn_at);
            if distance <= self.config.pre_alert_distance_m && session.latch_pre_alert(turn_index)
            {
                let step = &session.plan.steps[turn_index];
                events.push(NavigationEvent::PreAlert {
                    step_index: turn_index,
                    distance_m: distance,
                    text: format!(
                        "In {}, {}",
                        format_distance(distance),
                        lowercase_first(&step.text)
                    ),
                });
            }
        }

        events
    }

    /// Ends the active session. Idle trackers emit nothing.
    pub fn stop(&mut self) -> Vec<NavigationEvent> {
        if self.session.take().is_some() {
            info!("Navigation stopped");
            vec![NavigationEvent::Ended {
                text: ENDED_TEXT.to_string(),
            }]
        } else {
            Vec::new()
        }
    }

    fn teardown(&mut self) {
        if self.session.take().is_some() {
            debug!("Tearing down previous navigation session");
        }
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
