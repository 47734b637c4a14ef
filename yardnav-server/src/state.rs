use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;
use yardnav_core::{
    YardCatalog,
    navigation::{NavigationTracker, TrackerConfig},
};

/// Tracker of one device; fixes and stops for it are serialised by the lock
pub type DeviceTracker = Arc<AsyncMutex<NavigationTracker>>;

pub struct AppState {
    catalog: YardCatalog,
    tracker_config: TrackerConfig,
    devices: Mutex<HashMap<String, DeviceTracker>>,
}

impl AppState {
    pub fn new(catalog: YardCatalog, tracker_config: TrackerConfig) -> Self {
        Self {
            catalog,
            tracker_config,
            devices: Mutex::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &YardCatalog {
        &self.catalog
    }

    pub fn tracker_config(&self) -> &TrackerConfig {
        &self.tracker_config
    }

    /// Tracker of `device`, created idle on first use
    pub fn tracker(&self, device: &str) -> DeviceTracker {
        let mut devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);
        devices
            .entry(device.to_string())
            .or_insert_with(|| {
                debug!(device, "Creating navigation tracker");
                Arc::new(AsyncMutex::new(NavigationTracker::new(self.tracker_config)))
            })
            .clone()
    }

    /// Tracker of `device` if it is currently registered
    pub fn existing_tracker(&self, device: &str) -> Option<DeviceTracker> {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(device)
            .cloned()
    }

    /// Unregisters `tracker` if it is still the one registered for `device`,
    /// is idle and no other request holds it. Handles are only cloned under
    /// the map lock, so the count check cannot race with a new request.
    pub fn release_if_idle(&self, device: &str, tracker: &DeviceTracker) -> bool {
        let mut devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(registered) = devices.get(device) else {
            return false;
        };
        // The map entry plus the caller's handle
        if !Arc::ptr_eq(registered, tracker) || Arc::strong_count(tracker) > 2 {
            return false;
        }
        let idle = tracker.try_lock().is_ok_and(|guard| !guard.is_active());
        if idle {
            devices.remove(device);
            debug!(device, "Released idle navigation tracker");
        }
        idle
    }

    /// Number of devices with a registered tracker
    pub fn device_count(&self) -> usize {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
