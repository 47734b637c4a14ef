//! A yard: its walk network and slot catalog

use geojson::FeatureCollection;
use log::{info, warn};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use super::{
    network::{NetworkConfig, WalkNetwork},
    slots::{Slot, SlotIndex},
};
use crate::{Error, loading::slots::build_slot_index};

/// Map viewport, as handed to the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YardMeta {
    pub key: String,
    pub name: String,
    pub initial_region: Option<Region>,
}

#[derive(Debug, Clone)]
pub struct YardModel {
    pub meta: YardMeta,
    network: WalkNetwork,
    slots: SlotIndex,
}

impl YardModel {
    /// Assemble a yard and snap its slots onto the network
    pub fn new(meta: YardMeta, network: WalkNetwork, mut slots: SlotIndex) -> Self {
        slots.snap_to(&network);
        Self {
            meta,
            network,
            slots,
        }
    }

    /// Build a yard from road and slot GeoJSON collections
    ///
    /// # Errors
    ///
    /// Returns an error if the network configuration is invalid
    pub fn from_geojson(
        meta: YardMeta,
        roads: &FeatureCollection,
        slots: &FeatureCollection,
        config: &NetworkConfig,
    ) -> Result<Self, Error> {
        let network = WalkNetwork::from_roads(roads, config)?;
        let slots = build_slot_index(slots);
        let model = Self::new(meta, network, slots);
        model.report_snapping();
        Ok(model)
    }

    /// Replace the road network wholesale and re-snap every slot
    ///
    /// # Errors
    ///
    /// Returns an error if the network configuration is invalid; the
    /// current network is kept in that case.
    pub fn replace_roads(
        &mut self,
        roads: &FeatureCollection,
        config: &NetworkConfig,
    ) -> Result<(), Error> {
        self.network = WalkNetwork::from_roads(roads, config)?;
        self.slots.snap_to(&self.network);
        info!("Rebuilt walk network for yard {}", self.meta.key);
        self.report_snapping();
        Ok(())
    }

    pub fn network(&self) -> &WalkNetwork {
        &self.network
    }

    pub fn slots(&self) -> &SlotIndex {
        &self.slots
    }

    pub fn slot(&self, lot_id: &str) -> Option<&Slot> {
        self.slots.slot(lot_id)
    }

    /// Network node a lot was snapped to
    pub fn snapped_lot(&self, lot_id: &str) -> Option<NodeIndex> {
        self.slot(lot_id)
            .and_then(|slot| slot.snapped)
            .map(|(node, _)| node)
    }

    #[allow(clippy::cast_precision_loss)]
    fn report_snapping(&self) {
        let snapped: Vec<f64> = self
            .slots
            .iter()
            .filter_map(|slot| slot.snapped.map(|(_, distance)| distance))
            .collect();

        if snapped.len() < self.slots.len() {
            warn!(
                "{} of {} lots in yard {} could not be snapped to the walk network",
                self.slots.len() - snapped.len(),
                self.slots.len(),
                self.meta.key
            );
        }
        if let Some(max) = snapped.iter().copied().reduce(f64::max) {
            let mean = snapped.iter().sum::<f64>() / snapped.len() as f64;
            info!(
                "Snapped {} lots in yard {}: mean offset {mean:.1} m, max {max:.1} m",
                snapped.len(),
                self.meta.key
            );
        }
    }
}
