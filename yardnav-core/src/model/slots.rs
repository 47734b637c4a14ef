//! Slot catalog: named lots grouped into slots, each with a snapped
//! position on the walk network

use hashbrown::HashMap;
use log::trace;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::Serialize;

use super::network::WalkNetwork;
use crate::{Coordinate, Meters};

/// A pickup/drop location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    /// Unique lot identifier
    pub lot_id: String,
    /// Group this lot belongs to
    pub slot_id: Option<String>,
    /// Point position, or centroid for area geometry
    pub position: Coordinate,
    /// Nearest network node and its distance, once snapped
    #[serde(skip)]
    pub snapped: Option<(NodeIndex, Meters)>,
}

#[derive(Debug, Clone, Default)]
pub struct SlotIndex {
    slots: Vec<Slot>,
    by_lot: HashMap<String, usize>,
}

impl SlotIndex {
    /// Adds a slot. A slot whose `lot_id` is already present is handed back.
    pub fn insert(&mut self, slot: Slot) -> Result<(), Slot> {
        if self.by_lot.contains_key(&slot.lot_id) {
            return Err(slot);
        }
        self.by_lot.insert(slot.lot_id.clone(), self.slots.len());
        self.slots.push(slot);
        Ok(())
    }

    /// Lookup by lot id, ignoring surrounding whitespace
    pub fn slot(&self, lot_id: &str) -> Option<&Slot> {
        self.by_lot
            .get(lot_id.trim())
            .map(|&idx| &self.slots[idx])
    }

    /// Distinct slot groups in first-seen order
    pub fn slot_groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for slot_id in self.slots.iter().filter_map(|s| s.slot_id.as_deref()) {
            if !groups.contains(&slot_id) {
                groups.push(slot_id);
            }
        }
        groups
    }

    pub fn lots_in_group<'a>(&'a self, slot_id: &'a str) -> impl Iterator<Item = &'a Slot> + 'a {
        self.slots
            .iter()
            .filter(move |slot| slot.slot_id.as_deref() == Some(slot_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Snap every slot to its nearest network node
    pub(crate) fn snap_to(&mut self, network: &WalkNetwork) {
        self.slots.par_iter_mut().for_each(|slot| {
            slot.snapped = network.nearest_node(slot.position);
            if slot.snapped.is_none() {
                trace!("Lot {} could not be snapped - network is empty", slot.lot_id);
            }
        });
    }
}
