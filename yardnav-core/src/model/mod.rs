//! Data model for yard wayfinding
//!
//! Contains the walk network, the slot catalog and the yard model tying
//! them together.

pub mod components;
pub mod network;
pub mod slots;
pub mod yard;

pub use components::{WalkEdge, WalkNode};
pub use network::{IndexedPoint, NetworkConfig, NetworkStats, WalkNetwork};
pub use petgraph::graph::NodeIndex;
pub use slots::{Slot, SlotIndex};
pub use yard::{Region, YardMeta, YardModel};
