mod shortest_path;
mod state;

pub use shortest_path::{path_weight, shortest_path};
