pub mod arena;
pub mod error;
pub mod graph;
pub mod heap;
pub mod idp;
pub mod monoid;
pub mod pathfinder;
pub mod subgraph;

#[cfg(feature = "logging")]
mod settings;
