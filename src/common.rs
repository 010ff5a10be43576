mod agent;
mod cost;
mod path;

pub use agent::{Agent, AgentId, Roster};
pub use cost::{Cost, Weight};
pub use path::{Path, Position};

/// Slot index of a node inside its graph.
pub type NodeId = usize;
