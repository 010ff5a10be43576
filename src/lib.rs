//! Multi-agent pathfinding over weighted waypoint graphs.
//!
//! Besides depth-first / breadth-first traversal, uniform-cost search and A*,
//! the crate offers an "ambush" search: A* whose arc costs grow with the
//! square of how many other agents already route through the target node, so
//! agents planned one after another spread over distinct corridors.

pub mod algorithm;
pub mod common;
pub mod config;
pub mod graph;
pub mod scenario;
pub mod solver;
pub mod stat;
