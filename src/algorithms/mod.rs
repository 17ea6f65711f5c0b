//! Implementation of search algorithms.
//!
//! These algorithms can do path-finding on generic search problems.

pub mod astar;
pub mod uninformed;
