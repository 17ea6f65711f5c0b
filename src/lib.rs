//! Frontier-based search over grid mazes and weighted graphs.
//!
//! One generic search core, three frontier disciplines: FIFO (breadth-first),
//! LIFO (depth-first), and min-priority by `f = g + h` (A*).

// Internals
// ---------
pub mod frontier;

// Search space and problems
// -------------------------
pub mod problem;
pub mod search;
pub mod space;

// Problems
// --------
pub mod problems;

// Algorithms
// ----------
pub mod algorithms;

// Reporting
// ---------
pub mod render;
