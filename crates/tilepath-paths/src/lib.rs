//! Lowest-cost routing over ASCII terrain maps.
//!
//! A query runs through four stages:
//!
//! 1. the map is loaded into a [`TerrainMap`] ([`read_map`]),
//! 2. every cell is resolved to a [`Cost`](tilepath_core::Cost) and wired
//!    into a 4-connected [`CostGraph`],
//! 3. [`CostGraph::relax`] propagates lowest accumulated cost from the
//!    start cell with a FIFO queue,
//! 4. [`CostGraph::route_to`] follows parent links back from the end cell.
//!
//! [`find_path`] runs all four against a map file. [`Pathfinder`] does the
//! same under a custom [`CostTable`] and can hand back the relaxed graph
//! for inspection.
//!
//! ```no_run
//! let route = tilepath_paths::find_path("map.txt", 0, 0, 4, 7)?;
//! println!("cost {} over {} cells", route.cost(), route.len());
//! # Ok::<(), tilepath_paths::PathError>(())
//! ```

mod error;
mod graph;
mod query;
mod relax;
mod route;

pub use error::PathError;
pub use graph::{CostGraph, DOWN, GraphError, LEFT, Node, RIGHT, UP};
pub use query::{Pathfinder, Search, find_path, find_path_in};
pub use relax::RelaxStats;
pub use route::Route;
pub use tilepath_core::{CostTable, LoadError, Point, TerrainMap, read_map};
