//! **tilepath-core** — terrain maps for lowest-cost grid routing.
//!
//! This crate holds the pieces every query starts from: geometry
//! primitives, the terrain cost rules, and the text map loader.

pub mod geom;
pub mod map;
pub mod terrain;

pub use geom::{Point, Range, RangeIter};
pub use map::{LoadError, TerrainMap, read_map, read_map_with_border};
pub use terrain::{Cost, CostTable, CostTableError, terrain_cost};
