use std::fmt;

use tilepath_core::{LoadError, Point, Range};

use crate::graph::GraphError;

/// Errors returned by path queries.
#[derive(Debug)]
pub enum PathError {
    /// The map could not be loaded.
    Load(LoadError),
    /// The cost array did not describe a grid.
    ///
    /// Only produced when a graph is built from a raw cost array with
    /// [`CostGraph::new`](crate::CostGraph::new); maps loaded through
    /// [`find_path`](crate::find_path) or a [`Pathfinder`](crate::Pathfinder)
    /// are always rectangular.
    Graph(GraphError),
    /// A start or end point lies outside the map.
    InvalidCoordinate { pos: Point, bounds: Range },
    /// The end cannot be reached from the start.
    NoPath { start: Point, end: Point },
    /// A route was requested from a graph that was never relaxed.
    NotRelaxed,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "{e}"),
            Self::Graph(e) => write!(f, "{e}"),
            Self::InvalidCoordinate { pos, bounds } => {
                write!(f, "coordinate {pos} is outside the {bounds} map")
            }
            Self::NoPath { start, end } => write!(f, "no path from {start} to {end}"),
            Self::NotRelaxed => f.write_str("graph has not been relaxed"),
        }
    }
}

impl std::error::Error for PathError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Graph(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LoadError> for PathError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<GraphError> for PathError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CostGraph;
    use tilepath_core::Cost;

    fn build(costs: &[Cost], width: usize) -> Result<CostGraph, PathError> {
        Ok(CostGraph::new(costs, width)?)
    }

    #[test]
    fn raw_cost_array_errors_convert() {
        let err = build(&[Cost::Step(1); 5], 2).unwrap_err();
        assert!(matches!(
            err,
            PathError::Graph(GraphError::NotRectangular { len: 5, width: 2 })
        ));
        assert!(std::error::Error::source(&err).is_some());
        assert!(build(&[Cost::Step(1); 4], 2).is_ok());
    }
}
