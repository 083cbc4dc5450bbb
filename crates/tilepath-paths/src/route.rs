use tilepath_core::Point;

use crate::error::PathError;
use crate::graph::CostGraph;

/// A reconstructed lowest-cost route.
///
/// Cells are stored destination first, the order in which parent links
/// are walked. Use [`Route::iter_forward`] or [`Route::reversed`] for
/// start-first order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    cells: Vec<Point>,
    cost: u64,
}

impl Route {
    /// Cells from destination to start, both included.
    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    /// Total traversal cost, excluding the start cell's own cost.
    pub fn cost(&self) -> u64 {
        self.cost
    }

    /// Number of cells on the route.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a reconstructed route.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Option<Point> {
        self.cells.last().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.cells.first().copied()
    }

    /// Cells as `(row, col)` pairs, destination first.
    pub fn coords(&self) -> Vec<(i32, i32)> {
        self.cells.iter().map(|p| p.row_col()).collect()
    }

    /// Cells from start to destination.
    pub fn iter_forward(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().rev().copied()
    }

    /// The same route with cells in start-first order.
    pub fn reversed(&self) -> Vec<Point> {
        self.iter_forward().collect()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.cells.contains(&p)
    }
}

impl CostGraph {
    /// Walk parent links from `end` back to the last relaxation origin.
    pub fn route_to(&self, end: Point) -> Result<Route, PathError> {
        let si = self.origin.ok_or(PathError::NotRelaxed)?;
        let ei = self.idx(end).ok_or(PathError::InvalidCoordinate {
            pos: end,
            bounds: self.bounds,
        })?;
        let start = self.point(si);
        let no_path = PathError::NoPath { start, end };

        let Some(cost) = self.nodes[ei].total else {
            return Err(no_path);
        };

        let mut cells = Vec::new();
        let mut ci = ei;
        // A parent chain never repeats a node, so it is at most len() long.
        for _ in 0..self.nodes.len() {
            cells.push(self.point(ci));
            if ci == si {
                return Ok(Route { cells, cost });
            }
            match self.nodes[ci].parent {
                Some(pi) => ci = pi,
                None => break,
            }
        }
        log::warn!("parent chain from {end} does not lead back to {start}");
        Err(no_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilepath_core::{CostTable, TerrainMap};

    fn relaxed(text: &str, start: Point) -> CostGraph {
        let mut g = CostGraph::from_map(&TerrainMap::parse(text).unwrap(), &CostTable::default());
        g.relax(start).unwrap();
        g
    }

    #[test]
    fn open_grid_corner_to_corner() {
        let g = relaxed("___\n___\n___", Point::at(0, 0));
        let route = g.route_to(Point::at(2, 2)).unwrap();
        assert_eq!(route.len(), 5);
        assert_eq!(route.cost(), 4);
        assert_eq!(route.end(), Some(Point::at(2, 2)));
        assert_eq!(route.start(), Some(Point::at(0, 0)));
        for pair in route.cells().windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
    }

    #[test]
    fn start_equals_end() {
        let g = relaxed("_f\nM_", Point::at(1, 1));
        let route = g.route_to(Point::at(1, 1)).unwrap();
        assert_eq!(route.coords(), vec![(1, 1)]);
        assert_eq!(route.cost(), 0);
    }

    #[test]
    fn totals_strictly_decrease_towards_start() {
        let g = relaxed("_f__M\n__~f_\nM___f", Point::at(2, 0));
        let route = g.route_to(Point::at(0, 4)).unwrap();
        let totals: Vec<_> = route
            .cells()
            .iter()
            .map(|&p| g.total_at(p).unwrap())
            .collect();
        assert!(totals.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(totals.last(), Some(&0));
        assert_eq!(totals[0], route.cost());
    }

    #[test]
    fn forest_avoided_when_cheaper() {
        // Through the forest: 4 + 1 = 5. Around it: 1 + 1 + 1 + 1 = 4.
        let g = relaxed("_f_\n___", Point::at(0, 0));
        let route = g.route_to(Point::at(0, 2)).unwrap();
        assert_eq!(route.cost(), 4);
        assert!(!route.contains(Point::at(0, 1)));
        assert_eq!(
            route.reversed(),
            vec![
                Point::at(0, 0),
                Point::at(1, 0),
                Point::at(1, 1),
                Point::at(1, 2),
                Point::at(0, 2),
            ]
        );
    }

    #[test]
    fn blocked_corridor_is_no_path() {
        let g = relaxed("__~__", Point::at(0, 0));
        let err = g.route_to(Point::at(0, 4)).unwrap_err();
        assert!(matches!(
            err,
            PathError::NoPath { start, end } if start == Point::at(0, 0) && end == Point::at(0, 4)
        ));
    }

    #[test]
    fn impassable_end_is_no_path() {
        let g = relaxed("__~", Point::at(0, 0));
        assert!(matches!(
            g.route_to(Point::at(0, 2)),
            Err(PathError::NoPath { .. })
        ));
    }

    #[test]
    fn unrelaxed_graph() {
        let g = CostGraph::from_map(&TerrainMap::parse("__").unwrap(), &CostTable::default());
        assert!(matches!(
            g.route_to(Point::at(0, 1)),
            Err(PathError::NotRelaxed)
        ));
    }

    #[test]
    fn end_out_of_bounds() {
        let g = relaxed("__", Point::at(0, 0));
        assert!(matches!(
            g.route_to(Point::at(0, 2)),
            Err(PathError::InvalidCoordinate { .. })
        ));
    }
}
