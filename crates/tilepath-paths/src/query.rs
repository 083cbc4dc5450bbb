use std::path::Path;
use std::time::{Duration, Instant};

use tilepath_core::{CostTable, LoadError, Point, TerrainMap, read_map_with_border};

use crate::error::PathError;
use crate::graph::CostGraph;
use crate::relax::RelaxStats;
use crate::route::Route;

/// The relaxed graph of one query, kept around for inspection.
#[derive(Debug, Clone)]
pub struct Search {
    pub graph: CostGraph,
    pub stats: RelaxStats,
    /// Wall-clock time spent relaxing.
    pub elapsed: Duration,
}

impl Search {
    /// Reconstruct the route from the search origin to `end`.
    pub fn route_to(&self, end: Point) -> Result<Route, PathError> {
        self.graph.route_to(end)
    }
}

/// Runs path queries under a fixed [`CostTable`].
///
/// Every query builds and discards its own graph, so a `Pathfinder` can
/// be shared freely.
#[derive(Debug, Clone, Default)]
pub struct Pathfinder {
    table: CostTable,
}

impl Pathfinder {
    pub fn new(table: CostTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CostTable {
        &self.table
    }

    /// Load a map file using this table's border marker.
    pub fn read_map(&self, source: impl AsRef<Path>) -> Result<TerrainMap, LoadError> {
        read_map_with_border(source, self.table.border())
    }

    /// Relax the whole map from `start`.
    pub fn explore(&self, map: &TerrainMap, start: Point) -> Result<Search, PathError> {
        let mut graph = CostGraph::from_map(map, &self.table);
        let began = Instant::now();
        let stats = graph.relax(start)?;
        Ok(Search {
            graph,
            stats,
            elapsed: began.elapsed(),
        })
    }

    /// Validate both endpoints, then relax the map from `start`.
    pub fn search(&self, map: &TerrainMap, start: Point, end: Point) -> Result<Search, PathError> {
        check_bounds(map, start)?;
        check_bounds(map, end)?;
        self.explore(map, start)
    }

    /// Lowest-cost route from `start` to `end` on a loaded map.
    pub fn find_path_in(
        &self,
        map: &TerrainMap,
        start: Point,
        end: Point,
    ) -> Result<Route, PathError> {
        self.search(map, start, end)?.route_to(end)
    }

    /// Load `source` and find the lowest-cost route between two
    /// `(row, col)` cells. The route is destination first.
    pub fn find_path(
        &self,
        source: impl AsRef<Path>,
        start_row: i32,
        start_col: i32,
        end_row: i32,
        end_col: i32,
    ) -> Result<Route, PathError> {
        let map = self.read_map(source)?;
        self.find_path_in(
            &map,
            Point::at(start_row, start_col),
            Point::at(end_row, end_col),
        )
    }
}

fn check_bounds(map: &TerrainMap, p: Point) -> Result<(), PathError> {
    if map.contains(p) {
        Ok(())
    } else {
        Err(PathError::InvalidCoordinate {
            pos: p,
            bounds: map.bounds(),
        })
    }
}

/// Load the map file at `source` and find the lowest-cost route from
/// `(start_row, start_col)` to `(end_row, end_col)` under the default
/// terrain costs.
///
/// The returned cells run from the destination back to the start.
pub fn find_path(
    source: impl AsRef<Path>,
    start_row: i32,
    start_col: i32,
    end_row: i32,
    end_col: i32,
) -> Result<Route, PathError> {
    Pathfinder::default().find_path(source, start_row, start_col, end_row, end_col)
}

/// [`Pathfinder::find_path_in`] with an explicit table.
pub fn find_path_in(
    map: &TerrainMap,
    table: &CostTable,
    start: Point,
    end: Point,
) -> Result<Route, PathError> {
    check_bounds(map, start)?;
    check_bounds(map, end)?;
    let mut graph = CostGraph::from_map(map, table);
    graph.relax(start)?;
    graph.route_to(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const ISLAND: &str = "\
xxxxxxx
x__f__x
x_~~~_x
x_~M~_x
x_~~~_x
x_____x
xxxxxxx";

    fn temp_map(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tilepath-paths-{}-{name}.txt",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn three_by_three_open_grid() {
        let path = temp_map("open", "___\n___\n___\n");
        let route = find_path(&path, 0, 0, 2, 2).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(route.len(), 5);
        assert_eq!(route.cost(), 4);
        assert_eq!(route.coords()[0], (2, 2));
        assert_eq!(route.coords()[4], (0, 0));
    }

    #[test]
    fn bordered_file() {
        let path = temp_map("island", ISLAND);
        let route = find_path(&path, 0, 0, 0, 4).unwrap();
        let again = find_path(&path, 0, 0, 0, 4).unwrap();
        std::fs::remove_file(&path).ok();
        // Straight along the top row through the forest: 1 + 4 + 1 + 1.
        assert_eq!(route.cost(), 7);
        assert_eq!(route, again);
    }

    #[test]
    fn idempotent_queries() {
        let map = TerrainMap::parse(ISLAND).unwrap();
        let pf = Pathfinder::default();
        let a = pf.find_path_in(&map, Point::at(4, 0), Point::at(0, 4)).unwrap();
        let b = pf.find_path_in(&map, Point::at(4, 0), Point::at(0, 4)).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a,
            find_path_in(&map, &CostTable::default(), Point::at(4, 0), Point::at(0, 4)).unwrap()
        );
    }

    #[test]
    fn enclosed_mountain_is_unreachable() {
        let map = TerrainMap::parse(ISLAND).unwrap();
        let err = Pathfinder::default()
            .find_path_in(&map, Point::at(0, 0), Point::at(2, 2))
            .unwrap_err();
        assert!(matches!(err, PathError::NoPath { .. }));
    }

    #[test]
    fn invalid_coordinates_checked_before_search() {
        let map = TerrainMap::parse(ISLAND).unwrap();
        let pf = Pathfinder::default();
        for (start, end) in [
            (Point::at(-1, 0), Point::at(0, 0)),
            (Point::at(0, 0), Point::at(5, 0)),
            (Point::at(0, 5), Point::at(0, 0)),
            (Point::at(0, 0), Point::at(0, -3)),
        ] {
            assert!(matches!(
                pf.find_path_in(&map, start, end),
                Err(PathError::InvalidCoordinate { .. })
            ));
        }
    }

    #[test]
    fn missing_file_is_load_error() {
        let path = std::env::temp_dir().join("tilepath-paths-missing-map.txt");
        let err = find_path(&path, 0, 0, 0, 0).unwrap_err();
        assert!(matches!(err, PathError::Load(LoadError::Io { .. })));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn empty_file_is_load_error() {
        let path = temp_map("empty", "");
        let err = find_path(&path, 0, 0, 0, 0).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, PathError::Load(LoadError::Empty)));
    }

    #[test]
    fn custom_table_changes_route() {
        let map = TerrainMap::parse_with_border("..~..\n.....", None).unwrap();
        let table = CostTable::from_costs([('.', 1), ('~', 2)], None).unwrap();
        let pf = Pathfinder::new(table);
        let route = pf
            .find_path_in(&map, Point::at(0, 0), Point::at(0, 4))
            .unwrap();
        assert_eq!(route.cost(), 5);
        assert!(route.contains(Point::at(0, 2)));
    }

    #[test]
    fn sample_map() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../maps/island.txt");
        let map = read_map_with_border(path, Some('x')).unwrap();
        assert_eq!((map.width(), map.height()), (10, 6));

        let route = find_path(path, 0, 0, 5, 7).unwrap();
        assert_eq!(route.coords().first(), Some(&(5, 7)));
        assert_eq!(route.coords().last(), Some(&(0, 0)));
        assert_eq!(route, find_path(path, 0, 0, 5, 7).unwrap());
        for pair in route.cells().windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
    }

    #[test]
    fn explore_keeps_graph_and_stats() {
        let map = TerrainMap::parse(ISLAND).unwrap();
        let search = Pathfinder::default().explore(&map, Point::at(0, 0)).unwrap();
        // 25 cells: 8 water and the enclosed mountain stay unreached.
        assert_eq!(search.stats.reached, 16);
        assert_eq!(search.graph.total_at(Point::at(4, 4)), Some(8));
        assert_eq!(search.route_to(Point::at(4, 4)).unwrap().cost(), 8);
        assert_eq!(search.graph.total_at(Point::at(2, 2)), None);
    }
}
