//! Terrain maps loaded from text.
//!
//! A [`TerrainMap`] is a rectangular grid of single-character terrain
//! symbols. Each line of the source is one row. If the top-left symbol is
//! the border marker, the outer frame is removed on load:
//!
//! ```text
//! xxxxx
//! x_f_x        _f_
//! x~M_x   ->   ~M_
//! xxxxx
//! ```

use crate::geom::{Point, Range};
use crate::terrain::{Cost, CostTable, WALL};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Errors that can occur when loading a map.
#[derive(Debug)]
pub enum LoadError {
    /// The source could not be opened or read.
    Io {
        path: Option<PathBuf>,
        source: io::Error,
    },
    /// The source holds no rows, or none once the border is removed.
    Empty,
    /// A row's width differs from the first row's (1-based line number).
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path: Some(path),
                source,
            } => write!(f, "could not read map {}: {source}", path.display()),
            Self::Io { path: None, source } => write!(f, "could not read map: {source}"),
            Self::Empty => f.write_str("map is empty"),
            Self::Ragged {
                line,
                expected,
                found,
            } => write!(
                f,
                "map line {line} is {found} symbols wide, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A rectangular grid of terrain symbols, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainMap {
    symbols: Vec<char>,
    bounds: Range,
}

impl TerrainMap {
    /// Parse a map from text, stripping an `'x'` border if present.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        Self::parse_with_border(text, Some(WALL))
    }

    /// Parse a map from text. `border` is the marker that, found in the
    /// top-left corner, identifies a one-cell frame to strip.
    pub fn parse_with_border(text: &str, border: Option<char>) -> Result<Self, LoadError> {
        Self::from_lines(text.lines().map(str::to_owned).collect(), border)
    }

    /// Read a map line by line from `reader`.
    pub fn from_reader<R: BufRead>(reader: R, border: Option<char>) -> Result<Self, LoadError> {
        let lines = reader
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .map_err(|source| LoadError::Io { path: None, source })?;
        Self::from_lines(lines, border)
    }

    fn from_lines(lines: Vec<String>, border: Option<char>) -> Result<Self, LoadError> {
        let mut rows: Vec<Vec<char>> = lines
            .iter()
            .map(|l| l.strip_suffix('\r').unwrap_or(l).chars().collect())
            .collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        let Some(first) = rows.first() else {
            return Err(LoadError::Empty);
        };

        let width = first.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(LoadError::Ragged {
                    line: i + 1,
                    expected: width,
                    found: row.len(),
                });
            }
        }

        let raw = Range::sized(width as i32, rows.len() as i32);
        let bounds = match border {
            Some(marker) if rows[0][0] == marker => {
                let inner = raw.shift(1, 1, -1, -1);
                if !frame_is_solid(&rows, raw, inner, marker) {
                    log::warn!("map frame is not made only of {marker:?}; stripping it anyway");
                }
                log::debug!("stripped {marker:?} border from {raw} map");
                inner
            }
            _ => raw,
        };
        if bounds.is_empty() {
            return Err(LoadError::Empty);
        }

        let symbols = bounds
            .iter()
            .map(|p| rows[p.y as usize][p.x as usize])
            .collect();
        let map = Self {
            symbols,
            bounds: Range::sized(bounds.width(), bounds.height()),
        };
        log::debug!("loaded {} map", map.bounds);
        Ok(map)
    }

    /// The map rectangle, always anchored at (0, 0).
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.bounds.width() as usize
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.bounds.height() as usize
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether `p` lies on the map.
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// The symbol at a point, or `None` if out of bounds.
    pub fn at(&self, p: Point) -> Option<char> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some(self.symbols[p.y as usize * self.width() + p.x as usize])
    }

    /// One row of symbols.
    pub fn row(&self, y: usize) -> Option<&[char]> {
        let w = self.width();
        self.symbols.get(y * w..(y + 1) * w)
    }

    /// All rows as strings, top to bottom.
    pub fn rows(&self) -> Vec<String> {
        self.symbols
            .chunks(self.width())
            .map(|r| r.iter().collect())
            .collect()
    }

    /// Iterate over `(Point, symbol)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, char)> + '_ {
        self.bounds.iter().zip(self.symbols.iter().copied())
    }

    /// Row-major cost of every cell under `table`.
    pub fn costs(&self, table: &CostTable) -> Vec<Cost> {
        self.symbols.iter().map(|&ch| table.resolve(ch)).collect()
    }
}

impl fmt::Display for TerrainMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.symbols.chunks(self.width()).enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for &ch in row {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

fn frame_is_solid(rows: &[Vec<char>], raw: Range, inner: Range, marker: char) -> bool {
    raw.iter()
        .filter(|&p| !inner.contains(p))
        .all(|p| rows[p.y as usize][p.x as usize] == marker)
}

/// Load a map file, stripping an `'x'` border if present.
pub fn read_map(path: impl AsRef<Path>) -> Result<TerrainMap, LoadError> {
    read_map_with_border(path, Some(WALL))
}

/// Load a map file with a custom border marker (or none).
pub fn read_map_with_border(
    path: impl AsRef<Path>,
    border: Option<char>,
) -> Result<TerrainMap, LoadError> {
    let path = path.as_ref();
    let with_path = |source| LoadError::Io {
        path: Some(path.to_path_buf()),
        source,
    };
    let file = File::open(path).map_err(with_path)?;
    TerrainMap::from_reader(BufReader::new(file), border).map_err(|e| match e {
        LoadError::Io { source, .. } => with_path(source),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PLAIN: &str = "\
_f_
~M_";

    const BORDERED: &str = "\
xxxxx
x_f_x
x~M_x
xxxxx";

    fn temp_map(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tilepath-core-{}-{name}.txt",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parse_dimensions_and_symbols() {
        let m = TerrainMap::parse(PLAIN).unwrap();
        assert_eq!(m.width(), 3);
        assert_eq!(m.height(), 2);
        assert_eq!(m.len(), 6);
        assert_eq!(m.at(Point::at(0, 1)), Some('f'));
        assert_eq!(m.at(Point::at(1, 0)), Some('~'));
        assert_eq!(m.at(Point::at(2, 0)), None);
        assert_eq!(m.at(Point::at(0, -1)), None);
        assert_eq!(m.rows(), vec!["_f_", "~M_"]);
        assert_eq!(m.row(1), Some(&['~', 'M', '_'][..]));
        assert_eq!(m.row(2), None);
    }

    #[test]
    fn border_is_stripped() {
        let bordered = TerrainMap::parse(BORDERED).unwrap();
        let plain = TerrainMap::parse(PLAIN).unwrap();
        assert_eq!(bordered, plain);
        assert_eq!(bordered.bounds(), Range::sized(3, 2));
    }

    #[test]
    fn border_detected_only_by_top_left_symbol() {
        // 'x' elsewhere on the frame is left alone.
        let m = TerrainMap::parse("_x\nxx").unwrap();
        assert_eq!(m.width(), 2);
        assert_eq!(m.height(), 2);
    }

    #[test]
    fn custom_or_disabled_border() {
        let hashed = "####\n#_f#\n####";
        let m = TerrainMap::parse_with_border(hashed, Some('#')).unwrap();
        assert_eq!(m.rows(), vec!["_f"]);

        let kept = TerrainMap::parse_with_border(BORDERED, None).unwrap();
        assert_eq!(kept.width(), 5);
        assert_eq!(kept.height(), 4);
    }

    #[test]
    fn crlf_and_trailing_blank_lines() {
        let m = TerrainMap::parse("_f_\r\n~M_\r\n\r\n\n").unwrap();
        assert_eq!(m, TerrainMap::parse(PLAIN).unwrap());
    }

    #[test]
    fn empty_input() {
        assert!(matches!(TerrainMap::parse(""), Err(LoadError::Empty)));
        assert!(matches!(TerrainMap::parse("\n\n"), Err(LoadError::Empty)));
    }

    #[test]
    fn border_only_is_empty() {
        assert!(matches!(TerrainMap::parse("xx\nxx"), Err(LoadError::Empty)));
        assert!(matches!(TerrainMap::parse("xxx"), Err(LoadError::Empty)));
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = TerrainMap::parse("___\n__\n___").unwrap_err();
        match err {
            LoadError::Ragged {
                line,
                expected,
                found,
            } => {
                assert_eq!((line, expected, found), (2, 3, 2));
            }
            other => panic!("expected Ragged, got {other:?}"),
        }
        assert!(matches!(
            TerrainMap::parse("__\n\n__"),
            Err(LoadError::Ragged { line: 2, .. })
        ));
    }

    #[test]
    fn from_reader_matches_parse() {
        let m = TerrainMap::from_reader(Cursor::new(BORDERED), Some(WALL)).unwrap();
        assert_eq!(m, TerrainMap::parse(BORDERED).unwrap());
    }

    #[test]
    fn costs_are_row_major() {
        let m = TerrainMap::parse(PLAIN).unwrap();
        let costs = m.costs(&CostTable::default());
        assert_eq!(
            costs,
            vec![
                Cost::Step(1),
                Cost::Step(4),
                Cost::Step(1),
                Cost::Impassable,
                Cost::Step(10),
                Cost::Step(1),
            ]
        );
    }

    #[test]
    fn display_round_trips_rows() {
        let m = TerrainMap::parse(BORDERED).unwrap();
        assert_eq!(m.to_string(), PLAIN);
        let iterated: Vec<_> = m.iter().collect();
        assert_eq!(iterated[4], (Point::at(1, 1), 'M'));
    }

    #[test]
    fn read_map_from_file() {
        let path = temp_map("bordered", BORDERED);
        let m = read_map(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(m.rows(), vec!["_f_", "~M_"]);
    }

    #[test]
    fn read_map_missing_file() {
        let path = std::env::temp_dir().join("tilepath-core-does-not-exist.txt");
        let err = read_map(&path).unwrap_err();
        match &err {
            LoadError::Io { path: Some(p), .. } => assert_eq!(p, &path),
            other => panic!("expected Io, got {other:?}"),
        }
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("could not read map"));
    }
}
