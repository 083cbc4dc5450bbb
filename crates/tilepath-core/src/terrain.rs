//! Terrain symbols and their movement costs.

use std::collections::BTreeMap;
use std::fmt;

pub const OPEN_GROUND: char = '_';
pub const FOREST: char = 'f';
pub const MOUNTAIN: char = 'M';
pub const WATER: char = '~';
/// Marker of the optional one-cell frame around a map file.
pub const WALL: char = 'x';

/// Cost of entering a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cost {
    /// The cell can be entered for the given (positive) cost.
    Step(u32),
    /// The cell can never be entered.
    Impassable,
}

impl Cost {
    /// The numeric cost, or `None` if impassable.
    #[inline]
    pub const fn value(self) -> Option<u32> {
        match self {
            Cost::Step(c) => Some(c),
            Cost::Impassable => None,
        }
    }

    #[inline]
    pub const fn is_passable(self) -> bool {
        matches!(self, Cost::Step(_))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Step(c) => write!(f, "{c}"),
            Cost::Impassable => f.write_str("impassable"),
        }
    }
}

/// Movement cost of a terrain symbol under the default rules.
///
/// Open ground costs 1, forest 4, mountain 10. Everything else, water and
/// walls included, is impassable.
pub const fn terrain_cost(symbol: char) -> Cost {
    match symbol {
        OPEN_GROUND => Cost::Step(1),
        FOREST => Cost::Step(4),
        MOUNTAIN => Cost::Step(10),
        _ => Cost::Impassable,
    }
}

/// Errors raised when building a [`CostTable`] from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostTableError {
    /// Costs must be at least 1 so every relaxation strictly improves.
    ZeroCost(char),
}

impl fmt::Display for CostTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCost(ch) => write!(f, "terrain {ch:?} has cost 0"),
        }
    }
}

impl std::error::Error for CostTableError {}

/// A symbol → cost mapping plus the border marker used when loading maps.
///
/// [`CostTable::default`] reproduces [`terrain_cost`] and the `'x'` border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostTable {
    costs: BTreeMap<char, u32>,
    border: Option<char>,
}

impl Default for CostTable {
    fn default() -> Self {
        let costs = [OPEN_GROUND, FOREST, MOUNTAIN]
            .into_iter()
            .filter_map(|ch| terrain_cost(ch).value().map(|c| (ch, c)))
            .collect();
        Self {
            costs,
            border: Some(WALL),
        }
    }
}

impl CostTable {
    /// A table with no passable terrain and no border marker.
    pub fn empty() -> Self {
        Self {
            costs: BTreeMap::new(),
            border: None,
        }
    }

    /// Build a table from `(symbol, cost)` pairs.
    pub fn from_costs(
        costs: impl IntoIterator<Item = (char, u32)>,
        border: Option<char>,
    ) -> Result<Self, CostTableError> {
        let mut table = Self {
            costs: BTreeMap::new(),
            border,
        };
        for (ch, cost) in costs {
            table.set(ch, cost)?;
        }
        Ok(table)
    }

    /// Set the cost of a symbol.
    pub fn set(&mut self, symbol: char, cost: u32) -> Result<(), CostTableError> {
        if cost == 0 {
            return Err(CostTableError::ZeroCost(symbol));
        }
        self.costs.insert(symbol, cost);
        Ok(())
    }

    /// Resolve a symbol. Unknown symbols are impassable.
    #[inline]
    pub fn resolve(&self, symbol: char) -> Cost {
        self.costs
            .get(&symbol)
            .map_or(Cost::Impassable, |&c| Cost::Step(c))
    }

    /// Border marker detected in the top-left corner of a map, if any.
    pub fn border(&self) -> Option<char> {
        self.border
    }

    pub fn set_border(&mut self, border: Option<char>) {
        self.border = border;
    }

    /// Iterate over passable symbols and their costs, ordered by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (char, u32)> + '_ {
        self.costs.iter().map(|(&ch, &c)| (ch, c))
    }
}
