use std::fmt;

use tilepath_core::{Cost, CostTable, Point, Range, TerrainMap};

/// Index of each link in [`Node::links`].
pub const UP: usize = 0;
pub const DOWN: usize = 1;
pub const LEFT: usize = 2;
pub const RIGHT: usize = 3;

/// One grid cell: its entry cost, its links and its relaxation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) pos: Point,
    pub(crate) cost: Cost,
    pub(crate) total: Option<u64>,
    pub(crate) parent: Option<usize>,
    pub(crate) links: [Option<usize>; 4],
}

impl Node {
    fn new(pos: Point, cost: Cost) -> Self {
        Self {
            pos,
            cost,
            total: None,
            parent: None,
            links: [None; 4],
        }
    }

    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Cost of entering this cell.
    #[inline]
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Best accumulated cost from the last relaxation origin, `None` if
    /// unreached.
    #[inline]
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Index of the node this one was last relaxed from.
    #[inline]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Neighbor indices in up, down, left, right order.
    #[inline]
    pub fn links(&self) -> [Option<usize>; 4] {
        self.links
    }

    #[inline]
    pub fn is_passable(&self) -> bool {
        self.cost.is_passable()
    }
}

/// Errors raised when building a graph from a raw cost array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    ZeroWidth,
    /// The number of costs is not a multiple of the width.
    NotRectangular { len: usize, width: usize },
    /// A dimension does not fit the `i32` coordinate space.
    TooLarge { width: usize, height: usize },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWidth => f.write_str("graph width is zero"),
            Self::NotRectangular { len, width } => {
                write!(f, "{len} costs do not fill rows of width {width}")
            }
            Self::TooLarge { width, height } => {
                write!(f, "grid of {width}x{height} cells is too large")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// A 4-connected grid graph stored as a row-major arena of [`Node`]s.
///
/// Links and parents are indices into the arena. Impassable nodes carry no
/// links; passable nodes link to every in-bounds neighbor and relaxation
/// skips the impassable ones.
#[derive(Debug, Clone)]
pub struct CostGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) bounds: Range,
    pub(crate) width: usize,
    /// Start index of the last relaxation.
    pub(crate) origin: Option<usize>,
}

impl CostGraph {
    /// Build a graph from row-major costs.
    pub fn new(costs: &[Cost], width: usize) -> Result<Self, GraphError> {
        if width == 0 {
            return Err(GraphError::ZeroWidth);
        }
        if costs.len() % width != 0 {
            return Err(GraphError::NotRectangular {
                len: costs.len(),
                width,
            });
        }
        let height = costs.len() / width;
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(GraphError::TooLarge { width, height });
        };
        Ok(Self::build(costs, Range::sized(w, h)))
    }

    /// Build the graph of a loaded map under `table`.
    pub fn from_map(map: &TerrainMap, table: &CostTable) -> Self {
        Self::build(&map.costs(table), map.bounds())
    }

    fn build(costs: &[Cost], bounds: Range) -> Self {
        let width = bounds.width() as usize;
        let mut nodes: Vec<Node> = bounds
            .iter()
            .zip(costs)
            .map(|(p, &cost)| Node::new(p, cost))
            .collect();

        let len = nodes.len();
        for (i, node) in nodes.iter_mut().enumerate() {
            if !node.cost.is_passable() {
                continue;
            }
            if i >= width {
                node.links[UP] = Some(i - width);
            }
            if i + width < len {
                node.links[DOWN] = Some(i + width);
            }
            if i % width != 0 {
                node.links[LEFT] = Some(i - 1);
            }
            if (i + 1) % width != 0 {
                node.links[RIGHT] = Some(i + 1);
            }
        }

        log::debug!(
            "built {bounds} graph, {} passable cells",
            nodes.iter().filter(|n| n.is_passable()).count()
        );
        Self {
            nodes,
            bounds,
            width,
            origin: None,
        }
    }

    /// The grid rectangle, anchored at (0, 0).
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.bounds.height() as usize
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in row-major order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The node at an arena index.
    pub fn node(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx)
    }

    /// The node at a point, or `None` if out of bounds.
    pub fn node_at(&self, p: Point) -> Option<&Node> {
        self.idx(p).map(|i| &self.nodes[i])
    }

    /// Accumulated cost at a point after relaxation.
    pub fn total_at(&self, p: Point) -> Option<u64> {
        self.node_at(p).and_then(Node::total)
    }

    /// The point the last relaxation started from.
    pub fn origin(&self) -> Option<Point> {
        self.origin.map(|i| self.point(i))
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub fn idx(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some(p.y as usize * self.width + p.x as usize)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        Point::new((idx % self.width) as i32, (idx / self.width) as i32)
    }

    // -----------------------------------------------------------------------
    // Relaxation state
    // -----------------------------------------------------------------------

    /// Forget all totals and parents.
    pub(crate) fn reset(&mut self) {
        for n in self.nodes.iter_mut() {
            n.total = None;
            n.parent = None;
        }
        self.origin = None;
    }

    /// Record an improvement. Total and parent only ever change here, and
    /// always together.
    #[inline]
    pub(crate) fn improve(&mut self, idx: usize, total: u64, parent: Option<usize>) {
        let n = &mut self.nodes[idx];
        n.total = Some(total);
        n.parent = parent;
    }
}
