use eframe::egui::{Vec2, vec2};

const MAX_DEPTH: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Extent {
    pub(super) min: Vec2,
    pub(super) size: f32,
}

impl Extent {
    /// Smallest power-of-two square anchored on the floored minimum that
    /// covers every point.
    fn cover(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (low, high) = rest.iter().fold((*first, *first), |(low, high), point| {
            (low.min(*point), high.max(*point))
        });
        if !(low.x.is_finite() && low.y.is_finite() && high.x.is_finite() && high.y.is_finite()) {
            return None;
        }

        let min = vec2(low.x.floor(), low.y.floor());
        let mut size = 1.0_f32;
        while min.x + size < high.x || min.y + size < high.y {
            size *= 2.0;
        }

        Some(Self { min, size })
    }

    fn max(self) -> Vec2 {
        self.min + vec2(self.size, self.size)
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }

    fn quadrant(self, point: Vec2) -> usize {
        let middle = self.min + vec2(self.size, self.size) * 0.5;
        let right = usize::from(point.x >= middle.x);
        let below = usize::from(point.y >= middle.y);
        (below << 1) | right
    }

    fn child(self, quadrant: usize) -> Self {
        let half = self.size * 0.5;
        let step = vec2((quadrant & 1) as f32, (quadrant >> 1) as f32) * half;
        Self {
            min: self.min + step,
            size: half,
        }
    }

    pub(super) fn distance_sq_to_point(self, point: Vec2) -> f32 {
        let max = self.max();
        let dx = (self.min.x - point.x).max(point.x - max.x).max(0.0);
        let dy = (self.min.y - point.y).max(point.y - max.y).max(0.0);
        (dx * dx) + (dy * dy)
    }
}

pub(super) struct Cell {
    pub(super) extent: Extent,
    pub(super) mass: f32,
    pub(super) center_of_mass: Vec2,
    /// Points held directly; only leaves hold any. More than one means they
    /// coincide or the depth limit was hit.
    pub(super) points: Vec<usize>,
    children: [Option<usize>; 4],
}

impl Cell {
    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// Point quadtree over a snapshot of positions. Cells live in one arena;
/// index 0 is the root.
pub(super) struct QuadTree {
    cells: Vec<Cell>,
}

impl QuadTree {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let extent = Extent::cover(positions)?;
        let mut tree = Self {
            cells: Vec::with_capacity(positions.len() * 2),
        };
        tree.split(extent, (0..positions.len()).collect(), positions, 0);
        Some(tree)
    }

    fn split(&mut self, extent: Extent, points: Vec<usize>, positions: &[Vec2], depth: usize) -> usize {
        let mass = points.len() as f32;
        let center_of_mass = points.iter().fold(Vec2::ZERO, |sum, &index| sum + positions[index]) / mass;

        let slot = self.cells.len();
        self.cells.push(Cell {
            extent,
            mass,
            center_of_mass,
            points: Vec::new(),
            children: [None; 4],
        });

        let first = positions[points[0]];
        let coincident = points.iter().all(|&index| positions[index] == first);
        if points.len() == 1 || coincident || depth >= MAX_DEPTH {
            self.cells[slot].points = points;
            return slot;
        }

        let mut buckets: [Vec<usize>; 4] = Default::default();
        for index in points {
            buckets[extent.quadrant(positions[index])].push(index);
        }
        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                let child = self.split(extent.child(quadrant), bucket, positions, depth + 1);
                self.cells[slot].children[quadrant] = Some(child);
            }
        }
        slot
    }

    pub(super) fn root(&self) -> &Cell {
        &self.cells[0]
    }

    /// Pre-order walk. Returning `true` from `visit` skips the cell's children.
    pub(super) fn visit(&self, mut visit: impl FnMut(&Cell) -> bool) {
        let mut stack = vec![0];
        while let Some(slot) = stack.pop() {
            let cell = &self.cells[slot];
            if visit(cell) {
                continue;
            }
            stack.extend(cell.children.iter().rev().flatten());
        }
    }

    pub(super) fn collect_near(&self, point: Vec2, reach: f32, out: &mut Vec<usize>) {
        let reach_sq = reach * reach;
        self.visit(|cell| {
            if cell.extent.distance_sq_to_point(point) > reach_sq {
                return true;
            }
            out.extend_from_slice(&cell.points);
            false
        });
    }
}
