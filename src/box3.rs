// src/box3.rs

use crate::grid::Axis;

/// Integer box in (i,j,k) index space, using half-open intervals:
/// [lo[0], hi[0]) × [lo[1], hi[1]) × [lo[2], hi[2])
///
/// Indices are signed so that boxes grown into the ghost region can be
/// expressed directly (e.g. lo = -1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Box3i {
    pub lo: [isize; 3],
    pub hi: [isize; 3],
}

impl Box3i {
    #[inline]
    pub fn new(lo: [isize; 3], hi: [isize; 3]) -> Self {
        Self { lo, hi }
    }

    /// Box [0, n) on every axis.
    #[inline]
    pub fn from_size(n: [usize; 3]) -> Self {
        Self::new([0, 0, 0], [n[0] as isize, n[1] as isize, n[2] as isize])
    }

    #[inline]
    pub fn len(self, axis: Axis) -> usize {
        let a = axis.index();
        (self.hi[a] - self.lo[a]).max(0) as usize
    }

    #[inline]
    pub fn num_cells(self) -> usize {
        self.len(Axis::X) * self.len(Axis::Y) * self.len(Axis::Z)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.num_cells() == 0
    }

    #[inline]
    pub fn contains(self, i: isize, j: isize, k: isize) -> bool {
        i >= self.lo[0]
            && i < self.hi[0]
            && j >= self.lo[1]
            && j < self.hi[1]
            && k >= self.lo[2]
            && k < self.hi[2]
    }

    /// Grow by `n` cells on every side.
    pub fn grow(self, n: usize) -> Box3i {
        let n = n as isize;
        Box3i::new(
            [self.lo[0] - n, self.lo[1] - n, self.lo[2] - n],
            [self.hi[0] + n, self.hi[1] + n, self.hi[2] + n],
        )
    }

    /// Intersection of two boxes.
    pub fn intersect(self, other: Box3i) -> Option<Box3i> {
        let mut lo = [0isize; 3];
        let mut hi = [0isize; 3];
        for a in 0..3 {
            lo[a] = self.lo[a].max(other.lo[a]);
            hi[a] = self.hi[a].min(other.hi[a]);
            if hi[a] <= lo[a] {
                return None;
            }
        }
        Some(Box3i::new(lo, hi))
    }

    /// Convert a cell box into the box of faces normal to `axis`
    /// (one extra node on the high side).
    pub fn surrounding_nodes(self, axis: Axis) -> Box3i {
        let mut hi = self.hi;
        hi[axis.index()] += 1;
        Box3i::new(self.lo, hi)
    }

    /// Split into sub-boxes no larger than `max_size` cells per axis.
    ///
    /// The pieces tile `self` exactly and are disjoint.
    pub fn chop(self, max_size: [usize; 3]) -> Vec<Box3i> {
        if self.is_empty() {
            return Vec::new();
        }
        let ranges: Vec<Vec<(isize, isize)>> = (0..3)
            .map(|a| {
                let step = max_size[a].max(1) as isize;
                let mut r = Vec::new();
                let mut s = self.lo[a];
                while s < self.hi[a] {
                    let e = (s + step).min(self.hi[a]);
                    r.push((s, e));
                    s = e;
                }
                r
            })
            .collect();

        let mut out = Vec::with_capacity(ranges[0].len() * ranges[1].len() * ranges[2].len());
        for &(k0, k1) in &ranges[2] {
            for &(j0, j1) in &ranges[1] {
                for &(i0, i1) in &ranges[0] {
                    out.push(Box3i::new([i0, j0, k0], [i1, j1, k1]));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chop_tiles_box_exactly() {
        let b = Box3i::from_size([10, 4, 3]);
        let tiles = b.chop([4, 4, 2]);
        // x: 4+4+2, y: 4, z: 2+1
        assert_eq!(tiles.len(), 6);
        let total: usize = tiles.iter().map(|t| t.num_cells()).sum();
        assert_eq!(total, b.num_cells());

        for (n, a) in tiles.iter().enumerate() {
            for t in &tiles[n + 1..] {
                assert!(a.intersect(*t).is_none(), "{:?} overlaps {:?}", a, t);
            }
        }
    }

    #[test]
    fn grow_and_nodes() {
        let b = Box3i::from_size([2, 2, 2]).grow(1);
        assert_eq!(b.lo, [-1, -1, -1]);
        assert_eq!(b.hi, [3, 3, 3]);
        assert!(b.contains(-1, 2, 0));

        let f = Box3i::from_size([2, 2, 2]).surrounding_nodes(Axis::Z);
        assert_eq!(f.len(Axis::Z), 3);
        assert_eq!(f.len(Axis::X), 2);
    }
}
