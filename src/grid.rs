/// Row-major flat grid. No per-cell objects, bounded edges (no wrapping).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    pub data: Vec<T>,
    pub w: usize,
    pub h: usize,
}

impl<T: Copy + Default> Grid<T> {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            data: vec![T::default(); w * h],
            w,
            h,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Bounds-checked read for signed coordinates.
    #[inline]
    pub fn try_get(&self, x: i64, y: i64) -> Option<T> {
        checked_xy(x, y, self.w, self.h).map(|(x, y)| self.get(x, y))
    }
}

/// Convert signed coordinates to indices. Returns None outside the grid.
#[inline]
pub fn checked_xy(x: i64, y: i64, w: usize, h: usize) -> Option<(usize, usize)> {
    if x < 0 || y < 0 {
        return None;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= w || y >= h {
        return None;
    }
    Some((x, y))
}

/// 4-connected (von Neumann) neighbors. Edge and corner cells yield fewer.
pub fn neighbors4(x: usize, y: usize, w: usize, h: usize) -> impl Iterator<Item = (usize, usize)> {
    let offsets: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
    let mut out = [(0usize, 0usize); 4];
    let mut n = 0;
    for (dx, dy) in offsets {
        if let Some(pos) = checked_xy(x as i64 + dx, y as i64 + dy, w, h) {
            out[n] = pos;
            n += 1;
        }
    }
    out.into_iter().take(n)
}
