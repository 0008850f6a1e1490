/// A 2D grid of cells stored row-major. Coordinates do not wrap.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    /// Reset every cell to the default value, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.fill(T::default());
    }
}

impl<T: Clone> Tilemap<T> {
    /// Get the index into the data array.
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(self.contains(x, y), "({x}, {y}) outside {}x{}", self.width, self.height);
        y * self.width + x
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    /// Bounds-checked read
    pub fn try_get(&self, x: usize, y: usize) -> Option<&T> {
        if self.contains(x, y) {
            Some(self.get(x, y))
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Iterate over all cells with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }
}

impl<T: PartialEq> Tilemap<T> {
    /// Cells whose value differs from `previous`, as `(row, col)` in row-major order.
    ///
    /// Both maps must have the same dimensions.
    pub fn changed_cells(&self, previous: &Tilemap<T>) -> Vec<(usize, usize)> {
        assert_eq!(
            (self.width, self.height),
            (previous.width, previous.height),
            "cannot diff tilemaps of different sizes"
        );
        self.data
            .iter()
            .zip(&previous.data)
            .enumerate()
            .filter(|(_, (now, before))| now != before)
            .map(|(idx, _)| (idx / self.width, idx % self.width))
            .collect()
    }
}
