use crate::FluidError;

/// The interior is `width x height` cells surrounded by one ghost cell on every side, so
/// every field is stored over `(width + 2) x (height + 2)` entries. Entry `(i, j)` lives at
/// `i * (height + 2) + j`: `i` walks along x, `j` along y, and `j = 0` is the floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidGrid {
    width: usize,
    height: usize,
    h: f32,
}

impl FluidGrid {
    pub fn new(width: usize, height: usize, h: f32) -> Self {
        assert!(width > 0, "width must be > 0");
        assert!(height > 0, "height must be > 0");
        assert!(h > 0.0 && h.is_finite(), "cell size must be > 0");
        Self { width, height, h }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn h(&self) -> f32 {
        self.h
    }

    pub fn num_x(&self) -> usize {
        self.width + 2
    }

    pub fn num_y(&self) -> usize {
        self.height + 2
    }

    pub fn stride(&self) -> usize {
        self.num_y()
    }

    pub fn size(&self) -> usize {
        self.num_x() * self.num_y()
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        i < self.num_x() && j < self.num_y()
    }

    pub fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(self.contains(i, j));
        i * self.stride() + j
    }

    pub fn checked_idx(&self, i: usize, j: usize) -> Result<usize, FluidError> {
        if self.contains(i, j) {
            Ok(i * self.stride() + j)
        } else {
            Err(FluidError::OutOfBounds {
                i,
                j,
                num_x: self.num_x(),
                num_y: self.num_y(),
            })
        }
    }

    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.stride(), index % self.stride())
    }

    pub fn u_position(&self, i: usize, j: usize) -> (f32, f32) {
        (i as f32 * self.h, (j as f32 + 0.5) * self.h)
    }

    pub fn v_position(&self, i: usize, j: usize) -> (f32, f32) {
        ((i as f32 + 0.5) * self.h, j as f32 * self.h)
    }

    pub fn cell_center(&self, i: usize, j: usize) -> (f32, f32) {
        ((i as f32 + 0.5) * self.h, (j as f32 + 0.5) * self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn padded_sizes() {
        let grid = FluidGrid::new(4, 3, 1.0);
        assert_eq!(grid.num_x(), 6);
        assert_eq!(grid.num_y(), 5);
        assert_eq!(grid.size(), 30);
        assert_eq!(grid.idx(1, 2), 7);
    }

    #[test]
    fn checked_idx_rejects_out_of_range() {
        let grid = FluidGrid::new(2, 2, 1.0);
        assert_eq!(grid.checked_idx(3, 3), Ok(15));
        assert_eq!(
            grid.checked_idx(4, 0),
            Err(FluidError::OutOfBounds {
                i: 4,
                j: 0,
                num_x: 4,
                num_y: 4,
            })
        );
        assert!(grid.checked_idx(0, 4).is_err());
    }

    #[test]
    #[should_panic(expected = "width must be > 0")]
    fn zero_width_panics() {
        FluidGrid::new(0, 4, 1.0);
    }

    #[test]
    fn staggered_positions() {
        let grid = FluidGrid::new(4, 4, 0.5);
        assert_eq!(grid.u_position(2, 1), (1.0, 0.75));
        assert_eq!(grid.v_position(2, 1), (1.25, 0.5));
        assert_eq!(grid.cell_center(2, 1), (1.25, 0.75));
    }

    proptest! {
        #[test]
        fn idx_is_a_bijection(width in 1usize..40, height in 1usize..40, a in 0usize..10_000, b in 0usize..10_000) {
            let grid = FluidGrid::new(width, height, 1.0);
            let i = a % grid.num_x();
            let j = b % grid.num_y();
            let index = grid.idx(i, j);
            prop_assert!(index < grid.size());
            prop_assert_eq!(grid.coords(index), (i, j));
        }
    }
}
