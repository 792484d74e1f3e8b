use crate::grid::FluidGrid;
use crate::par::should_parallel;
use crate::FluidError;
use rayon::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct Field2 {
    grid: FluidGrid,
    data: Vec<f32>,
}

impl Field2 {
    pub fn new(grid: FluidGrid, fill: f32) -> Self {
        let data = vec![fill; grid.size()];
        Self { grid, data }
    }

    pub fn from_fn(grid: FluidGrid, f: impl Fn(usize, usize) -> f32 + Sync) -> Self {
        let mut field = Self::new(grid, 0.0);
        field.fill_with_index(f);
        field
    }

    pub fn grid(&self) -> FluidGrid {
        self.grid
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.assert_in_range(i, j);
        self.data[self.grid.idx(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f32) {
        self.assert_in_range(i, j);
        let index = self.grid.idx(i, j);
        self.data[index] = value;
    }

    pub fn try_get(&self, i: usize, j: usize) -> Result<f32, FluidError> {
        Ok(self.data[self.grid.checked_idx(i, j)?])
    }

    pub fn try_set(&mut self, i: usize, j: usize, value: f32) -> Result<(), FluidError> {
        let index = self.grid.checked_idx(i, j)?;
        self.data[index] = value;
        Ok(())
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    pub fn fill_with_index(&mut self, f: impl Fn(usize, usize) -> f32 + Sync) {
        let stride = self.grid.stride();
        if should_parallel(self.data.len()) {
            self.data.par_iter_mut().enumerate().for_each(|(n, value)| {
                *value = f(n / stride, n % stride);
            });
        } else {
            for (n, value) in self.data.iter_mut().enumerate() {
                *value = f(n / stride, n % stride);
            }
        }
    }

    pub fn copy_from(&mut self, other: &Self) {
        assert_eq!(self.grid, other.grid, "field grid mismatch");
        self.data.copy_from_slice(&other.data);
    }

    pub fn sum(&self) -> f32 {
        if should_parallel(self.data.len()) {
            self.data.par_iter().sum()
        } else {
            self.data.iter().sum()
        }
    }

    pub fn abs_sum(&self) -> f32 {
        if should_parallel(self.data.len()) {
            self.data.par_iter().map(|value| value.abs()).sum()
        } else {
            self.data.iter().map(|value| value.abs()).sum()
        }
    }

    pub fn max_abs(&self) -> f32 {
        if should_parallel(self.data.len()) {
            self.data
                .par_iter()
                .map(|value| value.abs())
                .reduce(|| 0.0_f32, f32::max)
        } else {
            self.data
                .iter()
                .map(|value| value.abs())
                .fold(0.0_f32, f32::max)
        }
    }

    pub fn min_max(&self) -> (f32, f32) {
        let mut iter = self.data.iter().filter(|value| value.is_finite());
        let Some(first) = iter.next() else {
            return (0.0, 0.0);
        };
        let mut min_value = *first;
        let mut max_value = *first;
        for value in iter {
            if *value < min_value {
                min_value = *value;
            }
            if *value > max_value {
                max_value = *value;
            }
        }
        (min_value, max_value)
    }

    pub fn normalized(&self, scale: f32) -> Vec<f32> {
        let inv = if scale != 0.0 { 1.0 / scale } else { 0.0 };
        self.data
            .iter()
            .map(|value| {
                let t = value * inv;
                if t.is_finite() {
                    t.clamp(0.0, 1.0)
                } else {
                    0.0
                }
            })
            .collect()
    }

    fn assert_in_range(&self, i: usize, j: usize) {
        assert!(
            self.grid.contains(i, j),
            "cell ({i}, {j}) outside padded {}x{} grid",
            self.grid.num_x(),
            self.grid.num_y()
        );
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CellMask {
    grid: FluidGrid,
    data: Vec<u8>,
}

impl CellMask {
    pub fn new(grid: FluidGrid) -> Self {
        Self {
            grid,
            data: vec![0; grid.size()],
        }
    }

    pub fn from_fn(grid: FluidGrid, f: impl Fn(usize, usize) -> bool) -> Self {
        let stride = grid.stride();
        let data = (0..grid.size())
            .map(|n| u8::from(f(n / stride, n % stride)))
            .collect();
        Self { grid, data }
    }

    pub fn grid(&self) -> FluidGrid {
        self.grid
    }

    pub fn get(&self, i: usize, j: usize) -> u8 {
        assert!(
            self.grid.contains(i, j),
            "cell ({i}, {j}) outside padded {}x{} grid",
            self.grid.num_x(),
            self.grid.num_y()
        );
        self.data[self.grid.idx(i, j)]
    }

    pub fn is_fluid(&self, i: usize, j: usize) -> bool {
        self.get(i, j) != 0
    }

    pub fn set(&mut self, i: usize, j: usize, fluid: bool) {
        assert!(
            self.grid.contains(i, j),
            "cell ({i}, {j}) outside padded {}x{} grid",
            self.grid.num_x(),
            self.grid.num_y()
        );
        let index = self.grid.idx(i, j);
        self.data[index] = u8::from(fluid);
    }

    pub fn try_set(&mut self, i: usize, j: usize, fluid: bool) -> Result<(), FluidError> {
        let index = self.grid.checked_idx(i, j)?;
        self.data[index] = u8::from(fluid);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn fluid_count(&self) -> usize {
        self.data.iter().filter(|value| **value != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    #[test]
    fn from_fn_maps_padded_coords() {
        let grid = FluidGrid::new(3, 2, 1.0);
        let field = Field2::from_fn(grid, |i, j| (i * 10 + j) as f32);
        assert_close(field.get(4, 3), 43.0, 1e-6);
        assert_close(field.as_slice()[grid.idx(2, 1)], 21.0, 1e-6);
    }

    #[test]
    #[should_panic(expected = "outside padded")]
    fn get_out_of_range_panics() {
        let grid = FluidGrid::new(2, 2, 1.0);
        let field = Field2::new(grid, 0.0);
        // j = 4 would alias into the next row without the range check.
        field.get(0, 4);
    }

    #[test]
    fn try_set_reports_out_of_bounds() {
        let grid = FluidGrid::new(2, 2, 1.0);
        let mut field = Field2::new(grid, 0.0);
        assert!(field.try_set(1, 1, 2.0).is_ok());
        assert_close(field.get(1, 1), 2.0, 1e-6);
        assert!(matches!(
            field.try_set(1, 7, 1.0),
            Err(FluidError::OutOfBounds { i: 1, j: 7, .. })
        ));
        assert_close(field.sum(), 2.0, 1e-6);
    }

    #[test]
    fn try_get_matches_get_in_range() {
        let grid = FluidGrid::new(3, 2, 1.0);
        let field = Field2::from_fn(grid, |i, j| (i * 10 + j) as f32);
        assert_eq!(field.try_get(4, 3), Ok(43.0));
        assert_eq!(field.try_get(2, 1), Ok(field.get(2, 1)));
        assert_eq!(
            field.try_get(5, 0),
            Err(FluidError::OutOfBounds {
                i: 5,
                j: 0,
                num_x: 5,
                num_y: 4,
            })
        );
    }

    #[test]
    fn max_abs_picks_largest_magnitude() {
        let grid = FluidGrid::new(2, 2, 1.0);
        let mut field = Field2::new(grid, 0.25);
        field.set(1, 2, -3.5);
        field.set(2, 1, 2.0);
        assert_eq!(field.max_abs(), 3.5);
        assert_eq!(Field2::new(grid, 0.0).max_abs(), 0.0);
    }

    #[test]
    fn min_max_skips_non_finite() {
        let grid = FluidGrid::new(1, 1, 1.0);
        let mut field = Field2::new(grid, 0.5);
        field.set(0, 0, -2.0);
        field.set(2, 2, f32::NAN);
        field.set(1, 1, 3.0);
        assert_eq!(field.min_max(), (-2.0, 3.0));
    }

    #[test]
    fn normalized_clamps_into_unit_range() {
        let grid = FluidGrid::new(1, 1, 1.0);
        let mut field = Field2::new(grid, 5.0);
        field.set(0, 0, 20.0);
        field.set(0, 1, -3.0);
        let normalized = field.normalized(10.0);
        assert_close(normalized[grid.idx(0, 0)], 1.0, 1e-6);
        assert_close(normalized[grid.idx(0, 1)], 0.0, 1e-6);
        assert_close(normalized[grid.idx(1, 1)], 0.5, 1e-6);
    }

    #[test]
    fn mask_stores_zero_or_one() {
        let grid = FluidGrid::new(3, 3, 1.0);
        let mut mask = CellMask::new(grid);
        assert_eq!(mask.fluid_count(), 0);
        mask.set(2, 2, true);
        assert_eq!(mask.get(2, 2), 1);
        assert!(!mask.is_fluid(1, 2));
        let walled = CellMask::from_fn(grid, |i, j| i > 0 && j > 0 && i < 4 && j < 4);
        assert_eq!(walled.fluid_count(), 9);
    }
}
