use crate::{Field2, FluidGrid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    U,
    V,
    Scalar,
}

impl FieldKind {
    pub fn offset(self, h: f32) -> (f32, f32) {
        let half = 0.5 * h;
        match self {
            FieldKind::U => (0.0, half),
            FieldKind::V => (half, 0.0),
            FieldKind::Scalar => (half, half),
        }
    }
}

/// The position is clamped into `[h, num * h]` first, so a backtracked point that leaves the
/// domain reads the outermost samples instead of running past the ghost ring.
pub fn sample_field(grid: FluidGrid, field: &[f32], x: f32, y: f32, kind: FieldKind) -> f32 {
    debug_assert_eq!(field.len(), grid.size());
    let h = grid.h();
    let inv_h = 1.0 / h;
    let num_x = grid.num_x();
    let num_y = grid.num_y();
    let stride = grid.stride();

    let x = x.clamp(h, num_x as f32 * h);
    let y = y.clamp(h, num_y as f32 * h);
    let (dx, dy) = kind.offset(h);

    let x0 = (((x - dx) * inv_h).floor() as usize).min(num_x - 1);
    let tx = ((x - dx) - x0 as f32 * h) * inv_h;
    let x1 = (x0 + 1).min(num_x - 1);

    let y0 = (((y - dy) * inv_h).floor() as usize).min(num_y - 1);
    let ty = ((y - dy) - y0 as f32 * h) * inv_h;
    let y1 = (y0 + 1).min(num_y - 1);

    // Rounding in x * inv_h leaves weights a few ulps off 0 or 1 at sample points.
    let snap_eps = 8.0 * f32::EPSILON * num_x.max(num_y) as f32;
    let tx = snap_weight(tx, snap_eps);
    let ty = snap_weight(ty, snap_eps);
    let sx = 1.0 - tx;
    let sy = 1.0 - ty;

    sx * sy * field[x0 * stride + y0]
        + tx * sy * field[x1 * stride + y0]
        + tx * ty * field[x1 * stride + y1]
        + sx * ty * field[x0 * stride + y1]
}

fn snap_weight(t: f32, eps: f32) -> f32 {
    if t < eps {
        0.0
    } else if t > 1.0 - eps {
        1.0
    } else {
        t
    }
}

impl Field2 {
    pub fn sample(&self, x: f32, y: f32, kind: FieldKind) -> f32 {
        sample_field(self.grid(), self.as_slice(), x, y, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    fn ramp(grid: FluidGrid) -> Field2 {
        Field2::from_fn(grid, |i, j| i as f32 * 3.0 + j as f32 * 0.5)
    }

    #[test]
    fn offsets_follow_staggering() {
        assert_eq!(FieldKind::U.offset(2.0), (0.0, 1.0));
        assert_eq!(FieldKind::V.offset(2.0), (1.0, 0.0));
        assert_eq!(FieldKind::Scalar.offset(2.0), (1.0, 1.0));
    }

    #[test]
    fn scalar_samples_cell_centers() {
        let grid = FluidGrid::new(4, 4, 1.0);
        let field = ramp(grid);
        let (x, y) = grid.cell_center(2, 3);
        assert_close(field.sample(x, y, FieldKind::Scalar), field.get(2, 3), 1e-6);
    }

    #[test]
    fn v_samples_bottom_faces() {
        let grid = FluidGrid::new(4, 4, 1.0);
        let field = ramp(grid);
        let (x, y) = grid.v_position(3, 2);
        assert_close(field.sample(x, y, FieldKind::V), field.get(3, 2), 1e-6);
    }

    #[test]
    fn blends_between_faces() {
        let grid = FluidGrid::new(4, 4, 1.0);
        let field = ramp(grid);
        // Halfway between u[2, 1] and u[3, 2].
        let value = field.sample(2.5, 2.0, FieldKind::U);
        let expected = 0.25 * (field.get(2, 1) + field.get(3, 1) + field.get(2, 2) + field.get(3, 2));
        assert_close(value, expected, 1e-5);
    }

    #[test]
    fn clamps_positions_outside_domain() {
        let grid = FluidGrid::new(3, 3, 1.0);
        let field = ramp(grid);
        let far = field.sample(100.0, -50.0, FieldKind::Scalar);
        let edge = field.sample(grid.num_x() as f32, 1.0, FieldKind::Scalar);
        assert_close(far, edge, 1e-6);
        assert!(far.is_finite());
    }

    #[test]
    fn clamps_last_index_instead_of_wrapping() {
        let grid = FluidGrid::new(2, 2, 1.0);
        let field = Field2::from_fn(grid, |i, _| if i == grid.num_x() - 1 { 7.0 } else { 0.0 });
        // x = num_x puts x0 on the last column; x1 must duplicate it.
        let value = field.sample(grid.num_x() as f32, 2.0, FieldKind::U);
        assert_close(value, 7.0, 1e-6);
    }

    #[test]
    fn face_samples_are_exact_for_non_unit_spacing() {
        for h in [0.1, 0.3, 0.7, 1.7] {
            let grid = FluidGrid::new(10, 10, h);
            let field = Field2::from_fn(grid, |i, j| (i * 13 + j * 7) as f32 * 0.37 - 4.0);
            for i in 1..=11 {
                for j in 1..=10 {
                    let (x, y) = grid.u_position(i, j);
                    assert_eq!(field.sample(x, y, FieldKind::U), field.get(i, j), "h={h} u({i}, {j})");
                    let (x, y) = grid.v_position(j, i);
                    assert_eq!(field.sample(x, y, FieldKind::V), field.get(j, i), "h={h} v({j}, {i})");
                }
            }
        }
    }

    proptest! {
        #[test]
        fn u_sample_at_own_face_is_exact(i in 1usize..=11, j in 1usize..=11, seed in 0u32..1000) {
            let grid = FluidGrid::new(10, 10, 1.0);
            let field = Field2::from_fn(grid, |a, b| ((a * 31 + b * 17) as u32 ^ seed) as f32 * 0.01);
            let (x, y) = grid.u_position(i, j);
            prop_assert_eq!(field.sample(x, y, FieldKind::U), field.get(i, j));
        }
    }
}
