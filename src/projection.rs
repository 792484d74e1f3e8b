use crate::{CellMask, Field2, FluidGrid, FluidParams};

pub fn divergence_at(u: &Field2, v: &Field2, i: usize, j: usize) -> f32 {
    let grid = u.grid();
    let u = u.as_slice();
    let v = v.as_slice();
    let c = grid.idx(i, j);
    let right = grid.idx(i + 1, j);
    let up = grid.idx(i, j + 1);
    u[right] - u[c] + v[up] - v[c]
}

pub fn max_abs_divergence(u: &Field2, v: &Field2, mask: &CellMask) -> f32 {
    let grid = u.grid();
    let mut max_div = 0.0_f32;
    for i in 1..=grid.width() {
        for j in 1..=grid.height() {
            if mask.get(i, j) == 0 {
                continue;
            }
            max_div = max_div.max(divergence_at(u, v, i, j).abs());
        }
    }
    max_div
}

/// In-place Gauss-Seidel sweeps. Pressure accumulates into `p`; the caller zeroes it.
pub fn solve_incompressibility(
    u: &mut Field2,
    v: &mut Field2,
    p: &mut Field2,
    mask: &CellMask,
    params: &FluidParams,
    dt: f32,
    iterations: usize,
) {
    let grid: FluidGrid = mask.grid();
    debug_assert_eq!(u.grid(), grid, "u grid mismatch");
    debug_assert_eq!(v.grid(), grid, "v grid mismatch");
    debug_assert_eq!(p.grid(), grid, "pressure grid mismatch");
    if iterations == 0 || dt <= 0.0 {
        return;
    }
    let stride = grid.stride();
    let cp = params.density * grid.h() / dt;
    let omega = params.over_relaxation;
    let s = mask.as_slice();
    let u = u.as_mut_slice();
    let v = v.as_mut_slice();
    let p = p.as_mut_slice();

    for _ in 0..iterations {
        for i in 1..=grid.width() {
            for j in 1..=grid.height() {
                let c = i * stride + j;
                if s[c] == 0 {
                    continue;
                }
                let left = c - stride;
                let right = c + stride;
                let down = c - 1;
                let up = c + 1;

                let s_left = f32::from(s[left]);
                let s_right = f32::from(s[right]);
                let s_down = f32::from(s[down]);
                let s_up = f32::from(s[up]);
                let s_factor = s_left + s_right + s_down + s_up;
                // Walled in on all four sides: nothing can absorb the flux.
                if s_factor == 0.0 {
                    continue;
                }

                let d = u[right] - u[c] + v[up] - v[c];
                let corr = -d / s_factor * omega;
                p[c] += corr * cp;

                u[c] -= s_left * corr;
                u[right] += s_right * corr;
                v[c] -= s_down * corr;
                v[up] += s_up * corr;
            }
        }
    }
}
