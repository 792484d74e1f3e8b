use crate::par::{for_each_row, should_parallel};
use crate::sample::{sample_field, FieldKind};
use crate::{CellMask, Field2, FluidGrid};

fn advect_u_row(
    grid: FluidGrid,
    i: usize,
    row: &mut [f32],
    u: &[f32],
    v: &[f32],
    s: &[u8],
    dt: f32,
) {
    if i == 0 {
        return;
    }
    let stride = grid.stride();
    for j in 1..=grid.height() {
        let c = i * stride + j;
        let left = c - stride;
        if s[c] == 0 || s[left] == 0 {
            continue;
        }
        let (x, y) = grid.u_position(i, j);
        let u_here = u[c];
        let v_here = (v[left] + v[c] + v[left + 1] + v[c + 1]) * 0.25;
        row[j] = sample_field(grid, u, x - dt * u_here, y - dt * v_here, FieldKind::U);
    }
}

fn advect_v_row(
    grid: FluidGrid,
    i: usize,
    row: &mut [f32],
    u: &[f32],
    v: &[f32],
    s: &[u8],
    dt: f32,
) {
    if i == 0 || i > grid.width() {
        return;
    }
    let stride = grid.stride();
    for j in 1..=grid.height() + 1 {
        let c = i * stride + j;
        let down = c - 1;
        if s[c] == 0 || s[down] == 0 {
            continue;
        }
        let (x, y) = grid.v_position(i, j);
        let u_here = (u[down] + u[c] + u[down + stride] + u[c + stride]) * 0.25;
        let v_here = v[c];
        row[j] = sample_field(grid, v, x - dt * u_here, y - dt * v_here, FieldKind::V);
    }
}

#[allow(clippy::too_many_arguments)]
fn advect_smoke_row(
    grid: FluidGrid,
    i: usize,
    row: &mut [f32],
    m: &[f32],
    u: &[f32],
    v: &[f32],
    s: &[u8],
    dt: f32,
) {
    if i == 0 || i > grid.width() {
        return;
    }
    let stride = grid.stride();
    for j in 1..=grid.height() {
        let c = i * stride + j;
        if s[c] == 0 {
            continue;
        }
        let (x, y) = grid.cell_center(i, j);
        let u_here = (u[c] + u[c + stride]) * 0.5;
        let v_here = (v[c] + v[c + 1]) * 0.5;
        row[j] = sample_field(grid, m, x - dt * u_here, y - dt * v_here, FieldKind::Scalar);
    }
}

/// `u_next`/`v_next` receive a full copy of the current field first; only faces whose two
/// adjacent cells are both fluid are then overwritten with the value read at the
/// backtracked position. All reads come from `u` and `v`, never from the outputs.
pub fn advect_velocity_into(
    u_next: &mut Field2,
    v_next: &mut Field2,
    u: &Field2,
    v: &Field2,
    mask: &CellMask,
    dt: f32,
) {
    let parallel = should_parallel(u.as_slice().len());
    advect_velocity_into_with(u_next, v_next, u, v, mask, dt, parallel);
}

fn advect_velocity_into_with(
    u_next: &mut Field2,
    v_next: &mut Field2,
    u: &Field2,
    v: &Field2,
    mask: &CellMask,
    dt: f32,
    parallel: bool,
) {
    let grid = mask.grid();
    debug_assert_eq!(u.grid(), grid, "u grid mismatch");
    debug_assert_eq!(v.grid(), grid, "v grid mismatch");
    u_next.copy_from(u);
    v_next.copy_from(v);
    if dt == 0.0 {
        return;
    }
    let stride = grid.stride();
    let s = mask.as_slice();
    let (u, v) = (u.as_slice(), v.as_slice());
    for_each_row(u_next.as_mut_slice(), stride, parallel, |i, row| {
        advect_u_row(grid, i, row, u, v, s, dt);
    });
    for_each_row(v_next.as_mut_slice(), stride, parallel, |i, row| {
        advect_v_row(grid, i, row, u, v, s, dt);
    });
}

pub fn advect_smoke_into(
    m_next: &mut Field2,
    m: &Field2,
    u: &Field2,
    v: &Field2,
    mask: &CellMask,
    dt: f32,
) {
    let parallel = should_parallel(m.as_slice().len());
    advect_smoke_into_with(m_next, m, u, v, mask, dt, parallel);
}

fn advect_smoke_into_with(
    m_next: &mut Field2,
    m: &Field2,
    u: &Field2,
    v: &Field2,
    mask: &CellMask,
    dt: f32,
    parallel: bool,
) {
    let grid = mask.grid();
    m_next.copy_from(m);
    if dt == 0.0 {
        return;
    }
    let s = mask.as_slice();
    let (m, u, v) = (m.as_slice(), u.as_slice(), v.as_slice());
    for_each_row(m_next.as_mut_slice(), grid.stride(), parallel, |i, row| {
        advect_smoke_row(grid, i, row, m, u, v, s, dt);
    });
}
