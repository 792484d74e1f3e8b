use crate::Field2;

/// Copies tangential interior velocities into the ghost ring; wall-normal faces are left as is.
pub fn extrapolate(u: &mut Field2, v: &mut Field2) {
    let grid = u.grid();
    debug_assert_eq!(v.grid(), grid, "velocity grid mismatch");
    let num_x = grid.num_x();
    let num_y = grid.num_y();
    let stride = grid.stride();

    let u = u.as_mut_slice();
    for i in 0..num_x {
        let row = i * stride;
        u[row] = u[row + 1];
        u[row + num_y - 1] = u[row + num_y - 2];
    }

    let v = v.as_mut_slice();
    for j in 0..num_y {
        v[j] = v[stride + j];
        v[(num_x - 1) * stride + j] = v[(num_x - 2) * stride + j];
    }
}
