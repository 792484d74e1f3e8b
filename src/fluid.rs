use crate::advection::{advect_smoke_into, advect_velocity_into};
use crate::boundary::extrapolate;
use crate::projection::{self, max_abs_divergence};
use crate::sample::FieldKind;
use crate::{CellMask, Field2, FluidError, FluidGrid, FluidParams};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FluidStats {
    pub max_speed: f32,
    pub max_face_velocity: f32,
    pub max_divergence: f32,
    pub smoke_sum: f32,
    pub pressure_min: f32,
    pub pressure_max: f32,
}

impl fmt::Display for FluidStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max_speed={:.4} max_face={:.4} max_div={:.3e} smoke={:.3} p=[{:.3}, {:.3}]",
            self.max_speed,
            self.max_face_velocity,
            self.max_divergence,
            self.smoke_sum,
            self.pressure_min,
            self.pressure_max
        )
    }
}

/// Buffers are allocated once and never resized. The mask starts out all solid.
#[derive(Clone, Debug)]
pub struct Fluid {
    grid: FluidGrid,
    params: FluidParams,
    mask: CellMask,
    u: Field2,
    v: Field2,
    p: Field2,
    m: Field2,
    u_next: Field2,
    v_next: Field2,
    m_next: Field2,
}

impl Fluid {
    pub fn new(width: usize, height: usize, params: FluidParams) -> Result<Self, FluidError> {
        if width == 0 || height == 0 {
            return Err(FluidError::InvalidDimensions { width, height });
        }
        params.validate()?;
        let grid = FluidGrid::new(width, height, params.cell_size);
        log::debug!(
            "fluid {}x{} (padded {}x{}), h={}, omega={}",
            width,
            height,
            grid.num_x(),
            grid.num_y(),
            grid.h(),
            params.over_relaxation
        );
        Ok(Self {
            grid,
            params,
            mask: CellMask::new(grid),
            u: Field2::new(grid, 0.0),
            v: Field2::new(grid, 0.0),
            p: Field2::new(grid, 0.0),
            m: Field2::new(grid, 0.0),
            u_next: Field2::new(grid, 0.0),
            v_next: Field2::new(grid, 0.0),
            m_next: Field2::new(grid, 0.0),
        })
    }

    pub fn from_parts(
        width: usize,
        height: usize,
        gravity: f32,
        density: f32,
        over_relaxation: f32,
    ) -> Result<Self, FluidError> {
        let params = FluidParams {
            gravity,
            density,
            over_relaxation,
            ..FluidParams::default()
        };
        Self::new(width, height, params)
    }

    pub fn grid(&self) -> FluidGrid {
        self.grid
    }

    pub fn params(&self) -> &FluidParams {
        &self.params
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn set_fluid(&mut self, i: usize, j: usize, fluid: bool) {
        self.mask.set(i, j, fluid);
    }

    pub fn try_set_fluid(&mut self, i: usize, j: usize, fluid: bool) -> Result<(), FluidError> {
        self.mask.try_set(i, j, fluid)
    }

    pub fn set_smoke(&mut self, i: usize, j: usize, value: f32) {
        self.m.set(i, j, value);
    }

    pub fn try_set_smoke(&mut self, i: usize, j: usize, value: f32) -> Result<(), FluidError> {
        self.m.try_set(i, j, value)
    }

    pub fn set_u(&mut self, i: usize, j: usize, value: f32) {
        self.u.set(i, j, value);
    }

    pub fn try_set_u(&mut self, i: usize, j: usize, value: f32) -> Result<(), FluidError> {
        self.u.try_set(i, j, value)
    }

    pub fn set_v(&mut self, i: usize, j: usize, value: f32) {
        self.v.set(i, j, value);
    }

    pub fn try_set_v(&mut self, i: usize, j: usize, value: f32) -> Result<(), FluidError> {
        self.v.try_set(i, j, value)
    }

    pub fn mask(&self, i: usize, j: usize) -> u8 {
        self.mask.get(i, j)
    }

    pub fn is_fluid(&self, i: usize, j: usize) -> bool {
        self.mask.is_fluid(i, j)
    }

    pub fn u(&self, i: usize, j: usize) -> f32 {
        self.u.get(i, j)
    }

    pub fn v(&self, i: usize, j: usize) -> f32 {
        self.v.get(i, j)
    }

    pub fn smoke(&self, i: usize, j: usize) -> f32 {
        self.m.get(i, j)
    }

    pub fn pressure(&self, i: usize, j: usize) -> f32 {
        self.p.get(i, j)
    }

    pub fn pressure_field(&self) -> &[f32] {
        self.p.as_slice()
    }

    pub fn smoke_field(&self) -> &[f32] {
        self.m.as_slice()
    }

    pub fn u_field(&self) -> &[f32] {
        self.u.as_slice()
    }

    pub fn v_field(&self) -> &[f32] {
        self.v.as_slice()
    }

    pub fn cell_mask(&self) -> &CellMask {
        &self.mask
    }

    pub fn pressure_grid(&self) -> &Field2 {
        &self.p
    }

    pub fn smoke_grid(&self) -> &Field2 {
        &self.m
    }

    /// `gravity` is a magnitude pulling toward -y. A zero `dt` leaves every field untouched.
    pub fn advance(&mut self, dt: f32, iterations: usize, gravity: f32) {
        assert!(
            dt.is_finite() && dt >= 0.0,
            "dt must be finite and >= 0, got {dt}"
        );
        log::trace!("advance dt={dt} iterations={iterations} gravity={gravity}");
        if dt == 0.0 {
            return;
        }
        self.integrate_gravity(dt, gravity);
        self.p.fill(0.0);
        self.solve_incompressibility(dt, iterations);
        self.extrapolate();
        self.advect_velocity(dt);
        self.advect_smoke(dt);
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("step: {}", self.stats());
        }
    }

    pub fn step(&mut self, dt: f32, iterations: usize) {
        self.advance(dt, iterations, self.params.gravity);
    }

    pub fn integrate_gravity(&mut self, dt: f32, gravity: f32) {
        let stride = self.grid.stride();
        let s = self.mask.as_slice();
        let v = self.v.as_mut_slice();
        for i in 1..self.grid.num_x() {
            for j in 1..=self.grid.height() {
                let c = i * stride + j;
                if s[c] != 0 && s[c - 1] != 0 {
                    v[c] -= gravity * dt;
                }
            }
        }
    }

    pub fn solve_incompressibility(&mut self, dt: f32, iterations: usize) {
        projection::solve_incompressibility(
            &mut self.u,
            &mut self.v,
            &mut self.p,
            &self.mask,
            &self.params,
            dt,
            iterations,
        );
    }

    pub fn extrapolate(&mut self) {
        extrapolate(&mut self.u, &mut self.v);
    }

    pub fn advect_velocity(&mut self, dt: f32) {
        advect_velocity_into(
            &mut self.u_next,
            &mut self.v_next,
            &self.u,
            &self.v,
            &self.mask,
            dt,
        );
        std::mem::swap(&mut self.u, &mut self.u_next);
        std::mem::swap(&mut self.v, &mut self.v_next);
    }

    pub fn advect_smoke(&mut self, dt: f32) {
        advect_smoke_into(&mut self.m_next, &self.m, &self.u, &self.v, &self.mask, dt);
        std::mem::swap(&mut self.m, &mut self.m_next);
    }

    pub fn max_divergence(&self) -> f32 {
        max_abs_divergence(&self.u, &self.v, &self.mask)
    }

    pub fn stats(&self) -> FluidStats {
        let stride = self.grid.stride();
        let s = self.mask.as_slice();
        let (u, v, m) = (self.u.as_slice(), self.v.as_slice(), self.m.as_slice());
        let mut max_speed = 0.0_f32;
        let mut smoke_sum = 0.0_f32;
        for i in 1..=self.grid.width() {
            for j in 1..=self.grid.height() {
                let c = i * stride + j;
                if s[c] == 0 {
                    continue;
                }
                let uc = 0.5 * (u[c] + u[c + stride]);
                let vc = 0.5 * (v[c] + v[c + 1]);
                max_speed = max_speed.max((uc * uc + vc * vc).sqrt());
                smoke_sum += m[c];
            }
        }
        let (pressure_min, pressure_max) = self.p.min_max();
        FluidStats {
            max_speed,
            max_face_velocity: self.u.max_abs().max(self.v.max_abs()),
            max_divergence: self.max_divergence(),
            smoke_sum,
            pressure_min,
            pressure_max,
        }
    }

    pub fn sample_velocity(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.u.sample(x, y, FieldKind::U),
            self.v.sample(x, y, FieldKind::V),
        )
    }

    pub fn sample_smoke(&self, x: f32, y: f32) -> f32 {
        self.m.sample(x, y, FieldKind::Scalar)
    }
}
