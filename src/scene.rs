use crate::{Fluid, FluidGrid};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scene {
    Tank,
    /// Open on the right.
    WindTunnel { inflow: f32 },
}

impl Scene {
    pub fn is_wall(&self, grid: FluidGrid, i: usize, j: usize) -> bool {
        let bottom_or_top = j == 0 || j == grid.num_y() - 1;
        match self {
            Scene::Tank => i == 0 || i == grid.num_x() - 1 || bottom_or_top,
            Scene::WindTunnel { .. } => i == 0 || bottom_or_top,
        }
    }

    pub fn setup(&self, fluid: &mut Fluid) {
        let grid = fluid.grid();
        for i in 0..grid.num_x() {
            for j in 0..grid.num_y() {
                fluid.set_fluid(i, j, !self.is_wall(grid, i, j));
            }
        }
        self.apply_sources(fluid);
        log::debug!("scene {:?}: {} fluid cells", self, fluid.cell_mask().fluid_count());
    }

    /// Call once per frame before advancing.
    pub fn apply_sources(&self, fluid: &mut Fluid) {
        let Scene::WindTunnel { inflow } = *self else {
            return;
        };
        let height = fluid.height();
        for j in 1..=height {
            fluid.set_u(1, j, inflow);
        }
        for j in smoke_band(height) {
            fluid.set_smoke(1, j, 1.0);
        }
    }
}

fn smoke_band(height: usize) -> std::ops::RangeInclusive<usize> {
    let half = (height / 10).max(1);
    let center = height / 2 + 1;
    center.saturating_sub(half).max(1)..=(center + half).min(height)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub center: (f32, f32),
    pub radius: f32,
    pub velocity: (f32, f32),
}

impl Obstacle {
    pub fn new(center: (f32, f32), radius: f32) -> Self {
        assert!(radius > 0.0 && radius.is_finite(), "radius must be > 0");
        Self {
            center,
            radius,
            velocity: (0.0, 0.0),
        }
    }

    pub fn covers(&self, grid: FluidGrid, i: usize, j: usize) -> bool {
        let (x, y) = grid.cell_center(i, j);
        let dx = x - self.center.0;
        let dy = y - self.center.1;
        dx * dx + dy * dy < self.radius * self.radius
    }

    /// Non-wall cells outside the disk become fluid again, so a moved obstacle leaves no trail.
    pub fn stamp(&self, fluid: &mut Fluid, scene: Scene) {
        let grid = fluid.grid();
        let (vx, vy) = self.velocity;
        let mut covered = 0usize;
        for i in 1..=grid.width() {
            for j in 1..=grid.height() {
                if scene.is_wall(grid, i, j) {
                    fluid.set_fluid(i, j, false);
                    continue;
                }
                if self.covers(grid, i, j) {
                    fluid.set_fluid(i, j, false);
                    fluid.set_u(i, j, vx);
                    fluid.set_u(i + 1, j, vx);
                    fluid.set_v(i, j, vy);
                    fluid.set_v(i, j + 1, vy);
                    covered += 1;
                } else {
                    fluid.set_fluid(i, j, true);
                }
            }
        }
        log::trace!(
            "obstacle at ({:.2}, {:.2}) r={:.2} covers {covered} cells",
            self.center.0,
            self.center.1,
            self.radius
        );
    }

    pub fn move_to(&mut self, center: (f32, f32), dt: f32) {
        self.velocity = if dt > 0.0 {
            (
                (center.0 - self.center.0) / dt,
                (center.1 - self.center.1) / dt,
            )
        } else {
            (0.0, 0.0)
        };
        self.center = center;
    }

    pub fn release(&mut self) {
        self.velocity = (0.0, 0.0);
    }
}
