mod advection;
mod boundary;
mod error;
mod field;
mod fluid;
mod grid;
mod par;
mod params;
mod projection;
mod sample;
mod scene;

pub use advection::{advect_smoke_into, advect_velocity_into};
pub use boundary::extrapolate;
pub use error::FluidError;
pub use field::{CellMask, Field2};
pub use fluid::{Fluid, FluidStats};
pub use grid::FluidGrid;
pub use params::FluidParams;
pub use projection::{divergence_at, max_abs_divergence, solve_incompressibility};
pub use sample::{sample_field, FieldKind};
pub use scene::{Obstacle, Scene};
