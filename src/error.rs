#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FluidError {
    #[error("cell ({i}, {j}) is outside the padded {num_x}x{num_y} grid")]
    OutOfBounds {
        i: usize,
        j: usize,
        num_x: usize,
        num_y: usize,
    },
    #[error("grid interior must be at least 1x1, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}
