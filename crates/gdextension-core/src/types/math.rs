/// Floating point type the host uses for geometry (`real_t`).
#[cfg(not(feature = "double-precision"))]
pub type Real = f32;
/// Floating point type the host uses for geometry (`real_t`).
#[cfg(feature = "double-precision")]
pub type Real = f64;

/// Host-layout 2D vector, passed by pointer in ptrcalls.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: Real,
    pub y: Real,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    /// Builds a vector from `f64` components, narrowing to [`Real`] if needed.
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self {
            x: x as Real,
            y: y as Real,
        }
    }
}
