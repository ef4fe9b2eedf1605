//! Display-to-image coordinate mapping.
//!
//! Pointer events arrive in viewport coordinates while the photograph may be
//! drawn larger or smaller than its native resolution. Every stored point is
//! converted to native image pixels first, so areas never depend on how the
//! image happened to be scaled on screen.

use crate::error::{MeasureError, MeasureResult};
use crate::model::Point;

/// Bounding box of the rendered image element in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayBounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bounds positioned at the viewport origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Native pixel dimensions of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeDimensions {
    pub width: u32,
    pub height: u32,
}

impl NativeDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Maps viewport pointer positions into image-pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    bounds: DisplayBounds,
    scale_x: f64,
    scale_y: f64,
}

impl CoordinateMapper {
    /// Create a mapper for an image of `native` size rendered into `bounds`.
    ///
    /// Fails with [`MeasureError::InvalidDisplayState`] when the rendered
    /// surface has no area.
    pub fn new(bounds: DisplayBounds, native: NativeDimensions) -> MeasureResult<Self> {
        if !bounds.is_usable() {
            return Err(MeasureError::InvalidDisplayState {
                width: bounds.width,
                height: bounds.height,
            });
        }

        Ok(Self {
            bounds,
            scale_x: f64::from(native.width) / bounds.width,
            scale_y: f64::from(native.height) / bounds.height,
        })
    }

    /// Convert a viewport position to image pixels.
    pub fn map(&self, client_x: f64, client_y: f64) -> Point {
        Point::new(
            (client_x - self.bounds.left) * self.scale_x,
            (client_y - self.bounds.top) * self.scale_y,
        )
    }

    /// Image pixels per display unit along each axis.
    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }
}

/// One-shot form of [`CoordinateMapper::map`].
pub fn map_to_image_space(
    client_x: f64,
    client_y: f64,
    bounds: DisplayBounds,
    native: NativeDimensions,
) -> MeasureResult<Point> {
    Ok(CoordinateMapper::new(bounds, native)?.map(client_x, client_y))
}
