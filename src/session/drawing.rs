//! Drawing tools and the in-progress stroke state machine.
//!
//! ```text
//!            stroke start (Reference)            stroke end
//!   Idle ─────────────────────────▶ CalibratingReference ─────▶ Idle
//!    │       stroke start (Freehand)             stroke end / cancel
//!    ├────────────────────────────▶ DrawingRegion ─────────────▶ Idle
//!    │       stroke start (Square)               stroke end / cancel
//!    └────────────────────────────▶ DrawingSquare ─────────────▶ Idle
//! ```
//!
//! Every stroke end returns to `Idle`, whether it produced a region, a new
//! calibration, or was discarded for having too few points.

use crate::model::Point;

/// Drawing tools available in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Draw the reference segment used for calibration
    Reference,
    /// Draw a freehand closed region
    #[default]
    Freehand,
    /// Drag an axis-aligned square region
    Square,
}

impl Tool {
    /// Get the display name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Reference => "Reference",
            Tool::Freehand => "Free Draw",
            Tool::Square => "Draw Square",
        }
    }
}

/// State of the stroke currently being drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawingState {
    /// Not currently drawing anything.
    #[default]
    Idle,
    /// Drawing the reference segment.
    CalibratingReference { points: Vec<Point> },
    /// Drawing a freehand region boundary.
    DrawingRegion { points: Vec<Point> },
    /// Dragging a square from `start` towards `current`.
    DrawingSquare { start: Point, current: Point },
}

impl DrawingState {
    /// Enter the drawing state for `tool`, starting at `point`.
    pub fn start(tool: Tool, point: Point) -> Self {
        match tool {
            Tool::Reference => DrawingState::CalibratingReference {
                points: vec![point],
            },
            Tool::Freehand => DrawingState::DrawingRegion {
                points: vec![point],
            },
            Tool::Square => DrawingState::DrawingSquare {
                start: point,
                current: point,
            },
        }
    }

    /// Feed a pointer sample into the stroke. Returns false when idle.
    pub fn extend(&mut self, point: Point) -> bool {
        match self {
            DrawingState::Idle => false,
            DrawingState::CalibratingReference { points } | DrawingState::DrawingRegion { points } => {
                points.push(point);
                true
            }
            DrawingState::DrawingSquare { current, .. } => {
                *current = point;
                true
            }
        }
    }

    /// Check if we're currently drawing something.
    pub fn is_drawing(&self) -> bool {
        !matches!(self, DrawingState::Idle)
    }

    /// Points to preview while drawing (the square's corners for square mode).
    pub fn preview_points(&self) -> Vec<Point> {
        match self {
            DrawingState::Idle => Vec::new(),
            DrawingState::CalibratingReference { points } | DrawingState::DrawingRegion { points } => {
                points.clone()
            }
            DrawingState::DrawingSquare { start, current } => square_from_drag(*start, *current)
                .map(|sq| sq.corners().to_vec())
                .unwrap_or_default(),
        }
    }
}

/// Axis-aligned square produced by a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraggedSquare {
    /// Corner where the drag started
    pub origin: Point,
    /// Side length in image pixels
    pub size: f64,
    /// Extent direction along x (+1 or -1)
    sign_x: f64,
    /// Extent direction along y (+1 or -1)
    sign_y: f64,
}

impl DraggedSquare {
    /// Corners in drawing order, starting at the drag origin.
    pub fn corners(&self) -> [Point; 4] {
        let Point { x, y } = self.origin;
        let dx = self.size * self.sign_x;
        let dy = self.size * self.sign_y;
        [
            Point::new(x, y),
            Point::new(x + dx, y),
            Point::new(x + dx, y + dy),
            Point::new(x, y + dy),
        ]
    }

    /// Exact area in square pixels.
    pub fn area(&self) -> f64 {
        self.size * self.size
    }
}

/// Square whose side is the larger drag extent, growing towards the pointer.
///
/// Returns None for a drag with no extent.
pub fn square_from_drag(start: Point, current: Point) -> Option<DraggedSquare> {
    let dx = current.x - start.x;
    let dy = current.y - start.y;
    let size = dx.abs().max(dy.abs());
    if !(size.is_finite() && size > 0.0) {
        return None;
    }

    let direction = |d: f64| if d < 0.0 { -1.0 } else { 1.0 };
    Some(DraggedSquare {
        origin: start,
        size,
        sign_x: direction(dx),
        sign_y: direction(dy),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_per_tool() {
        let p = Point::new(1.0, 2.0);
        assert!(matches!(
            DrawingState::start(Tool::Reference, p),
            DrawingState::CalibratingReference { .. }
        ));
        assert!(matches!(
            DrawingState::start(Tool::Freehand, p),
            DrawingState::DrawingRegion { .. }
        ));
        assert!(matches!(
            DrawingState::start(Tool::Square, p),
            DrawingState::DrawingSquare { .. }
        ));
    }

    #[test]
    fn test_extend() {
        let mut state = DrawingState::Idle;
        assert!(!state.extend(Point::new(0.0, 0.0)));
        assert!(!state.is_drawing());

        let mut state = DrawingState::start(Tool::Freehand, Point::new(0.0, 0.0));
        assert!(state.extend(Point::new(1.0, 0.0)));
        assert!(state.extend(Point::new(1.0, 1.0)));
        assert_eq!(state.preview_points().len(), 3);
    }

    #[test]
    fn test_square_from_drag() {
        let sq = square_from_drag(Point::new(10.0, 10.0), Point::new(40.0, 20.0)).unwrap();
        assert_eq!(sq.size, 30.0);
        assert_eq!(sq.area(), 900.0);
        assert_eq!(
            sq.corners(),
            [
                Point::new(10.0, 10.0),
                Point::new(40.0, 10.0),
                Point::new(40.0, 40.0),
                Point::new(10.0, 40.0),
            ]
        );
    }

    #[test]
    fn test_square_grows_towards_pointer() {
        let sq = square_from_drag(Point::new(50.0, 50.0), Point::new(45.0, 30.0)).unwrap();
        assert_eq!(sq.size, 20.0);
        assert_eq!(sq.corners()[2], Point::new(30.0, 30.0));
    }

    #[test]
    fn test_zero_drag_is_not_a_square() {
        let p = Point::new(5.0, 5.0);
        assert!(square_from_drag(p, p).is_none());

        let state = DrawingState::start(Tool::Square, p);
        assert!(state.preview_points().is_empty());
    }
}
