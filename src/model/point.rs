//! Image-space points and boundary helpers.

use serde::{Deserialize, Serialize};

/// A 2D point in image-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Build points from a flat `[x0, y0, x1, y1, ...]` coordinate list.
///
/// A trailing unpaired value is ignored.
pub fn points_from_flat(coords: &[f64]) -> Vec<Point> {
    coords
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect()
}

/// Count the points of a boundary, ignoring consecutive repeats and a closing
/// point that repeats the first one.
pub fn distinct_point_count(points: &[Point]) -> usize {
    let mut count = 0;
    let mut last: Option<&Point> = None;
    for p in points {
        if last != Some(p) {
            count += 1;
        }
        last = Some(p);
    }
    if count > 1 && points.first() == points.last() {
        count -= 1;
    }
    count
}
