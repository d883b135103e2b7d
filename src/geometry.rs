//! Points and line segments making up a bolt.
//!
//! Coordinates are meters in `f64`. The z axis points up and the ground is
//! the plane `z = 0`.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A position in space, in meters.
pub type Point3 = DVec3;

/// Straight-line distance between two points.
#[inline]
pub fn distance(a: Point3, b: Point3) -> f64 {
    a.distance(b)
}

/// One straight piece of a lightning channel.
///
/// The endpoints are kept in the order they were produced; no direction is
/// implied beyond that.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Point3,
    pub b: Point3,
}

impl Segment {
    pub fn new(a: Point3, b: Point3) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        distance(self.a, self.b)
    }

    #[inline]
    pub fn midpoint(&self) -> Point3 {
        (self.a + self.b) * 0.5
    }
}
