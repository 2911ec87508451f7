//! Ellipse ring geometry
//!
//! The ring lies in the vertical plane perpendicular to the robot's base
//! rotation. With `θ = base + π/2` and the sweep parameter `a`:
//!
//! ```text
//! dx = cos(a) · rH · cos(θ)
//! dy = cos(a) · rH · sin(θ)
//! dz = sin(-a) · rV
//! ```
//!
//! `a` starts at `-π` and advances by `2π/N` *before* each point, so the
//! first point sits at `-π + 2π/N` and the last at `π`.

use ellipsekit_core::{EllipseParameters, Pose, Waypoint};
use nalgebra::{Vector2, Vector3};
use std::f64::consts::{FRAC_PI_2, PI};
use std::iter::FusedIterator;

/// One point of the ring relative to the center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingOffset {
    /// Position in the ring, 0-based
    pub index: usize,
    /// Sweep parameter of this point (rad)
    pub angle: f64,
    /// Displacement from the center (m)
    pub offset: Vector3<f64>,
}

/// Unit vector of the horizontal ellipse axis for a base joint angle
pub fn plane_direction(base_angle: f64) -> Vector2<f64> {
    let theta = base_angle + FRAC_PI_2;
    Vector2::new(theta.cos(), theta.sin())
}

/// Offsets of an `N`-point ring
///
/// Finite and pure: the same inputs always yield the same sequence. Create a
/// new iterator for every pass.
#[derive(Debug, Clone)]
pub struct RingOffsets {
    next: usize,
    count: usize,
    step: f64,
    horizontal: Vector2<f64>,
    vertical_radius: f64,
}

impl RingOffsets {
    /// Ring for the given parameters around a robot whose base joint is at
    /// `base_angle`
    ///
    /// `number_of_waypoints == 0` yields an empty sequence.
    pub fn new(params: &EllipseParameters, base_angle: f64) -> Self {
        Self {
            next: 0,
            count: params.number_of_waypoints,
            step: params.angular_step(),
            horizontal: plane_direction(base_angle) * params.horizontal_radius,
            vertical_radius: params.vertical_radius,
        }
    }

    /// Ring oriented by a waypoint's base joint
    pub fn around(params: &EllipseParameters, center: &Waypoint) -> Self {
        Self::new(params, center.base_angle())
    }

    /// Sweep parameter of point `index`
    fn angle_at(&self, index: usize) -> f64 {
        -PI + self.step * (index + 1) as f64
    }

    fn offset_at(&self, angle: f64) -> Vector3<f64> {
        let c = angle.cos();
        Vector3::new(
            c * self.horizontal.x,
            c * self.horizontal.y,
            (-angle).sin() * self.vertical_radius,
        )
    }
}

impl Iterator for RingOffsets {
    type Item = RingOffset;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let angle = self.angle_at(index);
        Some(RingOffset {
            index,
            angle,
            offset: self.offset_at(angle),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RingOffsets {}

impl FusedIterator for RingOffsets {}

/// Absolute target poses of the ring around `center`
///
/// Every pose keeps the center's orientation.
pub fn ring_poses(params: &EllipseParameters, center: &Waypoint) -> Vec<Pose> {
    RingOffsets::around(params, center)
        .map(|p| center.pose.translated(&p.offset))
        .collect()
}
