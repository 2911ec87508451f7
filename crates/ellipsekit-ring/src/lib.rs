//! # EllipseKit Ring
//!
//! Geometry of the elliptical waypoint ring and the move-to commands that
//! realize it.

pub mod command;
pub mod geometry;

pub use command::{MotionSettings, MoveToCommandBuilder};
pub use geometry::{plane_direction, ring_poses, RingOffset, RingOffsets};
