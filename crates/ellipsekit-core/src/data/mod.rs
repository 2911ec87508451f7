//! Data models for robot poses, waypoints, and ring parameters
//!
//! This module provides:
//! - Tool poses (position + rotation vector) in meters/radians
//! - Joint configurations ("q near") used to disambiguate inverse kinematics
//! - Waypoints as captured by the host's move screen
//! - Ellipse ring parameters with validation

use crate::error::{Error, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of ring points
pub const DEFAULT_NUMBER_OF_WAYPOINTS: usize = 16;
/// Default horizontal semi-axis (m)
pub const DEFAULT_HORIZONTAL_RADIUS_M: f64 = 0.200;
/// Default vertical semi-axis (m)
pub const DEFAULT_VERTICAL_RADIUS_M: f64 = 0.120;
/// Default tool speed shared by all ring segments (m/s)
pub const DEFAULT_TOOL_SPEED_M_S: f64 = 0.25;
/// Default tool acceleration shared by all ring segments (m/s²)
pub const DEFAULT_TOOL_ACCELERATION_M_S2: f64 = 1.2;
/// Default blend radius shared by all ring segments (m)
pub const DEFAULT_BLEND_RADIUS_M: f64 = 0.003;

/// Reference frame waypoints are expressed in when the host gives none
pub const BASE_FRAME: &str = "base";

/// Tool pose: position in meters, orientation as a rotation vector in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Pose {
    /// X, Y, Z position (m)
    pub position: [f64; 3],
    /// RX, RY, RZ rotation vector (rad)
    pub orientation: [f64; 3],
}

impl Pose {
    /// Create a pose from position and orientation arrays
    pub fn new(position: [f64; 3], orientation: [f64; 3]) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Position as a vector
    pub fn position_vector(&self) -> Vector3<f64> {
        Vector3::from(self.position)
    }

    /// Same orientation, position shifted by `offset`
    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        let p = self.position_vector() + offset;
        Self {
            position: [p.x, p.y, p.z],
            orientation: self.orientation,
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.position;
        let [rx, ry, rz] = self.orientation;
        write!(
            f,
            "X:{:.4} Y:{:.4} Z:{:.4} RX:{:.4} RY:{:.4} RZ:{:.4}",
            x, y, z, rx, ry, rz
        )
    }
}

/// Six-axis joint configuration (radians)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct JointPositions {
    /// Base rotation
    pub base: f64,
    /// Shoulder
    pub shoulder: f64,
    /// Elbow
    pub elbow: f64,
    /// Wrist 1
    pub wrist1: f64,
    /// Wrist 2
    pub wrist2: f64,
    /// Wrist 3
    pub wrist3: f64,
}

/// A captured robot waypoint
///
/// Treated as a value: the synchronizer copies it into local state as soon as
/// it is received and never re-reads it from the shared program tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    /// Reference frame name
    pub frame: String,
    /// Tool pose
    pub pose: Pose,
    /// Joint configuration reaching the pose
    pub q_near: JointPositions,
    /// Tool center point the pose refers to, if the host reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp: Option<String>,
}

impl Waypoint {
    /// Create a waypoint in the base frame
    pub fn new(pose: Pose, q_near: JointPositions) -> Self {
        Self {
            frame: BASE_FRAME.to_string(),
            pose,
            q_near,
            tcp: None,
        }
    }

    /// The all-zero waypoint the host factory stores in fresh nodes
    pub fn empty() -> Self {
        Self::new(Pose::default(), JointPositions::default())
    }

    /// Robot base joint rotation, orienting the ellipse plane
    pub fn base_angle(&self) -> f64 {
        self.q_near.base
    }

    /// True if the position is exactly `(0, 0, 0)`
    ///
    /// The move screen returns this when the user cancels. A position that is
    /// zero on only some axes is a real pose.
    pub fn is_cancellation_sentinel(&self) -> bool {
        self.pose.position == [0.0, 0.0, 0.0]
    }
}

impl Default for Waypoint {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] base={:.4}", self.pose, self.frame, self.q_near.base)
    }
}

/// Ellipse ring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EllipseParameters {
    /// Number of ring points
    pub number_of_waypoints: usize,
    /// Horizontal semi-axis (m)
    pub horizontal_radius: f64,
    /// Vertical semi-axis (m)
    pub vertical_radius: f64,
    /// Tool speed for every ring segment (m/s)
    pub tool_speed: f64,
    /// Tool acceleration for every ring segment (m/s²)
    pub tool_acceleration: f64,
    /// Blend radius for every ring segment (m)
    pub blend_radius: f64,
}

impl Default for EllipseParameters {
    fn default() -> Self {
        Self {
            number_of_waypoints: DEFAULT_NUMBER_OF_WAYPOINTS,
            horizontal_radius: DEFAULT_HORIZONTAL_RADIUS_M,
            vertical_radius: DEFAULT_VERTICAL_RADIUS_M,
            tool_speed: DEFAULT_TOOL_SPEED_M_S,
            tool_acceleration: DEFAULT_TOOL_ACCELERATION_M_S2,
            blend_radius: DEFAULT_BLEND_RADIUS_M,
        }
    }
}

impl EllipseParameters {
    /// Angular distance between consecutive ring points (rad)
    ///
    /// Zero for an empty ring.
    pub fn angular_step(&self) -> f64 {
        if self.number_of_waypoints == 0 {
            0.0
        } else {
            std::f64::consts::TAU / self.number_of_waypoints as f64
        }
    }

    /// Validate the parameters
    ///
    /// A ring of zero points is valid (it produces no commands).
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("horizontalRadius", self.horizontal_radius),
            ("verticalRadius", self.vertical_radius),
            ("blendRadius", self.blend_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::other(format!(
                    "{} must be a finite, non-negative length (got {})",
                    name, value
                )));
            }
        }

        if !self.tool_speed.is_finite() || self.tool_speed <= 0.0 {
            return Err(Error::other(format!(
                "toolSpeed must be > 0 (got {})",
                self.tool_speed
            )));
        }

        if !self.tool_acceleration.is_finite() || self.tool_acceleration <= 0.0 {
            return Err(Error::other(format!(
                "toolAcceleration must be > 0 (got {})",
                self.tool_acceleration
            )));
        }

        Ok(())
    }
}
