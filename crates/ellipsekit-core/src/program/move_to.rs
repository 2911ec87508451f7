//! Move-to command descriptor
//!
//! The parameter bag of a host move-to node. Every numeric setting carries
//! its unit, matching the host's tab-input model.

use super::node::{ProgramNode, MOVE_TO_NODE_TYPE};
use crate::data::{JointPositions, Pose};
use crate::error::Result;
use crate::units::{Acceleration, Angle, Length, Speed};
use serde::{Deserialize, Serialize};

/// Schema version of move-to nodes produced here
pub const MOVE_TO_NODE_VERSION: &str = "1.0.0";

/// Robot motion type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MoveType {
    /// Linear in tool space
    #[default]
    #[serde(rename = "moveL")]
    Linear,
    /// Linear in joint space
    #[serde(rename = "moveJ")]
    Joint,
}

/// Value type requested from the symbol service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableValueType {
    /// Full waypoint (pose + joints)
    Waypoint,
    /// Bare pose
    Pose,
}

/// A program variable issued by the symbol service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Unique name within the program
    pub name: String,
    /// Value type
    pub value_type: VariableValueType,
}

/// Tool pose expressed as six unit-tagged inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseInput {
    pub x: Length,
    pub y: Length,
    pub z: Length,
    pub rx: Angle,
    pub ry: Angle,
    pub rz: Angle,
}

impl PoseInput {
    /// Build from a pose in meters and radians
    pub fn from_pose(pose: &Pose) -> Self {
        let [x, y, z] = pose.position;
        let [rx, ry, rz] = pose.orientation;
        Self {
            x: Length::meters(x),
            y: Length::meters(y),
            z: Length::meters(z),
            rx: Angle::radians(rx),
            ry: Angle::radians(ry),
            rz: Angle::radians(rz),
        }
    }

    /// Convert back to a pose in meters and radians
    pub fn to_pose(&self) -> Pose {
        Pose::new(
            [self.x.to_si(), self.y.to_si(), self.z.to_si()],
            [self.rx.to_si(), self.ry.to_si(), self.rz.to_si()],
        )
    }
}

/// Target waypoint of a move-to command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointInput {
    pub frame: String,
    pub q_near: JointPositions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp: Option<String>,
    pub pose: PoseInput,
}

/// Speed and acceleration of a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedSettings {
    pub speed: Speed,
    pub acceleration: Acceleration,
    /// Free-form motion value expression; empty when unused
    #[serde(default)]
    pub motion_value: String,
    #[serde(default)]
    pub opti_move_speed: f64,
    #[serde(default)]
    pub opti_move_acceleration: f64,
}

/// Blending into the next segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendSettings {
    pub enabled: bool,
    pub radius: Length,
}

/// Pose transform toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TransformSettings {
    pub transform: bool,
}

/// Advanced motion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedSettings {
    pub speed: SpeedSettings,
    pub blend: BlendSettings,
    pub transform: TransformSettings,
}

/// Fully parameterized "move to point" command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveToCommand {
    pub move_type: MoveType,
    pub waypoint: WaypointInput,
    /// Variable the target is bound to
    pub variable: Variable,
    pub advanced: AdvancedSettings,
}

impl MoveToCommand {
    /// Target pose in meters and radians
    pub fn target_pose(&self) -> Pose {
        self.waypoint.pose.to_pose()
    }

    /// Wrap into a program node ready for insertion
    pub fn to_program_node(&self) -> Result<ProgramNode> {
        ProgramNode::new(MOVE_TO_NODE_TYPE, MOVE_TO_NODE_VERSION, self)
    }

    /// Decode a move-to command from a program node
    pub fn from_program_node(node: &ProgramNode) -> Result<Self> {
        node.parameters_as()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_input_round_trip() {
        let pose = Pose::new([0.5, -0.1, 0.3], [0.0, 3.1, 0.2]);
        assert_eq!(PoseInput::from_pose(&pose).to_pose(), pose);
    }

    #[test]
    fn test_move_type_wire_names() {
        assert_eq!(serde_json::to_string(&MoveType::Linear).unwrap(), "\"moveL\"");
        assert_eq!(serde_json::to_string(&MoveType::Joint).unwrap(), "\"moveJ\"");
    }
}
