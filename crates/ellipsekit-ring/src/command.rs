//! Move-to command building
//!
//! Turns a center waypoint plus a ring offset into a fully parameterized
//! move-to command bound to a freshly named program variable.

use ellipsekit_core::program::{
    AdvancedSettings, BlendSettings, MoveToCommand, MoveType, PoseInput, SpeedSettings,
    TransformSettings, VariableValueType, WaypointInput,
};
use ellipsekit_core::units::{Acceleration, Length, Speed};
use ellipsekit_core::{EllipseParameters, Result, SymbolService, Waypoint};
use nalgebra::Vector3;
use std::sync::Arc;

/// Motion tuning applied uniformly to every ring segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSettings {
    pub move_type: MoveType,
    pub speed: Speed,
    pub acceleration: Acceleration,
    pub blend_radius: Length,
    /// Blending is on for every ring segment
    pub blend_enabled: bool,
}

impl MotionSettings {
    /// Take the shared constants from ring parameters
    pub fn from_parameters(params: &EllipseParameters, move_type: MoveType) -> Self {
        Self {
            move_type,
            speed: Speed::meters_per_second(params.tool_speed),
            acceleration: Acceleration::meters_per_second_squared(params.tool_acceleration),
            blend_radius: Length::meters(params.blend_radius),
            blend_enabled: true,
        }
    }

    fn advanced(&self) -> AdvancedSettings {
        AdvancedSettings {
            speed: SpeedSettings {
                speed: self.speed,
                acceleration: self.acceleration,
                motion_value: String::new(),
                opti_move_speed: 0.0,
                opti_move_acceleration: 0.0,
            },
            blend: BlendSettings {
                enabled: self.blend_enabled,
                radius: self.blend_radius,
            },
            transform: TransformSettings { transform: false },
        }
    }
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self::from_parameters(&EllipseParameters::default(), MoveType::Linear)
    }
}

/// Builds move-to commands, naming each target through the host's symbol
/// service
#[derive(Clone)]
pub struct MoveToCommandBuilder {
    symbols: Arc<dyn SymbolService>,
    settings: MotionSettings,
}

impl MoveToCommandBuilder {
    pub fn new(symbols: Arc<dyn SymbolService>, settings: MotionSettings) -> Self {
        Self { symbols, settings }
    }

    pub fn settings(&self) -> &MotionSettings {
        &self.settings
    }

    /// Build the command for `base` displaced by `offset`
    ///
    /// The target keeps `base`'s orientation, frame, joint hint and TCP.
    /// Calls the symbol service exactly once; its failure is returned as is.
    pub async fn build(
        &self,
        base: &Waypoint,
        offset: &Vector3<f64>,
        suggested_name: &str,
    ) -> Result<MoveToCommand> {
        let target = base.pose.translated(offset);

        let variable = self
            .symbols
            .generate_variable(suggested_name, VariableValueType::Waypoint)
            .await?;

        tracing::trace!(
            variable = %variable.name,
            target = %target,
            "Built move-to command"
        );

        Ok(MoveToCommand {
            move_type: self.settings.move_type,
            waypoint: WaypointInput {
                frame: base.frame.clone(),
                q_near: base.q_near,
                tcp: base.tcp.clone(),
                pose: PoseInput::from_pose(&target),
            },
            variable,
            advanced: self.settings.advanced(),
        })
    }
}

impl std::fmt::Debug for MoveToCommandBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveToCommandBuilder")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
