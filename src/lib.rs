//! # EllipseKit
//!
//! Generates an elliptical ring of linear moves around a captured center
//! waypoint and keeps it in sync with a robot program tree.
//!
//! ## Architecture
//!
//! EllipseKit is organized as a workspace with multiple crates:
//!
//! 1. **ellipsekit-core** - Data model, units, errors, host service traits, events
//! 2. **ellipsekit-settings** - Ring and synchronizer configuration, persistence
//! 3. **ellipsekit-ring** - Ring geometry and move-to command building
//! 4. **ellipsekit-program** - Ring synchronizer, node behaviors, simulated host
//! 5. **ellipsekit** - Re-exports, logging setup, and the demo binary
//!
//! ## Example
//!
//! ```no_run
//! use ellipsekit::program::sim::{MoveScreenResponse, SimulatedHost};
//! use ellipsekit::program::{EllipseCenterBehavior, EllipsePresenter, ProgramBehavior};
//! use ellipsekit::{Config, JointPositions, Pose, Waypoint};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let host = SimulatedHost::new();
//! let center = host.tree.add_root(EllipseCenterBehavior.factory()?);
//! host.moves.push(MoveScreenResponse::Capture(Waypoint::new(
//!     Pose::new([0.5, 0.0, 0.3], [0.0, 3.14, 0.0]),
//!     JointPositions::default(),
//! )));
//!
//! let presenter = EllipsePresenter::new(host.api().with_selection(center), &Config::new());
//! presenter.on_edit_center().await?;
//! # Ok(())
//! # }
//! ```

pub use ellipsekit_program as program;
pub use ellipsekit_ring as ring;
pub use ellipsekit_settings as settings;

pub use ellipsekit_core::{
    EllipseParameters, Error, HostApi, JointPositions, MoveToCommand, NodeId, Pose,
    ProgramEvent, ProgramEventBus, Result, Waypoint,
};
pub use ellipsekit_core::units::{format_length, parse_length, LengthUnit};

pub use ellipsekit_ring::{ring_poses, MoveToCommandBuilder, RingOffsets};

pub use ellipsekit_settings::{ClearPolicy, Config, SyncSettings};

pub use ellipsekit_program::{
    EllipsePresenter, RingReport, RingSynchronizer, SyncOutcome, SyncState, SyncWarning,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-line
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support (default `info`)
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(LogFormat::Pretty)
}

/// Initialize logging in the given format
///
/// Logs go to stderr so program output on stdout stays clean.
pub fn init_logging_with(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_current_span(false),
            )
            .try_init()?,
    }

    Ok(())
}
