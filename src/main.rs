use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use ellipsekit::program::sim::{MoveScreenResponse, SimulatedHost};
use ellipsekit::program::{EllipseCenterBehavior, EllipsePresenter, ProgramBehavior};
use ellipsekit::settings::Config;
use ellipsekit::{
    format_length, init_logging_with, parse_length, JointPositions, LengthUnit, LogFormat,
    MoveToCommand, Pose, SyncOutcome, Waypoint,
};

/// Generate an ellipse ring against a simulated program tree and print it.
#[derive(Parser, Debug)]
#[command(name = "ellipsekit", version)]
struct Cli {
    /// Configuration file (.toml or .json). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Center X, e.g. `0.5`, `500mm` (bare numbers are meters).
    #[arg(long, default_value = "0.5", allow_negative_numbers = true, value_parser = parse_meters)]
    x: f64,

    /// Center Y (bare numbers are meters).
    #[arg(long, default_value = "0", allow_negative_numbers = true, value_parser = parse_meters)]
    y: f64,

    /// Center Z (bare numbers are meters).
    #[arg(long, default_value = "0.3", allow_negative_numbers = true, value_parser = parse_meters)]
    z: f64,

    /// Robot base joint angle (rad).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    base: f64,

    /// Number of consecutive center edits.
    #[arg(long, default_value_t = 1)]
    repeat: usize,

    /// Emit logs as JSON lines.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn parse_meters(input: &str) -> Result<f64, String> {
    parse_length(input, LengthUnit::Meter)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging_with(if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    })?;
    tracing::info!(
        version = ellipsekit::VERSION,
        built = ellipsekit::BUILD_DATE,
        "EllipseKit demo"
    );

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::new(),
    };

    let host = SimulatedHost::new();
    let center = host.tree.add_root(EllipseCenterBehavior.factory()?);
    let waypoint = Waypoint::new(
        Pose::new([cli.x, cli.y, cli.z], [0.0, std::f64::consts::PI, 0.0]),
        JointPositions {
            base: cli.base,
            ..Default::default()
        },
    );

    let presenter = EllipsePresenter::new(host.api().with_selection(center.clone()), &config);

    for edit in 0..cli.repeat {
        host.moves.push(MoveScreenResponse::Capture(waypoint.clone()));
        let report = match presenter.on_edit_center().await? {
            SyncOutcome::Regenerated(report) => report,
            SyncOutcome::NoChange => {
                println!("edit {}: no change", edit + 1);
                continue;
            }
        };

        println!(
            "edit {}: {} points, {} removed",
            edit + 1,
            report.inserted.len(),
            report.removed.len()
        );
        for warning in &report.warnings {
            println!("  warning: {}", warning);
        }
    }

    println!("center {} children:", center);
    for child in host.tree.children(&center) {
        let Some(node) = host.tree.node(&child) else {
            continue;
        };
        let command = MoveToCommand::from_program_node(&node)?;
        let [x, y, z] = command.target_pose().position;
        println!(
            "  {:<16} {:>12} {:>12} {:>12}",
            command.variable.name,
            format_length(x, LengthUnit::Millimeter),
            format_length(y, LengthUnit::Millimeter),
            format_length(z, LengthUnit::Millimeter),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_lengths_accept_units() {
        let args = ["ellipsekit", "--x", "450mm", "--y=-1e-2", "--z", "0.3m"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!((cli.x - 0.45).abs() < 1e-12);
        assert!((cli.y + 0.01).abs() < 1e-12);
        assert!((cli.z - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_center_defaults_and_bad_unit() {
        let cli = Cli::try_parse_from(["ellipsekit"]).unwrap();
        assert_eq!((cli.x, cli.y, cli.z), (0.5, 0.0, 0.3));
        assert!(Cli::try_parse_from(["ellipsekit", "--x", "2 furlongs"]).is_err());
    }
}
