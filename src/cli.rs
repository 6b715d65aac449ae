//! Command line interface for Forcedrift

use clap::Parser;
use std::fmt;

use crate::config::SimulationConfig;
use crate::physics::export::ExportScope;
use crate::physics::integrators::registry::IntegratorRegistry;
use crate::physics::math::Scalar;
use crate::physics::parameters::DragModel;

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    ConfigLoad(String),
    /// Invalid integrator name provided
    InvalidIntegrator(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigLoad(msg) => write!(f, "Failed to load configuration: {msg}"),
            CliError::InvalidIntegrator(msg) => write!(f, "Invalid integrator: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Version string with the build date
pub const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_DATE"), ")");

/// Forcedrift - one-dimensional force, friction and drag simulation
#[derive(Parser, Debug, Default)]
#[command(version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Body mass in kg (overrides config file)
    #[arg(short, long, value_name = "KG")]
    pub mass: Option<Scalar>,

    /// Applied force in N, signed (overrides config file)
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub force: Option<Scalar>,

    /// Friction coefficient, clamped to [0, 1]
    #[arg(long, value_name = "MU")]
    pub mu: Option<Scalar>,

    /// Disable Coulomb friction
    #[arg(long)]
    pub no_friction: bool,

    /// Velocity in m/s at the start of the run
    #[arg(long, value_name = "M_PER_S", allow_negative_numbers = true)]
    pub initial_velocity: Option<Scalar>,

    /// Enable air drag with the given model (linear, quadratic)
    #[arg(short, long, value_name = "MODEL")]
    pub drag: Option<DragModel>,

    /// Integrator type (e.g., euler, rk4)
    #[arg(short, long, value_name = "TYPE")]
    pub integrator: Option<String>,

    /// Seconds to run before exporting and exiting
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<Scalar>,

    /// Fixed frame delta in seconds
    #[arg(long, value_name = "SECONDS")]
    pub frame_dt: Option<Scalar>,

    /// Export mode on exit (all, window)
    #[arg(short, long, value_name = "MODE")]
    pub export: Option<ExportScope>,

    /// Window length in seconds for windowed export
    #[arg(short, long, value_name = "SECONDS")]
    pub window: Option<Scalar>,

    /// Directory for the exported CSV (creates if needed)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<String>,

    /// Start paused
    #[arg(short, long)]
    pub paused: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// List available integrators and exit
    #[arg(long)]
    pub list_integrators: bool,
}

/// Handles the --list-integrators flag by printing available integrators and exiting
pub fn handle_list_integrators() {
    print!("{}", integrator_listing(&IntegratorRegistry::default()));
}

/// Registered integrators with their convergence order, followed by aliases
pub fn integrator_listing(registry: &IntegratorRegistry) -> String {
    let mut listing = String::from("Available integrators:\n");
    for name in registry.list_available() {
        match registry.create(&name) {
            Ok(integrator) => listing.push_str(&format!(
                "  - {name} (order {})\n",
                integrator.convergence_order()
            )),
            Err(_) => listing.push_str(&format!("  - {name}\n")),
        }
    }

    let aliases = registry.list_aliases();
    if !aliases.is_empty() {
        listing.push_str("\nAliases:\n");
        for (alias, target) in aliases {
            listing.push_str(&format!("  - {alias} -> {target}\n"));
        }
    }

    listing
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, CliError> {
    let config = if let Some(config_path) = &args.config {
        println!("Loading configuration from: {config_path}");
        SimulationConfig::load(config_path).map_err(|e| CliError::ConfigLoad(e.to_string()))?
    } else {
        SimulationConfig::load_from_user_config()
    };

    apply_overrides(config, args)
}

/// Applies command-line overrides on top of `config`
pub fn apply_overrides(
    mut config: SimulationConfig,
    args: &Args,
) -> Result<SimulationConfig, CliError> {
    if let Some(integrator_type) = &args.integrator {
        // Validate integrator name against registry
        let registry = IntegratorRegistry::new().with_standard_integrators();
        let kind = registry
            .resolve(integrator_type)
            .map_err(CliError::InvalidIntegrator)?;

        println!("Using integrator: {kind}");
        config.parameters.integrator = kind;
    }

    let parameters = &mut config.parameters;

    if let Some(mass) = args.mass {
        println!("Overriding mass to: {mass} kg");
        parameters.mass = mass;
    }

    if let Some(force) = args.force {
        println!("Overriding applied force to: {force} N");
        parameters.applied_force = force;
    }

    if let Some(mu) = args.mu {
        println!("Overriding friction coefficient to: {mu}");
        parameters.friction_coefficient = mu;
    }

    if args.no_friction {
        println!("Friction disabled");
        parameters.friction_enabled = false;
    }

    if let Some(initial_velocity) = args.initial_velocity {
        println!("Overriding initial velocity to: {initial_velocity} m/s");
        parameters.initial_velocity = initial_velocity;
    }

    if let Some(drag_model) = args.drag {
        println!("Using {drag_model:?} drag");
        parameters.drag_enabled = true;
        parameters.drag_model = drag_model;
    }

    if let Some(duration) = args.duration {
        config.driver.duration = duration;
    }

    if let Some(frame_dt) = args.frame_dt {
        config.driver.frame_dt = frame_dt;
    }

    if args.paused {
        config.driver.start_paused = true;
    }

    if let Some(scope) = args.export {
        config.export.on_exit = true;
        config.export.mode = scope;
    }

    if let Some(window) = args.window {
        config.history.window_seconds = window;
    }

    if let Some(output) = &args.output {
        config.export.output_dir = output.clone();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::export::ExportMode;
    use crate::physics::integrators::IntegratorKind;

    #[test]
    fn test_parse_full_command_line() {
        let args = Args::try_parse_from([
            "forcedrift",
            "--mass",
            "2.5",
            "--force",
            "-40",
            "--mu",
            "0.1",
            "--drag",
            "linear",
            "--integrator",
            "rk4",
            "--export",
            "window",
            "--window",
            "3",
            "--output",
            "out",
            "--paused",
        ])
        .unwrap();

        assert_eq!(args.mass, Some(2.5));
        assert_eq!(args.force, Some(-40.0));
        assert_eq!(args.drag, Some(DragModel::Linear));
        assert_eq!(args.export, Some(ExportScope::Window));
        assert!(args.paused);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = Args::try_parse_from([
            "forcedrift",
            "--force",
            "-40",
            "--no-friction",
            "--initial-velocity",
            "-3",
            "--drag",
            "quadratic",
            "--integrator",
            "runge_kutta_4",
            "--export",
            "window",
            "--window",
            "3",
            "--duration",
            "2.5",
        ])
        .unwrap();

        let config = apply_overrides(SimulationConfig::default(), &args).unwrap();
        let parameters = &config.parameters;
        assert_eq!(parameters.applied_force, -40.0);
        assert!(!parameters.friction_enabled);
        assert_eq!(parameters.initial_velocity, -3.0);
        assert!(parameters.drag_enabled);
        assert_eq!(parameters.drag_model, DragModel::Quadratic);
        assert_eq!(parameters.integrator, IntegratorKind::RungeKuttaFourthOrder);
        assert_eq!(config.driver.duration, 2.5);
        assert_eq!(config.export_mode(), ExportMode::Window(3.0));
    }

    #[test]
    fn test_unknown_integrator_is_rejected() {
        let args = Args {
            integrator: Some("leapfrog".to_string()),
            ..Default::default()
        };

        let err = apply_overrides(SimulationConfig::default(), &args).unwrap_err();
        assert!(matches!(err, CliError::InvalidIntegrator(_)));
        assert!(err.to_string().contains("Available integrators: euler, rk4"));
    }

    #[test]
    fn test_integrator_listing_reports_orders_and_aliases() {
        let listing = integrator_listing(&IntegratorRegistry::default());

        assert!(listing.starts_with("Available integrators:\n"));
        assert!(listing.contains("  - euler (order 1)\n"));
        assert!(listing.contains("  - rk4 (order 4)\n"));
        assert!(listing.contains("  - runge_kutta_4 -> rk4\n"));

        let empty = integrator_listing(&IntegratorRegistry::new());
        assert_eq!(empty, "Available integrators:\n");
    }

    #[test]
    fn test_invalid_drag_model_fails_to_parse() {
        assert!(Args::try_parse_from(["forcedrift", "--drag", "cubic"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = Args {
            config: Some("/nonexistent/forcedrift.toml".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            load_and_apply_config(&args),
            Err(CliError::ConfigLoad(_))
        ));
    }
}
