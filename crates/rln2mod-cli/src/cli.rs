use clap::Parser;
use rln2mod::engine::config::DiscoveryPolicy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "rln2mod - Convert RELION tomography particle tables into IMOD point models.",
    long_about = "Scans a working directory for RELION particle STAR files, converts each \
                  particle's centered Angstrom position into tomogram pixel coordinates, and \
                  runs point2model to produce one .mod file per table.",
    help_template = HELP_TEMPLATE,
    arg_required_else_help = true
)]
pub struct Cli {
    // --- Tomogram Geometry ---
    /// Tomogram size along X, in pixels.
    #[arg(long, value_name = "PX")]
    pub x: u32,

    /// Tomogram size along Y, in pixels.
    #[arg(long, value_name = "PX")]
    pub y: u32,

    /// Tomogram size along Z, in pixels.
    #[arg(long, value_name = "PX")]
    pub z: u32,

    // --- Locations ---
    /// Directory containing the particle tables.
    #[arg(short = 'C', long, value_name = "PATH", default_value = ".")]
    pub workdir: PathBuf,

    /// Directory receiving models and point lists, relative to the working directory
    /// unless absolute. Defaults to 'mod'.
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    // --- Conversion ---
    /// Program that turns a point list into a model. Defaults to 'point2model'.
    #[arg(long, value_name = "PROGRAM")]
    pub converter: Option<String>,

    /// How particle tables are selected: 'strict' or 'fallback'.
    #[arg(long, value_name = "POLICY")]
    pub discovery: Option<DiscoveryPolicy>,

    /// Stop at the first file that fails instead of converting the rest.
    #[arg(long)]
    pub fail_fast: bool,

    // --- Configuration ---
    /// Path to a configuration file in TOML format.
    /// Without it, the per-user configuration file is used when present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file and flags.
    /// Can be used multiple times. Example: -S converter.program=/opt/imod/bin/point2model
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,

    /// Number of files converted concurrently. Defaults to 1.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub jobs: Option<usize>,

    // --- Logging ---
    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output and the progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn dimensions_are_required() {
        let err = Cli::try_parse_from(["rln2mod", "--x", "1024", "--y", "1024"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn no_arguments_prints_help() {
        let err = Cli::try_parse_from(["rln2mod"]).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn defaults_leave_optional_settings_unset() {
        let cli =
            Cli::try_parse_from(["rln2mod", "--x", "1024", "--y", "1024", "--z", "512"]).unwrap();
        assert_eq!((cli.x, cli.y, cli.z), (1024, 1024, 512));
        assert_eq!(cli.workdir, PathBuf::from("."));
        assert!(cli.output_dir.is_none());
        assert!(cli.converter.is_none());
        assert!(cli.discovery.is_none());
        assert!(!cli.fail_fast);
        assert!(cli.set_values.is_empty());
    }

    #[test]
    fn negative_dimension_is_rejected() {
        let err = Cli::try_parse_from(["rln2mod", "--x", "-5", "--y", "1", "--z", "1"]);
        assert!(err.is_err());
    }

    #[test]
    fn all_options_parse() {
        let cli = Cli::try_parse_from([
            "rln2mod",
            "--x=960",
            "--y=928",
            "--z=300",
            "-C",
            "/data/tomo",
            "-o",
            "models",
            "--converter",
            "imod-point2model",
            "--discovery",
            "strict",
            "--fail-fast",
            "-S",
            "jobs=2",
            "-S",
            "on-error=abort",
            "-j",
            "4",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.workdir, PathBuf::from("/data/tomo"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("models")));
        assert_eq!(cli.converter.as_deref(), Some("imod-point2model"));
        assert_eq!(cli.discovery, Some(DiscoveryPolicy::Strict));
        assert!(cli.fail_fast);
        assert_eq!(cli.set_values, ["jobs=2", "on-error=abort"]);
        assert_eq!(cli.jobs, Some(4));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let err = Cli::try_parse_from([
            "rln2mod", "--x", "1", "--y", "1", "--z", "1", "-q", "-v",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }
}
