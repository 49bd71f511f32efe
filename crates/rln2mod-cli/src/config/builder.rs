use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::Cli;
use crate::error::{CliError, Result};
use rln2mod::core::models::coordinate::TomogramDimensions;
use rln2mod::engine::config::{FailurePolicy, PipelineConfigBuilder};
use rln2mod::engine::converter::ExternalConverter;

pub fn build_config(args: &Cli) -> Result<AppConfig> {
    let file_config = FileConfig::load(args.config.as_deref())?;
    merge_config(args, file_config)
}

/// Merges defaults, file values, CLI flags and `--set` overrides, lowest precedence first.
pub fn merge_config(args: &Cli, file_config: FileConfig) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let overrides = apply_set_values(FileConfig::default(), &args.set_values)?;

    let output_dir = overrides
        .output_dir
        .or_else(|| args.output_dir.clone())
        .or(file_config.output_dir)
        .unwrap_or(defaults.output_dir);

    let discovery = overrides
        .discovery
        .or(args.discovery)
        .or(file_config.discovery)
        .unwrap_or(defaults.discovery);

    let particle_suffix = overrides
        .particle_suffix
        .or(file_config.particle_suffix)
        .unwrap_or(defaults.particle_suffix);
    let table_extension = overrides
        .table_extension
        .or(file_config.table_extension)
        .unwrap_or(defaults.table_extension);

    let cli_on_error = args.fail_fast.then_some(FailurePolicy::Abort);
    let on_error = overrides
        .on_error
        .or(cli_on_error)
        .or(file_config.on_error)
        .unwrap_or(defaults.on_error);

    let jobs = overrides
        .jobs
        .or(args.jobs)
        .or(file_config.jobs)
        .unwrap_or(defaults.jobs);
    if jobs == 0 {
        return Err(CliError::Config("`jobs` must be at least 1".to_string()));
    }

    let file_converter = file_config.converter.unwrap_or_default();
    let set_converter = overrides.converter.unwrap_or_default();
    let program = set_converter
        .program
        .or_else(|| args.converter.clone())
        .or(file_converter.program)
        .unwrap_or(defaults.converter_program);
    if program.trim().is_empty() {
        return Err(CliError::Config(
            "`converter.program` must not be empty".to_string(),
        ));
    }
    let converter_args = set_converter
        .args
        .or(file_converter.args)
        .unwrap_or(defaults.converter_args);

    let pipeline = PipelineConfigBuilder::new()
        .dimensions(TomogramDimensions::new(args.x, args.y, args.z))
        .working_dir(args.workdir.clone())
        .output_dir(output_dir)
        .discovery_policy(discovery)
        .particle_suffix(particle_suffix)
        .table_extension(table_extension)
        .failure_policy(on_error)
        .parallel(jobs > 1)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        pipeline,
        converter: ExternalConverter::new(program).with_args(converter_args),
        jobs,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "output-dir" => config.output_dir = Some(value_str.into()),
            "discovery" => {
                config.discovery = Some(
                    value_str
                        .parse()
                        .map_err(|e| CliError::Config(format!("{}", e)))?,
                );
            }
            "particle-suffix" => config.particle_suffix = Some(value_str.to_string()),
            "table-extension" => config.table_extension = Some(value_str.to_string()),
            "on-error" => {
                config.on_error = Some(
                    value_str
                        .parse()
                        .map_err(|e| CliError::Config(format!("{}", e)))?,
                );
            }
            "jobs" => {
                config.jobs = Some(value_str.trim().parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            "converter.program" => {
                config.converter.get_or_insert_with(Default::default).program =
                    Some(value_str.to_string());
            }
            "converter.args" => {
                config.converter.get_or_insert_with(Default::default).args =
                    Some(value_str.split_whitespace().map(str::to_string).collect());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
