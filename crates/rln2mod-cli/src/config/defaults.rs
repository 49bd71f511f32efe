use rln2mod::engine::config::{
    DEFAULT_OUTPUT_DIR, DEFAULT_PARTICLE_SUFFIX, DEFAULT_TABLE_EXTENSION, DiscoveryPolicy,
    FailurePolicy,
};
use rln2mod::engine::converter::DEFAULT_CONVERTER_PROGRAM;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub output_dir: PathBuf,
    pub converter_program: String,
    pub converter_args: Vec<String>,
    pub discovery: DiscoveryPolicy,
    pub particle_suffix: String,
    pub table_extension: String,
    pub on_error: FailurePolicy,
    pub jobs: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            converter_program: DEFAULT_CONVERTER_PROGRAM.to_string(),
            converter_args: Vec::new(),
            discovery: DiscoveryPolicy::Fallback,
            particle_suffix: DEFAULT_PARTICLE_SUFFIX.to_string(),
            table_extension: DEFAULT_TABLE_EXTENSION.to_string(),
            on_error: FailurePolicy::Continue,
            jobs: 1,
        }
    }
}
