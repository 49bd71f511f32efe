use rln2mod::engine::config::PipelineConfig;
use rln2mod::engine::converter::ExternalConverter;

#[derive(Debug)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub converter: ExternalConverter,
    pub jobs: usize,
}
