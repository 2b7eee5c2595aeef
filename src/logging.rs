use clap::ValueEnum;
use tracing_subscriber::{
    fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};
use tracing_tree::HierarchicalLayer;

use crate::{EnvironmentConfig, Feature, Parser, Result, WrapErr};

// -----------------------------------------------------------------------------
// Supported Formats
// -----------------------------------------------------------------------------
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingFormat {
    None,
    Hierarchical,
    Pretty,
    Json,
}

// -----------------------------------------------------------------------------
// Config
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Parser)]
pub struct TracingConfig {
    #[clap(
        long = "tracing-log-level",
        env = "TRACING_LOG_LEVEL",
        default_value = "info"
    )]
    pub log_level: String,

    #[clap(
        value_enum,
        long = "tracing-format",
        env = "TRACING_FORMAT",
        default_value = "hierarchical"
    )]
    pub format: TracingFormat,
}

// -----------------------------------------------------------------------------
// Service
// -----------------------------------------------------------------------------
#[derive(Debug, Clone)]
pub struct Tracing;

impl Feature for Tracing {
    fn init(service_name: &str, config: &EnvironmentConfig) -> Result<Self> {
        let filter = EnvFilter::try_new(&config.tracing.log_level)
            .wrap_err_with(|| format!("Invalid log level {:?}", config.tracing.log_level))?;
        let ansi = !config.core.no_color;

        // one optional layer per format; a None layer is inactive
        let (layer_format_json, layer_format_pretty, layer_format_hierarchical) =
            match config.tracing.format {
                TracingFormat::None => (None, None, None),
                TracingFormat::Json => (
                    Some(
                        Layer::default()
                            .json()
                            .with_current_span(true)
                            .with_target(true)
                            .with_writer(std::io::stderr),
                    ),
                    None,
                    None,
                ),
                TracingFormat::Pretty => (
                    None,
                    Some(
                        Layer::default()
                            .pretty()
                            .with_target(true)
                            .with_file(true)
                            .with_line_number(true)
                            .with_ansi(ansi)
                            .with_writer(std::io::stderr),
                    ),
                    None,
                ),
                TracingFormat::Hierarchical => (
                    None,
                    None,
                    Some(
                        HierarchicalLayer::new(2)
                            .with_targets(true)
                            .with_bracketed_fields(true)
                            .with_ansi(ansi)
                            .with_writer(std::io::stderr),
                    ),
                ),
            };

        Registry::default()
            .with(filter)
            .with(layer_format_json)
            .with(layer_format_pretty)
            .with(layer_format_hierarchical)
            .try_init()
            .wrap_err("Failed to install tracing subscriber")?;

        tracing::debug!(service = service_name, format = ?config.tracing.format, "started tracer");

        Ok(Self)
    }
}
