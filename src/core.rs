use clap::{builder::FalseyValueParser, ArgAction};

use crate::{EnvironmentConfig, Feature, Parser, Result};

#[derive(Debug, Clone, Parser)]
pub struct CoreConfig {
    /// Any value other than an empty string, 0, false, no, off or n turns colors off.
    #[clap(
        long = "no-color",
        env = "NO_COLOR",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub no_color: bool,
}

pub struct Core;

impl Feature for Core {
    fn init(_service_name: &str, config: &EnvironmentConfig) -> Result<Self> {
        if !config.core.no_color {
            color_eyre::install()?;
        }

        Ok(Self)
    }
}
