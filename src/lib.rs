use std::fmt::Debug;

mod core;
mod lang;
mod logging;

pub mod encoding;
pub mod input;
pub mod prelude;
pub mod publisher;
pub mod streaming;
pub mod trip;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use prelude::*;

/// Builds an [`eyre::Report`] from a message, like `eyre!`.
#[macro_export]
macro_rules! throw {
    ($($arg:tt)*) => {
        $crate::eyre::eyre!($($arg)*)
    };
}

#[derive(Debug, Clone)]
pub struct Environment<T: Debug + Clone + Args> {
    pub config: Config<T>,
    pub tracing: Tracing,
}

#[derive(Debug, Clone, Parser)]
pub struct EnvironmentConfig {
    #[clap(flatten)]
    pub core: core::CoreConfig,

    #[clap(flatten)]
    pub tracing: TracingConfig,
}

#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config<T: Debug + Clone + Args> {
    #[clap(flatten)]
    pub project: T,

    #[clap(flatten)]
    pub environment: EnvironmentConfig,
}

impl<T: Debug + Clone + Args> Config<T> {
    /// Parses flags and environment variables, then brings up error reporting and tracing.
    pub fn init(service_name: &str) -> Result<Environment<T>> {
        let Self {
            project,
            environment,
        } = Self::parse();

        core::Core::init(service_name, &environment)?;
        let tracing = Tracing::init(service_name, &environment)?;

        Ok(Environment {
            tracing,
            config: Self {
                project,
                environment,
            },
        })
    }
}
