//! Loading trip records from a caller-supplied source.

use std::path::{Path, PathBuf};

use clap::{builder::FalseyValueParser, ArgAction};
use serde::de::DeserializeOwned;
use tokio::io::AsyncReadExt;

use crate::{Args, Result, TripEvent, WrapErr};

#[derive(Debug, Clone, Args)]
pub struct InputConfig {
    /// File with trip records, as a JSON array or newline-delimited objects. `-` reads stdin.
    #[clap(long = "input", env = "TRIP_EVENTS_INPUT", conflicts_with = "sample")]
    pub input: Option<PathBuf>,

    /// Publish the built-in sample record instead of reading input.
    #[clap(
        long = "sample",
        env = "TRIP_EVENTS_SAMPLE",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub sample: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Sample,
    Stdin,
    File(PathBuf),
}

impl From<&InputConfig> for InputSource {
    fn from(config: &InputConfig) -> Self {
        if config.sample {
            return InputSource::Sample;
        }

        match config.input.as_deref() {
            None => InputSource::Stdin,
            Some(path) if path == Path::new("-") => InputSource::Stdin,
            Some(path) => InputSource::File(path.to_path_buf()),
        }
    }
}

impl InputSource {
    pub async fn load(&self) -> Result<Vec<TripEvent>> {
        let text = match self {
            InputSource::Sample => return Ok(vec![TripEvent::sample()]),
            InputSource::Stdin => {
                let mut text = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut text)
                    .await
                    .wrap_err("Failed to read records from stdin")?;
                text
            }
            InputSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .wrap_err_with(|| format!("Failed to read records from {}", path.display()))?,
        };

        let records = parse_records(&text)?;
        tracing::debug!(source = ?self, count = records.len(), "loaded records");

        Ok(records)
    }
}

/// Parses either a JSON array of records or a whitespace separated stream of records.
pub fn parse_records<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    // files saved by some Windows tools start with a byte order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let trimmed = text.trim_start();

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).wrap_err("Failed to parse JSON array of records");
    }

    serde_json::Deserializer::from_str(text)
        .into_iter::<T>()
        .enumerate()
        .map(|(index, record)| {
            record.wrap_err_with(|| format!("Failed to parse record #{}", index + 1))
        })
        .collect()
}
