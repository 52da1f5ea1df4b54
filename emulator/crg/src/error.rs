// Licensed under the Apache-2.0 license

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring the clock/reset generator. The sequencing
/// network itself has no fallible operations once built.
#[derive(Error, Debug)]
pub enum CrgError {
    #[error("Invalid {name} frequency: {value} Hz.")]
    InvalidFrequency { name: &'static str, value: f64 },
    #[error("Invalid {name}: {value}.")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("Power-on reset counter width must be 1..=32 bits (got {0}).")]
    InvalidPorWidth(u32),
    #[error("Unsupported system clock divider ratio {0} (expected 2, 4, 5 or 8).")]
    UnsupportedDividerRatio(u32),
    #[error("No PLL setting produces {target} Hz from {input} Hz within margin {margin}.")]
    PllUnsolvable {
        input: f64,
        target: f64,
        margin: f64,
    },
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
