use crate::error::{Error, Result};
use std::env;
use std::fmt;
use std::ops::Range;

pub const TOKEN_NAME_VAR: &str = "HACKERONE_TOKEN_NAME";
pub const TOKEN_VAR: &str = "HACKERONE_TOKEN";
pub const PROGRAM_VAR: &str = "HACKERONE_PROGRAM";

pub const DEFAULT_LOW_RANGE: Range<f64> = 1.0..999.0;
pub const DEFAULT_MEDIUM_RANGE: Range<f64> = 1000.0..2499.0;
pub const DEFAULT_HIGH_RANGE: Range<f64> = 2500.0..4999.0;
pub const DEFAULT_CRITICAL_RANGE: Range<f64> = 5000.0..100_000_000.0;

/// Score boundaries used to turn a numeric severity score into a band.
#[derive(Clone, Debug, PartialEq)]
pub struct SeverityRanges {
    pub low: Range<f64>,
    pub medium: Range<f64>,
    pub high: Range<f64>,
    pub critical: Range<f64>,
}

impl Default for SeverityRanges {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_RANGE,
            medium: DEFAULT_MEDIUM_RANGE,
            high: DEFAULT_HIGH_RANGE,
            critical: DEFAULT_CRITICAL_RANGE,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Config {
    program: Option<String>,
    ranges: SeverityRanges,
}

fn validate_range(name: &str, value: Range<f64>) -> Result<Range<f64>> {
    if !value.start.is_finite() || !value.end.is_finite() {
        return Err(Error::InvalidArgument(format!(
            "{} must be a range with finite bounds, got {:?}",
            name, value
        )));
    }
    if value.start > value.end {
        return Err(Error::InvalidArgument(format!(
            "{} must be a range object with start <= end, got {:?}",
            name, value
        )));
    }
    Ok(value)
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus the optional `HACKERONE_PROGRAM` variable (`.env` honored).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let program = env::var(PROGRAM_VAR).ok().filter(|p| !p.is_empty());
        Self {
            program,
            ..Self::default()
        }
    }

    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }

    pub fn set_program(&mut self, program: Option<String>) {
        self.program = program;
    }

    pub fn ranges(&self) -> &SeverityRanges {
        &self.ranges
    }

    pub fn low_range(&self) -> &Range<f64> {
        &self.ranges.low
    }

    pub fn medium_range(&self) -> &Range<f64> {
        &self.ranges.medium
    }

    pub fn high_range(&self) -> &Range<f64> {
        &self.ranges.high
    }

    pub fn critical_range(&self) -> &Range<f64> {
        &self.ranges.critical
    }

    pub fn set_low_range(&mut self, value: Range<f64>) -> Result<()> {
        self.ranges.low = validate_range("low_range", value)?;
        Ok(())
    }

    pub fn set_medium_range(&mut self, value: Range<f64>) -> Result<()> {
        self.ranges.medium = validate_range("medium_range", value)?;
        Ok(())
    }

    pub fn set_high_range(&mut self, value: Range<f64>) -> Result<()> {
        self.ranges.high = validate_range("high_range", value)?;
        Ok(())
    }

    pub fn set_critical_range(&mut self, value: Range<f64>) -> Result<()> {
        self.ranges.critical = validate_range("critical_range", value)?;
        Ok(())
    }
}

/// API token pair used for HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token_name: String,
    pub token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token_name", &self.token_name)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    pub fn new(token_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token_name: token_name.into(),
            token: token.into(),
        }
    }

    /// Returns `None` unless both `HACKERONE_TOKEN_NAME` and `HACKERONE_TOKEN` are set.
    pub fn from_env() -> Option<Self> {
        dotenvy::dotenv().ok();

        Self::from_parts(env::var(TOKEN_NAME_VAR).ok(), env::var(TOKEN_VAR).ok())
    }

    pub fn from_parts(token_name: Option<String>, token: Option<String>) -> Option<Self> {
        let token_name = token_name.filter(|v| !v.is_empty())?;
        let token = token.filter(|v| !v.is_empty())?;
        Some(Self { token_name, token })
    }
}
