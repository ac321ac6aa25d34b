//! Parallelism passed to the build tool as `-j<N>`.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::thread;

use serde::Deserialize;
use serde::de::{self, Deserializer, Visitor};
use thiserror::Error;

/// Job count used when nothing overrides it.
pub const DEFAULT_JOBS: NonZeroUsize = NonZeroUsize::new(6).unwrap();

/// How many parallel jobs the build tool is asked to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jobs {
    /// A fixed job count.
    Fixed(NonZeroUsize),
    /// One job per available hardware thread.
    Auto,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseJobsError {
    #[error("jobs must be at least 1")]
    Zero,
    #[error("invalid jobs value `{0}` (expected a positive integer or `auto`)")]
    Invalid(String),
}

impl Jobs {
    pub fn fixed(count: usize) -> Result<Self, ParseJobsError> {
        NonZeroUsize::new(count)
            .map(Jobs::Fixed)
            .ok_or(ParseJobsError::Zero)
    }

    /// Resolve to a concrete count. `Auto` falls back to 1 when the platform
    /// cannot report its parallelism.
    pub fn resolve(self) -> usize {
        match self {
            Jobs::Fixed(count) => count.get(),
            Jobs::Auto => thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}

impl Default for Jobs {
    fn default() -> Self {
        Jobs::Fixed(DEFAULT_JOBS)
    }
}

impl fmt::Display for Jobs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Jobs::Fixed(count) => write!(f, "{count}"),
            Jobs::Auto => f.write_str("auto"),
        }
    }
}

impl FromStr for Jobs {
    type Err = ParseJobsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Jobs::Auto);
        }
        let count: usize = trimmed
            .parse()
            .map_err(|_| ParseJobsError::Invalid(s.to_string()))?;
        Jobs::fixed(count)
    }
}

impl<'de> Deserialize<'de> for Jobs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(JobsVisitor)
    }
}

struct JobsVisitor;

impl Visitor<'_> for JobsVisitor {
    type Value = Jobs;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a positive integer or \"auto\"")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Jobs, E> {
        let count = usize::try_from(value).map_err(E::custom)?;
        Jobs::fixed(count).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Jobs, E> {
        if value < 0 {
            return Err(E::custom(ParseJobsError::Invalid(value.to_string())));
        }
        self.visit_u64(value.unsigned_abs())
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Jobs, E> {
        value.parse().map_err(E::custom)
    }
}
