// src/simulation/config.rs

use crate::core::{EngineError, EngineResult, PRINT_TOLERANCE};
use std::env;
use std::num::NonZeroUsize;
use std::thread;

/// Environment variable overriding the worker count.
pub const WORKERS_ENV: &str = "QSQUAD_WORKERS";
/// Environment variable overriding the normalization tolerance.
pub const TOLERANCE_ENV: &str = "QSQUAD_TOLERANCE";

/// Settings for a [`Simulator`](super::Simulator) run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Requested worker threads; clamped to the state dimension at run time.
    pub workers: usize,
    /// Verify the final state is normalized.
    pub check_normalization: bool,
    /// Verify every operator is unitary before running.
    pub check_unitarity: bool,
    /// Tolerance for both checks. Defaults to the five-decimal precision of
    /// operator entries such as `0.70711`.
    pub tolerance: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1),
            check_normalization: false,
            check_unitarity: false,
            tolerance: PRINT_TOLERANCE,
        }
    }
}

impl SimulatorConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_normalization_check(mut self, enabled: bool) -> Self {
        self.check_normalization = enabled;
        self
    }

    pub fn with_unitarity_check(mut self, enabled: bool) -> Self {
        self.check_unitarity = enabled;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Defaults overridden by `QSQUAD_WORKERS` and `QSQUAD_TOLERANCE` when set.
    ///
    /// # Errors
    /// `EngineError::InvalidConfiguration` if a variable is set but unparsable.
    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(WORKERS_ENV) {
            config.workers = raw
                .trim()
                .parse()
                .map_err(|_| EngineError::config(format!("{} must be an integer, got '{}'", WORKERS_ENV, raw)))?;
        }
        if let Some(raw) = lookup(TOLERANCE_ENV) {
            config.tolerance = raw
                .trim()
                .parse()
                .map_err(|_| EngineError::config(format!("{} must be a number, got '{}'", TOLERANCE_ENV, raw)))?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Rejects a zero worker count and non-positive or non-finite tolerances.
    pub fn validate(&self) -> EngineResult<()> {
        if self.workers == 0 {
            return Err(EngineError::config("worker count must be positive"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(EngineError::config(format!("tolerance must be positive, got {}", self.tolerance)));
        }
        Ok(())
    }

    /// Worker count actually used for a `dimension`-sized run.
    pub fn effective_workers(&self, dimension: usize) -> usize {
        self.workers.min(dimension).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_has_at_least_one_worker() {
        let config = SimulatorConfig::default();
        assert!(config.workers >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides() {
        let config = SimulatorConfig::from_lookup(lookup_from(&[
            (WORKERS_ENV, " 3 "),
            (TOLERANCE_ENV, "1e-6"),
        ]))
        .unwrap();
        assert_eq!(config.workers, 3);
        assert_eq!(config.tolerance, 1e-6);
    }

    #[test]
    fn bad_env_values_are_rejected() {
        assert!(SimulatorConfig::from_lookup(lookup_from(&[(WORKERS_ENV, "many")])).is_err());
        assert!(SimulatorConfig::from_lookup(lookup_from(&[(WORKERS_ENV, "0")])).is_err());
        assert!(SimulatorConfig::from_lookup(lookup_from(&[(TOLERANCE_ENV, "-1")])).is_err());
    }

    #[test]
    fn workers_capped_at_dimension() {
        let config = SimulatorConfig::default().with_workers(64);
        assert_eq!(config.effective_workers(8), 8);
        assert_eq!(config.with_workers(2).effective_workers(8), 2);
    }
}
