//! SA configuration: temperature schedule and stop conditions.

use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("initial_temperature must be positive, got {0}")]
    InitialTemperature(f64),

    #[error("stop_temperature must be positive, got {0}")]
    StopTemperature(f64),

    #[error("stop_temperature ({stop}) must be less than initial_temperature ({initial})")]
    StopNotBelowInitial { stop: f64, initial: f64 },

    #[error("cooling_factor must be in (0, 1), got {0}")]
    CoolingFactor(f64),

    #[error("equilibrium_steps must be positive")]
    ZeroEquilibrium,
}

/// Configuration for a Simulated Annealing run.
///
/// The temperature starts at `initial_temperature` and is multiplied by
/// `cooling_factor` after every `equilibrium_steps` search steps. The run
/// freezes when the temperature reaches `stop_temperature` or when any of
/// the optional step limits is hit.
///
/// # Examples
///
/// ```
/// use u_maxwsat::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(2.0)
///     .with_stop_temperature(0.001)
///     .with_cooling_factor(0.98)
///     .with_equilibrium_steps(200)
///     .with_max_steps_without_betterment(50_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Starting temperature. Worseness is measured on normalized scales,
    /// so values around 1 accept most moves.
    pub initial_temperature: f64,

    /// The run freezes once the temperature is at or below this value.
    pub stop_temperature: f64,

    /// Geometric cooling factor in (0, 1). Higher = slower cooling.
    pub cooling_factor: f64,

    /// Search steps taken at one temperature before cooling.
    pub equilibrium_steps: u64,

    /// Freeze after this many search steps.
    pub max_total_steps: Option<u64>,

    /// Freeze after this many steps without an accepted move.
    pub max_steps_without_change: Option<u64>,

    /// Freeze after this many steps without a new best valid configuration.
    pub max_steps_without_betterment: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            stop_temperature: 1e-4,
            cooling_factor: 0.99,
            equilibrium_steps: 100,
            max_total_steps: None,
            max_steps_without_change: None,
            max_steps_without_betterment: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_stop_temperature(mut self, t: f64) -> Self {
        self.stop_temperature = t;
        self
    }

    pub fn with_cooling_factor(mut self, factor: f64) -> Self {
        self.cooling_factor = factor;
        self
    }

    pub fn with_equilibrium_steps(mut self, n: u64) -> Self {
        self.equilibrium_steps = n;
        self
    }

    pub fn with_max_total_steps(mut self, n: u64) -> Self {
        self.max_total_steps = Some(n);
        self
    }

    pub fn with_max_steps_without_change(mut self, n: u64) -> Self {
        self.max_steps_without_change = Some(n);
        self
    }

    pub fn with_max_steps_without_betterment(mut self, n: u64) -> Self {
        self.max_steps_without_betterment = Some(n);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // written as negations so that NaN is rejected too
        if !(self.initial_temperature > 0.0) {
            return Err(ConfigError::InitialTemperature(self.initial_temperature));
        }
        if !(self.stop_temperature > 0.0) {
            return Err(ConfigError::StopTemperature(self.stop_temperature));
        }
        if self.stop_temperature >= self.initial_temperature {
            return Err(ConfigError::StopNotBelowInitial {
                stop: self.stop_temperature,
                initial: self.initial_temperature,
            });
        }
        if !(self.cooling_factor > 0.0 && self.cooling_factor < 1.0) {
            return Err(ConfigError::CoolingFactor(self.cooling_factor));
        }
        if self.equilibrium_steps == 0 {
            return Err(ConfigError::ZeroEquilibrium);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SaConfig::default();
        assert!((config.initial_temperature - 1.0).abs() < 1e-12);
        assert!((config.stop_temperature - 1e-4).abs() < 1e-15);
        assert_eq!(config.equilibrium_steps, 100);
        assert_eq!(config.max_total_steps, None);
    }

    #[test]
    fn test_validate_ok() {
        assert!(SaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperature() {
        let config = SaConfig::default().with_initial_temperature(-1.0);
        assert_eq!(config.validate(), Err(ConfigError::InitialTemperature(-1.0)));

        let config = SaConfig::default().with_stop_temperature(0.0);
        assert_eq!(config.validate(), Err(ConfigError::StopTemperature(0.0)));

        let config = SaConfig::default().with_initial_temperature(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_stop_ge_initial() {
        let config = SaConfig::default()
            .with_initial_temperature(10.0)
            .with_stop_temperature(20.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StopNotBelowInitial { .. })
        ));
    }

    #[test]
    fn test_validate_bad_cooling() {
        for factor in [0.0, 1.0, 1.5, -0.5] {
            let config = SaConfig::default().with_cooling_factor(factor);
            assert_eq!(config.validate(), Err(ConfigError::CoolingFactor(factor)));
        }
    }

    #[test]
    fn test_validate_zero_equilibrium() {
        let config = SaConfig::default().with_equilibrium_steps(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroEquilibrium));
    }

    #[test]
    fn test_builder_sets_limits() {
        let config = SaConfig::default()
            .with_max_total_steps(10)
            .with_max_steps_without_change(20)
            .with_max_steps_without_betterment(30);
        assert_eq!(config.max_total_steps, Some(10));
        assert_eq!(config.max_steps_without_change, Some(20));
        assert_eq!(config.max_steps_without_betterment, Some(30));
    }
}
