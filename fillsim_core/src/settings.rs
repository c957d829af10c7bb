// fillsim_core/src/settings.rs

//! Friction configuration for the execution core.
//! Loaded once at backtest start from JSON and validated; read-only
//! thereafter.
//!
//! Example file:
//! {
//!   "venue": "SIM",
//!   "slippage_bps": 100.0,
//!   "fill_probability": 1.0,
//!   "latency_ticks": 0,
//!   "seed": 42,
//!   "commission": { "plan": "flat", "amount": 1.5 }
//! }

use crate::commission;

/// Immutable friction parameters consumed by the execution model.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionSettings {
    /// Reference venue identifier stamped into fills.
    pub venue: String,

    /// Direction-aware slippage in basis points of the reference price.
    #[serde(default)]
    pub slippage_bps: f64,

    /// Probability in [0, 1] that an otherwise feasible order fills.
    #[serde(default = "default_fill_probability")]
    pub fill_probability: f64,

    /// Market events an order waits in the pending book before pricing.
    /// Zero fills synchronously.
    #[serde(default)]
    pub latency_ticks: u32,

    /// Seed for the stochastic fill gate; fixed seed gives byte-identical
    /// fill sequences across runs.
    #[serde(default)]
    pub seed: u64,

    #[serde(default)]
    pub commission: commission::CommissionSchedule,
}

fn default_fill_probability() -> f64 {
    1.0
}

impl ExecutionSettings {
    /// Loads and validates settings from a JSON file.
    /// # Arguments
    /// * `settings_file_path` - Path to the JSON configuration file.
    /// # Returns
    /// * `anyhow::Result<ExecutionSettings>` containing validated settings.
    pub fn load<P: AsRef<std::path::Path>>(settings_file_path: P) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(settings_file_path)?;
        let settings: Self = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse execution settings JSON: {}", e))?;

        settings
            .check_args()
            .map_err(|e| anyhow::anyhow!("Execution settings validation failed:\n{}", e))?;

        anyhow::Ok(settings)
    }

    /// Null-friction settings: no slippage, no commission, certain
    /// synchronous fills.
    pub fn frictionless(venue: &str) -> Self {
        Self {
            venue: venue.to_string(),
            slippage_bps: 0.0,
            fill_probability: 1.0,
            latency_ticks: 0,
            seed: 0,
            commission: commission::CommissionSchedule::default(),
        }
    }

    pub fn check_args(&self) -> anyhow::Result<()> {
        // check venue
        {
            if self.venue.trim().is_empty() {
                anyhow::bail!("Venue cannot be empty!");
            }
        }

        // check slippage
        {
            if self.slippage_bps < 0.0 {
                anyhow::bail!("Slippage cannot be negative!");
            }
        }

        // check fill probability
        {
            if !(0.0..=1.0).contains(&self.fill_probability) {
                anyhow::bail!(
                    "Fill probability must be within [0.0, 1.0], got {}",
                    self.fill_probability
                );
            }
        }

        // check commission schedule
        {
            self.commission.validate()?;
        }

        anyhow::Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "venue": "ARCA",
                "slippage_bps": 100.0,
                "seed": 42,
                "commission": {{ "plan": "flat", "amount": 1.5 }}
            }}"#
        )
        .unwrap();

        let settings = ExecutionSettings::load(file.path()).unwrap();

        assert_eq!(settings.venue, "ARCA");
        assert_eq!(settings.slippage_bps, 100.0);
        assert_eq!(settings.fill_probability, 1.0);
        assert_eq!(settings.latency_ticks, 0);
        assert_eq!(settings.seed, 42);
    }

    #[test]
    fn test_load_rejects_out_of_range_fill_probability() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "venue": "SIM", "fill_probability": 1.5 }}"#).unwrap();

        assert!(ExecutionSettings::load(file.path()).is_err());
    }

    #[test]
    fn test_check_args_rejects_empty_venue() {
        let mut settings = ExecutionSettings::frictionless("SIM");
        settings.venue = "  ".to_string();

        assert!(settings.check_args().is_err());
    }

    #[test]
    fn test_check_args_rejects_negative_slippage() {
        let mut settings = ExecutionSettings::frictionless("SIM");
        settings.slippage_bps = -1.0;

        assert!(settings.check_args().is_err());
    }

    #[test]
    fn test_frictionless_defaults() {
        let settings = ExecutionSettings::frictionless("SIM");

        assert_eq!(settings.slippage_bps, 0.0);
        assert_eq!(settings.fill_probability, 1.0);
        assert_eq!(settings.latency_ticks, 0);
        assert!(settings.check_args().is_ok());
    }

}
