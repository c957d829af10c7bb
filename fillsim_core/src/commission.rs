// fillsim_core/src/commission.rs

//! Commission schedules applied to simulated fills.
//!
//! The schedule is selected in the execution settings JSON:
//! {
//!   "commission": { "plan": "flat", "amount": 1.5 }
//! }
//! or
//! {
//!   "commission": { "plan": "per_share", "rate": 0.005, "minimum": 1.0 }
//! }
//! or
//! {
//!   "commission": {
//!     "plan": "tiered",
//!     "tiers": [
//!       { "up_to_quantity": 500.0, "rate": 0.01 },
//!       { "up_to_quantity": null, "rate": 0.005 }
//!     ]
//!   }
//! }

/// One bracket of a tiered schedule. `up_to_quantity: None` marks the
/// open-ended last bracket.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommissionTier {
    pub up_to_quantity: Option<f64>,
    pub rate: f64,
}

/// Configuration-selectable commission schedule.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "plan", rename_all = "snake_case")]
pub enum CommissionSchedule {
    /// Fixed amount per fill.
    Flat { amount: f64 },
    /// Per-share rate with an optional floor per fill.
    PerShare { rate: f64, minimum: Option<f64> },
    /// Per-share rate chosen by the bracket the fill quantity lands in.
    Tiered { tiers: Vec<CommissionTier> },
}

impl CommissionSchedule {
    /// Commission amount for a fill of `quantity` at `price`.
    /// Price is unused by the shipped plans but kept in the signature so
    /// notional-based plans can be added without touching callers.
    pub fn calculate(&self, _price: f64, quantity: f64) -> f64 {
        match self {
            CommissionSchedule::Flat { amount } => *amount,
            CommissionSchedule::PerShare { rate, minimum } => {
                let commission = rate * quantity;
                match minimum {
                    Some(minimum) => commission.max(*minimum),
                    None => commission,
                }
            }
            CommissionSchedule::Tiered { tiers } => {
                for tier in tiers {
                    match tier.up_to_quantity {
                        Some(up_to) if quantity > up_to => continue,
                        _ => return tier.rate * quantity,
                    }
                }
                // Validation guarantees a trailing open-ended tier, but a
                // fully bounded schedule still charges the last bracket.
                tiers.last().map(|tier| tier.rate * quantity).unwrap_or(0.0)
            }
        }
    }

    /// Checks the schedule is well-formed; called from settings loading.
    pub fn validate(&self) -> anyhow::Result<()> {
        match self {
            CommissionSchedule::Flat { amount } => {
                if *amount < 0.0 {
                    anyhow::bail!("Flat commission amount cannot be negative!");
                }
            }
            CommissionSchedule::PerShare { rate, minimum } => {
                if *rate < 0.0 {
                    anyhow::bail!("Per-share commission rate cannot be negative!");
                }
                if let Some(minimum) = minimum {
                    if *minimum < 0.0 {
                        anyhow::bail!("Per-share commission minimum cannot be negative!");
                    }
                }
            }
            CommissionSchedule::Tiered { tiers } => {
                if tiers.is_empty() {
                    anyhow::bail!("Tiered commission schedule cannot be empty!");
                }

                let mut previous: Option<f64> = None;
                for (i, tier) in tiers.iter().enumerate() {
                    if tier.rate < 0.0 {
                        anyhow::bail!("Tier commission rate cannot be negative!");
                    }

                    match tier.up_to_quantity {
                        Some(up_to) => {
                            if up_to <= 0.0 {
                                anyhow::bail!("Tier threshold must be positive, got {}", up_to);
                            }
                            if let Some(prev) = previous {
                                if up_to <= prev {
                                    anyhow::bail!(
                                        "Tier thresholds must be strictly ascending: {} after {}",
                                        up_to,
                                        prev
                                    );
                                }
                            }
                            previous = Some(up_to);
                        }
                        None => {
                            if i != tiers.len() - 1 {
                                anyhow::bail!("Open-ended tier must be the last bracket!");
                            }
                        }
                    }
                }
            }
        }

        anyhow::Ok(())
    }

}

impl Default for CommissionSchedule {
    fn default() -> Self {
        CommissionSchedule::Flat { amount: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_commission_ignores_quantity() {
        let schedule = CommissionSchedule::Flat { amount: 1.5 };
        assert_eq!(schedule.calculate(50.0, 100.0), 1.5);
        assert_eq!(schedule.calculate(50.0, 10_000.0), 1.5);
    }

    #[test]
    fn test_per_share_commission_with_minimum() {
        let schedule = CommissionSchedule::PerShare {
            rate: 0.005,
            minimum: Some(1.0),
        };

        // 100 * 0.005 = 0.5 falls below the floor.
        assert_eq!(schedule.calculate(50.0, 100.0), 1.0);
        // 1000 * 0.005 = 5.0 clears it.
        assert_eq!(schedule.calculate(50.0, 1000.0), 5.0);
    }

    #[test]
    fn test_tiered_commission_selects_bracket() {
        let schedule = CommissionSchedule::Tiered {
            tiers: vec![
                CommissionTier {
                    up_to_quantity: Some(500.0),
                    rate: 0.01,
                },
                CommissionTier {
                    up_to_quantity: None,
                    rate: 0.005,
                },
            ],
        };

        assert_eq!(schedule.calculate(50.0, 100.0), 1.0);
        assert_eq!(schedule.calculate(50.0, 1000.0), 5.0);
    }

    #[test]
    fn test_validate_rejects_descending_tiers() {
        let schedule = CommissionSchedule::Tiered {
            tiers: vec![
                CommissionTier {
                    up_to_quantity: Some(500.0),
                    rate: 0.01,
                },
                CommissionTier {
                    up_to_quantity: Some(100.0),
                    rate: 0.005,
                },
            ],
        };

        assert!(schedule.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_rate() {
        let schedule = CommissionSchedule::PerShare {
            rate: -0.005,
            minimum: None,
        };

        assert!(schedule.validate().is_err());
    }

    #[test]
    fn test_schedule_deserializes_from_tagged_json() {
        let schedule: CommissionSchedule = serde_json::from_str(
            r#"{ "plan": "per_share", "rate": 0.005, "minimum": 1.0 }"#,
        )
        .unwrap();

        match schedule {
            CommissionSchedule::PerShare { rate, minimum } => {
                assert_eq!(rate, 0.005);
                assert_eq!(minimum, Some(1.0));
            }
            _ => panic!("Expected per-share plan"),
        }
    }

}
