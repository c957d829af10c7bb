// fillsim_core/src/model.rs

//! Friction model mapping an order plus current market state to a fill
//! decision. Deterministic for a fixed seed: the only randomness is the
//! fill-probability gate, driven by a seeded `StdRng` owned here.

use rand::Rng;
use rand::SeedableRng;

use crate::clock;
use crate::event;
use crate::market;
use crate::settings;

/// Economic terms of a simulated fill.
#[derive(Debug, Clone, PartialEq)]
pub struct FillTerms {
    pub fill_price: f64,
    pub quantity: f64,
    pub commission: f64,
}

/// Why an order produced no fill. Recoverable: the simulation continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Market snapshot has no bar for the symbol at current time.
    NoMarketData { symbol: String },
    /// Lost the stochastic fill-probability draw.
    Unfilled,
    /// Limit order never crossed the current bar.
    LimitNotCrossed,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NoMarketData { symbol } => {
                write!(f, "no market data for symbol '{}'", symbol)
            }
            RejectReason::Unfilled => write!(f, "order lost the fill-probability draw"),
            RejectReason::LimitNotCrossed => write!(f, "limit price not crossed"),
        }
    }
}

/// Outcome of evaluating one order: at most one fill.
#[derive(Debug, Clone, PartialEq)]
pub enum FillDecision {
    Fill(FillTerms),
    Reject(RejectReason),
}

/// Stateful only through its random source; everything else is a pure
/// function of the order, the market snapshot, and the settings.
pub struct ExecutionModel {
    settings: settings::ExecutionSettings,
    rng: rand::rngs::StdRng,
}

impl ExecutionModel {
    pub fn new(settings: settings::ExecutionSettings) -> anyhow::Result<Self> {
        settings.check_args()?;
        let rng = rand::rngs::StdRng::seed_from_u64(settings.seed);

        anyhow::Ok(Self { settings, rng })
    }

    pub fn settings(&self) -> &settings::ExecutionSettings {
        &self.settings
    }

    /// Evaluates an order against the current market snapshot.
    ///
    /// Recoverable outcomes come back as `FillDecision::Reject`; an `Err`
    /// means a precondition the driving loop must uphold was broken
    /// (unstarted clock, stale order, non-positive quantity) and the run
    /// cannot continue.
    pub fn evaluate(
        &mut self,
        order: &event::OrderEvent,
        market: &dyn market::MarketView,
        clock: &clock::SimulationClock,
    ) -> anyhow::Result<FillDecision> {
        let now = clock.now().ok_or_else(|| {
            anyhow::anyhow!(
                "Simulated clock never advanced before executing order {:?}",
                order
            )
        })?;

        if order.quantity <= 0.0 {
            anyhow::bail!(
                "Non-positive quantity reached the execution model: order {:?} at simulated time {}",
                order,
                now
            );
        }

        if order.timeindex < now {
            anyhow::bail!(
                "Causality violation: order {:?} predates simulated time {}",
                order,
                now
            );
        }

        let bar = match market.latest_bar(&order.symbol) {
            Some(bar) => bar,
            None => {
                return anyhow::Ok(FillDecision::Reject(RejectReason::NoMarketData {
                    symbol: order.symbol.clone(),
                }));
            }
        };

        if self.rng.gen_range(0.0..1.0) >= self.settings.fill_probability {
            return anyhow::Ok(FillDecision::Reject(RejectReason::Unfilled));
        }

        let fill_price = match order.kind {
            event::OrderKind::Market => {
                let slip = self.settings.slippage_bps / 10_000.0;
                match order.direction {
                    event::Direction::Buy => bar.close * (1.0 + slip),
                    event::Direction::Sell => bar.close * (1.0 - slip),
                }
            }
            event::OrderKind::Limit { limit_price } => {
                let crossed = match order.direction {
                    event::Direction::Buy => bar.low <= limit_price,
                    event::Direction::Sell => bar.high >= limit_price,
                };

                if !crossed {
                    return anyhow::Ok(FillDecision::Reject(RejectReason::LimitNotCrossed));
                }

                limit_price
            }
        };

        let commission = self
            .settings
            .commission
            .calculate(fill_price, order.quantity);

        anyhow::Ok(FillDecision::Fill(FillTerms {
            fill_price,
            quantity: order.quantity,
            commission,
        }))
    }

}
