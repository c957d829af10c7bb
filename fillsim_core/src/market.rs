// fillsim_core/src/market.rs

//! Market snapshot interface consumed by the execution core.
//! The full data-replay machinery lives outside this crate; execution
//! only needs the latest bar per symbol.

#[derive(Debug, Clone)]
pub struct MarketBar {
    pub datetime: chrono::DateTime<chrono::Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Read-only view of current market state, implemented by the data
/// handler collaborator. Returning `None` means the symbol cannot be
/// priced at the current simulated time.
pub trait MarketView {
    fn latest_bar(&self, symbol: &str) -> Option<&MarketBar>;
}

/// In-memory snapshot keyed by symbol. Reference implementation used
/// by tests and harnesses; a replay loop overwrites bars as it advances.
#[derive(Debug, Default)]
pub struct StaticMarket {
    bars: std::collections::HashMap<String, MarketBar>,
}

impl StaticMarket {
    pub fn new() -> Self {
        Self {
            bars: std::collections::HashMap::new(),
        }
    }

    /// Replaces the current bar for a symbol.
    pub fn set_bar(&mut self, symbol: &str, bar: MarketBar) {
        self.bars.insert(symbol.to_string(), bar);
    }

}

impl MarketView for StaticMarket {
    fn latest_bar(&self, symbol: &str) -> Option<&MarketBar> {
        self.bars.get(symbol)
    }

}
