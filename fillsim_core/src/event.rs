// fillsim_core/src/event.rs

//! Event types flowing through the shared queue.
//! All components communicate exclusively via these messages.

use crate::market;

/// Trade direction of an order or fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

/// Order pricing instruction.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum OrderKind {
    #[serde(rename = "MKT")]
    Market,
    #[serde(rename = "LMT")]
    Limit { limit_price: f64 },
}

/// Advisory signal kind produced by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SignalKind {
    #[serde(rename = "LONG")]
    Long,
    #[serde(rename = "SHORT")]
    Short,
    #[serde(rename = "EXIT")]
    Exit,
}

/// Tagged message variants shared by all components.
/// Every variant is immutable after construction.
#[derive(Debug, Clone)]
pub enum Event {
    Market(MarketEvent),
    Signal(SignalEvent),
    Order(OrderEvent),
    Fill(FillEvent),
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Market(_) => "MARKET",
            Event::Signal(_) => "SIGNAL",
            Event::Order(_) => "ORDER",
            Event::Fill(_) => "FILL",
        }
    }

}

/// A new bar became current for a symbol.
#[derive(Debug, Clone)]
pub struct MarketEvent {
    pub symbol: String,
    pub bar: market::MarketBar,
}

impl MarketEvent {
    pub fn new(symbol: String, bar: market::MarketBar) -> Self {
        Self { symbol, bar }
    }

}

/// Strategy advice; sized into orders by the portfolio.
#[derive(Debug, Clone)]
pub struct SignalEvent {
    pub timeindex: chrono::DateTime<chrono::Utc>,
    pub symbol: String,
    pub kind: SignalKind,
    pub strength: f64,
}

impl SignalEvent {
    pub fn new(
        timeindex: chrono::DateTime<chrono::Utc>,
        symbol: String,
        kind: SignalKind,
        strength: f64,
    ) -> Self {
        Self {
            timeindex,
            symbol,
            kind,
            strength,
        }
    }

}

/// Order intent produced by the portfolio, consumed exactly once
/// by an execution handler.
#[derive(Debug, Clone)]
pub struct OrderEvent {
    pub timeindex: chrono::DateTime<chrono::Utc>,
    pub symbol: String,
    pub kind: OrderKind,
    pub quantity: f64,
    pub direction: Direction,
}

impl OrderEvent {
    /// Builds an order intent. Quantity must be strictly positive;
    /// rejecting it here keeps downstream code free of re-validation.
    pub fn new(
        timeindex: chrono::DateTime<chrono::Utc>,
        symbol: String,
        kind: OrderKind,
        quantity: f64,
        direction: Direction,
    ) -> anyhow::Result<Self> {
        if quantity <= 0.0 {
            anyhow::bail!(
                "Order quantity must be positive, got {} for symbol '{}'",
                quantity,
                symbol
            );
        }

        anyhow::Ok(
            Self {
                timeindex,
                symbol,
                kind,
                quantity,
                direction,
            }
        )
    }

}

/// Completed execution of an order, stamped with simulated time.
/// `fill_price` is `None` only for the passthrough handler when the
/// market snapshot has no bar for the symbol.
#[derive(Debug, Clone)]
pub struct FillEvent {
    pub timeindex: chrono::DateTime<chrono::Utc>,
    pub symbol: String,
    pub venue: String,
    pub quantity: f64,
    pub direction: Direction,
    pub fill_price: Option<f64>,
    pub commission: Option<f64>,
}

impl FillEvent {
    pub fn new(
        timeindex: chrono::DateTime<chrono::Utc>,
        symbol: String,
        venue: String,
        quantity: f64,
        direction: Direction,
        fill_price: Option<f64>,
        commission: Option<f64>,
    ) -> Self {
        Self {
            timeindex,
            symbol,
            venue,
            quantity,
            direction,
            fill_price,
            commission,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeindex() -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc)
    }

    #[test]
    fn test_order_event_rejects_zero_quantity() {
        let result = OrderEvent::new(
            timeindex(),
            "XYZ".to_string(),
            OrderKind::Market,
            0.0,
            Direction::Buy,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_order_event_rejects_negative_quantity() {
        let result = OrderEvent::new(
            timeindex(),
            "XYZ".to_string(),
            OrderKind::Market,
            -10.0,
            Direction::Sell,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_order_event_accepts_positive_quantity() {
        let order = OrderEvent::new(
            timeindex(),
            "XYZ".to_string(),
            OrderKind::Limit { limit_price: 49.5 },
            100.0,
            Direction::Buy,
        )
        .unwrap();

        assert_eq!(order.quantity, 100.0);
        assert_eq!(order.direction, Direction::Buy);
    }

    #[test]
    fn test_event_type_tags() {
        let order = OrderEvent::new(
            timeindex(),
            "XYZ".to_string(),
            OrderKind::Market,
            1.0,
            Direction::Buy,
        )
        .unwrap();

        assert_eq!(Event::Order(order).event_type(), "ORDER");
    }

}
