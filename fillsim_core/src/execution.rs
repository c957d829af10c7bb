// fillsim_core/src/execution.rs

//! Interface for order execution simulation.
//! Allows swapping between simulated, passthrough, and (eventually) live
//! brokers behind one contract: callers never learn which variant they
//! hold.
//!
//! Handlers never initiate work. They react to events handed to them by
//! the driving loop and communicate back only by pushing `FillEvent`s
//! onto the shared queue.

use crate::clock;
use crate::event;
use crate::market;
use crate::model;
use crate::queue;
use crate::settings;

/// Invoked when the model rejects an order for a recoverable reason, so
/// rejections are observable without a dedicated event variant.
pub type RejectionCallback = Box<dyn FnMut(&event::OrderEvent, &model::RejectReason)>;

/// Defines the interface for an execution handler.
/// Non-Order events are a no-op, not an error: the shared queue is
/// heterogeneous by design.
pub trait ExecutionHandler {
    /// Reacts to one event popped by the driving loop. Accepted orders
    /// result in at most one `FillEvent` pushed onto the shared queue,
    /// stamped with simulated time.
    fn execute_order(
        &mut self,
        event: &event::Event,
        market: &dyn market::MarketView,
        clock: &clock::SimulationClock,
    ) -> anyhow::Result<()>;
}

/// Friction-aware handler: the backtest default.
///
/// With `latency_ticks > 0` accepted orders sit in a FIFO pending book
/// and are priced only after that many Market events, against the bar
/// current at release time. Zero latency fills synchronously.
pub struct SimulatedExecutionHandler {
    event_sender: queue::EventSender,
    model: model::ExecutionModel,
    pending: std::collections::VecDeque<(event::OrderEvent, u32)>,
    on_reject: Option<RejectionCallback>,
}

impl SimulatedExecutionHandler {
    pub fn new(
        event_sender: queue::EventSender,
        settings: settings::ExecutionSettings,
    ) -> anyhow::Result<Self> {
        anyhow::Ok(
            Self {
                event_sender,
                model: model::ExecutionModel::new(settings)?,
                pending: std::collections::VecDeque::new(),
                on_reject: None,
            }
        )
    }

    /// Registers a callback observing recoverable rejections.
    pub fn with_rejection_callback(mut self, callback: RejectionCallback) -> Self {
        self.on_reject = Some(callback);
        self
    }

    fn admit(
        &mut self,
        order: &event::OrderEvent,
        clock: &clock::SimulationClock,
    ) -> anyhow::Result<()> {
        let now = clock.now().ok_or_else(|| {
            anyhow::anyhow!(
                "Simulated clock never advanced before executing order {:?}",
                order
            )
        })?;

        if order.timeindex < now {
            anyhow::bail!(
                "Causality violation: order {:?} predates simulated time {}",
                order,
                now
            );
        }

        let latency = self.model.settings().latency_ticks;
        self.pending.push_back((order.clone(), latency));
        anyhow::Ok(())
    }

    fn age_pending(&mut self) {
        for (_, remaining) in self.pending.iter_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }

    /// Prices every matured pending order, oldest first. All entries
    /// carry the same configured latency, so counters are non-increasing
    /// front to back and draining the front is enough to keep FIFO order.
    fn release_ready(
        &mut self,
        market: &dyn market::MarketView,
        clock: &clock::SimulationClock,
    ) -> anyhow::Result<()> {
        while matches!(self.pending.front(), Some((_, 0))) {
            let Some((mut order, _)) = self.pending.pop_front() else {
                break;
            };

            let now = clock.now().ok_or_else(|| {
                anyhow::anyhow!("Simulated clock unset while releasing order {:?}", order)
            })?;
            // A deferred order reaches the venue only now; it is priced
            // and causality-checked as of release time.
            order.timeindex = order.timeindex.max(now);

            match self.model.evaluate(&order, market, clock)? {
                model::FillDecision::Fill(terms) => {
                    let fill_event = event::FillEvent::new(
                        now,
                        order.symbol.clone(),
                        self.model.settings().venue.clone(),
                        terms.quantity,
                        order.direction,
                        Some(terms.fill_price),
                        Some(terms.commission),
                    );

                    log::debug!(
                        "Filled {:?} {} x{} @ {} on {}",
                        order.direction,
                        order.symbol,
                        terms.quantity,
                        terms.fill_price,
                        self.model.settings().venue
                    );

                    self.event_sender.push(event::Event::Fill(fill_event))?;
                }
                model::FillDecision::Reject(reason) => {
                    log::warn!(
                        "Order for '{}' rejected at simulated time {}: {}",
                        order.symbol,
                        now,
                        reason
                    );

                    if let Some(callback) = self.on_reject.as_mut() {
                        callback(&order, &reason);
                    }
                }
            }
        }

        anyhow::Ok(())
    }

}

impl ExecutionHandler for SimulatedExecutionHandler {
    fn execute_order(
        &mut self,
        event: &event::Event,
        market: &dyn market::MarketView,
        clock: &clock::SimulationClock,
    ) -> anyhow::Result<()> {
        match event {
            event::Event::Order(order) => {
                self.admit(order, clock)?;
                self.release_ready(market, clock)?;
            }
            event::Event::Market(_) => {
                if !self.pending.is_empty() {
                    self.age_pending();
                    self.release_ready(market, clock)?;
                }
            }
            other => {
                log::debug!("Ignoring {} event", other.event_type());
            }
        }

        anyhow::Ok(())
    }

}

/// Zero-friction baseline handler: converts every order 1:1 into a fill
/// at the theoretical price, without latency, slippage, or fill-ratio
/// issues. Useful for first-pass strategy tests and for exercising the
/// surrounding pipeline in isolation from friction modeling.
pub struct PassthroughExecutionHandler {
    event_sender: queue::EventSender,
    venue: String,
}

impl PassthroughExecutionHandler {
    pub fn new(event_sender: queue::EventSender, venue: &str) -> anyhow::Result<Self> {
        if venue.trim().is_empty() {
            anyhow::bail!("Venue cannot be empty!");
        }

        anyhow::Ok(
            Self {
                event_sender,
                venue: venue.to_string(),
            }
        )
    }

}

impl ExecutionHandler for PassthroughExecutionHandler {
    fn execute_order(
        &mut self,
        event: &event::Event,
        market: &dyn market::MarketView,
        clock: &clock::SimulationClock,
    ) -> anyhow::Result<()> {
        let order = match event {
            event::Event::Order(order) => order,
            other => {
                log::debug!("Ignoring {} event", other.event_type());
                return anyhow::Ok(());
            }
        };

        let now = clock.now().ok_or_else(|| {
            anyhow::anyhow!(
                "Simulated clock never advanced before executing order {:?}",
                order
            )
        })?;

        if order.quantity <= 0.0 {
            anyhow::bail!(
                "Non-positive quantity reached the execution handler: order {:?} at simulated time {}",
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

        let fill_price = market.latest_bar(&order.symbol).map(|bar| bar.close);

        let fill_event = event::FillEvent::new(
            now,
            order.symbol.clone(),
            self.venue.clone(),
            order.quantity,
            order.direction,
            fill_price,
            None,
        );

        self.event_sender.push(event::Event::Fill(fill_event))?;

        anyhow::Ok(())
    }

}
