// fillsim_core/src/clock.rs

//! Simulated time source for the backtest.
//! The data-replay loop advances the clock from bar timestamps; every
//! fill is stamped from here, never from wall-clock time, so repeated
//! runs over the same data produce identical timestamps.

/// Monotonic simulated clock. Starts unset; the first `advance` call
/// establishes simulated time.
#[derive(Debug, Default)]
pub struct SimulationClock {
    now: Option<chrono::DateTime<chrono::Utc>>,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self { now: None }
    }

    /// Current simulated time, `None` until the first advance.
    pub fn now(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.now
    }

    /// Moves simulated time forward. A backwards move means the driving
    /// loop replayed data out of order, which would let fills see the
    /// future; that is unrecoverable.
    pub fn advance(&mut self, timeindex: chrono::DateTime<chrono::Utc>) -> anyhow::Result<()> {
        if let Some(now) = self.now {
            if timeindex < now {
                anyhow::bail!(
                    "Simulated clock moved backwards: {} -> {}",
                    now,
                    timeindex
                );
            }
        }

        self.now = Some(timeindex);
        anyhow::Ok(())
    }

}
