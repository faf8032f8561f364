use std::time::Duration;
use tokio::sync::watch;

/// A periodic background task. Implementors supply the period and one tick;
/// `run` loops until the shutdown signal flips (or its sender drops), which
/// lets tests drain the tickers deterministically instead of racing them.
/// Ticks never hold a store lock across the sleep.
#[async_trait::async_trait]
pub trait Cadence: Send + Sized + 'static {
    fn period(&self) -> Duration;

    async fn tick(&self);

    async fn run(self, mut halt: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                _ = halt.changed() => break,
                _ = tokio::time::sleep(self.period()) => self.tick().await,
            }
        }
    }
}
