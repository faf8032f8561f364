use super::cadence::Cadence;
use super::server::Server;
use std::sync::Arc;
use std::time::Duration;

/// The pairing loop. Wakes every second and drains the queue two at a time,
/// strictly FIFO, no skill matching. Each pair is handed to its own kickoff
/// task so the staged start delays never stall the next pairing cycle.
///
/// Connectivity is deliberately not re-checked at pop time: a pair whose
/// player bailed between queueing and pairing still forms, and the reaper
/// settles it on its next sweep.
pub struct Matchmaker {
    server: Arc<Server>,
}

impl Matchmaker {
    pub fn new(server: Arc<Server>) -> Self {
        Self { server }
    }
}

#[async_trait::async_trait]
impl Cadence for Matchmaker {
    fn period(&self) -> Duration {
        crate::MATCHMAKER_PERIOD
    }

    async fn tick(&self) {
        while let Some((a, b)) = self.server.queue().pop_pair() {
            let duel = self.server.arena().create(a, b);
            log::info!("matchmaker paired {} vs {} into match {}", a, b, duel);
            tokio::spawn(Server::kickoff(self.server.clone(), duel, a, b));
        }
    }
}
