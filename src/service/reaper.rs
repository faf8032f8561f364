use super::cadence::Cadence;
use super::server::Server;
use std::sync::Arc;
use std::time::Duration;

/// The orphan-match reaper. Every five seconds it walks the unfinished
/// duels and checks both seats against the session table: a lone survivor
/// wins by forfeit, an empty table is cancelled, a full table plays on.
/// The sweep itself lives on the server so tests can run it on demand.
pub struct Reaper {
    server: Arc<Server>,
}

impl Reaper {
    pub fn new(server: Arc<Server>) -> Self {
        Self { server }
    }
}

#[async_trait::async_trait]
impl Cadence for Reaper {
    fn period(&self) -> Duration {
        crate::REAPER_PERIOD
    }

    async fn tick(&self) {
        self.server.sweep();
    }
}
