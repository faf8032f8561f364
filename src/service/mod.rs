mod cadence;
mod handler;
mod matchmaker;
mod queue;
mod reaper;
mod server;

pub use cadence::*;
pub use handler::*;
pub use matchmaker::*;
pub use queue::*;
pub use reaper::*;
pub use server::*;
