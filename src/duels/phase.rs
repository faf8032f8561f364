use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Lifecycle of a duel. Finished and Cancelled are terminal; everything the
/// reaper and the queue gate on reduces to `is_over`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    Playing,
    Finished,
    Cancelled,
}

impl Phase {
    pub fn is_over(&self) -> bool {
        matches!(self, Phase::Finished | Phase::Cancelled)
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Phase::Waiting => write!(f, "waiting"),
            Phase::Playing => write!(f, "playing"),
            Phase::Finished => write!(f, "finished"),
            Phase::Cancelled => write!(f, "cancelled"),
        }
    }
}
