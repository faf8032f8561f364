use crate::DuelId;
use crate::PlayerId;

/// What an accepted move did to the duel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// the opponent's slot is still empty; the turn passed to them
    Passed { next: PlayerId, idle: PlayerId },
    /// both slots filled; the duel resolved
    Settled(Settlement),
}

/// A finished duel, ready to broadcast and already reflected in the stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub duel: DuelId,
    pub a: PlayerId,
    pub b: PlayerId,
    pub winner: PlayerId,
    pub winner_name: String,
    pub summary: String,
}
