use super::duel::Duel;
use super::outcome::Progress;
use super::outcome::Settlement;
use super::phase::Phase;
use crate::DuelId;
use crate::PlayerId;
use crate::cards::Kind;
use crate::players::Registry;
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// Match store and state machine. Owns every duel record; all transitions
/// run under the arena mutex, and stat/inventory mutation nests through the
/// registry, which follows the arena in the lock order.
#[derive(Debug)]
pub struct Arena {
    duels: Mutex<Vec<Duel>>,
    count: AtomicU64,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            duels: Mutex::new(Vec::new()),
            count: AtomicU64::new(1),
        }
    }
}

impl Arena {
    pub fn create(&self, a: PlayerId, b: PlayerId) -> DuelId {
        let id = self.count.fetch_add(1, Ordering::Relaxed);
        self.duels
            .lock()
            .expect("arena mutex")
            .push(Duel::new(id, a, b));
        log::info!("match {} created: {} vs {}", id, a, b);
        id
    }

    /// Waiting → Playing. Refuses on any other phase so a reaped pairing
    /// cannot be resurrected by its own kickoff task.
    pub fn start(&self, id: DuelId) -> bool {
        self.edit(id, |duel| duel.advance())
            .unwrap_or(false)
            .then(|| log::info!("match {} started", id))
            .is_some()
    }

    /// the game proper: first mover goes on the clock
    pub fn begin(&self, id: DuelId) -> bool {
        self.edit(id, |duel| duel.deal_in())
            .unwrap_or(false)
            .then(|| log::info!("match {} dealt in", id))
            .is_some()
    }

    /// One move through the full gate sequence. The error string is the
    /// user-facing refusal; an accepted move either passes the turn or
    /// settles the duel, with stats applied exactly once at settlement.
    pub fn play(
        &self,
        registry: &Registry,
        id: DuelId,
        player: PlayerId,
        card_type: &str,
    ) -> anyhow::Result<Progress> {
        let mut duels = self.duels.lock().expect("arena mutex");
        let duel = duels
            .iter_mut()
            .find(|duel| duel.id() == id)
            .ok_or_else(|| anyhow::anyhow!("match not found"))?;
        if duel.phase() != Phase::Playing {
            anyhow::bail!("the match is not in progress");
        }
        if !duel.started() {
            anyhow::bail!("the game has not started yet");
        }
        if duel.turn() != Some(player) {
            anyhow::bail!("not your turn");
        }
        let kind = Kind::try_from(card_type)?;
        if !duel.involves(player) {
            anyhow::bail!("you are not part of this match");
        }
        if duel.slot(player).is_some() {
            anyhow::bail!("you already made your move");
        }
        if !registry.has_kind(player, kind) {
            anyhow::bail!("you have no {} cards in your inventory", kind);
        }
        let card = registry
            .remove_kind(player, kind)
            .ok_or_else(|| anyhow::anyhow!("could not remove the card from your inventory"))?;
        duel.record(player, card);
        log::info!("match {}: player {} played {}", id, player, card);
        if duel.both_played() {
            Ok(Progress::Settled(Self::settle(registry, duel)))
        } else {
            duel.swap_turn();
            let next = duel.turn().ok_or_else(|| anyhow::anyhow!("turn lost"))?;
            Ok(Progress::Passed { next, idle: player })
        }
    }

    fn settle(registry: &Registry, duel: &mut Duel) -> Settlement {
        let winner = duel.victor().expect("both slots filled");
        let loser = duel.opponent_of(winner).expect("winner is a member");
        duel.finish(winner);
        registry.add_win(winner);
        registry.add_loss(loser);
        let kind_a = duel.card_a().expect("slot a filled").kind();
        let kind_b = duel.card_b().expect("slot b filled").kind();
        let name_a = registry.username(duel.a()).unwrap_or_default();
        let name_b = registry.username(duel.b()).unwrap_or_default();
        let winner_name = if winner == duel.a() {
            name_a.clone()
        } else {
            name_b.clone()
        };
        let summary = if kind_a == kind_b {
            format!(
                "Both played {}. {} takes the round as first mover.",
                kind_a, winner_name
            )
        } else {
            let strike = if kind_a.beats(&kind_b) { kind_a } else { kind_b };
            format!(
                "{} ({}) vs {} ({}): {}",
                name_a,
                kind_a,
                name_b,
                kind_b,
                strike.takedown()
            )
        };
        log::info!("match {} settled: {}", duel.id(), summary);
        Settlement {
            duel: duel.id(),
            a: duel.a(),
            b: duel.b(),
            winner,
            winner_name,
            summary,
        }
    }

    /// Forfeit resolution for a disconnected opponent. Idempotent: only a
    /// duel that is not yet over transitions, so stats land exactly once.
    pub fn force_win(
        &self,
        registry: &Registry,
        id: DuelId,
        winner: PlayerId,
    ) -> Option<Settlement> {
        let mut duels = self.duels.lock().expect("arena mutex");
        let duel = duels.iter_mut().find(|duel| duel.id() == id)?;
        if duel.is_over() {
            return None;
        }
        let loser = duel.opponent_of(winner)?;
        duel.finish(winner);
        registry.add_win(winner);
        registry.add_loss(loser);
        let winner_name = registry.username(winner).unwrap_or_default();
        log::info!("match {} forfeited to {} ({})", id, winner, winner_name);
        Some(Settlement {
            duel: id,
            a: duel.a(),
            b: duel.b(),
            winner,
            winner_name: winner_name.clone(),
            summary: format!("{} wins by forfeit", winner_name),
        })
    }

    /// both players gone; nobody scores
    pub fn cancel(&self, id: DuelId) -> bool {
        self.edit(id, |duel| match duel.is_over() {
            true => false,
            false => {
                duel.cancel();
                true
            }
        })
        .unwrap_or(false)
        .then(|| log::info!("match {} cancelled", id))
        .is_some()
    }

    /// the one duel this player is still part of, if any
    pub fn duel_of(&self, player: PlayerId) -> Option<DuelId> {
        self.duels
            .lock()
            .expect("arena mutex")
            .iter()
            .find(|duel| duel.involves(player) && !duel.is_over())
            .map(|duel| duel.id())
    }

    /// unfinished duels with their sides, for the reaper sweep
    pub fn live(&self) -> Vec<(DuelId, PlayerId, PlayerId)> {
        self.duels
            .lock()
            .expect("arena mutex")
            .iter()
            .filter(|duel| !duel.is_over())
            .map(|duel| (duel.id(), duel.a(), duel.b()))
            .collect()
    }

    pub fn peek(&self, id: DuelId) -> Option<Duel> {
        self.duels
            .lock()
            .expect("arena mutex")
            .iter()
            .find(|duel| duel.id() == id)
            .cloned()
    }

    pub fn census(&self) -> Census {
        self.duels
            .lock()
            .expect("arena mutex")
            .iter()
            .fold(Census::default(), |mut census, duel| {
                census.total += 1;
                match duel.phase() {
                    Phase::Waiting => census.waiting += 1,
                    Phase::Playing => census.playing += 1,
                    Phase::Finished => census.finished += 1,
                    Phase::Cancelled => census.cancelled += 1,
                }
                census
            })
    }

    fn edit<T>(&self, id: DuelId, f: impl FnOnce(&mut Duel) -> T) -> Option<T> {
        self.duels
            .lock()
            .expect("arena mutex")
            .iter_mut()
            .find(|duel| duel.id() == id)
            .map(f)
    }
}

/// Phase headcount across every duel ever created, for operational logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    pub total: usize,
    pub waiting: usize,
    pub playing: usize,
    pub finished: usize,
    pub cancelled: usize,
}

impl Display for Census {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} matches: {} waiting, {} playing, {} finished, {} cancelled",
            self.total, self.waiting, self.playing, self.finished, self.cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;

    fn armed(registry: &Registry, username: &str, kinds: &[Kind]) -> PlayerId {
        let id = registry.register(username, "abcd").unwrap();
        registry.grant(id, kinds.iter().map(|kind| Card::from(*kind)).collect());
        id
    }

    fn playing(arena: &Arena, a: PlayerId, b: PlayerId) -> DuelId {
        let id = arena.create(a, b);
        assert!(arena.start(id));
        assert!(arena.begin(id));
        id
    }

    #[test]
    fn moves_are_gated_by_phase_and_turn() {
        let registry = Registry::default();
        let arena = Arena::default();
        let a = armed(&registry, "alice", &[Kind::Hydra]);
        let b = armed(&registry, "bob", &[Kind::Quimera]);
        let id = arena.create(a, b);
        assert!(
            arena
                .play(&registry, id, a, "HYDRA")
                .unwrap_err()
                .to_string()
                .contains("not in progress")
        );
        assert!(arena.start(id));
        assert!(
            arena
                .play(&registry, id, a, "HYDRA")
                .unwrap_err()
                .to_string()
                .contains("not started")
        );
        assert!(arena.begin(id));
        assert!(
            arena
                .play(&registry, id, b, "QUIMERA")
                .unwrap_err()
                .to_string()
                .contains("not your turn")
        );
        assert!(
            arena
                .play(&registry, id, a, "KRAKEN")
                .unwrap_err()
                .to_string()
                .contains("invalid card type")
        );
        assert!(
            arena
                .play(&registry, id, a, "GORGONA")
                .unwrap_err()
                .to_string()
                .contains("no GORGONA cards")
        );
        assert!(
            arena
                .play(&registry, 99, a, "HYDRA")
                .unwrap_err()
                .to_string()
                .contains("not found")
        );
    }

    #[test]
    fn full_round_settles_and_scores_once() {
        let registry = Registry::default();
        let arena = Arena::default();
        let a = armed(&registry, "alice", &[Kind::Hydra]);
        let b = armed(&registry, "bob", &[Kind::Quimera]);
        let id = playing(&arena, a, b);
        match arena.play(&registry, id, a, "HYDRA").unwrap() {
            Progress::Passed { next, idle } => {
                assert!(next == b);
                assert!(idle == a);
            }
            _ => panic!("first move cannot settle"),
        }
        // the played card left the inventory
        assert!(registry.holdings(a) == Some(0));
        match arena.play(&registry, id, b, "QUIMERA").unwrap() {
            Progress::Settled(settlement) => {
                assert!(settlement.winner == a);
                assert!(settlement.winner_name == "alice");
                assert!(settlement.summary.contains("devours"));
            }
            _ => panic!("second move must settle"),
        }
        assert!(registry.scoreline(a).unwrap().1 == 1);
        assert!(registry.scoreline(b).unwrap().2 == 1);
        // the settled duel no longer binds its players
        assert!(arena.duel_of(a).is_none());
        assert!(arena.duel_of(b).is_none());
        // and cannot be replayed
        assert!(arena.play(&registry, id, a, "HYDRA").is_err());
    }

    #[test]
    fn tied_reveal_goes_to_the_first_mover() {
        let registry = Registry::default();
        let arena = Arena::default();
        let a = armed(&registry, "alice", &[Kind::Gorgona]);
        let b = armed(&registry, "bob", &[Kind::Gorgona]);
        let id = playing(&arena, a, b);
        arena.play(&registry, id, a, "GORGONA").unwrap();
        match arena.play(&registry, id, b, "GORGONA").unwrap() {
            Progress::Settled(settlement) => {
                assert!(settlement.winner == a);
                assert!(settlement.summary.contains("first mover"));
            }
            _ => panic!("second move must settle"),
        }
    }

    #[test]
    fn one_unfinished_duel_per_player() {
        let registry = Registry::default();
        let arena = Arena::default();
        let a = armed(&registry, "alice", &[Kind::Hydra]);
        let b = armed(&registry, "bob", &[Kind::Hydra]);
        let id = arena.create(a, b);
        assert!(arena.duel_of(a) == Some(id));
        assert!(arena.duel_of(b) == Some(id));
        assert!(arena.cancel(id));
        assert!(arena.duel_of(a).is_none());
    }

    #[test]
    fn forfeit_is_idempotent_and_scores_once() {
        let registry = Registry::default();
        let arena = Arena::default();
        let a = armed(&registry, "alice", &[Kind::Hydra]);
        let b = armed(&registry, "bob", &[Kind::Hydra]);
        let id = playing(&arena, a, b);
        let settlement = arena.force_win(&registry, id, a).unwrap();
        assert!(settlement.winner == a);
        assert!(arena.force_win(&registry, id, a).is_none());
        assert!(arena.cancel(id) == false);
        assert!(registry.scoreline(a).unwrap().1 == 1);
        assert!(registry.scoreline(b).unwrap().2 == 1);
    }

    #[test]
    fn reaped_pairing_cannot_be_resurrected() {
        let registry = Registry::default();
        let arena = Arena::default();
        let a = armed(&registry, "alice", &[Kind::Hydra]);
        let b = armed(&registry, "bob", &[Kind::Hydra]);
        let id = arena.create(a, b);
        arena.force_win(&registry, id, b).unwrap();
        assert!(!arena.start(id));
        assert!(!arena.begin(id));
    }

    #[test]
    fn census_counts_phases() {
        let registry = Registry::default();
        let arena = Arena::default();
        let a = armed(&registry, "alice", &[Kind::Hydra]);
        let b = armed(&registry, "bob", &[Kind::Hydra]);
        let c = armed(&registry, "carol", &[Kind::Hydra]);
        let d = armed(&registry, "dave", &[Kind::Hydra]);
        let first = arena.create(a, b);
        arena.create(c, d);
        arena.cancel(first);
        let census = arena.census();
        assert!(census.total == 2);
        assert!(census.waiting == 1);
        assert!(census.cancelled == 1);
        assert!(census.to_string().contains("2 matches"));
    }
}
