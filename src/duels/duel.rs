use super::phase::Phase;
use crate::DuelId;
use crate::PlayerId;
use crate::cards::Card;

/// One two-player, single-round match. The record holds ids and the two
/// played-card slots only; names and inventories resolve through the
/// registry so nothing here outlives its lock.
///
/// Player `a` is the first mover: the first of the queue pair, first to
/// play, and the winner of a tied reveal.
#[derive(Debug, Clone)]
pub struct Duel {
    id: DuelId,
    a: PlayerId,
    b: PlayerId,
    phase: Phase,
    started: bool,
    turn: Option<PlayerId>,
    card_a: Option<Card>,
    card_b: Option<Card>,
    winner: Option<PlayerId>,
}

impl Duel {
    pub fn new(id: DuelId, a: PlayerId, b: PlayerId) -> Self {
        Self {
            id,
            a,
            b,
            phase: Phase::Waiting,
            started: false,
            turn: None,
            card_a: None,
            card_b: None,
            winner: None,
        }
    }

    pub fn id(&self) -> DuelId {
        self.id
    }
    pub fn a(&self) -> PlayerId {
        self.a
    }
    pub fn b(&self) -> PlayerId {
        self.b
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn started(&self) -> bool {
        self.started
    }
    pub fn turn(&self) -> Option<PlayerId> {
        self.turn
    }
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }
    pub fn card_a(&self) -> Option<Card> {
        self.card_a
    }
    pub fn card_b(&self) -> Option<Card> {
        self.card_b
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.a == player || self.b == player
    }
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        match player {
            p if p == self.a => Some(self.b),
            p if p == self.b => Some(self.a),
            _ => None,
        }
    }
    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    pub(super) fn slot(&self, player: PlayerId) -> Option<Card> {
        match player {
            p if p == self.a => self.card_a,
            _ => self.card_b,
        }
    }
    pub(super) fn record(&mut self, player: PlayerId, card: Card) {
        match player {
            p if p == self.a => self.card_a = Some(card),
            _ => self.card_b = Some(card),
        }
    }
    pub(super) fn both_played(&self) -> bool {
        self.card_a.is_some() && self.card_b.is_some()
    }
    pub(super) fn swap_turn(&mut self) {
        self.turn = self.turn.and_then(|t| self.opponent_of(t));
    }

    /// Waiting → Playing
    pub(super) fn advance(&mut self) -> bool {
        match self.phase {
            Phase::Waiting => {
                self.phase = Phase::Playing;
                true
            }
            _ => false,
        }
    }
    /// deal-in: the game proper begins, first mover on the clock
    pub(super) fn deal_in(&mut self) -> bool {
        match (self.phase, self.started) {
            (Phase::Playing, false) => {
                self.started = true;
                self.turn = Some(self.a);
                true
            }
            _ => false,
        }
    }
    pub(super) fn finish(&mut self, winner: PlayerId) {
        self.phase = Phase::Finished;
        self.winner = Some(winner);
        self.turn = None;
    }
    pub(super) fn cancel(&mut self) {
        self.phase = Phase::Cancelled;
        self.turn = None;
    }

    /// Who wins the filled slots: the cycle decides, ties go to the first
    /// mover. None until both slots are filled.
    pub(super) fn victor(&self) -> Option<PlayerId> {
        let card_a = self.card_a?;
        let card_b = self.card_b?;
        if card_b.kind().beats(&card_a.kind()) {
            Some(self.b)
        } else {
            Some(self.a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Kind;

    #[test]
    fn lifecycle_gates() {
        let mut duel = Duel::new(1, 10, 20);
        assert!(!duel.deal_in()); // cannot deal in before playing
        assert!(duel.advance());
        assert!(!duel.advance()); // second start is a no-op
        assert!(duel.deal_in());
        assert!(!duel.deal_in());
        assert!(duel.turn() == Some(10));
    }

    #[test]
    fn ties_favor_the_first_mover() {
        for kind in Kind::ALL {
            let mut duel = Duel::new(1, 10, 20);
            duel.record(10, Card::from(kind));
            duel.record(20, Card::from(kind));
            assert!(duel.victor() == Some(10));
        }
    }

    #[test]
    fn cycle_decides_mixed_reveals() {
        for a in Kind::ALL {
            for b in Kind::ALL.into_iter().filter(|b| *b != a) {
                let mut duel = Duel::new(1, 10, 20);
                duel.record(10, Card::from(a));
                duel.record(20, Card::from(b));
                let expected = if a.beats(&b) { 10 } else { 20 };
                assert!(duel.victor() == Some(expected));
            }
        }
    }

    #[test]
    fn no_victor_until_both_slots_fill() {
        let mut duel = Duel::new(1, 10, 20);
        assert!(duel.victor().is_none());
        duel.record(10, Card::from(Kind::Hydra));
        assert!(duel.victor().is_none());
    }
}
