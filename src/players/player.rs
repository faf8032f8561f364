use crate::PlayerId;
use crate::cards::Card;
use crate::cards::Kind;

/// One account. Identity and credentials are fixed at registration; stats
/// and the card inventory mutate for the lifetime of the process. The
/// credential is an opaque blob compared verbatim.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    username: String,
    password: String,
    wins: u32,
    losses: u32,
    inventory: Vec<Card>,
}

impl Player {
    pub fn new(id: PlayerId, username: &str, password: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
            password: password.to_string(),
            wins: 0,
            losses: 0,
            inventory: Vec::new(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn credentials_match(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }
    pub fn losses(&self) -> u32 {
        self.losses
    }
    pub fn add_win(&mut self) {
        self.wins += 1;
    }
    pub fn add_loss(&mut self) {
        self.losses += 1;
    }
    /// percentage of games won, 0.0 before the first game
    pub fn win_rate(&self) -> f64 {
        match self.wins + self.losses {
            0 => 0.0,
            played => f64::from(self.wins) / f64::from(played) * 100.0,
        }
    }

    pub fn inventory(&self) -> &[Card] {
        &self.inventory
    }
    pub fn holdings(&self) -> usize {
        self.inventory.len()
    }
    pub fn add_cards(&mut self, cards: Vec<Card>) {
        self.inventory.extend(cards);
    }
    /// (hydra, quimera, gorgona) counts
    pub fn tally(&self) -> (usize, usize, usize) {
        self.inventory
            .iter()
            .fold((0, 0, 0), |(h, q, g), card| match card.kind() {
                Kind::Hydra => (h + 1, q, g),
                Kind::Quimera => (h, q + 1, g),
                Kind::Gorgona => (h, q, g + 1),
            })
    }
    pub fn has_kind(&self, kind: Kind) -> bool {
        self.inventory.iter().any(|card| card.kind() == kind)
    }
    /// removes and returns the first card of the kind, if any
    pub fn remove_kind(&mut self, kind: Kind) -> Option<Card> {
        self.inventory
            .iter()
            .position(|card| card.kind() == kind)
            .map(|i| self.inventory.remove(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rarity;

    fn stacked() -> Player {
        let mut player = Player::new(1, "alice", "abcd");
        player.add_cards(vec![
            Card::from(Kind::Hydra),
            Card::from(Kind::Hydra),
            Card::from(Kind::Gorgona),
        ]);
        player
    }

    #[test]
    fn win_rate_guards_division() {
        let mut player = Player::new(1, "alice", "abcd");
        assert!(player.win_rate() == 0.0);
        player.add_win();
        player.add_win();
        player.add_loss();
        assert!(player.wins() == 2);
        assert!(player.losses() == 1);
        assert!((player.win_rate() - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn tally_counts_kinds() {
        assert!(stacked().tally() == (2, 0, 1));
    }

    #[test]
    fn remove_takes_first_match_only() {
        let mut player = stacked();
        assert!(player.has_kind(Kind::Hydra));
        let removed = player.remove_kind(Kind::Hydra).unwrap();
        assert!(removed.kind() == Kind::Hydra);
        assert!(removed.rarity() == Rarity::Common);
        assert!(player.holdings() == 2);
        assert!(player.remove_kind(Kind::Quimera).is_none());
        assert!(player.holdings() == 2);
    }
}
