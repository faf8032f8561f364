use super::player::Player;
use crate::PlayerId;
use crate::cards::Card;
use crate::cards::Kind;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// The account table. One registry-wide mutex serializes every read and
/// mutation; matches and the queue hold player ids and come through here for
/// names, stats, and inventories rather than holding live references.
#[derive(Debug)]
pub struct Registry {
    table: Mutex<Vec<Player>>,
    count: AtomicU64,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            table: Mutex::new(Vec::new()),
            count: AtomicU64::new(1),
        }
    }
}

impl Registry {
    /// Duplicate usernames lose to the earlier registration; length minima
    /// are checked on the trimmed fields but the stored values are verbatim.
    pub fn register(&self, username: &str, password: &str) -> anyhow::Result<PlayerId> {
        let mut table = self.table.lock().expect("registry mutex");
        if table.iter().any(|player| player.username() == username) {
            anyhow::bail!("username is already taken");
        }
        if username.trim().chars().count() < crate::MIN_USERNAME {
            anyhow::bail!("username must be at least {} characters", crate::MIN_USERNAME);
        }
        if password.trim().chars().count() < crate::MIN_PASSWORD {
            anyhow::bail!("password must be at least {} characters", crate::MIN_PASSWORD);
        }
        let id = self.count.fetch_add(1, Ordering::Relaxed);
        table.push(Player::new(id, username, password));
        Ok(id)
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Option<PlayerId> {
        self.table
            .lock()
            .expect("registry mutex")
            .iter()
            .find(|player| player.credentials_match(username, password))
            .map(|player| player.id())
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.read(id, |_| ()).is_some()
    }

    pub fn username(&self, id: PlayerId) -> Option<String> {
        self.read(id, |player| player.username().to_string())
    }

    /// (username, wins, losses, win rate) for the stats response
    pub fn scoreline(&self, id: PlayerId) -> Option<(String, u32, u32, f64)> {
        self.read(id, |player| {
            (
                player.username().to_string(),
                player.wins(),
                player.losses(),
                player.win_rate(),
            )
        })
    }

    pub fn add_win(&self, id: PlayerId) {
        self.edit(id, |player| player.add_win())
            .ok_or_else(|| anyhow::anyhow!("no such player {}", id))
            .inspect_err(|e| log::warn!("win not recorded: {}", e))
            .ok();
    }

    pub fn add_loss(&self, id: PlayerId) {
        self.edit(id, |player| player.add_loss())
            .ok_or_else(|| anyhow::anyhow!("no such player {}", id))
            .inspect_err(|e| log::warn!("loss not recorded: {}", e))
            .ok();
    }

    pub fn grant(&self, id: PlayerId, cards: Vec<Card>) -> bool {
        self.edit(id, |player| player.add_cards(cards)).is_some()
    }

    pub fn holdings(&self, id: PlayerId) -> Option<usize> {
        self.read(id, |player| player.holdings())
    }

    pub fn tally(&self, id: PlayerId) -> Option<(usize, usize, usize)> {
        self.read(id, |player| player.tally())
    }

    pub fn has_kind(&self, id: PlayerId, kind: Kind) -> bool {
        self.read(id, |player| player.has_kind(kind)).unwrap_or(false)
    }

    pub fn remove_kind(&self, id: PlayerId, kind: Kind) -> Option<Card> {
        self.edit(id, |player| player.remove_kind(kind)).flatten()
    }

    pub fn inventory(&self, id: PlayerId) -> Option<Vec<Card>> {
        self.read(id, |player| player.inventory().to_vec())
    }

    fn read<T>(&self, id: PlayerId, f: impl FnOnce(&Player) -> T) -> Option<T> {
        self.table
            .lock()
            .expect("registry mutex")
            .iter()
            .find(|player| player.id() == id)
            .map(f)
    }

    fn edit<T>(&self, id: PlayerId, f: impl FnOnce(&mut Player) -> T) -> Option<T> {
        self.table
            .lock()
            .expect("registry mutex")
            .iter_mut()
            .find(|player| player.id() == id)
            .map(f)
    }
}
