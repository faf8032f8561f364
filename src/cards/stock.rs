use super::card::Card;
use super::kind::Kind;
use std::sync::Mutex;

/// Finite process-wide card inventory. Every mutation happens under one
/// mutex; a pack draw either fully succeeds or leaves the counters exactly
/// as it found them. Counters only ever decrease across the lifetime of the
/// process, modulo the intra-pack rollback.
#[derive(Debug)]
pub struct Stock {
    counters: Mutex<Counters>,
}

#[derive(Debug, Clone, Copy)]
struct Counters {
    hydra: u32,
    quimera: u32,
    gorgona: u32,
}

impl Counters {
    fn total(&self) -> u32 {
        self.hydra + self.quimera + self.gorgona
    }

    /// One weighted draw against the live counters. The roll lands in the
    /// hydra region, the quimera region, or the gorgona remainder, and the
    /// chosen counter is decremented before the next draw sees it.
    fn draw(&mut self) -> Option<Card> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let roll = rand::random_range(0..total);
        if roll < self.hydra {
            self.hydra -= 1;
            Some(Card::from(Kind::Hydra))
        } else if roll < self.hydra + self.quimera {
            self.quimera -= 1;
            Some(Card::from(Kind::Quimera))
        } else {
            self.gorgona -= 1;
            Some(Card::from(Kind::Gorgona))
        }
    }

    fn shelve(&mut self, card: Card) {
        match card.kind() {
            Kind::Hydra => self.hydra += 1,
            Kind::Quimera => self.quimera += 1,
            Kind::Gorgona => self.gorgona += 1,
        }
    }
}

impl Default for Stock {
    fn default() -> Self {
        Self::with(crate::STOCK_HYDRA, crate::STOCK_QUIMERA, crate::STOCK_GORGONA)
    }
}

impl Stock {
    pub fn with(hydra: u32, quimera: u32, gorgona: u32) -> Self {
        Self {
            counters: Mutex::new(Counters {
                hydra,
                quimera,
                gorgona,
            }),
        }
    }

    /// Atomic multi-draw of one pack. Fails without mutation when fewer than
    /// a pack's worth of cards remain; an exhausted intermediate draw (cannot
    /// happen given the opening check) rolls back the partial pack.
    pub fn open_pack(&self) -> Option<Vec<Card>> {
        let mut counters = self.counters.lock().expect("stock mutex");
        if (counters.total() as usize) < crate::PACK_SIZE {
            return None;
        }
        let mut pack = Vec::with_capacity(crate::PACK_SIZE);
        for _ in 0..crate::PACK_SIZE {
            match counters.draw() {
                Some(card) => pack.push(card),
                None => {
                    pack.drain(..).for_each(|card| counters.shelve(card));
                    return None;
                }
            }
        }
        Some(pack)
    }

    /// (hydra, quimera, gorgona, total) under the same mutex as the draws
    pub fn snapshot(&self) -> (u32, u32, u32, u32) {
        let counters = self.counters.lock().expect("stock mutex");
        (
            counters.hydra,
            counters.quimera,
            counters.gorgona,
            counters.total(),
        )
    }

    pub fn remaining(&self) -> u32 {
        self.counters.lock().expect("stock mutex").total()
    }
}
