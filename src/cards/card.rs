use super::kind::Kind;
use super::rarity::Rarity;
use crate::Arbitrary;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// A card in a player's inventory or played into a duel slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "type")]
    kind: Kind,
    rarity: Rarity,
}

impl Card {
    pub fn kind(&self) -> Kind {
        self.kind
    }
    pub fn rarity(&self) -> Rarity {
        self.rarity
    }
}

// the stock ties each kind to a fixed tier: the scarcer the counter,
// the higher the tier
impl From<Kind> for Card {
    fn from(kind: Kind) -> Self {
        Self {
            kind,
            rarity: match kind {
                Kind::Hydra => Rarity::Common,
                Kind::Quimera => Rarity::Rare,
                Kind::Gorgona => Rarity::Epic,
            },
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{} ({})", self.kind, self.rarity)
    }
}

impl Arbitrary for Card {
    fn random() -> Self {
        Self::from(Kind::random())
    }
}
