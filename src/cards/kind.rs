use crate::Arbitrary;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// The three card kinds. Kind is the only field a duel consults:
/// every kind preys on exactly one other, closing the cycle
/// HYDRA > QUIMERA > GORGONA > HYDRA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    Hydra,
    Quimera,
    Gorgona,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Hydra, Kind::Quimera, Kind::Gorgona];

    /// the kind this one defeats
    pub fn prey(&self) -> Kind {
        match self {
            Kind::Hydra => Kind::Quimera,
            Kind::Quimera => Kind::Gorgona,
            Kind::Gorgona => Kind::Hydra,
        }
    }
    pub fn beats(&self, other: &Kind) -> bool {
        self.prey() == *other
    }
    /// flavor line for the winning pairing, used in match-end summaries
    pub fn takedown(&self) -> &'static str {
        match self {
            Kind::Hydra => "HYDRA devours QUIMERA!",
            Kind::Quimera => "QUIMERA shreds GORGONA!",
            Kind::Gorgona => "GORGONA petrifies HYDRA!",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Kind::Hydra => write!(f, "HYDRA"),
            Kind::Quimera => write!(f, "QUIMERA"),
            Kind::Gorgona => write!(f, "GORGONA"),
        }
    }
}

impl TryFrom<&str> for Kind {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> anyhow::Result<Self> {
        match s {
            "HYDRA" => Ok(Kind::Hydra),
            "QUIMERA" => Ok(Kind::Quimera),
            "GORGONA" => Ok(Kind::Gorgona),
            _ => Err(anyhow::anyhow!("invalid card type")),
        }
    }
}

impl Arbitrary for Kind {
    fn random() -> Self {
        Self::ALL[rand::random_range(0..Self::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_closes() {
        assert!(Kind::Hydra.prey() == Kind::Quimera);
        assert!(Kind::Quimera.prey() == Kind::Gorgona);
        assert!(Kind::Gorgona.prey() == Kind::Hydra);
    }

    #[test]
    fn full_matrix() {
        for a in Kind::ALL {
            for b in Kind::ALL {
                match (a.beats(&b), b.beats(&a)) {
                    (true, true) => panic!("{} and {} beat each other", a, b),
                    (false, false) => assert!(a == b),
                    _ => assert!(a != b),
                }
            }
        }
    }

    #[test]
    fn wire_spelling() {
        for kind in Kind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert!(json == format!("\"{}\"", kind));
            assert!(serde_json::from_str::<Kind>(&json).unwrap() == kind);
            assert!(Kind::try_from(kind.to_string().as_str()).unwrap() == kind);
        }
        assert!(Kind::try_from("KRAKEN").is_err());
    }
}
