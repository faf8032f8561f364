use crate::PlayerId;
use crate::cards::Card;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<PlayerId>,
}

impl LoginResponse {
    pub fn granted(user_id: PlayerId) -> Self {
        Self {
            success: true,
            message: "login successful".to_string(),
            user_id: Some(user_id),
        }
    }
    pub fn denied(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            user_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<PlayerId>,
}

impl RegisterResponse {
    pub fn created(user_id: PlayerId) -> Self {
        Self {
            success: true,
            message: "account created".to_string(),
            user_id: Some(user_id),
        }
    }
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            user_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueResponse {
    pub success: bool,
    pub message: String,
    pub queue_size: usize,
}

impl QueueResponse {
    pub fn queued(queue_size: usize) -> Self {
        Self {
            success: true,
            message: "you joined the matchmaking queue".to_string(),
            queue_size,
        }
    }
    pub fn refused(message: impl Into<String>, queue_size: usize) -> Self {
        Self {
            success: false,
            message: message.into(),
            queue_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wins: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub losses: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<f64>,
}

impl StatsResponse {
    pub fn of(username: String, wins: u32, losses: u32, win_rate: f64) -> Self {
        Self {
            success: true,
            message: "stats retrieved".to_string(),
            username: Some(username),
            wins: Some(wins),
            losses: Some(losses),
            win_rate: Some(win_rate),
        }
    }
    pub fn denied(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            username: None,
            wins: None,
            losses: None,
            win_rate: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StockInfo {
    pub hydra: u32,
    pub quimera: u32,
    pub gorgona: u32,
    pub total: u32,
}

impl From<(u32, u32, u32, u32)> for StockInfo {
    fn from((hydra, quimera, gorgona, total): (u32, u32, u32, u32)) -> Self {
        Self {
            hydra,
            quimera,
            gorgona,
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPackResponse {
    pub success: bool,
    pub message: String,
    pub cards: Vec<Card>,
    pub stock_info: StockInfo,
}

impl CardPackResponse {
    pub fn opened(cards: Vec<Card>, stock_info: StockInfo) -> Self {
        Self {
            success: true,
            message: format!(
                "pack opened: {} cards added to your inventory; play them before opening another",
                cards.len()
            ),
            cards,
            stock_info,
        }
    }
    pub fn denied(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            cards: Vec::new(),
            stock_info: StockInfo::default(),
        }
    }
}
