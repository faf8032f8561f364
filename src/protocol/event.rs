use crate::DuelId;
use crate::PlayerId;
use serde::Deserialize;
use serde::Serialize;

// Server-push payloads. These never answer a request; they land on a
// connection because the match that connection owns changed state.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchFound {
    pub match_id: DuelId,
    pub opponent_id: PlayerId,
    pub opponent_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStart {
    pub match_id: DuelId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEnd {
    pub match_id: DuelId,
    pub winner_id: PlayerId,
    pub winner_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub match_id: DuelId,
    pub message: String,
    pub your_turn: bool,
    pub opponent_moved: bool,
    pub game_over: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnUpdate {
    pub match_id: DuelId,
    pub message: String,
    pub your_turn: bool,
}
