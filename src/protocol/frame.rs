use super::event::*;
use super::request::*;
use super::response::*;
use serde::Deserialize;
use serde::Serialize;

/// Every message on the wire, in either direction, is one of these under the
/// `{"type": TAG, "data": {...}}` envelope, one JSON object per line.
/// The serde tag spelling is the wire tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frame {
    LoginRequest(LoginRequest),
    LoginResponse(LoginResponse),
    RegisterRequest(RegisterRequest),
    RegisterResponse(RegisterResponse),
    QueueRequest(QueueRequest),
    QueueResponse(QueueResponse),
    PingRequest(PingRequest),
    PingResponse(PingResponse),
    StatsRequest(StatsRequest),
    StatsResponse(StatsResponse),
    CardPackRequest(CardPackRequest),
    CardPackResponse(CardPackResponse),
    CardMove(CardMove),
    MatchFound(MatchFound),
    MatchStart(MatchStart),
    MatchEnd(MatchEnd),
    GameState(GameState),
    TurnUpdate(TurnUpdate),
}

impl Frame {
    /// one wire line, newline excluded
    pub fn encode(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).map_err(anyhow::Error::from)
    }

    pub fn decode(line: &str) -> anyhow::Result<Self> {
        serde_json::from_str(line).map_err(anyhow::Error::from)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Frame::LoginRequest(_) => "LOGIN_REQUEST",
            Frame::LoginResponse(_) => "LOGIN_RESPONSE",
            Frame::RegisterRequest(_) => "REGISTER_REQUEST",
            Frame::RegisterResponse(_) => "REGISTER_RESPONSE",
            Frame::QueueRequest(_) => "QUEUE_REQUEST",
            Frame::QueueResponse(_) => "QUEUE_RESPONSE",
            Frame::PingRequest(_) => "PING_REQUEST",
            Frame::PingResponse(_) => "PING_RESPONSE",
            Frame::StatsRequest(_) => "STATS_REQUEST",
            Frame::StatsResponse(_) => "STATS_RESPONSE",
            Frame::CardPackRequest(_) => "CARD_PACK_REQUEST",
            Frame::CardPackResponse(_) => "CARD_PACK_RESPONSE",
            Frame::CardMove(_) => "CARD_MOVE",
            Frame::MatchFound(_) => "MATCH_FOUND",
            Frame::MatchStart(_) => "MATCH_START",
            Frame::MatchEnd(_) => "MATCH_END",
            Frame::GameState(_) => "GAME_STATE",
            Frame::TurnUpdate(_) => "TURN_UPDATE",
        }
    }
}
