use super::handler;
use super::matchmaker::Matchmaker;
use super::queue::Queue;
use super::reaper::Reaper;
use crate::DuelId;
use crate::PlayerId;
use crate::cards::Stock;
use crate::duels::Arena;
use crate::duels::Progress;
use crate::players::Registry;
use crate::protocol::*;
use crate::service::cadence::Cadence;
use crate::session::Outbox;
use crate::session::Sessions;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// The whole service as one aggregate. Every table the coordinator touches
/// lives behind its own store, handlers and background tasks share the
/// aggregate through an Arc, and nothing is a process global, so tests can
/// stand up as many independent servers as they like.
///
/// Lock order across stores: queue → arena → registry → stock → sessions.
/// No store lock is ever held across a socket write or a sleep; writes go
/// through per-connection outboxes instead.
pub struct Server {
    players: Registry,
    stock: Stock,
    queue: Queue,
    arena: Arena,
    sessions: Sessions,
    conns: AtomicU64,
    halt: watch::Sender<bool>,
}

impl Server {
    pub fn new() -> Arc<Self> {
        Self::with_stock(Stock::default())
    }

    /// a server over a custom stock, for exhaustion tests and tuning
    pub fn with_stock(stock: Stock) -> Arc<Self> {
        let (halt, _) = watch::channel(false);
        Arc::new(Self {
            players: Registry::default(),
            stock,
            queue: Queue::default(),
            arena: Arena::default(),
            sessions: Sessions::default(),
            conns: AtomicU64::new(0),
            halt,
        })
    }

    /// Bind, spawn the matchmaker and the reaper, and accept forever.
    /// Failing to bind is the one fatal error; failing to accept one
    /// connection is not.
    pub async fn run(addr: &str) -> anyhow::Result<()> {
        let server = Self::new();
        let listener = TcpListener::bind(addr).await?;
        log::info!("card-duel service listening on {}", addr);
        tokio::spawn(Matchmaker::new(server.clone()).run(server.watch()));
        tokio::spawn(Reaper::new(server.clone()).run(server.watch()));
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    log::info!("connection accepted from {}", peer);
                    tokio::spawn(handler::session(server.clone(), stream));
                }
                Err(e) => log::warn!("accept failed: {}", e),
            }
        }
    }

    pub fn players(&self) -> &Registry {
        &self.players
    }
    pub fn stock(&self) -> &Stock {
        &self.stock
    }
    pub fn queue(&self) -> &Queue {
        &self.queue
    }
    pub fn arena(&self) -> &Arena {
        &self.arena
    }
    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    pub fn watch(&self) -> watch::Receiver<bool> {
        self.halt.subscribe()
    }
    pub fn shutdown(&self) {
        self.halt.send_replace(true);
    }
    pub fn next_conn(&self) -> u64 {
        self.conns.fetch_add(1, Ordering::Relaxed) + 1
    }
}

// request handling: one method per client-originated tag, each returning the
// response frame for the requesting connection
impl Server {
    pub fn register(&self, req: &RegisterRequest) -> Frame {
        match self.players.register(&req.username, &req.password) {
            Ok(id) => {
                log::info!("registered {} as user {}", req.username, id);
                Frame::RegisterResponse(RegisterResponse::created(id))
            }
            Err(e) => {
                log::info!("registration refused for {}: {}", req.username, e);
                Frame::RegisterResponse(RegisterResponse::rejected(e.to_string()))
            }
        }
    }

    pub fn login(&self, outbox: &Outbox, req: &LoginRequest) -> Frame {
        match self.players.authenticate(&req.username, &req.password) {
            None => {
                log::info!("login failed for {}", req.username);
                Frame::LoginResponse(LoginResponse::denied("unknown username or wrong password"))
            }
            Some(id) => match self.sessions.claim(id, outbox.clone()) {
                true => {
                    log::info!("user {} logged in on connection {}", id, outbox.conn());
                    Frame::LoginResponse(LoginResponse::granted(id))
                }
                false => {
                    log::info!("login refused for user {}: session exists", id);
                    Frame::LoginResponse(LoginResponse::denied(
                        "account is already connected in another session",
                    ))
                }
            },
        }
    }

    pub fn enqueue(&self, req: &QueueRequest) -> Frame {
        let user = req.user_id;
        let refusal = |message: &str, queue: &Queue| {
            log::info!("queue refused for user {}: {}", user, message);
            Frame::QueueResponse(QueueResponse::refused(message, queue.len()))
        };
        if !self.sessions.is_online(user) {
            return refusal("you must be logged in to queue", &self.queue);
        }
        if self.arena.duel_of(user).is_some() {
            return refusal("you are already in a match", &self.queue);
        }
        if self.queue.contains(user) {
            return refusal("you are already in the queue", &self.queue);
        }
        match self.players.holdings(user) {
            None => refusal("player not found", &self.queue),
            Some(0) => refusal("you have no cards! open a pack before queueing", &self.queue),
            Some(_) => match self.queue.join(user) {
                None => refusal("you are already in the queue", &self.queue),
                Some(size) => {
                    let (h, q, g) = self.players.tally(user).unwrap_or_default();
                    log::info!(
                        "user {} queued at position {} holding H:{} Q:{} G:{}",
                        user, size, h, q, g
                    );
                    Frame::QueueResponse(QueueResponse::queued(size))
                }
            },
        }
    }

    pub fn ping(&self, req: &PingRequest) -> Frame {
        match self.sessions.is_online(req.user_id) {
            true => Frame::PingResponse(PingResponse {
                success: true,
                message: "pong".to_string(),
            }),
            false => Frame::PingResponse(PingResponse {
                success: false,
                message: "you must be logged in".to_string(),
            }),
        }
    }

    pub fn stats(&self, req: &StatsRequest) -> Frame {
        if !self.sessions.is_online(req.user_id) {
            return Frame::StatsResponse(StatsResponse::denied("you must be logged in"));
        }
        match self.players.scoreline(req.user_id) {
            None => Frame::StatsResponse(StatsResponse::denied("player not found")),
            Some((username, wins, losses, win_rate)) => {
                log::info!(
                    "stats for user {}: {}W-{}L ({:.1}%)",
                    req.user_id, wins, losses, win_rate
                );
                Frame::StatsResponse(StatsResponse::of(username, wins, losses, win_rate))
            }
        }
    }

    pub fn open_pack(&self, req: &CardPackRequest) -> Frame {
        let user = req.user_id;
        let denied = |message: String| {
            log::info!("pack refused for user {}: {}", user, message);
            Frame::CardPackResponse(CardPackResponse::denied(message))
        };
        if !self.sessions.is_online(user) {
            return denied("you must be logged in".to_string());
        }
        match self.players.holdings(user) {
            None => denied("player not found".to_string()),
            Some(held) if held > 0 => denied(format!(
                "you already have {} cards! play them in matches before opening another pack",
                held
            )),
            Some(_) => match self.stock.open_pack() {
                None => denied("not enough cards left in stock; try again later".to_string()),
                Some(cards) => {
                    self.players.grant(user, cards.clone());
                    let stock_info = StockInfo::from(self.stock.snapshot());
                    log::info!(
                        "pack opened for user {}: {}; {} cards left in stock",
                        user,
                        cards
                            .iter()
                            .map(|card| card.to_string())
                            .collect::<Vec<_>>()
                            .join(", "),
                        stock_info.total
                    );
                    Frame::CardPackResponse(CardPackResponse::opened(cards, stock_info))
                }
            },
        }
    }

    /// CARD_MOVE never gets a synchronous response type of its own: a
    /// refusal goes back to the requesting connection as a GAME_STATE, and
    /// an accepted move broadcasts TURN_UPDATE or MATCH_END to both sides.
    pub fn play_card(&self, outbox: &Outbox, req: &CardMove) {
        match self
            .arena
            .play(&self.players, req.match_id, req.user_id, &req.card_type)
        {
            Err(e) => {
                log::info!(
                    "move refused in match {} for user {}: {}",
                    req.match_id, req.user_id, e
                );
                outbox.deliver(Frame::GameState(GameState {
                    match_id: req.match_id,
                    message: e.to_string(),
                    your_turn: false,
                    opponent_moved: false,
                    game_over: false,
                }));
            }
            Ok(Progress::Passed { next, idle }) => {
                self.sessions.push(
                    next,
                    Frame::TurnUpdate(TurnUpdate {
                        match_id: req.match_id,
                        message: "Your turn! Pick a card to play.".to_string(),
                        your_turn: true,
                    }),
                );
                self.sessions.push(
                    idle,
                    Frame::TurnUpdate(TurnUpdate {
                        match_id: req.match_id,
                        message: "Card played! Waiting for your opponent...".to_string(),
                        your_turn: false,
                    }),
                );
            }
            Ok(Progress::Settled(settlement)) => {
                for side in [settlement.a, settlement.b] {
                    self.sessions.push(
                        side,
                        Frame::MatchEnd(MatchEnd {
                            match_id: settlement.duel,
                            winner_id: settlement.winner,
                            winner_name: settlement.winner_name.clone(),
                            message: settlement.summary.clone(),
                        }),
                    );
                }
            }
        }
    }
}

// match lifecycle driven from the background tasks
impl Server {
    /// Staged start of one freshly paired duel, run as its own task so the
    /// pacing sleeps never stall the matchmaking cycle. If the pairing was
    /// reaped while it slept, the stages refuse and nothing further is sent,
    /// keeping MATCH_END the last event of the match.
    pub async fn kickoff(self: Arc<Self>, duel: DuelId, a: PlayerId, b: PlayerId) {
        let name_a = self.players.username(a).unwrap_or_default();
        let name_b = self.players.username(b).unwrap_or_default();
        for (side, opponent_id, opponent_name) in [(a, b, &name_b), (b, a, &name_a)] {
            self.sessions.push(
                side,
                Frame::MatchFound(MatchFound {
                    match_id: duel,
                    opponent_id,
                    opponent_name: opponent_name.clone(),
                    message: format!("Match found! You face {}.", opponent_name),
                }),
            );
        }
        tokio::time::sleep(crate::FOUND_TO_START).await;
        if !self.arena.start(duel) {
            log::warn!("match {} gone before start; kickoff abandoned", duel);
            return;
        }
        tokio::time::sleep(crate::START_TO_DEAL).await;
        if !self.arena.begin(duel) {
            log::warn!("match {} gone before deal-in; kickoff abandoned", duel);
            return;
        }
        for side in [a, b] {
            self.sessions.push(
                side,
                Frame::MatchStart(MatchStart {
                    match_id: duel,
                    message: "The match has begun. Good luck!".to_string(),
                }),
            );
        }
        for (side, yours, message) in [
            (a, true, "Your turn! Pick a card to play."),
            (b, false, "Waiting for your opponent to pick a card..."),
        ] {
            self.sessions.push(
                side,
                Frame::GameState(GameState {
                    match_id: duel,
                    message: message.to_string(),
                    your_turn: yours,
                    opponent_moved: false,
                    game_over: false,
                }),
            );
        }
    }

    /// One reaper pass over every unfinished duel: a lone survivor wins by
    /// forfeit, an empty table cancels, a full table plays on.
    pub fn sweep(&self) {
        for (duel, a, b) in self.arena.live() {
            match (self.sessions.is_online(a), self.sessions.is_online(b)) {
                (true, true) => continue,
                (true, false) => self.forfeit(duel, a),
                (false, true) => self.forfeit(duel, b),
                (false, false) => {
                    if self.arena.cancel(duel) {
                        log::info!("match {} cancelled: both players gone", duel);
                    }
                }
            }
        }
        log::debug!("{}", self.arena.census());
    }

    fn forfeit(&self, duel: DuelId, survivor: PlayerId) {
        if let Some(settlement) = self.arena.force_win(&self.players, duel, survivor) {
            self.sessions.push(
                survivor,
                Frame::MatchEnd(MatchEnd {
                    match_id: duel,
                    winner_id: settlement.winner,
                    winner_name: settlement.winner_name,
                    message: "Your opponent disconnected. You win by forfeit!".to_string(),
                }),
            );
        }
    }
}
