use super::feed;
use crate::DuelId;
use crate::PlayerId;
use crate::cards::Kind;
use crate::protocol::*;
use colored::Colorize;
use dialoguer::Input;
use dialoguer::Select;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::net::TcpStream;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::Sender;
use std::sync::mpsc::channel;
use std::time::Duration;
use std::time::Instant;

/// What the client remembers between frames: who it is logged in as and
/// which match it is currently seated at. Updated by the reader thread as
/// events land, read by the menu loop.
#[derive(Debug, Default)]
struct Table {
    user: Option<PlayerId>,
    duel: Option<DuelId>,
}

/// The interactive terminal client. One reader thread owns the socket's
/// read half: synchronous responses go to a channel the menu awaits on,
/// asynchronous match events print as they land. The menu loop owns the
/// write half and the keyboard.
pub struct Client {
    stream: TcpStream,
    answers: Receiver<Frame>,
    table: Arc<Mutex<Table>>,
}

impl Client {
    pub fn run() -> anyhow::Result<()> {
        let addr =
            std::env::var("SERVER_ADDR").unwrap_or_else(|_| crate::SERVER_FALLBACK.to_string());
        let stream = TcpStream::connect(&addr)?;
        println!("{}", format!("connected to {}", addr).green());
        let (tx, rx) = channel();
        let table = Arc::new(Mutex::new(Table::default()));
        let reader = stream.try_clone()?;
        std::thread::spawn({
            let table = table.clone();
            move || Self::listen(reader, tx, table)
        });
        Self {
            stream,
            answers: rx,
            table,
        }
        .menu()
    }

    /// the reader thread: every line off the socket is classified, printed
    /// or queued, and folded into the table
    fn listen(stream: TcpStream, answers: Sender<Frame>, table: Arc<Mutex<Table>>) {
        for line in BufReader::new(stream).lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            if line.trim().is_empty() {
                continue;
            }
            let frame = match Frame::decode(&line) {
                Ok(frame) => frame,
                Err(e) => {
                    eprintln!("{}", format!("bad frame from server: {}", e).red());
                    continue;
                }
            };
            match frame {
                Frame::LoginResponse(_)
                | Frame::RegisterResponse(_)
                | Frame::QueueResponse(_)
                | Frame::PingResponse(_)
                | Frame::StatsResponse(_)
                | Frame::CardPackResponse(_) => {
                    answers.send(frame).ok();
                }
                event => {
                    println!("\n{}", feed::render(&event));
                    let mut table = table.lock().expect("table mutex");
                    match event {
                        Frame::MatchFound(found) => table.duel = Some(found.match_id),
                        Frame::MatchEnd(_) => table.duel = None,
                        _ => {}
                    }
                }
            }
        }
        println!("{}", "server hung up".red());
        std::process::exit(0);
    }

    fn menu(mut self) -> anyhow::Result<()> {
        loop {
            let choice = Select::new()
                .with_prompt("menagerie")
                .items(&[
                    "register",
                    "login",
                    "open pack",
                    "join queue",
                    "play card",
                    "stats",
                    "ping",
                    "quit",
                ])
                .default(0)
                .interact()?;
            let outcome = match choice {
                0 => self.register(),
                1 => self.login(),
                2 => self.open_pack(),
                3 => self.join_queue(),
                4 => self.play_card(),
                5 => self.stats(),
                6 => self.ping(),
                _ => break,
            };
            // a refused action drops back to the menu, it never kills the client
            outcome
                .err()
                .inspect(|e| println!("{}", e.to_string().red()));
        }
        Ok(())
    }

    fn register(&mut self) -> anyhow::Result<()> {
        let (username, password) = Self::credentials()?;
        let answer = self.request(Frame::RegisterRequest(RegisterRequest { username, password }))?;
        println!("{}", feed::render(&answer));
        Ok(())
    }

    fn login(&mut self) -> anyhow::Result<()> {
        let (username, password) = Self::credentials()?;
        let answer = self.request(Frame::LoginRequest(LoginRequest { username, password }))?;
        println!("{}", feed::render(&answer));
        if let Frame::LoginResponse(ref response) = answer {
            self.table.lock().expect("table mutex").user = response.user_id;
        }
        Ok(())
    }

    fn open_pack(&mut self) -> anyhow::Result<()> {
        let user_id = self.whoami()?;
        let answer = self.request(Frame::CardPackRequest(CardPackRequest { user_id }))?;
        println!("{}", feed::render(&answer));
        Ok(())
    }

    fn join_queue(&mut self) -> anyhow::Result<()> {
        let user_id = self.whoami()?;
        let answer = self.request(Frame::QueueRequest(QueueRequest { user_id }))?;
        println!("{}", feed::render(&answer));
        Ok(())
    }

    fn play_card(&mut self) -> anyhow::Result<()> {
        let user_id = self.whoami()?;
        let match_id = match self.table.lock().expect("table mutex").duel {
            Some(duel) => duel,
            None => {
                println!("{}", "no active match; join the queue first".red());
                return Ok(());
            }
        };
        let kinds = Kind::ALL.map(|kind| kind.to_string());
        let pick = Select::new()
            .with_prompt("play which card")
            .items(&kinds)
            .default(0)
            .interact()?;
        // no synchronous response: the outcome arrives as match events
        self.send(Frame::CardMove(CardMove {
            user_id,
            match_id,
            card_type: kinds[pick].clone(),
        }))?;
        Ok(())
    }

    fn stats(&mut self) -> anyhow::Result<()> {
        let user_id = self.whoami()?;
        let answer = self.request(Frame::StatsRequest(StatsRequest { user_id }))?;
        println!("{}", feed::render(&answer));
        Ok(())
    }

    /// application-level ping; reports the request round trip
    fn ping(&mut self) -> anyhow::Result<()> {
        let user_id = self.whoami()?;
        let clock = Instant::now();
        let answer = self.request(Frame::PingRequest(PingRequest { user_id }))?;
        println!(
            "{} ({} ms)",
            feed::render(&answer),
            clock.elapsed().as_millis()
        );
        Ok(())
    }

    fn credentials() -> anyhow::Result<(String, String)> {
        let username = Input::<String>::new().with_prompt("username").interact()?;
        let password = Input::<String>::new().with_prompt("password").interact()?;
        Ok((username, password))
    }

    fn whoami(&self) -> anyhow::Result<PlayerId> {
        self.table
            .lock()
            .expect("table mutex")
            .user
            .ok_or_else(|| anyhow::anyhow!("log in first"))
    }

    fn send(&mut self, frame: Frame) -> anyhow::Result<()> {
        let mut line = frame.encode()?;
        line.push('\n');
        self.stream.write_all(line.as_bytes())?;
        Ok(())
    }

    /// fire one request and wait for its synchronous answer
    fn request(&mut self, frame: Frame) -> anyhow::Result<Frame> {
        self.send(frame)?;
        self.answers
            .recv_timeout(Duration::from_secs(5))
            .map_err(|_| anyhow::anyhow!("server did not answer in time"))
    }
}
