pub mod cards;
pub mod client;
pub mod duels;
pub mod players;
pub mod protocol;
pub mod service;
pub mod session;

use std::time::Duration;

/// dimensional analysis types
pub type PlayerId = u64;
pub type DuelId = u64;

// opening stock, one counter per card kind
pub const STOCK_HYDRA: u32 = 10_000;
pub const STOCK_QUIMERA: u32 = 7_000;
pub const STOCK_GORGONA: u32 = 3_000;
pub const PACK_SIZE: usize = 3;

// account validation minima
pub const MIN_USERNAME: usize = 3;
pub const MIN_PASSWORD: usize = 4;

// background cadences and staged kickoff pacing
pub const MATCHMAKER_PERIOD: Duration = Duration::from_secs(1);
pub const REAPER_PERIOD: Duration = Duration::from_secs(5);
pub const FOUND_TO_START: Duration = Duration::from_secs(2);
pub const START_TO_DEAL: Duration = Duration::from_secs(1);

// transport fallbacks, overridden by BIND_ADDR / SERVER_ADDR
pub const BIND_FALLBACK: &str = "0.0.0.0:8080";
pub const SERVER_FALLBACK: &str = "localhost:8080";

/// trait for random generation, mainly (strictly?) for testing
pub trait Arbitrary {
    fn random() -> Self;
}

/// initialize logging and exit on ctrl-c
pub fn init() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("watch ctrl-c");
        println!();
        log::warn!("forcing exit");
        std::process::exit(0);
    });
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
