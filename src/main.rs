use menagerie::client::Client;
use menagerie::service::Server;

/// MODE picks the entry point: the game coordinator or the terminal client.
/// Anything else prints usage and exits clean; only a listener that cannot
/// bind takes the process down with a non-zero code.
fn main() {
    match std::env::var("MODE").as_deref() {
        Ok("server") => serve(),
        Ok("client") => attend(),
        _ => eprintln!("usage: MODE=server|client {}", env!("CARGO_PKG_NAME")),
    }
}

fn serve() {
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| menagerie::BIND_FALLBACK.to_string());
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("build runtime")
        .block_on(async {
            menagerie::init();
            if let Err(e) = Server::run(&addr).await {
                log::error!("could not serve on {}: {}", addr, e);
                std::process::exit(1);
            }
        });
}

fn attend() {
    if let Err(e) = Client::run() {
        eprintln!("client error: {}", e);
    }
}
