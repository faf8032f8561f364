use super::server::Server;
use crate::protocol::Frame;
use crate::session::ConnId;
use crate::session::Outbox;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc::UnboundedReceiver;

/// One task per accepted connection: read newline frames until EOF or a
/// transport error, dispatch each, then tear down. A sibling writer task
/// drains the connection's outbox, so synchronous responses and pushed
/// events share one ordered pipe to the socket and no frame is ever written
/// under a store lock.
pub async fn session(server: Arc<Server>, stream: TcpStream) {
    let conn = server.next_conn();
    let (read, write) = stream.into_split();
    let (outbox, spool) = Outbox::pair(conn);
    tokio::spawn(drain(conn, spool, write));
    let mut lines = BufReader::new(read).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => dispatch(&server, &outbox, &line),
            Ok(None) => break,
            Err(e) => {
                log::warn!("read error on connection {}: {}", conn, e);
                break;
            }
        }
    }
    teardown(&server, conn);
}

/// A frame that fails to decode is logged and skipped; the connection
/// survives its client's mistakes. Tags only the server should ever emit
/// are ignored the same way.
fn dispatch(server: &Server, outbox: &Outbox, line: &str) {
    match Frame::decode(line) {
        Err(e) => log::warn!("undecodable frame on connection {}: {}", outbox.conn(), e),
        Ok(frame) => match frame {
            Frame::RegisterRequest(req) => outbox.deliver(server.register(&req)),
            Frame::LoginRequest(req) => outbox.deliver(server.login(outbox, &req)),
            Frame::QueueRequest(req) => outbox.deliver(server.enqueue(&req)),
            Frame::PingRequest(req) => outbox.deliver(server.ping(&req)),
            Frame::StatsRequest(req) => outbox.deliver(server.stats(&req)),
            Frame::CardPackRequest(req) => outbox.deliver(server.open_pack(&req)),
            Frame::CardMove(req) => server.play_card(outbox, &req),
            other => log::warn!(
                "unexpected {} frame on connection {}; ignored",
                other.tag(),
                outbox.conn()
            ),
        },
    }
}

/// the writer half: one task serializing the outbox to the socket
async fn drain(conn: ConnId, mut spool: UnboundedReceiver<Frame>, mut write: OwnedWriteHalf) {
    while let Some(frame) = spool.recv().await {
        match frame.encode() {
            Err(e) => log::error!("unencodable {} frame for connection {}: {}", frame.tag(), conn, e),
            Ok(mut line) => {
                line.push('\n');
                if let Err(e) = write.write_all(line.as_bytes()).await {
                    log::warn!("write failed on connection {}: {}", conn, e);
                    break;
                }
            }
        }
    }
}

/// Idempotent cleanup: whatever logins this connection owned are released
/// and pulled from the queue. Safe for connections that never logged in;
/// the reaper settles any match the departed player leaves behind.
fn teardown(server: &Server, conn: ConnId) {
    for user in server.sessions().release(conn) {
        server.queue().leave(user);
        log::info!("user {} logged out with connection {}", user, conn);
    }
    log::info!("connection {} closed", conn);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::*;
    use tokio::net::TcpListener;

    async fn harness() -> (Arc<Server>, TcpStream) {
        let server = Server::new();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).await.unwrap();
        let (stream, _) = listener.accept().await.unwrap();
        tokio::spawn(session(server.clone(), stream));
        (server, client)
    }

    async fn request(client: &mut TcpStream, frame: Frame) -> Frame {
        let mut line = frame.encode().unwrap();
        line.push('\n');
        client.write_all(line.as_bytes()).await.unwrap();
        let mut reader = BufReader::new(client);
        let mut answer = String::new();
        reader.read_line(&mut answer).await.unwrap();
        Frame::decode(answer.trim_end()).unwrap()
    }

    #[tokio::test]
    async fn requests_travel_the_socket() {
        let (_server, mut client) = harness().await;
        let frame = request(
            &mut client,
            Frame::RegisterRequest(RegisterRequest {
                username: "alice".to_string(),
                password: "abcd".to_string(),
            }),
        )
        .await;
        match frame {
            Frame::RegisterResponse(r) => {
                assert!(r.success);
                assert!(r.user_id == Some(1));
            }
            _ => panic!("wrong response"),
        }
    }

    #[tokio::test]
    async fn garbage_lines_do_not_kill_the_connection() {
        let (_server, mut client) = harness().await;
        client.write_all(b"this is not json\n\n").await.unwrap();
        let frame = request(
            &mut client,
            Frame::RegisterRequest(RegisterRequest {
                username: "alice".to_string(),
                password: "abcd".to_string(),
            }),
        )
        .await;
        assert!(frame.tag() == "REGISTER_RESPONSE");
    }

    #[tokio::test]
    async fn disconnect_releases_the_session_and_queue() {
        let (server, mut client) = harness().await;
        request(
            &mut client,
            Frame::RegisterRequest(RegisterRequest {
                username: "alice".to_string(),
                password: "abcd".to_string(),
            }),
        )
        .await;
        let id = match request(
            &mut client,
            Frame::LoginRequest(LoginRequest {
                username: "alice".to_string(),
                password: "abcd".to_string(),
            }),
        )
        .await
        {
            Frame::LoginResponse(r) => r.user_id.unwrap(),
            _ => panic!("wrong response"),
        };
        request(&mut client, Frame::CardPackRequest(CardPackRequest { user_id: id })).await;
        request(&mut client, Frame::QueueRequest(QueueRequest { user_id: id })).await;
        assert!(server.sessions().is_online(id));
        assert!(server.queue().contains(id));
        drop(client);
        // wait for the handler to observe EOF and finish teardown
        for _ in 0..50 {
            if !server.sessions().is_online(id) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(!server.sessions().is_online(id));
        assert!(!server.queue().contains(id));
    }

    #[tokio::test]
    async fn eof_before_login_is_a_quiet_goodbye() {
        let (server, client) = harness().await;
        drop(client);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(server.sessions().online() == 0);
    }

    #[tokio::test]
    async fn pushed_events_ride_the_same_pipe() {
        let (server, mut client) = harness().await;
        request(
            &mut client,
            Frame::RegisterRequest(RegisterRequest {
                username: "alice".to_string(),
                password: "abcd".to_string(),
            }),
        )
        .await;
        let id = match request(
            &mut client,
            Frame::LoginRequest(LoginRequest {
                username: "alice".to_string(),
                password: "abcd".to_string(),
            }),
        )
        .await
        {
            Frame::LoginResponse(r) => r.user_id.unwrap(),
            _ => panic!("wrong response"),
        };
        server.sessions().push(
            id,
            Frame::MatchFound(MatchFound {
                match_id: 1,
                opponent_id: 2,
                opponent_name: "bob".to_string(),
                message: "match found".to_string(),
            }),
        );
        let mut reader = BufReader::new(&mut client);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        match Frame::decode(line.trim_end()).unwrap() {
            Frame::MatchFound(found) => assert!(found.opponent_name == "bob"),
            _ => panic!("expected the pushed event"),
        }
    }
}
