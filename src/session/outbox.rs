use crate::protocol::Frame;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

pub type ConnId = u64;

/// Sending half of one connection's outbound queue. Clonable and lock-free:
/// whoever holds an Outbox may push a frame from any task, and the
/// connection's writer task drains the queue, so no store lock is ever held
/// across a socket write and every frame to one client leaves in push order.
#[derive(Debug, Clone)]
pub struct Outbox {
    conn: ConnId,
    tx: UnboundedSender<Frame>,
}

impl Outbox {
    /// paired endpoints: the outbox for producers, the spool for the writer
    pub fn pair(conn: ConnId) -> (Self, UnboundedReceiver<Frame>) {
        let (tx, rx) = unbounded_channel();
        (Self { conn, tx }, rx)
    }

    pub fn conn(&self) -> ConnId {
        self.conn
    }

    /// fire-and-forget; a dead receiver only costs this recipient
    pub fn deliver(&self, frame: Frame) {
        self.tx
            .send(frame)
            .err()
            .inspect(|e| log::warn!("connection {} dropped {}", self.conn, e.0.tag()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PingResponse;

    #[test]
    fn frames_arrive_in_push_order() {
        let (outbox, mut spool) = Outbox::pair(1);
        for message in ["one", "two", "three"] {
            outbox.deliver(Frame::PingResponse(PingResponse {
                success: true,
                message: message.to_string(),
            }));
        }
        for message in ["one", "two", "three"] {
            match spool.try_recv().unwrap() {
                Frame::PingResponse(pong) => assert!(pong.message == message),
                _ => panic!("wrong frame"),
            }
        }
        assert!(spool.try_recv().is_err());
    }

    #[test]
    fn delivery_to_a_closed_spool_is_harmless() {
        let (outbox, spool) = Outbox::pair(1);
        drop(spool);
        outbox.deliver(Frame::PingResponse(PingResponse {
            success: true,
            message: "pong".to_string(),
        }));
    }
}
