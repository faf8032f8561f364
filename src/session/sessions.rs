use super::outbox::ConnId;
use super::outbox::Outbox;
use crate::PlayerId;
use crate::protocol::Frame;
use std::collections::HashMap;
use std::sync::Mutex;

/// The login table, collapsed into a single guarded map from user id to the
/// outbox of the connection that owns the login. The key set is exactly the
/// set of logged-in users, so "is this player online" and "where do their
/// events go" can never disagree.
#[derive(Debug, Default)]
pub struct Sessions {
    table: Mutex<HashMap<PlayerId, Outbox>>,
}

impl Sessions {
    /// Single-session enforcement: the first login wins and keeps the slot
    /// until its connection closes; a second login is refused, never
    /// preempting the first.
    pub fn claim(&self, user: PlayerId, outbox: Outbox) -> bool {
        let mut table = self.table.lock().expect("session mutex");
        match table.contains_key(&user) {
            true => false,
            false => {
                table.insert(user, outbox);
                true
            }
        }
    }

    /// Teardown by connection identity. Removes every login owned by the
    /// connection and reports which users were evicted; idempotent and a
    /// no-op for connections that never logged in.
    pub fn release(&self, conn: ConnId) -> Vec<PlayerId> {
        let mut table = self.table.lock().expect("session mutex");
        let evicted = table
            .iter()
            .filter(|(_, outbox)| outbox.conn() == conn)
            .map(|(user, _)| *user)
            .collect::<Vec<_>>();
        for user in &evicted {
            table.remove(user);
        }
        evicted
    }

    pub fn is_online(&self, user: PlayerId) -> bool {
        self.table.lock().expect("session mutex").contains_key(&user)
    }

    pub fn online(&self) -> usize {
        self.table.lock().expect("session mutex").len()
    }

    /// the notifier: push one frame at whoever owns this user's login
    pub fn push(&self, user: PlayerId, frame: Frame) {
        let owner = self.table.lock().expect("session mutex").get(&user).cloned();
        match owner {
            Some(outbox) => outbox.deliver(frame),
            None => log::debug!("no connection for user {}; event dropped", user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PingResponse;

    fn pong() -> Frame {
        Frame::PingResponse(PingResponse {
            success: true,
            message: "pong".to_string(),
        })
    }

    #[test]
    fn first_login_wins() {
        let sessions = Sessions::default();
        let (first, _first_spool) = Outbox::pair(1);
        let (second, _second_spool) = Outbox::pair(2);
        assert!(sessions.claim(7, first));
        assert!(!sessions.claim(7, second));
        assert!(sessions.is_online(7));
        assert!(sessions.online() == 1);
    }

    #[test]
    fn release_is_scoped_to_the_connection_and_idempotent() {
        let sessions = Sessions::default();
        let (one, _one_spool) = Outbox::pair(1);
        let (two, _two_spool) = Outbox::pair(2);
        assert!(sessions.claim(7, one));
        assert!(sessions.claim(8, two));
        assert!(sessions.release(1) == vec![7]);
        assert!(sessions.release(1).is_empty());
        assert!(!sessions.is_online(7));
        assert!(sessions.is_online(8));
        // user 7 can log back in on a fresh connection
        let (three, _three_spool) = Outbox::pair(3);
        assert!(sessions.claim(7, three));
    }

    #[test]
    fn push_reaches_only_the_owner() {
        let sessions = Sessions::default();
        let (outbox, mut spool) = Outbox::pair(1);
        sessions.claim(7, outbox);
        sessions.push(7, pong());
        sessions.push(8, pong()); // nobody home; dropped quietly
        assert!(spool.try_recv().is_ok());
        assert!(spool.try_recv().is_err());
    }
}
