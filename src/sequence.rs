use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::auth::session::token_key;

/// Tracks the newest request per (session, widget) so that a slow list
/// response never overwrites a newer one. Last-dispatched wins.
pub struct RequestSequencer {
    counter: AtomicU64,
    /// (session hash, widget) -> newest ticket issued and when
    latest: DashMap<(String, &'static str), (u64, Instant)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    session: String,
    widget: &'static str,
    seq: u64,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            latest: DashMap::new(),
        }
    }

    /// Issue a ticket before dispatching the upstream call.
    pub fn begin(&self, token: &str, widget: &'static str) -> Ticket {
        let seq = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let session = token_key(token);
        let now = Instant::now();
        self.latest
            .entry((session.clone(), widget))
            .and_modify(|(newest, issued)| {
                *newest = (*newest).max(seq);
                *issued = now;
            })
            .or_insert((seq, now));
        Ticket {
            session,
            widget,
            seq,
        }
    }

    /// True once a newer ticket was issued for the same session and widget.
    pub fn is_stale(&self, ticket: &Ticket) -> bool {
        self.latest
            .get(&(ticket.session.clone(), ticket.widget))
            .is_some_and(|entry| entry.0 > ticket.seq)
    }

    /// Forget a session's widgets, e.g. on sign-out.
    pub fn forget(&self, token: &str) {
        let session = token_key(token);
        self.latest.retain(|(s, _), _| *s != session);
    }

    /// Drop widgets with no request issued within `max_age`. Returns how
    /// many were removed.
    pub fn sweep(&self, max_age: Duration) -> usize {
        let before = self.latest.len();
        self.latest
            .retain(|_, (_, issued)| issued.elapsed() < max_age);
        before - self.latest.len()
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

impl Default for RequestSequencer {
    fn default() -> Self {
        Self::new()
    }
}
