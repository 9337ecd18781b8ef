// src/infrastructure/stream.rs
//
// Process-scoped registry for streaming sessions, modeled as a small
// publish/subscribe hub: registering a session subscribes it, broadcast
// publishes to every live session, and transport close unsubscribes via a
// drop guard. Delivery is best-effort; a session whose channel rejects a
// write is evicted without affecting the others or the publisher.
use crate::application::{dto::StreamEvent, ports::ClockPort};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Per-session event buffer. A session this far behind is treated as dead.
const SESSION_BUFFER: usize = 32;

#[derive(Clone, Debug)]
pub struct StreamSettings {
    pub keepalive_interval: Duration,
    pub auth_reminder_interval: Duration,
    /// Absolute URL unauthenticated clients are pointed at.
    pub auth_url: String,
}

struct SessionEntry {
    sender: mpsc::Sender<JsonValue>,
    authenticated: bool,
}

pub struct SessionHub {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    settings: StreamSettings,
    clock: Arc<ClockPort>,
}

impl SessionHub {
    pub fn new(settings: StreamSettings, clock: Arc<ClockPort>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            settings,
            clock,
        }
    }

    pub fn auth_url(&self) -> &str {
        &self.settings.auth_url
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Subscribe a session and hand back the receiving half of its channel.
    pub fn register(&self, session_id: &str, authenticated: bool) -> mpsc::Receiver<JsonValue> {
        let (sender, receiver) = mpsc::channel(SESSION_BUFFER);
        let mut guard = self.sessions.lock().unwrap();
        guard.insert(
            session_id.to_string(),
            SessionEntry {
                sender,
                authenticated,
            },
        );
        tracing::debug!(session_id, authenticated, "stream session registered");
        receiver
    }

    /// Unsubscribe; idempotent, returns whether the session was present.
    pub fn deregister(&self, session_id: &str) -> bool {
        let removed = self.sessions.lock().unwrap().remove(session_id).is_some();
        if removed {
            tracing::debug!(session_id, "stream session deregistered");
        }
        removed
    }

    /// Push one event to one session. A rejected write evicts the session
    /// and reports `false`; it never blocks.
    pub fn send_to(&self, session_id: &str, event: &StreamEvent) -> bool {
        let payload = event.envelope(self.clock.now());
        let mut guard = self.sessions.lock().unwrap();
        let Some(entry) = guard.get(session_id) else {
            return false;
        };

        if entry.sender.try_send(payload).is_err() {
            guard.remove(session_id);
            tracing::debug!(session_id, "evicted unreachable stream session");
            return false;
        }
        true
    }

    /// Publish to every registered session. Write failures evict the
    /// offending session only; the publisher never sees an error. Returns
    /// the number of successful deliveries.
    pub fn broadcast(&self, event: &StreamEvent) -> usize {
        let payload = event.envelope(self.clock.now());
        let mut guard = self.sessions.lock().unwrap();

        let mut dead = Vec::new();
        let mut delivered = 0;
        for (session_id, entry) in guard.iter() {
            if entry.sender.try_send(payload.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(session_id.clone());
            }
        }

        for session_id in dead {
            guard.remove(&session_id);
            tracing::debug!(%session_id, "evicted unreachable stream session during broadcast");
        }

        delivered
    }

    fn is_authenticated(&self, session_id: &str) -> Option<bool> {
        let guard = self.sessions.lock().unwrap();
        guard.get(session_id).map(|entry| entry.authenticated)
    }

    /// Start the periodic emitters for one session: a keepalive on the
    /// configured cadence, plus a shorter "please authenticate" reminder for
    /// unauthenticated sessions. The task ends on its own once the session
    /// drops out of the registry; the session guard also aborts it on close.
    pub fn spawn_session_timers(hub: Arc<SessionHub>, session_id: &str) -> JoinHandle<()> {
        let session_id = session_id.to_string();

        tokio::spawn(async move {
            let Some(authenticated) = hub.is_authenticated(&session_id) else {
                return;
            };

            let mut keepalive = tokio::time::interval(hub.settings.keepalive_interval);
            let mut reminder = tokio::time::interval(hub.settings.auth_reminder_interval);
            // The first tick of an interval fires immediately; the initial
            // connection event already covers that instant.
            keepalive.tick().await;
            reminder.tick().await;

            loop {
                let delivered = if authenticated {
                    keepalive.tick().await;
                    hub.send_to(&session_id, &StreamEvent::Keepalive)
                } else {
                    tokio::select! {
                        _ = keepalive.tick() => hub.send_to(&session_id, &StreamEvent::Keepalive),
                        _ = reminder.tick() => hub.send_to(
                            &session_id,
                            &StreamEvent::AuthCheck {
                                auth_url: hub.auth_url().to_string(),
                            },
                        ),
                    }
                };

                if !delivered {
                    break;
                }
            }
        })
    }
}

/// Ties a session's registry entry and timers to the transport lifetime.
/// Dropping the guard is the single cleanup hook; it runs at most once and
/// cancels both unconditionally.
pub struct SessionGuard {
    hub: Arc<SessionHub>,
    session_id: String,
    timers: JoinHandle<()>,
}

impl SessionGuard {
    pub fn new(hub: Arc<SessionHub>, session_id: String, timers: JoinHandle<()>) -> Self {
        Self {
            hub,
            session_id,
            timers,
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.timers.abort();
        self.hub.deregister(&self.session_id);
    }
}
