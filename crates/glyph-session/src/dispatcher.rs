//! Sends named requests to the engine and routes replies to the log.

use rhizome_glyph_editor::LogSink;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::message::{Reply, Request};
use crate::registry::ContinuationRegistry;

/// Command dispatcher.
///
/// Replies are broadcast to the log only. Continuations are kept per action
/// name, last registration wins, and are never invoked on delivery: replies
/// carry no action name to match them against.
#[derive(Debug)]
pub struct Dispatcher {
    registry: ContinuationRegistry,
    requests: mpsc::UnboundedSender<Request>,
}

impl Dispatcher {
    pub fn new(requests: mpsc::UnboundedSender<Request>) -> Self {
        Self {
            registry: ContinuationRegistry::new(),
            requests,
        }
    }

    /// Register `continuation` under `action_name` and send the request.
    ///
    /// Never blocks. A request sent after the engine has gone away is
    /// dropped.
    pub fn dispatch<F>(&mut self, action_name: &str, payload: &str, continuation: F)
    where
        F: FnOnce(String) + 'static,
    {
        if self.registry.register(action_name, Box::new(continuation)) {
            debug!(action = action_name, "replaced pending continuation");
        }

        if self
            .requests
            .send(Request::new(action_name, payload))
            .is_err()
        {
            warn!(action = action_name, "evaluation engine is gone; request dropped");
        }
    }

    /// Deliver one reply. Every reply is appended to the log verbatim,
    /// whatever its kind.
    pub fn on_result<L: LogSink + ?Sized>(&self, reply: Reply, log: &mut L) {
        if let Reply::Other { kind, .. } = &reply {
            debug!(kind = %kind, "reply of unrecognized kind");
        }
        log.append(reply.result());
    }

    pub fn registry(&self) -> &ContinuationRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ContinuationRegistry {
        &mut self.registry
    }

    /// Point the dispatcher at a new engine. Registered continuations stay.
    pub(crate) fn reconnect(&mut self, requests: mpsc::UnboundedSender<Request>) {
        self.requests = requests;
    }
}
