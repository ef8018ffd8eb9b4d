//! Evaluation engines and the channel that connects them to a session.
//!
//! An engine runs as its own task and shares nothing with the session: the
//! only link is a pair of FIFO channels carrying [`Request`]s in and
//! [`Reply`]s out. Requests are handled one at a time in arrival order.

use std::future::Future;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::message::{Reply, Request};

/// Errors raised while starting an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine command is empty")]
    EmptyCommand,

    #[error("failed to start engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("engine process has no {0} pipe")]
    MissingPipe(&'static str),
}

/// Outbound half of the reply channel, handed to engines.
#[derive(Debug, Clone)]
pub struct Replies {
    tx: mpsc::UnboundedSender<Reply>,
}

impl Replies {
    /// Emit a reply. Returns false once the session side is gone.
    pub fn emit(&self, reply: Reply) -> bool {
        self.tx.send(reply).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Something that evaluates requests and emits replies.
///
/// A request may produce any number of replies, including none.
pub trait Engine: Send + 'static {
    fn handle(&mut self, request: Request, replies: &Replies) -> impl Future<Output = ()> + Send;
}

/// Session-side ends of a running engine.
#[derive(Debug)]
pub struct EngineHandle {
    pub(crate) requests: mpsc::UnboundedSender<Request>,
    pub(crate) replies: mpsc::UnboundedReceiver<Reply>,
    task: JoinHandle<()>,
}

impl EngineHandle {
    pub(crate) fn new(
        requests: mpsc::UnboundedSender<Request>,
        replies: mpsc::UnboundedReceiver<Reply>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            requests,
            replies,
            task,
        }
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        mpsc::UnboundedSender<Request>,
        mpsc::UnboundedReceiver<Reply>,
        JoinHandle<()>,
    ) {
        (self.requests, self.replies, self.task)
    }
}

/// Run `engine` on its own task.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_engine<E: Engine>(mut engine: E) -> EngineHandle {
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<Request>();
    let (reply_tx, reply_rx) = mpsc::unbounded_channel::<Reply>();

    let task = tokio::spawn(async move {
        let replies = Replies { tx: reply_tx };
        while let Some(request) = request_rx.recv().await {
            debug!(action = %request.action_name, "engine handling request");
            engine.handle(request, &replies).await;
        }
        debug!("engine request channel closed");
    });

    EngineHandle::new(request_tx, reply_rx, task)
}

/// Replies to every request with its payload as a result.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoEngine;

impl Engine for EchoEngine {
    fn handle(&mut self, request: Request, replies: &Replies) -> impl Future<Output = ()> + Send {
        replies.emit(Reply::Result(request.payload));
        std::future::ready(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_engine_round_trip() {
        let mut handle = spawn_engine(EchoEngine);
        handle.requests.send(Request::new("editor", "1+1")).unwrap();

        let reply = handle.replies.recv().await.unwrap();
        assert_eq!(reply, Reply::Result("1+1".to_string()));
    }

    #[tokio::test]
    async fn test_engine_stops_when_requests_close() {
        let handle = spawn_engine(EchoEngine);
        let (requests, mut replies, task) = handle.into_parts();
        drop(requests);

        task.await.unwrap();
        assert!(replies.recv().await.is_none());
    }
}
