//! A playground session.
//!
//! All session state is mutated from one task: keystrokes, dispatches and
//! reply delivery are discrete events handled in turn, so nothing here is
//! locked. The engine runs elsewhere and is reached only through the
//! dispatcher's channel.

use rhizome_glyph_editor::{
    EditorWidget, Key, KeyOutcome, Keymap, LogAppender, LogSink, TextBuffer, cursor_status,
};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::{ConfigError, PlaygroundConfig};
use crate::dispatcher::Dispatcher;
use crate::engine::EngineHandle;
use crate::message::Reply;

/// Action name used when evaluating the editor contents.
pub const EDITOR_ACTION: &str = "editor";

/// Editor pane, log pane, and the dispatcher wired to one engine.
pub struct Session<E = TextBuffer, L = LogAppender<TextBuffer>> {
    editor: E,
    log: L,
    keymap: Keymap,
    dispatcher: Dispatcher,
    replies: mpsc::UnboundedReceiver<Reply>,
    engine_task: JoinHandle<()>,
}

impl Session {
    /// A session with in-memory editor and log panes.
    pub fn in_memory(keymap: Keymap, engine: EngineHandle) -> Self {
        Self::new(TextBuffer::new(), LogAppender::default(), keymap, engine)
    }

    /// An in-memory session configured from `config`.
    pub fn from_config(
        config: &PlaygroundConfig,
        engine: EngineHandle,
    ) -> Result<Self, ConfigError> {
        Ok(Self::in_memory(config.keymap()?, engine))
    }
}

impl<E: EditorWidget, L: LogSink> Session<E, L> {
    pub fn new(editor: E, log: L, keymap: Keymap, engine: EngineHandle) -> Self {
        let (requests, replies, engine_task) = engine.into_parts();
        Self {
            editor,
            log,
            keymap,
            dispatcher: Dispatcher::new(requests),
            replies,
            engine_task,
        }
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut L {
        &mut self.log
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// Apply a keystroke to the editor pane.
    pub fn press(&mut self, key: Key) -> KeyOutcome {
        self.keymap.handle(&mut self.editor, key)
    }

    /// Type `text` into the editor pane one character at a time.
    pub fn type_text(&mut self, text: &str) {
        self.keymap.type_text(&mut self.editor, text);
    }

    /// Status-bar text for the editor cursor.
    pub fn cursor_status(&self) -> String {
        cursor_status(self.editor.cursor())
    }

    /// Replace the editor contents, e.g. with a loaded example file.
    pub fn load_source(&mut self, text: &str) {
        self.editor.set_value(text);
    }

    pub fn clear_editor(&mut self) {
        self.editor.set_value("");
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Send an arbitrary named request.
    pub fn dispatch<F>(&mut self, action_name: &str, payload: &str, continuation: F)
    where
        F: FnOnce(String) + 'static,
    {
        self.dispatcher.dispatch(action_name, payload, continuation);
    }

    /// Evaluate the whole editor contents.
    pub fn evaluate<F>(&mut self, continuation: F)
    where
        F: FnOnce(String) + 'static,
    {
        let source = self.editor.value();
        self.dispatcher.dispatch(EDITOR_ACTION, &source, continuation);
    }

    /// Evaluate a loaded file under its own name.
    pub fn evaluate_file<F>(&mut self, name: &str, contents: &str, continuation: F)
    where
        F: FnOnce(String) + 'static,
    {
        self.dispatcher.dispatch(name, contents, continuation);
    }

    /// Wait for the next reply and deliver it. Returns false once the
    /// engine side has closed.
    pub async fn pump(&mut self) -> bool {
        match self.replies.recv().await {
            Some(reply) => {
                self.dispatcher.on_result(reply, &mut self.log);
                true
            }
            None => {
                warn!("evaluation engine closed its channel");
                false
            }
        }
    }

    /// Deliver every reply that has already arrived. Returns how many were
    /// delivered.
    pub fn drain(&mut self) -> usize {
        let mut delivered = 0;
        loop {
            match self.replies.try_recv() {
                Ok(reply) => {
                    self.dispatcher.on_result(reply, &mut self.log);
                    delivered += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("evaluation engine closed its channel");
                    break;
                }
            }
        }
        delivered
    }

    /// True while the engine task is running.
    pub fn engine_running(&self) -> bool {
        !self.engine_task.is_finished()
    }

    /// Discard the current engine and switch to `engine`.
    ///
    /// Registered continuations are kept. Replies from the old engine that
    /// were not delivered yet are lost.
    pub fn restart_engine(&mut self, engine: EngineHandle) {
        let (requests, replies, task) = engine.into_parts();
        let old = std::mem::replace(&mut self.engine_task, task);
        old.abort();
        self.replies = replies;
        self.dispatcher.reconnect(requests);
        info!("evaluation engine restarted");
    }
}

impl<E, L> Drop for Session<E, L> {
    fn drop(&mut self) {
        self.engine_task.abort();
    }
}
