//! Per-action continuations.

use std::collections::HashMap;
use std::fmt;

/// Callback registered for the reply to a named request.
pub type Continuation = Box<dyn FnOnce(String)>;

/// At most one continuation per action name; registering again under the
/// same name discards the previous continuation.
#[derive(Default)]
pub struct ContinuationRegistry {
    entries: HashMap<String, Continuation>,
}

impl ContinuationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `continuation` under `action_name`. Returns true if an earlier
    /// continuation was replaced.
    pub fn register(&mut self, action_name: &str, continuation: Continuation) -> bool {
        self.entries
            .insert(action_name.to_string(), continuation)
            .is_some()
    }

    pub fn contains(&self, action_name: &str) -> bool {
        self.entries.contains_key(action_name)
    }

    /// Remove and return the continuation for `action_name`.
    pub fn take(&mut self, action_name: &str) -> Option<Continuation> {
        self.entries.remove(action_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ContinuationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ContinuationRegistry")
            .field("actions", &names)
            .finish()
    }
}
