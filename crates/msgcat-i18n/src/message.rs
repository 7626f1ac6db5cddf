//! Catalog entries and their compile-once template slots

use crate::template::{Template, TemplateError, LEFT_DELIM};
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Observable compilation state of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileState {
    /// Not compiled yet, or a literal that never needs compiling
    Uncompiled,
    /// The template compiled and is cached
    Compiled,
    /// Compilation failed; the failure is replayed to every caller
    Failed,
}

/// One localized message.
///
/// The raw text never changes after load. The compiled template is filled on
/// first use and then kept for the lifetime of the catalog, whether
/// compilation succeeded or not.
#[derive(Debug)]
pub struct Message {
    raw: String,
    origin: String,
    compiled: OnceCell<Result<Template, TemplateError>>,
    compile_attempts: AtomicUsize,
}

impl Message {
    /// Create a message from its raw text and the source it was loaded from
    pub fn new(raw: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            origin: origin.into(),
            compiled: OnceCell::new(),
            compile_attempts: AtomicUsize::new(0),
        }
    }

    /// Raw message text as loaded
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// File (or in-memory source name) that defined this message
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Whether the raw text contains template actions
    pub fn is_template(&self) -> bool {
        self.raw.contains(LEFT_DELIM)
    }

    /// Current compilation state
    pub fn compile_state(&self) -> CompileState {
        match self.compiled.get() {
            None => CompileState::Uncompiled,
            Some(Ok(_)) => CompileState::Compiled,
            Some(Err(_)) => CompileState::Failed,
        }
    }

    /// Number of times compilation has actually run (0 or 1)
    pub fn compile_attempts(&self) -> usize {
        self.compile_attempts.load(Ordering::Acquire)
    }

    /// The compiled template, compiling it on first call.
    ///
    /// Concurrent first callers block until the single compilation finishes
    /// and all observe its outcome.
    pub fn template(&self) -> Result<&Template, &TemplateError> {
        self.compiled
            .get_or_init(|| {
                self.compile_attempts.fetch_add(1, Ordering::AcqRel);
                let result = Template::compile(&self.raw);
                match &result {
                    Ok(_) => debug!(origin = %self.origin, "compiled message template"),
                    Err(e) => debug!(
                        origin = %self.origin,
                        error = %e,
                        "message template failed to compile"
                    ),
                }
                result
            })
            .as_ref()
    }
}
