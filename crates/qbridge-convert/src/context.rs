//! Per-translation state shared across calls.

use std::sync::atomic::{AtomicU64, Ordering};

/// Default prefix of synthesized classical register names.
pub const DEFAULT_REGISTER_PREFIX: &str = "tk_c";

/// Hands out `prefix1`, `prefix2`, ... without repeats.
#[derive(Debug)]
pub struct RegisterNamer {
    prefix: String,
    counter: AtomicU64,
}

impl RegisterNamer {
    /// Create a namer whose first name is `{prefix}1`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// The next name in sequence.
    pub fn fresh(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{n}", self.prefix)
    }

    /// The name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for RegisterNamer {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTER_PREFIX)
    }
}

/// State that outlives a single translation.
///
/// Reusing one context across reverse translations keeps synthesized
/// register names distinct between them.
#[derive(Debug, Default)]
pub struct TranslationContext {
    namer: RegisterNamer,
}

impl TranslationContext {
    /// Create a context with the default register prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom register prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            namer: RegisterNamer::new(prefix),
        }
    }

    /// A fresh register name for which `taken` is false.
    pub fn fresh_register_name(&self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let name = self.namer.fresh();
            if !taken(&name) {
                return name;
            }
        }
    }

    /// The register namer.
    pub fn namer(&self) -> &RegisterNamer {
        &self.namer
    }
}
