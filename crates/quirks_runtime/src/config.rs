//! Configuration for a realm.

/// Configuration for a [`crate::Realm`].
///
/// Controls which host objects exist and the kill switches that stop
/// runaway timer or microtask loops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RealmConfig {
    /// Install a `document` global whose `all` property is the legacy
    /// falsy object.
    pub legacy_document_all: bool,

    /// Maximum timer callbacks run by one advance of the fake clock.
    pub timer_loop_limit: usize,

    /// Maximum jobs run by one drain of the microtask queue.
    pub microtask_limit: usize,

    /// Simulated milliseconds an asynchronous check may take before it
    /// times out.
    pub async_timeout_ms: u64,
}

impl Default for RealmConfig {
    fn default() -> Self {
        Self {
            legacy_document_all: false,
            timer_loop_limit: 100_000,
            microtask_limit: 100_000,
            async_timeout_ms: 5_000,
        }
    }
}

impl RealmConfig {
    /// A browser-like realm with `document.all`.
    #[must_use]
    pub fn browser() -> Self {
        Self {
            legacy_document_all: true,
            ..Self::default()
        }
    }

    /// A server-side realm without `document`.
    #[must_use]
    pub fn node() -> Self {
        Self::default()
    }

    /// Builder method to install or omit `document.all`.
    #[must_use]
    pub fn with_legacy_document_all(mut self, enabled: bool) -> Self {
        self.legacy_document_all = enabled;
        self
    }

    /// Builder method to set the timer kill switch.
    #[must_use]
    pub fn with_timer_loop_limit(mut self, limit: usize) -> Self {
        self.timer_loop_limit = limit;
        self
    }

    /// Builder method to set the microtask kill switch.
    #[must_use]
    pub fn with_microtask_limit(mut self, limit: usize) -> Self {
        self.microtask_limit = limit;
        self
    }

    /// Builder method to set the asynchronous check timeout.
    #[must_use]
    pub fn with_async_timeout_ms(mut self, ms: u64) -> Self {
        self.async_timeout_ms = ms;
        self
    }
}
