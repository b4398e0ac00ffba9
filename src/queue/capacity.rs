use std::num::NonZeroUsize;

/// Optional bound on queue length. A full queue drops new arrivals and never
/// evicts an entry already shown.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CapacityGuard {
    max_entries: Option<NonZeroUsize>,
}

impl CapacityGuard {
    #[must_use]
    pub const fn new(max_entries: Option<NonZeroUsize>) -> Self {
        Self { max_entries }
    }

    #[must_use]
    pub const fn unbounded() -> Self {
        Self { max_entries: None }
    }

    #[must_use]
    pub const fn max_entries(&self) -> Option<NonZeroUsize> {
        self.max_entries
    }

    /// Whether one more entry fits next to `current_len` existing ones.
    #[must_use]
    pub const fn admits(&self, current_len: usize) -> bool {
        match self.max_entries {
            Some(max) => current_len < max.get(),
            None => true,
        }
    }
}
