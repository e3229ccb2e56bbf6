use std::time::{Duration, Instant};

use crate::error::Limit;

/// Caller-supplied bounds on a single search.
///
/// Both bounds are checked once per loop iteration, before the next node is
/// taken from the open set. The default is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchLimits {
    /// Stop after this many node expansions.
    pub max_expansions: Option<usize>,
    /// Stop once this instant has passed.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub deadline: Option<Instant>,
}

impl SearchLimits {
    /// No bounds.
    pub const UNLIMITED: Self = Self {
        max_expansions: None,
        deadline: None,
    };

    pub fn with_max_expansions(mut self, n: usize) -> Self {
        self.max_expansions = Some(n);
        self
    }

    /// Set the deadline to `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The first bound exceeded after `expanded` expansions, if any.
    #[inline]
    pub(crate) fn exceeded(&self, expanded: usize) -> Option<Limit> {
        if let Some(max) = self.max_expansions {
            if expanded >= max {
                return Some(Limit::Expansions(max));
            }
        }
        match self.deadline {
            Some(d) if Instant::now() >= d => Some(Limit::Deadline),
            _ => None,
        }
    }
}
