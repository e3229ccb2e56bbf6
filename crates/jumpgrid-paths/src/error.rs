use std::fmt;

use jumpgrid_core::Point3;

/// Which end of a query an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Goal => f.write_str("goal"),
        }
    }
}

/// A [`SearchLimits`](crate::SearchLimits) bound that stopped a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// The expansion budget was used up.
    Expansions(usize),
    /// The deadline passed.
    Deadline,
}

/// Why a search produced no path.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// An endpoint lies outside the grid. No search was attempted.
    OutOfBounds { endpoint: Endpoint, point: Point3 },
    /// An endpoint cell is an obstacle. No search was attempted.
    Occupied { endpoint: Endpoint, point: Point3 },
    /// The open set ran dry before the goal was reached.
    Unreachable { expanded: usize },
    /// The search was stopped by a caller-supplied limit.
    LimitReached { limit: Limit, expanded: usize },
}

impl SearchError {
    /// Whether the query itself was invalid (as opposed to a search that
    /// ran and found nothing).
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::Occupied { .. })
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { endpoint, point } => {
                write!(f, "{endpoint} {point} is outside the grid")
            }
            Self::Occupied { endpoint, point } => {
                write!(f, "{endpoint} {point} is occupied")
            }
            Self::Unreachable { expanded } => {
                write!(f, "goal unreachable ({expanded} nodes expanded)")
            }
            Self::LimitReached {
                limit: Limit::Expansions(n),
                expanded,
            } => write!(
                f,
                "expansion limit {n} reached ({expanded} nodes expanded)"
            ),
            Self::LimitReached {
                limit: Limit::Deadline,
                expanded,
            } => write!(f, "deadline passed ({expanded} nodes expanded)"),
        }
    }
}

impl std::error::Error for SearchError {}
