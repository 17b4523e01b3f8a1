//! Per-cell change classification between consecutive snapshots.

use serde::{Deserialize, Serialize};

use crate::matrix::OddsEntry;

/// Direction a numeric field moved since the previous poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    None,
}

impl Trend {
    /// Stable class/state name consumed by presentation.
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::None => "none",
        }
    }

    fn between(prev: f64, next: f64) -> Trend {
        // Values are one-decimal upstream; exact comparison is intentional.
        if next > prev {
            Trend::Up
        } else if next < prev {
            Trend::Down
        } else {
            Trend::None
        }
    }
}

/// Movement of both fields of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeInfo {
    pub p: Trend,
    pub w: Trend,
}

impl ChangeInfo {
    pub const NEUTRAL: ChangeInfo = ChangeInfo {
        p: Trend::None,
        w: Trend::None,
    };
}

/// Classifies how `next` moved relative to `prev` for the same
/// (runner, bookkeeper) pair. No prior value means first paint: neutral on
/// both fields, never a false "change".
pub fn change_info(prev: Option<&OddsEntry>, next: &OddsEntry) -> ChangeInfo {
    match prev {
        None => ChangeInfo::NEUTRAL,
        Some(prev) => ChangeInfo {
            p: Trend::between(prev.fixed_p, next.fixed_p),
            w: Trend::between(prev.fixed_w, next.fixed_w),
        },
    }
}
