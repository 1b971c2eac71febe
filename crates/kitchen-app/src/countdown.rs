//! Remaining-time badge for kitchen tickets.
//!
//! Derived every tick from the order alone; nothing is stored between ticks.

use crate::model::Order;
use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::time::Duration;

/// Refresh period of every countdown on the board.
pub const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Healthy,
    Warning,
    Critical,
}

impl Tier {
    pub fn from_pct(pct_left: u8) -> Self {
        match pct_left {
            p if p > 66 => Tier::Healthy,
            p if p > 33 => Tier::Warning,
            _ => Tier::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub max_prep: u32,
    pub elapsed: u64,
    pub left: u32,
    pub pct_left: u8,
    pub tier: Tier,
}

impl Countdown {
    pub fn compute(order: &Order, now: DateTime<Utc>) -> Self {
        let max_prep = order.max_prep_seconds();
        let elapsed = u64::try_from((now - order.created_at).num_seconds()).unwrap_or(0);
        let left = u64::from(max_prep).saturating_sub(elapsed) as u32;

        let mut pct_left = (f64::from(left) / f64::from(max_prep) * 100.0).round() as u8;
        // Only an expired ticket reads 0%
        if left > 0 && pct_left == 0 {
            pct_left = 1;
        }

        Self {
            max_prep,
            elapsed,
            left,
            pct_left,
            tier: Tier::from_pct(pct_left),
        }
    }

    pub fn minutes_left(&self) -> u32 {
        self.left.div_ceil(60)
    }

    pub fn is_expired(&self) -> bool {
        self.left == 0
    }
}

/// What the ticket's corner badge shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Urgent,
    Remaining { pct_left: u8, tier: Tier },
}

impl Badge {
    pub fn for_order(order: &Order, countdown: &Countdown) -> Self {
        if order.is_urgent {
            Badge::Urgent
        } else {
            Badge::Remaining {
                pct_left: countdown.pct_left,
                tier: countdown.tier,
            }
        }
    }
}

impl Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Badge::Urgent => f.pad("URGENT"),
            Badge::Remaining { pct_left, .. } => f.pad(&format!("{pct_left}%")),
        }
    }
}
