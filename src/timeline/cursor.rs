//! Stream decode context.

use crate::timeline::bucket::hour_floor;

/// The timestamp and hour currently in effect while decoding.
///
/// Both are `None` until the first timestamp marker; samples decoded in that
/// state are orphans and never reach a bucket. Every marker overwrites the
/// context, including markers that step backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamCursor {
    timestamp: Option<i64>,
    hour: Option<i64>,
}

impl StreamCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a timestamp marker and return the hour key now in effect.
    pub fn observe_marker(&mut self, t: i64) -> i64 {
        let hour = hour_floor(t);
        self.timestamp = Some(t);
        self.hour = Some(hour);
        hour
    }

    /// `(timestamp, hour)` pair in effect, or `None` before the first marker.
    pub fn position(&self) -> Option<(i64, i64)> {
        match (self.timestamp, self.hour) {
            (Some(t), Some(h)) => Some((t, h)),
            _ => None,
        }
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    pub fn hour(&self) -> Option<i64> {
        self.hour
    }
}
