//! Record timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `created_at` is fixed when the record is first written; `updated_at` moves
/// forward on every mutation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Timestamps {
    /// Timestamps for a record created at `now`.
    pub fn created(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild from persisted values.
    pub fn restore(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            updated_at,
        }
    }

    /// Timestamps after a mutation at `now`.
    ///
    /// `updated_at` never moves backwards, even with a skewed clock.
    pub fn touched(self, now: DateTime<Utc>) -> Self {
        Self {
            created_at: self.created_at,
            updated_at: now.max(self.updated_at),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn touch_keeps_created_at_and_advances_updated_at() {
        let t0 = Utc::now();
        let ts = Timestamps::created(t0);
        let later = ts.touched(t0 + Duration::seconds(5));

        assert_eq!(later.created_at(), t0);
        assert_eq!(later.updated_at(), t0 + Duration::seconds(5));
    }

    #[test]
    fn touch_with_earlier_clock_does_not_rewind() {
        let t0 = Utc::now();
        let ts = Timestamps::created(t0);
        let touched = ts.touched(t0 - Duration::seconds(30));

        assert_eq!(touched.updated_at(), t0);
    }
}
