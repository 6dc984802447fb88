//! Betting cutoff ("lock") enforcement for the calling layer.
//!
//! The engine has no notion of the current time. Callers run this check
//! before accepting a batch: bets for a draw date close at a fixed local
//! time on that date.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A batch contained a date whose betting window has already closed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CutoffError {
    #[error("betting for {date} closed at {closes_at}")]
    Closed {
        date: NaiveDate,
        closes_at: DateTime<FixedOffset>,
    },

    #[error("invalid UTC offset: {0} hours")]
    InvalidOffset(i32),
}

/// Local cutoff time and the UTC offset it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutoffPolicy {
    pub time: NaiveTime,
    pub utc_offset_hours: i32,
}

impl Default for CutoffPolicy {
    fn default() -> Self {
        Self {
            // 19:00 local, UTC+8.
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap_or_default(),
            utc_offset_hours: 8,
        }
    }
}

impl CutoffPolicy {
    fn offset(&self) -> Result<FixedOffset, CutoffError> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .ok_or(CutoffError::InvalidOffset(self.utc_offset_hours))
    }

    /// Calendar date of `now` in the cutoff's local time.
    pub fn local_date(&self, now: DateTime<Utc>) -> Result<NaiveDate, CutoffError> {
        Ok(now.with_timezone(&self.offset()?).date_naive())
    }

    /// The instant betting for `date` closes.
    pub fn closes_at(&self, date: NaiveDate) -> Result<DateTime<FixedOffset>, CutoffError> {
        self.offset()?
            .from_local_datetime(&date.and_time(self.time))
            .single()
            .ok_or(CutoffError::InvalidOffset(self.utc_offset_hours))
    }

    /// Fail on the first date whose window closed at or before `now`.
    pub fn check<I>(&self, dates: I, now: DateTime<Utc>) -> Result<(), CutoffError>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        for date in dates {
            let closes_at = self.closes_at(date)?;
            if closes_at <= now {
                warn!(%date, %closes_at, %now, "Bet rejected after cutoff");
                return Err(CutoffError::Closed { date, closes_at });
            }
        }
        Ok(())
    }
}
