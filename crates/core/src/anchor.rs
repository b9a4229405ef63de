use chrono::{DateTime, FixedOffset, Local, SecondsFormat, TimeDelta, Timelike, Utc};

/// Spacing of CGM readings.
pub const DEFAULT_STEP_SECONDS: i64 = 300;

/// The single reference "now" that every stream of a scenario is placed
/// against.
///
/// Sample `i` sits at `now + offset - i * step`: index 0 is the most recent
/// and a positive offset moves the whole stream into the future. The same
/// instant can be read as epoch milliseconds (SGV `date`) or as ISO-8601
/// with the anchor's UTC offset (treatment and device-status timestamps),
/// which lets a treatment be placed exactly between two readings.
///
/// Arithmetic never wraps or panics: an instant past the range chrono can
/// represent is pinned to the nearest representable one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAnchor {
    now: DateTime<FixedOffset>,
    offset_seconds: i64,
}

impl TimeAnchor {
    /// `now` is truncated to whole seconds.
    pub fn new(now: DateTime<FixedOffset>, offset_seconds: i64) -> Self {
        Self {
            now: now.with_nanosecond(0).unwrap_or(now),
            offset_seconds,
        }
    }

    pub fn at(now: DateTime<FixedOffset>) -> Self {
        Self::new(now, 0)
    }

    /// Anchor on the wall clock, in the local timezone.
    pub fn local_now() -> Self {
        Self::at(Local::now().fixed_offset())
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    pub fn offset_seconds(&self) -> i64 {
        self.offset_seconds
    }

    /// The same anchor with `seconds` added to its offset.
    pub fn shifted(&self, seconds: i64) -> Self {
        Self {
            now: self.now,
            offset_seconds: self.offset_seconds.saturating_add(seconds),
        }
    }

    pub fn instant(&self, index: usize, step_seconds: i64) -> DateTime<FixedOffset> {
        let back = i128::try_from(index)
            .unwrap_or(i128::MAX)
            .saturating_mul(i128::from(step_seconds));
        let delta = i128::from(self.offset_seconds).saturating_sub(back);
        let moved = i64::try_from(delta).ok().and_then(TimeDelta::try_seconds);
        self.move_from(self.now, moved, delta >= 0)
    }

    pub fn sample_time(&self, index: usize) -> DateTime<FixedOffset> {
        self.instant(index, DEFAULT_STEP_SECONDS)
    }

    pub fn epoch_millis(&self, index: usize, step_seconds: i64) -> i64 {
        self.instant(index, step_seconds).timestamp_millis()
    }

    pub fn iso(&self, index: usize, step_seconds: i64) -> String {
        iso_date(self.instant(index, step_seconds))
    }

    /// `minutes` before the anchored instant. Fractional minutes resolve
    /// to the millisecond.
    pub fn minutes_ago(&self, minutes: f64) -> DateTime<FixedOffset> {
        // `as` saturates, and NaN becomes zero.
        let forward = (-minutes * 60_000.0).round() as i64;
        let from = self.instant(0, DEFAULT_STEP_SECONDS);
        self.move_from(from, TimeDelta::try_milliseconds(forward), forward >= 0)
    }

    /// An arbitrary `seconds` away from the anchored instant.
    pub fn at_seconds(&self, seconds: i64) -> DateTime<FixedOffset> {
        let from = self.instant(0, DEFAULT_STEP_SECONDS);
        self.move_from(from, TimeDelta::try_seconds(seconds), seconds >= 0)
    }

    /// `from + delta`, or the nearest representable instant when `delta` is
    /// `None` or the sum leaves chrono's range.
    fn move_from(
        &self,
        from: DateTime<FixedOffset>,
        delta: Option<TimeDelta>,
        forward: bool,
    ) -> DateTime<FixedOffset> {
        delta
            .and_then(|d| from.checked_add_signed(d))
            .unwrap_or_else(|| self.bound(forward))
    }

    /// Earliest or latest instant at the anchor's offset, with a day of
    /// headroom so the local wall time stays in range too.
    fn bound(&self, forward: bool) -> DateTime<FixedOffset> {
        let (edge, pad) = if forward {
            (DateTime::<Utc>::MAX_UTC, TimeDelta::days(-1))
        } else {
            (DateTime::<Utc>::MIN_UTC, TimeDelta::days(1))
        };
        edge.checked_add_signed(pad)
            .unwrap_or(edge)
            .with_timezone(self.now.offset())
    }
}

/// ISO-8601 with the instant's own UTC offset, e.g. `2026-10-19T12:00:00+02:00`.
pub fn iso_date(instant: DateTime<FixedOffset>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
