use chrono::{DateTime, Duration, NaiveTime, Utc};

// ── Quiet hours ──────────────────────────────────────────────

/// Nightly window during which some translators do not want pushes.
///
/// Pure time-of-day arithmetic on whatever timezone the injected clock
/// yields; the deployment picks the window to match. The window is half-open
/// `[start, end)` and wraps midnight when `start > end` (the usual 22:00 →
/// 06:00 configuration). `start == end` disables the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietHours {
    start: NaiveTime,
    end: NaiveTime,
}

impl QuietHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Does `at` fall inside the quiet window?
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        if self.start == self.end {
            return false;
        }
        let t = at.time();
        if self.start < self.end {
            t >= self.start && t < self.end
        } else {
            t >= self.start || t < self.end
        }
    }

    /// First instant strictly after `now` that is outside the window.
    ///
    /// Inside the window this is the next `end` boundary. Outside it is one
    /// minute later, bumped past the window if that minute crosses into it,
    /// so the returned instant is never quiet.
    pub fn next_business_instant(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        if self.contains(now) {
            return self.window_end_after(now);
        }
        let candidate = now + Duration::minutes(1);
        if self.contains(candidate) {
            self.window_end_after(candidate)
        } else {
            candidate
        }
    }

    /// Next instant with time-of-day `end` strictly after `at`.
    fn window_end_after(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        let mut end = at.date_naive().and_time(self.end).and_utc();
        while end <= at {
            end += Duration::days(1);
        }
        end
    }
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(stamp: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(stamp).unwrap().with_timezone(&Utc)
    }

    fn night() -> QuietHours {
        QuietHours::new(hm(22, 0), hm(6, 0))
    }

    #[test]
    fn test_wrapped_window_covers_both_sides_of_midnight() {
        let q = night();
        assert!(q.contains(at("2024-01-10T23:30:00Z")));
        assert!(q.contains(at("2024-01-11T02:00:00Z")));
        assert!(q.contains(at("2024-01-10T22:00:00Z"))); // start inclusive
        assert!(!q.contains(at("2024-01-11T06:00:00Z"))); // end exclusive
        assert!(!q.contains(at("2024-01-10T14:00:00Z")));
    }

    #[test]
    fn test_non_wrapped_window() {
        let q = QuietHours::new(hm(12, 0), hm(14, 0));
        assert!(q.contains(at("2024-01-10T13:00:00Z")));
        assert!(!q.contains(at("2024-01-10T14:00:00Z")));
        assert!(!q.contains(at("2024-01-10T11:59:00Z")));
    }

    #[test]
    fn test_window_is_periodic_over_24h() {
        let q = night();
        for stamp in ["2024-01-10T23:30:00Z", "2024-01-10T05:00:00Z", "2024-01-10T12:00:00Z"] {
            let t = at(stamp);
            assert_eq!(q.contains(t), q.contains(t + Duration::days(1)));
            assert_eq!(q.contains(t), q.contains(t + Duration::days(365)));
        }
    }

    #[test]
    fn test_equal_start_and_end_disables_the_window() {
        let q = QuietHours::new(hm(22, 0), hm(22, 0));
        assert!(!q.contains(at("2024-01-10T22:00:00Z")));
        assert!(!q.contains(at("2024-01-10T03:00:00Z")));
    }

    #[test]
    fn test_next_business_instant_during_night_is_window_end() {
        let q = night();
        let now = at("2024-01-10T23:30:00Z");
        let next = q.next_business_instant(now);
        assert_eq!(next, at("2024-01-11T06:00:00Z"));
        assert!(next > now);
        assert!(!q.contains(next));
    }

    #[test]
    fn test_next_business_instant_early_morning_is_same_day() {
        let q = night();
        let next = q.next_business_instant(at("2024-01-11T04:15:00Z"));
        assert_eq!(next, at("2024-01-11T06:00:00Z"));
    }

    #[test]
    fn test_next_business_instant_during_day_is_one_minute_out() {
        let q = night();
        let now = at("2024-01-10T14:00:00Z");
        let next = q.next_business_instant(now);
        assert_eq!(next, at("2024-01-10T14:01:00Z"));
        assert!(!q.contains(next));
    }

    #[test]
    fn test_minute_before_window_start_jumps_past_the_whole_window() {
        let q = night();
        let now = at("2024-01-10T21:59:30Z");
        let next = q.next_business_instant(now);
        assert_eq!(next, at("2024-01-11T06:00:00Z"));
        assert!(next > now);
        assert!(!q.contains(next));
    }

    #[test]
    fn test_always_strictly_after_now() {
        let q = night();
        for stamp in [
            "2024-01-10T22:00:00Z",
            "2024-01-10T05:59:59Z",
            "2024-01-10T06:00:00Z",
            "2024-01-10T18:45:12Z",
        ] {
            let now = at(stamp);
            assert!(q.next_business_instant(now) > now, "stamp {stamp}");
        }
    }
}
