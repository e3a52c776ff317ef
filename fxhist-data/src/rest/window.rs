use chrono::{DateTime, TimeDelta, Utc};
use fxhist_instrument::Granularity;

/// Maximum number of candles the OANDA candles endpoint returns for one request.
pub const MAX_CANDLES_PER_REQUEST: i32 = 4500;

/// Time span covered by one full [`RequestWindow`] of the given [`Granularity`].
pub fn window_span(granularity: Granularity) -> TimeDelta {
    granularity.duration() * MAX_CANDLES_PER_REQUEST
}

/// One bounded `[start, end)` sub-request of a download job.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct RequestWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub granularity: Granularity,
}

/// Deterministic split of a `[start, end)` job range into [`RequestWindow`]s.
///
/// A [`WindowPlan`] is `Copy` and iterating it is side-effect free, so the same plan can be
/// walked any number of times and always yields the same windows.
///
/// ### Notes
/// By default the last window keeps its full span and may end after the job `end`. Set
/// [`WindowPlan::trim_to_end`] to clamp it to the job `end` instead.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct WindowPlan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub granularity: Granularity,
    pub trim_to_end: bool,
}

/// Plan the [`RequestWindow`]s covering `[start, end)` at the given [`Granularity`].
///
/// The plan is empty if `start >= end`.
pub fn plan(start: DateTime<Utc>, end: DateTime<Utc>, granularity: Granularity) -> WindowPlan {
    WindowPlan {
        start,
        end,
        granularity,
        trim_to_end: false,
    }
}

impl WindowPlan {
    /// Clamp the final window's `end` to the job `end`.
    pub fn trimmed(self) -> Self {
        Self {
            trim_to_end: true,
            ..self
        }
    }

    pub fn windows(&self) -> Windows {
        Windows {
            cursor: self.start,
            end: self.end,
            granularity: self.granularity,
            span: window_span(self.granularity),
            trim_to_end: self.trim_to_end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl IntoIterator for WindowPlan {
    type Item = RequestWindow;
    type IntoIter = Windows;

    fn into_iter(self) -> Self::IntoIter {
        self.windows()
    }
}

/// Lazy [`Iterator`] over the [`RequestWindow`]s of a [`WindowPlan`].
#[derive(Clone, Debug)]
pub struct Windows {
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Granularity,
    span: TimeDelta,
    trim_to_end: bool,
}

impl Iterator for Windows {
    type Item = RequestWindow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }

        let start = self.cursor;
        // Past the representable range the cursor saturates, which also ends iteration
        let next = start
            .checked_add_signed(self.span)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let end = if self.trim_to_end {
            next.min(self.end)
        } else {
            next
        };

        self.cursor = next;

        Some(RequestWindow {
            start,
            end,
            granularity: self.granularity,
        })
    }
}

impl std::iter::FusedIterator for Windows {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec).unwrap()
    }

    #[test]
    fn test_window_span() {
        assert_eq!(window_span(Granularity::S5), TimeDelta::seconds(22_500));
        assert_eq!(window_span(Granularity::H1), TimeDelta::hours(4500));
        assert_eq!(window_span(Granularity::D), TimeDelta::days(4500));
        assert_eq!(window_span(Granularity::W), TimeDelta::weeks(4500));
    }

    #[test]
    fn test_plan_empty_when_start_not_before_end() {
        let instant = utc(2014, 1, 1, 0, 0, 0);
        assert_eq!(plan(instant, instant, Granularity::H1).windows().count(), 0);
        assert!(plan(instant, instant, Granularity::H1).is_empty());

        let earlier = utc(2013, 6, 1, 0, 0, 0);
        assert_eq!(plan(instant, earlier, Granularity::M1).into_iter().count(), 0);
    }

    #[test]
    fn test_plan_one_year_of_hourly_candles() {
        let start = utc(2014, 1, 1, 0, 0, 0);
        let end = utc(2014, 12, 31, 23, 59, 59);

        let windows: Vec<_> = plan(start, end, Granularity::H1).into_iter().collect();

        assert_eq!(
            windows,
            vec![
                RequestWindow {
                    start,
                    end: utc(2014, 7, 7, 12, 0, 0),
                    granularity: Granularity::H1,
                },
                RequestWindow {
                    start: utc(2014, 7, 7, 12, 0, 0),
                    end: utc(2015, 1, 11, 0, 0, 0),
                    granularity: Granularity::H1,
                },
            ]
        );
    }

    #[test]
    fn test_plan_one_year_of_daily_candles_is_single_window() {
        let start = utc(2014, 1, 1, 0, 0, 0);
        let end = utc(2014, 12, 31, 23, 59, 59);

        let windows: Vec<_> = plan(start, end, Granularity::D).into_iter().collect();

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start, start);
        assert_eq!(windows[0].end, start + TimeDelta::days(4500));
    }

    #[test]
    fn test_plan_windows_are_contiguous_with_full_spans() {
        let start = utc(2014, 1, 1, 0, 0, 0);
        let end = utc(2014, 1, 8, 0, 0, 0);

        for granularity in Granularity::ALL {
            let span = window_span(granularity);
            let windows: Vec<_> = plan(start, end, granularity).into_iter().collect();

            assert!(!windows.is_empty(), "{granularity} produced no windows");
            assert_eq!(windows[0].start, start, "{granularity} first window start");

            for window in &windows {
                assert_eq!(window.end - window.start, span, "{granularity} span");
                assert_eq!(window.granularity, granularity);
                assert!(window.start < end, "{granularity} window starts past end");
            }

            for pair in windows.windows(2) {
                assert_eq!(pair[0].end, pair[1].start, "{granularity} gap or overlap");
            }

            let last = windows.last().unwrap();
            assert!(last.end >= end, "{granularity} does not cover the job range");
        }
    }

    #[test]
    fn test_plan_s5_window_count() {
        // 22_500s per window, one day is 86_400s
        let start = utc(2014, 1, 1, 0, 0, 0);
        let end = utc(2014, 1, 2, 0, 0, 0);

        let windows: Vec<_> = plan(start, end, Granularity::S5).into_iter().collect();

        assert_eq!(windows.len(), 4);
        assert_eq!(windows[3].start, utc(2014, 1, 1, 18, 45, 0));
        assert_eq!(windows[3].end, utc(2014, 1, 2, 1, 0, 0));
    }

    #[test]
    fn test_plan_trimmed_clamps_final_window() {
        let start = utc(2014, 1, 1, 0, 0, 0);
        let end = utc(2014, 12, 31, 23, 59, 59);

        let windows: Vec<_> = plan(start, end, Granularity::H1)
            .trimmed()
            .into_iter()
            .collect();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].end, utc(2014, 7, 7, 12, 0, 0));
        assert_eq!(windows[1].end, end);
    }

    #[test]
    fn test_plan_is_deterministic_and_restartable() {
        let job = plan(
            utc(2010, 1, 1, 0, 0, 0),
            utc(2015, 12, 31, 23, 59, 59),
            Granularity::M15,
        );

        let first: Vec<_> = job.windows().collect();
        let second: Vec<_> = job.windows().collect();
        let third: Vec<_> = job.into_iter().collect();

        assert!(first.len() > 1);
        assert_eq!(first, second);
        assert_eq!(first, third);
    }
}
