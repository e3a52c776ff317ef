use crate::{
    error::DataError,
    rest::{
        CandleFetcher, DEFAULT_REQUEST_DELAY, WindowStatus, stream_windows,
        window::{WindowPlan, plan},
    },
    series::{CandleSeries, CandleTable},
    sink::write_csv,
};
use chrono::{DateTime, NaiveDate, Utc};
use futures::{StreamExt, pin_mut};
use fxhist_instrument::{Granularity, InstrumentName};
use std::{path::PathBuf, time::Duration};
use tracing::{info, warn};

/// Everything a download job needs besides the [`CandleFetcher`] it runs against.
#[derive(Clone, Debug, PartialEq)]
pub struct JobConfig {
    pub instrument: InstrumentName,
    pub granularity: Granularity,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub path: PathBuf,
    pub delay: Duration,
    /// Clamp the last window to `end` and drop records at or after `end`.
    pub trim_to_end: bool,
}

impl JobConfig {
    /// Construct a [`JobConfig`] covering whole calendar years.
    ///
    /// `end_year` is exclusive: the job runs from `begin_year`-01-01T00:00:00 to
    /// `end_year - 1`-12-31T23:59:59. If `end_year <= begin_year` the job plans no windows.
    pub fn from_years(
        instrument: InstrumentName,
        granularity: Granularity,
        begin_year: i32,
        end_year: i32,
    ) -> Result<Self, DataError> {
        let start = NaiveDate::from_ymd_opt(begin_year, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or(DataError::InvalidYear(begin_year))?
            .and_utc();

        let end = end_year
            .checked_sub(1)
            .and_then(|year| NaiveDate::from_ymd_opt(year, 12, 31))
            .and_then(|date| date.and_hms_opt(23, 59, 59))
            .ok_or(DataError::InvalidYear(end_year))?
            .and_utc();

        let path = default_output_path(&instrument, granularity);

        Ok(Self {
            instrument,
            granularity,
            start,
            end,
            path,
            delay: DEFAULT_REQUEST_DELAY,
            trim_to_end: false,
        })
    }

    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..self
        }
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    pub fn with_trim_to_end(self, trim_to_end: bool) -> Self {
        Self {
            trim_to_end,
            ..self
        }
    }

    /// Deterministic [`WindowPlan`] for this job.
    pub fn plan(&self) -> WindowPlan {
        let window_plan = plan(self.start, self.end, self.granularity);
        if self.trim_to_end {
            window_plan.trimmed()
        } else {
            window_plan
        }
    }
}

/// Default output location, eg/ "./EUR_USD_H1.csv".
pub fn default_output_path(instrument: &InstrumentName, granularity: Granularity) -> PathBuf {
    PathBuf::from(format!("./{instrument}_{granularity}.csv"))
}

/// Summary of a completed download job.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct JobReport {
    pub windows_planned: usize,
    pub windows_succeeded: usize,
    pub windows_partial: usize,
    pub windows_failed: usize,
    pub records_appended: usize,
    pub records_skipped: usize,
}

/// Output of [`DownloadJob::run`].
#[derive(Clone, Debug)]
pub struct JobOutput {
    pub table: CandleTable,
    pub report: JobReport,
}

/// Chained historical candle download: plan windows, fetch them one by one, and fold every
/// successful window into a single [`CandleSeries`].
#[derive(Clone, Debug)]
pub struct DownloadJob {
    pub config: JobConfig,
}

impl DownloadJob {
    pub fn new(config: JobConfig) -> Self {
        Self { config }
    }

    /// Run the job to completion and return the assembled table.
    ///
    /// Failed windows and malformed records are logged and skipped. Any other error aborts
    /// the job and discards the candles fetched so far.
    pub async fn run<Fetcher>(&self, fetcher: &Fetcher) -> Result<JobOutput, DataError>
    where
        Fetcher: CandleFetcher + Sync,
    {
        let config = &self.config;
        let window_plan = config.plan();

        let mut report = JobReport {
            windows_planned: window_plan.windows().count(),
            ..JobReport::default()
        };
        let mut series = if config.trim_to_end {
            CandleSeries::with_cutoff(config.end)
        } else {
            CandleSeries::new()
        };

        info!(
            instrument = %config.instrument,
            granularity = %config.granularity,
            start = %config.start,
            end = %config.end,
            windows = report.windows_planned,
            "starting candle download"
        );

        let outcomes = stream_windows(
            fetcher,
            window_plan,
            config.instrument.clone(),
            config.delay,
        );
        pin_mut!(outcomes);

        while let Some(outcome) = outcomes.next().await {
            match outcome {
                Ok(fetch) => {
                    match fetch.status() {
                        WindowStatus::PartiallyMalformed => report.windows_partial += 1,
                        _ => report.windows_succeeded += 1,
                    }
                    report.records_skipped += fetch.skipped;
                    report.records_appended += series.append(fetch.candles);
                }
                Err(error) if error.is_recoverable() => {
                    warn!(%error, status = ?WindowStatus::HttpFailed, "skipping failed window");
                    report.windows_failed += 1;
                }
                Err(error) => return Err(error),
            }
        }

        info!(?report, "candle download complete");

        Ok(JobOutput {
            table: series.finalize(),
            report,
        })
    }

    /// Run the job and write the assembled table to [`JobConfig::path`].
    pub async fn run_to_csv<Fetcher>(&self, fetcher: &Fetcher) -> Result<JobReport, DataError>
    where
        Fetcher: CandleFetcher + Sync,
    {
        let JobOutput { table, report } = self.run(fetcher).await?;
        write_csv(&self.config.path, &table)?;
        Ok(report)
    }
}
