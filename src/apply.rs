//! Producing a wallpaper for the current screen and handing it to the platform.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::calendar::YearProgress;
use crate::error::{ApplyError, SaveAndApplyError};
use crate::generator::{WallpaperImage, generate};
use crate::profile::StyleProfile;
use crate::schedule::{JobOutcome, RetryPolicy};
use crate::store::StyleStore;

/// Wallpapers are rendered above screen resolution for crisper edges.
pub const SUPERSAMPLING: f64 = 1.5;

/// Physical screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Render target for `factor`, truncated to whole pixels.
    pub fn scaled(self, factor: f64) -> (u32, u32) {
        (
            (self.width as f64 * factor) as u32,
            (self.height as f64 * factor) as u32,
        )
    }
}

// ============================================================================
// WallpaperSink
// ============================================================================

/// Destination for a finished wallpaper, e.g. the platform lock screen.
pub trait WallpaperSink: Send + Sync {
    /// Installs a PNG-encoded wallpaper.
    fn set_wallpaper(&self, png: &[u8]) -> io::Result<()>;
}

/// Writes the wallpaper to a PNG file, replacing it atomically.
#[derive(Debug, Clone)]
pub struct PngFileSink {
    path: PathBuf,
}

impl PngFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WallpaperSink for PngFileSink {
    fn set_wallpaper(&self, png: &[u8]) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(png)?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Renders the wallpaper for `screen` with the stored style.
pub fn render_for_screen(
    store: &dyn StyleStore,
    screen: ScreenSize,
    date: NaiveDate,
) -> Result<WallpaperImage, ApplyError> {
    let style = store.style()?;
    let (width, height) = screen.scaled(SUPERSAMPLING);
    Ok(generate(width, height, &style, date)?)
}

/// Renders and installs the wallpaper once. Errors are returned as-is; the
/// interactive path never retries.
pub fn apply_now(
    store: &dyn StyleStore,
    sink: &dyn WallpaperSink,
    screen: ScreenSize,
    date: NaiveDate,
) -> Result<YearProgress, ApplyError> {
    let image = render_for_screen(store, screen, date)?;
    let png = image.to_png()?;
    sink.set_wallpaper(&png).map_err(ApplyError::Sink)?;

    tracing::info!(
        width = image.width(),
        height = image.height(),
        day_of_year = image.progress.day_of_year,
        "wallpaper applied"
    );
    Ok(image.progress)
}

/// Persists `patch`, then applies the wallpaper with the merged settings.
///
/// The two steps fail independently: [`SaveAndApplyError::ApplyFailed`]
/// means the settings were saved.
pub fn save_and_apply(
    store: &dyn StyleStore,
    sink: &dyn WallpaperSink,
    patch: &StyleProfile,
    screen: ScreenSize,
    date: NaiveDate,
) -> Result<YearProgress, SaveAndApplyError> {
    store.update(patch).map_err(SaveAndApplyError::SaveFailed)?;
    apply_now(store, sink, screen, date).map_err(SaveAndApplyError::ApplyFailed)
}

/// One background run of the daily job.
///
/// `attempt` is 1-based. On success the update time is recorded in the
/// store; a failure to record it is logged but does not fail the run.
pub fn run_daily_job<Tz: TimeZone>(
    store: &dyn StyleStore,
    sink: &dyn WallpaperSink,
    screen: ScreenSize,
    now: &DateTime<Tz>,
    attempt: u32,
    retry: &RetryPolicy,
) -> JobOutcome {
    match apply_now(store, sink, screen, now.date_naive()) {
        Ok(_) => {
            if let Err(err) = store.record_update(now.timestamp_millis()) {
                tracing::warn!(error = %err, "failed to record last update time");
            }
            JobOutcome::Success
        }
        Err(err) => match retry.next_delay(attempt) {
            Some(delay) => {
                tracing::warn!(error = %err, attempt, retry_in = ?delay, "daily update failed");
                JobOutcome::Retry(delay)
            }
            None => {
                tracing::error!(error = %err, attempt, "daily update failed, giving up");
                JobOutcome::Failed
            }
        },
    }
}
