//! onedot-renderer: year-progress dot wallpapers
//!
//! Renders one dot per day of the year on a fixed 15×25 grid. Days before the
//! reference date, the day itself, and the days after it are drawn in three
//! configurable colors, with a soft glow behind today and a caption such as
//! `333 days • 9% Complete` underneath.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use onedot_renderer::{generate, Argb, DotShape, StyleConfig};
//!
//! let style = StyleConfig {
//!     today_color: Argb(0xFFF97316),
//!     ..StyleConfig::default()
//! }
//! .with_shape(DotShape::Rounded);
//!
//! let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
//! let wallpaper = generate(540, 960, &style, date).unwrap();
//! let png = wallpaper.to_png().unwrap();
//! assert!(!png.is_empty());
//! ```
//!
//! # Persisted Settings
//!
//! Settings are stored as a sparse [`StyleProfile`]; unset fields fall back
//! to the defaults when resolved:
//!
//! ```
//! use onedot_renderer::{MemoryStore, StyleProfile, StyleStore, DotDensity};
//!
//! let store = MemoryStore::default();
//! store.update(&StyleProfile::new().with_dot_density(DotDensity::Large)).unwrap();
//!
//! let style = store.style().unwrap();
//! assert_eq!(style.dot_density, DotDensity::Large);
//! ```

mod apply;
mod calendar;
mod color;
mod error;
mod generator;
mod preview;
mod profile;
mod schedule;
mod store;
mod style;

pub mod layout;
pub mod render;

pub use apply::{
    PngFileSink, SUPERSAMPLING, ScreenSize, WallpaperSink, apply_now, render_for_screen,
    run_daily_job, save_and_apply,
};
pub use calendar::{YearProgress, days_in_year, is_leap_year};
pub use color::{Argb, ParseColorError};
pub use error::{ApplyError, RenderError, SaveAndApplyError, StoreError};
pub use generator::{WallpaperImage, generate};
pub use preview::render_preview;
pub use profile::StyleProfile;
pub use schedule::{
    DAILY_JOB_NAME, DailySchedule, ExistingJobPolicy, JobOutcome, JobRegistry, RetryPolicy,
    ScheduledJob,
};
pub use store::{JsonFileStore, MemoryStore, StyleStore, default_settings_path};
pub use style::{DotDensity, DotShape, StyleConfig};
