//! onedot: render year-progress wallpapers and keep them current.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use image::ImageFormat;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use onedot_renderer::{
    ApplyError, Argb, DAILY_JOB_NAME, DailySchedule, DotDensity, DotShape, ExistingJobPolicy,
    JobOutcome, JobRegistry, JsonFileStore, PngFileSink, RenderError, RetryPolicy,
    SaveAndApplyError, ScheduledJob, ScreenSize, StoreError, StyleProfile, StyleStore,
    WallpaperSink, apply_now, generate, render_preview, run_daily_job, save_and_apply,
};

const WALLPAPER_FILE: &str = "wallpaper.png";
const WAKE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    SaveAndApply(#[from] SaveAndApplyError),

    #[error("failed to serialize settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no daily run can be scheduled after {0}")]
    Schedule(NaiveDateTime),
}

/// Year-progress dot wallpapers.
#[derive(Parser, Debug)]
#[command(name = "onedot", version, about)]
struct Cli {
    /// Settings file. Defaults to `onedot/settings.json` in the user config directory.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a wallpaper to a PNG file.
    Render {
        #[arg(long, default_value_t = 1080)]
        width: u32,

        #[arg(long, default_value_t = 1920)]
        height: u32,

        /// Reference date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
    },

    /// Render the small settings preview to a PNG file.
    Preview {
        #[arg(long, default_value_t = 347)]
        size: u32,

        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
    },

    /// Print the resolved settings as JSON.
    Show,

    /// Change settings; unspecified options keep their saved values.
    Set {
        #[command(flatten)]
        style: StyleArgs,

        /// Apply the wallpaper after saving.
        #[arg(long)]
        apply: bool,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Render the wallpaper for today and install it.
    Apply {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Stay running and refresh the wallpaper shortly after every midnight.
    Daemon {
        #[command(flatten)]
        target: TargetArgs,

        /// Also apply once at start-up.
        #[arg(long)]
        now: bool,
    },
}

#[derive(clap::Args, Debug)]
struct StyleArgs {
    #[arg(long, value_name = "COLOR")]
    past_color: Option<Argb>,

    #[arg(long, value_name = "COLOR")]
    today_color: Option<Argb>,

    #[arg(long, value_name = "COLOR")]
    future_color: Option<Argb>,

    #[arg(long, value_name = "COLOR")]
    background_color: Option<Argb>,

    /// circle, rounded, square or pill.
    #[arg(long, value_parser = parse_shape)]
    shape: Option<DotShape>,

    /// 0 (tiny) to 3 (large).
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=3))]
    density: Option<i64>,
}

impl StyleArgs {
    fn to_patch(&self) -> StyleProfile {
        StyleProfile {
            past_color: self.past_color,
            today_color: self.today_color,
            future_color: self.future_color,
            background_color: self.background_color,
            dot_shape: self.shape,
            dot_density: self.density.map(DotDensity::from_index),
            last_update: None,
        }
    }
}

#[derive(clap::Args, Debug)]
struct TargetArgs {
    /// Screen size as WIDTHxHEIGHT; the wallpaper is rendered 1.5x larger.
    #[arg(long, value_parser = parse_screen, default_value = "1080x1920")]
    screen: ScreenSize,

    /// Where the wallpaper PNG is installed. Defaults to `wallpaper.png` next
    /// to the settings file.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

impl TargetArgs {
    fn sink(&self, store: &JsonFileStore) -> PngFileSink {
        let path = self.output.clone().unwrap_or_else(|| {
            store
                .path()
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(WALLPAPER_FILE)
        });
        PngFileSink::new(path)
    }
}

fn parse_shape(s: &str) -> Result<DotShape, String> {
    let shape = DotShape::from_name(s);
    if shape.name() == s.to_ascii_lowercase() || s.eq_ignore_ascii_case("dot") {
        Ok(shape)
    } else {
        Err(format!("unknown shape {s:?}; expected circle, rounded, square or pill"))
    }
}

fn parse_screen(s: &str) -> Result<ScreenSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let width = w.trim().parse::<u32>().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let height = h.trim().parse::<u32>().map_err(|e| format!("bad height {h:?}: {e}"))?;
    Ok(ScreenSize::new(width, height))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("onedot: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let store = match cli.config {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::open_default()?,
    };
    let today = Local::now().date_naive();

    match cli.command {
        Command::Render { width, height, date, output } => {
            let image = generate(width, height, &store.style()?, date.unwrap_or(today))?;
            image
                .data
                .save_with_format(&output, ImageFormat::Png)
                .map_err(|source| CliError::Write { path: output.clone(), source })?;
            tracing::info!(path = %output.display(), caption = %image.progress.caption(), "rendered");
        }
        Command::Preview { size, output } => {
            let image = render_preview(size, &store.style()?)?;
            image
                .save_with_format(&output, ImageFormat::Png)
                .map_err(|source| CliError::Write { path: output.clone(), source })?;
        }
        Command::Show => {
            let saved = store.load()?;
            let mut resolved = StyleProfile::from_style(&saved.resolve());
            resolved.last_update = saved.last_update;
            println!("{}", resolved.to_json_pretty()?);
        }
        Command::Set { style, apply, target } => {
            let patch = style.to_patch();
            if apply {
                let progress = save_and_apply(&store, &target.sink(&store), &patch, target.screen, today)?;
                println!("{}", progress.caption());
            } else {
                store.update(&patch)?;
            }
        }
        Command::Apply { target } => {
            let progress = apply_now(&store, &target.sink(&store), target.screen, today)?;
            println!("{}", progress.caption());
        }
        Command::Daemon { target, now } => {
            let sink = target.sink(&store);
            run_daemon(&store, &sink, target.screen, now)?;
        }
    }
    Ok(())
}

fn run_daemon(
    store: &dyn StyleStore,
    sink: &dyn WallpaperSink,
    screen: ScreenSize,
    run_at_start: bool,
) -> Result<(), CliError> {
    let retry = RetryPolicy::default();
    let mut registry = JobRegistry::new();

    let started = Local::now().naive_local();
    let job = ScheduledJob::daily(DailySchedule::default(), started).ok_or(CliError::Schedule(started))?;
    registry.enqueue_unique(DAILY_JOB_NAME, job, ExistingJobPolicy::Keep);

    if run_at_start {
        run_with_retries(store, sink, screen, &retry);
    }

    while let Some(job) = registry.get(DAILY_JOB_NAME) {
        let next_run = job.next_run;
        tracing::info!(%next_run, "waiting for next update");
        // Short naps so a suspend/resume is noticed against the wall clock.
        while let Ok(wait) = (next_run - Local::now().naive_local()).to_std() {
            if wait.is_zero() {
                break;
            }
            thread::sleep(wait.min(WAKE_INTERVAL));
        }

        let woke = Local::now().naive_local();
        if job.is_overdue(woke) {
            tracing::warn!(%next_run, %woke, "missed the update window, running late");
        }

        run_with_retries(store, sink, screen, &retry);

        let now = Local::now().naive_local();
        registry
            .advance(DAILY_JOB_NAME, now)
            .ok_or(CliError::Schedule(now))?;
    }
    Ok(())
}

fn run_with_retries(
    store: &dyn StyleStore,
    sink: &dyn WallpaperSink,
    screen: ScreenSize,
    retry: &RetryPolicy,
) {
    let mut attempt = 1;
    loop {
        match run_daily_job(store, sink, screen, &Local::now(), attempt, retry) {
            JobOutcome::Retry(delay) => {
                thread::sleep(delay);
                attempt += 1;
            }
            JobOutcome::Success | JobOutcome::Failed => return,
        }
    }
}
