//! Error types for rendering, settings persistence, and wallpaper application.

use thiserror::Error;

/// Errors raised by the wallpaper generator.
///
/// The generator performs no I/O, so these are the only two ways it can fail.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// Width or height was zero.
    #[error("invalid wallpaper dimensions {width}x{height}: both must be greater than zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The pixel buffer could not be allocated at the requested size.
    #[error("cannot allocate a {width}x{height} pixel buffer")]
    Allocation { width: u32, height: u32 },
}

/// Errors raised by a [`StyleStore`](crate::StyleStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The platform reports no configuration directory.
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

/// Errors raised while producing a wallpaper and handing it to the platform.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("failed to load settings: {0}")]
    Store(#[from] StoreError),

    #[error("failed to render wallpaper: {0}")]
    Render(#[from] RenderError),

    #[error("failed to encode wallpaper as PNG: {0}")]
    Encode(#[from] image::ImageError),

    /// The wallpaper sink rejected the image.
    #[error("failed to set wallpaper: {0}")]
    Sink(#[source] std::io::Error),
}

/// Outcome of an interactive "save and apply" that did not fully succeed.
///
/// Saving and applying are reported separately: when `ApplyFailed` is
/// returned the new settings are already persisted.
#[derive(Debug, Error)]
pub enum SaveAndApplyError {
    #[error("settings were not saved: {0}")]
    SaveFailed(#[source] StoreError),

    #[error("settings saved, but the wallpaper was not applied: {0}")]
    ApplyFailed(#[source] ApplyError),
}
