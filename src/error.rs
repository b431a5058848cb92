//! Error types for the report pipeline.
//!
//! None of these reach the caller of [`generate_report`](crate::generate_report)
//! as an `Err`: settings failures are masked into default branding and layout
//! failures are carried as the cause of a degraded report.

use thiserror::Error;

/// Failures while fetching or decoding the organization settings record.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The request could not be sent or the body could not be read.
    #[error("settings request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The settings endpoint answered with a non-success status.
    #[error("settings endpoint returned HTTP {0}")]
    Status(u16),

    /// A local settings file could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// The payload was not valid JSON.
    #[error("settings record is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The fetch did not complete before the configured deadline.
    #[error("settings fetch timed out after {0}ms")]
    Timeout(u64),

    /// Any other source-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Failures while laying out the letterhead or the table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("invalid page size {width}x{height}pt")]
    InvalidPageSize { width: f32, height: f32 },

    #[error("table has no columns")]
    NoColumns,

    #[error("margins leave no horizontal room for content (page width {page_width}pt, margin {margin}pt)")]
    NoContentWidth { page_width: f32, margin: f32 },

    #[error("letterhead ends at {end_y}pt, below the printable area ({limit}pt)")]
    LetterheadOverflow { end_y: f32, limit: f32 },
}

/// Why a report was produced through the fallback path.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("branding unavailable: {0}")]
    Branding(#[from] SettingsError),

    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),
}
