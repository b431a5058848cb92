//! # brand-report – branded, paginated PDF reports
//!
//! Turns a title, a column list and rows of cells into a PDF whose first page
//! carries the organization letterhead. The pipeline stages are:
//!
//! 1. **Brand** – fetch the settings record and resolve company details ([`branding`])
//! 2. **Letterhead** – draw name, contact line, divider, title and timestamp ([`letterhead`])
//! 3. **Table** – lay out and paginate the rows, footers on later pages ([`table`])
//! 4. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! [`pipeline`] composes the stages and falls back to a plain, unbranded
//! document when any of them fails, so a report is always produced.

pub mod branding;
pub mod canvas;
pub mod error;
pub mod fonts;
pub mod layout_config;
pub mod letterhead;
pub mod pipeline;
pub mod render;
pub mod table;

// Re-exports for convenience
pub use branding::{BrandingInfo, BrandingResult, HttpSettingsSource, SettingsSource};
pub use error::{LayoutError, ReportError, SettingsError};
pub use pipeline::{
    generate_report, DocumentArtifact, ReportConfig, ReportGenerator, ReportRequest, ReportResult,
};
pub use table::Cell;
