//! Pipeline – ties together branding resolution, letterhead, table layout
//! and rendering into a single call, with a plain fallback document when any
//! stage fails.

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::branding::{resolve_with_deadline, BrandingInfo, BrandingResult, SettingsSource};
use crate::canvas::{Align, Canvas, A4_HEIGHT_PT, A4_WIDTH_PT, DEFAULT_MARGIN_PT};
use crate::error::{LayoutError, ReportError};
use crate::layout_config::DocumentLayout;
use crate::letterhead::render_letterhead;
use crate::render::render_pdf;
use crate::table::{layout_table, Cell, ContinuationFooter, NoFooter, TableStyle};

/// Baseline of the plain title on a fallback document.
pub const FALLBACK_TITLE_Y: f32 = 40.0;
/// Where the plain table starts on a fallback document.
pub const FALLBACK_TABLE_Y: f32 = 55.0;

/// Page orientation for the generated PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    /// Portrait mode: height > width (default).
    #[default]
    Portrait,
    /// Landscape mode: width > height.
    Landscape,
}

/// Configuration for report generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Page width in points (default: A4 = 595.28).
    pub page_width: f32,
    /// Page height in points (default: A4 = 841.89).
    pub page_height: f32,
    /// Page margin in points (default: 40).
    pub page_margin: f32,
    /// Page orientation; swaps effective width/height when `Landscape`.
    pub orientation: PageOrientation,
    /// Give up on the settings fetch after this long and use the fallback.
    #[serde(with = "optional_millis")]
    pub fetch_timeout: Option<Duration>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH_PT,
            page_height: A4_HEIGHT_PT,
            page_margin: DEFAULT_MARGIN_PT,
            orientation: PageOrientation::Portrait,
            fetch_timeout: None,
        }
    }
}

impl ReportConfig {
    /// Effective page width after applying orientation.
    pub fn effective_width(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_width,
            PageOrientation::Landscape => self.page_height,
        }
    }

    /// Effective page height after applying orientation.
    pub fn effective_height(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_height,
            PageOrientation::Landscape => self.page_width,
        }
    }

    /// Create an A4 landscape config.
    pub fn a4_landscape() -> Self {
        Self {
            orientation: PageOrientation::Landscape,
            ..Self::default()
        }
    }
}

/// `fetch_timeout` as an optional integer number of milliseconds.
mod optional_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

/// What to put in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub title: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
    #[serde(alias = "fileName")]
    pub file_name: String,
}

impl ReportRequest {
    pub fn new(
        title: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Cell>>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            columns,
            rows,
            file_name: file_name.into(),
        }
    }
}

/// A finished PDF and the layout it was rendered from.
#[derive(Debug, Clone)]
pub struct DocumentArtifact {
    /// `{file_name}_{YYYYMMDD}.pdf`
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub layout: DocumentLayout,
}

impl DocumentArtifact {
    pub fn page_count(&self) -> usize {
        self.layout.page_count()
    }
}

/// Outcome of report generation. Both arms carry a usable document.
#[derive(Debug)]
pub enum ReportResult {
    /// Branded document from the primary pipeline.
    Full(DocumentArtifact),
    /// Plain document produced after `cause` stopped the primary pipeline.
    Degraded {
        artifact: DocumentArtifact,
        cause: ReportError,
    },
}

impl ReportResult {
    pub fn artifact(&self) -> &DocumentArtifact {
        match self {
            ReportResult::Full(artifact) | ReportResult::Degraded { artifact, .. } => artifact,
        }
    }

    pub fn into_artifact(self) -> DocumentArtifact {
        match self {
            ReportResult::Full(artifact) | ReportResult::Degraded { artifact, .. } => artifact,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ReportResult::Degraded { .. })
    }
}

/// Source of "now" for the letterhead timestamp and the file name date.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// `{file_name}_{YYYYMMDD}.pdf`
pub fn artifact_file_name(file_name: &str, date: &DateTime<Local>) -> String {
    format!("{}_{}.pdf", file_name, date.format("%Y%m%d"))
}

/// Generates reports against one settings source.
#[derive(Debug, Clone)]
pub struct ReportGenerator<S, C = SystemClock> {
    source: S,
    clock: C,
    config: ReportConfig,
}

impl<S: SettingsSource> ReportGenerator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            clock: SystemClock,
            config: ReportConfig::default(),
        }
    }
}

impl<S: SettingsSource, C: Clock> ReportGenerator<S, C> {
    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> ReportGenerator<S, C2> {
        ReportGenerator {
            source: self.source,
            clock,
            config: self.config,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Generate a report. Never fails: when branding cannot be fetched or the
    /// branded layout cannot be built, a plain document is returned instead.
    pub async fn generate(&self, request: &ReportRequest) -> ReportResult {
        let branding = resolve_with_deadline(&self.source, self.config.fetch_timeout).await;

        let primary = match branding {
            BrandingResult::Resolved(info) => self
                .compose_branded(request, &info)
                .map_err(ReportError::from),
            BrandingResult::Defaulted(_, e) => Err(ReportError::from(e)),
        };

        let file_name = artifact_file_name(&request.file_name, &self.clock.now());
        match primary {
            Ok(layout) => {
                let bytes = render_pdf(&layout);
                log::debug!(
                    "report '{}': {} page(s), {} bytes",
                    file_name,
                    layout.page_count(),
                    bytes.len()
                );
                ReportResult::Full(DocumentArtifact {
                    file_name,
                    bytes,
                    layout,
                })
            }
            Err(cause) => {
                log::warn!("report '{file_name}': falling back to plain document: {cause}");
                let layout = self.compose_fallback(request);
                let bytes = render_pdf(&layout);
                ReportResult::Degraded {
                    artifact: DocumentArtifact {
                        file_name,
                        bytes,
                        layout,
                    },
                    cause,
                }
            }
        }
    }

    /// Letterhead on page one, styled table, footers on continuation pages.
    fn compose_branded(
        &self,
        request: &ReportRequest,
        branding: &BrandingInfo,
    ) -> Result<DocumentLayout, LayoutError> {
        let mut canvas = Canvas::new(
            &request.title,
            self.config.effective_width(),
            self.config.effective_height(),
            self.config.page_margin,
        )?;
        render_letterhead(&mut canvas, branding, &request.title, &self.clock.now())?;
        let start_y = canvas.cursor_y();
        layout_table(
            &mut canvas,
            &request.columns,
            &request.rows,
            start_y,
            &TableStyle::branded(),
            &mut ContinuationFooter,
        )?;
        Ok(canvas.finish())
    }

    /// Plain title at the top left and an unstyled table below it.
    ///
    /// Falls back to A4 when the configured page is unusable, and to the title
    /// alone when there are no columns.
    fn compose_fallback(&self, request: &ReportRequest) -> DocumentLayout {
        let mut canvas = match Canvas::new(
            &request.title,
            self.config.effective_width(),
            self.config.effective_height(),
            self.config.page_margin,
        ) {
            Ok(canvas) if FALLBACK_TABLE_Y < canvas.content_bottom() => canvas,
            _ => Canvas::a4(&request.title),
        };

        let left = canvas.margin();
        canvas.text(&request.title, left, FALLBACK_TITLE_Y, 14.0, false, Align::Left);
        if let Err(e) = layout_table(
            &mut canvas,
            &request.columns,
            &request.rows,
            FALLBACK_TABLE_Y,
            &TableStyle::plain(),
            &mut NoFooter,
        ) {
            log::warn!("fallback table skipped: {e}");
        }
        canvas.finish()
    }
}

/// Generate a report from loose parts with the default configuration.
pub async fn generate_report<S: SettingsSource>(
    source: S,
    title: &str,
    columns: &[&str],
    rows: Vec<Vec<Cell>>,
    file_name: &str,
) -> ReportResult {
    let request = ReportRequest::new(
        title,
        columns.iter().map(|c| c.to_string()).collect(),
        rows,
        file_name,
    );
    ReportGenerator::new(source).generate(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branding::StaticSettings;
    use chrono::TimeZone;
    use serde_json::json;

    #[derive(Clone, Copy)]
    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Local> {
            Local.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
        }
    }

    fn request() -> ReportRequest {
        ReportRequest::new(
            "Sales Report",
            vec!["Item".into(), "Qty".into()],
            vec![vec!["Pen".into(), "10".into()], vec!["Book".into(), "3".into()]],
            "sales",
        )
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let cfg = ReportConfig::a4_landscape();
        assert_eq!(cfg.effective_width(), A4_HEIGHT_PT);
        assert_eq!(cfg.effective_height(), A4_WIDTH_PT);
    }

    #[test]
    fn config_from_partial_json() {
        let cfg: ReportConfig =
            serde_json::from_str(r#"{ "orientation": "landscape", "fetch_timeout": 2500 }"#)
                .unwrap();
        assert_eq!(cfg.orientation, PageOrientation::Landscape);
        assert_eq!(cfg.fetch_timeout, Some(Duration::from_millis(2500)));
        assert_eq!(cfg.page_margin, DEFAULT_MARGIN_PT);
    }

    #[test]
    fn request_accepts_camel_case_file_name() {
        let req: ReportRequest = serde_json::from_str(
            r#"{ "title": "T", "columns": ["A"], "rows": [["x"]], "fileName": "out" }"#,
        )
        .unwrap();
        assert_eq!(req.file_name, "out");
    }

    #[test]
    fn file_name_embeds_date() {
        assert_eq!(artifact_file_name("sales", &FixedClock.now()), "sales_20261018.pdf");
    }

    #[tokio::test]
    async fn branded_report() {
        let result = ReportGenerator::new(StaticSettings(json!({
            "navbar": { "companyName": "Acme Co" }
        })))
        .with_clock(FixedClock)
        .generate(&request())
        .await;

        assert!(!result.is_degraded());
        let artifact = result.artifact();
        assert_eq!(artifact.file_name, "sales_20261018.pdf");
        assert_eq!(&artifact.bytes[0..5], b"%PDF-");
        assert_eq!(artifact.page_count(), 1);
        let texts: Vec<_> = artifact.layout.texts().collect();
        assert_eq!(texts[0], "Acme Co");
        assert!(texts.contains(&"GENERATED ON OCTOBER 18, 2026 AT 9:30 AM"));
    }

    #[tokio::test]
    async fn layout_failure_falls_back() {
        let cfg = ReportConfig {
            page_width: 60.0,
            ..ReportConfig::default()
        };
        let result = ReportGenerator::new(StaticSettings::default())
            .with_clock(FixedClock)
            .with_config(cfg)
            .generate(&request())
            .await;

        let ReportResult::Degraded { artifact, cause } = result else {
            panic!("expected a degraded report");
        };
        assert!(matches!(
            cause,
            ReportError::Layout(LayoutError::NoContentWidth { .. })
        ));
        // The unusable page size is replaced by A4.
        assert_eq!(artifact.layout.page_width_pt, A4_WIDTH_PT);
        let texts: Vec<_> = artifact.layout.texts().collect();
        assert_eq!(texts, vec!["Sales Report", "Item", "Qty", "Pen", "10", "Book", "3"]);
    }

    #[tokio::test]
    async fn letterhead_overflow_falls_back_with_every_row() {
        let cfg = ReportConfig {
            page_height: 160.0,
            page_margin: 20.0,
            ..ReportConfig::default()
        };
        let rows: Vec<Vec<Cell>> = (0..12)
            .map(|i| vec![Cell::from(format!("Row {i:02}")), Cell::from(i as i64)])
            .collect();
        let req = ReportRequest::new("Short", vec!["Name".into(), "N".into()], rows, "short");
        let result = ReportGenerator::new(StaticSettings::default())
            .with_clock(FixedClock)
            .with_config(cfg)
            .generate(&req)
            .await;

        let ReportResult::Degraded { artifact, cause } = result else {
            panic!("expected a degraded report");
        };
        assert!(matches!(
            cause,
            ReportError::Layout(LayoutError::LetterheadOverflow { .. })
        ));
        // The short page still fits the plain layout, so it is kept.
        assert_eq!(artifact.layout.page_height_pt, 160.0);
        assert!(artifact.page_count() > 1);
        let labels: Vec<_> = artifact
            .layout
            .texts()
            .filter(|t| t.starts_with("Row "))
            .map(String::from)
            .collect();
        let expected: Vec<_> = (0..12).map(|i| format!("Row {i:02}")).collect();
        assert_eq!(labels, expected);
    }

    #[tokio::test]
    async fn no_columns_yields_title_only_fallback() {
        let req = ReportRequest::new("Empty", Vec::new(), Vec::new(), "empty");
        let result = ReportGenerator::new(StaticSettings::default())
            .generate(&req)
            .await;
        let ReportResult::Degraded { artifact, cause } = result else {
            panic!("expected a degraded report");
        };
        assert!(matches!(cause, ReportError::Layout(LayoutError::NoColumns)));
        assert_eq!(artifact.layout.texts().collect::<Vec<_>>(), vec!["Empty"]);
        assert!(!artifact.bytes.is_empty());
    }
}
