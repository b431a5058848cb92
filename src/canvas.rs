//! Canvas – the mutable drawing context for one document.
//!
//! Holds the current page dimensions, vertical cursor, page index and colour
//! state, and records draw items page by page. A canvas belongs to exactly one
//! generation call and is consumed by [`Canvas::finish`].

use crate::error::LayoutError;
use crate::fonts::measure_text_width;
use crate::layout_config::*;

/// A4 width in points.
pub const A4_WIDTH_PT: f32 = 595.28;
/// A4 height in points.
pub const A4_HEIGHT_PT: f32 = 841.89;
/// Default page margins in points.
pub const DEFAULT_MARGIN_PT: f32 = 40.0;

/// Page-top-left drawing surface that records into a [`DocumentLayout`].
#[derive(Debug)]
pub struct Canvas {
    title: String,
    page_width: f32,
    page_height: f32,
    margin: f32,
    pages: Vec<PageLayout>,
    cursor_y: f32,
    text_color: Rgb,
    fill_color: Rgb,
    stroke: Stroke,
}

/// Horizontal anchoring for [`Canvas::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

impl Canvas {
    /// Open a canvas with a single blank page.
    pub fn new(
        title: &str,
        page_width: f32,
        page_height: f32,
        margin: f32,
    ) -> Result<Self, LayoutError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(page_width) || !valid(page_height) {
            return Err(LayoutError::InvalidPageSize {
                width: page_width,
                height: page_height,
            });
        }
        if !margin.is_finite() || margin < 0.0 || page_width - 2.0 * margin <= 0.0 {
            return Err(LayoutError::NoContentWidth { page_width, margin });
        }

        Ok(Self::blank(title, page_width, page_height, margin))
    }

    /// A4 portrait canvas with the default margin.
    pub fn a4(title: &str) -> Self {
        Self::blank(title, A4_WIDTH_PT, A4_HEIGHT_PT, DEFAULT_MARGIN_PT)
    }

    fn blank(title: &str, page_width: f32, page_height: f32, margin: f32) -> Self {
        Self {
            title: title.to_string(),
            page_width,
            page_height,
            margin,
            pages: vec![PageLayout::new(0)],
            cursor_y: margin,
            text_color: BLACK,
            fill_color: WHITE,
            stroke: Stroke {
                width: 0.5,
                color: BLACK,
            },
        }
    }

    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    /// Left/right/top/bottom margin in points.
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Width between the mirrored left and right margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Lowest y at which content may end on a page.
    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.margin
    }

    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    pub fn set_cursor_y(&mut self, y: f32) {
        self.cursor_y = y;
    }

    /// One-based number of the page currently being drawn.
    pub fn page_number(&self) -> usize {
        self.pages.len()
    }

    /// Start a new page and move the cursor to the top margin.
    pub fn add_page(&mut self) {
        let index = self.pages.len();
        self.pages.push(PageLayout::new(index));
        self.cursor_y = self.margin;
        log::trace!("canvas: started page {}", index + 1);
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn set_fill_color(&mut self, color: Rgb) {
        self.fill_color = color;
    }

    pub fn set_stroke(&mut self, width: f32, color: Rgb) {
        self.stroke = Stroke { width, color };
    }

    /// Restore black text, white fill and a thin black stroke.
    pub fn reset_colors(&mut self) {
        self.text_color = BLACK;
        self.fill_color = WHITE;
        self.stroke = Stroke {
            width: 0.5,
            color: BLACK,
        };
    }

    /// Draw one line of text with its baseline at `y`.
    ///
    /// With [`Align::Center`], `x` is ignored and the run is centered on the
    /// page.
    pub fn text(&mut self, text: &str, x: f32, y: f32, font_size: f32, bold: bool, align: Align) {
        let x = match align {
            Align::Left => x,
            Align::Center => {
                (self.page_width - measure_text_width(text, font_size, bold)) / 2.0
            }
        };
        let run = TextRun {
            text: text.to_string(),
            x,
            y,
            font_size,
            bold,
            color: self.text_color,
        };
        self.push(DrawItem::Text(run));
    }

    /// Fill a rectangle with the current fill colour.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawItem::Rect {
            x,
            y,
            width,
            height,
            fill: Some(self.fill_color),
            stroke: None,
        });
    }

    /// Outline a rectangle with the current stroke.
    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawItem::Rect {
            x,
            y,
            width,
            height,
            fill: None,
            stroke: Some(self.stroke),
        });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.push(DrawItem::Line {
            x1,
            y1,
            x2,
            y2,
            stroke: self.stroke,
        });
    }

    /// Freeze the drawn pages.
    pub fn finish(self) -> DocumentLayout {
        DocumentLayout {
            title: self.title,
            page_width_pt: self.page_width,
            page_height_pt: self.page_height,
            pages: self.pages,
        }
    }

    fn push(&mut self, item: DrawItem) {
        // `pages` is never empty: `new` opens page one and pages are only added.
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a4() -> Canvas {
        Canvas::a4("test")
    }

    #[test]
    fn rejects_degenerate_pages() {
        assert!(matches!(
            Canvas::new("t", 0.0, 800.0, 40.0),
            Err(LayoutError::InvalidPageSize { .. })
        ));
        assert!(matches!(
            Canvas::new("t", f32::NAN, 800.0, 40.0),
            Err(LayoutError::InvalidPageSize { .. })
        ));
        assert!(matches!(
            Canvas::new("t", 60.0, 800.0, 40.0),
            Err(LayoutError::NoContentWidth { .. })
        ));
    }

    #[test]
    fn add_page_resets_cursor_and_counts() {
        let mut c = a4();
        c.set_cursor_y(500.0);
        assert_eq!(c.page_number(), 1);
        c.add_page();
        assert_eq!(c.page_number(), 2);
        assert_eq!(c.cursor_y(), 40.0);
        assert_eq!(c.finish().page_count(), 2);
    }

    #[test]
    fn centered_text_is_symmetric() {
        let mut c = a4();
        c.text("Centered", 0.0, 100.0, 10.0, false, Align::Center);
        let layout = c.finish();
        let DrawItem::Text(run) = &layout.pages[0].items[0] else {
            panic!("expected text");
        };
        let w = measure_text_width("Centered", 10.0, false);
        assert!((run.x - (595.28 - w) / 2.0).abs() < 0.01);
    }

    #[test]
    fn draw_items_capture_color_state() {
        let mut c = a4();
        c.set_text_color([0.5, 0.5, 0.5]);
        c.text("grey", 40.0, 60.0, 9.0, false, Align::Left);
        c.reset_colors();
        c.text("black", 40.0, 80.0, 9.0, false, Align::Left);
        let layout = c.finish();
        let colors: Vec<Rgb> = layout.pages[0]
            .items
            .iter()
            .filter_map(|i| match i {
                DrawItem::Text(r) => Some(r.color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![[0.5, 0.5, 0.5], BLACK]);
    }
}
