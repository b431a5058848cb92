//! Letterhead and footer drawing.
//!
//! Page one carries the full letterhead; continuation pages only get a small
//! "Page N" footer.

use chrono::{DateTime, Local};

use crate::branding::BrandingInfo;
use crate::canvas::{Align, Canvas};
use crate::error::LayoutError;
use crate::layout_config::Rgb;

/// Colour for secondary letterhead text and the footer.
pub const MUTED: Rgb = [0.4, 0.4, 0.4];
/// Colour of the divider rule.
pub const DIVIDER: Rgb = [0.8, 0.8, 0.8];

// Baselines, in points from the top of the page.
pub const COMPANY_Y: f32 = 50.0;
pub const ADDRESS_Y: f32 = 68.0;
pub const CONTACT_Y: f32 = 82.0;
pub const DIVIDER_Y: f32 = 92.0;
pub const TITLE_Y: f32 = 118.0;
pub const GENERATED_Y: f32 = 134.0;
/// Where the table starts once the letterhead is drawn.
pub const TABLE_START_Y: f32 = 150.0;

/// Distance of the footer baseline from the bottom edge.
pub const FOOTER_OFFSET: f32 = 20.0;

/// Long date + time, e.g. `October 18, 2026 at 3:04 PM`.
const TIMESTAMP_FORMAT: &str = "%B %-d, %Y at %-I:%M %p";

/// Draw the letterhead onto the current page and leave the cursor at
/// [`TABLE_START_Y`].
///
/// Fails when the page is too short to hold the letterhead above its bottom
/// margin.
pub fn render_letterhead(
    canvas: &mut Canvas,
    branding: &BrandingInfo,
    title: &str,
    now: &DateTime<Local>,
) -> Result<(), LayoutError> {
    if TABLE_START_Y >= canvas.content_bottom() {
        return Err(LayoutError::LetterheadOverflow {
            end_y: TABLE_START_Y,
            limit: canvas.content_bottom(),
        });
    }

    canvas.reset_colors();
    canvas.text(&branding.company_name, 0.0, COMPANY_Y, 20.0, true, Align::Center);

    canvas.set_text_color(MUTED);
    canvas.text(&branding.address, 0.0, ADDRESS_Y, 9.0, false, Align::Center);
    let contact = format!("Email: {} | Mobile: {}", branding.email, branding.phone);
    canvas.text(&contact, 0.0, CONTACT_Y, 9.0, false, Align::Center);

    canvas.set_stroke(0.75, DIVIDER);
    let right = canvas.page_width() - canvas.margin();
    canvas.line(canvas.margin(), DIVIDER_Y, right, DIVIDER_Y);

    canvas.reset_colors();
    canvas.text(title, 0.0, TITLE_Y, 16.0, true, Align::Center);

    canvas.set_text_color(MUTED);
    let generated = format!("Generated on {}", now.format(TIMESTAMP_FORMAT)).to_uppercase();
    canvas.text(&generated, 0.0, GENERATED_Y, 7.0, false, Align::Center);

    canvas.reset_colors();
    canvas.set_cursor_y(TABLE_START_Y);
    Ok(())
}

/// Draw the `Page N` footer on the current page.
pub fn render_footer(canvas: &mut Canvas, page_number: usize) {
    canvas.set_text_color(MUTED);
    let y = canvas.page_height() - FOOTER_OFFSET;
    canvas.text(&format!("Page {page_number}"), 0.0, y, 8.0, false, Align::Center);
    canvas.reset_colors();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_config::{DrawItem, BLACK};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 18, 15, 4, 0).unwrap()
    }

    fn branding() -> BrandingInfo {
        BrandingInfo {
            company_name: "Acme Co".into(),
            email: "hi@acme.test".into(),
            phone: "555-0100".into(),
            address: "1 Main St".into(),
        }
    }

    #[test]
    fn letterhead_order_and_offsets() {
        let mut canvas = Canvas::new("t", 595.28, 841.89, 40.0).unwrap();
        render_letterhead(&mut canvas, &branding(), "Sales Report", &fixed_now()).unwrap();
        assert_eq!(canvas.cursor_y(), TABLE_START_Y);
        let layout = canvas.finish();

        let texts: Vec<_> = layout.pages[0].texts().collect();
        assert_eq!(
            texts,
            vec![
                "Acme Co",
                "1 Main St",
                "Email: hi@acme.test | Mobile: 555-0100",
                "Sales Report",
                "GENERATED ON OCTOBER 18, 2026 AT 3:04 PM",
            ]
        );

        let ys: Vec<f32> = layout.pages[0]
            .items
            .iter()
            .map(|item| match item {
                DrawItem::Text(run) => run.y,
                DrawItem::Line { y1, .. } => *y1,
                DrawItem::Rect { y, .. } => *y,
            })
            .collect();
        assert_eq!(
            ys,
            vec![COMPANY_Y, ADDRESS_Y, CONTACT_Y, DIVIDER_Y, TITLE_Y, GENERATED_Y]
        );
        assert!(ys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn title_is_bold_black_and_caption_muted() {
        let mut canvas = Canvas::new("t", 595.28, 841.89, 40.0).unwrap();
        render_letterhead(&mut canvas, &branding(), "Sales Report", &fixed_now()).unwrap();
        let layout = canvas.finish();
        let runs: Vec<_> = layout.pages[0]
            .items
            .iter()
            .filter_map(|i| match i {
                DrawItem::Text(r) => Some(r),
                _ => None,
            })
            .collect();
        assert!(runs[0].bold && runs[0].font_size > runs[3].font_size);
        assert!(runs[3].bold);
        assert_eq!(runs[3].color, BLACK);
        assert_eq!(runs[4].color, MUTED);
    }

    #[test]
    fn short_page_overflows() {
        let mut canvas = Canvas::new("t", 595.28, 160.0, 20.0).unwrap();
        let err = render_letterhead(&mut canvas, &branding(), "T", &fixed_now()).unwrap_err();
        assert!(matches!(err, LayoutError::LetterheadOverflow { .. }));
    }

    #[test]
    fn footer_is_only_page_number() {
        let mut canvas = Canvas::new("t", 595.28, 841.89, 40.0).unwrap();
        render_footer(&mut canvas, 3);
        let layout = canvas.finish();
        assert_eq!(layout.pages[0].texts().collect::<Vec<_>>(), vec!["Page 3"]);
        let DrawItem::Text(run) = &layout.pages[0].items[0] else {
            panic!("expected text");
        };
        assert!((run.y - (841.89 - FOOTER_OFFSET)).abs() < 0.01);
    }
}
