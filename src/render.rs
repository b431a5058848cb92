//! PDF renderer – takes a [`DocumentLayout`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API) with the built-in Helvetica faces.

use printpdf::*;

use crate::layout_config::{DocumentLayout, DrawItem, Rgb as LayoutRgb};

const PT_TO_MM: f32 = 0.352778;

/// Render a DocumentLayout into PDF bytes.
///
/// Always yields a document; a layout without pages becomes a single blank
/// page.
pub fn render_pdf(layout: &DocumentLayout) -> Vec<u8> {
    let page_w = Mm(layout.page_width_pt * PT_TO_MM);
    let page_h = Mm(layout.page_height_pt * PT_TO_MM);

    let mut doc = PdfDocument::new(&layout.title);

    let mut pages: Vec<PdfPage> = layout
        .pages
        .iter()
        .map(|page| {
            let mut ops = Vec::new();
            for item in &page.items {
                render_item(&mut ops, item, layout.page_height_pt);
            }
            PdfPage::new(page_w, page_h, ops)
        })
        .collect();

    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    doc.save(&PdfSaveOptions::default(), &mut Vec::new())
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{201A}' => 0x82, // single low-9 quote
            '\u{201E}' => 0x84, // double low-9 quote
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{2122}' => 0x99, // trademark
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for 0x80-0x9F range; printpdf passes
    // these bytes straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

fn rgb(c: &LayoutRgb) -> Color {
    Color::Rgb(Rgb {
        r: c[0],
        g: c[1],
        b: c[2],
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

/// Corners of a rectangle in PDF space, counter-clockwise from bottom-left.
fn rect_points(x: f32, y: f32, width: f32, height: f32, page_height: f32) -> Vec<LinePoint> {
    // PDF origin is bottom-left; layout origin is top-left.
    let top = page_height - y;
    let bottom = top - height;
    vec![
        point(x, bottom),
        point(x + width, bottom),
        point(x + width, top),
        point(x, top),
    ]
}

fn render_item(ops: &mut Vec<Op>, item: &DrawItem, page_height: f32) {
    match item {
        DrawItem::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        } => {
            if let Some(fill) = fill {
                ops.push(Op::SetFillColor { col: rgb(fill) });
                ops.push(Op::DrawPolygon {
                    polygon: Polygon {
                        rings: vec![PolygonRing {
                            points: rect_points(*x, *y, *width, *height, page_height),
                        }],
                        mode: PaintMode::Fill,
                        winding_order: WindingOrder::NonZero,
                    },
                });
            }
            if let Some(stroke) = stroke {
                ops.push(Op::SetOutlineColor {
                    col: rgb(&stroke.color),
                });
                ops.push(Op::SetOutlineThickness {
                    pt: Pt(stroke.width),
                });
                ops.push(Op::DrawLine {
                    line: Line {
                        points: rect_points(*x, *y, *width, *height, page_height),
                        is_closed: true,
                    },
                });
            }
        }
        DrawItem::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
        } => {
            ops.push(Op::SetOutlineColor {
                col: rgb(&stroke.color),
            });
            ops.push(Op::SetOutlineThickness {
                pt: Pt(stroke.width),
            });
            ops.push(Op::DrawLine {
                line: Line {
                    points: vec![
                        point(*x1, page_height - y1),
                        point(*x2, page_height - y2),
                    ],
                    is_closed: false,
                },
            });
        }
        DrawItem::Text(run) => {
            if run.text.is_empty() {
                return;
            }
            let font = if run.bold {
                BuiltinFont::HelveticaBold
            } else {
                BuiltinFont::Helvetica
            };
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(run.x),
                    y: Pt(page_height - run.y),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(run.font_size),
                font,
            });
            ops.push(Op::SetFillColor {
                col: rgb(&run.color),
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(to_winlatin(&run.text))],
                font,
            });
            ops.push(Op::EndTextSection);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_config::{PageLayout, Stroke, TextRun, BLACK, WHITE};

    fn empty_layout() -> DocumentLayout {
        DocumentLayout {
            title: "empty".into(),
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            pages: Vec::new(),
        }
    }

    #[test]
    fn render_empty_layout() {
        let bytes = render_pdf(&empty_layout());
        assert!(bytes.len() > 100, "PDF should have content");
        // PDF magic number
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn render_all_item_kinds() {
        let mut page = PageLayout::new(0);
        page.items.push(DrawItem::Rect {
            x: 40.0,
            y: 150.0,
            width: 200.0,
            height: 20.0,
            fill: Some([0.17, 0.24, 0.31]),
            stroke: Some(Stroke {
                width: 0.5,
                color: BLACK,
            }),
        });
        page.items.push(DrawItem::Line {
            x1: 40.0,
            y1: 92.0,
            x2: 555.0,
            y2: 92.0,
            stroke: Stroke {
                width: 0.75,
                color: [0.8, 0.8, 0.8],
            },
        });
        page.items.push(DrawItem::Text(TextRun {
            text: "Caf\u{e9} \u{2013} \u{20AC}5".into(),
            x: 44.0,
            y: 164.0,
            font_size: 9.0,
            bold: false,
            color: WHITE,
        }));
        let layout = DocumentLayout {
            pages: vec![page],
            ..empty_layout()
        };
        let bytes = render_pdf(&layout);
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn winlatin_maps_typographic_chars() {
        assert_eq!(to_winlatin("\u{2013}").as_bytes(), &[0x96]);
        assert_eq!(to_winlatin("\u{e9}").as_bytes(), &[0xE9]);
        assert_eq!(to_winlatin("\u{4e2d}").as_bytes(), b"?");
    }
}
