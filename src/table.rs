//! Table compositor – lays out a header row and body rows below a start
//! offset, breaking onto new pages when the bottom margin is reached.
//!
//! Handles:
//! - Equal column widths between the mirrored page margins
//! - Cell text wrapping (row height = tallest cell)
//! - Header row repeated at the top of every continuation page
//! - A [`PageBoundary`] hook invoked once per page the table touches

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::canvas::{Align, Canvas};
use crate::error::LayoutError;
use crate::fonts::{line_height, measure_text_width, wrap_text, ASCENDER};
use crate::layout_config::{Rgb, BLACK, WHITE};
use crate::letterhead::render_footer;

/// A single table cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

/// Visual treatment of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub font_size: f32,
    pub header_font_size: f32,
    /// Padding inside every cell, all four sides.
    pub padding: f32,
    /// Header background; `None` leaves it unfilled.
    pub header_fill: Option<Rgb>,
    pub header_text: Rgb,
    pub header_align: Align,
    pub body_text: Rgb,
    /// Background for every other body row, starting with the second.
    pub stripe_fill: Option<Rgb>,
    pub grid_color: Rgb,
    pub grid_width: f32,
}

impl TableStyle {
    /// Dark header, light bold centered header text, striped body.
    pub fn branded() -> Self {
        Self {
            font_size: 9.0,
            header_font_size: 10.0,
            padding: 6.0,
            header_fill: Some([0.17, 0.24, 0.31]),
            header_text: WHITE,
            header_align: Align::Center,
            body_text: [0.2, 0.2, 0.2],
            stripe_fill: Some([0.96, 0.96, 0.96]),
            grid_color: [0.78, 0.78, 0.78],
            grid_width: 0.5,
        }
    }

    /// Unfilled grid with black text.
    pub fn plain() -> Self {
        Self {
            font_size: 9.0,
            header_font_size: 9.0,
            padding: 4.0,
            header_fill: None,
            header_text: BLACK,
            header_align: Align::Left,
            body_text: BLACK,
            stripe_fill: None,
            grid_color: BLACK,
            grid_width: 0.25,
        }
    }
}

/// Hook invoked once for every page the table draws on, after that page's
/// table content.
pub trait PageBoundary {
    fn on_page(&mut self, canvas: &mut Canvas, page_number: usize);
}

impl<F: FnMut(&mut Canvas, usize)> PageBoundary for F {
    fn on_page(&mut self, canvas: &mut Canvas, page_number: usize) {
        self(canvas, page_number)
    }
}

/// Draws the `Page N` footer on continuation pages only.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContinuationFooter;

impl PageBoundary for ContinuationFooter {
    fn on_page(&mut self, canvas: &mut Canvas, page_number: usize) {
        if page_number > 1 {
            render_footer(canvas, page_number);
        }
    }
}

/// Does nothing at page boundaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFooter;

impl PageBoundary for NoFooter {
    fn on_page(&mut self, _canvas: &mut Canvas, _page_number: usize) {}
}

/// A row with its cells already wrapped to the column width.
struct WrappedRow {
    cells: Vec<Vec<String>>,
    height: f32,
}

/// Lay out `columns` and `rows` starting at `start_y` on the current page.
///
/// Returns the number of pages the table occupies. Rows are drawn in the
/// order given; extra cells beyond the column count are ignored and missing
/// cells are left empty.
pub fn layout_table(
    canvas: &mut Canvas,
    columns: &[String],
    rows: &[Vec<Cell>],
    start_y: f32,
    style: &TableStyle,
    boundary: &mut dyn PageBoundary,
) -> Result<usize, LayoutError> {
    if columns.is_empty() {
        return Err(LayoutError::NoColumns);
    }

    let col_width = canvas.content_width() / columns.len() as f32;
    let text_width = (col_width - 2.0 * style.padding).max(1.0);

    let header = wrap_row(
        columns.iter().map(String::as_str),
        style.header_font_size,
        true,
        text_width,
        style.padding,
    );

    let first_page = canvas.page_number();
    canvas.set_cursor_y(start_y);
    // A page is fresh when the table owns it from the top margin down.
    let mut fresh = start_y <= canvas.margin();
    if !fresh && start_y + header.height > canvas.content_bottom() {
        boundary.on_page(canvas, first_page);
        canvas.add_page();
        fresh = true;
    }
    draw_header(canvas, &header, col_width, style);

    let mut rows_on_page = 0usize;
    for (index, row) in rows.iter().enumerate() {
        let texts: Vec<String> = (0..columns.len())
            .map(|c| row.get(c).map(Cell::to_string).unwrap_or_default())
            .collect();
        let wrapped = wrap_row(
            texts.iter().map(String::as_str),
            style.font_size,
            false,
            text_width,
            style.padding,
        );

        let overflows = canvas.cursor_y() + wrapped.height > canvas.content_bottom();
        if overflows && (rows_on_page > 0 || !fresh) {
            let finished = canvas.page_number();
            boundary.on_page(canvas, finished);
            canvas.add_page();
            draw_header(canvas, &header, col_width, style);
            rows_on_page = 0;
            fresh = true;
        }

        let fill = if index % 2 == 1 { style.stripe_fill } else { None };
        draw_row(canvas, &wrapped, col_width, style, fill, false);
        rows_on_page += 1;
    }

    let last = canvas.page_number();
    boundary.on_page(canvas, last);
    canvas.reset_colors();

    let pages = canvas.page_number() - first_page + 1;
    log::debug!("table: {} rows over {} page(s)", rows.len(), pages);
    Ok(pages)
}

fn wrap_row<'a>(
    texts: impl Iterator<Item = &'a str>,
    font_size: f32,
    bold: bool,
    max_width: f32,
    padding: f32,
) -> WrappedRow {
    let cells: Vec<Vec<String>> = texts
        .map(|t| wrap_text(t, font_size, bold, max_width))
        .collect();
    let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    WrappedRow {
        cells,
        height: max_lines as f32 * line_height(font_size) + 2.0 * padding,
    }
}

fn draw_header(canvas: &mut Canvas, header: &WrappedRow, col_width: f32, style: &TableStyle) {
    draw_row(canvas, header, col_width, style, style.header_fill, true);
}

fn draw_row(
    canvas: &mut Canvas,
    row: &WrappedRow,
    col_width: f32,
    style: &TableStyle,
    fill: Option<Rgb>,
    is_header: bool,
) {
    let top = canvas.cursor_y();
    let left = canvas.margin();
    let (font_size, color, align) = if is_header {
        (style.header_font_size, style.header_text, style.header_align)
    } else {
        (style.font_size, style.body_text, Align::Left)
    };
    let lh = line_height(font_size);

    if let Some(fill) = fill {
        canvas.set_fill_color(fill);
        canvas.fill_rect(left, top, col_width * row.cells.len() as f32, row.height);
    }

    canvas.set_stroke(style.grid_width, style.grid_color);
    canvas.set_text_color(color);
    for (c, lines) in row.cells.iter().enumerate() {
        let cell_x = left + c as f32 * col_width;
        canvas.stroke_rect(cell_x, top, col_width, row.height);

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let x = match align {
                Align::Left => cell_x + style.padding,
                Align::Center => {
                    cell_x + (col_width - measure_text_width(line, font_size, is_header)) / 2.0
                }
            };
            let baseline = top + style.padding + i as f32 * lh + font_size * ASCENDER;
            canvas.text(line, x, baseline, font_size, is_header, Align::Left);
        }
    }

    canvas.set_cursor_y(top + row.height);
}
