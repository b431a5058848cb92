//! Text measurement for the built-in Helvetica faces.
//!
//! Reports are drawn with the PDF base-14 fonts, so no font program is
//! embedded. Widths use an average-advance heuristic which is close enough for
//! centering and cell wrapping.

/// Ascender of Helvetica as a fraction of the font size.
pub const ASCENDER: f32 = 0.75;

/// Line height factor applied to the font size for wrapped text.
pub const LINE_HEIGHT: f32 = 1.2;

/// Measure the width of a string at a given font size (in pt).
///
/// Average char width ≈ 0.5 × font_size for proportional fonts; bold is
/// ~10 % wider.
pub fn measure_text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    let avg = if bold { 0.55 } else { 0.5 };
    text.chars().count() as f32 * font_size * avg
}

/// Line height in pt for the given font size.
pub fn line_height(font_size: f32) -> f32 {
    font_size * LINE_HEIGHT
}

/// Word-wrap text to fit within `max_width` points. Returns a vec of lines.
///
/// Words wider than `max_width` on their own are broken between characters.
pub fn wrap_text(text: &str, font_size: f32, bold: bool, max_width: f32) -> Vec<String> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in words {
            for piece in split_long_word(word, font_size, bold, max_width) {
                let candidate = if current_line.is_empty() {
                    piece.clone()
                } else {
                    format!("{current_line} {piece}")
                };
                if measure_text_width(&candidate, font_size, bold) > max_width
                    && !current_line.is_empty()
                {
                    lines.push(std::mem::replace(&mut current_line, piece));
                } else {
                    current_line = candidate;
                }
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn split_long_word(word: &str, font_size: f32, bold: bool, max_width: f32) -> Vec<String> {
    if measure_text_width(word, font_size, bold) <= max_width {
        return vec![word.to_string()];
    }
    let per_line = ((max_width / measure_text_width("m", font_size, bold)) as usize).max(1);
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(per_line)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
