pub mod console;
pub mod spinner;

use crate::core::{FormatRecord, MediaKind};
use crate::utils::format_filesize;
use std::io::Write;
use tracing::warn;
use unicode_width::UnicodeWidthChar;

pub use spinner::LoadingIndicator;

pub const MIN_BOX_WIDTH: usize = 60;
pub const MAX_BOX_WIDTH: usize = 80;
const ELLIPSIS: &str = "...";
const RULE_WIDTH: usize = 60;

/// Terminal columns occupied by `text`: wide glyphs count two, combining
/// marks and control characters zero.
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Fit `text` into `max_width` columns, replacing the tail with "..." when it
/// does not fit. The result never exceeds `max_width`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width < ELLIPSIS.len() {
        return ".".repeat(max_width);
    }

    let budget = max_width - ELLIPSIS.len();
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = char_width(c);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ELLIPSIS);
    out
}

fn pad_to_width(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

fn center_to_width(text: &str, width: usize) -> String {
    let text = truncate_to_width(text, width);
    let fill = width - display_width(&text);
    let left = fill / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
}

// newlines or tabs inside a title would break the right border
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Render label/value rows as a bordered box.
///
/// The box is `clamp(widest label + 60, 60, 80)` columns wide between the
/// borders; every returned line has exactly that width plus two.
pub fn render_info_box(rows: &[(String, String)], title: &str) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }

    let max_label = rows
        .iter()
        .map(|(label, _)| display_width(&sanitize(label)))
        .max()
        .unwrap_or(0);
    let box_width = (max_label + 60).clamp(MIN_BOX_WIDTH, MAX_BOX_WIDTH);
    let label_width = max_label.min(box_width / 2);
    // "│ " + label + " : " + value, leaving one column before the border
    let value_width = box_width - label_width - 5;

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(format!("┌{}┐", "─".repeat(box_width)));
    lines.push(format!("│{}│", center_to_width(&sanitize(title), box_width)));
    lines.push(format!("├{}┤", "─".repeat(box_width)));

    for (label, value) in rows {
        let label = truncate_to_width(&sanitize(label), label_width);
        let value = truncate_to_width(&sanitize(value), value_width);
        let body = format!(" {} : {}", pad_to_width(&label, label_width), value);
        lines.push(format!("│{}│", pad_to_width(&body, box_width)));
    }

    lines.push(format!("└{}┘", "─".repeat(box_width)));
    lines
}

/// Numbered, one-line-per-format menu.
pub fn render_format_menu(formats: &[FormatRecord], kind: MediaKind) -> Vec<String> {
    let header = match kind {
        MediaKind::Video => "Available formats:",
        MediaKind::Audio => "Available audio formats:",
    };
    let rule = "—".repeat(RULE_WIDTH);

    let mut lines = vec![header.to_string(), rule.clone()];
    for (idx, fmt) in formats.iter().enumerate() {
        let size = format_filesize(fmt.filesize);
        let ext = fmt.ext.to_uppercase();
        let line = match kind {
            MediaKind::Video => format!(
                "{}. {} [{}] - {} - {}",
                idx + 1,
                fmt.resolution,
                ext,
                size,
                fmt.codec
            ),
            MediaKind::Audio => {
                let sample_rate = if fmt.asr > 0 {
                    format!("{}Hz", fmt.asr)
                } else {
                    String::new()
                };
                format!(
                    "{}. {} {} [{}] - {} - {}",
                    idx + 1,
                    fmt.bitrate_label(),
                    sample_rate,
                    ext,
                    size,
                    fmt.codec
                )
            }
        };
        lines.push(line);
    }
    lines.push(rule);
    lines
}

/// Write rendered lines; display problems are logged, never propagated.
pub fn print_lines<W: Write>(out: &mut W, lines: &[String]) {
    for line in lines {
        if let Err(e) = writeln!(out, "{}", line) {
            warn!("Failed to write to terminal: {}", e);
            return;
        }
    }
    let _ = out.flush();
}
