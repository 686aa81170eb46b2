// Flat status badge
//
// Two-segment SVG in the shields.io "flat" style: grey subject on the
// left, coloured status on the right. Widths come from a per-glyph table
// for 11px DejaVu/Verdana-style sans, plus fixed padding.

use crate::render::escape;

pub const SUBJECT: &str = "slack";
pub const COLOR: &str = "#E01563";
pub const CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";

/// Horizontal padding added to each segment's measured text.
const PADDING: f64 = 13.0;

fn glyph_width(c: char) -> f64 {
    match c {
        'i' | 'j' | 'l' | '\'' | '|' | '.' | ',' | ':' | ';' => 3.1,
        'f' | 't' | 'r' | ' ' | '/' | '(' | ')' => 4.5,
        'm' | 'w' => 9.5,
        'M' | 'W' => 10.5,
        c if c.is_ascii_lowercase() => 6.5,
        c if c.is_ascii_uppercase() => 7.6,
        _ => 7.0,
    }
}

fn text_width(text: &str) -> f64 {
    text.chars().map(glyph_width).sum::<f64>() + PADDING
}

/// Render a badge with the given subject, status and status colour.
pub fn render(subject: &str, status: &str, color: &str) -> String {
    let subject_dx = text_width(subject);
    let status_dx = text_width(status);
    let width = subject_dx + status_dx;
    let subject_x = subject_dx / 2.0 + 1.0;
    let status_x = subject_dx + status_dx / 2.0 - 1.0;

    let subject = escape(subject);
    let status = escape(status);
    let color = escape(color);

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="20">
  <linearGradient id="smooth" x2="0" y2="100%">
    <stop offset="0" stop-color="#bbb" stop-opacity=".1"/>
    <stop offset="1" stop-opacity=".1"/>
  </linearGradient>
  <mask id="round">
    <rect width="{width:.0}" height="20" rx="3" fill="#fff"/>
  </mask>
  <g mask="url(#round)">
    <rect width="{subject_dx:.0}" height="20" fill="#555"/>
    <rect x="{subject_dx:.0}" width="{status_dx:.0}" height="20" fill="{color}"/>
    <rect width="{width:.0}" height="20" fill="url(#smooth)"/>
  </g>
  <g fill="#fff" text-anchor="middle" font-family="DejaVu Sans,Verdana,Geneva,sans-serif" font-size="11">
    <text x="{subject_x:.1}" y="15" fill="#010101" fill-opacity=".3">{subject}</text>
    <text x="{subject_x:.1}" y="14">{subject}</text>
    <text x="{status_x:.1}" y="15" fill="#010101" fill-opacity=".3">{status}</text>
    <text x="{status_x:.1}" y="14">{status}</text>
  </g>
</svg>
"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_subject_status_and_color() {
        let svg = render(SUBJECT, "7/42", COLOR);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">slack</text>"));
        assert!(svg.contains(">7/42</text>"));
        assert!(svg.contains(r##"fill="#E01563""##));
    }

    #[test]
    fn wider_status_makes_wider_badge() {
        let narrow = text_width("1");
        let wide = text_width("1234/56789");
        assert!(wide > narrow);
        assert!(narrow > PADDING);
    }

    #[test]
    fn status_is_escaped() {
        assert!(render("a", "<b>", COLOR).contains("&lt;b&gt;"));
    }
}
