//! Utility functions for the preview: colors, contrast, locale mapping, value formatting.

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange,
/// Dark Gray, Brownish Gold.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Get a color from the Office palette.
#[inline]
pub fn office_color(idx: usize) -> RGBColor {
    OFFICE10[idx % OFFICE10.len()]
}

/// Parse `#RRGGBB` / `RRGGBB` / `#RGB`. Anything else yields `None`.
pub fn parse_hex_color(s: &str) -> Option<RGBColor> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            Some(RGBColor((v >> 16) as u8, (v >> 8) as u8, v as u8))
        }
        3 => {
            let mut it = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(RGBColor(it.next()??, it.next()??, it.next()??))
        }
        _ => None,
    }
}

/// Fill for a circle: the item's own color when it parses, else the palette by rank.
pub fn fill_color(color: Option<&str>, order: usize) -> RGBColor {
    color.and_then(parse_hex_color).unwrap_or_else(|| office_color(order))
}

/// Black or white, whichever reads better on `bg` (relative luminance threshold).
pub fn label_color(bg: RGBColor) -> RGBColor {
    let RGBColor(r, g, b) = bg;
    let lum = 0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64;
    if lum > 150.0 { BLACK } else { WHITE }
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Format a value with locale grouping: whole numbers without decimals,
/// others with up to two decimals (trailing zeros trimmed).
pub fn format_value(value: f64, locale_tag: &str) -> String {
    let (locale, dec_sep) = map_locale(locale_tag);
    let rounded = (value * 100.0).round() / 100.0;
    let whole = rounded.trunc();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let int_part = (whole.abs() as u64).to_formatted_string(locale);
    let frac = ((rounded - whole).abs() * 100.0).round() as u64;
    if frac == 0 {
        format!("{sign}{int_part}")
    } else {
        let digits = format!("{frac:02}");
        format!("{sign}{int_part}{dec_sep}{}", digits.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#4472C4"), Some(RGBColor(68, 114, 196)));
        assert_eq!(parse_hex_color("fff"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_hex_color("steelblue"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn falls_back_to_palette() {
        assert_eq!(fill_color(None, 1), RGBColor(237, 125, 49));
        assert_eq!(fill_color(Some("nope"), 10), RGBColor(68, 114, 196));
    }

    #[test]
    fn formats_values_per_locale() {
        assert_eq!(format_value(1234567.0, "en"), "1,234,567");
        assert_eq!(format_value(1234567.0, "de"), "1.234.567");
        assert_eq!(format_value(1234.5, "en"), "1,234.5");
        assert_eq!(format_value(0.25, "fr"), "0,25");
    }
}
