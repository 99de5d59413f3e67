//! Text measurement, truncation, wrapping, and shrink-to-fit label layout.
//!
//! Layout code never talks to a font engine directly; it asks a [`TextMeasurer`].
//! [`HeuristicMeasurer`] is the headless default (Plotters has no built-in text
//! measuring without embedded fonts).

/// Font request: family name and pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f64,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size_px: f64) -> Self {
        Self {
            family: family.into(),
            size_px,
        }
    }

    pub fn with_size(&self, size_px: f64) -> Self {
        Self {
            family: self.family.clone(),
            size_px,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

/// Capability to measure a single line of text.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> TextExtent;
}

/// Estimates extents from the character count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicMeasurer {
    /// Average glyph advance, in em.
    pub char_width_em: f64,
    /// Line height, in em.
    pub line_height_em: f64,
}

impl Default for HeuristicMeasurer {
    fn default() -> Self {
        Self {
            char_width_em: 0.60,
            line_height_em: 1.2,
        }
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> TextExtent {
        TextExtent {
            width: (text.chars().count() as f64 * font.size_px * self.char_width_em).ceil(),
            height: (font.size_px * self.line_height_em).ceil(),
        }
    }
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(m: &dyn TextMeasurer, text: &str, font: &FontSpec, max_px: f64) -> String {
    let fits = |s: &str| m.measure(s, font).width <= max_px;
    let mut out = String::new();
    for ch in text.chars() {
        let next = format!("{out}{ch}");
        if !fits(&next) {
            if !out.is_empty() {
                if fits(&format!("{out}…")) {
                    out.push('…');
                } else if out.chars().count() > 1 {
                    out.pop();
                    out.push('…');
                }
            }
            return out;
        }
        out = next;
    }
    out
}

/// Wrap text to fit within a maximum pixel width, breaking on word boundaries where possible.
pub fn wrap_text_to_width(
    m: &dyn TextMeasurer,
    text: &str,
    font: &FontSpec,
    max_px: f64,
) -> Vec<String> {
    let fits = |s: &str| m.measure(s, font).width <= max_px;
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let candidate = if cur.is_empty() {
            word.to_string()
        } else {
            format!("{cur} {word}")
        };
        if fits(&candidate) {
            cur = candidate;
            continue;
        }
        if !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
            if fits(word) {
                cur = word.to_string();
                continue;
            }
        }
        // Single long word: hard-break by characters
        let mut buf = String::new();
        for ch in word.chars() {
            let cand = format!("{buf}{ch}");
            if fits(&cand) {
                buf = cand;
            } else if buf.is_empty() {
                // Not even one glyph fits.
                break;
            } else {
                lines.push(std::mem::replace(&mut buf, ch.to_string()));
            }
        }
        cur = buf;
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

/// A label that fits its box: chosen font size and wrapped lines.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedLabel {
    pub font_px: f64,
    pub line_height: f64,
    pub lines: Vec<String>,
}

/// Shrink the font from `max_px` down to `min_px` (1px steps) until `text`,
/// wrapped to `box_w`, also fits `box_h`. `None` when even `min_px` is too big.
pub fn fit_label(
    m: &dyn TextMeasurer,
    text: &str,
    font: &FontSpec,
    box_w: f64,
    box_h: f64,
    max_px: f64,
    min_px: f64,
) -> Option<FittedLabel> {
    if text.trim().is_empty() || box_w <= 0.0 || box_h <= 0.0 {
        return None;
    }
    let word_count = text.split_whitespace().count();
    let mut size = max_px;
    while size >= min_px {
        let f = font.with_size(size);
        let lines = wrap_text_to_width(m, text, &f, box_w);
        let line_height = m.measure("M", &f).height;
        let rebuilt: usize = lines.iter().map(|l| l.split_whitespace().count()).sum();
        // Reject layouts that split a word or lost glyphs.
        let complete = rebuilt == word_count
            && lines.concat().chars().count()
                == text.split_whitespace().map(|w| w.chars().count()).sum::<usize>();
        if complete && line_height * lines.len() as f64 <= box_h {
            return Some(FittedLabel {
                font_px: size,
                line_height,
                lines,
            });
        }
        size -= 1.0;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(px: f64) -> FontSpec {
        FontSpec::new("sans-serif", px)
    }

    #[test]
    fn heuristic_width_scales_with_length_and_size() {
        let m = HeuristicMeasurer::default();
        assert_eq!(m.measure("abcde", &font(10.0)).width, 30.0);
        assert_eq!(m.measure("abcde", &font(20.0)).width, 60.0);
        assert_eq!(m.measure("", &font(20.0)).width, 0.0);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let m = HeuristicMeasurer::default();
        // 10px font -> 6px per char; 60px fits 10 chars.
        let lines = wrap_text_to_width(&m, "alpha beta gamma", &font(10.0), 60.0);
        assert_eq!(lines, vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn hard_breaks_long_words() {
        let m = HeuristicMeasurer::default();
        let lines = wrap_text_to_width(&m, "abcdefghij", &font(10.0), 24.0);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn truncates_with_ellipsis() {
        let m = HeuristicMeasurer::default();
        let s = truncate_to_width(&m, "abcdefghij", &font(10.0), 30.0);
        assert_eq!(s, "abcd…");
    }

    #[test]
    fn fit_label_shrinks_until_it_fits() {
        let m = HeuristicMeasurer::default();
        let got = fit_label(&m, "Population", &font(14.0), 60.0, 40.0, 14.0, 6.0).unwrap();
        // 10 chars * 0.6 * px <= 60 -> px <= 10
        assert_eq!(got.font_px, 10.0);
        assert_eq!(got.lines, vec!["Population"]);
        assert!(fit_label(&m, "Population", &font(14.0), 10.0, 5.0, 14.0, 6.0).is_none());
    }
}
