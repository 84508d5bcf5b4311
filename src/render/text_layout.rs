//! Greedy word wrapping with bottom-anchored line stacking.
//!
//! A wrapped block is split on single spaces and packed line by line: words are added to
//! the current line while the measured line still fits `max_width`. A word that does not
//! fit starts a new line, unless the current line is still empty, in which case the word
//! stays alone on its line even if it overflows. Words are never split.
//!
//! Lines are stacked so that the **last** line sits on the block's anchor `y` and earlier
//! lines rise above it. Card layouts are authored against this convention.

use crate::card::TextBlockSpec;
use crate::errors::RenderError;
use crate::render::backend::TextMetrics;

/// One line of a laid out block, positioned at its baseline origin.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    pub text: String,
    pub baseline_x: f32,
    pub baseline_y: f32,
    /// Measured width of `text`
    pub width: f32,
}

/// Result of laying out a single [`TextBlockSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<LayoutLine>,
    /// Font-box ascent plus descent
    pub line_height: f32,
    pub wrapped: bool,
}

impl TextLayout {
    /// Vertical space the block occupies, for callers stacking several blocks.
    pub fn block_height(&self) -> f32 {
        if self.wrapped {
            self.line_height * self.lines.len() as f32
        } else {
            self.line_height
        }
    }
}

/// Lays out `spec` using `measure` for all text metrics.
///
/// The result depends only on `spec` and the metrics `measure` reports. Any measurement
/// failure aborts the layout of this block.
pub fn layout<M>(spec: &TextBlockSpec, mut measure: M) -> Result<TextLayout, RenderError>
where
    M: FnMut(&str) -> Result<TextMetrics, RenderError>,
{
    let metrics = measure(&spec.text)?;
    let line_height = metrics.line_height();

    if !spec.wrap {
        return Ok(TextLayout {
            lines: vec![LayoutLine {
                text: spec.text.clone(),
                baseline_x: spec.x,
                baseline_y: spec.y,
                width: metrics.width,
            }],
            line_height,
            wrapped: false,
        });
    }

    let mut broken: Vec<(String, f32)> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;
    let mut has_word = false;

    for word in spec.text.split(' ') {
        let candidate = if has_word {
            format!("{current} {word}")
        } else {
            word.to_string()
        };
        let width = measure(&candidate)?.width;

        if width > spec.max_width && has_word {
            let finished = std::mem::replace(&mut current, word.to_string());
            broken.push((finished, current_width));
            current_width = measure(word)?.width;
        } else {
            current = candidate;
            current_width = width;
        }
        has_word = true;
    }
    broken.push((current, current_width));

    let last = broken.len() - 1;
    let lines = broken
        .into_iter()
        .enumerate()
        .map(|(i, (text, width))| LayoutLine {
            text,
            baseline_x: spec.x,
            baseline_y: spec.y - line_height * (last - i) as f32,
            width,
        })
        .collect();

    Ok(TextLayout {
        lines,
        line_height,
        wrapped: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::FontSpec;

    const ADVANCE: f32 = 10.0;

    fn fixed(text: &str) -> Result<TextMetrics, RenderError> {
        Ok(TextMetrics {
            width: text.chars().count() as f32 * ADVANCE,
            ascent: 8.0,
            descent: 2.0,
        })
    }

    fn spec(text: &str, max_width: f32, wrap: bool) -> TextBlockSpec {
        let mut s = TextBlockSpec::new(text, 10.0, 250.0, max_width, FontSpec::new("Test", 10.0));
        s.wrap = wrap;
        s
    }

    fn texts(l: &TextLayout) -> Vec<&str> {
        l.lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn unwrapped_is_single_line_at_anchor() {
        let l = layout(&spec("sample text", 30.0, false), fixed).unwrap();
        assert_eq!(texts(&l), vec!["sample text"]);
        assert_eq!(l.lines[0].baseline_x, 10.0);
        assert_eq!(l.lines[0].baseline_y, 250.0);
        assert_eq!(l.line_height, 10.0);
        assert_eq!(l.block_height(), 10.0);
    }

    #[test]
    fn two_words_per_line() {
        // "the quick" and "brown fox" are 90 wide; three words never fit in 100.
        let l = layout(&spec("the quick brown fox", 100.0, true), fixed).unwrap();
        assert_eq!(texts(&l), vec!["the quick", "brown fox"]);
        assert!(l.lines.iter().all(|line| line.width <= 100.0));
        assert_eq!(l.lines[1].baseline_y, 250.0);
        assert_eq!(l.lines[0].baseline_y, 250.0 - l.line_height);
        assert_eq!(l.block_height(), 20.0);
    }

    #[test]
    fn long_word_is_kept_whole() {
        let l = layout(&spec("supercalifragilistic", 50.0, true), fixed).unwrap();
        assert_eq!(texts(&l), vec!["supercalifragilistic"]);
        assert_eq!(l.lines[0].baseline_y, 250.0);
    }

    #[test]
    fn long_word_in_the_middle_gets_its_own_line() {
        let l = layout(&spec("a supercalifragilistic b", 50.0, true), fixed).unwrap();
        assert_eq!(texts(&l), vec!["a", "supercalifragilistic", "b"]);
        assert_eq!(l.lines[0].baseline_y, 230.0);
        assert_eq!(l.lines[1].baseline_y, 240.0);
        assert_eq!(l.lines[2].baseline_y, 250.0);
    }

    #[test]
    fn exact_fit_stays_on_line() {
        let l = layout(&spec("ab cd", 50.0, true), fixed).unwrap();
        assert_eq!(texts(&l), vec!["ab cd"]);
    }

    #[test]
    fn lines_never_exceed_width_unless_single_word() {
        let text = "Flip a coin. If heads, your opponent's Active Pokemon is now Paralyzed and cannot retreat";
        for max in [40.0, 75.0, 120.0, 300.0] {
            let l = layout(&spec(text, max, true), fixed).unwrap();
            for line in &l.lines {
                assert!(
                    line.width <= max || !line.text.contains(' '),
                    "line {:?} is {} wide for max {max}",
                    line.text,
                    line.width
                );
            }
            let rejoined = texts(&l).join(" ");
            assert_eq!(rejoined, text);
        }
    }

    #[test]
    fn deterministic() {
        let s = spec("the quick brown fox jumps over the lazy dog", 95.0, true);
        assert_eq!(layout(&s, fixed).unwrap(), layout(&s, fixed).unwrap());
    }

    #[test]
    fn measurement_failure_propagates() {
        let failing = |_: &str| -> Result<TextMetrics, RenderError> {
            Err(RenderError::MeasurementUnavailable {
                font: "Test".to_string(),
                reason: "not registered".to_string(),
            })
        };
        assert!(matches!(
            layout(&spec("hello", 100.0, true), failing),
            Err(RenderError::MeasurementUnavailable { .. })
        ));
    }
}
