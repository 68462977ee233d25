//! Display width of a single grapheme cluster (EGC).
//!
//! All status-column math flows through `egc_width`. The baseline comes from
//! `unicode_width`; pictographic clusters the crate under-measures (ZWJ
//! sequences, flags, keycaps) are widened to 2 so the reported visual column
//! never lags what a terminal draws.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ZWJ: char = '\u{200D}';
const KEYCAP_COMBINING: char = '\u{20E3}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

// Rough Extended Pictographic ranges (emoji blocks + misc symbols/dingbats).
fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

/// Terminal cell width of one grapheme cluster.
pub fn egc_width(egc: &str) -> u16 {
    let mut chars = egc.chars();
    let Some(first) = chars.next() else {
        return 0;
    };
    if chars.next().is_none() {
        return first.width().unwrap_or(0) as u16;
    }
    let base = egc.width() as u16;
    let widen = egc.chars().any(|c| {
        c == ZWJ || c == KEYCAP_COMBINING || is_regional_indicator(c) || is_extended_pictographic(c)
    });
    if widen { 2 } else { base.max(1) }
}

/// Total width of a run of text, summed per grapheme cluster.
pub fn str_width(s: &str) -> usize {
    use unicode_segmentation::UnicodeSegmentation;
    s.graphemes(true).map(|g| egc_width(g) as usize).sum()
}
