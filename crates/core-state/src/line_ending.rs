//! Line ending detection and normalization.
//!
//! Buffers only ever hold `\n`. Content arriving from disk is normalized on the
//! way in and re-expanded to its dominant original style on the way out.

/// Line ending style detected from source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Result of normalizing line endings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub normalized: String,   // LF-only content
    pub original: LineEnding, // majority style
    pub mixed: bool,          // more than one style encountered
}

/// Detect and normalize line endings of `input` to LF only.
/// The majority style wins; ties resolve CRLF > LF > CR.
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let bytes = input.as_bytes();
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                crlf += 1;
                i += 2;
                continue;
            }
            b'\r' => cr += 1,
            b'\n' => lf += 1,
            _ => {}
        }
        i += 1;
    }

    let mut original = LineEnding::Lf;
    let mut max = 0usize;
    for (style, count) in [
        (LineEnding::Crlf, crlf),
        (LineEnding::Lf, lf),
        (LineEnding::Cr, cr),
    ] {
        if count > max {
            max = count;
            original = style;
        }
    }
    let mixed = [crlf, lf, cr].iter().filter(|c| **c > 0).count() > 1;

    let normalized = if crlf == 0 && cr == 0 {
        input.to_string()
    } else {
        input.replace("\r\n", "\n").replace('\r', "\n")
    };
    NormalizedText {
        normalized,
        original,
        mixed,
    }
}

/// Re-expand LF-only `content` to `ending`.
pub fn restore_line_endings(content: &str, ending: LineEnding) -> String {
    match ending {
        LineEnding::Lf => content.to_string(),
        other => content.replace('\n', other.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lf_only_is_untouched() {
        let n = normalize_line_endings("a\nb\n");
        assert_eq!(n.normalized, "a\nb\n");
        assert_eq!(n.original, LineEnding::Lf);
        assert!(!n.mixed);
    }

    #[test]
    fn crlf_majority_detected_and_flagged_mixed() {
        let n = normalize_line_endings("line1\r\nline2\nline3\r\n");
        assert_eq!(n.normalized, "line1\nline2\nline3\n");
        assert_eq!(n.original, LineEnding::Crlf);
        assert!(n.mixed);
    }

    #[test]
    fn lone_cr_becomes_lf() {
        let n = normalize_line_endings("a\rb\rc");
        assert_eq!(n.normalized, "a\nb\nc");
        assert_eq!(n.original, LineEnding::Cr);
    }

    #[test]
    fn tie_prefers_crlf() {
        let n = normalize_line_endings("a\r\nb\nc");
        assert_eq!(n.original, LineEnding::Crlf);
    }

    #[test]
    fn restore_round_trips_uniform_input() {
        let src = "x\r\ny\r\n";
        let n = normalize_line_endings(src);
        assert_eq!(restore_line_endings(&n.normalized, n.original), src);
    }

    #[test]
    fn multibyte_text_survives() {
        let n = normalize_line_endings("é\r\n😀");
        assert_eq!(n.normalized, "é\n😀");
    }
}
