//! Line preparation for printing.
//!
//! Source lines are wrapped so that none is wider than the configured
//! [`WrapWidth`]. A split line ends with [`CARRIED_FORWARD`] and its
//! continuation starts with [`CONTINUATION`], so the reader can tell display
//! breaks from real newlines. Lines starting with a single space get a second
//! one, because the highlighted output otherwise loses that column.

use crate::error::{Error, Result};

/// Marks the end of a line that continues on the next printed line (U+21A9).
pub const CARRIED_FORWARD: char = '\u{21a9}';

/// Marks the start of a printed line continuing the previous one (U+21AA).
pub const CONTINUATION: char = '\u{21aa}';

/// Default maximum number of characters per printed line.
pub const DEFAULT_WRAP_WIDTH: usize = 99;

/// Smallest usable wrap width. Each split segment carries `width - 2`
/// characters of content next to its markers, so narrower widths never finish.
pub const MIN_WRAP_WIDTH: usize = 3;

/// Maximum characters per printed line, markers included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapWidth(usize);

impl WrapWidth {
    pub fn new(width: usize) -> Result<Self> {
        if width < MIN_WRAP_WIDTH {
            return Err(Error::InvalidWidth { width });
        }
        Ok(WrapWidth(width))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for WrapWidth {
    fn default() -> Self {
        WrapWidth(DEFAULT_WRAP_WIDTH)
    }
}

/// Double a single leading space. Lines already starting with two spaces are
/// left alone.
fn compensate_leading_space(line: &str) -> String {
    if line.starts_with(' ') && !line.starts_with("  ") {
        format!(" {}", line)
    } else {
        line.to_string()
    }
}

/// Wrap one source line (including its line terminator, if any).
///
/// The terminator counts towards the line length. Every split segment holds
/// `width - 1` characters followed by [`CARRIED_FORWARD`] and a newline; the
/// last segment keeps the original terminator.
pub fn wrap_line(line: &str, width: WrapWidth) -> Vec<String> {
    let width = width.get();
    let line = compensate_leading_space(line);

    let mut chars: Vec<char> = line.chars().collect();
    if chars.len() <= width {
        return vec![line];
    }

    let mut segments = Vec::new();
    let mut take = width - 1;
    loop {
        if chars.len() <= width - 1 {
            segments.push(chars.iter().collect());
            break;
        }

        let mut segment: String = chars[..take].iter().collect();
        segment.push(CARRIED_FORWARD);
        segment.push('\n');
        segments.push(segment);

        let left = chars.len().saturating_sub(take);
        if left == 0 {
            break;
        }
        let mut rest = Vec::with_capacity(left + 1);
        rest.push(CONTINUATION);
        rest.extend_from_slice(&chars[take..]);
        chars = rest;
        take = (left + 1).min(width - 1);
    }
    segments
}

/// Wrap every line in order and concatenate the results.
pub fn wrap_lines<I, S>(lines: I, width: WrapWidth) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .flat_map(|line| wrap_line(line.as_ref(), width))
        .collect()
}

/// Wrap a whole text, keeping line terminators.
pub fn wrap_text(text: &str, width: WrapWidth) -> String {
    wrap_lines(text.split_inclusive('\n'), width).concat()
}

/// Expand tabs to spaces, up to the next multiple of `tab_width` on each line.
///
/// A `tab_width` of zero leaves the text untouched.
pub fn expand_tabs(text: &str, tab_width: usize) -> String {
    if tab_width == 0 || !text.contains('\t') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = tab_width - column % tab_width;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Remove both continuation markers and the newlines that follow a
/// [`CARRIED_FORWARD`] marker, giving back the unwrapped text.
pub fn strip_markers(prepared: &str) -> String {
    prepared
        .replace(&format!("{}\n", CARRIED_FORWARD), "")
        .replace(CONTINUATION, "")
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn visible_len(line: &str) -> usize {
        line.strip_suffix('\n').unwrap_or(line).chars().count()
    }

    proptest! {
        #[test]
        fn short_lines_pass_through(line in "[a-z(){};=.é]{0,40}", w in 41usize..120) {
            let wrapped = wrap_line(&line, WrapWidth::new(w).unwrap());
            prop_assert_eq!(wrapped, vec![line]);
        }

        #[test]
        fn wrapped_lines_fit_width(line in "[a-z0-9 ]{1,400}\n?", w in 3usize..60) {
            let wrapped = wrap_line(&line, WrapWidth::new(w).unwrap());
            for segment in &wrapped {
                prop_assert!(visible_len(segment) <= w);
            }
        }

        #[test]
        fn markers_strip_back_to_source(line in "[a-zA-Z_é\u{4e2d}]{1,300}", w in 3usize..50) {
            let wrapped = wrap_line(&line, WrapWidth::new(w).unwrap());
            prop_assert_eq!(strip_markers(&wrapped.concat()), line);
        }

        #[test]
        fn space_led_lines_strip_back_with_one_extra_space(
            body in "[a-z0-9][a-z0-9 ]{0,200}\n?",
            w in 3usize..50,
        ) {
            let line = format!(" {}", body);
            let wrapped = wrap_line(&line, WrapWidth::new(w).unwrap());
            prop_assert_eq!(strip_markers(&wrapped.concat()), format!(" {}", line));
        }

        #[test]
        fn compensation_is_stable(body in "[a-z]{1,20}") {
            let line = format!(" {}", body);
            let once = wrap_line(&line, WrapWidth::default()).concat();
            let twice = wrap_line(&once, WrapWidth::default()).concat();
            prop_assert_eq!(&once, &format!("  {}", body));
            prop_assert_eq!(once, twice);
        }
    }
}
