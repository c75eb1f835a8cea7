//! Side-by-side hex diffs for comparing compiled tables in tests.
//!
//! Adapted from the pretty_assertions crate.
//!
//! source: https://github.com/colin-kiegel/rust-pretty-assertions/blob/main/pretty_assertions/src/lib.rs (MIT/Apache)

use std::fmt;

use nu_ansi_term::{Color, Style};

/// Assert that two byte buffers are equal, printing a hex diff if not.
///
/// Either side can be anything that is `AsRef<[u8]>`.
macro_rules! assert_hex_eq {
    ($left:expr, $right:expr$(,)?) => ({
        $crate::hex_diff::assert_hex_eq!(@ $left, $right, "", "");
    });
    ($left:expr, $right:expr, $($arg:tt)*) => ({
        $crate::hex_diff::assert_hex_eq!(@ $left, $right, ": ", $($arg)+);
    });
    (@ $left:expr, $right:expr, $maybe_semicolon:expr, $($arg:tt)*) => ({
        match (&$left, &$right) {
            (left, right) => {
                let to_diff = $crate::hex_diff::ToDiff {
                    left: ::std::convert::AsRef::<[u8]>::as_ref(left),
                    right: ::std::convert::AsRef::<[u8]>::as_ref(right),
                };
                if to_diff.left != to_diff.right {
                    ::std::panic!("assertion failed: `(left == right)`{}{}\
                       \n\
                       \n{}\
                       \n",
                       $maybe_semicolon,
                       format_args!($($arg)*),
                       to_diff,
                    )
                }
            }
        }
    });
}

pub(crate) use assert_hex_eq;

/// Row width, in bytes; most records are a multiple of four bytes long.
const ROW_WIDTH: usize = 8;

pub(crate) struct ToDiff<'a> {
    pub(crate) left: &'a [u8],
    pub(crate) right: &'a [u8],
}

impl fmt::Display for ToDiff<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_diff(f, self.make_diff(), ROW_WIDTH)
    }
}

enum DiffItem {
    Same(u8),
    Different(u8),
    Blank,
}

struct DiffResult {
    left: Vec<DiffItem>,
    right: Vec<DiffItem>,
}

impl ToDiff<'_> {
    fn make_diff(&self) -> DiffResult {
        let mut left = Vec::new();
        let mut right = Vec::new();

        for item in diff::slice(self.left, self.right) {
            match item {
                diff::Result::Both(byte, _) => {
                    pad_to_same_len(&mut left, &mut right);
                    left.push(DiffItem::Same(*byte));
                    right.push(DiffItem::Same(*byte));
                }
                diff::Result::Left(byte) => left.push(DiffItem::Different(*byte)),
                diff::Result::Right(byte) => right.push(DiffItem::Different(*byte)),
            }
        }
        pad_to_same_len(&mut left, &mut right);
        DiffResult { left, right }
    }
}

fn pad_to_same_len(left: &mut Vec<DiffItem>, right: &mut Vec<DiffItem>) {
    while left.len() < right.len() {
        left.push(DiffItem::Blank);
    }
    while right.len() < left.len() {
        right.push(DiffItem::Blank);
    }
}

fn write_diff(f: &mut impl fmt::Write, diff: DiffResult, width: usize) -> fmt::Result {
    let DiffResult { left, right } = diff;
    let divider = Color::White.dimmed();
    for (row, (left, right)) in left.chunks(width).zip(right.chunks(width)).enumerate() {
        let mut writer = InlineWriter::new(f);
        writer.write_str_with_style(&format!("{:06x} ", row * width), divider)?;
        for item in left {
            writer.write_item(item)?;
        }
        for _ in left.len()..width {
            writer.write_padding()?;
        }

        writer.write_str_with_style("| ", divider)?;

        for item in right {
            writer.write_item(item)?;
        }
        writer.finish()?;
    }
    Ok(())
}

/// Groups character styling for a row, so that runs of same-styled bytes
/// share one pair of escape codes.
struct InlineWriter<'a, W> {
    f: &'a mut W,
    style: Style,
}

impl<'a, W: fmt::Write> InlineWriter<'a, W> {
    fn new(f: &'a mut W) -> Self {
        InlineWriter {
            f,
            style: Style::new(),
        }
    }

    fn write_str_with_style(&mut self, s: &str, style: Style) -> fmt::Result {
        if style != self.style {
            write!(self.f, "{}{}", self.style.suffix(), style.prefix())?;
            self.style = style;
        }
        self.f.write_str(s)
    }

    fn write_padding(&mut self) -> fmt::Result {
        self.write_str_with_style("   ", Style::default())
    }

    fn write_item(&mut self, item: &DiffItem) -> fmt::Result {
        let (style, text) = match item {
            DiffItem::Same(byte) => (Style::default(), format!("{byte:02x} ")),
            DiffItem::Different(byte) => (Color::Red.into(), format!("{byte:02x} ")),
            DiffItem::Blank => (Style::default(), "__ ".to_string()),
        };
        self.write_str_with_style(&text, style)
    }

    fn finish(&mut self) -> fmt::Result {
        writeln!(self.f, "{}", self.style.suffix())?;
        self.style = Style::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_buffers_pass() {
        assert_hex_eq!(vec![1u8, 2, 3], [1u8, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn different_buffers_panic() {
        assert_hex_eq!(vec![1u8, 2, 3], [1u8, 9, 3], "record {}", 0);
    }

    #[test]
    fn diff_marks_blank_bytes() {
        let diff = ToDiff {
            left: &[0xaa, 0xbb],
            right: &[0xaa],
        }
        .to_string();
        assert!(diff.contains("aa"), "{diff}");
        assert!(diff.contains("__"), "{diff}");
    }
}
