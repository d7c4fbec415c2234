//! ANSI escape sequences for rendered output, blanked when monochrome.

/// Escape sequences used by the help and summary renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogColors {
    /// Clears all attributes.
    pub reset: &'static str,
    /// Group headings.
    pub bold: &'static str,
    /// Type labels, defaults and notices.
    pub dim: &'static str,
    /// Help group headings.
    pub underlined: &'static str,
    /// Summary values.
    pub green: &'static str,
    /// Summary parameter names.
    pub blue: &'static str,
    /// The typical command line in help.
    pub cyan: &'static str,
}

impl LogColors {
    /// Colour table; every sequence is empty when `monochrome` is set.
    pub fn new(monochrome: bool) -> Self {
        if monochrome {
            return Self {
                reset: "",
                bold: "",
                dim: "",
                underlined: "",
                green: "",
                blue: "",
                cyan: "",
            };
        }
        Self {
            reset: "\x1b[0m",
            bold: "\x1b[1m",
            dim: "\x1b[2m",
            underlined: "\x1b[4m",
            green: "\x1b[0;32m",
            blue: "\x1b[0;34m",
            cyan: "\x1b[0;36m",
        }
    }

    /// Closing rule printed beneath help and summary output.
    pub fn dashed_line(&self) -> String {
        format!("-{}{}{}-", self.dim, "-".repeat(52), self.reset)
    }
}

/// Number of visible characters, skipping `ESC [ ... m` sequences.
pub fn visible_len(text: &str) -> usize {
    let mut len = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            len += 1;
        }
    }
    len
}
