//! Single-line G-code instructions
//!
//! A [`GCodeLine`] holds an optional command mnemonic (`G1`, `M3`, ...), a list
//! of address words (`X10.000`, `F22`) and an optional comment. Rendering is
//! locale-independent: `.` is always the decimal separator and values are
//! never grouped.

use std::fmt;

/// Decimals used for lengths, coordinates and depths
pub const LENGTH_DECIMALS: usize = 3;
/// Decimals used for spindle speed
pub const SPINDLE_DECIMALS: usize = 0;
/// Default decimals used for feed rates
pub const FEED_DECIMALS: usize = 0;
/// Default column at which trailing comments start
pub const DEFAULT_COMMENT_COLUMN: usize = 24;

/// One address word of an instruction, such as `Z-0.400`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Argument {
    address: char,
    value: f64,
    decimals: usize,
}

impl Argument {
    pub fn new(address: char, value: f64, decimals: usize) -> Self {
        Self {
            address: address.to_ascii_uppercase(),
            value,
            decimals,
        }
    }

    /// Coordinate or length word (3 decimals)
    pub fn length(address: char, value: f64) -> Self {
        Self::new(address, value, LENGTH_DECIMALS)
    }

    /// Spindle speed word (`S`, whole RPM)
    pub fn spindle(value: f64) -> Self {
        Self::new('S', value, SPINDLE_DECIMALS)
    }

    /// Feed rate word (`F`)
    pub fn feed(value: f64, decimals: usize) -> Self {
        Self::new('F', value, decimals)
    }

    /// Modal code word carried after the command, such as the `G17` in `G21 G64 G17`
    pub fn modal(address: char, code: u16) -> Self {
        Self::new(address, f64::from(code), 0)
    }

    pub fn address(&self) -> char {
        self.address
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.address, format_number(self.value, self.decimals))
    }
}

/// Format a number with fixed decimals, never emitting `-0`
pub fn format_number(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    match text.strip_prefix('-') {
        Some(unsigned) if unsigned.bytes().all(|b| b == b'0' || b == b'.') => {
            unsigned.to_string()
        }
        _ => text,
    }
}

/// An immutable line of G-code
#[derive(Debug, Clone, PartialEq)]
pub struct GCodeLine {
    command: Option<String>,
    args: Vec<Argument>,
    comment: Option<String>,
}

impl GCodeLine {
    /// A command with no arguments
    pub fn command(mnemonic: impl Into<String>) -> Self {
        Self {
            command: Some(mnemonic.into()),
            args: Vec::new(),
            comment: None,
        }
    }

    /// A line made only of address words, such as a bare feed rate
    pub fn words(args: Vec<Argument>) -> Self {
        Self {
            command: None,
            args,
            comment: None,
        }
    }

    /// A comment-only line
    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            command: None,
            args: Vec::new(),
            comment: Some(sanitize_comment(&text.into())),
        }
    }

    pub fn arg(mut self, arg: Argument) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_comment(mut self, text: impl Into<String>) -> Self {
        self.comment = Some(sanitize_comment(&text.into()));
        self
    }

    pub fn mnemonic(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// First argument with the given address letter
    pub fn find_arg(&self, address: char) -> Option<&Argument> {
        self.args.iter().find(|a| a.address == address)
    }

    /// True for lines that carry nothing but a comment
    pub fn is_comment_only(&self) -> bool {
        self.command.is_none() && self.args.is_empty()
    }

    /// The executable part of the line, without the comment
    pub fn code(&self) -> String {
        let mut words: Vec<String> = Vec::with_capacity(self.args.len() + 1);
        if let Some(command) = &self.command {
            words.push(command.clone());
        }
        words.extend(self.args.iter().map(Argument::to_string));
        words.join(" ")
    }

    /// Render the line, starting the comment at `comment_column`
    pub fn render(&self, comment_column: usize) -> String {
        let code = self.code();
        match (&self.comment, code.is_empty()) {
            (None, _) => code,
            (Some(comment), true) => format!("({})", comment),
            (Some(comment), false) => {
                let width = comment_column.max(code.len() + 1);
                format!("{:<width$}({})", code, comment, width = width)
            }
        }
    }
}

impl fmt::Display for GCodeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_COMMENT_COLUMN))
    }
}

// A nested ')' would end the comment early on most controllers
fn sanitize_comment(text: &str) -> String {
    text.replace('(', "[").replace(')', "]")
}
