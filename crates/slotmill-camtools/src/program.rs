//! Assembled G-code programs
//!
//! A [`GCodeProgram`] is three ordered sections: start, body and end. It is
//! built once and then only read. Rendering joins lines with `\r\n` and puts a
//! single blank line between sections.

use crate::instruction::{GCodeLine, DEFAULT_COMMENT_COLUMN};
use std::fmt;

/// Line terminator used in rendered programs
pub const LINE_ENDING: &str = "\r\n";

/// The three sections of a program, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Start,
    Body,
    End,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [Self::Start, Self::Body, Self::End];
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Body => write!(f, "body"),
            Self::End => write!(f, "end"),
        }
    }
}

/// A complete slot-milling program
#[derive(Debug, Clone, PartialEq)]
pub struct GCodeProgram {
    start: Vec<GCodeLine>,
    body: Vec<GCodeLine>,
    end: Vec<GCodeLine>,
    comment_column: usize,
}

impl GCodeProgram {
    pub fn new(
        start: Vec<GCodeLine>,
        body: Vec<GCodeLine>,
        end: Vec<GCodeLine>,
        comment_column: usize,
    ) -> Self {
        Self {
            start,
            body,
            end,
            comment_column,
        }
    }

    pub fn start(&self) -> &[GCodeLine] {
        &self.start
    }

    pub fn body(&self) -> &[GCodeLine] {
        &self.body
    }

    pub fn end(&self) -> &[GCodeLine] {
        &self.end
    }

    pub fn section(&self, kind: SectionKind) -> &[GCodeLine] {
        match kind {
            SectionKind::Start => &self.start,
            SectionKind::Body => &self.body,
            SectionKind::End => &self.end,
        }
    }

    /// All lines in emission order
    pub fn lines(&self) -> impl Iterator<Item = &GCodeLine> {
        self.start.iter().chain(&self.body).chain(&self.end)
    }

    pub fn line_count(&self) -> usize {
        self.start.len() + self.body.len() + self.end.len()
    }

    /// Render a section as text lines, without terminators
    pub fn render_section(&self, kind: SectionKind) -> Vec<String> {
        self.section(kind)
            .iter()
            .map(|line| line.render(self.comment_column))
            .collect()
    }

    /// Render the whole program as `\r\n`-terminated text
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, kind) in SectionKind::ALL.into_iter().enumerate() {
            if i > 0 {
                out.push_str(LINE_ENDING);
            }
            for line in self.render_section(kind) {
                out.push_str(&line);
                out.push_str(LINE_ENDING);
            }
        }
        out
    }
}

impl fmt::Display for GCodeProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Default for GCodeProgram {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), DEFAULT_COMMENT_COLUMN)
    }
}
