//! Program emitters
//!
//! A [`ProgramEmitter`] takes a finished [`GCodeProgram`] and displays or
//! persists it. Two strategies are provided: [`ConsoleEmitter`] writes to any
//! `io::Write` (stdout by default) and [`FileEmitter`] writes a file into a
//! directory, either under a fixed name or a `yyyyMMdd-HHmmss.txt` timestamp.
//!
//! File output is atomic: the program is written to a temporary file in the
//! target directory and renamed into place only once fully written. Existing
//! files are never overwritten.

use crate::error::{CamToolError, CamToolResult};
use crate::program::GCodeProgram;
use chrono::{Local, NaiveDateTime};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// What an emitter did with a program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    /// Program was written to a stream
    Displayed { lines: usize },
    /// Program was written to a file
    Written { path: PathBuf, lines: usize },
}

/// Destination for generated programs
pub trait ProgramEmitter {
    fn emit(&mut self, program: &GCodeProgram) -> CamToolResult<EmitOutcome>;
}

/// Writes programs to a stream
pub struct ConsoleEmitter<W: Write = io::Stdout> {
    writer: W,
}

impl ConsoleEmitter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ProgramEmitter for ConsoleEmitter<W> {
    fn emit(&mut self, program: &GCodeProgram) -> CamToolResult<EmitOutcome> {
        self.writer.write_all(program.render().as_bytes())?;
        self.writer.flush()?;

        let lines = program.line_count();
        info!(lines, "Program written to console");
        Ok(EmitOutcome::Displayed { lines })
    }
}

/// File name for a program generated at `at`
pub fn timestamped_file_name(at: &NaiveDateTime) -> String {
    at.format("%Y%m%d-%H%M%S.txt").to_string()
}

/// True when `name` names a file directly inside a directory
///
/// Rejects empty names, `.` and `..`, absolute paths and anything with a
/// separator. Backslashes are rejected on every platform.
pub fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Writes programs into a directory
#[derive(Debug, Clone)]
pub struct FileEmitter {
    directory: PathBuf,
    file_name: Option<String>,
}

impl FileEmitter {
    /// Emit into `directory` using timestamped file names
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            file_name: None,
        }
    }

    /// Use a fixed file name instead of a timestamp
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path the next program would be written to, given the current time
    pub fn target_path(&self, now: &NaiveDateTime) -> PathBuf {
        let name = self
            .file_name
            .clone()
            .unwrap_or_else(|| timestamped_file_name(now));
        self.directory.join(name)
    }

    /// Write `program` to `path` atomically
    fn write_atomic(&self, program: &GCodeProgram, path: &Path) -> CamToolResult<()> {
        let mut temp = NamedTempFile::new_in(&self.directory)?;
        temp.write_all(program.render().as_bytes())?;
        temp.flush()?;
        temp.as_file().sync_all()?;

        temp.persist_noclobber(path).map_err(|e| {
            if e.error.kind() == io::ErrorKind::AlreadyExists {
                CamToolError::OutputExists(path.to_path_buf())
            } else {
                CamToolError::PersistError(e.error.to_string())
            }
        })?;
        Ok(())
    }
}

impl ProgramEmitter for FileEmitter {
    fn emit(&mut self, program: &GCodeProgram) -> CamToolResult<EmitOutcome> {
        if let Some(name) = self.file_name.as_deref().filter(|n| !is_plain_file_name(n)) {
            return Err(CamToolError::InvalidFileName(name.to_string()));
        }
        if !self.directory.is_dir() {
            return Err(CamToolError::MissingDirectory(self.directory.clone()));
        }

        let path = self.target_path(&Local::now().naive_local());
        if path.exists() {
            return Err(CamToolError::OutputExists(path));
        }

        self.write_atomic(program, &path)?;

        let lines = program.line_count();
        info!(path = %path.display(), lines, "Program written to file");
        Ok(EmitOutcome::Written { path, lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_timestamped_file_name() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 1))
            .unwrap();
        assert_eq!(timestamped_file_name(&at), "20260307-090501.txt");
    }

    #[test]
    fn test_target_path_prefers_fixed_name() {
        let at = NaiveDate::from_ymd_opt(2026, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let emitter = FileEmitter::new("/tmp/out");
        assert_eq!(
            emitter.target_path(&at),
            PathBuf::from("/tmp/out/20260101-000000.txt")
        );

        let emitter = emitter.with_file_name("slot.nc");
        assert_eq!(emitter.target_path(&at), PathBuf::from("/tmp/out/slot.nc"));
    }

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("slot.nc"));
        assert!(is_plain_file_name("20260101-000000.txt"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name("."));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../slot.nc"));
        assert!(!is_plain_file_name("/etc/slot.nc"));
        assert!(!is_plain_file_name("sub\\slot.nc"));
    }

    #[test]
    fn test_console_emitter_writes_rendered_program() {
        let program = GCodeProgram::default();
        let mut emitter = ConsoleEmitter::new(Vec::new());
        let outcome = emitter.emit(&program).unwrap();

        assert_eq!(outcome, EmitOutcome::Displayed { lines: 0 });
        assert_eq!(emitter.into_inner(), program.render().into_bytes());
    }
}
