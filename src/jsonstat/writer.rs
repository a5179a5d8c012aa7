//! Atomic CSV output.
//!
//! Rows go to a temporary file next to the destination, which replaces the destination only on
//! [`AtomicCsvWriter::finish`]. Dropping the writer early deletes the temporary file, so a failed
//! conversion never leaves a truncated CSV behind.

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use csv::Writer;
use tempfile::NamedTempFile;

use crate::error::{ToolError, ToolResult};

pub struct AtomicCsvWriter {
    writer: Writer<BufWriter<NamedTempFile>>,
    final_path: PathBuf,
}

impl AtomicCsvWriter {
    /// Create a writer targeting `final_path`.
    ///
    /// The temporary file lives in the destination's directory so the final rename stays on one
    /// filesystem.
    pub fn new(final_path: impl AsRef<Path>) -> ToolResult<Self> {
        let final_path = final_path.as_ref().to_path_buf();
        let parent_dir = match final_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let temp_file = NamedTempFile::new_in(parent_dir)?;
        let writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(BufWriter::new(temp_file));

        Ok(Self { writer, final_path })
    }

    pub fn writer_mut(&mut self) -> &mut Writer<BufWriter<NamedTempFile>> {
        &mut self.writer
    }

    /// Flush everything and move the temporary file over the destination.
    pub fn finish(self) -> ToolResult<PathBuf> {
        let buf_writer = self
            .writer
            .into_inner()
            .map_err(|e| ToolError::Io(io::Error::new(e.error().kind(), e.error().to_string())))?;
        let temp_file = buf_writer
            .into_inner()
            .map_err(|e| ToolError::Io(e.into_error()))?;

        temp_file
            .persist(&self.final_path)
            .map_err(|e| ToolError::Io(e.error))?;

        Ok(self.final_path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::AtomicCsvWriter;

    #[test]
    fn finish_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let final_path = dir.path().join("out.csv");
        fs::write(&final_path, "OLD").unwrap();

        let mut writer = AtomicCsvWriter::new(&final_path).unwrap();
        writer.writer_mut().write_record(["a", "b"]).unwrap();
        writer.writer_mut().write_record(["1", "x,y"]).unwrap();
        assert_eq!(writer.finish().unwrap(), final_path);

        assert_eq!(fs::read_to_string(&final_path).unwrap(), "a,b\n1,\"x,y\"\n");
    }

    #[test]
    fn dropping_without_finish_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let final_path = dir.path().join("out.csv");
        {
            let mut writer = AtomicCsvWriter::new(&final_path).unwrap();
            writer.writer_mut().write_record(["partial"]).unwrap();
        }
        assert!(!final_path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
