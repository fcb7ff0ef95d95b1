//! Packaging tasks: catenation and finish
//!
//! The composition engine runs as an ordered sequence of tasks against one
//! [`PackagingContext`]. Each [`CatenationTask`] computes the file set its
//! overlay contributes and appends the matched files' content onto a shared
//! accumulator file; once every overlay targeting a logical output has run,
//! a [`FinishTask`] moves the accumulator to its final destination.
//!
//! ## Ordering
//!
//! Tasks execute strictly sequentially in caller-supplied order. The
//! accumulator's append order *is* the correctness contract: later overlays
//! append after earlier ones, and callers rely on that. Running two
//! pipelines against the same destination concurrently is a caller error
//! the engine does not guard against.
//!
//! ## Content handling
//!
//! Source files are read as Latin-1, a single-byte encoding that makes the
//! copy an opaque line-oriented pass-through: no re-encoding happens, every
//! line is appended followed by a line boundary. Re-running a pipeline
//! without resetting the accumulator duplicates content; callers that want
//! idempotence must start from a fresh accumulator.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, log_enabled, Level};

use crate::error::{Error, Result};
use crate::overlay::Overlay;
use crate::path_set::select_files;
use crate::unpack::{ensure_unpacked, Unpacker};
use crate::workdir::resolve_temp_directory;

/// Shared state for one composition run.
pub struct PackagingContext<'a> {
    source_directory: PathBuf,
    work_directory: PathBuf,
    unpacker: &'a dyn Unpacker,
}

impl<'a> PackagingContext<'a> {
    /// * `source_directory` — the already-materialized primary source tree.
    /// * `work_directory` — root under which overlay temp directories live.
    /// * `unpacker` — archive-extraction capability.
    pub fn new(
        source_directory: impl Into<PathBuf>,
        work_directory: impl Into<PathBuf>,
        unpacker: &'a dyn Unpacker,
    ) -> Self {
        Self {
            source_directory: source_directory.into(),
            work_directory: work_directory.into(),
            unpacker,
        }
    }

    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }

    pub fn work_directory(&self) -> &Path {
        &self.work_directory
    }

    pub fn unpacker(&self) -> &dyn Unpacker {
        self.unpacker
    }
}

/// One step of a composition pipeline.
pub trait PackagingTask {
    fn perform(&self, context: &PackagingContext<'_>) -> Result<()>;
}

/// Run tasks strictly in order; the first error aborts the pipeline.
pub fn run_tasks(context: &PackagingContext<'_>, tasks: &[Box<dyn PackagingTask>]) -> Result<()> {
    for task in tasks {
        task.perform(context)?;
    }
    Ok(())
}

/// Appends one overlay's matched files onto a shared accumulator file.
pub struct CatenationTask {
    overlay: Overlay,
    root_package: bool,
    destination: PathBuf,
    includes: Vec<String>,
}

impl CatenationTask {
    /// * `root_package` — when set, files are sourced from the primary
    ///   source tree instead of the overlay's unpacked archive.
    /// * `destination` — the accumulator file contributions are appended to.
    pub fn new(
        overlay: Overlay,
        root_package: bool,
        destination: impl Into<PathBuf>,
        includes: Vec<String>,
    ) -> Self {
        Self {
            overlay,
            root_package,
            destination: destination.into(),
            includes,
        }
    }

    /// Resolve the directory this overlay's files are sourced from,
    /// unpacking the backing archive first if the cache is stale.
    fn source_base(&self, context: &PackagingContext<'_>) -> Result<PathBuf> {
        if self.root_package {
            return Ok(context.source_directory().to_path_buf());
        }
        let temp_dir = resolve_temp_directory(context.work_directory(), &self.overlay)?;
        ensure_unpacked(context.unpacker(), &self.overlay, &temp_dir)?;
        Ok(temp_dir)
    }

    fn catenate(&self, base_dir: &Path) -> Result<()> {
        // Include patterns are matched case-insensitively.
        let selected = select_files(base_dir, &self.includes, None, false)?;

        for relative in selected.paths() {
            let source_file = base_dir.join(relative);
            // Overlays may be partial with respect to the include set.
            if source_file.is_file() {
                append_file(&source_file, &self.destination).map_err(|e| Error::Catenation {
                    overlay: self.overlay.to_string(),
                    source: e,
                })?;
            }
        }
        Ok(())
    }
}

impl PackagingTask for CatenationTask {
    fn perform(&self, context: &PackagingContext<'_>) -> Result<()> {
        debug!(
            "CatenationTask: perform catenation, target path '{}'",
            self.overlay.target_path()
        );
        if self.overlay.should_skip() {
            info!("Skipping catenation on [{}]", self.overlay);
            return Ok(());
        }
        if !log_enabled!(Level::Debug) {
            info!("Processing catenation on [{}]", self.overlay);
        }

        let base_dir = self.source_base(context)?;
        self.catenate(&base_dir)
    }
}

/// Append the content of `source` onto `destination`, line by line.
///
/// The destination is opened in create-or-append mode and closed before
/// returning on every path. Content is read as Latin-1 and written back
/// unmodified, each line terminated by a newline.
fn append_file(source: &Path, destination: &Path) -> std::io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = fs::read(source)?;
    let lines = split_lines(&content);

    if log_enabled!(Level::Debug) {
        debug!(
            " ===== CATENATE {} to {} =====",
            source.display(),
            destination.display()
        );
        for (i, line) in lines.iter().enumerate() {
            debug!("{}:{}", i + 1, String::from_utf8_lossy(line));
        }
    }

    let mut out = OpenOptions::new()
        .create(true)
        .append(true)
        .open(destination)?;
    for line in &lines {
        out.write_all(line)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Split on line boundaries, accepting `\n` and `\r\n`, dropping a trailing
/// empty segment so a final newline does not produce a phantom line.
fn split_lines(content: &[u8]) -> Vec<&[u8]> {
    let mut lines: Vec<&[u8]> = content
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Moves a completed accumulator file to its final destination.
pub struct FinishTask {
    accumulator: PathBuf,
    destination: PathBuf,
}

impl FinishTask {
    pub fn new(accumulator: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            accumulator: accumulator.into(),
            destination: destination.into(),
        }
    }
}

impl PackagingTask for FinishTask {
    fn perform(&self, _context: &PackagingContext<'_>) -> Result<()> {
        let finish_error = |e: std::io::Error| Error::Finish {
            src: self.accumulator.display().to_string(),
            dst: self.destination.display().to_string(),
            source: e,
        };

        if let Some(parent) = self.destination.parent() {
            fs::create_dir_all(parent).map_err(finish_error)?;
        }
        fs::copy(&self.accumulator, &self.destination).map_err(finish_error)?;
        // Only a successful move releases the accumulator.
        fs::remove_file(&self.accumulator).map_err(finish_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct CountingUnpacker {
        calls: Cell<usize>,
    }

    impl CountingUnpacker {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl Unpacker for CountingUnpacker {
        fn unpack(&self, _archive: &Path, destination: &Path) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            fs::write(destination.join("app.conf"), "from archive\n")?;
            Ok(())
        }
    }

    fn overlay(root: &Path, artifact_id: &str) -> Overlay {
        let archive = root.join(format!("{}.bin", artifact_id));
        fs::write(&archive, "archive bytes").unwrap();
        Overlay::new("com.acme", artifact_id, None, archive, "")
    }

    /// Pre-populate the overlay's temp directory so the unpack cache hits.
    fn materialize_overlay(root: &Path, overlay: &Overlay, file: &str, content: &str) {
        let dir = root
            .join("work")
            .join(overlay.group_id())
            .join(overlay.artifact_id());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_append_order_across_overlays() {
        let root = TempDir::new().unwrap();
        let unpacker = CountingUnpacker::new();
        let context = PackagingContext::new(
            root.path().join("source"),
            root.path().join("work"),
            &unpacker,
        );
        let accumulator = root.path().join("acc.conf");

        for (id, content) in [("one", "A\n"), ("two", "B\n"), ("three", "C\n")] {
            let o = overlay(root.path(), id);
            materialize_overlay(root.path(), &o, "app.conf", content);
            let task = CatenationTask::new(o, false, &accumulator, vec!["app.conf".to_string()]);
            task.perform(&context).unwrap();
        }

        assert_eq!(fs::read_to_string(&accumulator).unwrap(), "A\nB\nC\n");
        // The pre-populated directories were fresh, so no extraction ran.
        assert_eq!(unpacker.calls.get(), 0);
    }

    #[test]
    fn test_rerun_duplicates_accumulator_content() {
        let root = TempDir::new().unwrap();
        let unpacker = CountingUnpacker::new();
        let context = PackagingContext::new(
            root.path().join("source"),
            root.path().join("work"),
            &unpacker,
        );
        let accumulator = root.path().join("acc.conf");

        let o = overlay(root.path(), "one");
        materialize_overlay(root.path(), &o, "app.conf", "A\n");
        let task = CatenationTask::new(o, false, &accumulator, vec!["app.conf".to_string()]);
        task.perform(&context).unwrap();
        task.perform(&context).unwrap();

        assert_eq!(fs::read_to_string(&accumulator).unwrap(), "A\nA\n");
    }

    #[test]
    fn test_missing_source_file_is_tolerated() {
        let root = TempDir::new().unwrap();
        let unpacker = CountingUnpacker::new();
        let context = PackagingContext::new(
            root.path().join("source"),
            root.path().join("work"),
            &unpacker,
        );
        let accumulator = root.path().join("acc.conf");

        let o = overlay(root.path(), "one");
        materialize_overlay(root.path(), &o, "other.conf", "ignored\n");
        let task = CatenationTask::new(o, false, &accumulator, vec!["x.conf".to_string()]);
        task.perform(&context).unwrap();

        assert!(!accumulator.exists());
    }

    #[test]
    fn test_skip_flag_contributes_nothing_and_runs_nothing() {
        let root = TempDir::new().unwrap();
        let unpacker = CountingUnpacker::new();
        let context = PackagingContext::new(
            root.path().join("source"),
            root.path().join("work"),
            &unpacker,
        );
        let accumulator = root.path().join("acc.conf");

        let o = overlay(root.path(), "one").with_skip(true);
        let task = CatenationTask::new(o, false, &accumulator, vec!["app.conf".to_string()]);
        task.perform(&context).unwrap();

        assert!(!accumulator.exists());
        assert_eq!(unpacker.calls.get(), 0);
        // The temp directory was never even resolved.
        assert!(!root.path().join("work").join("com.acme").exists());
    }

    #[test]
    fn test_unpack_runs_once_then_selection_sees_output() {
        let root = TempDir::new().unwrap();
        let unpacker = CountingUnpacker::new();
        let context = PackagingContext::new(
            root.path().join("source"),
            root.path().join("work"),
            &unpacker,
        );
        let accumulator = root.path().join("acc.conf");

        let o = overlay(root.path(), "one");
        let task = CatenationTask::new(o, false, &accumulator, vec!["app.conf".to_string()]);
        task.perform(&context).unwrap();

        assert_eq!(unpacker.calls.get(), 1);
        assert_eq!(fs::read_to_string(&accumulator).unwrap(), "from archive\n");
    }

    #[test]
    fn test_root_package_sources_from_primary_tree() {
        let root = TempDir::new().unwrap();
        let source = root.path().join("source");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("app.conf"), "primary\n").unwrap();

        let unpacker = CountingUnpacker::new();
        let context = PackagingContext::new(&source, root.path().join("work"), &unpacker);
        let accumulator = root.path().join("acc.conf");

        let o = overlay(root.path(), "root");
        let task = CatenationTask::new(o, true, &accumulator, vec!["app.conf".to_string()]);
        task.perform(&context).unwrap();

        assert_eq!(fs::read_to_string(&accumulator).unwrap(), "primary\n");
        assert_eq!(unpacker.calls.get(), 0);
    }

    #[test]
    fn test_finish_moves_then_deletes() {
        let root = TempDir::new().unwrap();
        let unpacker = CountingUnpacker::new();
        let context = PackagingContext::new(
            root.path().join("source"),
            root.path().join("work"),
            &unpacker,
        );

        let accumulator = root.path().join("acc.conf");
        fs::write(&accumulator, "A\nB\n").unwrap();
        let destination = root.path().join("out").join("app.conf");

        FinishTask::new(&accumulator, &destination)
            .perform(&context)
            .unwrap();

        assert_eq!(fs::read_to_string(&destination).unwrap(), "A\nB\n");
        assert!(!accumulator.exists());
    }

    #[test]
    fn test_finish_failure_keeps_accumulator() {
        let root = TempDir::new().unwrap();
        let unpacker = CountingUnpacker::new();
        let context = PackagingContext::new(
            root.path().join("source"),
            root.path().join("work"),
            &unpacker,
        );

        let accumulator = root.path().join("acc.conf");
        fs::write(&accumulator, "A\n").unwrap();
        // A directory at the destination path makes the copy fail.
        let destination = root.path().join("blocked");
        fs::create_dir_all(&destination).unwrap();

        let result = FinishTask::new(&accumulator, &destination).perform(&context);

        assert!(matches!(result, Err(Error::Finish { .. })));
        assert!(accumulator.exists());
    }

    #[test]
    fn test_crlf_input_normalized_to_lines() {
        let root = TempDir::new().unwrap();
        let unpacker = CountingUnpacker::new();
        let context = PackagingContext::new(
            root.path().join("source"),
            root.path().join("work"),
            &unpacker,
        );
        let accumulator = root.path().join("acc.conf");

        let o = overlay(root.path(), "one");
        materialize_overlay(root.path(), &o, "app.conf", "A\r\nB\r\n");
        let task = CatenationTask::new(o, false, &accumulator, vec!["app.conf".to_string()]);
        task.perform(&context).unwrap();

        assert_eq!(fs::read_to_string(&accumulator).unwrap(), "A\nB\n");
    }

    #[test]
    fn test_source_without_trailing_newline_gains_line_boundary() {
        let root = TempDir::new().unwrap();
        let unpacker = CountingUnpacker::new();
        let context = PackagingContext::new(
            root.path().join("source"),
            root.path().join("work"),
            &unpacker,
        );
        let accumulator = root.path().join("acc.conf");

        let o = overlay(root.path(), "one");
        materialize_overlay(root.path(), &o, "app.conf", "no-newline");
        let task = CatenationTask::new(o, false, &accumulator, vec!["app.conf".to_string()]);
        task.perform(&context).unwrap();

        assert_eq!(fs::read_to_string(&accumulator).unwrap(), "no-newline\n");
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(b"a\nb\n"), vec![&b"a"[..], &b"b"[..]]);
        assert_eq!(split_lines(b"a\r\nb"), vec![&b"a"[..], &b"b"[..]]);
        assert_eq!(split_lines(b""), Vec::<&[u8]>::new());
        assert_eq!(split_lines(b"\n"), vec![&b""[..]]);
    }
}
