//! # create-zip Archive Writer (`common::archive::writer`)
//!
//! File: cli/src/common/archive/writer.rs
//!
//! ## Overview
//!
//! This module turns a source path (a single file or a directory tree) into one
//! ZIP file at a destination path. It is the engine behind `create-zip`; the
//! command layer only validates inputs and prepares the destination directory
//! before calling `archive`.
//!
//! ## Architecture
//!
//! 1. The source is stat'ed once. Whether it is a directory fixes the naming mode
//!    (`naming::TraversalContext`) for the whole run.
//! 2. The destination file is created and wrapped in a `zip::ZipWriter`.
//! 3. `walk::Traversal` yields nodes in pre-order. For each node:
//!    - directories become `Stored` entries whose names end in `/`;
//!    - regular files become `Deflated` entries and their bytes are streamed in
//!      through a fixed-size buffer;
//!    - special files are skipped with a warning.
//! 4. Whatever happened during the walk, the ZIP writer is finished (central
//!    directory written) and then the buffered file is flushed, in that order and
//!    in one place. A walk error takes precedence over a close error; a close error
//!    after a clean walk becomes the result.
//!
//! Any error aborts the rest of the walk. An aborted run leaves a finalized,
//! partial archive on disk.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::writer;
//! use std::path::Path;
//!
//! # fn run() -> crate::core::error::ArchiveResult<()> {
//! writer::archive(Path::new("proj"), Path::new("out.zip"))?;
//!
//! let summary = writer::archive_with_progress(Path::new("proj"), Path::new("out.zip"), |entry| {
//!     println!("added {}", entry.name);
//! })?;
//! println!("{} files, {} bytes", summary.files, summary.bytes);
//! # Ok(())
//! # }
//! ```
//!
use crate::common::archive::naming::TraversalContext;
use crate::common::archive::walk::{NodeKind, Traversal, VisitedNode};
use crate::core::error::{ArchiveError, ArchiveResult};
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::fs::{self, File, Metadata};
use std::io::{BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Size of the buffer used to stream file content into the archive.
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Files at or above this size need ZIP64 headers.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Kind of an entry written to the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// Description of one entry after it has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedEntry {
    /// Archive-relative name, `/`-separated. Directory names end in `/`.
    pub name: String,
    pub kind: EntryKind,
    pub compression: CompressionMethod,
    /// Uncompressed content length; always 0 for directories.
    pub bytes: u64,
}

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub entries: usize,
    pub directories: usize,
    pub files: usize,
    pub bytes: u64,
}

impl ArchiveSummary {
    fn record(&mut self, entry: &EmittedEntry) {
        self.entries += 1;
        match entry.kind {
            EntryKind::Directory => self.directories += 1,
            EntryKind::File => self.files += 1,
        }
        self.bytes += entry.bytes;
    }
}

/// Archives `source_path` into a ZIP file at `destination_path`.
///
/// The destination is created or truncated. Its parent directory must exist.
/// Each entry is logged at debug level as it is written.
///
/// # Errors
///
/// Any `ArchiveError`; see `archive_with_progress`.
pub fn archive(source_path: &Path, destination_path: &Path) -> ArchiveResult<()> {
    archive_with_progress(source_path, destination_path, |entry| match entry.kind {
        EntryKind::Directory => debug!("Added directory {}", entry.name),
        EntryKind::File => debug!(
            "Added {} ({} bytes, {:?})",
            entry.name, entry.bytes, entry.compression
        ),
    })
    .map(|_| ())
}

/// Archives `source_path` into `destination_path`, calling `on_entry` once for
/// every entry written, in archive order.
///
/// # Errors
///
/// - `Stat` if the source or any node under it cannot be inspected.
/// - `SymlinkResolution` for broken or cyclic links.
/// - `Naming` if an entry name cannot be computed.
/// - `DestinationOpen` if the destination cannot be created.
/// - `ContentRead` / `ContentWrite` if streaming a file fails.
/// - `DestinationClose` if finalizing the archive fails after a clean walk.
pub fn archive_with_progress<F>(
    source_path: &Path,
    destination_path: &Path,
    mut on_entry: F,
) -> ArchiveResult<ArchiveSummary>
where
    F: FnMut(&EmittedEntry),
{
    // 1. One stat of the source fixes the naming mode.
    let source_metadata = fs::metadata(source_path).map_err(|source| ArchiveError::Stat {
        path: source_path.to_path_buf(),
        source,
    })?;
    let context = TraversalContext::new(source_path, source_metadata.is_dir())?;

    // 2. Open the destination.
    let file = File::create(destination_path).map_err(|source| ArchiveError::DestinationOpen {
        path: destination_path.to_path_buf(),
        source,
    })?;
    // The destination must never be archived into itself.
    let destination_real = fs::canonicalize(destination_path).ok();
    let mut writer = ZipWriter::new(BufWriter::new(file));
    info!(
        "Archiving {} into {}",
        source_path.display(),
        destination_path.display()
    );

    // 3. Walk and emit.
    let walked = write_tree(
        &mut writer,
        &context,
        destination_real.as_deref(),
        &mut on_entry,
    );

    // 4. Finish the ZIP writer, then flush and close the file.
    let closed = close(writer, destination_path);

    match walked {
        Err(err) => {
            if let Err(close_err) = closed {
                warn!("Archive could not be finalized after failure: {}", close_err);
            }
            Err(err)
        }
        Ok(summary) => {
            closed?;
            info!(
                "Wrote {} entries ({} files, {} directories, {} bytes) to {}",
                summary.entries,
                summary.files,
                summary.directories,
                summary.bytes,
                destination_path.display()
            );
            Ok(summary)
        }
    }
}

fn write_tree<W, F>(
    writer: &mut ZipWriter<W>,
    context: &TraversalContext,
    destination_real: Option<&Path>,
    on_entry: &mut F,
) -> ArchiveResult<ArchiveSummary>
where
    W: Write + Seek,
    F: FnMut(&EmittedEntry),
{
    let mut summary = ArchiveSummary::default();

    for node in Traversal::new(context.source_path()) {
        let node = node?;

        if node.kind == NodeKind::Other {
            warn!(
                "Skipping {}: not a regular file or directory",
                node.original_path.display()
            );
            continue;
        }
        if !node.is_directory() && is_destination(&node, destination_real) {
            warn!(
                "Skipping {}: it is the archive being written",
                node.original_path.display()
            );
            continue;
        }

        let name = context.entry_name(&node.original_path, node.is_directory())?;
        let entry = if node.is_directory() {
            write_directory(writer, &node, name)?
        } else {
            write_file(writer, &node, name)?
        };

        trace!("Emitted {} ({} bytes)", entry.name, entry.bytes);
        summary.record(&entry);
        on_entry(&entry);
    }

    Ok(summary)
}

fn write_directory<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    node: &VisitedNode,
    name: String,
) -> ArchiveResult<EmittedEntry> {
    let options = entry_options(&node.metadata, CompressionMethod::Stored);
    writer
        .add_directory(name.clone(), options)
        .map_err(|source| ArchiveError::ContentWrite {
            path: node.original_path.clone(),
            source,
        })?;
    Ok(EmittedEntry {
        name,
        kind: EntryKind::Directory,
        compression: CompressionMethod::Stored,
        bytes: 0,
    })
}

fn write_file<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    node: &VisitedNode,
    name: String,
) -> ArchiveResult<EmittedEntry> {
    // Open before writing the header so an unreadable file leaves no empty entry.
    let mut source = File::open(&node.resolved_path).map_err(|source| ArchiveError::ContentRead {
        path: node.resolved_path.clone(),
        source,
    })?;

    let options = entry_options(&node.metadata, CompressionMethod::Deflated)
        .large_file(node.metadata.len() >= ZIP64_THRESHOLD);
    writer
        .start_file(name.clone(), options)
        .map_err(|source| ArchiveError::ContentWrite {
            path: node.original_path.clone(),
            source,
        })?;

    let bytes = stream_content(&mut source, writer, node)?;
    Ok(EmittedEntry {
        name,
        kind: EntryKind::File,
        compression: CompressionMethod::Deflated,
        bytes,
    })
}

/// Copies `source` into the open entry. Read and write failures are reported
/// separately, which `std::io::copy` cannot do.
fn stream_content<R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    node: &VisitedNode,
) -> ArchiveResult<u64> {
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let read = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(ArchiveError::ContentRead {
                    path: node.resolved_path.clone(),
                    source,
                })
            }
        };
        sink.write_all(&buffer[..read])
            .map_err(|source| ArchiveError::ContentWrite {
                path: node.original_path.clone(),
                source: ZipError::Io(source),
            })?;
        total += read as u64;
    }
    Ok(total)
}

fn close<W: Write + Seek>(
    writer: ZipWriter<BufWriter<W>>,
    destination_path: &Path,
) -> ArchiveResult<()> {
    let close_error = |source: ZipError| ArchiveError::DestinationClose {
        path: destination_path.to_path_buf(),
        source,
    };
    let mut buffered = writer.finish().map_err(close_error)?;
    buffered
        .flush()
        .map_err(|err| close_error(ZipError::Io(err)))?;
    // Dropping the file handle closes it.
    Ok(())
}

fn is_destination(node: &VisitedNode, destination_real: Option<&Path>) -> bool {
    let Some(destination_real) = destination_real else {
        return false;
    };
    // Only a node carrying the archive's file name needs the full comparison.
    if node.resolved_path.file_name() != destination_real.file_name() {
        return false;
    }
    let node_real: PathBuf = if node.is_symlink {
        node.resolved_path.clone()
    } else {
        match fs::canonicalize(&node.resolved_path) {
            Ok(path) => path,
            Err(_) => return false,
        }
    };
    node_real == destination_real
}

/// Header options shared by directory and file entries.
fn entry_options(metadata: &Metadata, method: CompressionMethod) -> SimpleFileOptions {
    let options = SimpleFileOptions::default()
        .compression_method(method)
        .last_modified_time(modified_time(metadata));
    #[cfg(unix)]
    let options = {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(metadata.permissions().mode() & 0o7777)
    };
    options
}

/// Converts the modification time to a ZIP timestamp (UTC).
///
/// ZIP can only store 1980..=2107; anything else, or an unreadable mtime,
/// becomes the ZIP epoch.
fn modified_time(metadata: &Metadata) -> zip::DateTime {
    metadata
        .modified()
        .ok()
        .and_then(|modified| {
            let utc: DateTime<Utc> = modified.into();
            zip::DateTime::from_date_and_time(
                u16::try_from(utc.year()).ok()?,
                utc.month() as u8,
                utc.day() as u8,
                utc.hour() as u8,
                utc.minute() as u8,
                utc.second() as u8,
            )
            .ok()
        })
        .unwrap_or_default()
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use zip::ZipArchive;

    /// (name, is_dir, compression, content) for every entry, in archive order.
    fn read_entries(path: &Path) -> Vec<(String, bool, CompressionMethod, Vec<u8>)> {
        let mut zip = ZipArchive::new(File::open(path).unwrap()).unwrap();
        (0..zip.len())
            .map(|i| {
                let mut entry = zip.by_index(i).unwrap();
                let mut content = Vec::new();
                entry.read_to_end(&mut content).unwrap();
                (
                    entry.name().to_string(),
                    entry.is_dir(),
                    entry.compression(),
                    content,
                )
            })
            .collect()
    }

    fn names(path: &Path) -> Vec<String> {
        read_entries(path).into_iter().map(|e| e.0).collect()
    }

    fn sample_project(root: &Path) -> PathBuf {
        let proj = root.join("proj");
        fs::create_dir_all(proj.join("sub")).unwrap();
        fs::write(proj.join("a.txt"), "alpha").unwrap();
        fs::write(proj.join("sub/b.txt"), "beta").unwrap();
        proj
    }

    #[test]
    fn test_directory_source_layout() {
        let dir = tempdir().unwrap();
        let proj = sample_project(dir.path());
        let out = dir.path().join("out.zip");

        archive(&proj, &out).unwrap();

        let entries = read_entries(&out);
        let listed: Vec<_> = entries.iter().map(|e| (e.0.as_str(), e.1)).collect();
        assert_eq!(
            listed,
            vec![
                ("proj/", true),
                ("proj/a.txt", false),
                ("proj/sub/", true),
                ("proj/sub/b.txt", false),
            ]
        );
        assert_eq!(entries[1].3, b"alpha");
        assert_eq!(entries[3].3, b"beta");
    }

    #[test]
    fn test_compression_methods() {
        let dir = tempdir().unwrap();
        let proj = sample_project(dir.path());
        let out = dir.path().join("out.zip");

        archive(&proj, &out).unwrap();

        for (name, is_dir, compression, content) in read_entries(&out) {
            if is_dir {
                assert!(name.ends_with('/') && !name.ends_with("//"), "{}", name);
                assert_eq!(compression, CompressionMethod::Stored, "{}", name);
                assert!(content.is_empty());
            } else {
                assert_eq!(compression, CompressionMethod::Deflated, "{}", name);
            }
        }
    }

    #[test]
    fn test_single_file_source() {
        let dir = tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, "remember the milk").unwrap();
        let out = dir.path().join("backup.zip");

        archive(&notes, &out).unwrap();

        let entries = read_entries(&out);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "notes.txt");
        assert!(!entries[0].1);
        assert_eq!(entries[0].2, CompressionMethod::Deflated);
        assert_eq!(entries[0].3, b"remember the milk");
    }

    #[test]
    fn test_empty_and_multi_buffer_files() {
        let dir = tempdir().unwrap();
        let proj = dir.path().join("proj");
        fs::create_dir(&proj).unwrap();
        fs::write(proj.join("empty.bin"), b"").unwrap();
        let big: Vec<u8> = (0..(COPY_BUFFER_SIZE * 3 + 17))
            .map(|i| (i % 251) as u8)
            .collect();
        fs::write(proj.join("large.bin"), &big).unwrap();
        let out = dir.path().join("out.zip");

        let summary = archive_with_progress(&proj, &out, |_| {}).unwrap();

        let entries = read_entries(&out);
        assert_eq!(entries[1].0, "proj/empty.bin");
        assert!(entries[1].3.is_empty());
        assert_eq!(entries[2].0, "proj/large.bin");
        assert_eq!(entries[2].3, big);
        assert_eq!(summary.bytes, big.len() as u64);
    }

    #[test]
    fn test_progress_callback_and_summary() {
        let dir = tempdir().unwrap();
        let proj = sample_project(dir.path());
        let out = dir.path().join("out.zip");

        let mut seen = Vec::new();
        let summary = archive_with_progress(&proj, &out, |entry| seen.push(entry.clone())).unwrap();

        assert_eq!(
            seen.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            vec!["proj/", "proj/a.txt", "proj/sub/", "proj/sub/b.txt"]
        );
        assert_eq!(seen[1].kind, EntryKind::File);
        assert_eq!(seen[1].bytes, 5);
        assert_eq!(
            summary,
            ArchiveSummary {
                entries: 4,
                directories: 2,
                files: 2,
                bytes: 9,
            }
        );
    }

    #[test]
    fn test_repeated_runs_have_identical_names() {
        let dir = tempdir().unwrap();
        let proj = sample_project(dir.path());
        fs::write(proj.join("z.txt"), "last").unwrap();
        fs::write(proj.join("m.txt"), "middle").unwrap();
        let first = dir.path().join("first.zip");
        let second = dir.path().join("second.zip");

        archive(&proj, &first).unwrap();
        archive(&proj, &second).unwrap();

        assert_eq!(names(&first), names(&second));
    }

    #[test]
    fn test_existing_destination_is_overwritten() {
        let dir = tempdir().unwrap();
        let proj = sample_project(dir.path());
        let out = dir.path().join("out.zip");
        fs::write(&out, "not a zip at all").unwrap();

        archive(&proj, &out).unwrap();

        assert_eq!(names(&out).len(), 4);
    }

    #[test]
    fn test_destination_inside_source_is_skipped() {
        let dir = tempdir().unwrap();
        let proj = sample_project(dir.path());
        let out = proj.join("self.zip");

        archive(&proj, &out).unwrap();

        assert!(!names(&out).iter().any(|name| name.ends_with("self.zip")));
    }

    #[test]
    fn test_same_named_file_elsewhere_in_source_is_kept() {
        let dir = tempdir().unwrap();
        let proj = sample_project(dir.path());
        fs::write(proj.join("sub/self.zip"), "not the archive").unwrap();
        let out = proj.join("self.zip");

        archive(&proj, &out).unwrap();

        let entries = read_entries(&out);
        let kept: Vec<_> = entries
            .iter()
            .filter(|entry| entry.0.ends_with("self.zip"))
            .collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].0, "proj/sub/self.zip");
        assert_eq!(kept[0].3, b"not the archive");
    }

    #[test]
    fn test_missing_source_is_stat_error() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.zip");
        let err = archive(&dir.path().join("absent"), &out).unwrap_err();
        assert!(matches!(err, ArchiveError::Stat { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_destination_parent_is_open_error() {
        let dir = tempdir().unwrap();
        let proj = sample_project(dir.path());
        let out = dir.path().join("no/such/dir/out.zip");
        let err = archive(&proj, &out).unwrap_err();
        assert!(matches!(err, ArchiveError::DestinationOpen { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_named_by_position_with_target_content() {
        let dir = tempdir().unwrap();
        let shared = dir.path().join("shared");
        fs::create_dir(&shared).unwrap();
        fs::write(shared.join("real.txt"), "shared bytes").unwrap();
        let proj = dir.path().join("proj");
        fs::create_dir(&proj).unwrap();
        std::os::unix::fs::symlink("../shared/real.txt", proj.join("link.txt")).unwrap();
        let out = dir.path().join("out.zip");

        archive(&proj, &out).unwrap();

        let entries = read_entries(&out);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].0, "proj/link.txt");
        assert_eq!(entries[1].3, b"shared bytes");
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_aborts_but_archive_is_finalized() {
        let dir = tempdir().unwrap();
        let proj = dir.path().join("proj");
        fs::create_dir(&proj).unwrap();
        fs::write(proj.join("a.txt"), "kept").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), proj.join("dangling")).unwrap();
        let out = dir.path().join("out.zip");

        let err = archive(&proj, &out).unwrap_err();
        assert!(matches!(err, ArchiveError::SymlinkResolution { .. }));

        // The partial archive was still closed properly and can be read.
        assert_eq!(names(&out), vec!["proj/", "proj/a.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_permissions_are_recorded() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let script = dir.path().join("run.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        let out = dir.path().join("out.zip");

        archive(&script, &out).unwrap();

        let mut zip = ZipArchive::new(File::open(&out).unwrap()).unwrap();
        let entry = zip.by_index(0).unwrap();
        assert_eq!(entry.unix_mode().map(|mode| mode & 0o777), Some(0o755));
    }

    #[cfg(unix)]
    #[test]
    fn test_special_files_are_skipped() {
        use std::os::unix::net::UnixListener;
        let dir = tempdir().unwrap();
        let proj = dir.path().join("proj");
        fs::create_dir(&proj).unwrap();
        fs::write(proj.join("a.txt"), "a").unwrap();
        let _listener = UnixListener::bind(proj.join("sock")).unwrap();
        let out = dir.path().join("out.zip");

        let summary = archive_with_progress(&proj, &out, |_| {}).unwrap();

        assert_eq!(names(&out), vec!["proj/", "proj/a.txt"]);
        assert_eq!(
            summary,
            ArchiveSummary {
                entries: 2,
                directories: 1,
                files: 1,
                bytes: 1,
            }
        );
    }

    // Linux filesystems accept arbitrary bytes in names; macOS does not.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_name_aborts_with_naming_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;
        let dir = tempdir().unwrap();
        let proj = dir.path().join("proj");
        fs::create_dir(&proj).unwrap();
        fs::write(proj.join("a.txt"), "a").unwrap();
        fs::write(proj.join(OsStr::from_bytes(b"bad\xff")), "b").unwrap();
        fs::write(proj.join("c.txt"), "c").unwrap();
        let out = dir.path().join("out.zip");

        let err = archive(&proj, &out).unwrap_err();

        assert!(matches!(err, ArchiveError::Naming { .. }));
        assert!(err.to_string().contains("not valid UTF-8"));
        // Nothing after the failing node was written.
        assert_eq!(names(&out), vec!["proj/", "proj/a.txt"]);
    }
}
