// src/intake.rs
//! Reads files from disk into a session. Anything that cannot be read as text
//! is reported and never attached.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::path_tree::normalize;
use crate::session::Session;

pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".git", "target", "node_modules", ".vscode", ".idea",
    ".github", "dist", "build", "out", "__pycache__",
    ".pytest_cache", ".mypy_cache", ".tox", ".eggs",
    "*.egg-info", ".ipynb_checkpoints", "venv", "env", ".env",
];

pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[
    "exe", "dll", "so", "dylib", "o", "obj", "a",
    "lib", "bin", "png", "jpg", "jpeg", "gif",
    "svg", "ico", "woff", "woff2", "ttf", "eot",
    "pyc", "pyd", "pyo", "class", "jar",
];

/// Directory names and file extensions skipped while walking a directory.
///
/// A directory pattern starting with `*` matches by suffix (`*.egg-info`),
/// anything else must match the whole name. Files named explicitly are never
/// filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeFilter {
    pub excluded_dirs: Vec<String>,
    pub excluded_extensions: Vec<String>,
}

impl Default for IntakeFilter {
    fn default() -> Self {
        Self {
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            excluded_extensions: DEFAULT_EXCLUDED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl IntakeFilter {
    pub fn excludes_dir(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|excluded| match excluded.strip_prefix('*') {
            Some(suffix) => name.ends_with(suffix),
            None => name == excluded,
        })
    }

    pub fn excludes_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| {
                self.excluded_extensions
                    .iter()
                    .any(|excluded| excluded.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}

/// Outcome of adding one or more paths to a session.
#[derive(Debug, Default)]
pub struct IntakeReport {
    pub added: Vec<String>,
    pub duplicates: Vec<String>,
    pub failures: Vec<Error>,
}

impl IntakeReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The key a file is attached under: its absolute, normalized,
/// `/`-separated path.
pub fn attachment_key(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(normalize(&absolute.to_string_lossy()))
}

/// Reads a single text file, returning its attachment key and content.
pub fn read_attachment(path: &Path) -> Result<(String, String)> {
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|_| Error::NotUtf8 {
        path: path.to_path_buf(),
    })?;
    Ok((attachment_key(path)?, content))
}

fn attach_file(session: &mut Session, path: &Path, report: &mut IntakeReport) {
    match read_attachment(path) {
        Ok((key, content)) => {
            if session.add(key.clone(), content) {
                report.added.push(key);
            } else {
                report.duplicates.push(key);
            }
        }
        Err(e) => {
            debug!("Skipping unreadable file: {}", e);
            report.failures.push(e);
        }
    }
}

fn attach_directory(
    session: &mut Session,
    dir: &Path,
    filter: &IntakeFilter,
    report: &mut IntakeReport,
) {
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !filter.excludes_dir(&entry.file_name().to_string_lossy())
        });

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                if filter.excludes_file(entry.path()) {
                    continue;
                }
                attach_file(session, entry.path(), report);
            }
            Ok(_) => {}
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                let error = Error::Io {
                    path,
                    source: e.into(),
                };
                debug!("Skipping unreadable entry: {}", error);
                report.failures.push(error);
            }
        }
    }
}

/// Attaches every given path. Files are read directly; directories are walked
/// recursively, honoring `filter`.
pub fn intake_paths(session: &mut Session, paths: &[PathBuf], filter: &IntakeFilter) -> IntakeReport {
    let mut report = IntakeReport::default();

    for path in paths {
        if path.is_dir() {
            attach_directory(session, path, filter, &mut report);
        } else {
            attach_file(session, path, &mut report);
        }
    }

    info!(
        "Attached {} file(s), {} duplicate(s), {} failure(s).",
        report.added.len(),
        report.duplicates.len(),
        report.failures.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_filter_matches_names_and_suffixes() {
        let filter = IntakeFilter::default();
        assert!(filter.excludes_dir("target"));
        assert!(filter.excludes_dir("my_pkg.egg-info"));
        assert!(!filter.excludes_dir("rebuild"));
        assert!(filter.excludes_file(Path::new("logo.PNG")));
        assert!(!filter.excludes_file(Path::new("main.rs")));
        assert!(!filter.excludes_file(Path::new("Makefile")));
    }

    #[test]
    fn test_read_attachment_returns_absolute_key() {
        let temp_dir = TempDir::new().unwrap();
        let file = write(temp_dir.path(), "a.txt", b"hello");

        let (key, content) = read_attachment(&file).unwrap();
        assert_eq!(content, "hello");
        assert!(key.ends_with("/a.txt"));
        assert_eq!(key, normalize(&key));
    }

    #[test]
    fn test_missing_file_is_reported_not_added() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = Session::default();

        let report = intake_paths(
            &mut session,
            &[temp_dir.path().join("nope.txt")],
            &IntakeFilter::default(),
        );
        assert!(matches!(report.failures.as_slice(), [Error::Io { .. }]));
        assert!(session.attachments().is_empty());
    }

    #[test]
    fn test_binary_file_is_reported_not_added() {
        let temp_dir = TempDir::new().unwrap();
        let file = write(temp_dir.path(), "blob.dat", &[0xff, 0xfe, 0x00, 0x80]);
        let mut session = Session::default();

        let report = intake_paths(&mut session, &[file], &IntakeFilter::default());
        assert!(matches!(report.failures.as_slice(), [Error::NotUtf8 { .. }]));
        assert!(session.attachments().is_empty());
    }

    #[test]
    fn test_directory_walk_skips_excluded_entries() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "src/main.rs", b"fn main() {}");
        write(root, "src/lib.rs", b"");
        write(root, "target/debug/out.rs", b"generated");
        write(root, "assets/logo.png", b"not really a png");
        write(root, "README.md", b"# readme");

        let mut session = Session::default();
        let report = intake_paths(&mut session, &[root.to_path_buf()], &IntakeFilter::default());

        assert!(report.is_clean());
        let names: Vec<&str> = session
            .attachments()
            .iter()
            .map(|a| a.path.rsplit('/').next().unwrap())
            .collect();
        assert_eq!(names, vec!["README.md", "lib.rs", "main.rs"]);
    }

    #[test]
    fn test_adding_same_file_twice_is_a_duplicate() {
        let temp_dir = TempDir::new().unwrap();
        let file = write(temp_dir.path(), "a.txt", b"one");
        let mut session = Session::default();

        intake_paths(&mut session, &[file.clone()], &IntakeFilter::default());
        fs::write(&file, "two").unwrap();
        let report = intake_paths(&mut session, &[file], &IntakeFilter::default());

        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(session.attachments()[0].content, "one");
    }
}
