//! Filesystem capabilities.
//!
//! The walker never touches `std::fs` directly: everything goes through a [`FileSystem`], which
//! callers can implement to serve files from somewhere else (an archive, memory, a test double).
//! Every method has a default that uses the real filesystem, so an implementation only needs to
//! override the capabilities it actually provides.

use std::{
	fmt, fs, io,
	path::{Path, PathBuf},
	sync::Arc,
	time::SystemTime,
};

/// The kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
	/// A regular file.
	File,

	/// A directory.
	Dir,

	/// A symbolic link which was not (or could not be) followed.
	Symlink,

	/// Anything else: sockets, pipes, devices…
	Other,
}

impl From<fs::FileType> for FileKind {
	fn from(ft: fs::FileType) -> Self {
		if ft.is_symlink() {
			Self::Symlink
		} else if ft.is_dir() {
			Self::Dir
		} else if ft.is_file() {
			Self::File
		} else {
			Self::Other
		}
	}
}

/// Metadata about a filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
	/// What kind of entry this is.
	pub kind: FileKind,

	/// Size in bytes.
	pub len: u64,

	/// Last modification time, if the platform reports one.
	pub modified: Option<SystemTime>,

	/// Whether the entry is read-only.
	pub readonly: bool,
}

impl From<fs::Metadata> for Stats {
	fn from(meta: fs::Metadata) -> Self {
		Self {
			kind: meta.file_type().into(),
			len: meta.len(),
			modified: meta.modified().ok(),
			readonly: meta.permissions().readonly(),
		}
	}
}

/// A directory listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
	/// The file name, without any leading path.
	pub name: String,

	/// The kind of the entry, as reported by the listing (symlinks are not followed).
	pub kind: FileKind,
}

impl DirEntry {
	/// Convenience constructor.
	pub fn new(name: impl Into<String>, kind: FileKind) -> Self {
		Self {
			name: name.into(),
			kind,
		}
	}
}

/// Read-only filesystem capabilities.
///
/// Implementations must be shareable across threads: the async drivers run these calls on
/// tokio's blocking pool.
pub trait FileSystem: fmt::Debug + Send + Sync {
	/// Metadata for a path, following symlinks.
	fn metadata(&self, path: &Path) -> io::Result<Stats> {
		fs::metadata(path).map(Stats::from)
	}

	/// Metadata for a path, without following symlinks.
	fn symlink_metadata(&self, path: &Path) -> io::Result<Stats> {
		fs::symlink_metadata(path).map(Stats::from)
	}

	/// Lists a directory. Order does not matter, the walker sorts listings.
	fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
		fs::read_dir(path)?
			.map(|entry| {
				let entry = entry?;
				Ok(DirEntry {
					name: entry.file_name().to_string_lossy().into_owned(),
					kind: entry.file_type()?.into(),
				})
			})
			.collect()
	}

	/// Reads a whole file as UTF-8.
	fn read_to_string(&self, path: &Path) -> io::Result<String> {
		fs::read_to_string(path)
	}

	/// Resolves a path to its canonical form, following symlinks.
	fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
		dunce::canonicalize(path)
	}
}

/// The real filesystem, with every capability left at its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {}

/// A shared handle to a filesystem implementation.
pub type SharedFileSystem = Arc<dyn FileSystem>;

/// A shared handle to the real filesystem.
#[must_use]
pub fn real() -> SharedFileSystem {
	Arc::new(RealFileSystem)
}

/// Runs filesystem calls on tokio's blocking pool.
///
/// This is how the async drivers reach a [`FileSystem`]: the trait is synchronous, and a single
/// implementation serves both the blocking and non-blocking entry points.
pub async fn blocking<T, F>(fs: &SharedFileSystem, call: F) -> io::Result<T>
where
	T: Send + 'static,
	F: FnOnce(&dyn FileSystem) -> io::Result<T> + Send + 'static,
{
	let fs = Arc::clone(fs);
	tokio::task::spawn_blocking(move || call(fs.as_ref()))
		.await
		.map_err(io::Error::other)?
}
