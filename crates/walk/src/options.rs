use crate::fs::{self, FileKind, SharedFileSystem};

/// Options controlling what the walker reports and how it traverses.
#[derive(Clone, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct EngineOptions {
	/// Only report regular files. Defaults to true.
	pub only_files: bool,

	/// Only report directories. Takes precedence over `only_files`.
	pub only_directories: bool,

	/// Report absolute paths instead of paths relative to the working directory.
	pub absolute: bool,

	/// Append a `/` to reported directories.
	pub mark_directories: bool,

	/// Populate [`Entry::stats`](crate::Entry::stats).
	pub stats: bool,

	/// Maximum number of directory levels to descend below a pattern's base directory.
	///
	/// `Some(0)` only lists the base directory itself. `None` is unlimited.
	pub deep: Option<usize>,

	/// Descend into symlinked directories and report symlinks as their targets. Defaults to true.
	pub follow_symbolic_links: bool,

	/// Skip unreadable directories instead of failing.
	pub suppress_errors: bool,

	/// Let wildcards match entries whose name starts with a dot.
	pub dot: bool,

	/// Match case-sensitively. Defaults to true.
	pub case_sensitive_match: bool,

	/// Match patterns without slashes against entry names at any depth.
	pub base_name_match: bool,

	/// The filesystem to read from.
	pub fs: SharedFileSystem,
}

impl Default for EngineOptions {
	fn default() -> Self {
		Self {
			only_files: true,
			only_directories: false,
			absolute: false,
			mark_directories: false,
			stats: false,
			deep: None,
			follow_symbolic_links: true,
			suppress_errors: false,
			dot: false,
			case_sensitive_match: true,
			base_name_match: false,
			fs: fs::real(),
		}
	}
}

impl EngineOptions {
	pub(crate) fn emits(&self, kind: FileKind) -> bool {
		if self.only_directories {
			kind == FileKind::Dir
		} else if self.only_files {
			kind == FileKind::File
		} else {
			true
		}
	}

	pub(crate) fn may_descend(&self, depth: usize) -> bool {
		self.deep.map_or(true, |deep| depth <= deep)
	}
}
