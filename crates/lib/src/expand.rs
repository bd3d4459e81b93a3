//! Directory expansion.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use globwise_walk::{blocking, FileKind, FileSystem, SharedFileSystem};
use tracing::{debug, trace};

/// What to match inside an expanded directory.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Filters<'a> {
	pub files: &'a [String],
	pub extensions: &'a [String],
}

impl Filters<'_> {
	fn extensions(&self) -> String {
		match self.extensions {
			[single] => single.clone(),
			many => format!("{{{}}}", many.join(",")),
		}
	}

	/// The patterns replacing a directory pattern.
	fn globs(&self, dir: &str) -> Vec<String> {
		match (self.files.is_empty(), self.extensions.is_empty()) {
			(false, false) => self
				.files
				.iter()
				.map(|file| {
					if has_extension(file) {
						posix_join(dir, &format!("**/{file}"))
					} else {
						posix_join(dir, &format!("**/{file}.{}", self.extensions()))
					}
				})
				.collect(),
			(false, true) => self
				.files
				.iter()
				.map(|file| posix_join(dir, &format!("**/{file}")))
				.collect(),
			(true, false) => vec![posix_join(dir, &format!("**/*.{}", self.extensions()))],
			(true, true) => vec![posix_join(dir, "**")],
		}
	}
}

fn has_extension(file: &str) -> bool {
	Path::new(file).extension().is_some()
}

/// Joins two `/`-separated paths, resolving `.` and `..` segments lexically.
fn posix_join(base: &str, rest: &str) -> String {
	let absolute = base.starts_with('/');
	let mut out: Vec<&str> = Vec::new();
	for segment in base.split('/').chain(rest.split('/')) {
		match segment {
			"" | "." => {}
			".." => match out.last() {
				Some(&last) if last != ".." => {
					out.pop();
				}
				_ if absolute => {}
				_ => out.push(".."),
			},
			segment => out.push(segment),
		}
	}

	let joined = out.join("/");
	if absolute {
		format!("/{joined}")
	} else if joined.is_empty() {
		".".into()
	} else {
		joined
	}
}

fn target(cwd: &Path, pattern: &str) -> PathBuf {
	cwd.join(pattern.strip_prefix('!').unwrap_or(pattern))
}

fn is_dir(fs: &dyn FileSystem, path: &Path) -> bool {
	fs.metadata(path)
		.is_ok_and(|stats| stats.kind == FileKind::Dir)
}

fn assemble(patterns: &[String], dirs: &[bool], filters: Filters<'_>) -> Vec<String> {
	patterns
		.iter()
		.zip(dirs)
		.flat_map(|(pattern, &dir)| {
			if dir {
				let globs = filters.globs(pattern);
				trace!(?pattern, ?globs, "expanded directory");
				globs
			} else {
				vec![pattern.clone()]
			}
		})
		.collect()
}

/// Replaces patterns naming existing directories with patterns matching inside them, blocking.
pub(crate) fn expand_sync(
	fs: &dyn FileSystem,
	cwd: &Path,
	patterns: &[String],
	filters: Filters<'_>,
) -> Vec<String> {
	let dirs: Vec<bool> = patterns
		.iter()
		.map(|pattern| is_dir(fs, &target(cwd, pattern)))
		.collect();
	assemble(patterns, &dirs, filters)
}

/// Replaces patterns naming existing directories with patterns matching inside them.
pub(crate) async fn expand(
	fs: &SharedFileSystem,
	cwd: &Path,
	patterns: &[String],
	filters: Filters<'_>,
) -> Vec<String> {
	let dirs = join_all(patterns.iter().map(|pattern| {
		let path = target(cwd, pattern);
		async move {
			blocking(fs, move |fs| Ok(is_dir(fs, &path)))
				.await
				.unwrap_or_else(|err| {
					debug!(%err, "directory check failed");
					false
				})
		}
	}))
	.await;
	assemble(patterns, &dirs, filters)
}
