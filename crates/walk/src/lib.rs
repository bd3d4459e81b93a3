//! A breadth-first glob walker.
//!
//! This crate matches glob patterns against a directory tree, reading through a pluggable
//! [`FileSystem`]. Patterns are compiled segment by segment, so directories which can't contain a
//! match are never read, and an ignore list prunes whole subtrees.
//!
//! ```no_run
//! # use std::path::Path;
//! # use globwise_walk::{EngineOptions, glob_sync};
//! let entries = glob_sync(
//! 	&["src/**/*.rs".to_string()],
//! 	&["**/target/**".to_string()],
//! 	Path::new("."),
//! 	&EngineOptions::default(),
//! )?;
//!
//! for entry in entries {
//! 	println!("{}", entry.path);
//! }
//! # Ok::<(), globwise_walk::Error>(())
//! ```
//!
//! The [`Walker`] can also be driven asynchronously (directory reads then run on tokio's blocking
//! pool) or as a [`Stream`](futures::Stream).

#![warn(clippy::unwrap_used, missing_docs)]
#![deny(rust_2018_idioms)]

use std::path::Path;

#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use fs::{blocking, real, DirEntry, FileKind, FileSystem, RealFileSystem, SharedFileSystem, Stats};
#[doc(inline)]
pub use options::EngineOptions;
#[doc(inline)]
pub use pattern::{escape_path, is_dynamic_pattern};
#[doc(inline)]
pub use walker::{Entry, Walker};

mod error;
pub mod fs;
mod matcher;
mod options;
mod pattern;
mod walker;

/// Matches patterns under `cwd`, blocking.
pub fn glob_sync(
	patterns: &[String],
	ignore: &[String],
	cwd: &Path,
	options: &EngineOptions,
) -> Result<Vec<Entry>, Error> {
	Walker::new(patterns, ignore, cwd, options)?.collect()
}

/// Matches patterns under `cwd`.
pub async fn glob(
	patterns: &[String],
	ignore: &[String],
	cwd: &Path,
	options: &EngineOptions,
) -> Result<Vec<Entry>, Error> {
	let mut walker = Walker::new(patterns, ignore, cwd, options)?;
	let mut entries = Vec::new();
	while let Some(entry) = walker.next_async().await {
		entries.push(entry?);
	}
	Ok(entries)
}
