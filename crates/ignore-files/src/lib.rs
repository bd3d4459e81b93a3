//! Find, rebase, and evaluate layered ignore files.
//!
//! Ignore files are found by glob patterns under a working directory (`**/.gitignore`, or any
//! other name), and optionally in the directories between the working directory and the root of
//! the repository it's in. Their rules are rebased so that they're all relative to one directory,
//! then compiled into a single [`IgnoreRules`] predicate which follows layered ignore precedence:
//! a path inside an ignored directory is ignored, otherwise the last matching rule wins, so rules
//! from more deeply nested files override those from their parents.
//!
//! ```no_run
//! # async fn example() -> Result<(), globwise_ignore::Error> {
//! use globwise_ignore::{is_git_ignored, ResolveOptions};
//!
//! let rules = is_git_ignored(ResolveOptions::new("/path/to/project")).await?;
//! assert!(!rules.is_ignored("src/main.rs"));
//! # Ok(())
//! # }
//! ```

#![warn(clippy::unwrap_used, missing_docs)]
#![deny(rust_2018_idioms)]

use std::path::PathBuf;

use globwise_walk::{real, SharedFileSystem};
use tracing::instrument;

#[doc(inline)]
pub use discover::{discover, discover_sync, Discovered, SKIPPED_DIRS};
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use rules::{parse, rebase, IgnoreRules};

mod discover;
mod error;
mod rules;

/// The conventional repository ignore file.
pub const GITIGNORE: &str = ".gitignore";

/// An ignore file.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct IgnoreFile {
	/// The path to the ignore file.
	pub path: PathBuf,

	/// The directory its rules apply in.
	pub applies_in: PathBuf,
}

/// How to find and read ignore files.
#[derive(Clone, Debug)]
pub struct ResolveOptions {
	/// The working directory, which should be absolute.
	pub cwd: PathBuf,

	/// The filesystem to read from.
	pub fs: SharedFileSystem,

	/// Treat unreadable ignore files and directories as absent.
	pub suppress_errors: bool,

	/// How deep to look for ignore files below the working directory.
	pub deep: Option<usize>,

	/// Follow symlinked directories while looking for ignore files.
	pub follow_symbolic_links: bool,

	/// Also look for this file above the working directory, up to the repository root.
	pub parent_file_name: Option<String>,
}

impl ResolveOptions {
	/// Options for a working directory, with every other setting at its default.
	pub fn new(cwd: impl Into<PathBuf>) -> Self {
		Self {
			cwd: cwd.into(),
			fs: real(),
			suppress_errors: false,
			deep: None,
			follow_symbolic_links: true,
			parent_file_name: None,
		}
	}
}

/// Finds, reads, and compiles ignore files, blocking.
#[instrument(level = "debug", skip(options), fields(cwd = ?options.cwd))]
pub fn resolve_sync(patterns: &[String], options: &ResolveOptions) -> Result<IgnoreRules, Error> {
	let Discovered { root, files } = discover_sync(patterns, options)?;
	let contents = discover::read_sync(options.fs.as_ref(), files, options.suppress_errors)?;
	IgnoreRules::compile(&options.cwd, &root, &contents)
}

/// Finds, reads, and compiles ignore files.
#[instrument(level = "debug", skip(options), fields(cwd = ?options.cwd))]
pub async fn resolve(patterns: &[String], options: &ResolveOptions) -> Result<IgnoreRules, Error> {
	let Discovered { root, files } = discover(patterns, options).await?;
	let contents = discover::read(&options.fs, files, options.suppress_errors).await?;
	IgnoreRules::compile(&options.cwd, &root, &contents)
}

fn gitignore_options(mut options: ResolveOptions) -> ResolveOptions {
	options.parent_file_name = Some(GITIGNORE.into());
	options
}

fn gitignore_patterns() -> Vec<String> {
	vec![format!("**/{GITIGNORE}")]
}

/// Rules from `.gitignore` files in and below the working directory, and above it up to the
/// repository root, blocking.
pub fn is_git_ignored_sync(options: ResolveOptions) -> Result<IgnoreRules, Error> {
	resolve_sync(&gitignore_patterns(), &gitignore_options(options))
}

/// Rules from `.gitignore` files in and below the working directory, and above it up to the
/// repository root.
pub async fn is_git_ignored(options: ResolveOptions) -> Result<IgnoreRules, Error> {
	resolve(&gitignore_patterns(), &gitignore_options(options)).await
}

/// Rules from ignore files matching `patterns` in and below the working directory, blocking.
pub fn is_ignored_by_ignore_files_sync(
	patterns: &[String],
	options: &ResolveOptions,
) -> Result<IgnoreRules, Error> {
	resolve_sync(patterns, options)
}

/// Rules from ignore files matching `patterns` in and below the working directory.
pub async fn is_ignored_by_ignore_files(
	patterns: &[String],
	options: &ResolveOptions,
) -> Result<IgnoreRules, Error> {
	resolve(patterns, options).await
}
