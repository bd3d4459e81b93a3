//! Globwise: glob matching with ordered negations, directory expansion, and ignore files.
//!
//! Patterns are matched in order: a negated pattern (`!pattern`) removes matches of every pattern
//! before it, and none after it. Bare directory patterns are expanded to match the files inside,
//! `.gitignore` files (or any other ignore files) can be respected, and results are unique.
//!
//! The main entry points are [`glob()`], [`glob_sync()`], and [`glob_stream()`], which return
//! paths, and their `glob_entries` counterparts, which return [`Entry`] values with metadata. All
//! of them take patterns (anything convertible to [`Patterns`]) and [`Options`].
//!
//! It's recommended to use the [miette] erroring library in applications, but all errors implement
//! [`std::error::Error`] so your favourite error handling library can of course be used.
//!
//! ```no_run
//! use globwise::{glob, Options};
//! use miette::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//! 	let options = Options::default().cwd("/path/to/project").gitignore(true);
//! 	let paths = glob(["**/*.rs", "!**/generated/**"], &options).await?;
//! 	for path in paths {
//! 		println!("{path}");
//! 	}
//!
//! 	Ok(())
//! }
//! ```
//!
//! The library logs with [tracing]: planned tasks and configuration at debug level, and every
//! filtering decision at trace level.

#![warn(clippy::unwrap_used, missing_docs)]
#![deny(rust_2018_idioms)]

pub mod pattern;

mod error;
mod expand;
mod filter;
mod glob;
mod input;
mod options;
mod tasks;

#[doc(inline)]
pub use crate::{
	error::Error,
	glob::{
		glob, glob_entries, glob_entries_stream, glob_entries_sync, glob_stream, glob_sync,
		is_dynamic_pattern, is_git_ignored, is_git_ignored_sync, is_ignored_by_ignore_files,
		is_ignored_by_ignore_files_sync,
	},
	input::Patterns,
	options::{ExpandDirectories, Options},
	tasks::{generate_glob_tasks, generate_glob_tasks_sync, GlobTask, TaskOptions, CATCH_ALL},
};

#[doc(no_inline)]
pub use globwise_ignore::IgnoreRules;
#[doc(no_inline)]
pub use globwise_walk::{
	escape_path, DirEntry, EngineOptions, Entry, FileKind, FileSystem, RealFileSystem,
	SharedFileSystem, Stats,
};
