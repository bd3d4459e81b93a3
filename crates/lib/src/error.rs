//! Errors.

use std::{convert::Infallible, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by the glob entry points.
///
/// Input errors ([`InvalidPatterns`](Error::InvalidPatterns),
/// [`CwdNotDirectory`](Error::CwdNotDirectory)) are raised before any matching, and are never
/// suppressed by `suppress_errors`, which only applies to reading the filesystem.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum Error {
	/// The patterns given were not a string or a list of strings, or contained an empty string.
	#[error("Patterns must be a string (non empty) or an array of strings")]
	#[diagnostic(code(globwise::invalid_patterns))]
	InvalidPatterns,

	/// The working directory exists, but is not a directory.
	#[error("The `cwd` option must be a path to a directory")]
	#[diagnostic(code(globwise::cwd_not_directory))]
	CwdNotDirectory {
		/// The offending path.
		path: PathBuf,
	},

	/// The working directory was given as a URL which doesn't name a local path.
	#[error("The `cwd` option must be a file URL or a path, got: {url}")]
	#[diagnostic(code(globwise::cwd_url))]
	CwdUrl {
		/// The offending URL.
		url: String,
	},

	/// The process working directory could not be obtained.
	#[error("cannot obtain the current directory: {0}")]
	#[diagnostic(code(globwise::current_dir))]
	CurrentDir(#[source] std::io::Error),

	/// Matching failed.
	#[error(transparent)]
	#[diagnostic(transparent)]
	Walk(#[from] globwise_walk::Error),

	/// Ignore files could not be resolved.
	#[error(transparent)]
	#[diagnostic(transparent)]
	Ignore(#[from] globwise_ignore::Error),
}

impl From<Infallible> for Error {
	fn from(never: Infallible) -> Self {
		match never {}
	}
}
