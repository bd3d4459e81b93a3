use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while compiling patterns or walking directories.
#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum Error {
	/// A directory could not be read.
	///
	/// Directories that don't exist are never reported; this is for permissions, a base path
	/// that is a file, and other I/O failures. Suppressed by `suppress_errors`.
	#[error("cannot read directory '{path}': {err}")]
	#[diagnostic(code(globwise_walk::read))]
	Read {
		/// The directory that failed.
		path: PathBuf,

		/// The underlying error.
		#[source]
		err: std::io::Error,
	},

	/// A pattern is not valid glob syntax.
	#[error("invalid glob '{pattern}': {err}")]
	#[diagnostic(code(globwise_walk::glob))]
	Glob {
		/// The offending pattern.
		pattern: String,

		/// The underlying error.
		#[source]
		err: globset::Error,
	},
}
