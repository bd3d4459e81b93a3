use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while resolving ignore files.
#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum Error {
	/// Error received when an [`IgnoreFile`] cannot be read.
	///
	/// Files that don't exist are skipped rather than reported. Suppressed by `suppress_errors`.
	///
	/// [`IgnoreFile`]: crate::IgnoreFile
	#[error("cannot read ignore '{file}': {err}")]
	#[diagnostic(code(globwise_ignore::read))]
	Read {
		/// The path to the erroring ignore file.
		file: PathBuf,

		/// The underlying error.
		#[source]
		err: std::io::Error,
	},

	/// Error received when a rule fails to compile.
	#[error("cannot parse glob from ignore '{file:?}': {err}")]
	#[diagnostic(code(globwise_ignore::glob))]
	Glob {
		/// The path to the erroring ignore file, if the error is tied to one.
		file: Option<PathBuf>,

		/// The underlying error.
		#[source]
		err: ignore::Error,
	},

	/// Error received while looking for ignore files.
	#[error(transparent)]
	#[diagnostic(transparent)]
	Walk(#[from] globwise_walk::Error),
}
