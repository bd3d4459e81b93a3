//! Configuration for the glob entry points.

use std::{
	env,
	path::{Path, PathBuf},
};

use globwise_ignore::{ResolveOptions, GITIGNORE};
use globwise_walk::{blocking, EngineOptions, FileKind, FileSystem, SharedFileSystem};
use normalize_path::NormalizePath;
use tracing::debug;
use url::Url;

use crate::Error;

/// How bare directory patterns are expanded.
///
/// When enabled, a pattern naming an existing directory is rewritten to match files inside it:
/// `src` becomes `src/**`, or with `files` and `extensions` set, `src/**/name.{ext,ext}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpandDirectories {
	/// Patterns are passed to the engine as they are.
	Disabled,

	/// Directory patterns are expanded.
	Enabled {
		/// Only match these file names inside expanded directories.
		files: Vec<String>,

		/// Only match these extensions inside expanded directories.
		extensions: Vec<String>,
	},
}

impl Default for ExpandDirectories {
	fn default() -> Self {
		Self::Enabled {
			files: Vec::new(),
			extensions: Vec::new(),
		}
	}
}

impl From<bool> for ExpandDirectories {
	fn from(enabled: bool) -> Self {
		if enabled {
			Self::default()
		} else {
			Self::Disabled
		}
	}
}

impl From<Vec<String>> for ExpandDirectories {
	fn from(files: Vec<String>) -> Self {
		Self::Enabled {
			files,
			extensions: Vec::new(),
		}
	}
}

impl From<Vec<&str>> for ExpandDirectories {
	fn from(files: Vec<&str>) -> Self {
		Self::from(strings(files))
	}
}

impl From<(Vec<String>, Vec<String>)> for ExpandDirectories {
	fn from((files, extensions): (Vec<String>, Vec<String>)) -> Self {
		Self::Enabled { files, extensions }
	}
}

impl From<(Vec<&str>, Vec<&str>)> for ExpandDirectories {
	fn from((files, extensions): (Vec<&str>, Vec<&str>)) -> Self {
		Self::Enabled {
			files: strings(files),
			extensions: strings(extensions),
		}
	}
}

fn strings<I, S>(list: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	list.into_iter().map(Into::into).collect()
}

/// Options for the glob entry points.
///
/// Fields are public, but the methods are more convenient, and each calls `debug!` on the new
/// value, giving a quick insight into what an application sets.
///
/// ```
/// use globwise::Options;
///
/// let options = Options::default()
/// 	.cwd("/path/to/project")
/// 	.gitignore(true)
/// 	.ignore(["**/target"])
/// 	.absolute(true);
/// ```
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Options {
	/// The directory patterns are relative to. Defaults to the process working directory, read
	/// once per call.
	pub cwd: Option<PathBuf>,

	/// Extra ignore patterns, applied to every task.
	pub ignore: Vec<String>,

	/// Respect `.gitignore` files, including those above the working directory up to the root of
	/// the repository.
	pub gitignore: bool,

	/// Patterns naming other ignore files to respect, like `**/.eslintignore`.
	pub ignore_files: Vec<String>,

	/// Expand bare directory patterns. Enabled by default.
	pub expand_directories: ExpandDirectories,

	/// When every pattern is negated, match everything except them. Enabled by default; when
	/// disabled, such a pattern list matches nothing.
	pub expand_negation_only_patterns: bool,

	/// Options passed to the glob engine for every task.
	pub engine: EngineOptions,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			cwd: None,
			ignore: Vec::new(),
			gitignore: false,
			ignore_files: Vec::new(),
			expand_directories: ExpandDirectories::default(),
			expand_negation_only_patterns: true,
			engine: EngineOptions::default(),
		}
	}
}

impl Options {
	/// Set the working directory.
	#[must_use]
	pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
		let cwd = cwd.into();
		debug!(?cwd, "Options: cwd");
		self.cwd = Some(cwd);
		self
	}

	/// Set the working directory from a `file://` URL.
	pub fn cwd_url(self, url: &str) -> Result<Self, Error> {
		let path = Url::parse(url)
			.ok()
			.filter(|url| url.scheme() == "file")
			.and_then(|url| url.to_file_path().ok())
			.ok_or_else(|| Error::CwdUrl { url: url.into() })?;
		Ok(self.cwd(path))
	}

	/// Set the extra ignore patterns.
	#[must_use]
	pub fn ignore<I, S>(mut self, ignore: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let ignore = strings(ignore);
		debug!(?ignore, "Options: ignore");
		self.ignore = ignore;
		self
	}

	/// Respect `.gitignore` files.
	#[must_use]
	pub fn gitignore(mut self, enable: bool) -> Self {
		debug!(?enable, "Options: gitignore");
		self.gitignore = enable;
		self
	}

	/// Set patterns naming other ignore files to respect.
	#[must_use]
	pub fn ignore_files<I, S>(mut self, patterns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let patterns = strings(patterns);
		debug!(?patterns, "Options: ignore_files");
		self.ignore_files = patterns;
		self
	}

	/// Set how bare directory patterns are expanded.
	#[must_use]
	pub fn expand_directories(mut self, expand: impl Into<ExpandDirectories>) -> Self {
		let expand = expand.into();
		debug!(?expand, "Options: expand_directories");
		self.expand_directories = expand;
		self
	}

	/// Set whether negation-only pattern lists match everything else.
	#[must_use]
	pub fn expand_negation_only_patterns(mut self, enable: bool) -> Self {
		debug!(?enable, "Options: expand_negation_only_patterns");
		self.expand_negation_only_patterns = enable;
		self
	}

	/// Replace the engine options wholesale.
	#[must_use]
	pub fn engine(mut self, engine: EngineOptions) -> Self {
		debug!(?engine, "Options: engine");
		self.engine = engine;
		self
	}

	/// Only report files (the default), or any kind of entry.
	#[must_use]
	pub fn only_files(mut self, enable: bool) -> Self {
		debug!(?enable, "Options: only_files");
		self.engine.only_files = enable;
		self
	}

	/// Only report directories.
	#[must_use]
	pub fn only_directories(mut self, enable: bool) -> Self {
		debug!(?enable, "Options: only_directories");
		self.engine.only_directories = enable;
		self
	}

	/// Report absolute paths.
	#[must_use]
	pub fn absolute(mut self, enable: bool) -> Self {
		debug!(?enable, "Options: absolute");
		self.engine.absolute = enable;
		self
	}

	/// Append `/` to reported directories.
	#[must_use]
	pub fn mark_directories(mut self, enable: bool) -> Self {
		debug!(?enable, "Options: mark_directories");
		self.engine.mark_directories = enable;
		self
	}

	/// Attach metadata to entries.
	#[must_use]
	pub fn stats(mut self, enable: bool) -> Self {
		debug!(?enable, "Options: stats");
		self.engine.stats = enable;
		self
	}

	/// Limit how many directory levels are descended.
	#[must_use]
	pub fn deep(mut self, deep: Option<usize>) -> Self {
		debug!(?deep, "Options: deep");
		self.engine.deep = deep;
		self
	}

	/// Follow symlinked directories.
	#[must_use]
	pub fn follow_symbolic_links(mut self, enable: bool) -> Self {
		debug!(?enable, "Options: follow_symbolic_links");
		self.engine.follow_symbolic_links = enable;
		self
	}

	/// Skip unreadable directories and ignore files instead of failing.
	#[must_use]
	pub fn suppress_errors(mut self, enable: bool) -> Self {
		debug!(?enable, "Options: suppress_errors");
		self.engine.suppress_errors = enable;
		self
	}

	/// Let wildcards match dot entries.
	#[must_use]
	pub fn dot(mut self, enable: bool) -> Self {
		debug!(?enable, "Options: dot");
		self.engine.dot = enable;
		self
	}

	/// Match case-sensitively (the default).
	#[must_use]
	pub fn case_sensitive_match(mut self, enable: bool) -> Self {
		debug!(?enable, "Options: case_sensitive_match");
		self.engine.case_sensitive_match = enable;
		self
	}

	/// Match slash-less patterns against names at any depth.
	#[must_use]
	pub fn base_name_match(mut self, enable: bool) -> Self {
		debug!(?enable, "Options: base_name_match");
		self.engine.base_name_match = enable;
		self
	}

	/// Read from another filesystem.
	#[must_use]
	pub fn fs(mut self, fs: SharedFileSystem) -> Self {
		debug!(?fs, "Options: fs");
		self.engine.fs = fs;
		self
	}

	/// The absolute working directory for one call.
	///
	/// A working directory which exists but isn't a directory is an error. One which doesn't
	/// exist is not: it simply has no matches.
	pub(crate) fn resolve_cwd_sync(&self) -> Result<PathBuf, Error> {
		let cwd = self.absolute_cwd()?;
		check_cwd(self.engine.fs.as_ref(), &cwd)?;
		Ok(cwd)
	}

	/// The absolute working directory for one call, checked on tokio's blocking pool.
	///
	/// See [`resolve_cwd_sync`](Self::resolve_cwd_sync).
	pub(crate) async fn resolve_cwd(&self) -> Result<PathBuf, Error> {
		let cwd = self.absolute_cwd()?;
		let path = cwd.clone();
		blocking(&self.engine.fs, move |fs| Ok(check_cwd(fs, &path)))
			.await
			.unwrap_or_else(|err| {
				debug!(%err, "working directory check failed");
				Ok(())
			})?;
		Ok(cwd)
	}

	fn absolute_cwd(&self) -> Result<PathBuf, Error> {
		Ok(match &self.cwd {
			Some(cwd) if cwd.is_absolute() => cwd.clone(),
			Some(cwd) => env::current_dir().map_err(Error::CurrentDir)?.join(cwd),
			None => env::current_dir().map_err(Error::CurrentDir)?,
		}
		.normalize())
	}

	/// Whether any ignore files are consulted.
	pub(crate) fn uses_ignore_files(&self) -> bool {
		self.gitignore || !self.ignore_files.is_empty()
	}

	/// Patterns naming the ignore files to consult.
	pub(crate) fn ignore_file_patterns(&self) -> Vec<String> {
		let mut patterns = self.ignore_files.clone();
		if self.gitignore {
			let gitignore = format!("**/{GITIGNORE}");
			if !patterns.contains(&gitignore) {
				patterns.push(gitignore);
			}
		}
		patterns
	}

	pub(crate) fn resolve_options(&self, cwd: &Path) -> ResolveOptions {
		let mut options = ResolveOptions::new(cwd);
		options.fs = self.engine.fs.clone();
		options.suppress_errors = self.engine.suppress_errors;
		options.deep = self.engine.deep;
		options.follow_symbolic_links = self.engine.follow_symbolic_links;
		options.parent_file_name = self.gitignore.then(|| GITIGNORE.into());
		options
	}
}

fn check_cwd(fs: &dyn FileSystem, cwd: &Path) -> Result<(), Error> {
	match fs.metadata(cwd) {
		Ok(stats) if stats.kind != FileKind::Dir => Err(Error::CwdNotDirectory { path: cwd.into() }),
		_ => Ok(()),
	}
}
