//! Rule rebasing and evaluation.

use std::{
	fmt,
	path::{Component, Path, PathBuf},
};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use normalize_path::NormalizePath;
use tracing::{debug, trace, trace_span};
use url::Url;

use crate::{Error, IgnoreFile};

/// Rebases a rule from an ignore file onto the rule root.
///
/// `base` is the directory of the ignore file relative to the rule root, with `/` separators, and
/// empty when they're the same. Rules with no slash other than a trailing one match at any depth
/// below their file, so they get a `**/`; other rules are anchored to their file's directory.
#[must_use]
pub fn rebase(rule: &str, base: &str) -> String {
	if base.is_empty() {
		return rule.to_owned();
	}

	let (negation, body) = match rule.strip_prefix('!') {
		Some(body) => ("!", body),
		None => ("", rule),
	};

	let anchored = body.trim_end_matches('/').contains('/');
	if anchored {
		format!("{negation}{base}/{}", body.trim_start_matches('/'))
	} else {
		format!("{negation}{base}/**/{body}")
	}
}

/// Parses the content of an ignore file into rebased rules.
///
/// Blank lines and comments are dropped.
#[must_use]
pub fn parse(content: &str, base: &str) -> Vec<String> {
	content
		.lines()
		.map(|line| line.trim_end_matches('\r'))
		.filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
		.map(|line| rebase(line, base))
		.collect()
}

fn posix(path: &Path) -> String {
	path.components()
		.filter_map(|c| match c {
			Component::Normal(part) => Some(part.to_string_lossy()),
			_ => None,
		})
		.collect::<Vec<_>>()
		.join("/")
}

/// A compiled set of ignore rules, usable as a path predicate.
#[derive(Clone)]
pub struct IgnoreRules {
	cwd: PathBuf,
	root: PathBuf,
	rules: Vec<String>,
	negated: bool,
	gitignore: Gitignore,
}

impl fmt::Debug for IgnoreRules {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut s = f.debug_struct("IgnoreRules");
		s.field("cwd", &self.cwd)
			.field("root", &self.root)
			.field("rules", &self.rules)
			.field("negated", &self.negated);

		#[cfg(feature = "full_debug")]
		s.field("gitignore", &self.gitignore);

		s.finish_non_exhaustive()
	}
}

impl IgnoreRules {
	/// Rules that ignore nothing.
	#[must_use]
	pub fn empty(cwd: impl Into<PathBuf>) -> Self {
		let cwd = cwd.into();
		Self {
			root: cwd.clone(),
			cwd,
			rules: Vec::new(),
			negated: false,
			gitignore: Gitignore::empty(),
		}
	}

	/// Compiles the contents of ignore files, in order.
	///
	/// `root` is the directory rules are made relative to: the working directory, or the
	/// repository root when ignore files above the working directory are involved.
	pub fn compile(
		cwd: &Path,
		root: &Path,
		files: &[(IgnoreFile, String)],
	) -> Result<Self, Error> {
		let _span = trace_span!("compile_rules", ?cwd, ?root).entered();
		let mut builder = GitignoreBuilder::new(root);
		let mut rules = Vec::new();

		for (file, content) in files {
			let base = file
				.applies_in
				.strip_prefix(root)
				.map(posix)
				.unwrap_or_default();
			trace!(?file, ?base, "loading ignore file");

			for rule in parse(content, &base) {
				trace!(?rule, "adding ignore rule");
				builder
					.add_line(Some(file.path.clone()), &rule)
					.map_err(|err| Error::Glob {
						file: Some(file.path.clone()),
						err,
					})?;
				rules.push(rule);
			}
		}

		let gitignore = builder
			.build()
			.map_err(|err| Error::Glob { file: None, err })?;
		let negated = rules.iter().any(|rule| rule.starts_with('!'));

		debug!(
			files = files.len(),
			ignores = gitignore.num_ignores(),
			allows = gitignore.num_whitelists(),
			"ignore rules compiled"
		);

		Ok(Self {
			cwd: cwd.to_owned(),
			root: root.to_owned(),
			rules,
			negated,
			gitignore,
		})
	}

	/// The rebased rules, in evaluation order.
	#[must_use]
	pub fn rules(&self) -> &[String] {
		&self.rules
	}

	/// Whether there are no rules at all.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// The directory rules are relative to.
	#[must_use]
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Checks a path given as a string.
	///
	/// Relative paths are resolved against the working directory; absolute paths and `file://`
	/// URLs are taken as they are. A trailing `/` marks a directory. Paths outside the working
	/// directory are never ignored.
	#[must_use]
	pub fn is_ignored(&self, path: &str) -> bool {
		let is_dir = path.ends_with('/');
		let path = if path.starts_with("file://") {
			match Url::parse(path).map(|url| url.to_file_path()) {
				Ok(Ok(path)) => path,
				_ => {
					trace!(?path, "not a file url");
					return false;
				}
			}
		} else {
			PathBuf::from(path)
		};

		self.matches(&path, is_dir)
	}

	/// Checks a path, relative to the working directory or absolute.
	#[must_use]
	pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
		if self.rules.is_empty() {
			return false;
		}

		let path = self.cwd.join(dunce::simplified(path)).normalize();
		match path.strip_prefix(&self.cwd) {
			Ok(rel) if rel.as_os_str().is_empty() => return false,
			Ok(_) => {}
			Err(_) => {
				trace!(?path, "outside working directory");
				return false;
			}
		}

		let Ok(rel) = path.strip_prefix(&self.root) else {
			return false;
		};

		let mut prefix = PathBuf::new();
		let mut components = rel.components().peekable();
		while let Some(component) = components.next() {
			if components.peek().is_none() {
				break;
			}

			prefix.push(component);
			if self.gitignore.matched(&prefix, true).is_ignore() {
				trace!(?path, parent = ?prefix, "parent directory ignored");
				return true;
			}
		}

		let ignored = self.gitignore.matched(rel, is_dir).is_ignore();
		trace!(?path, ?ignored, "checked");
		ignored
	}

	/// Rules the glob engine can apply directly, pruning traversal.
	///
	/// Only available when no rule is negated and every rule is relative to the working
	/// directory: otherwise pruning could drop paths a later rule re-includes.
	#[must_use]
	pub fn native_patterns(&self) -> Option<Vec<String>> {
		if self.negated || self.root != self.cwd {
			return None;
		}

		let mut patterns = Vec::with_capacity(self.rules.len() * 2);
		for rule in &self.rules {
			let dir_only = rule.ends_with('/');
			let body = rule.trim_end_matches('/');
			let anchored = body.trim_start_matches('/').contains('/') || body.starts_with('/');
			let body = body.trim_start_matches('/');
			if body.is_empty() {
				continue;
			}

			let body = if anchored {
				body.to_owned()
			} else {
				format!("**/{body}")
			};

			if !dir_only {
				patterns.push(body.clone());
			}
			patterns.push(format!("{body}/**"));
		}

		Some(patterns)
	}
}
