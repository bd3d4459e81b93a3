//! The unique and ignore filter applied to composed results.

use std::{collections::HashSet, path::Path};

use globwise_ignore::{resolve, resolve_sync, IgnoreRules};
use globwise_walk::{Entry, FileKind};
use tracing::trace;

use crate::{Error, Options};

/// Drops entries already seen, then entries the ignore files exclude.
///
/// An entry is recorded as seen the first time it comes through, whether or not it's then
/// ignored, so it can never be emitted by a later task either.
#[derive(Debug, Default)]
pub(crate) struct EntryFilter {
	seen: HashSet<String>,
	rules: Option<IgnoreRules>,
}

impl EntryFilter {
	pub(crate) fn new(rules: Option<IgnoreRules>) -> Self {
		Self {
			seen: HashSet::new(),
			rules: rules.filter(|rules| !rules.is_empty()),
		}
	}

	pub(crate) fn keep(&mut self, entry: &Entry) -> bool {
		let key = entry.key();
		if !self.seen.insert(key.to_owned()) {
			trace!(path = ?key, "duplicate");
			return false;
		}

		if let Some(rules) = &self.rules {
			if rules.matches(Path::new(key), entry.kind == FileKind::Dir) {
				trace!(path = ?key, "ignored by ignore files");
				return false;
			}
		}

		true
	}
}

/// Compiles the ignore files the options ask for, blocking.
pub(crate) fn ignore_rules_sync(options: &Options, cwd: &Path) -> Result<Option<IgnoreRules>, Error> {
	if !options.uses_ignore_files() {
		return Ok(None);
	}

	let rules = resolve_sync(&options.ignore_file_patterns(), &options.resolve_options(cwd))?;
	Ok(Some(rules))
}

/// Compiles the ignore files the options ask for.
pub(crate) async fn ignore_rules(options: &Options, cwd: &Path) -> Result<Option<IgnoreRules>, Error> {
	if !options.uses_ignore_files() {
		return Ok(None);
	}

	let rules = resolve(&options.ignore_file_patterns(), &options.resolve_options(cwd)).await?;
	Ok(Some(rules))
}

/// Ignore patterns the engine can apply itself, so ignored directories aren't walked.
pub(crate) fn native_ignores(rules: Option<&IgnoreRules>) -> Vec<String> {
	rules
		.and_then(IgnoreRules::native_patterns)
		.unwrap_or_default()
}
