//! Planning glob tasks.
//!
//! The glob engine has no notion of ordered negation: it takes a set of patterns and an ignore
//! list, and matches the union of the patterns minus the ignore list. To get "a negation applies
//! to every pattern before it, and to none after it", the pattern list is split at each negation
//! into tasks, each with its own ignore list:
//!
//! - the positive patterns between two negations become one task, ignoring the negation that
//!   closes it;
//! - each negation is also added to the ignore list of every task before it;
//! - patterns after the last negation become a final task with only the base ignore list.
//!
//! Running the tasks in order and keeping the first occurrence of each path gives the ordered
//! semantics.

use std::{
	collections::HashSet,
	path::{Path, PathBuf},
};

use globwise_walk::EngineOptions;
use tracing::{debug, instrument, trace};

use crate::{
	expand::{expand, expand_sync, Filters},
	input::checked,
	pattern::{
		adjust_ignore_patterns_for_parent_directories, is_negative, normalize_absolute_patterns,
		normalize_directory_pattern,
	},
	Error, ExpandDirectories, Options, Patterns,
};

/// The positive pattern a negation-only pattern list is matched against.
pub const CATCH_ALL: &str = "**/*";

/// One run of the glob engine.
#[derive(Clone, Debug)]
pub struct GlobTask {
	/// Patterns to match, none of them negated.
	pub patterns: Vec<String>,

	/// How to run them.
	pub options: TaskOptions,
}

/// The options of a [`GlobTask`].
#[derive(Clone, Debug)]
pub struct TaskOptions {
	/// The absolute working directory.
	pub cwd: PathBuf,

	/// Patterns whose matches are dropped, and whose matching directories are not walked.
	pub ignore: Vec<String>,

	/// Everything else the engine needs.
	pub engine: EngineOptions,
}

impl GlobTask {
	fn new(patterns: Vec<String>, ignore: Vec<String>, cwd: &Path, engine: &EngineOptions) -> Self {
		Self {
			patterns,
			options: TaskOptions {
				cwd: cwd.into(),
				ignore,
				engine: engine.clone(),
			},
		}
	}
}

fn dedupe(patterns: Vec<String>) -> Vec<String> {
	let mut seen = HashSet::new();
	patterns
		.into_iter()
		.filter(|pattern| seen.insert(pattern.clone()))
		.collect()
}

/// Splits patterns into tasks at each negation.
fn split(
	patterns: Vec<String>,
	options: &Options,
	cwd: &Path,
	extra_ignore: &[String],
) -> Vec<GlobTask> {
	let mut patterns = dedupe(patterns);
	if !patterns.is_empty() && patterns.iter().all(|p| is_negative(p)) {
		if !options.expand_negation_only_patterns {
			debug!("only negated patterns, nothing to match");
			return Vec::new();
		}

		patterns.insert(0, CATCH_ALL.into());
	}

	let patterns = normalize_absolute_patterns(
		patterns
			.into_iter()
			.map(|pattern| match pattern.strip_prefix('!') {
				Some(body) => format!("!{}", normalize_directory_pattern(body)),
				None => pattern,
			})
			.collect(),
	);

	let base: Vec<String> = options
		.ignore
		.iter()
		.map(|pattern| normalize_directory_pattern(pattern))
		.chain(extra_ignore.iter().cloned())
		.collect();

	let mut tasks: Vec<GlobTask> = Vec::new();
	let mut segment = Vec::new();
	for pattern in patterns {
		let Some(negation) = pattern.strip_prefix('!') else {
			segment.push(pattern);
			continue;
		};

		for task in &mut tasks {
			task.options.ignore.push(negation.to_owned());
		}

		if !segment.is_empty() {
			let mut ignore = base.clone();
			ignore.push(negation.to_owned());
			tasks.push(GlobTask::new(
				std::mem::take(&mut segment),
				ignore,
				cwd,
				&options.engine,
			));
		}
	}

	if !segment.is_empty() {
		tasks.push(GlobTask::new(segment, base, cwd, &options.engine));
	}

	tasks
}

fn adjust(mut task: GlobTask) -> GlobTask {
	task.options.ignore =
		adjust_ignore_patterns_for_parent_directories(&task.patterns, &task.options.ignore);
	trace!(patterns = ?task.patterns, ignore = ?task.options.ignore, "planned task");
	task
}

fn filters(options: &Options) -> Option<Filters<'_>> {
	match &options.expand_directories {
		ExpandDirectories::Disabled => None,
		ExpandDirectories::Enabled { files, extensions } => Some(Filters { files, extensions }),
	}
}

/// Plans tasks, blocking on directory expansion.
///
/// `extra_ignore` is added to the base ignore list as it is.
pub(crate) fn plan_sync(
	patterns: Vec<String>,
	options: &Options,
	cwd: &Path,
	extra_ignore: &[String],
) -> Vec<GlobTask> {
	let tasks = split(patterns, options, cwd, extra_ignore);
	let tasks: Vec<GlobTask> = match filters(options) {
		None => tasks.into_iter().map(adjust).collect(),
		Some(filters) => {
			let fs = options.engine.fs.as_ref();
			tasks
				.into_iter()
				.map(|mut task| {
					task.patterns = expand_sync(fs, cwd, &task.patterns, filters);
					task.options.ignore =
						expand_sync(fs, cwd, &task.options.ignore, Filters::default());
					adjust(task)
				})
				.collect()
		}
	};

	debug!(tasks = tasks.len(), "planned glob tasks");
	tasks
}

/// Plans tasks.
pub(crate) async fn plan(
	patterns: Vec<String>,
	options: &Options,
	cwd: &Path,
	extra_ignore: &[String],
) -> Vec<GlobTask> {
	let tasks = split(patterns, options, cwd, extra_ignore);
	let tasks: Vec<GlobTask> = match filters(options) {
		None => tasks.into_iter().map(adjust).collect(),
		Some(filters) => {
			let fs = &options.engine.fs;
			let mut expanded = Vec::with_capacity(tasks.len());
			for mut task in tasks {
				task.patterns = expand(fs, cwd, &task.patterns, filters).await;
				task.options.ignore = expand(fs, cwd, &task.options.ignore, Filters::default()).await;
				expanded.push(adjust(task));
			}
			expanded
		}
	};

	debug!(tasks = tasks.len(), "planned glob tasks");
	tasks
}

/// Plans the glob engine runs for a pattern list, blocking.
///
/// This is what the glob entry points run, exposed for tools which drive their own engine. Ignore
/// files are not consulted here: they're applied to the results.
pub fn generate_glob_tasks_sync<P>(patterns: P, options: &Options) -> Result<Vec<GlobTask>, Error>
where
	P: TryInto<Patterns>,
	P::Error: Into<Error>,
{
	let patterns = checked(patterns)?;
	let cwd = options.resolve_cwd_sync()?;
	Ok(plan_sync(patterns, options, &cwd, &[]))
}

/// Plans the glob engine runs for a pattern list.
///
/// Patterns are checked before anything else happens.
#[instrument(level = "debug", skip_all)]
pub async fn generate_glob_tasks<P>(patterns: P, options: &Options) -> Result<Vec<GlobTask>, Error>
where
	P: TryInto<Patterns>,
	P::Error: Into<Error>,
{
	let patterns = checked(patterns)?;
	let cwd = options.resolve_cwd().await?;
	Ok(plan(patterns, options, &cwd, &[]).await)
}
