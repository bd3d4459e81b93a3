//! The glob entry points.

use std::{collections::VecDeque, path::PathBuf};

use futures::{Stream, TryStreamExt};
use globwise_ignore::IgnoreRules;
use globwise_walk::{Entry, Walker};
use tracing::{debug, instrument, trace};

use crate::{
	filter::{ignore_rules, ignore_rules_sync, native_ignores, EntryFilter},
	input::checked,
	tasks::{plan, plan_sync, GlobTask},
	Error, Options, Patterns,
};

fn walker(task: &GlobTask) -> Result<Walker, Error> {
	Walker::new(
		&task.patterns,
		&task.options.ignore,
		&task.options.cwd,
		&task.options.engine,
	)
	.map_err(Error::from)
}

/// Matches patterns, blocking, and returns the matching entries.
#[instrument(level = "debug", skip_all)]
pub fn glob_entries_sync<P>(patterns: P, options: &Options) -> Result<Vec<Entry>, Error>
where
	P: TryInto<Patterns>,
	P::Error: Into<Error>,
{
	let patterns = checked(patterns)?;
	let cwd = options.resolve_cwd_sync()?;
	let rules = ignore_rules_sync(options, &cwd)?;
	let tasks = plan_sync(patterns, options, &cwd, &native_ignores(rules.as_ref()));

	let mut filter = EntryFilter::new(rules);
	let mut entries = Vec::new();
	for task in &tasks {
		for entry in walker(task)? {
			let entry = entry?;
			if filter.keep(&entry) {
				entries.push(entry);
			}
		}
	}

	debug!(matches = entries.len(), "glob done");
	Ok(entries)
}

/// Matches patterns and returns the matching entries.
///
/// Patterns and the working directory are checked before any other work is done.
#[instrument(level = "debug", skip_all)]
pub async fn glob_entries<P>(patterns: P, options: &Options) -> Result<Vec<Entry>, Error>
where
	P: TryInto<Patterns>,
	P::Error: Into<Error>,
{
	let patterns = checked(patterns)?;
	let cwd = options.resolve_cwd().await?;
	let rules = ignore_rules(options, &cwd).await?;
	let tasks = plan(patterns, options, &cwd, &native_ignores(rules.as_ref())).await;

	let mut filter = EntryFilter::new(rules);
	let mut entries = Vec::new();
	for task in &tasks {
		let mut walker = walker(task)?;
		while let Some(entry) = walker.next_async().await {
			let entry = entry?;
			if filter.keep(&entry) {
				entries.push(entry);
			}
		}
	}

	debug!(matches = entries.len(), "glob done");
	Ok(entries)
}

/// Matches patterns, blocking, and returns the matching paths.
pub fn glob_sync<P>(patterns: P, options: &Options) -> Result<Vec<String>, Error>
where
	P: TryInto<Patterns>,
	P::Error: Into<Error>,
{
	glob_entries_sync(patterns, options).map(paths)
}

/// Matches patterns and returns the matching paths.
pub async fn glob<P>(patterns: P, options: &Options) -> Result<Vec<String>, Error>
where
	P: TryInto<Patterns>,
	P::Error: Into<Error>,
{
	glob_entries(patterns, options).await.map(paths)
}

fn paths(entries: Vec<Entry>) -> Vec<String> {
	entries.into_iter().map(|entry| entry.path).collect()
}

enum State {
	Start {
		patterns: Vec<String>,
		options: Options,
		cwd: PathBuf,
	},
	Running {
		tasks: VecDeque<GlobTask>,
		walker: Option<Walker>,
		filter: EntryFilter,
	},
	Done,
}

impl State {
	async fn start(patterns: Vec<String>, options: &Options, cwd: PathBuf) -> Result<Self, Error> {
		let rules: Option<IgnoreRules> = ignore_rules(options, &cwd).await?;
		let tasks = plan(patterns, options, &cwd, &native_ignores(rules.as_ref())).await;
		Ok(Self::Running {
			tasks: tasks.into(),
			walker: None,
			filter: EntryFilter::new(rules),
		})
	}

	async fn advance(self) -> Option<(Result<Entry, Error>, Self)> {
		let mut state = self;
		loop {
			match state {
				Self::Done => return None,
				Self::Start {
					patterns,
					options,
					cwd,
				} => match Self::start(patterns, &options, cwd).await {
					Ok(next) => state = next,
					Err(err) => return Some((Err(err), Self::Done)),
				},
				Self::Running {
					mut tasks,
					walker: None,
					filter,
				} => {
					let Some(task) = tasks.pop_front() else {
						trace!("stream done");
						return None;
					};

					match walker(&task) {
						Ok(walker) => {
							state = Self::Running {
								tasks,
								walker: Some(walker),
								filter,
							};
						}
						Err(err) => return Some((Err(err), Self::Done)),
					}
				}
				Self::Running {
					tasks,
					walker: Some(mut walker),
					mut filter,
				} => match walker.next_async().await {
					Some(Ok(entry)) => {
						let keep = filter.keep(&entry);
						let next = Self::Running {
							tasks,
							walker: Some(walker),
							filter,
						};

						if keep {
							return Some((Ok(entry), next));
						}
						state = next;
					}
					Some(Err(err)) => return Some((Err(err.into()), Self::Done)),
					None => {
						state = Self::Running {
							tasks,
							walker: None,
							filter,
						};
					}
				},
			}
		}
	}
}

/// Matches patterns lazily, yielding entries as they're found.
///
/// Patterns and the working directory are checked when the stream is created; everything else
/// happens as it's polled, one task at a time. The first error ends the stream.
pub fn glob_entries_stream<P>(
	patterns: P,
	options: &Options,
) -> Result<impl Stream<Item = Result<Entry, Error>> + Send, Error>
where
	P: TryInto<Patterns>,
	P::Error: Into<Error>,
{
	let patterns = checked(patterns)?;
	let cwd = options.resolve_cwd_sync()?;
	let start = State::Start {
		patterns,
		options: options.clone(),
		cwd,
	};

	Ok(futures::stream::unfold(start, State::advance))
}

/// Matches patterns lazily, yielding paths as they're found.
pub fn glob_stream<P>(
	patterns: P,
	options: &Options,
) -> Result<impl Stream<Item = Result<String, Error>> + Send, Error>
where
	P: TryInto<Patterns>,
	P::Error: Into<Error>,
{
	Ok(glob_entries_stream(patterns, options)?.map_ok(|entry| entry.path))
}

/// Returns whether any of the patterns needs matching, rather than naming a path literally.
pub fn is_dynamic_pattern<P>(patterns: P, options: &Options) -> Result<bool, Error>
where
	P: TryInto<Patterns>,
	P::Error: Into<Error>,
{
	let patterns = checked(patterns)?;
	options.resolve_cwd_sync()?;
	Ok(patterns
		.iter()
		.any(|pattern| globwise_walk::is_dynamic_pattern(pattern, &options.engine)))
}

/// Rules from `.gitignore` files in and below the working directory, and above it up to the root
/// of the repository, blocking.
pub fn is_git_ignored_sync(options: &Options) -> Result<IgnoreRules, Error> {
	let cwd = options.resolve_cwd_sync()?;
	Ok(globwise_ignore::is_git_ignored_sync(
		options.resolve_options(&cwd),
	)?)
}

/// Rules from `.gitignore` files in and below the working directory, and above it up to the root
/// of the repository.
///
/// ```no_run
/// # async fn example() -> Result<(), globwise::Error> {
/// use globwise::{is_git_ignored, Options};
///
/// let rules = is_git_ignored(&Options::default().cwd("/path/to/repo")).await?;
/// if rules.is_ignored("target/debug/app") {
/// 	println!("ignored");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn is_git_ignored(options: &Options) -> Result<IgnoreRules, Error> {
	let cwd = options.resolve_cwd().await?;
	Ok(globwise_ignore::is_git_ignored(options.resolve_options(&cwd)).await?)
}

/// Rules from ignore files matching `patterns` in and below the working directory, blocking.
pub fn is_ignored_by_ignore_files_sync<P>(patterns: P, options: &Options) -> Result<IgnoreRules, Error>
where
	P: TryInto<Patterns>,
	P::Error: Into<Error>,
{
	let patterns = checked(patterns)?;
	let cwd = options.resolve_cwd_sync()?;
	let mut resolve = options.resolve_options(&cwd);
	resolve.parent_file_name = None;
	Ok(globwise_ignore::is_ignored_by_ignore_files_sync(
		&patterns, &resolve,
	)?)
}

/// Rules from ignore files matching `patterns` in and below the working directory.
pub async fn is_ignored_by_ignore_files<P>(
	patterns: P,
	options: &Options,
) -> Result<IgnoreRules, Error>
where
	P: TryInto<Patterns>,
	P::Error: Into<Error>,
{
	let patterns = checked(patterns)?;
	let cwd = options.resolve_cwd().await?;
	let mut resolve = options.resolve_options(&cwd);
	resolve.parent_file_name = None;
	Ok(globwise_ignore::is_ignored_by_ignore_files(&patterns, &resolve).await?)
}
