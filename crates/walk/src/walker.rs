//! The directory walker.
//!
//! A [`Walker`] is a step machine: it decides what to emit and which directory to read next, and a
//! driver performs the reads. The blocking driver is the [`Iterator`] implementation, the async
//! driver is [`Walker::next_async`], and [`Walker::into_stream`] wraps the latter. All three make
//! the same decisions in the same order, so they produce identical results.

use std::{
	collections::{HashSet, VecDeque},
	io,
	path::{Path, PathBuf},
};

use futures::Stream;
use normalize_path::NormalizePath;
use tracing::{debug, trace, trace_span};

use crate::{
	error::Error,
	fs::{self as walkfs, FileKind, FileSystem, Stats},
	matcher::Matcher,
	options::EngineOptions,
	pattern::{join_reported, segments, Split},
};

/// A matched filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
	/// The file name.
	pub name: String,

	/// The path as reported: relative to the working directory (or absolute, if the pattern or the
	/// `absolute` option made it so), with `/` separators.
	pub path: String,

	/// The kind of entry. Followed symlinks report their target's kind.
	pub kind: FileKind,

	/// Whether the entry is a symbolic link.
	pub symlink: bool,

	/// Metadata, if `stats` was requested and the entry could be stat-ed.
	pub stats: Option<Stats>,
}

impl Entry {
	/// The identity of this entry: its path without any trailing `/`.
	#[must_use]
	pub fn key(&self) -> &str {
		self.path.strip_suffix('/').unwrap_or(&self.path)
	}
}

/// A listed directory entry, after symlink resolution.
#[derive(Debug)]
pub(crate) struct Listed {
	name: String,
	kind: FileKind,
	symlink: bool,
	stats: Option<Stats>,
	target: Option<PathBuf>,
}

/// Lists a directory, sorted by name, resolving symlinks if asked to.
pub(crate) fn read_directory(
	fs: &dyn FileSystem,
	dir: &Path,
	follow: bool,
	stats: bool,
) -> io::Result<Vec<Listed>> {
	let mut entries = fs.read_dir(dir)?;
	entries.sort_by(|a, b| a.name.cmp(&b.name));

	Ok(entries
		.into_iter()
		.map(|entry| {
			let path = dir.join(&entry.name);
			let symlink = entry.kind == FileKind::Symlink;
			let mut kind = entry.kind;
			let mut resolved = None;
			let mut target = None;

			if symlink && follow {
				match fs.metadata(&path) {
					Ok(meta) => {
						kind = meta.kind;
						if kind == FileKind::Dir {
							target = fs.canonicalize(&path).ok();
						}
						resolved = Some(meta);
					}
					Err(err) => trace!(?path, %err, "broken symlink"),
				}
			}

			let stats = if stats {
				resolved.or_else(|| fs.symlink_metadata(&path).ok())
			} else {
				None
			};

			Listed {
				name: entry.name,
				kind,
				symlink,
				stats,
				target,
			}
		})
		.collect())
}

#[derive(Debug)]
struct IgnoreMatcher {
	matcher: Matcher,
	absolute: bool,
}

#[derive(Debug)]
struct Group {
	base: String,
	dir: PathBuf,
	matchers: Vec<Matcher>,
}

#[derive(Debug)]
struct Pending {
	dir: PathBuf,
	rel: Vec<String>,
	depth: usize,
}

#[derive(Debug)]
struct Cursor {
	group: Group,
	queue: VecDeque<Pending>,
}

#[derive(Debug)]
enum Step {
	Emit(Entry),
	Read(PathBuf),
	Done,
}

/// Walks directories and yields entries matching a set of patterns.
#[derive(Debug)]
pub struct Walker {
	cwd: PathBuf,
	options: EngineOptions,
	ignores: Vec<IgnoreMatcher>,
	groups: VecDeque<Group>,
	current: Option<Cursor>,
	ready: VecDeque<Entry>,
	emitted: HashSet<String>,
	visited: HashSet<PathBuf>,
}

fn compile(pattern: &str, parts: &[&str], case_sensitive: bool) -> Result<Matcher, Error> {
	Matcher::compile(parts, case_sensitive).map_err(|err| Error::Glob {
		pattern: pattern.into(),
		err,
	})
}

impl Walker {
	/// Prepares a walk.
	///
	/// Patterns are relative to `cwd` unless absolute. Patterns starting with `!` are added to the
	/// ignore list. Entries matching an ignore pattern are never reported, and ignored directories
	/// are not descended into. Nothing is read until the walker is driven.
	pub fn new(
		patterns: &[String],
		ignore: &[String],
		cwd: &Path,
		options: &EngineOptions,
	) -> Result<Self, Error> {
		let _span = trace_span!("walker", ?cwd).entered();
		let case_sensitive = options.case_sensitive_match;

		let mut ignores = Vec::new();
		let mut groups: Vec<Group> = Vec::new();

		let negated = patterns.iter().filter_map(|p| p.strip_prefix('!'));
		for pattern in ignore.iter().map(String::as_str).chain(negated) {
			if pattern.is_empty() {
				continue;
			}

			let absolute = pattern.starts_with('/');
			let matcher = Matcher::compile_full(pattern, case_sensitive).map_err(|err| Error::Glob {
				pattern: pattern.into(),
				err,
			})?;
			ignores.push(IgnoreMatcher { matcher, absolute });
		}

		for pattern in patterns.iter().filter(|p| !p.starts_with('!')) {
			let pattern = if options.base_name_match && !pattern.contains('/') {
				format!("**/{pattern}")
			} else {
				pattern.clone()
			};

			let split = Split::new(&pattern);
			if split.rest.is_empty() {
				trace!(?pattern, "pattern names no entries");
				continue;
			}

			let matcher = compile(&pattern, &split.rest, case_sensitive)?;
			if let Some(group) = groups.iter_mut().find(|g| g.base == split.base) {
				group.matchers.push(matcher);
			} else {
				let dir = if split.base.is_empty() {
					cwd.to_path_buf()
				} else {
					cwd.join(&split.base)
				};

				groups.push(Group {
					base: split.base,
					dir,
					matchers: vec![matcher],
				});
			}
		}

		debug!(groups = groups.len(), ignores = ignores.len(), "prepared walk");
		Ok(Self {
			cwd: cwd.to_path_buf(),
			options: options.clone(),
			ignores,
			groups: groups.into(),
			current: None,
			ready: VecDeque::new(),
			emitted: HashSet::new(),
			visited: HashSet::new(),
		})
	}

	fn step(&mut self) -> Step {
		loop {
			if let Some(entry) = self.ready.pop_front() {
				return Step::Emit(entry);
			}

			if let Some(pending) = self.current.as_ref().and_then(|c| c.queue.front()) {
				return Step::Read(pending.dir.clone());
			}

			let Some(group) = self.groups.pop_front() else {
				self.current = None;
				return Step::Done;
			};

			trace!(base = ?group.base, "starting group");
			let start = Pending {
				dir: group.dir.clone(),
				rel: Vec::new(),
				depth: 0,
			};
			self.current = Some(Cursor {
				group,
				queue: VecDeque::from([start]),
			});
		}
	}

	fn feed(&mut self, listing: io::Result<Vec<Listed>>) -> Result<(), Error> {
		let Some(mut cursor) = self.current.take() else {
			return Ok(());
		};
		let Some(pending) = cursor.queue.pop_front() else {
			self.current = Some(cursor);
			return Ok(());
		};

		match listing {
			Ok(entries) => self.visit(&mut cursor, &pending, entries),
			Err(err) if err.kind() == io::ErrorKind::NotFound => {
				trace!(dir = ?pending.dir, "directory does not exist");
			}
			Err(err) if self.options.suppress_errors => {
				debug!(dir = ?pending.dir, %err, "suppressed read error");
			}
			Err(err) => {
				self.groups.clear();
				return Err(Error::Read {
					path: pending.dir,
					err,
				});
			}
		}

		self.current = Some(cursor);
		Ok(())
	}

	fn visit(&mut self, cursor: &mut Cursor, pending: &Pending, entries: Vec<Listed>) {
		let dot = self.options.dot;
		for listed in entries {
			let mut rel = pending.rel.clone();
			rel.push(listed.name.clone());
			let reported = join_reported(&cursor.group.base, &rel);

			if self.is_ignored(&reported) {
				trace!(path = ?reported, "ignored");
				continue;
			}

			let parts: Vec<&str> = rel.iter().map(String::as_str).collect();
			let matched = self.options.emits(listed.kind)
				&& cursor
					.group
					.matchers
					.iter()
					.any(|m| m.is_match(&parts, dot));
			let descend = listed.kind == FileKind::Dir
				&& self.options.may_descend(pending.depth + 1)
				&& cursor
					.group
					.matchers
					.iter()
					.any(|m| m.could_descend(&parts, dot));

			if matched {
				let entry = self.entry(reported, &listed);
				if self.emitted.insert(entry.key().to_owned()) {
					self.ready.push_back(entry);
				}
			}

			if !descend {
				continue;
			}

			if let Some(target) = &listed.target {
				if !self.visited.insert(target.clone()) {
					trace!(?target, "symlink target already visited");
					continue;
				}
			}

			cursor.queue.push_back(Pending {
				dir: pending.dir.join(&listed.name),
				rel,
				depth: pending.depth + 1,
			});
		}
	}

	fn absolute(&self, reported: &str) -> String {
		self.cwd
			.join(reported)
			.normalize()
			.to_string_lossy()
			.into_owned()
	}

	fn is_ignored(&self, reported: &str) -> bool {
		if self.ignores.is_empty() {
			return false;
		}

		let (_, relative) = segments(reported);
		let absolute = if self.ignores.iter().any(|i| i.absolute) {
			self.absolute(reported)
		} else {
			String::new()
		};
		let (_, absolute) = segments(&absolute);

		self.ignores.iter().any(|ignore| {
			let path = if ignore.absolute {
				&absolute
			} else {
				&relative
			};
			ignore.matcher.is_match(path, true)
		})
	}

	fn entry(&self, reported: String, listed: &Listed) -> Entry {
		let mut path = if self.options.absolute {
			self.absolute(&reported)
		} else {
			reported
		};

		if self.options.mark_directories && listed.kind == FileKind::Dir {
			path.push('/');
		}

		Entry {
			name: listed.name.clone(),
			path,
			kind: listed.kind,
			symlink: listed.symlink,
			stats: listed.stats.clone(),
		}
	}

	/// Yields the next entry, reading directories on tokio's blocking pool.
	pub async fn next_async(&mut self) -> Option<Result<Entry, Error>> {
		loop {
			match self.step() {
				Step::Emit(entry) => return Some(Ok(entry)),
				Step::Done => return None,
				Step::Read(dir) => {
					let follow = self.options.follow_symbolic_links;
					let stats = self.options.stats;
					let listing = walkfs::blocking(&self.options.fs, move |fs| {
						read_directory(fs, &dir, follow, stats)
					})
					.await;

					if let Err(err) = self.feed(listing) {
						return Some(Err(err));
					}
				}
			}
		}
	}

	/// Turns the walker into a stream, driven by [`next_async`](Self::next_async).
	pub fn into_stream(self) -> impl Stream<Item = Result<Entry, Error>> + Send {
		futures::stream::unfold(self, |mut walker| async move {
			walker.next_async().await.map(|item| (item, walker))
		})
	}
}

impl Iterator for Walker {
	type Item = Result<Entry, Error>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			match self.step() {
				Step::Emit(entry) => return Some(Ok(entry)),
				Step::Done => return None,
				Step::Read(dir) => {
					let listing = read_directory(
						self.options.fs.as_ref(),
						&dir,
						self.options.follow_symbolic_links,
						self.options.stats,
					);

					if let Err(err) = self.feed(listing) {
						return Some(Err(err));
					}
				}
			}
		}
	}
}
