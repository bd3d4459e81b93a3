//! Find the root of the repository a path is in.
//!
//! The root is the nearest directory, starting at the path itself and walking up, which contains a
//! marker entry (`.git` by default). The marker may be a directory or a file: worktrees and
//! submodules use a `.git` file pointing elsewhere, and those count too.
//!
//! A [`Locator`] remembers the answer for every directory it walks through, so repeated lookups
//! from the same tree are cheap. There is no invalidation: create a new locator to observe changes
//! on disk.

#![warn(clippy::unwrap_used, missing_docs)]
#![deny(rust_2018_idioms)]

use std::{
	env,
	path::{Path, PathBuf},
};

use dashmap::DashMap;
use globwise_walk::fs::{self as walkfs, FileSystem, SharedFileSystem};
use normalize_path::NormalizePath;
use tracing::{debug, instrument, trace};

/// The conventional repository marker.
pub const MARKER: &str = ".git";

/// Finds repository roots, caching answers per directory.
#[derive(Debug)]
pub struct Locator {
	marker: String,
	fs: SharedFileSystem,
	cache: DashMap<PathBuf, Option<PathBuf>>,
}

impl Default for Locator {
	fn default() -> Self {
		Self::new(walkfs::real())
	}
}

/// Directories still to check, and the answer found in the cache above them, if any.
struct Plan {
	chain: Vec<PathBuf>,
	cached: Option<Option<PathBuf>>,
}

fn scan(fs: &dyn FileSystem, chain: &[PathBuf], marker: &str) -> Option<usize> {
	chain.iter().position(|dir| {
		let candidate = dir.join(marker);
		match fs.symlink_metadata(&candidate) {
			Ok(_) => true,
			Err(err) => {
				trace!(?candidate, %err, "no marker");
				false
			}
		}
	})
}

/// Makes a path absolute against the process working directory, then normalises it lexically.
fn absolute(path: &Path) -> PathBuf {
	if path.is_absolute() {
		path.normalize()
	} else {
		env::current_dir()
			.map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
			.normalize()
	}
}

impl Locator {
	/// A locator for `.git` markers, reading through the given filesystem.
	#[must_use]
	pub fn new(fs: SharedFileSystem) -> Self {
		Self {
			marker: MARKER.into(),
			fs,
			cache: DashMap::new(),
		}
	}

	/// Looks for a different marker name.
	#[must_use]
	pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
		self.marker = marker.into();
		debug!(marker = ?self.marker, "locator: marker");
		self
	}

	fn plan(&self, path: &Path) -> Plan {
		let start = absolute(path);
		let mut chain = Vec::new();
		for dir in start.ancestors() {
			if let Some(cached) = self.cache.get(dir) {
				let root = cached.value().clone();
				trace!(?dir, ?root, "cached");
				return Plan {
					chain,
					cached: Some(root),
				};
			}
			chain.push(dir.to_path_buf());
		}

		Plan {
			chain,
			cached: None,
		}
	}

	fn settle(&self, plan: Plan, found: Option<usize>) -> Option<PathBuf> {
		let Plan { mut chain, cached } = plan;
		let root = match found {
			Some(index) => {
				chain.truncate(index + 1);
				chain.last().cloned()
			}
			None => cached.flatten(),
		};

		for dir in chain {
			self.cache.insert(dir, root.clone());
		}

		debug!(?root, "located repository root");
		root
	}

	/// Finds the repository root for a path, blocking.
	#[instrument(level = "trace", skip(self))]
	pub fn find_sync(&self, path: &Path) -> Option<PathBuf> {
		let plan = self.plan(path);
		let found = scan(self.fs.as_ref(), &plan.chain, &self.marker);
		self.settle(plan, found)
	}

	/// Finds the repository root for a path.
	///
	/// Marker checks run on tokio's blocking pool; the answer is always the same as
	/// [`find_sync`](Self::find_sync).
	#[instrument(level = "trace", skip(self))]
	pub async fn find(&self, path: &Path) -> Option<PathBuf> {
		let plan = self.plan(path);
		let chain = plan.chain.clone();
		let marker = self.marker.clone();
		let found = walkfs::blocking(&self.fs, move |fs| Ok(scan(fs, &chain, &marker)))
			.await
			.unwrap_or_else(|err| {
				debug!(%err, "marker scan failed");
				None
			});
		self.settle(plan, found)
	}
}

/// Finds the `.git` root for a path, blocking, without keeping a cache.
#[must_use]
pub fn find_sync(fs: SharedFileSystem, path: &Path) -> Option<PathBuf> {
	Locator::new(fs).find_sync(path)
}

/// Finds the `.git` root for a path, without keeping a cache.
pub async fn find(fs: SharedFileSystem, path: &Path) -> Option<PathBuf> {
	Locator::new(fs).find(path).await
}
