#![allow(dead_code)]

use std::{
	fs, io,
	path::{Path, PathBuf},
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
};

use futures::TryStreamExt;
use globwise::{
	glob, glob_stream, glob_sync, DirEntry, Error, FileSystem, Options, Patterns, Stats,
};
use tempfile::TempDir;

pub fn tracing_init() {
	use tracing_subscriber::{
		fmt::{format::FmtSpan, Subscriber},
		util::SubscriberInitExt,
		EnvFilter,
	};
	Subscriber::builder()
		.pretty()
		.with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
		.with_env_filter(EnvFilter::from_default_env())
		.finish()
		.try_init()
		.ok();
}

/// Creates a temporary tree of files. Paths ending in `/` are directories; a file contains its
/// own path.
pub fn tree(paths: &[&str]) -> TempDir {
	tracing_init();
	let dir = tempfile::tempdir().expect("creating tempdir");
	for path in paths {
		write(dir.path(), path, path);
	}
	dir
}

pub fn write(root: &Path, path: &str, content: &str) {
	let full = root.join(path);
	if path.ends_with('/') {
		fs::create_dir_all(&full).expect("creating dir");
	} else {
		if let Some(parent) = full.parent() {
			fs::create_dir_all(parent).expect("creating parent");
		}
		fs::write(&full, content).expect("writing file");
	}
}

/// The five-file fixture most tests run against.
pub fn tmp_files() -> TempDir {
	tree(&["a.tmp", "b.tmp", "c.tmp", "d.tmp", "e.tmp"])
}

pub fn options(cwd: &Path) -> Options {
	Options::default().cwd(cwd)
}

/// Runs the patterns through every entry point, checks they agree, and returns the paths.
pub async fn all_drivers(patterns: &[&str], options: &Options) -> Vec<String> {
	let sync = glob_sync(patterns.to_vec(), options).expect("glob_sync");
	let future = glob(patterns.to_vec(), options).await.expect("glob");
	let stream: Vec<String> = glob_stream(patterns.to_vec(), options)
		.expect("glob_stream")
		.try_collect()
		.await
		.expect("draining glob_stream");

	assert_eq!(sync, future, "sync and async disagree");
	assert_eq!(sync, stream, "sync and stream disagree");
	sync
}

pub fn sorted(mut list: Vec<String>) -> Vec<String> {
	list.sort();
	list
}

/// A filesystem which records being touched, and fails every call.
#[derive(Debug, Default)]
pub struct Untouchable {
	touched: AtomicBool,
}

impl Untouchable {
	pub fn shared() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn touched(&self) -> bool {
		self.touched.load(Ordering::SeqCst)
	}

	fn touch(&self, path: &Path) -> io::Error {
		self.touched.store(true, Ordering::SeqCst);
		io::Error::other(format!("touched {}", path.display()))
	}
}

impl FileSystem for Untouchable {
	fn metadata(&self, path: &Path) -> io::Result<Stats> {
		Err(self.touch(path))
	}

	fn symlink_metadata(&self, path: &Path) -> io::Result<Stats> {
		Err(self.touch(path))
	}

	fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
		Err(self.touch(path))
	}

	fn read_to_string(&self, path: &Path) -> io::Result<String> {
		Err(self.touch(path))
	}

	fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
		Err(self.touch(path))
	}
}

pub fn is_invalid_patterns<T: std::fmt::Debug>(result: Result<T, Error>) -> bool {
	match result {
		Err(err @ Error::InvalidPatterns) => {
			err.to_string() == "Patterns must be a string (non empty) or an array of strings"
		}
		other => panic!("expected invalid patterns, got {other:?}"),
	}
}

pub fn is_cwd_not_directory<T: std::fmt::Debug>(result: Result<T, Error>, path: &Path) -> bool {
	match &result {
		Err(err @ Error::CwdNotDirectory { path: got }) => {
			got == path && err.to_string() == "The `cwd` option must be a path to a directory"
		}
		other => panic!("expected cwd error, got {other:?}"),
	}
}

pub fn patterns(list: &[&str]) -> Patterns {
	Patterns::from(list)
}
