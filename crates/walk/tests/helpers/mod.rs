#![allow(dead_code)]

use std::{fs, path::Path};

use globwise_walk::Entry;
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

/// Creates a temporary tree. Paths ending in `/` are directories, others are files.
pub fn tree(paths: &[&str]) -> TempDir {
	tracing_init();
	let dir = tempfile::tempdir().expect("creating tempdir");
	populate(dir.path(), paths);
	dir
}

pub fn populate(root: &Path, paths: &[&str]) {
	for path in paths {
		let full = root.join(path);
		if path.ends_with('/') {
			fs::create_dir_all(&full).expect("creating dir");
		} else {
			if let Some(parent) = full.parent() {
				fs::create_dir_all(parent).expect("creating parent");
			}
			fs::write(&full, path).expect("writing file");
		}
	}
}

pub fn strings(list: &[&str]) -> Vec<String> {
	list.iter().map(|s| (*s).to_string()).collect()
}

pub fn paths(entries: Vec<Entry>) -> Vec<String> {
	entries.into_iter().map(|e| e.path).collect()
}
