#![allow(dead_code)]

use std::{fs, path::Path};

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

/// Creates a temporary tree from `(path, content)` pairs. Paths ending in `/` are directories.
pub fn tree(entries: &[(&str, &str)]) -> TempDir {
	tracing_init();
	let dir = tempfile::tempdir().expect("creating tempdir");
	for (path, content) in entries {
		write(dir.path(), path, content);
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

pub fn strings(list: &[&str]) -> Vec<String> {
	list.iter().map(|s| (*s).to_string()).collect()
}
