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

/// A temporary tree with `repo/nested/deeper` and `outside/` directories.
pub fn layout() -> TempDir {
	tracing_init();
	let dir = tempfile::tempdir().expect("creating tempdir");
	fs::create_dir_all(dir.path().join("repo/nested/deeper")).expect("creating dirs");
	fs::create_dir_all(dir.path().join("outside")).expect("creating dirs");
	dir
}

pub fn mark_dir(dir: &Path) {
	fs::create_dir_all(dir.join(".git")).expect("creating marker dir");
}

pub fn mark_file(dir: &Path) {
	fs::write(dir.join(".git"), "gitdir: ../elsewhere\n").expect("creating marker file");
}
