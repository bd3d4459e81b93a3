use std::{io, path::Path, sync::Arc};

use globwise_ignore::{
	is_git_ignored, is_git_ignored_sync, is_ignored_by_ignore_files,
	is_ignored_by_ignore_files_sync, Error, ResolveOptions,
};
use globwise_walk::FileSystem;

mod helpers;
use helpers::{strings, tree, write};

#[tokio::test]
async fn nested_negation_overrides_ancestor_rules() {
	let dir = tree(&[
		(".git/", ""),
		(".gitignore", "*.js\n"),
		("child/.gitignore", "!keep.js\n"),
		("child/keep.js", ""),
		("child/other.js", ""),
	]);
	let options = ResolveOptions::new(dir.path().join("child"));

	let rules = is_git_ignored(options.clone()).await.unwrap();
	assert!(!rules.is_ignored("keep.js"));
	assert!(rules.is_ignored("other.js"));
	assert_eq!(rules.root(), dir.path());
	assert_eq!(rules.native_patterns(), None);

	let rules = is_git_ignored_sync(options).unwrap();
	assert!(!rules.is_ignored("keep.js"));
	assert!(rules.is_ignored("other.js"));
}

#[tokio::test]
async fn parent_rules_stop_at_the_repository() {
	let dir = tree(&[(".gitignore", "*.js\n"), ("child/other.js", "")]);
	let options = ResolveOptions::new(dir.path().join("child"));

	let rules = is_git_ignored(options.clone()).await.unwrap();
	assert!(!rules.is_ignored("other.js"));

	write(dir.path(), ".git/", "");
	let rules = is_git_ignored(options).await.unwrap();
	assert!(rules.is_ignored("other.js"));
}

#[test]
fn nested_rules_are_rebased() {
	let dir = tree(&[
		(".gitignore", "*.log\n"),
		("sub/.gitignore", "/local.txt\nbuild/\n"),
	]);
	let rules = is_git_ignored_sync(ResolveOptions::new(dir.path())).unwrap();

	assert_eq!(rules.rules(), ["*.log", "sub/local.txt", "sub/**/build/"]);
	assert!(rules.is_ignored("a.log"));
	assert!(rules.is_ignored("sub/deep/a.log"));
	assert!(rules.is_ignored("sub/local.txt"));
	assert!(!rules.is_ignored("local.txt"));
	assert!(!rules.is_ignored("sub/deeper/local.txt"));
	assert!(rules.is_ignored("sub/x/build/out.o"));
	assert!(!rules.is_ignored("build/out.o"));
}

#[test]
fn native_patterns_for_local_rules() {
	let dir = tree(&[(".gitignore", "*.log\n"), ("sub/.gitignore", "tmp/\n")]);
	let rules = is_git_ignored_sync(ResolveOptions::new(dir.path())).unwrap();
	assert_eq!(
		rules.native_patterns().unwrap(),
		["**/*.log", "**/*.log/**", "sub/**/tmp/**"]
	);
}

#[tokio::test]
async fn generic_ignore_files() {
	let dir = tree(&[
		(".eslintignore", "dist\n"),
		("pkg/.eslintignore", "*.gen.js\n"),
		(".gitignore", "*.js\n"),
	]);
	let options = ResolveOptions::new(dir.path());
	let patterns = strings(&["**/.eslintignore"]);

	let rules = is_ignored_by_ignore_files(&patterns, &options)
		.await
		.unwrap();
	assert!(rules.is_ignored("dist/index.js"));
	assert!(rules.is_ignored("pkg/a.gen.js"));
	assert!(!rules.is_ignored("a.gen.js"));
	assert!(!rules.is_ignored("src/index.js"));

	let sync = is_ignored_by_ignore_files_sync(&patterns, &options).unwrap();
	assert_eq!(sync.rules(), rules.rules());
}

#[test]
fn dependency_directories_are_skipped() {
	let dir = tree(&[
		("node_modules/pkg/.gitignore", "*\n"),
		("bower_components/lib/.gitignore", "*\n"),
		("src/.gitignore", "*.tmp\n"),
	]);
	let rules = is_git_ignored_sync(ResolveOptions::new(dir.path())).unwrap();
	assert_eq!(rules.rules(), ["src/**/*.tmp"]);
}

#[test]
fn missing_cwd_has_no_rules() {
	let dir = tree(&[]);
	let rules = is_git_ignored_sync(ResolveOptions::new(dir.path().join("nope"))).unwrap();
	assert!(rules.is_empty());
}

#[derive(Debug)]
struct Unreadable;

impl FileSystem for Unreadable {
	fn read_to_string(&self, path: &Path) -> io::Result<String> {
		Err(io::Error::new(
			io::ErrorKind::PermissionDenied,
			format!("no access to {}", path.display()),
		))
	}
}

#[tokio::test]
async fn unreadable_files_fail_unless_suppressed() {
	let dir = tree(&[(".gitignore", "*.log\n")]);
	let mut options = ResolveOptions::new(dir.path());
	options.fs = Arc::new(Unreadable);

	let err = is_git_ignored(options.clone()).await;
	assert!(matches!(err, Err(Error::Read { .. })), "{err:?}");
	assert!(matches!(
		is_git_ignored_sync(options.clone()),
		Err(Error::Read { .. })
	));

	options.suppress_errors = true;
	let rules = is_git_ignored(options).await.unwrap();
	assert!(rules.is_empty());
}
