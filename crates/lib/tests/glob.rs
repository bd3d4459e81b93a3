use futures::TryStreamExt;
use globwise::{
	generate_glob_tasks, generate_glob_tasks_sync, glob, glob_entries, glob_entries_stream,
	glob_entries_sync, glob_stream, glob_sync, is_dynamic_pattern, FileKind, Patterns,
};
use serde_json::json;

mod helpers;
use helpers::{
	all_drivers, is_cwd_not_directory, is_invalid_patterns, options, sorted, tmp_files, tree,
	Untouchable,
};

#[tokio::test]
async fn drivers_agree() {
	let dir = tmp_files();
	assert_eq!(
		sorted(all_drivers(&["*.tmp"], &options(dir.path())).await),
		["a.tmp", "b.tmp", "c.tmp", "d.tmp", "e.tmp"]
	);
}

#[tokio::test]
async fn negations_apply_to_earlier_patterns() {
	let dir = tmp_files();
	let options = options(dir.path());

	assert_eq!(
		all_drivers(&["a.tmp", "*.tmp", "!{c,d,e}.tmp"], &options).await,
		["a.tmp", "b.tmp"]
	);
	assert_eq!(all_drivers(&["!*.tmp", "a.tmp"], &options).await, ["a.tmp"]);
}

#[tokio::test]
async fn negation_only_patterns() {
	let dir = tmp_files();

	assert_eq!(
		all_drivers(&["!a.tmp", "!b.tmp"], &options(dir.path())).await,
		["c.tmp", "d.tmp", "e.tmp"]
	);
	assert!(all_drivers(
		&["!a.tmp", "!b.tmp"],
		&options(dir.path()).expand_negation_only_patterns(false)
	)
	.await
	.is_empty());
}

#[tokio::test]
async fn results_are_unique() {
	let dir = tmp_files();
	let paths = all_drivers(
		&["*.tmp", "!a.tmp", "a.tmp", "b.tmp", "{b,c}.tmp"],
		&options(dir.path()),
	)
	.await;

	assert_eq!(paths, ["b.tmp", "c.tmp", "d.tmp", "e.tmp", "a.tmp"]);
}

#[tokio::test]
async fn marked_directories_are_unique() {
	let dir = tree(&["x/a.txt"]);
	let options = options(dir.path())
		.only_files(false)
		.mark_directories(true)
		.expand_directories(false);

	assert_eq!(all_drivers(&["*", "!nothing", "x"], &options).await, ["x/"]);
}

#[tokio::test]
async fn invalid_patterns_fail_before_touching_the_filesystem() {
	let fs = Untouchable::shared();
	let options = options("/somewhere".as_ref()).fs(fs.clone());

	for input in [json!(null), json!([{}]), json!(5), json!(["a", ["b"]]), json!("")] {
		assert!(is_invalid_patterns(glob_sync(input.clone(), &options)));
		assert!(is_invalid_patterns(glob(input.clone(), &options).await));
		assert!(is_invalid_patterns(
			glob_stream(input.clone(), &options).map(|_| ())
		));
		assert!(is_invalid_patterns(glob_entries(input.clone(), &options).await));
		assert!(is_invalid_patterns(generate_glob_tasks_sync(input.clone(), &options)));
		assert!(is_invalid_patterns(generate_glob_tasks(input.clone(), &options).await));
		assert!(is_invalid_patterns(is_dynamic_pattern(input, &options)));
	}

	assert!(!fs.touched());
}

#[tokio::test]
async fn file_as_cwd_is_an_error() {
	let dir = tree(&["file.txt"]);
	let cwd = dir.path().join("file.txt");
	let options = options(&cwd);

	assert!(is_cwd_not_directory(glob_sync("*", &options), &cwd));
	assert!(is_cwd_not_directory(glob("*", &options).await, &cwd));
	assert!(is_cwd_not_directory(
		glob_stream("*", &options).map(|_| ()),
		&cwd
	));
	assert!(is_cwd_not_directory(glob_entries_sync("*", &options), &cwd));
	assert!(is_cwd_not_directory(
		glob_entries_stream("*", &options).map(|_| ()),
		&cwd
	));
	assert!(is_cwd_not_directory(is_dynamic_pattern("*", &options), &cwd));
	assert!(is_cwd_not_directory(generate_glob_tasks_sync("*", &options), &cwd));
	assert!(is_cwd_not_directory(glob_entries("*", &options).await, &cwd));
	assert!(is_cwd_not_directory(generate_glob_tasks("*", &options).await, &cwd));
}

#[tokio::test]
async fn missing_cwd_has_no_matches() {
	let dir = tree(&[]);
	let options = options(&dir.path().join("missing"));

	assert!(all_drivers(&["*"], &options).await.is_empty());
	assert!(!is_dynamic_pattern("a.txt", &options).unwrap());
}

#[test]
fn dynamic_patterns() {
	let dir = tree(&[]);
	let options = options(dir.path());

	assert!(is_dynamic_pattern(["a.txt", "*.md"], &options).unwrap());
	assert!(!is_dynamic_pattern(["a.txt", "b/c.md"], &options).unwrap());
	assert!(is_dynamic_pattern("a.txt", &options.clone().case_sensitive_match(false)).unwrap());
}

#[tokio::test]
async fn directories_are_expanded() {
	let dir = tree(&[
		"src/a.js",
		"src/b.md",
		"src/sub/c.js",
		"src/sub/readme.md",
		"other.js",
	]);
	let options = options(dir.path());

	assert_eq!(
		all_drivers(&["src"], &options).await,
		["src/a.js", "src/b.md", "src/sub/c.js", "src/sub/readme.md"]
	);
	assert_eq!(
		all_drivers(&["src"], &options.clone().expand_directories((Vec::<&str>::new(), vec!["js"]))).await,
		["src/a.js", "src/sub/c.js"]
	);
	assert_eq!(
		all_drivers(&["src"], &options.clone().expand_directories(vec!["read*"])).await,
		["src/sub/readme.md"]
	);
	assert!(all_drivers(&["src"], &options.clone().expand_directories(false))
		.await
		.is_empty());
	assert_eq!(
		all_drivers(
			&["src"],
			&options.clone().expand_directories(false).only_files(false)
		)
		.await,
		["src"]
	);
}

#[tokio::test]
async fn expanded_directories_match_listed_names() {
	let dir = tree(&["src/Makefile", "src/readme.md", "src/sub/LICENSE", "src/sub/LICENSE.md"]);
	let options = options(dir.path());

	assert_eq!(
		all_drivers(
			&["src"],
			&options.clone().expand_directories(vec!["Makefile", "LICENSE"])
		)
		.await,
		["src/Makefile", "src/sub/LICENSE"]
	);
	assert_eq!(
		all_drivers(
			&["src"],
			&options.clone().expand_directories(vec!["read*", "LICENSE.md"])
		)
		.await,
		["src/readme.md", "src/sub/LICENSE.md"]
	);
	assert_eq!(
		all_drivers(
			&["src"],
			&options.expand_directories((vec!["LICENSE"], vec!["md"]))
		)
		.await,
		["src/sub/LICENSE.md"]
	);
}

#[tokio::test]
async fn ignored_directories_are_expanded() {
	let dir = tree(&["src/a.js", "src/gen/b.js", "gen/c.js"]);
	let options = options(dir.path()).ignore(["src/gen"]);

	assert_eq!(
		all_drivers(&["**/*.js"], &options).await,
		["gen/c.js", "src/a.js"]
	);
}

#[tokio::test]
async fn directory_ignores_match_at_any_depth() {
	let dir = tree(&["build/a.js", "pkg/build/b.js", "pkg/c.js", "d.js"]);
	let options = options(dir.path()).ignore(["build/"]);

	assert_eq!(
		all_drivers(&["**/*.js"], &options).await,
		["d.js", "pkg/c.js"]
	);
	assert_eq!(
		all_drivers(&["**/*.js", "!pkg/"], &options.clone().ignore(Vec::<String>::new())).await,
		["d.js", "build/a.js"]
	);
}

#[tokio::test]
async fn parent_directory_patterns() {
	let dir = tree(&["lib/a.js", "lib/vendor/b.js", "app/main.js"]);
	let options = options(&dir.path().join("app")).ignore(["**/vendor/**"]);

	assert_eq!(
		all_drivers(&["../lib/**/*.js"], &options).await,
		["../lib/a.js"]
	);
}

#[tokio::test]
async fn absolute_negations_bind_to_absolute_patterns() {
	let dir = tree(&["proj/a.scss", "proj/_b.scss", "proj/c.css"]);
	let root = dir.path().join("proj");
	let root = root.to_string_lossy();
	let options = options(dir.path());

	let include = format!("{root}/*.scss");
	let exclude = format!("!{root}/_*");
	assert_eq!(
		all_drivers(&[include.as_str(), exclude.as_str()], &options).await,
		[format!("{root}/a.scss")]
	);
}

#[tokio::test]
async fn dynamic_absolute_patterns_are_relative() {
	let dir = tree(&["a.md", "sub/b.md"]);
	assert_eq!(
		all_drivers(&["/**/*.md"], &options(dir.path())).await,
		["a.md", "sub/b.md"]
	);
}

#[tokio::test]
async fn absolute_output() {
	let dir = tmp_files();
	let options = options(dir.path()).absolute(true);

	assert_eq!(
		all_drivers(&["a.tmp"], &options).await,
		[dir.path().join("a.tmp").to_string_lossy().into_owned()]
	);
}

#[tokio::test]
async fn entries_carry_metadata() {
	let dir = tree(&["a.txt", "d/"]);
	let options = options(dir.path()).stats(true).only_files(false);

	let entries = glob_entries(["*"], &options).await.unwrap();
	assert_eq!(entries.len(), 2);
	assert_eq!(entries[0].name, "a.txt");
	assert_eq!(entries[0].kind, FileKind::File);
	assert_eq!(
		entries[0].stats.as_ref().map(|stats| stats.len),
		Some("a.txt".len() as u64)
	);
	assert_eq!(entries[1].path, "d");
	assert_eq!(entries[1].kind, FileKind::Dir);

	let sync = glob_entries_sync(["*"], &options).unwrap();
	assert_eq!(sync, entries);
}

#[tokio::test]
async fn streams_are_lazy() {
	let dir = tmp_files();
	let mut stream =
		Box::pin(glob_entries_stream(["*.tmp", "!c.tmp", "c.tmp"], &options(dir.path())).unwrap());

	let first = stream.try_next().await.unwrap().unwrap();
	assert_eq!(first.path, "a.tmp");
	drop(stream);
}

#[cfg(unix)]
#[tokio::test]
async fn read_errors_are_suppressible() {
	let dir = tmp_files();
	let options = options(dir.path());

	assert!(glob_sync("a.tmp/*", &options).is_err());
	assert!(glob("a.tmp/*", &options).await.is_err());
	assert!(glob_stream("a.tmp/*", &options)
		.unwrap()
		.try_collect::<Vec<_>>()
		.await
		.is_err());

	assert!(all_drivers(&["a.tmp/*"], &options.suppress_errors(true))
		.await
		.is_empty());
}

#[tokio::test]
async fn custom_filesystems_are_used() {
	let dir = tmp_files();
	let fs = Untouchable::shared();
	let options = options(dir.path()).fs(fs.clone()).suppress_errors(true);

	assert!(glob_sync("*.tmp", &options).unwrap().is_empty());
	assert!(fs.touched());
}

#[test]
fn json_patterns() {
	let dir = tmp_files();
	let patterns = Patterns::try_from(json!(["*.tmp", "!{b,c,d,e}.tmp"])).unwrap();
	assert_eq!(
		glob_sync(patterns, &options(dir.path())).unwrap(),
		["a.tmp"]
	);
}
