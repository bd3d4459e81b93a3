//! Pattern utilities.
//!
//! Pure string functions used to plan glob tasks: none of them touch the filesystem.

use std::path::{Path, PathBuf};

use globwise_walk::{is_dynamic_pattern, EngineOptions};

/// Returns whether a pattern is negated, that is starts with `!`.
#[must_use]
pub fn is_negative(pattern: &str) -> bool {
	pattern.starts_with('!')
}

/// Rewrites a directory pattern (one with a trailing `/`) into one matching everything inside.
///
/// A bare name like `build/` matches `build` directories at any depth, so it becomes
/// `**/build/**`. Patterns with a leading or inner `/` stay anchored: `/dist/` becomes `/dist/**`.
/// Patterns without a trailing `/` are returned unchanged, which makes this idempotent.
///
/// ```
/// use globwise::pattern::normalize_directory_pattern;
///
/// assert_eq!(normalize_directory_pattern("build/"), "**/build/**");
/// assert_eq!(normalize_directory_pattern("/dist/"), "/dist/**");
/// assert_eq!(normalize_directory_pattern("src/gen/"), "src/gen/**");
/// assert_eq!(normalize_directory_pattern("*.js"), "*.js");
/// ```
#[must_use]
pub fn normalize_directory_pattern(pattern: &str) -> String {
	if !pattern.ends_with('/') {
		return pattern.to_owned();
	}

	let trimmed = pattern.trim_end_matches('/');
	if trimmed.is_empty() {
		return "/**".into();
	}

	if trimmed == "**" {
		return "**/**".into();
	}

	let leading = trimmed.starts_with('/');
	let inner = trimmed.trim_start_matches('/').contains('/');
	if !leading && !inner && !trimmed.starts_with("**/") {
		format!("**/{trimmed}/**")
	} else {
		format!("{trimmed}/**")
	}
}

/// The run of `../` at the start of a pattern, ignoring any negation.
#[must_use]
pub fn get_parent_directory_prefix(pattern: &str) -> &str {
	let body = pattern.strip_prefix('!').unwrap_or(pattern);
	let mut rest = body;
	while let Some(next) = rest.strip_prefix("../") {
		rest = next;
	}

	&body[..body.len() - rest.len()]
}

/// Makes `**/` ignore patterns reach into the parent directories a task's patterns look in.
///
/// When every pattern starts with the same `../` run, ignore patterns starting with `**/` get that
/// prefix too, so `**/node_modules/**` still applies to `../pkg/**`. Otherwise the ignore patterns
/// are returned as they are.
///
/// ```
/// use globwise::pattern::adjust_ignore_patterns_for_parent_directories;
///
/// let patterns = ["../a/*.js".to_string(), "../b/*.js".to_string()];
/// let ignore = ["**/node_modules/**".to_string(), "x".to_string()];
/// assert_eq!(
/// 	adjust_ignore_patterns_for_parent_directories(&patterns, &ignore),
/// 	["../**/node_modules/**", "x"],
/// );
/// ```
#[must_use]
pub fn adjust_ignore_patterns_for_parent_directories(
	patterns: &[String],
	ignore: &[String],
) -> Vec<String> {
	let Some(first) = patterns.first() else {
		return ignore.to_vec();
	};

	let prefix = get_parent_directory_prefix(first);
	if prefix.is_empty()
		|| patterns
			.iter()
			.any(|pattern| get_parent_directory_prefix(pattern) != prefix)
	{
		return ignore.to_vec();
	}

	ignore
		.iter()
		.map(|pattern| {
			if pattern.starts_with("**/") {
				format!("{prefix}{pattern}")
			} else {
				pattern.clone()
			}
		})
		.collect()
}

fn is_static(segment: &str, probe: &EngineOptions) -> bool {
	!is_dynamic_pattern(segment, probe)
}

fn has_dynamic_root(body: &str, probe: &EngineOptions) -> bool {
	body.trim_start_matches('/')
		.split('/')
		.next()
		.is_some_and(|segment| !is_static(segment, probe))
}

/// The directory an absolute pattern is rooted in: its leading static segments, without the last.
fn static_root(body: &str, probe: &EngineOptions) -> PathBuf {
	let segments: Vec<&str> = body.split('/').collect();
	let mut root = PathBuf::from("/");
	for segment in &segments[..segments.len().saturating_sub(1)] {
		if segment.is_empty() {
			continue;
		}

		if !is_static(segment, probe) {
			break;
		}

		root.push(segment);
	}
	root
}

fn related(a: &Path, b: &Path) -> bool {
	a.starts_with(b) || b.starts_with(a)
}

/// Decides which `/`-rooted patterns are filesystem paths, and which are relative to the working
/// directory.
///
/// A pattern whose first segment is dynamic (`/**/*.js`) is made relative: a leading `/` means
/// nothing consistent across platforms. Other positive patterns stay absolute. A negated absolute
/// pattern stays absolute only when its static root is related (equal, an ancestor, or a
/// descendant) to the root of some absolute positive pattern, so that `!/tmp/p/_*` applies to
/// `/tmp/p/*.scss`; otherwise it's made relative.
#[must_use]
pub fn normalize_absolute_patterns(patterns: Vec<String>) -> Vec<String> {
	let probe = EngineOptions::default();
	let roots: Vec<PathBuf> = patterns
		.iter()
		.filter(|pattern| {
			!is_negative(pattern) && pattern.starts_with('/') && !has_dynamic_root(pattern, &probe)
		})
		.map(|pattern| static_root(pattern, &probe))
		.collect();

	patterns
		.into_iter()
		.map(|pattern| {
			let (bang, body) = match pattern.strip_prefix('!') {
				Some(body) => ("!", body),
				None => ("", pattern.as_str()),
			};

			if !body.starts_with('/') {
				return pattern;
			}

			let relative = if has_dynamic_root(body, &probe) {
				true
			} else if bang.is_empty() {
				false
			} else {
				let root = static_root(body, &probe);
				!roots.iter().any(|positive| related(&root, positive))
			};

			if relative {
				format!("{bang}{}", body.trim_start_matches('/'))
			} else {
				pattern
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn strings(list: &[&str]) -> Vec<String> {
		list.iter().map(|s| (*s).to_string()).collect()
	}

	#[test]
	fn negative() {
		assert!(is_negative("!a"));
		assert!(is_negative("!"));
		assert!(!is_negative("a!"));
		assert!(!is_negative(""));
	}

	#[test]
	fn directory_patterns() {
		for (input, output) in [
			("build/", "**/build/**"),
			("build//", "**/build/**"),
			("/dist/", "/dist/**"),
			("src/gen/", "src/gen/**"),
			("**/cache/", "**/cache/**"),
			("**/", "**/**"),
			("/", "/**"),
			("", ""),
			("*.js", "*.js"),
			("build", "build"),
		] {
			assert_eq!(normalize_directory_pattern(input), output, "{input}");
		}
	}

	#[test]
	fn directory_pattern_normalization_is_idempotent() {
		for input in ["build/", "/dist/", "**/", "/", "a/b/", "x"] {
			let once = normalize_directory_pattern(input);
			assert_eq!(normalize_directory_pattern(&once), once);
		}
	}

	#[test]
	fn parent_prefixes() {
		assert_eq!(get_parent_directory_prefix("../a"), "../");
		assert_eq!(get_parent_directory_prefix("!../../a/*.js"), "../../");
		assert_eq!(get_parent_directory_prefix("a/../b"), "");
		assert_eq!(get_parent_directory_prefix(".."), "");
		assert_eq!(get_parent_directory_prefix(""), "");
	}

	#[test]
	fn ignore_adjustment_needs_a_shared_prefix() {
		let ignore = strings(&["**/node_modules/**", "../**/x", "dist/**"]);

		assert_eq!(
			adjust_ignore_patterns_for_parent_directories(&strings(&["../a/*", "../b"]), &ignore),
			["../**/node_modules/**", "../**/x", "dist/**"]
		);
		assert_eq!(
			adjust_ignore_patterns_for_parent_directories(&strings(&["../a/*", "../../b"]), &ignore),
			ignore
		);
		assert_eq!(
			adjust_ignore_patterns_for_parent_directories(&strings(&["../a/*", "b"]), &ignore),
			ignore
		);
		assert_eq!(
			adjust_ignore_patterns_for_parent_directories(&strings(&["a/*"]), &ignore),
			ignore
		);
		assert_eq!(
			adjust_ignore_patterns_for_parent_directories(&[], &ignore),
			ignore
		);
	}

	#[test]
	fn dynamic_roots_are_made_relative() {
		assert_eq!(
			normalize_absolute_patterns(strings(&["/**/*.js", "!/**", "!/*.md"])),
			["**/*.js", "!**", "!*.md"]
		);
	}

	#[test]
	fn absolute_negations_bind_to_absolute_positives() {
		assert_eq!(
			normalize_absolute_patterns(strings(&[
				"/tmp/proj/*.scss",
				"!/tmp/proj/_*",
				"!/tmp/proj/vendor/**",
				"!/tmp/*.scss",
				"!/other/x",
			])),
			[
				"/tmp/proj/*.scss",
				"!/tmp/proj/_*",
				"!/tmp/proj/vendor/**",
				"!/tmp/*.scss",
				"!other/x",
			]
		);
	}

	#[test]
	fn absolute_negations_without_positives_are_relative() {
		assert_eq!(
			normalize_absolute_patterns(strings(&["*.js", "!/vendor/x.js", "!/"])),
			["*.js", "!vendor/x.js", "!"]
		);
	}
}
