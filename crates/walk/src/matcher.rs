//! Segment-wise glob matching.
//!
//! Patterns are matched one path segment at a time rather than as a whole string, so that the
//! walker can ask whether a directory _could_ contain a match before reading it.

use globset::{GlobBuilder, GlobMatcher};

use crate::pattern::segments;

#[derive(Clone, Debug)]
enum Segment {
	Globstar,
	Glob { matcher: GlobMatcher, dotted: bool },
}

/// A compiled pattern.
#[derive(Clone, Debug)]
pub(crate) enum Matcher {
	Segments(Vec<Segment>),

	/// Patterns with a separator inside a brace group can't be split per segment; these are
	/// matched against the whole path and never prune traversal.
	Whole(GlobMatcher),
}

fn compile_glob(glob: &str, case_sensitive: bool) -> Result<GlobMatcher, globset::Error> {
	Ok(GlobBuilder::new(glob)
		.literal_separator(true)
		.backslash_escape(true)
		.case_insensitive(!case_sensitive)
		.build()?
		.compile_matcher())
}

impl Matcher {
	pub fn compile(parts: &[&str], case_sensitive: bool) -> Result<Self, globset::Error> {
		if parts.iter().any(|part| part.contains('/')) {
			return compile_glob(&parts.join("/"), case_sensitive).map(Self::Whole);
		}

		let mut compiled = Vec::with_capacity(parts.len());
		for part in parts {
			if *part == "**" {
				if !matches!(compiled.last(), Some(Segment::Globstar)) {
					compiled.push(Segment::Globstar);
				}
			} else {
				compiled.push(Segment::Glob {
					matcher: compile_glob(part, case_sensitive)?,
					dotted: part.starts_with('.'),
				});
			}
		}

		Ok(Self::Segments(compiled))
	}

	/// Compiles a pattern against the full path, for ignore lists.
	pub fn compile_full(pattern: &str, case_sensitive: bool) -> Result<Self, globset::Error> {
		let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
		let (_, parts) = segments(pattern);
		Self::compile(&parts, case_sensitive)
	}

	/// Whether the path (as segments) matches.
	pub fn is_match(&self, path: &[&str], dot: bool) -> bool {
		match self {
			Self::Segments(segments) => match_segments(segments, path, dot),
			Self::Whole(matcher) => matcher.is_match(path.join("/")),
		}
	}

	/// Whether something below the directory (as segments) could match.
	pub fn could_descend(&self, dir: &[&str], dot: bool) -> bool {
		match self {
			Self::Segments(segments) => partial_segments(segments, dir, dot),
			Self::Whole(_) => true,
		}
	}
}

fn hidden(name: &str, dot: bool) -> bool {
	!dot && name.starts_with('.')
}

fn match_segments(pattern: &[Segment], path: &[&str], dot: bool) -> bool {
	match pattern.first() {
		None => path.is_empty(),
		Some(Segment::Globstar) => {
			if match_segments(&pattern[1..], path, dot) {
				return true;
			}

			match path.first() {
				Some(name) if !hidden(name, dot) => match_segments(pattern, &path[1..], dot),
				_ => false,
			}
		}
		Some(Segment::Glob { matcher, dotted }) => match path.first() {
			Some(name) if hidden(name, dot) && !dotted => false,
			Some(name) => matcher.is_match(name) && match_segments(&pattern[1..], &path[1..], dot),
			None => false,
		},
	}
}

fn partial_segments(pattern: &[Segment], dir: &[&str], dot: bool) -> bool {
	if dir.is_empty() {
		return !pattern.is_empty();
	}

	match pattern.first() {
		None => false,
		Some(Segment::Globstar) => {
			if partial_segments(&pattern[1..], dir, dot) {
				return true;
			}

			!hidden(dir[0], dot) && partial_segments(pattern, &dir[1..], dot)
		}
		Some(Segment::Glob { matcher, dotted }) => {
			if hidden(dir[0], dot) && !dotted {
				return false;
			}

			matcher.is_match(dir[0]) && partial_segments(&pattern[1..], &dir[1..], dot)
		}
	}
}
