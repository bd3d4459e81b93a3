//! Pattern syntax helpers: splitting, classification, escaping.

use crate::options::EngineOptions;

/// Returns whether a pattern needs matching, rather than naming a path literally.
///
/// A pattern is dynamic if it contains wildcards, bracket classes, brace alternations or ranges,
/// extglob or alternation groups, a backslash escape, or starts with `!`. With case-insensitive
/// matching every non-empty pattern is dynamic, as a literal name may match several entries.
#[must_use]
pub fn is_dynamic_pattern(pattern: &str, options: &EngineOptions) -> bool {
	if pattern.is_empty() {
		return false;
	}

	if !options.case_sensitive_match {
		return true;
	}

	has_glob_syntax(pattern)
}

pub(crate) fn has_glob_syntax(pattern: &str) -> bool {
	pattern.contains(['\\', '*', '?'])
		|| pattern.starts_with('!')
		|| has_class(pattern)
		|| has_group(pattern)
		|| has_braces(pattern)
}

fn has_class(pattern: &str) -> bool {
	pattern.match_indices('[').any(|(i, _)| {
		let rest = &pattern[i + 1..];
		match (rest.find(']'), rest.find('[')) {
			(Some(close), Some(open)) => close < open,
			(Some(_), None) => true,
			_ => false,
		}
	})
}

fn has_group(pattern: &str) -> bool {
	let bytes = pattern.as_bytes();
	pattern.match_indices('(').any(|(i, _)| {
		let rest = &pattern[i + 1..];
		let Some(close) = rest.find(')') else {
			return false;
		};

		let inner = &rest[..close];
		if inner.contains('(') {
			return false;
		}

		let extglob = i > 0 && matches!(bytes[i - 1], b'!' | b'*' | b'+' | b'?' | b'@');
		extglob || inner.contains('|')
	})
}

fn has_braces(pattern: &str) -> bool {
	let Some(open) = pattern.find('{') else {
		return false;
	};
	let Some(close) = pattern[open + 1..].find('}') else {
		return false;
	};

	let inner = &pattern[open + 1..open + 1 + close];
	inner.contains(',') || inner.contains("..")
}

const fn is_escapable(c: char) -> bool {
	matches!(
		c,
		'!' | '(' | ')' | '*' | '+' | '?' | '@' | '[' | ']' | '{' | '|' | '}'
	)
}

/// Escapes a literal path so it can be embedded in a pattern.
///
/// Glob metacharacters are backslash-escaped, as is a leading `!` (which would otherwise read as
/// a negation) and any `!`, `+` or `@` directly before a `(`. Sequences that are already escaped
/// are left alone. On Windows, path separators are converted to `/` first.
#[must_use]
pub fn escape_path(path: &str) -> String {
	#[cfg(windows)]
	let path = path.replace('\\', "/");

	let chars: Vec<char> = path.chars().collect();
	let mut escaped = String::with_capacity(path.len());
	let mut i = 0;
	while i < chars.len() {
		let c = chars[i];
		let next = chars.get(i + 1).copied();

		if c == '\\' {
			if let Some(n) = next.filter(|&n| is_escapable(n)) {
				escaped.push(c);
				escaped.push(n);
				i += 2;
			} else {
				escaped.push_str("\\\\");
				i += 1;
			}
			continue;
		}

		let special = matches!(c, '(' | ')' | '*' | '?' | '[' | ']' | '{' | '|' | '}')
			|| (i == 0 && c == '!')
			|| (matches!(c, '!' | '+' | '@') && next == Some('('));
		if special {
			escaped.push('\\');
		}
		escaped.push(c);
		i += 1;
	}

	escaped
}

/// Splits a pattern on `/`, except inside brace groups and bracket classes.
pub(crate) fn split_segments(pattern: &str) -> Vec<&str> {
	let mut segments = Vec::new();
	let mut start = 0;
	let mut braces = 0_usize;
	let mut in_class = false;
	let mut chars = pattern.char_indices();
	while let Some((i, c)) = chars.next() {
		match c {
			'\\' => {
				chars.next();
			}
			'[' if !in_class && pattern[i + 1..].contains(']') => in_class = true,
			']' if in_class => in_class = false,
			'{' if !in_class => braces += 1,
			'}' if !in_class && braces > 0 => braces -= 1,
			'/' if !in_class && braces == 0 => {
				segments.push(&pattern[start..i]);
				start = i + 1;
			}
			_ => {}
		}
	}
	segments.push(&pattern[start..]);
	segments
}

/// The meaningful segments of a pattern: no empty or `.` segments.
///
/// The boolean is whether the pattern is rooted (starts with `/`).
pub(crate) fn segments(pattern: &str) -> (bool, Vec<&str>) {
	let rooted = pattern.starts_with('/');
	let segments = split_segments(pattern)
		.into_iter()
		.filter(|s| !s.is_empty() && *s != ".")
		.collect();
	(rooted, segments)
}

/// A pattern split into the static directory it starts from and the part that needs matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Split<'p> {
	/// Leading static segments, joined. Never includes the last segment.
	pub base: String,

	/// The remaining segments, matched relative to the base.
	pub rest: Vec<&'p str>,
}

impl<'p> Split<'p> {
	pub fn new(pattern: &'p str) -> Self {
		let (rooted, segments) = segments(pattern);
		let static_len = segments
			.iter()
			.take(segments.len().saturating_sub(1))
			.take_while(|s| !has_glob_syntax(s))
			.count();

		let base = segments[..static_len].join("/");
		Self {
			base: if rooted { format!("/{base}") } else { base },
			rest: segments[static_len..].to_vec(),
		}
	}
}

/// Joins a base and a relative path the way reported paths are built.
pub(crate) fn join_reported(base: &str, rel: &[String]) -> String {
	let rel = rel.join("/");
	if base.is_empty() {
		rel
	} else if base.ends_with('/') {
		format!("{base}{rel}")
	} else {
		format!("{base}/{rel}")
	}
}
