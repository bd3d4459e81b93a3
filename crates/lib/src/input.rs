//! Pattern input.

use serde_json::Value;

use crate::Error;

/// An ordered list of patterns.
///
/// Build one from a single pattern or from any list of strings. Dynamically-typed input, such as
/// patterns read from a JSON configuration, goes through [`TryFrom<Value>`](#impl-TryFrom<Value>-for-Patterns),
/// which rejects anything that isn't a string or a flat array of strings.
///
/// Empty patterns are rejected by every entry point with [`Error::InvalidPatterns`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Patterns(pub Vec<String>);

impl Patterns {
	/// Checks the patterns are usable, before anything touches the filesystem.
	pub fn check(&self) -> Result<&[String], Error> {
		if self.0.iter().any(String::is_empty) {
			return Err(Error::InvalidPatterns);
		}

		Ok(&self.0)
	}

	/// The patterns.
	#[must_use]
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}

/// Converts and checks the patterns given to an entry point.
pub(crate) fn checked<P>(patterns: P) -> Result<Vec<String>, Error>
where
	P: TryInto<Patterns>,
	P::Error: Into<Error>,
{
	let patterns: Patterns = patterns.try_into().map_err(Into::into)?;
	patterns.check()?;
	Ok(patterns.0)
}

impl From<&str> for Patterns {
	fn from(pattern: &str) -> Self {
		Self(vec![pattern.to_owned()])
	}
}

impl From<String> for Patterns {
	fn from(pattern: String) -> Self {
		Self(vec![pattern])
	}
}

impl From<Vec<String>> for Patterns {
	fn from(patterns: Vec<String>) -> Self {
		Self(patterns)
	}
}

impl From<Vec<&str>> for Patterns {
	fn from(patterns: Vec<&str>) -> Self {
		Self(patterns.into_iter().map(ToOwned::to_owned).collect())
	}
}

impl From<&[&str]> for Patterns {
	fn from(patterns: &[&str]) -> Self {
		Self(patterns.iter().map(|p| (*p).to_owned()).collect())
	}
}

impl From<&[String]> for Patterns {
	fn from(patterns: &[String]) -> Self {
		Self(patterns.to_vec())
	}
}

impl<const N: usize> From<[&str; N]> for Patterns {
	fn from(patterns: [&str; N]) -> Self {
		Self(patterns.iter().map(|p| (*p).to_owned()).collect())
	}
}

impl TryFrom<Value> for Patterns {
	type Error = Error;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::String(pattern) => Ok(Self(vec![pattern])),
			Value::Array(items) => items
				.into_iter()
				.map(|item| match item {
					Value::String(pattern) => Ok(pattern),
					_ => Err(Error::InvalidPatterns),
				})
				.collect::<Result<_, _>>()
				.map(Self),
			_ => Err(Error::InvalidPatterns),
		}
	}
}
