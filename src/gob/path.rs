use crate::gob::{GobError, Result};

/// Parsed dotted property path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropPath {
	/// Ordered sequence of tree keys.
	pub keys: Vec<Box<str>>,
}

impl PropPath {
	/// Parse dotted key syntax, for example `metabolics.energy`.
	///
	/// Keys may contain ASCII alphanumerics, `_`, and `-`. Empty segments and
	/// any other character are rejected.
	pub fn parse(input: &str) -> Result<Self> {
		if input.is_empty() {
			return Err(GobError::InvalidPath { path: input.to_owned() });
		}

		let bytes = input.as_bytes();
		let mut idx = 0_usize;
		let mut keys = Vec::new();

		while idx < bytes.len() {
			let start = idx;
			while idx < bytes.len() {
				let byte = bytes[idx];
				if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
					idx += 1;
				} else {
					break;
				}
			}

			if idx == start {
				return Err(GobError::InvalidPath { path: input.to_owned() });
			}

			keys.push(Box::<str>::from(&input[start..idx]));

			if idx < bytes.len() {
				if bytes[idx] != b'.' {
					return Err(GobError::InvalidPath { path: input.to_owned() });
				}
				idx += 1;
				if idx >= bytes.len() {
					return Err(GobError::InvalidPath { path: input.to_owned() });
				}
			}
		}

		Ok(Self { keys })
	}

	/// Render the path back to dotted form.
	pub fn render(&self) -> String {
		self.keys.join(".")
	}
}

#[cfg(test)]
mod tests {
	use crate::gob::{GobError, PropPath};

	#[test]
	fn dotted_keys_parse_in_order() {
		let path = PropPath::parse("metabolics.energy").expect("path parses");
		let keys: Vec<_> = path.keys.iter().map(|key| key.as_ref()).collect();
		assert_eq!(keys, ["metabolics", "energy"]);
		assert_eq!(path.render(), "metabolics.energy");
	}

	#[test]
	fn keys_allow_underscore_and_dash() {
		let path = PropPath::parse("quest_log.fox-brushing").expect("path parses");
		assert_eq!(path.keys.len(), 2);
	}

	#[test]
	fn empty_and_dangling_segments_are_rejected() {
		for input in ["", ".", "a.", ".a", "a..b", "a.b!"] {
			let err = PropPath::parse(input).expect_err("invalid path");
			assert!(matches!(err, GobError::InvalidPath { .. }), "input {input:?}");
		}
	}
}
