use std::sync::Arc;

use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, GobError>;

/// Errors produced while loading, parsing, and traversing game-object records.
///
/// The enum is `Clone` so the store can replay a cached failure to every
/// caller that asks for the same identifier again.
#[derive(Debug, Clone, Error)]
pub enum GobError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(Arc<std::io::Error>),
	/// XML reader failure from the underlying event parser.
	#[error("xml: {0}")]
	Xml(#[from] quick_xml::Error),
	/// Malformed attribute syntax inside an XML element.
	#[error("xml attribute: {0}")]
	Attr(#[from] quick_xml::events::attributes::AttrError),
	/// Unknown leading magic on raw record bytes.
	#[error("unsupported record encoding (magic={magic:?})")]
	UnknownMagic {
		/// First up-to-4 bytes of the raw record.
		magic: [u8; 4],
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Outer record envelope or body structure is invalid.
	#[error("malformed record: {detail}")]
	MalformedRecord {
		/// Human-readable description of the violation.
		detail: String,
	},
	/// Record nesting exceeded configured depth limit.
	#[error("record depth exceeded (max={max_depth})")]
	RecordDepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Duplicate property key inside one tree.
	#[error("duplicate key: {key}")]
	DuplicateKey {
		/// Offending tree key.
		key: String,
	},
	/// Caller requested the wrong accessor kind on a value.
	#[error("type mismatch: expected {expected}, got {got}")]
	TypeMismatch {
		/// Expected value kind label.
		expected: &'static str,
		/// Actual value kind label.
		got: &'static str,
	},
	/// Property path navigated to a nonexistent key.
	#[error("path not found: {path}")]
	PathNotFound {
		/// Full path expression that failed.
		path: String,
	},
	/// Property path expression syntax is invalid.
	#[error("invalid property path: {path}")]
	InvalidPath {
		/// Original user-provided path string.
		path: String,
	},
	/// Loader could not supply a record for the identifier.
	#[error("unresolved reference: {tsid}")]
	UnresolvedReference {
		/// Identifier that failed to resolve.
		tsid: String,
	},
	/// Load or parse failure tagged with the identifier it occurred on.
	#[error("load {tsid}: {source}")]
	Load {
		/// Identifier being loaded when the failure occurred.
		tsid: String,
		/// Underlying failure.
		#[source]
		source: Box<GobError>,
	},
	/// Strict traversal found a reference it was required to resolve.
	#[error("strict traversal: dangling reference {from} -{path}-> {to}")]
	StrictDangling {
		/// Identifier owning the broken reference.
		from: String,
		/// Property path of the broken reference.
		path: String,
		/// Target identifier that could not be resolved.
		to: String,
	},
}

impl From<std::io::Error> for GobError {
	fn from(err: std::io::Error) -> Self {
		Self::Io(Arc::new(err))
	}
}
