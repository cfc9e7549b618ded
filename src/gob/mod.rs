mod classify;
mod compress;
mod error;
mod graph;
mod loader;
mod object;
mod path;
mod record;
mod refs;
mod store;
mod value;

/// Node-tag classification table and kinds.
pub use classify::{Classifier, NodeKind};
/// Compression detection and decoding for records at rest.
pub use compress::{Compression, ZSTD_MAGIC, decode_bytes};
/// Error and result aliases.
pub use error::{GobError, Result};
/// Graph resolution types and entry point.
pub use graph::{DanglingReason, DanglingRef, GraphEdge, GraphOptions, GraphResult, GraphTruncation, resolve_graph};
/// Loader seam and bundled backends.
pub use loader::{DirLoader, Loader, MemLoader};
/// Parsed record type.
pub use object::GameObject;
/// Property path parser.
pub use path::PropPath;
/// Record parsing entry point and options.
pub use record::{ParseOptions, parse_record};
/// Reference extraction types.
pub use refs::{RefIter, RefRecord};
/// Lazy object cache.
pub use store::{ObjectStore, StoreOptions};
/// Dynamic value model.
pub use value::{ObjRef, Tree, TreeEntry, Value};
