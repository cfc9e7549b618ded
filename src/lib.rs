//! Public library API for exploring Glitch game-object archives.

/// Record parsing, the dynamic value model, the lazy object store, and
/// reference-graph resolution.
pub mod gob;
