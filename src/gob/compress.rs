use std::io::Read;

use crate::gob::{GobError, Result};

const MAX_DECOMPRESSED_BYTES: usize = 64 * 1024 * 1024;
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// zstd frame magic used by compressed record files.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode detected for raw record bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Raw uncompressed record.
	None,
	/// zstd-compressed record.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Detect and decode compression, returning `(mode, decoded_bytes)`.
///
/// Accepts a zstd frame or bytes whose first significant byte opens an XML
/// element; anything else is rejected before the record parser sees it.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	if raw.starts_with(&ZSTD_MAGIC) {
		let out = decode_zstd(&raw)?;
		return Ok((Compression::Zstd, out));
	}

	if looks_like_xml(&raw) {
		return Ok((Compression::None, raw));
	}

	Err(GobError::UnknownMagic { magic: first4(&raw) })
}

fn decode_zstd(raw: &[u8]) -> Result<Vec<u8>> {
	let mut decoder = zstd::stream::read::Decoder::new(raw)?;
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf)?;
		if read == 0 {
			break;
		}

		if out.len() + read > MAX_DECOMPRESSED_BYTES {
			return Err(GobError::DecompressedTooLarge { limit: MAX_DECOMPRESSED_BYTES });
		}

		out.extend_from_slice(&buf[..read]);
	}

	Ok(out)
}

fn looks_like_xml(raw: &[u8]) -> bool {
	let body = raw.strip_prefix(&UTF8_BOM).unwrap_or(raw);
	body.iter().find(|byte| !byte.is_ascii_whitespace()) == Some(&b'<')
}

fn first4(bytes: &[u8]) -> [u8; 4] {
	let mut magic = [0_u8; 4];
	let take = bytes.len().min(4);
	magic[..take].copy_from_slice(&bytes[..take]);
	magic
}
