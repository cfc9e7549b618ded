use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::gob::{Classifier, GameObject, GobError, NodeKind, ObjRef, Result, Tree, Value};

/// Runtime policies for parsing one record.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
	/// Coordinate value meaning "unplaced" when both axes carry it.
	pub unplaced_sentinel: i64,
	/// Maximum nested tree depth inside one record body.
	pub max_depth: u32,
}

impl Default for ParseOptions {
	fn default() -> Self {
		Self {
			unplaced_sentinel: -2_147_483_648,
			max_depth: 64,
		}
	}
}

/// Parse one serialized record into a [`GameObject`].
///
/// A pure, local transformation: no other record is ever loaded. Unknown
/// body tags and unparseable scalar content degrade to opaque text values;
/// only envelope corruption and structural violations fail the record.
pub fn parse_record(classifier: &Classifier, bytes: &[u8], options: &ParseOptions) -> Result<GameObject> {
	let mut reader = Reader::from_reader(bytes);
	reader.config_mut().trim_text(true);
	let mut buf = Vec::new();

	loop {
		buf.clear();
		match reader.read_event_into(&mut buf)? {
			Event::Start(start) => {
				let envelope = parse_envelope(&start, options)?;
				let props = parse_tree(classifier, &mut reader, &mut buf, options, 1)?;
				debug!(tsid = %envelope.tsid, class = %envelope.class_tsid, "parsed record");
				return Ok(envelope.into_object(props));
			}
			Event::Empty(start) => {
				let envelope = parse_envelope(&start, options)?;
				debug!(tsid = %envelope.tsid, class = %envelope.class_tsid, "parsed record");
				return Ok(envelope.into_object(Tree::new()));
			}
			Event::Eof => {
				return Err(GobError::MalformedRecord {
					detail: "no root element".to_owned(),
				});
			}
			Event::Decl(_) | Event::Comment(_) | Event::DocType(_) | Event::PI(_) | Event::Text(_) | Event::CData(_) | Event::End(_) => {}
		}
	}
}

struct Envelope {
	tsid: Box<str>,
	label: Option<Box<str>>,
	class_tsid: Box<str>,
	ts: i64,
	container: Option<Box<str>>,
	position: Option<(i64, i64)>,
}

impl Envelope {
	fn into_object(self, props: Tree) -> GameObject {
		GameObject {
			tsid: self.tsid,
			label: self.label,
			class_tsid: self.class_tsid,
			ts: self.ts,
			container: self.container,
			position: self.position,
			props,
		}
	}
}

fn parse_envelope(start: &BytesStart<'_>, options: &ParseOptions) -> Result<Envelope> {
	let mut tsid = None;
	let mut label = None;
	let mut class_tsid = None;
	let mut ts = 0_i64;
	let mut container = None;
	let mut x = None;
	let mut y = None;

	for attr in start.attributes() {
		let attr = attr?;
		let value = attr.unescape_value()?;
		match attr.key.as_ref() {
			b"tsid" => tsid = Some(Box::<str>::from(value.as_ref())),
			b"label" => label = Some(Box::<str>::from(value.as_ref())),
			b"class_tsid" => class_tsid = Some(Box::<str>::from(value.as_ref())),
			b"container" => container = Some(Box::<str>::from(value.as_ref())),
			b"ts" => ts = parse_attr_int("ts", &value)?,
			b"x" => x = Some(parse_attr_int("x", &value)?),
			b"y" => y = Some(parse_attr_int("y", &value)?),
			_ => {}
		}
	}

	let tsid = tsid.ok_or_else(|| GobError::MalformedRecord {
		detail: "missing tsid attribute".to_owned(),
	})?;

	let position = match (x, y) {
		(None, None) => None,
		(Some(x), Some(y)) => {
			if x == options.unplaced_sentinel && y == options.unplaced_sentinel {
				None
			} else {
				Some((x, y))
			}
		}
		_ => {
			return Err(GobError::MalformedRecord {
				detail: "incomplete coordinate pair".to_owned(),
			});
		}
	};

	Ok(Envelope {
		tsid,
		label,
		class_tsid: class_tsid.unwrap_or_else(|| Box::<str>::from("unknown")),
		ts,
		container,
		position,
	})
}

fn parse_attr_int(name: &str, value: &str) -> Result<i64> {
	value.trim().parse::<i64>().map_err(|_| GobError::MalformedRecord {
		detail: format!("unparseable {name} attribute: {value}"),
	})
}

/// Attributes captured from a body node before its content is consumed.
struct NodeAttrs {
	id: Option<Box<str>>,
	tsid: Option<Box<str>>,
	label: Option<Box<str>>,
}

fn node_attrs(start: &BytesStart<'_>) -> Result<NodeAttrs> {
	let mut out = NodeAttrs {
		id: None,
		tsid: None,
		label: None,
	};

	for attr in start.attributes() {
		let attr = attr?;
		let value = attr.unescape_value()?;
		match attr.key.as_ref() {
			b"id" => out.id = Some(Box::<str>::from(value.as_ref())),
			b"tsid" => out.tsid = Some(Box::<str>::from(value.as_ref())),
			b"label" => out.label = Some(Box::<str>::from(value.as_ref())),
			_ => {}
		}
	}

	Ok(out)
}

fn tag_name(start: &BytesStart<'_>) -> String {
	String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn parse_tree(classifier: &Classifier, reader: &mut Reader<&[u8]>, buf: &mut Vec<u8>, options: &ParseOptions, depth: u32) -> Result<Tree> {
	if depth > options.max_depth {
		return Err(GobError::RecordDepthExceeded { max_depth: options.max_depth });
	}

	let mut tree = Tree::new();

	loop {
		buf.clear();
		match reader.read_event_into(buf)? {
			Event::Start(start) => {
				let tag = tag_name(&start);
				let attrs = node_attrs(&start)?;
				let key = require_id(&tag, attrs.id)?;
				let value = match classifier.classify(&tag) {
					Some(NodeKind::Tree) => Value::Tree(parse_tree(classifier, reader, buf, options, depth + 1)?),
					Some(NodeKind::Ref) => {
						let reference = require_ref(&tag, attrs.tsid, attrs.label)?;
						drain_element(reader, buf)?;
						Value::Ref(reference)
					}
					Some(NodeKind::RefList) => Value::RefList(parse_ref_list(classifier, reader, buf)?),
					Some(kind) => {
						let text = drain_element(reader, buf)?;
						scalar_value(kind, &tag, &text)
					}
					None => {
						let text = drain_element(reader, buf)?;
						opaque_value(&tag, &text)
					}
				};
				tree.insert(key, value)?;
			}
			Event::Empty(start) => {
				let tag = tag_name(&start);
				let attrs = node_attrs(&start)?;
				let key = require_id(&tag, attrs.id)?;
				let value = match classifier.classify(&tag) {
					Some(NodeKind::Tree) => Value::Tree(Tree::new()),
					Some(NodeKind::Ref) => Value::Ref(require_ref(&tag, attrs.tsid, attrs.label)?),
					Some(NodeKind::RefList) => Value::RefList(Vec::new()),
					Some(kind) => scalar_value(kind, &tag, ""),
					None => opaque_value(&tag, ""),
				};
				tree.insert(key, value)?;
			}
			Event::End(_) => return Ok(tree),
			Event::Eof => {
				return Err(GobError::MalformedRecord {
					detail: "unexpected end of document".to_owned(),
				});
			}
			Event::Decl(_) | Event::Comment(_) | Event::DocType(_) | Event::PI(_) | Event::Text(_) | Event::CData(_) => {}
		}
	}
}

fn require_id(tag: &str, id: Option<Box<str>>) -> Result<Box<str>> {
	id.ok_or_else(|| GobError::MalformedRecord {
		detail: format!("body node <{tag}> missing id attribute"),
	})
}

fn require_ref(tag: &str, tsid: Option<Box<str>>, label: Option<Box<str>>) -> Result<ObjRef> {
	let tsid = tsid.ok_or_else(|| GobError::MalformedRecord {
		detail: format!("reference node <{tag}> missing tsid attribute"),
	})?;
	Ok(ObjRef { tsid, label })
}

fn parse_ref_list(classifier: &Classifier, reader: &mut Reader<&[u8]>, buf: &mut Vec<u8>) -> Result<Vec<ObjRef>> {
	let mut out = Vec::new();

	loop {
		buf.clear();
		match reader.read_event_into(buf)? {
			Event::Start(start) => {
				let tag = tag_name(&start);
				let attrs = node_attrs(&start)?;
				if classifier.classify(&tag) != Some(NodeKind::Ref) {
					return Err(GobError::MalformedRecord {
						detail: format!("non-reference node <{tag}> inside reference list"),
					});
				}
				out.push(require_ref(&tag, attrs.tsid, attrs.label)?);
				drain_element(reader, buf)?;
			}
			Event::Empty(start) => {
				let tag = tag_name(&start);
				let attrs = node_attrs(&start)?;
				if classifier.classify(&tag) != Some(NodeKind::Ref) {
					return Err(GobError::MalformedRecord {
						detail: format!("non-reference node <{tag}> inside reference list"),
					});
				}
				out.push(require_ref(&tag, attrs.tsid, attrs.label)?);
			}
			Event::End(_) => return Ok(out),
			Event::Eof => {
				return Err(GobError::MalformedRecord {
					detail: "unexpected end of document".to_owned(),
				});
			}
			Event::Decl(_) | Event::Comment(_) | Event::DocType(_) | Event::PI(_) | Event::Text(_) | Event::CData(_) => {}
		}
	}
}

/// Consume events up to the current element's end tag, returning flattened
/// text content. Nested elements are consumed and their text kept.
fn drain_element(reader: &mut Reader<&[u8]>, buf: &mut Vec<u8>) -> Result<String> {
	let mut text = String::new();
	let mut depth = 0_u32;

	loop {
		buf.clear();
		match reader.read_event_into(buf)? {
			Event::Start(_) => depth += 1,
			Event::Empty(_) => {}
			Event::End(_) => {
				if depth == 0 {
					return Ok(text);
				}
				depth -= 1;
			}
			Event::Text(item) => text.push_str(&item.unescape()?),
			Event::CData(item) => text.push_str(&String::from_utf8_lossy(&item.into_inner())),
			Event::Eof => {
				return Err(GobError::MalformedRecord {
					detail: "unexpected end of document".to_owned(),
				});
			}
			Event::Decl(_) | Event::Comment(_) | Event::DocType(_) | Event::PI(_) => {}
		}
	}
}

fn scalar_value(kind: NodeKind, tag: &str, text: &str) -> Value {
	let trimmed = text.trim();
	match kind {
		NodeKind::Int => match trimmed.parse::<i64>() {
			Ok(value) => Value::Int(value),
			Err(_) => opaque_value(tag, text),
		},
		NodeKind::Float => match trimmed.parse::<f64>() {
			Ok(value) => Value::Float(value),
			Err(_) => opaque_value(tag, text),
		},
		NodeKind::Bool => match trimmed {
			"true" | "1" => Value::Bool(true),
			"false" | "0" => Value::Bool(false),
			_ => opaque_value(tag, text),
		},
		_ => Value::Text(Box::<str>::from(text)),
	}
}

fn opaque_value(tag: &str, text: &str) -> Value {
	Value::Text(Box::<str>::from(format!("<{tag}> {text}").trim_end()))
}
