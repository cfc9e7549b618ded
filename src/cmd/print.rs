use glitchdoc::gob::{Tree, Value};

/// Print a value tree as indented text lines.
pub(crate) fn print_value(key: &str, value: &Value, indent: usize) {
	let pad = "  ".repeat(indent);
	match value {
		Value::Int(item) => println!("{pad}{key}: {item}"),
		Value::Float(item) => println!("{pad}{key}: {item}"),
		Value::Bool(item) => println!("{pad}{key}: {item}"),
		Value::Text(item) => println!("{pad}{key}: {item:?}"),
		Value::Ref(item) => println!("{pad}{key}: -> {}", ref_label(&item.tsid, item.label.as_deref())),
		Value::RefList(items) => {
			println!("{pad}{key}: [{} refs]", items.len());
			for (idx, item) in items.iter().enumerate() {
				println!("{pad}  [{idx}] -> {}", ref_label(&item.tsid, item.label.as_deref()));
			}
		}
		Value::Tree(tree) => {
			println!("{pad}{key}:");
			print_tree(tree, indent + 1);
		}
	}
}

/// Print every entry of a tree at the given indent.
pub(crate) fn print_tree(tree: &Tree, indent: usize) {
	for entry in tree {
		print_value(&entry.key, &entry.value, indent);
	}
}

/// Convert a value tree to a JSON rendering for `--json` output.
pub(crate) fn value_to_json(value: &Value) -> serde_json::Value {
	match value {
		Value::Int(item) => serde_json::json!(item),
		Value::Float(item) => serde_json::json!(item),
		Value::Bool(item) => serde_json::json!(item),
		Value::Text(item) => serde_json::json!(item.as_ref()),
		Value::Ref(item) => ref_to_json(&item.tsid, item.label.as_deref()),
		Value::RefList(items) => serde_json::Value::Array(items.iter().map(|item| ref_to_json(&item.tsid, item.label.as_deref())).collect()),
		Value::Tree(tree) => tree_to_json(tree),
	}
}

/// Convert a tree to a JSON object preserving entry order.
pub(crate) fn tree_to_json(tree: &Tree) -> serde_json::Value {
	let mut map = serde_json::Map::new();
	for entry in tree {
		map.insert(entry.key.to_string(), value_to_json(&entry.value));
	}
	serde_json::Value::Object(map)
}

fn ref_to_json(tsid: &str, label: Option<&str>) -> serde_json::Value {
	serde_json::json!({ "ref": tsid, "label": label })
}

fn ref_label(tsid: &str, label: Option<&str>) -> String {
	match label {
		Some(label) => format!("{tsid} ({label})"),
		None => tsid.to_owned(),
	}
}
