use serde::{Deserialize, Deserializer};

/// Node ids arrive as strings or numbers depending on the producer.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Text(String),
	Number(f64),
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	Ok(match RawId::deserialize(deserializer)? {
		RawId::Text(s) => s,
		RawId::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => (n as i64).to_string(),
		RawId::Number(n) => n.to_string(),
	})
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GraphNode {
	#[serde(deserialize_with = "id_string")]
	pub id: String,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default)]
	pub color: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GraphLink {
	#[serde(deserialize_with = "id_string")]
	pub source: String,
	#[serde(deserialize_with = "id_string")]
	pub target: String,
	#[serde(default)]
	pub value: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default, alias = "edges")]
	pub links: Vec<GraphLink>,
}

#[cfg(test)]
impl GraphData {
	/// Shorthand for building graphs in code.
	pub fn from_pairs(ids: &[&str], links: &[(&str, &str)]) -> Self {
		Self {
			nodes: ids
				.iter()
				.map(|id| GraphNode {
					id: id.to_string(),
					label: None,
					color: None,
				})
				.collect(),
			links: links
				.iter()
				.map(|(s, t)| GraphLink {
					source: s.to_string(),
					target: t.to_string(),
					value: None,
				})
				.collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_node_link_json() {
		let json = r#"{
			"directed": true,
			"multigraph": false,
			"graph": {},
			"nodes": [{"id": "HP:0000001", "label": "All"}, {"id": "HP:0000118"}],
			"links": [{"source": "HP:0000001", "target": "HP:0000118", "value": 4}]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].label.as_deref(), Some("All"));
		assert_eq!(data.nodes[1].label, None);
		assert_eq!(data.links[0].value, Some(4.0));
	}

	#[test]
	fn accepts_edges_key_and_numeric_ids() {
		let json = r#"{"nodes": [{"id": 1}, {"id": 2}], "edges": [{"source": 1, "target": 2}]}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes[0].id, "1");
		assert_eq!(data.links[0].target, "2");
		assert_eq!(data.links[0].value, None);
	}

	#[test]
	fn missing_nodes_decode_empty() {
		let data: GraphData = serde_json::from_str("{}").unwrap();
		assert!(data.nodes.is_empty());
		assert!(data.links.is_empty());
	}
}
