//! Fetches the node-link graph served next to the app.

use log::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::components::ontology_graph::GraphData;
use crate::error::GraphError;

/// Endpoint serving the graph as `{nodes, links}` JSON.
pub const GRAPH_DATA_URL: &str = "/graph_data";

/// Loads and decodes the graph at `url`. A graph without nodes is an error.
pub async fn fetch_graph(url: &str) -> Result<GraphData, GraphError> {
	let opts = RequestInit::new();
	opts.set_method("GET");
	opts.set_mode(RequestMode::SameOrigin);

	let request = Request::new_with_str_and_init(url, &opts)
		.map_err(|e| GraphError::Fetch(format!("request error: {e:?}")))?;

	let window = web_sys::window().ok_or_else(|| GraphError::Fetch("no window".into()))?;
	let resp_value = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| GraphError::Fetch(format!("{e:?}")))?;

	let resp: Response = resp_value
		.dyn_into()
		.map_err(|_| GraphError::Fetch("response is not a Response".into()))?;

	if !resp.ok() {
		return Err(GraphError::Fetch(format!("HTTP {}", resp.status())));
	}

	let json = JsFuture::from(
		resp.json()
			.map_err(|e| GraphError::Decode(format!("json promise error: {e:?}")))?,
	)
	.await
	.map_err(|e| GraphError::Decode(format!("{e:?}")))?;

	let data: GraphData =
		serde_wasm_bindgen::from_value(json).map_err(|e| GraphError::Decode(e.to_string()))?;

	if data.nodes.is_empty() {
		return Err(GraphError::EmptyGraph);
	}
	debug!(
		"fetched {} nodes and {} links from {url}",
		data.nodes.len(),
		data.links.len()
	);
	Ok(data)
}
