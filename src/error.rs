use thiserror::Error;

/// Reasons a graph view cannot be shown.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
	/// The source returned no nodes.
	#[error("graph data contains no nodes")]
	EmptyGraph,
	/// The request for graph data failed.
	#[error("failed to fetch graph data: {0}")]
	Fetch(String),
	/// The response was not a node-link graph.
	#[error("failed to decode graph data: {0}")]
	Decode(String),
}
