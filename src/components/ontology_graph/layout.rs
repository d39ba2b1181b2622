use std::f64::consts::PI;

use super::hierarchy::{Forest, NodeIdx};
use super::scale::LinearScale;

/// Vertical band per depth and the evenly spaced slot of each node in its band.
#[derive(Clone, Debug)]
pub struct DepthBands {
	scale: LinearScale,
	slots: Vec<(f64, f64)>,
}

impl DepthBands {
	pub fn new(forest: &Forest, width: f64, height: f64, margin: f64) -> Self {
		let scale = LinearScale::new(
			(0.0, forest.max_depth() as f64),
			(margin, height - margin),
		);
		let mut per_depth = vec![0usize; forest.max_depth() + 1];
		for node in forest.nodes() {
			per_depth[node.depth] += 1;
		}
		let mut seen = vec![0usize; per_depth.len()];
		let slots = forest
			.nodes()
			.iter()
			.map(|node| {
				let i = seen[node.depth];
				seen[node.depth] += 1;
				let x = (i + 1) as f64 * width / (per_depth[node.depth] + 1) as f64;
				(x, scale.apply(node.depth as f64))
			})
			.collect();
		Self { scale, slots }
	}

	pub fn row(&self, depth: usize) -> f64 {
		self.scale.apply(depth as f64)
	}

	pub fn slot(&self, idx: NodeIdx) -> (f64, f64) {
		self.slots[idx]
	}
}

/// Seeds every node at its band slot.
pub fn place_in_bands(forest: &mut Forest, bands: &DepthBands) {
	for (idx, node) in forest.nodes_mut().iter_mut().enumerate() {
		(node.x, node.y) = bands.slot(idx);
	}
}

/// Seeds nodes on a circle around the canvas centre.
pub fn place_on_circle(forest: &mut Forest, width: f64, height: f64) {
	let n = forest.len() as f64;
	for (i, node) in forest.nodes_mut().iter_mut().enumerate() {
		let angle = (i as f64) * 2.0 * PI / n;
		node.x = width / 2.0 + 100.0 * angle.cos();
		node.y = height / 2.0 + 100.0 * angle.sin();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::ontology_graph::config::DepthPolicy;
	use crate::components::ontology_graph::types::GraphData;

	#[test]
	fn bands_space_nodes_evenly_per_depth() {
		let data = GraphData::from_pairs(&["A", "B", "C", "D"], &[("A", "B"), ("A", "C"), ("B", "D")]);
		let mut forest = Forest::build(&data, DepthPolicy::SingleAssignment, 10.0, 2.0).unwrap();
		let bands = DepthBands::new(&forest, 900.0, 600.0, 50.0);
		place_in_bands(&mut forest, &bands);

		let at = |id: &str| {
			let n = forest.node(forest.get(id).unwrap());
			(n.x, n.y)
		};
		assert_eq!(at("A"), (450.0, 50.0));
		assert_eq!(at("B"), (300.0, 300.0));
		assert_eq!(at("C"), (600.0, 300.0));
		assert_eq!(at("D"), (450.0, 550.0));
		assert_eq!(bands.row(1), 300.0);
	}

	#[test]
	fn circle_places_distinct_points() {
		let data = GraphData::from_pairs(&["a", "b", "c"], &[]);
		let mut forest = Forest::build(&data, DepthPolicy::SingleAssignment, 5.0, 2.0).unwrap();
		place_on_circle(&mut forest, 800.0, 600.0);
		let first = forest.node(0);
		assert!((first.x - 500.0).abs() < 1e-9 && (first.y - 300.0).abs() < 1e-9);
		assert!(forest.node(1).x != forest.node(2).x || forest.node(1).y != forest.node(2).y);
	}
}
