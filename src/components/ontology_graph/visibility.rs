use super::config::Palette;
use super::hierarchy::{Forest, NodeIdx};

impl Forest {
	/// Shrinks the whole subtree below `idx`, whatever the descendants' own state.
	pub fn collapse(&mut self, idx: NodeIdx) {
		self.node_mut(idx).collapsed = true;
		self.shrink_below(idx);
	}

	/// Restores the subtree below `idx`. A descendant that is itself
	/// collapsed gets its own size back but keeps its subtree shrunk.
	pub fn expand(&mut self, idx: NodeIdx) {
		self.node_mut(idx).collapsed = false;
		let mut stack: Vec<NodeIdx> = self.node(idx).children.iter().rev().copied().collect();
		while let Some(current) = stack.pop() {
			let collapsed = {
				let node = self.node_mut(current);
				node.size = node.original_size;
				node.collapsed
			};
			if collapsed {
				self.shrink_below(current);
			} else {
				stack.extend(self.node(current).children.iter().rev());
			}
		}
	}

	/// Returns the new collapsed state.
	pub fn toggle(&mut self, idx: NodeIdx) -> bool {
		if self.node(idx).collapsed {
			self.expand(idx);
			false
		} else {
			self.collapse(idx);
			true
		}
	}

	pub fn is_shrunk(&self, idx: NodeIdx) -> bool {
		self.node(idx).size == self.collapsed_size()
	}

	fn shrink_below(&mut self, idx: NodeIdx) {
		let shrunk = self.collapsed_size();
		for d in self.descendants(idx) {
			self.node_mut(d).size = shrunk;
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	pub radius: f64,
	pub fill: String,
	pub label_opacity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkVisual {
	pub opacity: f64,
	pub width: f64,
	pub dimmed: bool,
}

/// Static per-node and per-link attributes for the renderer, indexed like
/// [`Forest::nodes`] and [`Forest::links`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Visuals {
	pub nodes: Vec<NodeVisual>,
	pub links: Vec<LinkVisual>,
}

impl Visuals {
	pub fn derive(forest: &Forest, palette: &Palette) -> Self {
		let nodes = forest
			.nodes()
			.iter()
			.enumerate()
			.map(|(idx, node)| {
				let shrunk = forest.is_shrunk(idx);
				let fill = if let Some(color) = &node.color {
					color.clone()
				} else if node.tagged {
					palette.tagged.clone()
				} else if node.depth == 0 {
					palette.root.clone()
				} else if node.collapsed {
					palette.collapsed.clone()
				} else {
					palette.default.clone()
				};
				NodeVisual {
					radius: if shrunk {
						forest.collapsed_size()
					} else {
						node.original_size
					},
					fill,
					label_opacity: if shrunk { 0.0 } else { 1.0 },
				}
			})
			.collect();

		let links = forest
			.links()
			.iter()
			.map(|link| {
				let dimmed = forest.node(link.source).collapsed
					|| forest.is_shrunk(link.source)
					|| forest.is_shrunk(link.target);
				if dimmed {
					LinkVisual {
						opacity: 0.3,
						width: 1.0,
						dimmed,
					}
				} else {
					LinkVisual {
						opacity: 1.0,
						width: link.value.map(f64::sqrt).unwrap_or(2.0),
						dimmed,
					}
				}
			})
			.collect();

		Self { nodes, links }
	}
}
