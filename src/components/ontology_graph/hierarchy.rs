use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::config::DepthPolicy;
use super::types::GraphData;
use crate::error::GraphError;

/// Handle of a node inside its [`Forest`].
pub type NodeIdx = usize;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub label: String,
	pub depth: usize,
	/// Lookup into the owning forest, not an ownership edge.
	pub parent: Option<NodeIdx>,
	pub children: Vec<NodeIdx>,
	pub collapsed: bool,
	pub tagged: bool,
	pub size: f64,
	pub original_size: f64,
	pub x: f64,
	pub y: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
	pub color: Option<String>,
}

impl Node {
	fn new(id: &str, label: Option<&str>, color: Option<String>, size: f64) -> Self {
		let label = match label {
			Some(l) if !l.is_empty() => l.to_string(),
			_ => id.to_string(),
		};
		Self {
			id: id.to_string(),
			label,
			depth: 0,
			parent: None,
			children: Vec::new(),
			collapsed: false,
			tagged: false,
			size,
			original_size: size,
			x: 0.0,
			y: 0.0,
			fx: None,
			fy: None,
			color,
		}
	}

	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}

	pub fn pin(&mut self, x: f64, y: f64) {
		self.fx = Some(x);
		self.fy = Some(y);
	}

	pub fn unpin(&mut self) {
		self.fx = None;
		self.fy = None;
	}
}

/// A resolved `source -> target` link. Source is the parent side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	pub source: NodeIdx,
	pub target: NodeIdx,
	pub value: Option<f64>,
}

impl Link {
	pub fn is_self_loop(&self) -> bool {
		self.source == self.target
	}
}

/// Arena of nodes with a parent forest and depth annotations.
///
/// Every node has at most one parent (the source of its first resolvable
/// incoming link) and `children` only lists nodes whose parent is this node,
/// so following `children` from the roots reaches every node exactly once.
/// All resolvable links stay in [`Forest::links`] for the solver and renderer.
#[derive(Clone, Debug)]
pub struct Forest {
	nodes: Vec<Node>,
	links: Vec<Link>,
	index: HashMap<String, NodeIdx>,
	roots: Vec<NodeIdx>,
	max_depth: usize,
	collapsed_size: f64,
}

impl Forest {
	pub fn build(
		data: &GraphData,
		policy: DepthPolicy,
		size: f64,
		collapsed_size: f64,
	) -> Result<Self, GraphError> {
		if data.nodes.is_empty() {
			return Err(GraphError::EmptyGraph);
		}

		let mut nodes: Vec<Node> = Vec::with_capacity(data.nodes.len());
		let mut index = HashMap::with_capacity(data.nodes.len());
		for raw in &data.nodes {
			if index.contains_key(&raw.id) {
				warn!("duplicate node id {:?}, keeping the first occurrence", raw.id);
				continue;
			}
			index.insert(raw.id.clone(), nodes.len());
			nodes.push(Node::new(
				&raw.id,
				raw.label.as_deref(),
				raw.color.clone(),
				size,
			));
		}

		let mut links = Vec::with_capacity(data.links.len());
		for raw in &data.links {
			let (Some(&source), Some(&target)) = (index.get(&raw.source), index.get(&raw.target))
			else {
				debug!("dropping link {} -> {}: unknown endpoint", raw.source, raw.target);
				continue;
			};
			links.push(Link {
				source,
				target,
				value: raw.value,
			});
			if source != target && nodes[target].parent.is_none() {
				nodes[target].parent = Some(source);
				nodes[source].children.push(target);
			}
		}

		let mut forest = Self {
			nodes,
			links,
			index,
			roots: Vec::new(),
			max_depth: 0,
			collapsed_size,
		};
		forest.assign_tree_depths();
		if policy == DepthPolicy::MaxAssignment {
			forest.assign_max_depths();
		}
		forest.max_depth = forest.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
		debug!(
			"built forest: {} nodes, {} links, {} roots, max depth {}",
			forest.nodes.len(),
			forest.links.len(),
			forest.roots.len(),
			forest.max_depth
		);
		Ok(forest)
	}

	/// Walks the parent forest from every root. Nodes left unreached sit on
	/// (or below) a parent cycle; a cycle member is detached from its parent
	/// and promoted to a root until everything is reached.
	fn assign_tree_depths(&mut self) {
		let mut visited = vec![false; self.nodes.len()];
		let mut roots: Vec<NodeIdx> = (0..self.nodes.len())
			.filter(|&i| self.nodes[i].parent.is_none())
			.collect();
		for &root in &roots {
			self.descend(root, &mut visited);
		}

		while let Some(unreached) = visited.iter().position(|v| !v) {
			let entry = self.cycle_member(unreached);
			warn!(
				"node {:?} is on a parent cycle, promoting it to a root",
				self.nodes[entry].id
			);
			if let Some(parent) = self.nodes[entry].parent.take() {
				self.nodes[parent].children.retain(|&c| c != entry);
			}
			roots.push(entry);
			self.descend(entry, &mut visited);
		}
		self.roots = roots;
	}

	fn descend(&mut self, root: NodeIdx, visited: &mut [bool]) {
		let mut stack = vec![(root, 0)];
		while let Some((idx, depth)) = stack.pop() {
			if visited[idx] {
				continue;
			}
			visited[idx] = true;
			self.nodes[idx].depth = depth;
			stack.extend(self.nodes[idx].children.iter().rev().map(|&c| (c, depth + 1)));
		}
	}

	fn cycle_member(&self, start: NodeIdx) -> NodeIdx {
		let mut seen = HashSet::new();
		let mut current = start;
		while seen.insert(current) {
			match self.nodes[current].parent {
				Some(parent) => current = parent,
				None => break,
			}
		}
		current
	}

	/// Longest-path depths over every link except those closing a cycle.
	///
	/// A depth-first walk from the roots marks each link that points back to a
	/// node still on the walk; the remaining links form a DAG whose reverse
	/// postorder is topological, so one relaxation pass settles every depth.
	fn assign_max_depths(&mut self) {
		let len = self.nodes.len();
		let mut outgoing: Vec<Vec<NodeIdx>> = vec![Vec::new(); len];
		for link in self.links.iter().filter(|l| !l.is_self_loop()) {
			outgoing[link.source].push(link.target);
		}

		let (mut on_walk, mut done) = (vec![false; len], vec![false; len]);
		let mut acyclic: Vec<Vec<NodeIdx>> = vec![Vec::new(); len];
		let mut postorder = Vec::with_capacity(len);
		let starts: Vec<NodeIdx> = self.roots.iter().copied().chain(0..len).collect();
		for start in starts {
			if on_walk[start] || done[start] {
				continue;
			}
			on_walk[start] = true;
			let mut stack = vec![(start, 0usize)];
			while let Some((idx, next)) = stack.pop() {
				let Some(&target) = outgoing[idx].get(next) else {
					on_walk[idx] = false;
					done[idx] = true;
					postorder.push(idx);
					continue;
				};
				stack.push((idx, next + 1));
				if on_walk[target] {
					debug!(
						"ignoring cycle-closing link {} -> {}",
						self.nodes[idx].id, self.nodes[target].id
					);
					continue;
				}
				acyclic[idx].push(target);
				if !done[target] {
					on_walk[target] = true;
					stack.push((target, 0));
				}
			}
		}

		for node in &mut self.nodes {
			node.depth = 0;
		}
		for &idx in postorder.iter().rev() {
			let next = self.nodes[idx].depth + 1;
			for &target in &acyclic[idx] {
				if self.nodes[target].depth < next {
					self.nodes[target].depth = next;
				}
			}
		}
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn get(&self, id: &str) -> Option<NodeIdx> {
		self.index.get(id).copied()
	}

	pub fn node(&self, idx: NodeIdx) -> &Node {
		&self.nodes[idx]
	}

	pub fn node_mut(&mut self, idx: NodeIdx) -> &mut Node {
		&mut self.nodes[idx]
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn roots(&self) -> &[NodeIdx] {
		&self.roots
	}

	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	pub fn collapsed_size(&self) -> f64 {
		self.collapsed_size
	}

	/// Every node below `idx` in the parent forest, preorder.
	pub fn descendants(&self, idx: NodeIdx) -> Vec<NodeIdx> {
		let mut out = Vec::new();
		let mut stack: Vec<NodeIdx> = self.nodes[idx].children.iter().rev().copied().collect();
		while let Some(current) = stack.pop() {
			out.push(current);
			stack.extend(self.nodes[current].children.iter().rev());
		}
		out
	}
}
