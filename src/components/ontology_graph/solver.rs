use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::config::{Positioning, SolverConfig};
use super::hierarchy::{Forest, NodeIdx};
use super::layout::DepthBands;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodePosition {
	pub idx: NodeIdx,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkSegment {
	/// Index into [`Forest::links`].
	pub link: usize,
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

/// Coordinates published once per simulation step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickFrame {
	pub nodes: Vec<NodePosition>,
	pub links: Vec<LinkSegment>,
}

pub type TickListener = Box<dyn FnMut(&TickFrame)>;

/// Drives `force_graph` for a forest.
///
/// The external solver owns repulsion, edge springs and integration. On top
/// of it this adapter keeps a d3-style energy (`alpha`) that decays every
/// step, a rest-length correction per link, the positional bias of the
/// active [`Positioning`], and pin enforcement. Positions live in the forest;
/// the solver graph is reloaded from it at the start of every step.
pub struct PositionSolver {
	graph: ForceGraph<NodeIdx, ()>,
	config: SolverConfig,
	positioning: Positioning,
	targets: Vec<(f64, f64)>,
	/// `(strength, bias)` per link, weighted by endpoint degree.
	link_weights: Vec<(f64, f64)>,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	frame: TickFrame,
	listeners: Vec<TickListener>,
}

impl PositionSolver {
	pub fn new(
		forest: &Forest,
		config: &SolverConfig,
		positioning: Positioning,
		bands: &DepthBands,
		width: f64,
		height: f64,
	) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: config.charge,
			force_spring: config.spring,
			force_max: config.max_force,
			node_speed: config.node_speed,
			damping_factor: config.damping,
		});
		let handles: Vec<DefaultNodeIdx> = forest
			.nodes()
			.iter()
			.enumerate()
			.map(|(idx, node)| {
				graph.add_node(NodeData {
					x: node.x as f32,
					y: node.y as f32,
					mass: config.node_mass,
					is_anchor: node.fx.is_some() && node.fy.is_some(),
					user_data: idx,
				})
			})
			.collect();

		let mut degree = vec![0usize; forest.len()];
		for link in forest.links().iter().filter(|l| !l.is_self_loop()) {
			graph.add_edge(handles[link.source], handles[link.target], EdgeData::default());
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		let link_weights = forest
			.links()
			.iter()
			.map(|link| {
				let s = degree[link.source].max(1) as f64;
				let t = degree[link.target].max(1) as f64;
				(1.0 / s.min(t), s / (s + t))
			})
			.collect();

		let mut solver = Self {
			graph,
			config: config.clone(),
			positioning,
			targets: Vec::new(),
			link_weights,
			center: (width / 2.0, height / 2.0),
			alpha: 1.0,
			alpha_target: 0.0,
			frame: TickFrame::default(),
			listeners: Vec::new(),
		};
		solver.retarget(forest, bands, width, height);
		solver.capture(forest);
		solver
	}

	/// Recomputes bias targets after the canvas changed size.
	pub fn retarget(&mut self, forest: &Forest, bands: &DepthBands, width: f64, height: f64) {
		self.targets = (0..forest.len()).map(|idx| bands.slot(idx)).collect();
		self.center = (width / 2.0, height / 2.0);
	}

	pub fn on_tick(&mut self, listener: impl FnMut(&TickFrame) + 'static) {
		self.listeners.push(Box::new(listener));
	}

	pub fn frame(&self) -> &TickFrame {
		&self.frame
	}

	pub fn is_settled(&self) -> bool {
		self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
	}

	/// Back to full energy so the layout visibly re-settles.
	pub fn reheat(&mut self) {
		self.alpha = 1.0;
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Advances one step. Returns false without touching anything once settled.
	pub fn step(&mut self, forest: &mut Forest, dt: f32) -> bool {
		if self.is_settled() {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.load(forest);
		self.graph.update(dt);
		self.graph.visit_nodes(|node| {
			let n = forest.node_mut(node.data.user_data);
			n.x = node.x() as f64;
			n.y = node.y() as f64;
		});

		self.constrain_links(forest);
		self.bias(forest);
		enforce_pins(forest);
		self.capture(forest);
		true
	}

	fn load(&mut self, forest: &Forest) {
		self.graph.visit_nodes_mut(|node| {
			let n = forest.node(node.data.user_data);
			node.data.x = n.fx.unwrap_or(n.x) as f32;
			node.data.y = n.fy.unwrap_or(n.y) as f32;
			node.data.is_anchor = n.fx.is_some() && n.fy.is_some();
		});
	}

	fn constrain_links(&self, forest: &mut Forest) {
		for (i, &(strength, bias)) in self.link_weights.iter().enumerate() {
			let link = forest.links()[i];
			if link.is_self_loop() {
				continue;
			}
			let (source, target) = (forest.node(link.source), forest.node(link.target));
			let (dx, dy) = (target.x - source.x, target.y - source.y);
			let len = dx.hypot(dy);
			if len < f64::EPSILON {
				continue;
			}
			let k = (len - self.config.link_distance) / len * self.alpha * strength;
			let (mx, my) = (dx * k, dy * k);

			let target = forest.node_mut(link.target);
			target.x -= mx * bias;
			target.y -= my * bias;
			let source = forest.node_mut(link.source);
			source.x += mx * (1.0 - bias);
			source.y += my * (1.0 - bias);
		}
	}

	fn bias(&self, forest: &mut Forest) {
		let alpha = self.alpha;
		match self.positioning {
			Positioning::DepthBands {
				x_strength,
				y_strength,
			} => {
				for (idx, node) in forest.nodes_mut().iter_mut().enumerate() {
					let (tx, ty) = self.targets[idx];
					node.x += (tx - node.x) * x_strength * alpha;
					node.y += (ty - node.y) * y_strength * alpha;
				}
			}
			Positioning::Centered {
				strength,
				band_strength,
			} => {
				let n = forest.len() as f64;
				let (sx, sy) = forest
					.nodes()
					.iter()
					.fold((0.0, 0.0), |(x, y), node| (x + node.x, y + node.y));
				let shift = (
					(sx / n - self.center.0) * strength,
					(sy / n - self.center.1) * strength,
				);
				for (idx, node) in forest.nodes_mut().iter_mut().enumerate() {
					node.x -= shift.0;
					node.y -= shift.1;
					if let Some(k) = band_strength {
						node.y += (self.targets[idx].1 - node.y) * k * alpha;
					}
				}
			}
		}
	}

	fn capture(&mut self, forest: &Forest) {
		self.frame.nodes.clear();
		self.frame
			.nodes
			.extend(forest.nodes().iter().enumerate().map(|(idx, n)| NodePosition {
				idx,
				x: n.x,
				y: n.y,
			}));
		self.frame.links.clear();
		self.frame
			.links
			.extend(forest.links().iter().enumerate().map(|(i, l)| {
				let (s, t) = (forest.node(l.source), forest.node(l.target));
				LinkSegment {
					link: i,
					x1: s.x,
					y1: s.y,
					x2: t.x,
					y2: t.y,
				}
			}));
		for listener in &mut self.listeners {
			listener(&self.frame);
		}
	}
}

/// The solver never keeps a coordinate on a pinned axis.
fn enforce_pins(forest: &mut Forest) {
	for node in forest.nodes_mut() {
		if let Some(fx) = node.fx {
			node.x = fx;
		}
		if let Some(fy) = node.fy {
			node.y = fy;
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use super::*;
	use crate::components::ontology_graph::config::{DepthPolicy, EngineConfig};
	use crate::components::ontology_graph::layout::{place_in_bands, place_on_circle};
	use crate::components::ontology_graph::types::GraphData;

	const W: f64 = 900.0;
	const H: f64 = 600.0;
	const DT: f32 = 0.016;

	fn banded(ids: &[&str], links: &[(&str, &str)]) -> (Forest, PositionSolver) {
		let config = EngineConfig::hierarchy_explorer();
		let data = GraphData::from_pairs(ids, links);
		let mut forest = Forest::build(&data, DepthPolicy::SingleAssignment, 10.0, 2.0).unwrap();
		let bands = DepthBands::new(&forest, W, H, config.solver.band_margin);
		place_in_bands(&mut forest, &bands);
		let solver = PositionSolver::new(&forest, &config.solver, config.positioning, &bands, W, H);
		(forest, solver)
	}

	fn sample() -> (Forest, PositionSolver) {
		banded(&["A", "B", "C", "D"], &[("A", "B"), ("A", "C"), ("B", "D")])
	}

	#[test]
	fn pinned_node_never_moves() {
		let (mut forest, mut solver) = sample();
		let b = forest.get("B").unwrap();
		forest.node_mut(b).pin(123.0, 456.0);
		let before: Vec<(f64, f64)> = forest.nodes().iter().map(|n| (n.x, n.y)).collect();

		for _ in 0..50 {
			assert!(solver.step(&mut forest, DT));
			assert_eq!((forest.node(b).x, forest.node(b).y), (123.0, 456.0));
		}
		let after: Vec<(f64, f64)> = forest.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_ne!(before, after);
	}

	#[test]
	fn single_axis_pin_holds_only_that_axis() {
		let (mut forest, mut solver) = sample();
		let c = forest.get("C").unwrap();
		forest.node_mut(c).fx = Some(77.0);
		for _ in 0..20 {
			solver.step(&mut forest, DT);
			assert_eq!(forest.node(c).x, 77.0);
		}
	}

	#[test]
	fn settles_and_reheats() {
		let (mut forest, mut solver) = sample();
		let mut steps = 0;
		while solver.step(&mut forest, DT) {
			steps += 1;
			assert!(steps < 1000, "simulation never settled");
		}
		assert!(solver.is_settled());
		assert!(!solver.step(&mut forest, DT));

		solver.reheat();
		assert_eq!(solver.alpha, 1.0);
		assert!(solver.step(&mut forest, DT));
	}

	#[test]
	fn alpha_target_keeps_simulation_warm() {
		let (mut forest, mut solver) = sample();
		solver.set_alpha_target(0.3);
		for _ in 0..600 {
			assert!(solver.step(&mut forest, DT));
		}
		assert!((solver.alpha - 0.3).abs() < 0.01);
		solver.set_alpha_target(0.0);
		let mut steps = 0;
		while solver.step(&mut forest, DT) {
			steps += 1;
			assert!(steps < 1000);
		}
	}

	#[test]
	fn listeners_receive_every_frame() {
		let (mut forest, mut solver) = sample();
		let calls = Rc::new(Cell::new(0));
		let seen = calls.clone();
		let link_count = forest.links().len();
		solver.on_tick(move |frame| {
			assert_eq!(frame.nodes.len(), 4);
			assert_eq!(frame.links.len(), link_count);
			seen.set(seen.get() + 1);
		});
		for _ in 0..3 {
			solver.step(&mut forest, DT);
		}
		assert_eq!(calls.get(), 3);

		let frame = solver.frame();
		for seg in &frame.links {
			let link = forest.links()[seg.link];
			let (s, t) = (forest.node(link.source), forest.node(link.target));
			assert_eq!((seg.x1, seg.y1, seg.x2, seg.y2), (s.x, s.y, t.x, t.y));
		}
	}

	#[test]
	fn depth_bias_pulls_toward_slot() {
		let (mut forest, mut solver) = banded(&["solo"], &[]);
		forest.node_mut(0).x = 0.0;
		forest.node_mut(0).y = 0.0;
		solver.step(&mut forest, DT);
		let n = forest.node(0);
		assert!(n.x > 0.0 && n.x < W / 2.0, "x = {}", n.x);
		assert!(n.y > 0.0 && n.y < H / 2.0, "y = {}", n.y);
	}

	#[test]
	fn centering_moves_centroid_toward_middle() {
		let config = EngineConfig::tag_aligner();
		let data = GraphData::from_pairs(&["a", "b"], &[]);
		let mut forest = Forest::build(&data, config.depth_policy, 5.0, 2.0).unwrap();
		let bands = DepthBands::new(&forest, W, H, config.solver.band_margin);
		place_on_circle(&mut forest, 200.0, 200.0);
		let mut solver = PositionSolver::new(&forest, &config.solver, config.positioning, &bands, W, H);

		let centroid = |f: &Forest| {
			let (x, y) = f.nodes().iter().fold((0.0, 0.0), |(x, y), n| (x + n.x, y + n.y));
			(x / 2.0, y / 2.0)
		};
		let dist = |(x, y): (f64, f64)| (x - W / 2.0).hypot(y - H / 2.0);
		let before = dist(centroid(&forest));
		solver.step(&mut forest, DT);
		assert!(dist(centroid(&forest)) < before);
	}
}
