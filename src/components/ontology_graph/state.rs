use std::collections::HashMap;

use log::info;

use super::alignment::Alignment;
use super::config::{EngineConfig, Positioning};
use super::hierarchy::{Forest, NodeIdx};
use super::interaction::{ContextMenu, DragState, PanState};
use super::layout::{DepthBands, place_in_bands, place_on_circle};
use super::solver::{PositionSolver, TickFrame};
use super::types::GraphData;
use super::visibility::Visuals;
use crate::error::GraphError;

/// Smallest pick radius in graph units, so shrunk nodes stay grabbable.
pub const HIT_RADIUS: f64 = 8.0;

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

/// Everything one graph view owns: the forest, the solver driving it, the
/// tagged set and the transient pointer state. Controllers are methods on
/// this type; nothing lives in globals.
pub struct ViewContext {
	pub forest: Forest,
	pub visuals: Visuals,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub menu: Option<ContextMenu>,
	pub width: f64,
	pub height: f64,
	pub(super) solver: PositionSolver,
	pub(super) alignment: Alignment,
	pub(super) config: EngineConfig,
	pub(super) bands: DepthBands,
	/// Colour a node had before tagging replaced it.
	pub(super) colors_before_tag: HashMap<NodeIdx, Option<String>>,
}

impl ViewContext {
	pub fn new(
		data: &GraphData,
		config: EngineConfig,
		width: f64,
		height: f64,
	) -> Result<Self, GraphError> {
		let mut forest = Forest::build(
			data,
			config.depth_policy,
			config.node_radius,
			config.collapsed_radius,
		)?;
		let bands = DepthBands::new(&forest, width, height, config.solver.band_margin);
		match config.positioning {
			Positioning::DepthBands { .. } => place_in_bands(&mut forest, &bands),
			Positioning::Centered { .. } => place_on_circle(&mut forest, width, height),
		}
		let solver = PositionSolver::new(
			&forest,
			&config.solver,
			config.positioning,
			&bands,
			width,
			height,
		);
		let visuals = Visuals::derive(&forest, &config.palette);
		info!(
			"graph view ready: {} nodes, {} links, {} roots, depth {}",
			forest.len(),
			forest.links().len(),
			forest.roots().len(),
			forest.max_depth()
		);

		Ok(Self {
			forest,
			visuals,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			menu: None,
			width,
			height,
			solver,
			alignment: Alignment::new(config.tag_row),
			config,
			bands,
			colors_before_tag: HashMap::new(),
		})
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn frame(&self) -> &TickFrame {
		self.solver.frame()
	}

	pub fn on_tick(&mut self, listener: impl FnMut(&TickFrame) + 'static) {
		self.solver.on_tick(listener);
	}

	pub fn is_settled(&self) -> bool {
		self.solver.is_settled()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		for (idx, node) in self.forest.nodes().iter().enumerate() {
			let reach = self.visuals.nodes[idx].radius.max(HIT_RADIUS);
			if (node.x - gx).hypot(node.y - gy) < reach {
				found = Some(idx);
			}
		}
		found
	}

	/// Advances the simulation; false once it has settled.
	pub fn tick(&mut self, dt: f32) -> bool {
		self.solver.step(&mut self.forest, dt)
	}

	/// Recomputes visuals and reheats after a state change.
	pub(super) fn refresh(&mut self) {
		self.visuals = Visuals::derive(&self.forest, &self.config.palette);
		self.solver.reheat();
	}

	pub(super) fn realign(&mut self) {
		self.alignment.apply(
			&mut self.forest,
			&self.bands,
			self.width,
			self.height,
			self.drag.node,
		);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.bands = DepthBands::new(&self.forest, width, height, self.config.solver.band_margin);
		self.solver.retarget(&self.forest, &self.bands, width, height);
		if !self.alignment.tagged().is_empty() {
			self.realign();
		}
		self.solver.reheat();
	}
}
