use log::debug;

use super::config::ClickBinding;
use super::hierarchy::NodeIdx;
use super::state::ViewContext;

/// Pointer travel (screen px) below which a press counts as a click.
const CLICK_SLOP: f64 = 3.0;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<NodeIdx>,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// The open context menu, anchored at page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContextMenu {
	pub node: NodeIdx,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
	ToggleCollapse,
	ToggleTag,
	ShowInfo,
}

/// Read-only summary shown in the info panel.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDetails {
	pub id: String,
	pub label: String,
	pub depth: usize,
	pub parent: Option<(String, String)>,
	pub children: Vec<(String, String)>,
}

/// Position of the movable info panel. Lives outside the graph state so a
/// redraw never moves it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanelDrag {
	pub offset: (f64, f64),
	grab: Option<(f64, f64)>,
}

impl PanelDrag {
	pub fn open_at(&mut self, x: f64, y: f64) {
		self.offset = (x, y);
		self.grab = None;
	}

	pub fn grab(&mut self, px: f64, py: f64) {
		self.grab = Some((px - self.offset.0, py - self.offset.1));
	}

	/// Returns false when the header is not held.
	pub fn drag(&mut self, px: f64, py: f64) -> bool {
		let Some((gx, gy)) = self.grab else {
			return false;
		};
		self.offset = (px - gx, py - gy);
		true
	}

	pub fn release(&mut self) {
		self.grab = None;
	}

	pub fn is_grabbed(&self) -> bool {
		self.grab.is_some()
	}
}

impl ViewContext {
	pub fn toggle_collapse(&mut self, idx: NodeIdx) -> bool {
		let collapsed = self.forest.toggle(idx);
		debug!(
			"{} {}",
			if collapsed { "collapsed" } else { "expanded" },
			self.forest.node(idx).id
		);
		self.refresh();
		collapsed
	}

	/// Tags or untags `idx`. A non-blank `color` overrides the node colour
	/// while it stays tagged.
	pub fn set_tag(&mut self, idx: NodeIdx, tagged: bool, color: Option<String>) {
		if !self.alignment.set_tag(&mut self.forest, idx, tagged) {
			return;
		}
		if tagged {
			if let Some(color) = color.filter(|c| !c.trim().is_empty()) {
				let previous = self.forest.node_mut(idx).color.replace(color);
				self.colors_before_tag.insert(idx, previous);
			}
		} else if let Some(previous) = self.colors_before_tag.remove(&idx) {
			self.forest.node_mut(idx).color = previous;
		}
		self.realign();
		self.refresh();
	}

	pub fn toggle_tag(&mut self, idx: NodeIdx, color: Option<String>) {
		let tagged = !self.forest.node(idx).tagged;
		self.set_tag(idx, tagged, color);
	}

	pub fn begin_drag(&mut self, idx: NodeIdx, sx: f64, sy: f64) {
		let node = self.forest.node_mut(idx);
		let (x, y) = (node.x, node.y);
		node.pin(x, y);
		self.drag = DragState {
			node: Some(idx),
			moved: false,
			start_x: sx,
			start_y: sy,
			node_start_x: x,
			node_start_y: y,
		};
		self.solver.set_alpha_target(self.config.solver.drag_alpha_target);
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node else {
			return;
		};
		let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
		if !self.drag.moved && dx.hypot(dy) < CLICK_SLOP {
			return;
		}
		self.drag.moved = true;
		let k = self.transform.k;
		let (x, y) = (self.drag.node_start_x + dx / k, self.drag.node_start_y + dy / k);
		self.forest.node_mut(idx).pin(x, y);
	}

	/// Ends a drag. Tagged nodes keep their pin. Returns the node when the
	/// pointer never left the click slop.
	pub fn end_drag(&mut self) -> Option<NodeIdx> {
		let idx = self.drag.node?;
		let drag = std::mem::take(&mut self.drag);
		self.solver.set_alpha_target(0.0);
		let node = self.forest.node_mut(idx);
		if !node.tagged {
			node.unpin();
		}
		(!drag.moved).then_some(idx)
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.node_at_position(sx, sy) {
			self.begin_drag(idx, sx, sy);
		} else {
			self.menu = None;
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if self.drag.node.is_some() {
			self.drag_to(sx, sy);
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	pub fn pointer_up(&mut self) {
		self.pan.active = false;
		if let Some(idx) = self.end_drag() {
			self.click(idx);
		}
	}

	pub fn pointer_leave(&mut self) {
		self.end_drag();
		self.pan.active = false;
	}

	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn click(&mut self, idx: NodeIdx) {
		match self.config.click {
			ClickBinding::ToggleTag => self.toggle_tag(idx, None),
			ClickBinding::ContextMenu => {}
		}
	}

	/// Opens (or moves) the context menu for the node under the pointer.
	/// Anywhere else it closes the menu.
	pub fn open_menu(&mut self, sx: f64, sy: f64, page_x: f64, page_y: f64) -> Option<ContextMenu> {
		if self.config.click != ClickBinding::ContextMenu {
			return None;
		}
		self.menu = self.node_at_position(sx, sy).map(|node| ContextMenu {
			node,
			x: page_x,
			y: page_y,
		});
		self.menu
	}

	pub fn close_menu(&mut self) {
		self.menu = None;
	}

	/// Runs `action` on the menu's node and closes the menu. `ShowInfo`
	/// yields the details to display.
	pub fn apply_menu_action(
		&mut self,
		action: MenuAction,
		color: Option<String>,
	) -> Option<NodeDetails> {
		let menu = self.menu.take()?;
		match action {
			MenuAction::ToggleCollapse => {
				self.toggle_collapse(menu.node);
				None
			}
			MenuAction::ToggleTag => {
				self.toggle_tag(menu.node, color);
				None
			}
			MenuAction::ShowInfo => Some(self.details(menu.node)),
		}
	}

	pub fn details(&self, idx: NodeIdx) -> NodeDetails {
		let node = self.forest.node(idx);
		let pair = |i: NodeIdx| {
			let n = self.forest.node(i);
			(n.id.clone(), n.label.clone())
		};
		NodeDetails {
			id: node.id.clone(),
			label: node.label.clone(),
			depth: node.depth,
			parent: node.parent.map(pair),
			children: node.children.iter().copied().map(pair).collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::ontology_graph::config::EngineConfig;
	use crate::components::ontology_graph::hierarchy::Node;
	use crate::components::ontology_graph::types::GraphData;

	fn view(config: EngineConfig) -> ViewContext {
		let data = GraphData::from_pairs(
			&["A", "B", "C", "D"],
			&[("A", "B"), ("A", "C"), ("B", "D")],
		);
		ViewContext::new(&data, config, 900.0, 600.0).unwrap()
	}

	fn idx(view: &ViewContext, id: &str) -> NodeIdx {
		view.forest.get(id).unwrap()
	}

	fn is_pinned(node: &Node) -> bool {
		node.fx.is_some() || node.fy.is_some()
	}

	fn screen(view: &ViewContext, idx: NodeIdx) -> (f64, f64) {
		let n = view.forest.node(idx);
		(n.x, n.y)
	}

	fn settle(view: &mut ViewContext) {
		let mut steps = 0;
		while view.tick(0.016) {
			steps += 1;
			assert!(steps < 2000);
		}
	}

	#[test]
	fn drag_pins_then_releases() {
		let mut view = view(EngineConfig::hierarchy_explorer());
		let b = idx(&view, "B");
		let (sx, sy) = screen(&view, b);

		view.pointer_down(sx, sy);
		assert_eq!(view.drag.node, Some(b));
		assert_eq!(view.forest.node(b).fx, Some(sx));

		view.pointer_move(sx + 40.0, sy - 10.0);
		assert_eq!(view.forest.node(b).fx, Some(sx + 40.0));
		assert_eq!(view.forest.node(b).fy, Some(sy - 10.0));
		view.tick(0.016);
		assert_eq!(screen(&view, b), (sx + 40.0, sy - 10.0));

		view.pointer_up();
		assert!(!is_pinned(view.forest.node(b)));
		assert_eq!(view.drag.node, None);
	}

	#[test]
	fn tagged_node_keeps_pin_after_drag() {
		let mut view = view(EngineConfig::tag_aligner());
		let c = idx(&view, "C");
		view.set_tag(c, true, None);
		view.tick(0.016);
		let (sx, sy) = screen(&view, c);
		assert_eq!((sx, sy), (450.0, 300.0));

		view.pointer_down(sx, sy);
		view.pointer_move(sx + 50.0, sy + 50.0);
		view.pointer_up();
		assert_eq!(view.forest.node(c).fx, Some(500.0));
		assert!(view.forest.node(c).tagged);
	}

	#[test]
	fn click_toggles_tag_in_tagging_binding() {
		let mut view = view(EngineConfig::tag_aligner());
		settle(&mut view);
		let d = idx(&view, "D");
		let (sx, sy) = screen(&view, d);

		view.pointer_down(sx, sy);
		view.pointer_up();
		assert!(view.forest.node(d).tagged);
		assert!(!view.is_settled());
		assert_eq!(view.forest.node(d).fy, Some(300.0));
		assert_eq!(view.visuals.nodes[d].fill, view.config().palette.tagged);

		view.tick(0.016);
		view.pointer_down(450.0, 300.0);
		view.pointer_up();
		assert!(!view.forest.node(d).tagged);
		assert!(!is_pinned(view.forest.node(d)));
	}

	#[test]
	fn click_is_reserved_with_context_menu() {
		let mut view = view(EngineConfig::hierarchy_explorer());
		let c = idx(&view, "C");
		let (sx, sy) = screen(&view, c);
		view.pointer_down(sx, sy);
		view.pointer_up();
		assert!(!view.forest.node(c).tagged);
	}

	#[test]
	fn context_menu_is_single_and_dismissable() {
		let mut view = view(EngineConfig::hierarchy_explorer());
		let (b, c) = (idx(&view, "B"), idx(&view, "C"));
		let (bx, by) = screen(&view, b);
		let (cx, cy) = screen(&view, c);

		assert_eq!(view.open_menu(bx, by, 10.0, 20.0).map(|m| m.node), Some(b));
		assert_eq!(view.open_menu(cx, cy, 30.0, 40.0).map(|m| m.node), Some(c));
		assert_eq!(view.menu.map(|m| (m.x, m.y)), Some((30.0, 40.0)));

		view.pointer_down(5.0, 595.0);
		assert_eq!(view.menu, None);
		assert_eq!(view.open_menu(5.0, 595.0, 0.0, 0.0), None);

		view.open_menu(bx, by, 10.0, 20.0);
		assert_eq!(view.open_menu(5.0, 595.0, 0.0, 0.0), None);
		assert_eq!(view.menu, None);
	}

	#[test]
	fn tag_aligner_has_no_context_menu() {
		let mut view = view(EngineConfig::tag_aligner());
		let (ax, ay) = screen(&view, idx(&view, "A"));
		assert_eq!(view.open_menu(ax, ay, 0.0, 0.0), None);
	}

	#[test]
	fn menu_collapse_reheats() {
		let mut view = view(EngineConfig::hierarchy_explorer());
		settle(&mut view);
		assert!(view.is_settled());

		let a = idx(&view, "A");
		let (ax, ay) = screen(&view, a);
		view.open_menu(ax, ay, 0.0, 0.0);
		assert_eq!(view.apply_menu_action(MenuAction::ToggleCollapse, None), None);
		assert!(view.forest.node(a).collapsed);
		assert!(!view.is_settled());
		assert_eq!(view.visuals.nodes[idx(&view, "D")].radius, 2.0);
		assert_eq!(view.menu, None);
	}

	#[test]
	fn menu_tag_applies_and_restores_color() {
		let mut view = view(EngineConfig::hierarchy_explorer());
		let c = idx(&view, "C");
		let (cx, cy) = screen(&view, c);

		view.open_menu(cx, cy, 0.0, 0.0);
		view.apply_menu_action(MenuAction::ToggleTag, Some("#00ff00".into()));
		assert!(view.forest.node(c).tagged);
		assert_eq!(view.visuals.nodes[c].fill, "#00ff00");
		assert_eq!(view.forest.node(c).fy, Some(view.bands.row(1)));

		view.toggle_tag(c, None);
		assert_eq!(view.forest.node(c).color, None);
		assert_eq!(view.visuals.nodes[c].fill, view.config().palette.default);
	}

	#[test]
	fn blank_color_answer_keeps_palette() {
		let mut view = view(EngineConfig::hierarchy_explorer());
		let c = idx(&view, "C");
		view.set_tag(c, true, Some("   ".into()));
		assert_eq!(view.forest.node(c).color, None);
	}

	#[test]
	fn info_lists_parent_and_children() {
		let mut view = view(EngineConfig::hierarchy_explorer());
		let b = idx(&view, "B");
		let (bx, by) = screen(&view, b);
		view.open_menu(bx, by, 0.0, 0.0);
		let details = view.apply_menu_action(MenuAction::ShowInfo, None).unwrap();
		assert_eq!(details.id, "B");
		assert_eq!(details.depth, 1);
		assert_eq!(details.parent, Some(("A".into(), "A".into())));
		assert_eq!(details.children, vec![("D".to_string(), "D".to_string())]);

		let root = view.details(idx(&view, "A"));
		assert_eq!(root.parent, None);
		assert_eq!(root.children.len(), 2);
	}

	#[test]
	fn tagging_during_drag_keeps_drag_pin() {
		let mut view = view(EngineConfig::tag_aligner());
		let (b, c) = (idx(&view, "B"), idx(&view, "C"));
		let (bx, by) = screen(&view, b);
		view.pointer_down(bx, by);
		view.set_tag(c, true, None);
		assert_eq!(view.forest.node(b).fx, Some(bx));
		view.pointer_move(bx + 20.0, by);
		view.pointer_up();
		assert!(!is_pinned(view.forest.node(b)));
		assert!(is_pinned(view.forest.node(c)));
	}

	#[test]
	fn resize_moves_settled_nodes_to_new_bands() {
		let mut view = view(EngineConfig::hierarchy_explorer());
		settle(&mut view);
		let d = idx(&view, "D");
		let before = view.forest.node(d).y;

		view.resize(450.0, 300.0);
		let row = view.bands.row(2);
		assert_eq!(row, 250.0);
		assert!(!view.is_settled());
		settle(&mut view);
		let after = view.forest.node(d).y;
		assert!((after - row).abs() < (before - row).abs(), "{before} -> {after}");
	}

	#[test]
	fn zoom_keeps_pointer_fixed_and_clamps() {
		let mut view = view(EngineConfig::hierarchy_explorer());
		let before = view.screen_to_graph(200.0, 100.0);
		view.zoom(200.0, 100.0, -1.0);
		let after = view.screen_to_graph(200.0, 100.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		for _ in 0..100 {
			view.zoom(0.0, 0.0, 1.0);
		}
		assert!((view.transform.k - 0.1).abs() < 1e-9);
	}

	#[test]
	fn panel_drag_moves_by_header_offset() {
		let mut panel = PanelDrag::default();
		panel.open_at(100.0, 50.0);
		assert!(!panel.drag(0.0, 0.0));

		panel.grab(110.0, 60.0);
		assert!(panel.is_grabbed());
		assert!(panel.drag(150.0, 80.0));
		assert_eq!(panel.offset, (140.0, 70.0));
		panel.release();
		assert!(!panel.drag(0.0, 0.0));
		assert_eq!(panel.offset, (140.0, 70.0));
	}
}
