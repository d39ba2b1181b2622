use super::config::TagRow;
use super::hierarchy::{Forest, NodeIdx};
use super::layout::DepthBands;

/// Owns the tagged set and the pins it implies.
///
/// Slots follow the order in which nodes were tagged, not their position on
/// screen: retagging never re-sorts the row.
#[derive(Clone, Debug)]
pub struct Alignment {
	order: Vec<NodeIdx>,
	row: TagRow,
}

impl Alignment {
	pub fn new(row: TagRow) -> Self {
		Self {
			order: Vec::new(),
			row,
		}
	}

	pub fn tagged(&self) -> &[NodeIdx] {
		&self.order
	}

	/// Returns false when the node already had the requested state.
	pub fn set_tag(&mut self, forest: &mut Forest, idx: NodeIdx, tagged: bool) -> bool {
		if forest.node(idx).tagged == tagged {
			return false;
		}
		forest.node_mut(idx).tagged = tagged;
		if tagged {
			self.order.push(idx);
		} else {
			self.order.retain(|&i| i != idx);
		}
		true
	}

	/// Pins tagged nodes to their slots and releases every other pin except `held`.
	pub fn apply(
		&self,
		forest: &mut Forest,
		bands: &DepthBands,
		width: f64,
		height: f64,
		held: Option<NodeIdx>,
	) {
		let k = self.order.len();
		for (i, &idx) in self.order.iter().enumerate() {
			let x = (i + 1) as f64 * width / (k + 1) as f64;
			let y = match self.row {
				TagRow::MidHeight => height / 2.0,
				TagRow::DepthBand => bands.row(forest.node(idx).depth),
			};
			forest.node_mut(idx).pin(x, y);
		}
		for (idx, node) in forest.nodes_mut().iter_mut().enumerate() {
			if !node.tagged && held != Some(idx) {
				node.unpin();
			}
		}
	}
}
