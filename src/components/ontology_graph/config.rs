/// How depths are assigned when a node is reachable along several paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DepthPolicy {
	/// Depth is fixed on first visit along the parent forest.
	#[default]
	SingleAssignment,
	/// Depth is the longest path from a root over all links.
	MaxAssignment,
}

/// Positional force layered on top of the solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Positioning {
	/// Pull every node toward its depth-band slot.
	DepthBands { x_strength: f64, y_strength: f64 },
	/// Keep the centroid on the canvas centre, optionally pulling y toward the depth band.
	Centered {
		strength: f64,
		band_strength: Option<f64>,
	},
}

/// Row used for tagged nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TagRow {
	#[default]
	MidHeight,
	DepthBand,
}

/// What a primary click on a node does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClickBinding {
	ToggleTag,
	/// Clicks are reserved; node actions live in the context menu.
	#[default]
	ContextMenu,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	pub background: String,
	pub root: String,
	pub default: String,
	pub collapsed: String,
	pub tagged: String,
	pub link: String,
	pub label: String,
}

impl Default for Palette {
	fn default() -> Self {
		Self {
			background: "#ffffff".into(),
			root: "#ff7f0e".into(),
			default: "#69b3a2".into(),
			collapsed: "#b3b3b3".into(),
			tagged: "#ff0000".into(),
			link: "#999999".into(),
			label: "#333333".into(),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
	pub charge: f32,
	pub spring: f32,
	pub max_force: f32,
	pub node_speed: f32,
	pub damping: f32,
	pub node_mass: f32,
	pub link_distance: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	pub drag_alpha_target: f64,
	/// Top and bottom padding of the depth bands.
	pub band_margin: f64,
}

impl Default for SolverConfig {
	fn default() -> Self {
		let alpha_min = 0.001_f64;
		Self {
			charge: 150.0,
			spring: 0.05,
			max_force: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
			node_mass: 10.0,
			link_distance: 100.0,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			drag_alpha_target: 0.3,
			band_margin: 50.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
	pub depth_policy: DepthPolicy,
	pub positioning: Positioning,
	pub tag_row: TagRow,
	pub click: ClickBinding,
	pub node_radius: f64,
	pub collapsed_radius: f64,
	pub palette: Palette,
	pub solver: SolverConfig,
}

impl EngineConfig {
	/// Depth-banded tree with collapse, tagging and node info behind a context menu.
	pub fn hierarchy_explorer() -> Self {
		Self {
			depth_policy: DepthPolicy::SingleAssignment,
			positioning: Positioning::DepthBands {
				x_strength: 0.5,
				y_strength: 0.8,
			},
			tag_row: TagRow::DepthBand,
			click: ClickBinding::ContextMenu,
			node_radius: 10.0,
			collapsed_radius: 2.0,
			palette: Palette::default(),
			solver: SolverConfig::default(),
		}
	}

	/// Free layout where clicking a node lines it up with the other tagged nodes.
	pub fn tag_aligner() -> Self {
		Self {
			depth_policy: DepthPolicy::SingleAssignment,
			positioning: Positioning::Centered {
				strength: 0.1,
				band_strength: None,
			},
			tag_row: TagRow::MidHeight,
			click: ClickBinding::ToggleTag,
			node_radius: 5.0,
			collapsed_radius: 2.0,
			palette: Palette::default(),
			solver: SolverConfig {
				charge: 50.0,
				link_distance: 30.0,
				..SolverConfig::default()
			},
		}
	}

	/// Tag aligner whose rows follow the depth bands of a possibly multi-parent hierarchy.
	pub fn banded_tag_aligner() -> Self {
		Self {
			depth_policy: DepthPolicy::MaxAssignment,
			positioning: Positioning::Centered {
				strength: 0.1,
				band_strength: Some(1.0),
			},
			tag_row: TagRow::DepthBand,
			solver: SolverConfig {
				charge: 50.0,
				link_distance: 50.0,
				..SolverConfig::default()
			},
			..Self::tag_aligner()
		}
	}
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self::hierarchy_explorer()
	}
}
