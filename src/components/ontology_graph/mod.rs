mod alignment;
mod component;
mod config;
mod hierarchy;
mod interaction;
mod layout;
mod overlay;
mod render;
mod scale;
mod solver;
mod state;
mod types;
mod visibility;

pub use component::OntologyGraphCanvas;
pub use config::{ClickBinding, EngineConfig};
pub use types::GraphData;
