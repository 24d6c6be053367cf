pub mod chart;
pub mod config;
pub mod error;
pub mod render;
pub mod wav;

pub use chart::Chart;
pub use config::RenderConfig;
pub use error::{Error, Result};
pub use render::{render_file, RenderSummary};
