pub mod chart;
pub mod theme;
pub mod toolbar;

pub use chart::{ChartInteraction, GanttChart};
