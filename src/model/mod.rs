pub mod scale;
pub mod task;

pub use scale::{GanttScale, GroupingRule, ScaleConfig};
pub use task::{Dependency, DependencyKind, Task};
