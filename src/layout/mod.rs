pub mod arrow;
pub mod drag;
pub mod timeline;
pub mod transform;

pub use arrow::{resolve_arrows, ArrowRoute};
pub use drag::{DragEngine, DragMode, DragResult};
pub use timeline::{HeaderGroup, Timeline, TimelineCell};
pub use transform::{transform, TaskTransformed};
