pub mod file;

pub use file::{load_tasks, save_tasks};
