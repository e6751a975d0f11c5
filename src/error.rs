use thiserror::Error;

pub type GanttResult<T> = Result<T, GanttError>;

#[derive(Debug, Error)]
pub enum GanttError {
    /// A scale key not present in the registry was requested.
    #[error("unknown timeline scale: {0:?}")]
    UnknownScale(String),

    /// A timeline was requested over an empty task list. Callers are
    /// expected to short-circuit before building.
    #[error("cannot build a timeline from an empty task list")]
    EmptyTasks,

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid task data: {0}")]
    InvalidData(#[from] serde_json::Error),
}
