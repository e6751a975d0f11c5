use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which endpoints of the two tasks a dependency arrow anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyKind {
    #[serde(rename = "FS")]
    FinishToStart,
    #[serde(rename = "SS")]
    StartToStart,
    #[serde(rename = "FF")]
    FinishToFinish,
    #[serde(rename = "SF")]
    StartToFinish,
}

/// A dependency edge declared on a task, pointing at the task it depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub target_id: String,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
}

/// A single task in the Gantt chart. Owned by the host; the chart only reads
/// it and proposes mutated copies after a drag commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "startDate")]
    pub start: NaiveDate,
    #[serde(rename = "endDate")]
    pub end: NaiveDate,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient_dependencies"
    )]
    pub dependencies: Vec<Dependency>,
}

/// Deserialize a dependency list edge by edge, dropping malformed entries
/// (unknown type tag, missing target) with a warning. One bad edge in host
/// data must not take the whole task list down.
fn lenient_dependencies<'de, D>(deserializer: D) -> Result<Vec<Dependency>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Deserialize::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Dependency>(value) {
            Ok(dep) => Some(dep),
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed dependency edge");
                None
            }
        })
        .collect())
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start,
            end,
            dependencies: Vec::new(),
        }
    }

    /// Duration in whole days.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn with_dependency(mut self, target_id: impl Into<String>, kind: DependencyKind) -> Self {
        self.dependencies.push(Dependency {
            target_id: target_id.into(),
            kind,
        });
        self
    }
}
