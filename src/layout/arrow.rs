use egui::Pos2;
use tracing::warn;

use crate::layout::transform::TaskTransformed;
use crate::model::DependencyKind;

/// How far an arrow runs horizontally before turning.
const STUB: f32 = 10.0;

/// A routed dependency arrow: an orthogonal polyline from the target task's
/// anchor to the dependent task's anchor, in chart-local pixels.
#[derive(Debug, Clone)]
pub struct ArrowRoute {
    /// Polyline vertices. First point is the from-anchor, last the to-anchor.
    pub points: Vec<Pos2>,
}

impl ArrowRoute {
    pub fn to(&self) -> Pos2 {
        self.points[self.points.len() - 1]
    }

    /// Arrowhead triangle at the to-anchor, oriented along the final segment.
    pub fn arrowhead(&self, size: f32) -> [Pos2; 3] {
        let tip = self.to();
        let prev = self.points[self.points.len() - 2];
        let dir = (tip - prev).normalized();
        let normal = dir.rot90();
        [
            tip,
            tip - dir * size + normal * (size * 0.5),
            tip - dir * size - normal * (size * 0.5),
        ]
    }
}

/// Resolve every declared dependency in the transformed list into a routed
/// arrow. Edges pointing at unknown tasks are dropped with a warning; one bad
/// edge never takes the chart down.
pub fn resolve_arrows(tasks: &[TaskTransformed], row_height: f32) -> Vec<ArrowRoute> {
    let mut routes = Vec::new();
    for current in tasks {
        for dep in &current.task.dependencies {
            let Some(target) = tasks.iter().find(|t| t.task.id == dep.target_id) else {
                warn!(
                    task = %current.task.id,
                    target = %dep.target_id,
                    "dependency target not found; dropping edge"
                );
                continue;
            };
            routes.push(route(dep.kind, target, current, row_height));
        }
    }
    routes
}

fn row_center_y(order: usize, row_height: f32) -> f32 {
    (order as f32 - 1.0) * row_height + row_height / 2.0
}

/// Route one arrow from `target`'s anchor to `current`'s anchor.
///
/// Arrows ending on a start edge approach from the left, arrows ending on a
/// finish edge approach from the right. When a direct elbow would cut through
/// the bars (a backward finish-to-start link, say), the route drops half a
/// row, runs level between the rows, and re-approaches the anchor.
pub fn route(
    kind: DependencyKind,
    target: &TaskTransformed,
    current: &TaskTransformed,
    row_height: f32,
) -> ArrowRoute {
    let from_y = row_center_y(target.order, row_height);
    let to_y = row_center_y(current.order, row_height);
    let (from_x, to_x) = match kind {
        DependencyKind::FinishToStart => (target.bar_right(), current.bar_left),
        DependencyKind::StartToStart => (target.bar_left, current.bar_left),
        DependencyKind::FinishToFinish => (target.bar_right(), current.bar_right()),
        DependencyKind::StartToFinish => (target.bar_left, current.bar_right()),
    };
    let from = Pos2::new(from_x, from_y);
    let to = Pos2::new(to_x, to_y);

    // Mid-row y for detours, between the two rows (or below, if same row).
    let detour_y = if to_y >= from_y {
        from_y + row_height / 2.0
    } else {
        from_y - row_height / 2.0
    };

    let points = match kind {
        DependencyKind::FinishToStart => {
            if to.x >= from.x + 2.0 * STUB {
                elbow(from, to, from.x + STUB)
            } else {
                // Start anchor sits behind the finish anchor: go around.
                vec![
                    from,
                    Pos2::new(from.x + STUB, from.y),
                    Pos2::new(from.x + STUB, detour_y),
                    Pos2::new(to.x - STUB, detour_y),
                    Pos2::new(to.x - STUB, to.y),
                    to,
                ]
            }
        }
        DependencyKind::StartToStart => elbow(from, to, from.x.min(to.x) - STUB),
        DependencyKind::FinishToFinish => elbow(from, to, from.x.max(to.x) + STUB),
        DependencyKind::StartToFinish => {
            if to.x + 2.0 * STUB <= from.x {
                elbow(from, to, from.x - STUB)
            } else {
                vec![
                    from,
                    Pos2::new(from.x - STUB, from.y),
                    Pos2::new(from.x - STUB, detour_y),
                    Pos2::new(to.x + STUB, detour_y),
                    Pos2::new(to.x + STUB, to.y),
                    to,
                ]
            }
        }
    };

    ArrowRoute { points }
}

/// Horizontal-vertical-horizontal elbow through the turning column `mid_x`.
fn elbow(from: Pos2, to: Pos2, mid_x: f32) -> Vec<Pos2> {
    vec![
        from,
        Pos2::new(mid_x, from.y),
        Pos2::new(mid_x, to.y),
        to,
    ]
}
