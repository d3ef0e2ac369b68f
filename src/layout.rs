//! Label layout: resolves overlapping line-end labels into rows.
//!
//! Labels are grouped by vertical proximity, each group is split into rows of
//! at most `max_per_line` labels (sorted by anchor x), rows are stacked below
//! the group's y, and labels within a row are packed left to right using their
//! measured widths. Grouping is then re-derived from the new positions and the
//! pass repeats until nothing moves and the grouping is stable, or until
//! `max_iterations` passes have run. This is a greedy heuristic: large groups
//! may drift horizontally away from their lines.

use serde::{Deserialize, Serialize};

/// Layout constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabelLayoutConfig {
    /// Two labels join a group when their y values differ by less than this.
    pub threshold: f64,
    pub vertical_spacing: f64,
    pub horizontal_spacing: f64,
    pub max_per_line: usize,
    pub max_iterations: usize,
}

impl Default for LabelLayoutConfig {
    fn default() -> Self {
        Self {
            threshold: 5.0,
            vertical_spacing: 10.0,
            horizontal_spacing: 3.0,
            max_per_line: 3,
            max_iterations: 100,
        }
    }
}

/// A label anchored at the end of its line. `final_x`/`final_y` never change
/// during layout; `x`/`y` are the current placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelBox {
    pub text: String,
    pub final_x: f64,
    pub final_y: f64,
    pub x: f64,
    pub y: f64,
}

impl LabelBox {
    /// A label placed at its anchor.
    pub fn anchored(text: impl Into<String>, final_x: f64, final_y: f64) -> Self {
        Self {
            text: text.into(),
            final_x,
            final_y,
            x: final_x,
            y: final_y,
        }
    }
}

/// Result of [`layout`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    pub labels: Vec<LabelBox>,
    /// Passes executed (at least 1 for non-empty input).
    pub iterations: usize,
    /// `false` when the pass limit stopped the loop before a fixed point.
    pub converged: bool,
}

#[derive(Debug)]
struct Group {
    y: f64,
    members: Vec<usize>,
}

/// First-fit grouping: each label joins the first group whose y lies within
/// `threshold`, else it founds a new group at its own y.
fn group_by_y(ys: impl Iterator<Item = f64>, threshold: f64) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for (i, y) in ys.enumerate() {
        match groups.iter_mut().find(|g| (y - g.y).abs() < threshold) {
            Some(g) => g.members.push(i),
            None => groups.push(Group {
                y,
                members: vec![i],
            }),
        }
    }
    groups
}

fn same_shape(a: &[Group], b: &[Group]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.members.len() == y.members.len())
}

/// Lay out `labels`. `width_of` returns the rendered width of a label text.
pub fn layout(
    labels: &[LabelBox],
    config: &LabelLayoutConfig,
    width_of: impl Fn(&str) -> f64,
) -> LayoutOutcome {
    let mut out = labels.to_vec();
    if out.is_empty() {
        return LayoutOutcome {
            labels: out,
            iterations: 0,
            converged: true,
        };
    }
    let widths: Vec<f64> = out.iter().map(|l| width_of(&l.text)).collect();
    let per_line = config.max_per_line.max(1);

    let mut groups = group_by_y(out.iter().map(|l| l.final_y), config.threshold);
    let mut iterations = 0;
    let mut changed = true;

    while changed && iterations < config.max_iterations {
        changed = false;
        iterations += 1;

        for group in &mut groups {
            group
                .members
                .sort_by(|&a, &b| out[a].final_x.total_cmp(&out[b].final_x));

            for (row, line) in group.members.chunks(per_line).enumerate() {
                let y = group.y + row as f64 * config.vertical_spacing;
                let mut x = out[line[0]].final_x;
                for (k, &idx) in line.iter().enumerate() {
                    if k > 0 {
                        let prev = line[k - 1];
                        x = out[prev].x + widths[prev] + config.horizontal_spacing;
                    }
                    let label = &mut out[idx];
                    if label.x != x || label.y != y {
                        label.x = x;
                        label.y = y;
                        changed = true;
                    }
                }
            }
        }

        let regrouped = group_by_y(out.iter().map(|l| l.y), config.threshold);
        if !same_shape(&groups, &regrouped) {
            groups = regrouped;
            changed = true;
        }
    }

    log::debug!(
        "label layout finished after {} iteration(s), converged={}",
        iterations,
        !changed
    );
    LayoutOutcome {
        labels: out,
        iterations,
        converged: !changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_is_first_fit() {
        let groups = group_by_y([0.0, 4.0, 8.0, 3.0].into_iter(), 5.0);
        // 8.0 is within 5 of 4.0 but not of the first group's y (0.0).
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members, vec![0, 1, 3]);
        assert_eq!(groups[1].members, vec![2]);
    }
}
