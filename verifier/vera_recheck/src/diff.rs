//! Line-level grouped diff between the snapshot text and the current text.
//!
//! Classifies runs of lines as *common to both*, *only in old*, or *only in
//! new* (longest-common-subsequence grouping), then walks the new text's
//! line numbers in order: only-new runs mark changed lines, common runs
//! record one shift interval each, only-old runs just advance the running
//! offset. Deletions therefore never mark new-text lines directly, but they
//! do shift everything after them.

use std::collections::BTreeSet;

use crate::shift::{ShiftInterval, ShiftMap};

/// Output of the line differ.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineDiff {
    /// New-text line numbers (1-based) that are new or modified relative to
    /// the snapshot.
    pub changed: BTreeSet<u32>,
    /// Offset intervals for unchanged regions, keyed by old-text lines.
    pub shift: ShiftMap,
}

/// Per-line step in the grouped diff walk.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Step {
    /// Line present in both texts.
    Both,
    /// Line only in the old text (deleted).
    OldOnly,
    /// Line only in the new text (inserted).
    NewOnly,
}

/// Diff two texts line-wise.
pub fn diff_lines(old: &str, new: &str) -> LineDiff {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let steps = diff_steps(&old_lines, &new_lines);

    let mut changed = BTreeSet::new();
    let mut shift = ShiftMap::new();
    let mut old_line: u32 = 1;
    let mut new_line: u32 = 1;

    let mut i = 0;
    while i < steps.len() {
        let step = steps[i];
        let mut len: u32 = 0;
        while i < steps.len() && steps[i] == step {
            len += 1;
            i += 1;
        }
        match step {
            Step::Both => {
                shift.insert(ShiftInterval {
                    old_start: old_line,
                    old_end: old_line + len - 1,
                    delta: i64::from(new_line) - i64::from(old_line),
                });
                old_line += len;
                new_line += len;
            }
            Step::OldOnly => {
                old_line += len;
            }
            Step::NewOnly => {
                changed.extend(new_line..new_line + len);
                new_line += len;
            }
        }
    }

    LineDiff { changed, shift }
}

/// Classify every line of both texts into diff steps, in text order.
fn diff_steps(old: &[&str], new: &[&str]) -> Vec<Step> {
    // Trim the common prefix and suffix first; the quadratic LCS table only
    // covers the changed middle, which for typical edits is small.
    let mut prefix = 0;
    while prefix < old.len() && prefix < new.len() && old[prefix] == new[prefix] {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < old.len() - prefix
        && suffix < new.len() - prefix
        && old[old.len() - 1 - suffix] == new[new.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut steps = Vec::with_capacity(old.len() + new.len());
    steps.extend(std::iter::repeat_n(Step::Both, prefix));
    lcs_steps(old_mid, new_mid, &mut steps);
    steps.extend(std::iter::repeat_n(Step::Both, suffix));
    steps
}

/// Append LCS-aligned steps for the middle segments.
fn lcs_steps(old: &[&str], new: &[&str], steps: &mut Vec<Step>) {
    let m = old.len();
    let n = new.len();
    if m == 0 {
        steps.extend(std::iter::repeat_n(Step::NewOnly, n));
        return;
    }
    if n == 0 {
        steps.extend(std::iter::repeat_n(Step::OldOnly, m));
        return;
    }

    // lcs[i][j] = length of the LCS of old[i..] and new[j..].
    let mut lcs = vec![vec![0u32; n + 1]; m + 1];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        if old[i] == new[j] {
            steps.push(Step::Both);
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            steps.push(Step::OldOnly);
            i += 1;
        } else {
            steps.push(Step::NewOnly);
            j += 1;
        }
    }
    steps.extend(std::iter::repeat_n(Step::OldOnly, m - i));
    steps.extend(std::iter::repeat_n(Step::NewOnly, n - j));
}
