//! JSON-lines scoring loop

use anyhow::{Context, Result};
use racer_reward::RewardEvaluator;
use racer_reward_core::{ParameterSnapshot, RewardComponents};
use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::debug;

/// One `--breakdown` output line
#[derive(Debug, Serialize)]
struct ScoredLine<'a> {
    line: usize,
    reward: f64,
    components: &'a RewardComponents,
}

/// Score every non-blank line of `reader`, writing one result per line.
///
/// Stops at the first invalid snapshot. Returns the number of snapshots scored.
pub fn score_lines<R: BufRead, W: Write>(
    evaluator: &RewardEvaluator,
    reader: R,
    out: &mut W,
    breakdown: bool,
) -> Result<usize> {
    let mut scored = 0;
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let snapshot = ParameterSnapshot::from_json(&line)
            .with_context(|| format!("Line {line_no}"))?;
        let reward = evaluator
            .evaluate_detailed(&snapshot)
            .with_context(|| format!("Line {line_no}"))?;
        debug!(line = line_no, reward = reward.value, "scored snapshot");

        if breakdown {
            let record = ScoredLine {
                line: line_no,
                reward: reward.value,
                components: &reward.components,
            };
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
        } else {
            writeln!(out, "{}", reward.value)?;
        }
        scored += 1;
    }
    Ok(scored)
}
