//! Agreement counting over node response bodies.
//!
//! Bodies are grouped by `serde_json::Value` equality, which compares object
//! members by key, so two nodes serializing the same record with different
//! key order land in the same group.

use serde_json::Value;

/// Guards `threshold * total` against float error (0.51 * 100 = 51.000…01).
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Number of agreeing nodes needed out of `total` for a fraction `threshold`.
pub fn required_agreement(threshold: f64, total: usize) -> usize {
    let raw = (threshold * total as f64 - THRESHOLD_EPSILON).ceil();
    (raw.max(1.0) as usize).min(total.max(1))
}

/// Transaction hash echoed in a submit response, if any.
///
/// Miners answer `{"entity": {"hash": ..}}`; some deployments return the
/// transaction record itself.
pub fn response_hash(body: &Value) -> Option<&str> {
    body.get("entity")
        .and_then(|entity| entity.get("hash"))
        .and_then(Value::as_str)
        .or_else(|| body.get("hash").and_then(Value::as_str))
}

/// Where a round stands after the latest response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// More answers could still change the result.
    Pending,
    /// The group at this index has quorum and cannot be overtaken.
    Agreed(usize),
    /// No group can reach quorum even if every outstanding node agrees.
    Unreachable,
}

/// Running tally of equal bodies, in first-seen order.
#[derive(Debug, Default)]
pub struct Tally {
    groups: Vec<(Value, usize)>,
}

impl Tally {
    /// Count a body; returns its group index.
    pub fn add(&mut self, body: &Value) -> usize {
        if let Some(idx) = self.groups.iter().position(|(v, _)| v == body) {
            self.groups[idx].1 += 1;
            idx
        } else {
            self.groups.push((body.clone(), 1));
            self.groups.len() - 1
        }
    }

    pub fn count(&self, idx: usize) -> usize {
        self.groups.get(idx).map(|(_, n)| *n).unwrap_or(0)
    }

    pub fn body(&self, idx: usize) -> Option<&Value> {
        self.groups.get(idx).map(|(v, _)| v)
    }

    /// Index and size of the largest group; ties go to the earliest group.
    pub fn leader(&self) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for (idx, (_, count)) in self.groups.iter().enumerate() {
            if best.map_or(true, |(_, n)| *count > n) {
                best = Some((idx, *count));
            }
        }
        best
    }

    fn runner_up(&self, leader: usize) -> usize {
        self.groups
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != leader)
            .map(|(_, (_, n))| *n)
            .max()
            .unwrap_or(0)
    }

    /// Decide whether the round can stop with `remaining` nodes outstanding.
    pub fn verdict(&self, required: usize, remaining: usize) -> Verdict {
        match self.leader() {
            Some((idx, lead)) => {
                if lead >= required && lead > self.runner_up(idx) + remaining {
                    Verdict::Agreed(idx)
                } else if lead + remaining < required {
                    Verdict::Unreachable
                } else {
                    Verdict::Pending
                }
            }
            None if remaining < required => Verdict::Unreachable,
            None => Verdict::Pending,
        }
    }

    /// Final decision once no more answers will arrive.
    pub fn settle(&self, required: usize) -> Option<usize> {
        self.leader()
            .filter(|(_, lead)| *lead >= required)
            .map(|(idx, _)| idx)
    }
}
