use crate::{Card, Detection, Group, Strategy};
use serde::{Deserialize, Serialize};

/// Disjoint groups plus every hand card none of them claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingResult {
    pub groups: Vec<Group>,
    pub leftover: Vec<Card>,
}

impl GroupingResult {
    pub fn score(&self) -> u32 {
        self.groups.iter().map(Group::score).sum()
    }

    pub fn grouped_cards(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Groups in order, then leftover cards.
    pub fn arranged(&self) -> Vec<Card> {
        self.groups
            .iter()
            .flat_map(|group| group.cards().iter().copied())
            .chain(self.leftover.iter().copied())
            .collect()
    }

    pub fn to_text_report(&self) -> String {
        let mut lines = vec![format!(
            "score: {} ({} grouped, {} leftover)",
            self.score(),
            self.grouped_cards(),
            self.leftover.len()
        )];
        if self.groups.is_empty() {
            lines.push("  (no groups)".to_string());
        }
        for (idx, group) in self.groups.iter().enumerate() {
            lines.push(format!("  #{:<2} {:>3}  {}", idx + 1, group.score(), group));
        }
        let leftover: Vec<String> = self.leftover.iter().map(Card::to_string).collect();
        lines.push(format!("leftover: [{}]", leftover.join(" ")));
        lines.join("\n")
    }
}

impl From<Detection> for GroupingResult {
    fn from(detection: Detection) -> Self {
        Self {
            groups: detection.groups,
            leftover: detection.leftover,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub strategy: Strategy,
    pub pool_size: usize,
    pub nodes_visited: u64,
    pub combinations_scored: u64,
    pub truncated: bool,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub result: GroupingResult,
    pub stats: SearchStats,
}

impl SearchStats {
    pub fn summary(&self) -> String {
        format!(
            "search: strategy={} pool={} nodes={} scored={} elapsed={}ms{}",
            self.strategy.id(),
            self.pool_size,
            self.nodes_visited,
            self.combinations_scored,
            self.elapsed_ms,
            if self.truncated { " (truncated)" } else { "" }
        )
    }
}

impl SearchOutcome {
    pub fn to_text_report(&self) -> String {
        format!("{}\n{}", self.result.to_text_report(), self.stats.summary())
    }
}
