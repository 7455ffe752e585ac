use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Every disjoint combination of candidates; exact, exponential.
    #[default]
    Exhaustive,
    /// Highest-scoring candidates first; polynomial, may miss the optimum.
    Greedy,
}

impl Strategy {
    pub fn id(self) -> &'static str {
        match self {
            Strategy::Exhaustive => "exhaustive",
            Strategy::Greedy => "greedy",
        }
    }

    pub fn from_id(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exhaustive" | "exact" => Some(Strategy::Exhaustive),
            "greedy" | "fast" => Some(Strategy::Greedy),
            _ => None,
        }
    }
}

/// What the exhaustive search does once its budget runs out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPolicy {
    /// Keep the best grouping found so far and flag the outcome as truncated.
    #[default]
    Fallback,
    /// Report `MeldError::SearchBudgetExceeded`.
    Fail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: Strategy,
    pub max_nodes: Option<u64>,
    pub time_limit_ms: Option<u64>,
    pub on_budget: BudgetPolicy,
}

impl SearchConfig {
    pub fn exhaustive() -> Self {
        Self::default()
    }

    pub fn greedy() -> Self {
        Self {
            strategy: Strategy::Greedy,
            ..Self::default()
        }
    }

    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    pub fn with_time_limit_ms(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = Some(time_limit_ms);
        self
    }

    pub fn with_policy(mut self, on_budget: BudgetPolicy) -> Self {
        self.on_budget = on_budget;
        self
    }

    pub fn is_bounded(&self) -> bool {
        self.max_nodes.is_some() || self.time_limit_ms.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unbounded_exhaustive() {
        let config = SearchConfig::default();
        assert_eq!(config.strategy, Strategy::Exhaustive);
        assert_eq!(config.on_budget, BudgetPolicy::Fallback);
        assert!(!config.is_bounded());
        assert!(SearchConfig::greedy().with_max_nodes(10).is_bounded());
    }

    #[test]
    fn strategy_ids_parse() {
        assert_eq!(Strategy::from_id("Greedy"), Some(Strategy::Greedy));
        assert_eq!(Strategy::from_id(" exact "), Some(Strategy::Exhaustive));
        assert_eq!(Strategy::from_id("dp"), None);
        assert_eq!(Strategy::Greedy.id(), "greedy");
    }
}
