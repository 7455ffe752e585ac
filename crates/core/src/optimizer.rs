use crate::{
    walk_combinations, BudgetPolicy, CandidatePool, Group, GroupingResult, Hand, MeldError,
    SearchConfig, SearchOutcome, SearchStats, Strategy, MIN_GROUP_SIZE,
};
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Highest-scoring disjoint grouping of `hand`, by exhaustive search.
///
/// Ties go to the grouping with fewer groups, then to the one whose pool
/// indices come first lexicographically.
pub fn optimal_grouping(hand: &Hand) -> GroupingResult {
    let pool = CandidatePool::from_hand(hand);
    let search = exhaustive(pool.groups(), hand.len(), Budget::unbounded());
    assemble(hand, pool.groups(), &search.chosen)
}

#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: SearchConfig,
}

impl Optimizer {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn optimize(&self, hand: &Hand) -> Result<SearchOutcome, MeldError> {
        let started_at = Instant::now();
        let pool = CandidatePool::from_hand(hand);
        log::debug!(
            "optimizing {} cards over {} candidates ({})",
            hand.len(),
            pool.len(),
            self.config.strategy.id()
        );

        let search = match self.config.strategy {
            Strategy::Exhaustive => {
                let budget = Budget::from_config(&self.config, started_at);
                let search = exhaustive(pool.groups(), hand.len(), budget);
                if search.truncated {
                    if self.config.on_budget == BudgetPolicy::Fail {
                        return Err(MeldError::SearchBudgetExceeded(search.nodes));
                    }
                    log::warn!(
                        "search budget spent after {} nodes; keeping best of {} scored combinations",
                        search.nodes,
                        search.scored
                    );
                }
                search
            }
            Strategy::Greedy => greedy(pool.groups()),
        };

        Ok(SearchOutcome {
            result: assemble(hand, pool.groups(), &search.chosen),
            stats: SearchStats {
                strategy: self.config.strategy,
                pool_size: pool.len(),
                nodes_visited: search.nodes,
                combinations_scored: search.scored,
                truncated: search.truncated,
                elapsed_ms: started_at.elapsed().as_millis() as u64,
            },
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Budget {
    max_nodes: Option<u64>,
    deadline: Option<Instant>,
}

impl Budget {
    fn unbounded() -> Self {
        Self {
            max_nodes: None,
            deadline: None,
        }
    }

    fn from_config(config: &SearchConfig, started_at: Instant) -> Self {
        Self {
            max_nodes: config.max_nodes,
            deadline: config
                .time_limit_ms
                .map(|ms| started_at + Duration::from_millis(ms)),
        }
    }

    fn spent(&self, nodes: u64) -> bool {
        if matches!(self.max_nodes, Some(max) if nodes > max) {
            return true;
        }
        match self.deadline {
            Some(deadline) if nodes % DEADLINE_CHECK_INTERVAL == 0 => Instant::now() >= deadline,
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
struct Search {
    chosen: Vec<usize>,
    nodes: u64,
    scored: u64,
    truncated: bool,
}

/// Tries every combination of `1..=hand_size/3` candidates in generator order.
/// A node is one attempt to add a candidate to a partial combination; an
/// attempt that repeats a card rejects every combination built on it.
fn exhaustive(groups: &[Group], hand_size: usize, budget: Budget) -> Search {
    let scores: Vec<u32> = groups.iter().map(Group::score).collect();
    let max_groups = (hand_size / MIN_GROUP_SIZE).min(groups.len());
    let mut search = Search::default();
    let mut best_score = 0u32;

    for size in 1..=max_groups {
        let mut nodes = search.nodes;
        let mut spent = false;
        let mut scored = 0u64;
        walk_combinations(
            groups.len(),
            size,
            |prefix, next| {
                if spent {
                    return false;
                }
                nodes += 1;
                if budget.spent(nodes) {
                    spent = true;
                    return false;
                }
                let taken = prefix.iter().fold(0u64, |acc, idx| acc | groups[*idx].mask());
                taken & groups[next].mask() == 0
            },
            |indices| {
                scored += 1;
                let score: u32 = indices.iter().map(|idx| scores[*idx]).sum();
                if score > best_score {
                    best_score = score;
                    search.chosen = indices.to_vec();
                }
                ControlFlow::Continue(())
            },
        );
        search.nodes = nodes;
        search.scored += scored;
        log::trace!("level {size}: {scored} disjoint combinations, best score {best_score}");

        if spent {
            search.truncated = true;
            break;
        }
        // No disjoint combination of this size means none of any larger size.
        if scored == 0 {
            break;
        }
    }
    search
}

/// Takes candidates by descending score, skipping any that collide with an
/// earlier pick. Equal scores keep pool order.
fn greedy(groups: &[Group]) -> Search {
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by(|a, b| groups[*b].score().cmp(&groups[*a].score()));

    let mut search = Search::default();
    let mut taken = 0u64;
    for idx in order {
        search.nodes += 1;
        if taken & groups[idx].mask() == 0 {
            taken |= groups[idx].mask();
            search.chosen.push(idx);
        }
    }
    search.scored = 1;
    search
}

fn assemble(hand: &Hand, groups: &[Group], chosen: &[usize]) -> GroupingResult {
    let groups: Vec<Group> = chosen.iter().map(|idx| groups[*idx].clone()).collect();
    let covered = groups.iter().fold(0u64, |acc, group| acc | group.mask());
    let leftover = hand
        .iter()
        .copied()
        .filter(|card| covered & card.mask() == 0)
        .collect();
    GroupingResult { groups, leftover }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(result: &GroupingResult) -> Vec<String> {
        result.groups.iter().map(Group::to_string).collect()
    }

    #[test]
    fn empty_pool_leaves_everything() {
        let hand = Hand::parse("AS 3H 5C 7D 9S").unwrap();
        let result = optimal_grouping(&hand);
        assert!(result.groups.is_empty());
        assert_eq!(result.leftover, hand.cards().to_vec());
    }

    #[test]
    fn empty_hand_is_fine() {
        let result = optimal_grouping(&Hand::default());
        assert_eq!(result, GroupingResult::default());
    }

    #[test]
    fn contested_card_goes_where_it_scores_more() {
        // 4S completes either the run or the four-of-a-kind; the run keeps it
        // because the three other fours still form a match.
        let hand = Hand::parse("2S 3S 4S 4H 4C 4D").unwrap();
        let result = optimal_grouping(&hand);
        assert_eq!(labels(&result), vec!["sequence[2S 3S 4S]", "match[4H 4C 4D]"]);
        assert_eq!(result.score(), 21);
        assert!(result.leftover.is_empty());
    }

    #[test]
    fn earlier_candidate_wins_a_tie() {
        // JS QS KS and the three kings both score 30 and both need KS.
        let hand = Hand::parse("JS QS KS KH KC").unwrap();
        let result = optimal_grouping(&hand);
        assert_eq!(labels(&result), vec!["sequence[JS QS KS]"]);
        assert_eq!(result.leftover.len(), 2);
    }

    #[test]
    fn greedy_can_miss_the_optimum() {
        let hand = Hand::from_ids(&[26, 1, 17, 29, 0, 15, 42, 3, 13, 2, 16]).unwrap();
        let exact = Optimizer::new(SearchConfig::exhaustive())
            .optimize(&hand)
            .unwrap();
        let fast = Optimizer::new(SearchConfig::greedy()).optimize(&hand).unwrap();
        assert_eq!(exact.result.score(), 30);
        assert_eq!(fast.result.score(), 22);
        assert_eq!(fast.stats.strategy, Strategy::Greedy);
        assert_eq!(fast.stats.nodes_visited, fast.stats.pool_size as u64);
    }

    #[test]
    fn node_budget_falls_back_to_best_so_far() {
        let hand = Hand::from_ids(&[26, 1, 17, 29, 0, 15, 42, 3, 13, 2, 16]).unwrap();
        let config = SearchConfig::exhaustive().with_max_nodes(5);
        let outcome = Optimizer::new(config).optimize(&hand).unwrap();
        assert!(outcome.stats.truncated);
        assert_eq!(outcome.stats.nodes_visited, 6);
        // Only the first five single candidates were tried.
        assert_eq!(labels(&outcome.result), vec!["sequence[3H 4H 5H]"]);
    }

    #[test]
    fn node_budget_can_fail_instead() {
        let hand = Hand::from_ids(&[26, 1, 17, 29, 0, 15, 42, 3, 13, 2, 16]).unwrap();
        let config = SearchConfig::exhaustive()
            .with_max_nodes(5)
            .with_policy(BudgetPolicy::Fail);
        let err = Optimizer::new(config).optimize(&hand).unwrap_err();
        assert_eq!(err, MeldError::SearchBudgetExceeded(6));
    }

    #[test]
    fn generous_budget_matches_unbounded_search() {
        let hand = Hand::from_ids(&[26, 1, 17, 29, 0, 15, 42, 3, 13, 2, 16]).unwrap();
        let config = SearchConfig::exhaustive()
            .with_max_nodes(1_000_000)
            .with_time_limit_ms(60_000);
        let outcome = Optimizer::new(config).optimize(&hand).unwrap();
        assert!(!outcome.stats.truncated);
        assert_eq!(outcome.result, optimal_grouping(&hand));
        assert_eq!(outcome.stats.pool_size, 10);
    }
}
