use crate::{
    compare_by_rank_then_suit, compare_by_suit_then_rank, Card, Group, GroupKind, Hand,
    MIN_GROUP_SIZE,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::Range;

/// Output of a single detector: maximal groups plus the cards none of them use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub groups: Vec<Group>,
    pub leftover: Vec<Card>,
}

impl Detection {
    pub fn score(&self) -> u32 {
        self.groups.iter().map(Group::score).sum()
    }

    /// Groups in order, then leftover cards.
    pub fn arranged(&self) -> Vec<Card> {
        self.groups
            .iter()
            .flat_map(|group| group.cards().iter().copied())
            .chain(self.leftover.iter().copied())
            .collect()
    }
}

/// Maximal same-suit runs of consecutive ranks.
pub fn detect_sequences(hand: &Hand) -> Detection {
    detect(hand, GroupKind::Sequence, compare_by_suit_then_rank, |lo, hi| {
        lo.suit == hi.suit && hi.rank.index() == lo.rank.index() + 1
    })
}

/// Maximal same-rank sets.
pub fn detect_matches(hand: &Hand) -> Detection {
    detect(hand, GroupKind::Match, compare_by_rank_then_suit, |lo, hi| {
        lo.rank == hi.rank
    })
}

fn detect<C, L>(hand: &Hand, kind: GroupKind, order: C, links: L) -> Detection
where
    C: Fn(&Card, &Card) -> Ordering,
    L: Fn(&Card, &Card) -> bool,
{
    let mut sorted = hand.cards().to_vec();
    sorted.sort_by(|a, b| order(a, b));

    let groups: Vec<Group> = streaks(&sorted, links)
        .into_iter()
        .filter(|range| range.len() >= MIN_GROUP_SIZE)
        .map(|range| Group::assemble(kind, sorted[range].to_vec()))
        .collect();
    let covered = groups.iter().fold(0u64, |acc, group| acc | group.mask());
    let leftover = hand
        .iter()
        .copied()
        .filter(|card| covered & card.mask() == 0)
        .collect();

    log::trace!("{} detector: {} groups", kind.id(), groups.len());
    Detection { groups, leftover }
}

/// Splits `sorted` into maximal linked streaks, scanning from the end toward
/// the start. Ranges come back in ascending position order.
fn streaks<L>(sorted: &[Card], links: L) -> Vec<Range<usize>>
where
    L: Fn(&Card, &Card) -> bool,
{
    let mut out = Vec::new();
    if sorted.is_empty() {
        return out;
    }
    let mut streak = 0usize;
    let mut cursor = sorted.len() - 1;
    while cursor > 0 {
        if links(&sorted[cursor - 1], &sorted[cursor]) {
            streak += 1;
        } else {
            out.push(cursor..cursor + streak + 1);
            streak = 0;
        }
        cursor -= 1;
    }
    out.push(0..streak + 1);
    out.reverse();
    out
}
