use crate::{
    combinations, detect_matches, detect_sequences, Group, GroupKind, Hand, MIN_GROUP_SIZE,
};

/// Every group the optimizer may choose from: maximal runs and sets plus their
/// shorter variants. Candidates may overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePool {
    groups: Vec<Group>,
}

impl CandidatePool {
    pub fn from_hand(hand: &Hand) -> Self {
        let sequences = detect_sequences(hand);
        let matches = detect_matches(hand);
        let groups: Vec<Group> = sequences
            .groups
            .iter()
            .chain(matches.groups.iter())
            .flat_map(expand_group)
            .collect();
        log::debug!(
            "candidate pool: {} groups from {} sequences and {} matches",
            groups.len(),
            sequences.groups.len(),
            matches.groups.len()
        );
        Self { groups }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// The group itself followed by every shorter valid variant, longest first.
///
/// Sequences keep contiguity, so their variants are sliding windows. Matches
/// only need distinct suits, so any sub-selection is valid.
pub fn expand_group(group: &Group) -> Vec<Group> {
    let mut out = vec![group.clone()];
    let cards = group.cards();
    for size in (MIN_GROUP_SIZE..cards.len()).rev() {
        match group.kind() {
            GroupKind::Sequence => out.extend(
                cards
                    .windows(size)
                    .map(|window| Group::assemble(GroupKind::Sequence, window.to_vec())),
            ),
            GroupKind::Match => out.extend(
                combinations(cards, size)
                    .into_iter()
                    .map(|subset| Group::assemble(GroupKind::Match, subset)),
            ),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(groups: &[Group]) -> Vec<String> {
        groups.iter().map(Group::to_string).collect()
    }

    #[test]
    fn three_card_groups_have_no_variants() {
        let hand = Hand::parse("5S 6S 7S").unwrap();
        let pool = CandidatePool::from_hand(&hand);
        assert_eq!(labels(pool.groups()), vec!["sequence[5S 6S 7S]"]);
    }

    #[test]
    fn long_sequence_yields_windows() {
        let hand = Hand::parse("AS 2S 3S 4S 5S").unwrap();
        let pool = CandidatePool::from_hand(&hand);
        assert_eq!(
            labels(pool.groups()),
            vec![
                "sequence[AS 2S 3S 4S 5S]",
                "sequence[AS 2S 3S 4S]",
                "sequence[2S 3S 4S 5S]",
                "sequence[AS 2S 3S]",
                "sequence[2S 3S 4S]",
                "sequence[3S 4S 5S]",
            ]
        );
    }

    #[test]
    fn four_card_match_yields_all_triples() {
        let hand = Hand::parse("4D 4C 4H 4S").unwrap();
        let pool = CandidatePool::from_hand(&hand);
        assert_eq!(
            labels(pool.groups()),
            vec![
                "match[4S 4H 4C 4D]",
                "match[4S 4H 4C]",
                "match[4S 4H 4D]",
                "match[4S 4C 4D]",
                "match[4H 4C 4D]",
            ]
        );
    }

    #[test]
    fn sequences_come_before_matches() {
        let hand = Hand::parse("2S 3S 4S 4H 4C").unwrap();
        let pool = CandidatePool::from_hand(&hand);
        let kinds: Vec<GroupKind> = pool.groups().iter().map(Group::kind).collect();
        assert_eq!(kinds, vec![GroupKind::Sequence, GroupKind::Match]);
        assert!(pool.groups()[0].overlaps(&pool.groups()[1]));
    }

    #[test]
    fn no_groups_means_empty_pool() {
        let hand = Hand::parse("AS 3H 5C 7D").unwrap();
        assert!(CandidatePool::from_hand(&hand).is_empty());
    }
}
