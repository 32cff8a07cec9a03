use hotline_types::{HistoryEntry, HISTORY_LIMIT, RECENT_HISTORY};
use std::collections::VecDeque;

/// Settled rounds, newest first, capped at [HISTORY_LIMIT].
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collapsed view: the newest [RECENT_HISTORY] rounds, newest first.
    ///
    /// Older rounds are only listed by [History::all].
    pub fn recent(&self) -> Vec<HistoryEntry> {
        self.entries.iter().take(RECENT_HISTORY).copied().collect()
    }

    /// Expanded view.
    pub fn all(&self) -> Vec<HistoryEntry> {
        self.entries.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotline_types::CardType;

    #[test]
    fn test_newest_first() {
        let mut history = History::default();
        history.push(HistoryEntry::Single(CardType::Red));
        history.push(HistoryEntry::Pair(CardType::Fire, CardType::Black));
        assert_eq!(
            history.all(),
            vec![
                HistoryEntry::Pair(CardType::Fire, CardType::Black),
                HistoryEntry::Single(CardType::Red),
            ]
        );
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut history = History::default();
        history.push(HistoryEntry::Single(CardType::Fire));
        for _ in 0..HISTORY_LIMIT {
            history.push(HistoryEntry::Single(CardType::Black));
        }
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert!(!history.all().contains(&HistoryEntry::Single(CardType::Fire)));
    }

    #[test]
    fn test_recent_is_newest_slice() {
        let mut history = History::default();
        assert!(history.recent().is_empty());
        for _ in 0..5 {
            history.push(HistoryEntry::Single(CardType::Fire));
        }
        for _ in 0..10 {
            history.push(HistoryEntry::Single(CardType::Black));
        }
        history.push(HistoryEntry::Single(CardType::Red));
        let recent = history.recent();
        assert_eq!(recent.len(), RECENT_HISTORY);
        assert_eq!(recent[0], HistoryEntry::Single(CardType::Red));
        assert!(!recent.contains(&HistoryEntry::Single(CardType::Fire)));
        assert_eq!(history.all().len(), 16);
        assert_eq!(history.all()[15], HistoryEntry::Single(CardType::Fire));
    }
}
