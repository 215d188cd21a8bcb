use crate::core::content::CategoryTag;

/// Answers recorded per category, kept in first-answered order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerTally {
    counts: Vec<(CategoryTag, u32)>,
}

impl AnswerTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: &CategoryTag) {
        match self.counts.iter_mut().find(|(tag, _)| tag == category) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((category.clone(), 1)),
        }
    }

    pub fn count(&self, category: &str) -> u32 {
        self.counts
            .iter()
            .find(|(tag, _)| tag.as_str() == category)
            .map_or(0, |(_, count)| *count)
    }

    /// Number of answers recorded so far.
    pub fn answered(&self) -> usize {
        self.counts.iter().map(|(_, count)| *count as usize).sum()
    }

    pub fn is_complete(&self, total: usize) -> bool {
        self.answered() == total
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&CategoryTag, u32)> {
        self.counts.iter().map(|(tag, count)| (tag, *count))
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Highest count; an earlier category keeps the lead on ties.
    pub(crate) fn leader(&self) -> Option<&CategoryTag> {
        let mut entries = self.counts.iter();
        let (mut best, mut best_count) = entries.next().map(|(tag, count)| (tag, *count))?;
        for (tag, count) in entries {
            if *count > best_count {
                best = tag;
                best_count = *count;
            }
        }
        Some(best)
    }
}
