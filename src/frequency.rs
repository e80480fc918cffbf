use std::collections::HashMap;

/// Occurrence count of every distinct symbol in an input.
///
/// Symbols are kept in order of first appearance so that everything built
/// from the table (heap push order, tree shape, output bytes) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(char, u64)>,
    index: HashMap<char, usize>,
}

impl FrequencyTable {
    pub fn from_text(text: &str) -> Self {
        text.chars().collect()
    }

    pub fn add(&mut self, symbol: char) {
        match self.index.get(&symbol) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(symbol, self.entries.len());
                self.entries.push((symbol, 1));
            }
        }
    }

    pub fn get(&self, symbol: char) -> u64 {
        self.index
            .get(&symbol)
            .map_or(0, |&i| self.entries[i].1)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, count)| count).sum()
    }

    /// `(symbol, count)` pairs in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// The sole symbol and its count, when exactly one distinct symbol exists.
    pub fn single(&self) -> Option<(char, u64)> {
        match self.entries.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

impl FromIterator<char> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut table = Self::default();
        for symbol in iter {
            table.add(symbol);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_in_first_appearance_order() {
        let freq = FrequencyTable::from_text("abracadabra");
        let entries: Vec<_> = freq.iter().collect();
        assert_eq!(
            entries,
            vec![('a', 5), ('b', 2), ('r', 2), ('c', 1), ('d', 1)]
        );
        assert_eq!(freq.total(), 11);
        assert_eq!(freq.get('z'), 0);
    }

    #[test]
    fn empty_and_single() {
        assert!(FrequencyTable::from_text("").is_empty());
        assert_eq!(FrequencyTable::from_text("").single(), None);
        assert_eq!(FrequencyTable::from_text("ééé").single(), Some(('é', 3)));
        assert_eq!(FrequencyTable::from_text("ab").single(), None);
    }
}
