use crate::{Datatype, IndexTooLargeError, ValueId, ValueIdOrder, Vocabulary};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// A word that is not part of the persistent [Vocabulary], for example a constant from a query.
///
/// Besides its content (the string representation of an IRI or literal), the entry remembers
/// where it would be located in the vocabulary. This allows ordering it against
/// [Datatype::VocabIndex] values without accessing the vocabulary again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalVocabEntry {
    content: String,
    lower_bound: u64,
    upper_bound: u64,
}

impl LocalVocabEntry {
    /// Creates a new entry and looks up its position in `vocabulary`.
    pub fn new(content: impl Into<String>, vocabulary: &(impl Vocabulary + ?Sized)) -> Self {
        let content = content.into();
        let (lower_bound, upper_bound) = vocabulary.position_of_word(&content);
        Self {
            content,
            lower_bound,
            upper_bound,
        }
    }

    /// Creates a new entry with a known position `[lower_bound, upper_bound)` in the vocabulary.
    pub fn with_bounds(content: impl Into<String>, lower_bound: u64, upper_bound: u64) -> Self {
        debug_assert!(lower_bound <= upper_bound);
        Self {
            content: content.into(),
            lower_bound,
            upper_bound,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the half-open range of vocabulary indices that compare equal to this entry.
    pub fn position_in_vocab(&self) -> (u64, u64) {
        (self.lower_bound, self.upper_bound)
    }

    /// Compares a vocabulary index against this entry.
    pub fn compare_vocab_index(&self, vocab_index: u64) -> Ordering {
        if vocab_index < self.lower_bound {
            Ordering::Less
        } else if vocab_index >= self.upper_bound {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl Display for LocalVocabEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.content)
    }
}

/// A query-local vocabulary that owns [LocalVocabEntry]s.
///
/// [ValueId]s of type [Datatype::LocalVocabIndex] store the slot of an entry in this vocabulary.
/// Entries are never removed, so a slot stays valid for as long as the vocabulary lives. The
/// vocabulary is also the [ValueIdOrder] that correctly orders such values.
#[derive(Debug, Clone, Default)]
pub struct LocalVocab {
    entries: Vec<LocalVocabEntry>,
    slots: HashMap<String, u64>,
}

impl LocalVocab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the [ValueId] of `entry`, adding the entry if it is not yet contained.
    #[track_caller]
    pub fn get_index_and_add_if_not_contained(
        &mut self,
        entry: LocalVocabEntry,
    ) -> Result<ValueId, IndexTooLargeError> {
        if let Some(slot) = self.slots.get(entry.content()) {
            return ValueId::from_local_vocab_index(*slot);
        }

        let slot = self.entries.len() as u64;
        let id = ValueId::from_local_vocab_index(slot)?;
        self.slots.insert(entry.content.clone(), slot);
        self.entries.push(entry);
        Ok(id)
    }

    /// Returns the [ValueId] of the entry with the given content if it is contained.
    pub fn get_index(&self, content: &str) -> Option<ValueId> {
        let slot = self.slots.get(content)?;
        ValueId::from_local_vocab_index(*slot).ok()
    }

    /// Returns the entry that is referenced by `id`.
    pub fn get(&self, id: ValueId) -> Option<&LocalVocabEntry> {
        if id.datatype() != Datatype::LocalVocabIndex {
            return None;
        }
        let slot = usize::try_from(id.get_local_vocab_index()).ok()?;
        self.entries.get(slot)
    }

    /// Returns the entry that is referenced by `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not reference an entry of this vocabulary.
    pub fn entry(&self, id: ValueId) -> &LocalVocabEntry {
        match self.get(id) {
            Some(entry) => entry,
            None => panic!("{id} does not reference an entry of this local vocabulary"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalVocabEntry> {
        self.entries.iter()
    }

    /// Returns the id of `entry` together with an order that knows this id.
    ///
    /// If `entry` is not contained, the id is the one it would get when added. The vocabulary
    /// itself is not modified.
    #[track_caller]
    pub fn with_entry<'a>(
        &'a self,
        entry: &'a LocalVocabEntry,
    ) -> Result<(ValueId, LocalVocabWithEntry<'a>), IndexTooLargeError> {
        let id = match self.get_index(entry.content()) {
            Some(id) => id,
            None => ValueId::from_local_vocab_index(self.entries.len() as u64)?,
        };
        let order = LocalVocabWithEntry {
            local_vocab: self,
            entry,
            id,
        };
        Ok((id, order))
    }
}

impl ValueIdOrder for LocalVocab {
    /// Orders `a` and `b` like their raw bits, except that [Datatype::VocabIndex] and
    /// [Datatype::LocalVocabIndex] are interleaved as one domain of strings.
    ///
    /// # Panics
    ///
    /// Panics if a [Datatype::LocalVocabIndex] does not belong to this vocabulary.
    fn compare(&self, a: ValueId, b: ValueId) -> Ordering {
        compare_with_entries(a, b, |id| self.entry(id))
    }
}

/// A [LocalVocab] extended by one entry that is not stored in it, see [LocalVocab::with_entry].
#[derive(Debug, Clone, Copy)]
pub struct LocalVocabWithEntry<'a> {
    local_vocab: &'a LocalVocab,
    entry: &'a LocalVocabEntry,
    id: ValueId,
}

impl<'a> LocalVocabWithEntry<'a> {
    fn entry(&self, id: ValueId) -> &'a LocalVocabEntry {
        if id == self.id {
            self.entry
        } else {
            self.local_vocab.entry(id)
        }
    }
}

impl ValueIdOrder for LocalVocabWithEntry<'_> {
    /// Orders like [LocalVocab], with the additional entry in its slot.
    fn compare(&self, a: ValueId, b: ValueId) -> Ordering {
        compare_with_entries(a, b, |id| self.entry(id))
    }
}

fn compare_with_entries<'e>(
    a: ValueId,
    b: ValueId,
    entry: impl Fn(ValueId) -> &'e LocalVocabEntry,
) -> Ordering {
    match (a.datatype(), b.datatype()) {
        (Datatype::LocalVocabIndex, Datatype::LocalVocabIndex) => {
            if a == b {
                return Ordering::Equal;
            }
            entry(a).content().cmp(entry(b).content())
        }
        (Datatype::LocalVocabIndex, Datatype::VocabIndex) => entry(a)
            .compare_vocab_index(b.get_vocab_index())
            .reverse(),
        (Datatype::VocabIndex, Datatype::LocalVocabIndex) => {
            entry(b).compare_vocab_index(a.get_vocab_index())
        }
        _ => a.cmp(&b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SortedVocabulary;

    fn vocabulary() -> SortedVocabulary {
        SortedVocabulary::new(["\"apple\"", "\"cherry\"", "\"melon\""])
    }

    #[test]
    fn add_is_deduplicated() {
        let vocabulary = vocabulary();
        let mut local_vocab = LocalVocab::new();
        let a = local_vocab
            .get_index_and_add_if_not_contained(LocalVocabEntry::new("\"banana\"", &vocabulary))
            .unwrap();
        let b = local_vocab
            .get_index_and_add_if_not_contained(LocalVocabEntry::new("\"kiwi\"", &vocabulary))
            .unwrap();
        let c = local_vocab
            .get_index_and_add_if_not_contained(LocalVocabEntry::new("\"banana\"", &vocabulary))
            .unwrap();
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(local_vocab.len(), 2);
        assert_eq!(local_vocab.entry(b).content(), "\"kiwi\"");
        assert_eq!(local_vocab.entry(a).position_in_vocab(), (1, 1));
        assert_eq!(local_vocab.get_index("\"kiwi\""), Some(b));
    }

    #[test]
    fn interleaves_with_vocab_indices() {
        let vocabulary = vocabulary();
        let mut local_vocab = LocalVocab::new();
        let banana = local_vocab
            .get_index_and_add_if_not_contained(LocalVocabEntry::new("\"banana\"", &vocabulary))
            .unwrap();
        let zucchini = local_vocab
            .get_index_and_add_if_not_contained(LocalVocabEntry::new("\"zucchini\"", &vocabulary))
            .unwrap();
        let vocab = |index| ValueId::from_vocab_index(index).unwrap();

        let mut ids = vec![
            zucchini,
            vocab(2),
            banana,
            vocab(0),
            ValueId::from_int(3),
            vocab(1),
            ValueId::from_text_record_index(0).unwrap(),
        ];
        ids.sort_by(|a, b| local_vocab.compare(*a, *b));

        let rendered = ids
            .iter()
            .map(|id| match local_vocab.get(*id) {
                Some(entry) => entry.to_string(),
                None => id.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        insta::assert_snapshot!(rendered, @r#"I:3 V:0 "banana" V:1 V:2 "zucchini" T:0"#);
    }

    #[test]
    fn contained_word_is_equal_to_vocab_index() {
        let vocabulary = vocabulary();
        let mut local_vocab = LocalVocab::new();
        let cherry = local_vocab
            .get_index_and_add_if_not_contained(LocalVocabEntry::new("\"cherry\"", &vocabulary))
            .unwrap();
        let vocab_cherry = ValueId::from_vocab_index(1).unwrap();
        assert_eq!(local_vocab.compare(cherry, vocab_cherry), Ordering::Equal);
        assert_eq!(local_vocab.compare(vocab_cherry, cherry), Ordering::Equal);
    }

    #[test]
    fn with_entry_orders_without_adding() {
        let vocabulary = vocabulary();
        let mut local_vocab = LocalVocab::new();
        let banana = local_vocab
            .get_index_and_add_if_not_contained(LocalVocabEntry::new("\"banana\"", &vocabulary))
            .unwrap();

        let kiwi = LocalVocabEntry::new("\"kiwi\"", &vocabulary);
        let (id, order) = local_vocab.with_entry(&kiwi).unwrap();
        assert_eq!(id, ValueId::from_local_vocab_index(1).unwrap());
        assert_eq!(order.compare(banana, id), Ordering::Less);
        assert_eq!(order.compare(id, ValueId::from_vocab_index(1).unwrap()), Ordering::Greater);
        assert_eq!(order.compare(id, ValueId::from_vocab_index(2).unwrap()), Ordering::Less);
        assert_eq!(local_vocab.len(), 1);

        let contained = LocalVocabEntry::new("\"banana\"", &vocabulary);
        let (id, _) = local_vocab.with_entry(&contained).unwrap();
        assert_eq!(id, banana);
    }

    #[test]
    #[should_panic(expected = "does not reference an entry")]
    fn unknown_slot_panics() {
        let local_vocab = LocalVocab::new();
        local_vocab.entry(ValueId::from_local_vocab_index(3).unwrap());
    }
}
