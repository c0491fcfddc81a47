/// A sorted dictionary of words (IRIs and literals) that are referenced by
/// [Datatype::VocabIndex](crate::Datatype::VocabIndex) values.
///
/// The storage of the vocabulary is not part of this crate. Implementations only need to answer
/// where a word is (or would be) located.
pub trait Vocabulary {
    /// Returns the number of words in the vocabulary.
    fn len(&self) -> u64;

    /// Returns true if the vocabulary has no words.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the half-open range of vocabulary indices `[lower, upper)` that are equal to
    /// `word`.
    ///
    /// If `word` is not contained in the vocabulary, the range is empty and `lower` is the index
    /// at which `word` would be inserted.
    fn position_of_word(&self, word: &str) -> (u64, u64);
}

/// An in-memory [Vocabulary] that orders words by their bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedVocabulary {
    words: Vec<String>,
}

impl SortedVocabulary {
    /// Creates a new vocabulary. The words are sorted and deduplicated.
    pub fn new(words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut words = words.into_iter().map(Into::into).collect::<Vec<_>>();
        words.sort_unstable();
        words.dedup();
        Self { words }
    }

    /// Returns the word at `index`.
    pub fn word(&self, index: u64) -> Option<&str> {
        let index = usize::try_from(index).ok()?;
        self.words.get(index).map(String::as_str)
    }

    /// Returns the index of `word` if it is contained in the vocabulary.
    pub fn index_of(&self, word: &str) -> Option<u64> {
        let (lower, upper) = self.position_of_word(word);
        (lower < upper).then_some(lower)
    }
}

impl Vocabulary for SortedVocabulary {
    fn len(&self) -> u64 {
        self.words.len() as u64
    }

    fn position_of_word(&self, word: &str) -> (u64, u64) {
        let lower = self.words.partition_point(|w| w.as_str() < word);
        let contained = self.words.get(lower).is_some_and(|w| w == word);
        let lower = lower as u64;
        (lower, lower + u64::from(contained))
    }
}
