use std::collections::HashMap;

/// Characters stripped from both ends of every token.
const TRIM_CHARS: &[char] = &[' ', '\n', ',', '.', '!', '?', ':', '-', '&', '"', '\'', '[', ']'];

/// A distinct word and how many times it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordFrequency {
    pub word: String,
    pub count: u32,
}

impl WordFrequency {
    pub fn new(word: impl Into<String>, count: u32) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }

    /// Share of the most common word's count, in `(0, 1]` for any word
    /// that made it into the list.
    pub fn frequency(&self, max_count: u32) -> f32 {
        if max_count == 0 {
            0.0
        } else {
            self.count as f32 / max_count as f32
        }
    }
}

/// Counts a word multiset, most common first. Equal counts keep the order
/// in which the words first appeared. Empty strings are ignored.
pub fn count_words<I, S>(words: I) -> Vec<WordFrequency>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counted: Vec<WordFrequency> = Vec::new();

    for word in words {
        let word = word.as_ref();
        if word.is_empty() {
            continue;
        }
        match index.get(word) {
            Some(&i) => counted[i].count += 1,
            None => {
                index.insert(word.to_string(), counted.len());
                counted.push(WordFrequency::new(word, 1));
            }
        }
    }

    rank(counted)
}

/// Sorts precomputed counts most common first, dropping zero counts and
/// blank words. Stable, so ties keep their input order.
pub fn rank(mut counts: Vec<WordFrequency>) -> Vec<WordFrequency> {
    counts.retain(|w| w.count > 0 && !w.word.trim().is_empty());
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Splits text on spaces and trims punctuation off each token.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(' ')
        .map(|token| token.trim_matches(TRIM_CHARS))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_ranks() {
        let ranked = count_words(["dog", "cat", "cat", "bird", "dog", "cat"]);
        assert_eq!(
            ranked,
            vec![
                WordFrequency::new("cat", 3),
                WordFrequency::new("dog", 2),
                WordFrequency::new("bird", 1),
            ]
        );
        assert_eq!(ranked[1].frequency(3), 2.0 / 3.0);
    }

    #[test]
    fn ties_keep_first_appearance() {
        let ranked = count_words(["b", "a", "c", "a", "b"]);
        let order: Vec<_> = ranked.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(order, ["b", "a", "c"]);
    }

    #[test]
    fn rank_drops_empty_entries() {
        let ranked = rank(vec![
            WordFrequency::new("x", 0),
            WordFrequency::new("  ", 4),
            WordFrequency::new("y", 2),
        ]);
        assert_eq!(ranked, vec![WordFrequency::new("y", 2)]);
    }

    #[test]
    fn tokenizing_strips_punctuation() {
        let tokens = tokenize("\"Hello,\" she said -- [quietly]. It's fine!\n");
        assert_eq!(tokens, ["Hello", "she", "said", "quietly", "It's", "fine"]);
    }
}
