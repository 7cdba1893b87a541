//! Text statistics and analysis: counts, frequencies, repeated words,
//! word-list sentiment scoring, and a coarse language guess.

use std::collections::{HashMap, HashSet};

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Chinese,
    English,
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of characters, optionally ignoring whitespace.
pub fn char_count(text: &str, exclude_spaces: bool) -> usize {
    if exclude_spaces {
        text.chars().filter(|c| !c.is_whitespace()).count()
    } else {
        text.chars().count()
    }
}

/// Number of sentences, delimited by runs of `.`, `!`, or `?`. Segments
/// containing no word characters do not count.
pub fn sentence_count(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
}

/// Number of paragraphs, delimited by runs of newlines.
pub fn paragraph_count(text: &str) -> usize {
    text.split('\n').filter(|s| !s.is_empty()).count()
}

/// Case-insensitive occurrence count per word.
pub fn word_frequency(text: &str) -> HashMap<String, usize> {
    let word = Regex::new(r"\w+").expect("static pattern");
    let mut frequencies = HashMap::new();
    for m in word.find_iter(&text.to_lowercase()) {
        *frequencies.entry(m.as_str().to_string()).or_insert(0) += 1;
    }
    frequencies
}

/// Words that occur more than once (case-insensitive), in order of their
/// first repetition.
pub fn repeated_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut repeats = Vec::new();
    for word in lowered.split_whitespace() {
        if !seen.insert(word) && reported.insert(word) {
            repeats.push(word.to_string());
        }
    }
    repeats
}

const POSITIVE_WORDS: [&str; 4] = ["good", "great", "happy", "positive"];
const NEGATIVE_WORDS: [&str; 4] = ["bad", "sad", "negative", "terrible"];

/// Score the text against small positive/negative word lists. A toy
/// classifier by design; anything needing accuracy wants a real model.
pub fn sentiment(text: &str) -> Sentiment {
    let mut score = 0i32;
    for word in text.to_lowercase().split_whitespace() {
        if POSITIVE_WORDS.contains(&word) {
            score += 1;
        }
        if NEGATIVE_WORDS.contains(&word) {
            score -= 1;
        }
    }
    match score {
        s if s > 0 => Sentiment::Positive,
        s if s < 0 => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

/// Guess the dominant language by comparing Latin letters against CJK
/// unified ideographs. Coarse by intent: it answers "mostly Chinese or
/// not", nothing finer.
pub fn detect_language(text: &str) -> Language {
    let latin = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
    let chinese = text
        .chars()
        .filter(|c| ('\u{4e00}'..='\u{9fa5}').contains(c))
        .count();
    if chinese > latin {
        Language::Chinese
    } else {
        Language::English
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("  one\ttwo\nthree  "), 3);
    }

    #[test]
    fn test_char_count() {
        assert_eq!(char_count("a b c", false), 5);
        assert_eq!(char_count("a b c", true), 3);
        assert_eq!(char_count("", true), 0);
    }

    #[test]
    fn test_sentence_count() {
        assert_eq!(sentence_count("Hello. How are you? Fine!"), 3);
        assert_eq!(sentence_count("No terminator"), 1);
        assert_eq!(sentence_count("Wait... what?!"), 2);
        assert_eq!(sentence_count(""), 0);
    }

    #[test]
    fn test_paragraph_count() {
        assert_eq!(paragraph_count("one\n\ntwo\nthree"), 3);
        assert_eq!(paragraph_count(""), 0);
        assert_eq!(paragraph_count("single"), 1);
    }

    #[test]
    fn test_word_frequency() {
        let freq = word_frequency("The cat and the dog and the bird");
        assert_eq!(freq["the"], 3);
        assert_eq!(freq["and"], 2);
        assert_eq!(freq["cat"], 1);
    }

    #[test]
    fn test_sentiment() {
        assert_eq!(sentiment("what a great and happy day"), Sentiment::Positive);
        assert_eq!(sentiment("bad results, terrible even"), Sentiment::Negative);
        // One good, one bad: score is zero
        assert_eq!(sentiment("good food bad service"), Sentiment::Neutral);
        assert_eq!(sentiment("nothing scored here"), Sentiment::Neutral);
        assert_eq!(sentiment(""), Sentiment::Neutral);
    }

    #[test]
    fn test_sentiment_is_case_insensitive() {
        assert_eq!(sentiment("GREAT Happy GOOD"), Sentiment::Positive);
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("plain english text"), Language::English);
        assert_eq!(detect_language("你好世界"), Language::Chinese);
        // Mixed leans on whichever script has more characters
        assert_eq!(detect_language("ok 你好世界"), Language::Chinese);
        assert_eq!(detect_language("hello 你好"), Language::English);
        // Ties, including empty input, default to English
        assert_eq!(detect_language(""), Language::English);
        assert_eq!(detect_language("123 !?"), Language::English);
    }

    #[test]
    fn test_repeated_words() {
        assert_eq!(
            repeated_words("the cat saw the dog saw the cat"),
            vec!["the", "saw", "cat"]
        );
        assert!(repeated_words("all unique words here").is_empty());
    }
}
