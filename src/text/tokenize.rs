//! Tokenization and stop-word filtering for facility text.

use ahash::AHashMap;

/// Minimum token length kept for term weighting. Single letters carry no signal.
const MIN_TOKEN_LENGTH: usize = 2;

/// Common English stop words filtered out before term weighting.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here", "hereafter",
    "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his", "how", "however",
    "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its",
    "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly", "move",
    "much", "must", "my", "myself", "name", "namely", "neither", "never", "nevertheless", "next",
    "nine", "no", "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of",
    "off", "often", "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise",
    "our", "ours", "ourselves", "out", "over", "own", "part", "per", "perhaps", "please", "put",
    "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "serious", "several",
    "she", "should", "show", "side", "since", "sincere", "six", "sixty", "so", "some", "somehow",
    "someone", "something", "sometime", "sometimes", "somewhere", "still", "such", "system",
    "take", "ten", "than", "that", "the", "their", "them", "themselves", "then", "thence",
    "there", "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they",
    "thick", "thin", "third", "this", "those", "though", "three", "through", "throughout",
    "thru", "thus", "to", "together", "too", "top", "toward", "towards", "twelve", "twenty",
    "two", "un", "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who",
    "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without", "would",
    "yet", "you", "your", "yours", "yourself", "yourselves",
];

pub(crate) fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// Splits normalized text on whitespace, dropping short tokens and stop words.
///
/// Expects the output of [`normalize`](super::normalize), so tokens are already
/// lower-case ASCII letters.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|token| token.len() >= MIN_TOKEN_LENGTH && !is_stop_word(token))
}

/// Counts occurrences of each token in a document.
pub(crate) fn term_counts(text: &str) -> AHashMap<&str, usize> {
    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[test]
    fn test_stop_words_sorted_for_binary_search() {
        check!(STOP_WORDS.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[rstest]
    #[case("parkir toilet  musholla", vec!["parkir", "toilet", "musholla"])]
    #[case("the toilet and a parking area", vec!["toilet", "parking", "area"])]
    #[case("x y gazebo", vec!["gazebo"])]
    #[case("   ", vec![])]
    fn test_tokenize(#[case] input: &str, #[case] expected: Vec<&str>) {
        let tokens: Vec<&str> = tokenize(input).collect();
        check!(tokens == expected);
    }

    #[test]
    fn test_term_counts() {
        let counts = term_counts("parkir toilet parkir the parkir");
        check!(counts.get("parkir") == Some(&3));
        check!(counts.get("toilet") == Some(&1));
        check!(!counts.contains_key("the"));
    }
}
