//! Frequent-word ranking per engagement grade.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::analyzers::grade::Grade;
use crate::analyzers::types::{GradeWords, WordFrequency};
use crate::errors::Result;
use crate::post::NormalizedRecord;
use crate::tokenizer::{Token, Tokenizer};

/// Number of ranked words kept per grade.
pub const TOP_N: usize = 30;

/// Link-shortener prefix removed from every body before tokenization.
pub const URL_SHORTENER_PREFIX: &str = "https://t.co/";

const COMMON_NOUN_MARKER: &str = "普通名詞";
const NOUN_MARKER: &str = "名詞";

/// Which tokens count as words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PartOfSpeechFilter {
    /// Common nouns (`普通名詞`) longer than one character.
    #[default]
    #[value(name = "common-noun-min-length2")]
    CommonNounMinLength2,
    /// Any noun (`名詞`), regardless of length.
    #[value(name = "any-noun")]
    AnyNounNoLengthFilter,
}

impl PartOfSpeechFilter {
    pub fn keeps(&self, token: &Token) -> bool {
        match self {
            PartOfSpeechFilter::CommonNounMinLength2 => {
                token.tag.contains(COMMON_NOUN_MARKER) && token.surface_form.chars().count() > 1
            }
            PartOfSpeechFilter::AnyNounNoLengthFilter => token.tag.contains(NOUN_MARKER),
        }
    }
}

/// Counts surface forms, then orders them by count descending.
/// Equal counts keep first-occurrence order.
pub fn rank_words<I, S>(words: I, limit: usize) -> Vec<WordFrequency>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<WordFrequency> = Vec::new();

    for word in words {
        let word = word.into();
        match positions.get(&word) {
            Some(&i) => counts[i].count += 1,
            None => {
                positions.insert(word.clone(), counts.len());
                counts.push(WordFrequency {
                    surface_form: word,
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Ranks the most frequent words in the bodies of posts with `grade`.
///
/// Returns an empty ranking without calling the tokenizer when no post has
/// that grade. Tokenizer failures are returned to the caller unchanged.
#[tracing::instrument(skip(records, tokenizer))]
pub fn frequent_words<T: Tokenizer>(
    records: &[NormalizedRecord],
    grade: Grade,
    filter: PartOfSpeechFilter,
    tokenizer: &T,
) -> Result<GradeWords> {
    let bodies: Vec<String> = records
        .iter()
        .filter(|r| r.grade() == grade)
        .map(|r| r.body().replace(URL_SHORTENER_PREFIX, ""))
        .collect();

    if bodies.is_empty() {
        debug!("No posts for grade");
        return Ok(GradeWords {
            grade,
            post_count: 0,
            words: Vec::new(),
        });
    }

    let tokens = tokenizer.tokenize(&bodies.join(" "))?;
    let kept = tokens
        .into_iter()
        .filter(|t| filter.keeps(t))
        .map(|t| t.surface_form);
    let words = rank_words(kept, TOP_N);

    debug!(post_count = bodies.len(), ranked = words.len(), "Words ranked");

    Ok(GradeWords {
        grade,
        post_count: bodies.len(),
        words,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RaterError;
    use crate::post::PostRecord;
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;

    /// Splits on whitespace; words starting with `!` are tagged as particles,
    /// words starting with `~` as proper nouns, everything else as common nouns.
    struct StubTokenizer {
        seen: RefCell<Vec<String>>,
    }

    impl StubTokenizer {
        fn new() -> Self {
            Self {
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Tokenizer for StubTokenizer {
        fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
            self.seen.borrow_mut().push(text.to_string());
            Ok(text
                .split_whitespace()
                .map(|w| {
                    if let Some(rest) = w.strip_prefix('!') {
                        Token::new(rest, "助詞,係助詞,*,*")
                    } else if let Some(rest) = w.strip_prefix('~') {
                        Token::new(rest, "名詞,固有名詞,人名,*")
                    } else {
                        Token::new(w, "名詞,普通名詞,一般,*")
                    }
                })
                .collect())
        }
    }

    struct BrokenTokenizer;

    impl Tokenizer for BrokenTokenizer {
        fn tokenize(&self, _text: &str) -> Result<Vec<Token>> {
            Err(RaterError::TokenizerUnavailable("no dictionary".to_string()))
        }
    }

    fn record(likes: u64, body: &str) -> NormalizedRecord {
        NormalizedRecord::from_record(PostRecord {
            timestamp: Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap().fixed_offset(),
            body: body.to_string(),
            like_count: likes,
            repost_count: 0,
            id: body.to_string(),
        })
    }

    #[test]
    fn test_rank_words_ties_keep_first_occurrence() {
        let ranked = rank_words(["b", "a", "c", "a", "b", "d"], TOP_N);
        let forms: Vec<_> = ranked.iter().map(|w| w.surface_form.as_str()).collect();
        assert_eq!(forms, vec!["b", "a", "c", "d"]);
        assert_eq!(ranked[0].count, 2);
        assert_eq!(ranked[3].count, 1);
    }

    #[test]
    fn test_rank_words_caps_at_limit() {
        let words: Vec<String> = (0..50).map(|i| format!("w{i}")).collect();
        let ranked = rank_words(words, TOP_N);
        assert_eq!(ranked.len(), TOP_N);
        assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_filter_policies() {
        let common = Token::new("天気", "名詞,普通名詞,一般,*");
        let single = Token::new("雨", "名詞,普通名詞,一般,*");
        let proper = Token::new("東京", "名詞,固有名詞,地名,*");
        let particle = Token::new("は", "助詞,係助詞,*,*");

        let strict = PartOfSpeechFilter::CommonNounMinLength2;
        assert!(strict.keeps(&common));
        assert!(!strict.keeps(&single));
        assert!(!strict.keeps(&proper));
        assert!(!strict.keeps(&particle));

        let loose = PartOfSpeechFilter::AnyNounNoLengthFilter;
        assert!(loose.keeps(&common));
        assert!(loose.keeps(&single));
        assert!(loose.keeps(&proper));
        assert!(!loose.keeps(&particle));
    }

    #[test]
    fn test_frequent_words_for_grade() {
        let records = vec![
            record(150, "天気 !は 散歩 https://t.co/abc123"),
            record(120, "散歩 ~太郎 雨"),
            record(3, "天気 天気 天気"),
        ];
        let tokenizer = StubTokenizer::new();

        let result = frequent_words(
            &records,
            Grade::A,
            PartOfSpeechFilter::CommonNounMinLength2,
            &tokenizer,
        )
        .unwrap();

        assert_eq!(result.grade, Grade::A);
        assert_eq!(result.post_count, 2);
        assert_eq!(
            result.words,
            vec![
                WordFrequency { surface_form: "散歩".into(), count: 2 },
                WordFrequency { surface_form: "天気".into(), count: 1 },
                WordFrequency { surface_form: "abc123".into(), count: 1 },
            ]
        );
        assert_eq!(
            tokenizer.seen.borrow().as_slice(),
            &["天気 !は 散歩 abc123 散歩 ~太郎 雨".to_string()]
        );
    }

    #[test]
    fn test_any_noun_policy_keeps_single_characters_and_proper_nouns() {
        let records = vec![record(150, "散歩 ~太郎 雨")];
        let result = frequent_words(
            &records,
            Grade::A,
            PartOfSpeechFilter::AnyNounNoLengthFilter,
            &StubTokenizer::new(),
        )
        .unwrap();
        assert_eq!(result.words.len(), 3);
    }

    #[test]
    fn test_no_posts_for_grade_skips_tokenizer() {
        let records = vec![record(3, "天気")];
        let result = frequent_words(
            &records,
            Grade::B,
            PartOfSpeechFilter::default(),
            &BrokenTokenizer,
        )
        .unwrap();
        assert_eq!(result.post_count, 0);
        assert!(result.words.is_empty());
    }

    #[test]
    fn test_tokenizer_failure_is_surfaced() {
        let records = vec![record(3, "天気")];
        let err = frequent_words(
            &records,
            Grade::E,
            PartOfSpeechFilter::default(),
            &BrokenTokenizer,
        )
        .unwrap_err();
        assert!(matches!(err, RaterError::TokenizerUnavailable(_)));
    }
}
