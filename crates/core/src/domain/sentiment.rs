use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Summary produced by the external survey or trend analyzer.
///
/// `average_sentiment` is nominally in `[-1.0, 1.0]`, but producers are not
/// trusted to clamp it. Consumers treat out-of-range values as a data-quality
/// condition and still use the value as supplied.
///
/// Only `average_sentiment` affects scores. The descriptive fields drop
/// entries of the wrong shape instead of failing the whole summary.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    #[serde(default)]
    pub average_sentiment: Option<f64>,
    /// Keyword → lines mentioning it. Only used for rationale and feedback context.
    #[serde(default, deserialize_with = "lenient_themes")]
    pub themes: BTreeMap<String, Vec<String>>,
    #[serde(
        default,
        alias = "raw_feedback",
        alias = "raw_mentions",
        deserialize_with = "lenient_lines"
    )]
    pub raw_lines: Vec<String>,
    #[serde(default, deserialize_with = "lenient_top_words")]
    pub top_words: Vec<(String, u64)>,
}

impl SentimentSummary {
    pub fn with_sentiment(average_sentiment: f64) -> Self {
        Self { average_sentiment: Some(average_sentiment), ..Self::default() }
    }

    pub fn sentiment_or(&self, default: f64) -> f64 {
        self.average_sentiment.unwrap_or(default)
    }

    pub fn is_out_of_range(&self) -> bool {
        self.average_sentiment.is_some_and(|value| !(-1.0..=1.0).contains(&value))
    }

    /// Keywords with at least one matching line, most mentioned first.
    pub fn active_keywords(&self) -> Vec<&str> {
        let mut keywords: Vec<(&str, usize)> = self
            .themes
            .iter()
            .filter(|(_, lines)| !lines.is_empty())
            .map(|(keyword, lines)| (keyword.as_str(), lines.len()))
            .collect();
        keywords.sort_by(|a, b| b.1.cmp(&a.1));
        keywords.into_iter().map(|(keyword, _)| keyword).collect()
    }
}

fn string_items(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(|item| item.as_str().map(str::to_owned)).collect())
        .unwrap_or_default()
}

fn lenient_lines<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(string_items(&Value::deserialize(deserializer)?))
}

fn lenient_themes<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<String>>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let Value::Object(groups) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(groups
        .iter()
        .filter(|(_, lines)| lines.is_array())
        .map(|(keyword, lines)| (keyword.clone(), string_items(lines)))
        .collect())
}

/// Accepts `[word, count]` pairs with any non-negative numeric count; a
/// fractional count is rounded.
fn lenient_top_words<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<(String, u64)>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let Some(entries) = value.as_array() else {
        return Ok(Vec::new());
    };
    Ok(entries
        .iter()
        .filter_map(|entry| match entry.as_array()?.as_slice() {
            [word, count] => {
                let word = word.as_str()?;
                let count = count.as_f64().filter(|count| count.is_finite() && *count >= 0.0)?;
                Some((word.to_owned(), count.round() as u64))
            }
            _ => None,
        })
        .collect())
}
