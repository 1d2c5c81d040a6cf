use serde::{Deserialize, Serialize};

/// Sentiment label returned by the stub server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

const POLARITY_THRESHOLD: f32 = 0.2;

const LEXICON: &[(&str, f32)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("calm", 0.3),
    ("excited", 0.4),
    ("fantastic", 0.4),
    ("fine", 0.4),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("love", 0.5),
    ("proud", 0.8),
    ("relaxed", 0.4),
    ("wonderful", 1.0),
    ("angry", -0.5),
    ("anxious", -0.3),
    ("awful", -1.0),
    ("bad", -0.7),
    ("depressed", -0.6),
    ("exhausted", -0.4),
    ("hate", -0.8),
    ("lonely", -0.5),
    ("miserable", -1.0),
    ("sad", -0.5),
    ("stressed", -0.5),
    ("terrible", -1.0),
    ("tired", -0.4),
    ("upset", -0.6),
    ("worried", -0.4),
];

/// Average polarity of the known words in `text`, in `[-1, 1]`.
/// Text without any known word scores 0.
pub fn polarity(text: &str) -> f32 {
    let scores: Vec<f32> = text
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .filter_map(|word| {
            let word = word.to_lowercase();
            LEXICON
                .iter()
                .find(|(known, _)| *known == word)
                .map(|(_, score)| *score)
        })
        .collect();

    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f32>() / scores.len() as f32
    }
}

pub fn classify(text: &str) -> Sentiment {
    let polarity = polarity(text);
    if polarity > POLARITY_THRESHOLD {
        Sentiment::Positive
    } else if polarity < -POLARITY_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}
