use crate::emotion::Emotion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "emotion::lexicon";

const HAPPY: &[&str] = &[
    "happy", "joy", "excited", "glad", "delighted", "wonderful", "cheerful", "thrilled",
    "grateful",
];
const SAD: &[&str] = &[
    "sad", "depressed", "lonely", "miserable", "heartbroken", "crying", "grief", "hopeless",
];
const ANGRY: &[&str] = &[
    "angry", "furious", "annoyed", "frustrated", "irritated", "outraged", "livid",
];
const FEAR: &[&str] = &[
    "afraid", "scared", "scary", "fear", "terrified", "anxious", "worried", "nervous", "panic",
];
const SURPRISE: &[&str] = &[
    "surprise", "amazed", "astonished", "shocked", "unexpected", "wow", "unbelievable",
];
const DISGUST: &[&str] = &[
    "disgusting", "disgusted", "gross", "revolting", "nasty", "yuck", "repulsive",
];

#[derive(thiserror::Error, Debug)]
pub enum LexiconError {
    #[error("category `{0}` declared more than once")]
    DuplicateCategory(Emotion),
    #[error("neutral is the fallback category and must not have triggers")]
    NeutralHasTriggers,
    #[error("category `{0}` contains a blank trigger")]
    BlankTrigger(Emotion),
    #[error("failed to read lexicon {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed lexicon json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One emotion and the trigger words that vote for it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub emotion: Emotion,
    #[serde(default)]
    pub triggers: Vec<String>,
}

impl Category {
    pub fn new<I, S>(emotion: Emotion, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            emotion,
            triggers: triggers.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered emotion categories with their lowercase triggers.
///
/// Declaration order is the tie-break order used by the classifier. The
/// `neutral` category is always present and always empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexicon {
    categories: Vec<Category>,
}

impl Lexicon {
    pub fn builtin() -> Self {
        let table: [(Emotion, &[&str]); 6] = [
            (Emotion::Happy, HAPPY),
            (Emotion::Sad, SAD),
            (Emotion::Angry, ANGRY),
            (Emotion::Fear, FEAR),
            (Emotion::Surprise, SURPRISE),
            (Emotion::Disgust, DISGUST),
        ];
        let mut categories: Vec<Category> = table
            .into_iter()
            .map(|(emotion, words)| Category::new(emotion, words.iter().copied()))
            .collect();
        categories.push(Category::new(Emotion::Neutral, Vec::<String>::new()));
        Self { categories }
    }

    /// Validates and normalizes categories: triggers are trimmed,
    /// lower-cased and deduplicated, and `neutral` is appended when absent.
    pub fn from_categories(categories: Vec<Category>) -> Result<Self, LexiconError> {
        let mut seen = BTreeSet::new();
        let mut normalized = Vec::with_capacity(categories.len() + 1);

        for category in categories {
            if !seen.insert(category.emotion) {
                return Err(LexiconError::DuplicateCategory(category.emotion));
            }
            if category.emotion.is_neutral() && !category.triggers.is_empty() {
                return Err(LexiconError::NeutralHasTriggers);
            }

            let mut triggers: Vec<String> = Vec::with_capacity(category.triggers.len());
            for raw in category.triggers {
                let trigger = raw.trim().to_lowercase();
                if trigger.is_empty() {
                    return Err(LexiconError::BlankTrigger(category.emotion));
                }
                if !triggers.contains(&trigger) {
                    triggers.push(trigger);
                }
            }
            normalized.push(Category {
                emotion: category.emotion,
                triggers,
            });
        }

        if !seen.contains(&Emotion::Neutral) {
            normalized.push(Category::new(Emotion::Neutral, Vec::<String>::new()));
        }

        Ok(Self {
            categories: normalized,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, LexiconError> {
        let categories: Vec<Category> = serde_json::from_str(json)?;
        Self::from_categories(categories)
    }

    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let json = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::from_json_str(&json)?;
        tracing::debug!(
            target: LOG_TARGET,
            path = %path.display(),
            categories = lexicon.len(),
            "lexicon loaded"
        );
        Ok(lexicon)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Categories the classifier scores, in declaration order.
    pub fn match_targets(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|c| !c.emotion.is_neutral())
    }

    pub fn triggers(&self, emotion: Emotion) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.emotion == emotion)
            .map(|c| c.triggers.as_slice())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}
