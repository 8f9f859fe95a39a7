use crate::emotion::{ClassificationResult, Emotion, IntensityPolicy, Lexicon};

pub trait EmotionAnalyzer: Send + Sync {
    fn analyze_text(&self, text: &str) -> ClassificationResult;
}

/// Keyword-count classifier over a fixed [`Lexicon`].
///
/// Each non-neutral category scores the number of its distinct triggers that
/// occur as substrings of the lower-cased text. The strictly highest score
/// wins; equal scores keep the category declared first. A best score of zero
/// yields `neutral`.
#[derive(Clone, Debug, Default)]
pub struct KeywordEmotionClassifier {
    lexicon: Lexicon,
    policy: IntensityPolicy,
}

impl KeywordEmotionClassifier {
    pub fn new(lexicon: Lexicon, policy: IntensityPolicy) -> Self {
        Self { lexicon, policy }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn policy(&self) -> &IntensityPolicy {
        &self.policy
    }

    pub fn classify(&self, text: &str) -> ClassificationResult {
        let lower_text = text.to_lowercase();

        let mut best = Emotion::Neutral;
        let mut best_count = 0usize;
        for category in self.lexicon.match_targets() {
            let count = category
                .triggers
                .iter()
                .filter(|trigger| lower_text.contains(trigger.as_str()))
                .count();
            if count > best_count {
                best = category.emotion;
                best_count = count;
            }
        }

        ClassificationResult::new(best, self.policy.score(best_count), best_count)
    }
}

impl EmotionAnalyzer for KeywordEmotionClassifier {
    fn analyze_text(&self, text: &str) -> ClassificationResult {
        self.classify(text)
    }
}
