use crate::{
    config::AppConfig,
    crisis::{CrisisAssessment, CrisisScreener},
    emotion::{ClassificationResult, EmotionAnalyzer, KeywordEmotionClassifier, Lexicon, LexiconError},
    respond::{Responder, SupportResponse},
    session::Session,
};
use serde::Serialize;

const LOG_TARGET: &str = "companion";

/// Everything produced for one utterance.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Reply {
    pub classification: ClassificationResult,
    pub assessment: CrisisAssessment,
    pub emotion_changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<SupportResponse>,
}

pub struct Companion<A> {
    pub analyzer: A,
    pub screener: CrisisScreener,
    pub responder: Responder,
}

impl Companion<KeywordEmotionClassifier> {
    pub fn from_config(config: &AppConfig) -> Result<Self, LexiconError> {
        let lexicon = match &config.lexicon_path {
            Some(path) => Lexicon::load(path)?,
            None => Lexicon::builtin(),
        };
        Ok(Self::new(KeywordEmotionClassifier::new(
            lexicon,
            config.intensity,
        )))
    }
}

impl<A> Companion<A>
where
    A: EmotionAnalyzer,
{
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            screener: CrisisScreener::new(),
            responder: Responder::new(),
        }
    }

    pub fn handle(&self, session: &mut Session, text: &str) -> Reply {
        let classification = self.analyzer.analyze_text(text);
        let assessment = self.screener.assess(text);
        let emotion_changed = session.observe(text, classification, assessment.risk_level);

        tracing::debug!(
            target: LOG_TARGET,
            emotion = %classification.emotion(),
            intensity = classification.intensity(),
            matches = classification.match_count(),
            risk = %assessment.risk_level,
            "utterance classified"
        );
        if emotion_changed {
            tracing::info!(
                target: LOG_TARGET,
                from = %session.previous_emotion(),
                to = %classification.emotion(),
                "emotion changed"
            );
        }

        // Crisis language is answered no matter how short it is.
        let response = if Session::should_respond(text) || assessment.is_crisis() {
            Some(self.responder.respond(&classification, &assessment))
        } else {
            None
        };

        Reply {
            classification,
            assessment,
            emotion_changed,
            response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crisis::RiskLevel;
    use crate::emotion::Emotion;
    use crate::respond::SessionType;

    struct FixedAnalyzer(Emotion);

    impl EmotionAnalyzer for FixedAnalyzer {
        fn analyze_text(&self, _text: &str) -> ClassificationResult {
            ClassificationResult::new(self.0, 0.5, 1)
        }
    }

    #[test]
    fn handles_utterance_end_to_end() {
        let companion = Companion::new(KeywordEmotionClassifier::default());
        let mut session = Session::default();

        let reply = companion.handle(&mut session, "I feel a bit sad");
        assert_eq!(reply.classification.emotion(), Emotion::Sad);
        assert_eq!(reply.assessment.risk_level, RiskLevel::Low);
        assert!(reply.emotion_changed);
        let response = reply.response.expect("reply expected");
        assert_eq!(response.session_type, SessionType::GeneralSupport);
        assert_eq!(session.turn_count(), 1);
    }

    #[test]
    fn short_utterance_is_recorded_without_reply() {
        let companion = Companion::new(KeywordEmotionClassifier::default());
        let mut session = Session::default();

        let reply = companion.handle(&mut session, "wow");
        assert_eq!(reply.classification.emotion(), Emotion::Surprise);
        assert!(reply.response.is_none());
        assert_eq!(session.current_emotion(), Emotion::Surprise);
    }

    #[test]
    fn short_crisis_utterance_still_gets_reply() {
        let companion = Companion::new(KeywordEmotionClassifier::default());
        let mut session = Session::default();

        let reply = companion.handle(&mut session, "suicide");
        assert!(reply.assessment.is_crisis());
        let response = reply.response.expect("crisis reply");
        assert_eq!(response.session_type, SessionType::CrisisIntervention);
        assert_eq!(session.summary().current_risk_level, RiskLevel::High);
    }

    #[test]
    fn medium_risk_routes_to_supportive_reply() {
        let companion = Companion::new(KeywordEmotionClassifier::default());
        let mut session = Session::default();

        let reply = companion.handle(&mut session, "I feel worthless and so lonely");
        assert_eq!(reply.assessment.risk_level, RiskLevel::Medium);
        let response = reply.response.unwrap();
        assert_eq!(response.session_type, SessionType::SupportiveTherapy);
        assert_eq!(response.emotion, Emotion::Sad);
    }

    #[test]
    fn generic_over_analyzer() {
        let companion = Companion::new(FixedAnalyzer(Emotion::Angry));
        let mut session = Session::default();
        let reply = companion.handle(&mut session, "anything at all");
        assert_eq!(reply.classification.emotion(), Emotion::Angry);
        assert!(!companion.handle(&mut session, "again and again").emotion_changed);
    }

    #[test]
    fn from_config_uses_builtin_lexicon_by_default() {
        let companion = Companion::from_config(&AppConfig::default()).unwrap();
        assert_eq!(companion.analyzer.lexicon(), &Lexicon::builtin());
    }

    #[test]
    fn from_config_surfaces_missing_lexicon() {
        let config = AppConfig {
            lexicon_path: Some("/nonexistent/ora-lexicon.json".into()),
            ..Default::default()
        };
        assert!(matches!(
            Companion::from_config(&config),
            Err(LexiconError::Io { .. })
        ));
    }

    #[test]
    fn reply_serializes_flat_classification() {
        let companion = Companion::new(KeywordEmotionClassifier::default());
        let mut session = Session::default();
        let reply = companion.handle(&mut session, "I am so happy and excited today");
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["classification"]["emotion"], "happy");
        assert_eq!(json["classification"]["intensity"], 1.0);
        assert_eq!(json["classification"]["match_count"], 2);
    }
}
