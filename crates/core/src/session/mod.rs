//! Per-conversation state.
//!
//! A [`Session`] is owned by whoever drives one conversation and passed
//! explicitly to the [`Companion`](crate::companion::Companion); nothing in
//! this crate keeps conversation state globally.

use crate::config::HistoryCapacity;
use crate::crisis::RiskLevel;
use crate::emotion::{ClassificationResult, Emotion};
use crate::util::RingBuffer;
use serde::Serialize;
use std::collections::BTreeMap;

/// Utterances shorter than this (in chars, after trimming) get no reply.
pub const MIN_RESPONSE_CHARS: usize = 5;

/// Intensity a fresh session reports before anything was said.
pub const INITIAL_INTENSITY: f32 = 0.3;

/// Medium-risk turns tolerated in the retained history before the session
/// as a whole is considered medium risk.
const MEDIUM_RISK_TOLERANCE: usize = 2;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Turn {
    pub text: String,
    pub classification: ClassificationResult,
    pub risk_level: RiskLevel,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SessionSummary {
    pub turn_count: u64,
    pub retained_turns: usize,
    pub dominant_emotion: Emotion,
    pub emotion_distribution: BTreeMap<Emotion, usize>,
    pub current_risk_level: RiskLevel,
    pub high_risk_turns: usize,
    pub medium_risk_turns: usize,
}

#[derive(Clone, Debug)]
pub struct Session {
    chat_id: Option<String>,
    current: ClassificationResult,
    previous_emotion: Emotion,
    history: RingBuffer<Turn>,
    turn_count: u64,
}

impl Session {
    pub fn new(capacity: HistoryCapacity) -> Self {
        Self {
            chat_id: None,
            current: ClassificationResult::neutral(INITIAL_INTENSITY),
            previous_emotion: Emotion::Neutral,
            history: RingBuffer::new(capacity.as_non_zero()),
            turn_count: 0,
        }
    }

    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    pub fn assign_chat_id(&mut self, chat_id: impl Into<String>) {
        self.chat_id = Some(chat_id.into());
    }

    pub fn current(&self) -> &ClassificationResult {
        &self.current
    }

    pub fn current_emotion(&self) -> Emotion {
        self.current.emotion()
    }

    pub fn previous_emotion(&self) -> Emotion {
        self.previous_emotion
    }

    pub fn turn_count(&self) -> u64 {
        self.turn_count
    }

    /// Retained turns, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Turn> {
        self.history.iter()
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.history.latest()
    }

    pub fn should_respond(text: &str) -> bool {
        text.trim().chars().count() >= MIN_RESPONSE_CHARS
    }

    /// Records a classified utterance. Returns whether the emotion changed.
    pub fn observe(
        &mut self,
        text: &str,
        classification: ClassificationResult,
        risk_level: RiskLevel,
    ) -> bool {
        self.previous_emotion = self.current.emotion();
        self.current = classification;
        self.turn_count += 1;
        self.history.push(Turn {
            text: text.to_owned(),
            classification,
            risk_level,
        });
        self.previous_emotion != self.current.emotion()
    }

    pub fn summary(&self) -> SessionSummary {
        let mut distribution: BTreeMap<Emotion, usize> = BTreeMap::new();
        let mut high_risk_turns = 0;
        let mut medium_risk_turns = 0;

        for turn in self.history.iter() {
            *distribution.entry(turn.classification.emotion()).or_insert(0) += 1;
            match turn.risk_level {
                RiskLevel::High => high_risk_turns += 1,
                RiskLevel::Medium => medium_risk_turns += 1,
                RiskLevel::Low => {}
            }
        }

        let mut dominant_emotion = Emotion::Neutral;
        let mut dominant_count = 0;
        for emotion in Emotion::ALL {
            let count = distribution.get(&emotion).copied().unwrap_or(0);
            if count > dominant_count {
                dominant_emotion = emotion;
                dominant_count = count;
            }
        }

        let current_risk_level = if high_risk_turns > 0 {
            RiskLevel::High
        } else if medium_risk_turns > MEDIUM_RISK_TOLERANCE {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        SessionSummary {
            turn_count: self.turn_count,
            retained_turns: self.history.len(),
            dominant_emotion,
            emotion_distribution: distribution,
            current_risk_level,
            high_risk_turns,
            medium_risk_turns,
        }
    }

    /// Clears emotions and history but keeps the chat id.
    pub fn reset(&mut self) {
        self.current = ClassificationResult::neutral(INITIAL_INTENSITY);
        self.previous_emotion = Emotion::Neutral;
        self.history.clear();
        self.turn_count = 0;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(HistoryCapacity::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(emotion: Emotion) -> ClassificationResult {
        ClassificationResult::new(emotion, 0.8, 1)
    }

    #[test]
    fn fresh_session_is_neutral() {
        let session = Session::default();
        assert_eq!(session.current_emotion(), Emotion::Neutral);
        assert_eq!(session.previous_emotion(), Emotion::Neutral);
        assert_eq!(session.current().intensity(), INITIAL_INTENSITY);
        assert_eq!(session.turn_count(), 0);
        assert!(session.chat_id().is_none());
        assert!(session.last_turn().is_none());
    }

    #[test]
    fn observe_tracks_emotion_changes() {
        let mut session = Session::default();
        assert!(session.observe("so happy", result(Emotion::Happy), RiskLevel::Low));
        assert!(!session.observe("still glad", result(Emotion::Happy), RiskLevel::Low));
        assert!(session.observe("now sad", result(Emotion::Sad), RiskLevel::Low));
        assert_eq!(session.previous_emotion(), Emotion::Happy);
        assert_eq!(session.current_emotion(), Emotion::Sad);
        assert_eq!(session.last_turn().unwrap().text, "now sad");
    }

    #[test]
    fn neutral_observation_on_fresh_session_is_not_a_change() {
        let mut session = Session::default();
        assert!(!session.observe("hello there", result(Emotion::Neutral), RiskLevel::Low));
    }

    #[test]
    fn history_is_bounded_but_turn_count_is_not() {
        let mut session = Session::new(HistoryCapacity::new(2).unwrap());
        session.observe("one", result(Emotion::Happy), RiskLevel::Low);
        session.observe("two", result(Emotion::Sad), RiskLevel::Low);
        session.observe("three", result(Emotion::Fear), RiskLevel::Low);
        let texts: Vec<&str> = session.history().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "three"]);
        assert_eq!(session.turn_count(), 3);
        assert_eq!(session.summary().retained_turns, 2);
    }

    #[test]
    fn short_utterances_get_no_reply() {
        assert!(!Session::should_respond("hey"));
        assert!(!Session::should_respond("  ok  "));
        assert!(Session::should_respond("hello"));
        assert!(!Session::should_respond("日本語"));
    }

    #[test]
    fn summary_picks_most_frequent_emotion() {
        let mut session = Session::default();
        session.observe("a", result(Emotion::Sad), RiskLevel::Low);
        session.observe("b", result(Emotion::Angry), RiskLevel::Low);
        session.observe("c", result(Emotion::Angry), RiskLevel::Low);
        let summary = session.summary();
        assert_eq!(summary.dominant_emotion, Emotion::Angry);
        assert_eq!(summary.emotion_distribution.get(&Emotion::Sad), Some(&1));
        assert_eq!(summary.emotion_distribution.get(&Emotion::Angry), Some(&2));
    }

    #[test]
    fn summary_tie_prefers_declaration_order() {
        let mut session = Session::default();
        session.observe("a", result(Emotion::Disgust), RiskLevel::Low);
        session.observe("b", result(Emotion::Happy), RiskLevel::Low);
        assert_eq!(session.summary().dominant_emotion, Emotion::Happy);
    }

    #[test]
    fn empty_summary_is_neutral_low() {
        let summary = Session::default().summary();
        assert_eq!(summary.dominant_emotion, Emotion::Neutral);
        assert_eq!(summary.current_risk_level, RiskLevel::Low);
        assert!(summary.emotion_distribution.is_empty());
    }

    #[test]
    fn any_high_risk_turn_makes_session_high() {
        let mut session = Session::default();
        session.observe("a", result(Emotion::Sad), RiskLevel::High);
        session.observe("b", result(Emotion::Happy), RiskLevel::Low);
        let summary = session.summary();
        assert_eq!(summary.current_risk_level, RiskLevel::High);
        assert_eq!(summary.high_risk_turns, 1);
    }

    #[test]
    fn medium_risk_needs_more_than_two_turns() {
        let mut session = Session::default();
        session.observe("a", result(Emotion::Sad), RiskLevel::Medium);
        session.observe("b", result(Emotion::Sad), RiskLevel::Medium);
        assert_eq!(session.summary().current_risk_level, RiskLevel::Low);
        session.observe("c", result(Emotion::Sad), RiskLevel::Medium);
        assert_eq!(session.summary().current_risk_level, RiskLevel::Medium);
    }

    #[test]
    fn summary_serializes_distribution_with_label_keys() {
        let mut session = Session::default();
        session.observe("wow", result(Emotion::Surprise), RiskLevel::Low);
        let json = serde_json::to_value(session.summary()).unwrap();
        assert_eq!(json["emotion_distribution"]["surprise"], 1);
        assert_eq!(json["dominant_emotion"], "surprise");
    }

    #[test]
    fn reset_keeps_chat_id() {
        let mut session = Session::default();
        session.assign_chat_id("chat-42");
        session.observe("so happy", result(Emotion::Happy), RiskLevel::Low);
        session.reset();
        assert_eq!(session.chat_id(), Some("chat-42"));
        assert_eq!(session.turn_count(), 0);
        assert_eq!(session.current_emotion(), Emotion::Neutral);
        assert!(session.history().next().is_none());
    }
}
