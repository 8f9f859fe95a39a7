use crate::crisis::{CrisisAssessment, RiskLevel};
use crate::emotion::{ClassificationResult, Emotion};
use serde::{Deserialize, Serialize};

const CRISIS_MESSAGE: &str = "I'm very concerned about you right now. Your life has value and there are people who want to help. Please reach out to a crisis counselor immediately.";
const EMERGENCY_NOTE: &str = "Call 911 if in immediate danger";

const SAFETY_PLAN: &[&str] = &[
    "Remove any means of self-harm",
    "Stay with someone you trust",
    "Go to emergency room if needed",
];

const REFLECTION_QUESTIONS: &[&str] = &[
    "What has been most challenging for you lately?",
    "How are you taking care of yourself?",
    "What support do you have in your life right now?",
];

const DEFAULT_HOTLINES: &[(&str, &str)] = &[
    ("US", "988"),
    ("UK", "116 123"),
    ("Canada", "1-833-456-4566"),
    ("Australia", "13 11 14"),
];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    CrisisIntervention,
    SupportiveTherapy,
    GeneralSupport,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hotline {
    pub region: String,
    pub number: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrisisResources {
    pub hotlines: Vec<Hotline>,
    pub emergency: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupportResponse {
    pub message: String,
    pub session_type: SessionType,
    pub emotion: Emotion,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub coping_strategies: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub reflection_questions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub follow_up: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resources: Option<CrisisResources>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub safety_plan: Vec<String>,
}

/// Picks a canned supportive reply for a classified, screened utterance.
#[derive(Clone, Debug)]
pub struct Responder {
    hotlines: Vec<Hotline>,
}

impl Responder {
    pub fn new() -> Self {
        Self::with_hotlines(
            DEFAULT_HOTLINES
                .iter()
                .map(|(region, number)| Hotline {
                    region: (*region).to_owned(),
                    number: (*number).to_owned(),
                })
                .collect(),
        )
    }

    pub fn with_hotlines(hotlines: Vec<Hotline>) -> Self {
        Self { hotlines }
    }

    pub fn respond(
        &self,
        classification: &ClassificationResult,
        assessment: &CrisisAssessment,
    ) -> SupportResponse {
        let emotion = classification.emotion();
        match assessment.risk_level {
            RiskLevel::High => self.crisis_response(emotion),
            RiskLevel::Medium => supportive_response(emotion),
            RiskLevel::Low => general_response(emotion),
        }
    }

    fn crisis_response(&self, emotion: Emotion) -> SupportResponse {
        SupportResponse {
            message: CRISIS_MESSAGE.to_owned(),
            session_type: SessionType::CrisisIntervention,
            emotion,
            coping_strategies: Vec::new(),
            reflection_questions: Vec::new(),
            follow_up: None,
            resources: Some(CrisisResources {
                hotlines: self.hotlines.clone(),
                emergency: EMERGENCY_NOTE.to_owned(),
            }),
            safety_plan: owned(SAFETY_PLAN),
        }
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}

fn supportive_response(emotion: Emotion) -> SupportResponse {
    let message = match emotion {
        Emotion::Sad => "I can hear that you're going through a really difficult time. These feelings of sadness are valid, and you don't have to face them alone.",
        Emotion::Fear => "Anxiety can feel overwhelming, but there are ways to manage these feelings. Let's focus on what you can control right now.",
        Emotion::Angry => "It sounds like you're feeling really frustrated. Anger often tells us something important about our needs or boundaries.",
        _ => "I can sense you're struggling right now. Your feelings are important and valid. What would feel most helpful for you in this moment?",
    };
    SupportResponse {
        message: message.to_owned(),
        session_type: SessionType::SupportiveTherapy,
        emotion,
        coping_strategies: coping_strategies(emotion),
        reflection_questions: Vec::new(),
        follow_up: Some(format!(
            "Would you like to explore what's contributing to these feelings of {}?",
            feeling_word(emotion)
        )),
        resources: None,
        safety_plan: Vec::new(),
    }
}

fn general_response(emotion: Emotion) -> SupportResponse {
    SupportResponse {
        message: format!(
            "Thank you for sharing that with me. I can sense you're feeling {}. It takes courage to express your feelings.",
            feeling_word(emotion)
        ),
        session_type: SessionType::GeneralSupport,
        emotion,
        coping_strategies: Vec::new(),
        reflection_questions: owned(REFLECTION_QUESTIONS),
        follow_up: None,
        resources: None,
        safety_plan: Vec::new(),
    }
}

pub fn coping_strategies(emotion: Emotion) -> Vec<String> {
    let strategies: &[&str] = match emotion {
        Emotion::Fear => &[
            "Try deep breathing: 4 counts in, 6 counts out",
            "Ground yourself: name 5 things you can see, 4 you can touch",
            "Practice progressive muscle relaxation",
        ],
        Emotion::Sad => &[
            "Allow yourself to feel the emotion without judgment",
            "Reach out to a trusted friend or family member",
            "Engage in one small self-care activity",
        ],
        Emotion::Angry => &[
            "Take a pause before responding",
            "Try physical exercise to release tension",
            "Identify what need isn't being met",
        ],
        _ => &[
            "Practice mindful breathing",
            "Connect with your support system",
            "Be gentle with yourself",
        ],
    };
    owned(strategies)
}

// Adjective form used inside reply sentences.
fn feeling_word(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Fear => "anxious",
        Emotion::Surprise => "surprised",
        Emotion::Disgust => "disgusted",
        other => other.as_str(),
    }
}

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| (*l).to_owned()).collect()
}
