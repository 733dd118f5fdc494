//! Incident status, recommended action and fidelity tier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lane that stores high-fidelity (cloud-embedded) vectors by default.
pub const FAST_LANE: &str = "fast_lane";
/// Lane that stores low-fidelity, binary-quantized vectors by default.
pub const OFFLINE_LANE: &str = "offline_lane";

/// Operational status assigned to an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    Critical,
    Warning,
    Ok,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Critical => "CRITICAL",
            IncidentStatus::Warning => "WARNING",
            IncidentStatus::Ok => "OK",
        }
    }

    /// Case-insensitive parse of the stored label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CRITICAL" => Some(IncidentStatus::Critical),
            "WARNING" => Some(IncidentStatus::Warning),
            "OK" => Some(IncidentStatus::Ok),
            _ => None,
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action an operator should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    StopTrain,
    EmergencyBrake,
    SlowDown,
    Monitor,
    Proceed,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedAction::StopTrain => "STOP_TRAIN",
            RecommendedAction::EmergencyBrake => "EMERGENCY_BRAKE",
            RecommendedAction::SlowDown => "SLOW_DOWN",
            RecommendedAction::Monitor => "MONITOR",
            RecommendedAction::Proceed => "PROCEED",
        }
    }

    /// Action used when only a status is known: critical stops the train, anything
    /// else is monitored.
    pub fn for_status(status: IncidentStatus) -> Self {
        match status {
            IncidentStatus::Critical => RecommendedAction::StopTrain,
            IncidentStatus::Warning | IncidentStatus::Ok => RecommendedAction::Monitor,
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives status and action from free-form labels (file names, folder names,
/// detector class names).
///
/// Matching is by lowercase substring over all labels, first rule wins:
///
/// | contains            | status   | action           |
/// |---------------------|----------|------------------|
/// | `broken`, `crack`   | CRITICAL | STOP_TRAIN       |
/// | `snow`, `ice`       | WARNING  | SLOW_DOWN        |
/// | `obstruction`       | CRITICAL | EMERGENCY_BRAKE  |
/// | otherwise           | OK       | PROCEED          |
pub fn classify_labels<S: AsRef<str>>(labels: &[S]) -> (IncidentStatus, RecommendedAction) {
    let haystack: String = labels
        .iter()
        .map(|l| l.as_ref().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    if haystack.contains("broken") || haystack.contains("crack") {
        (IncidentStatus::Critical, RecommendedAction::StopTrain)
    } else if haystack.contains("snow") || haystack.contains("ice") {
        (IncidentStatus::Warning, RecommendedAction::SlowDown)
    } else if haystack.contains("obstruction") {
        (IncidentStatus::Critical, RecommendedAction::EmergencyBrake)
    } else {
        (IncidentStatus::Ok, RecommendedAction::Proceed)
    }
}

/// Cost/fidelity tier of a producing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fidelity {
    /// Cloud embedding of an analysis text.
    High,
    /// Local detector output.
    Low,
}

impl Fidelity {
    /// Default lane for this tier.
    pub fn lane_name(&self) -> &'static str {
        match self {
            Fidelity::High => FAST_LANE,
            Fidelity::Low => OFFLINE_LANE,
        }
    }
}

impl fmt::Display for Fidelity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fidelity::High => f.write_str("high"),
            Fidelity::Low => f.write_str("low"),
        }
    }
}
