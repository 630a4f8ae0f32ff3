//! Swimming domain types.
//!
//! Strokes, pools and the training rows the metrics engine reads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Swimming stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwimStroke {
    /// Freestyle
    Free,
    /// Backstroke
    Back,
    /// Breaststroke
    Breast,
    /// Butterfly
    Fly,
    /// Individual medley
    #[serde(rename = "IM")]
    Im,
}

impl SwimStroke {
    /// All strokes in catalog order.
    pub const ALL: [SwimStroke; 5] = [
        SwimStroke::Free,
        SwimStroke::Back,
        SwimStroke::Breast,
        SwimStroke::Fly,
        SwimStroke::Im,
    ];

    /// Catalog identifier (1-5).
    pub fn id(&self) -> u8 {
        match self {
            SwimStroke::Free => 1,
            SwimStroke::Back => 2,
            SwimStroke::Breast => 3,
            SwimStroke::Fly => 4,
            SwimStroke::Im => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwimStroke::Free => "FREE",
            SwimStroke::Back => "BACK",
            SwimStroke::Breast => "BREAST",
            SwimStroke::Fly => "FLY",
            SwimStroke::Im => "IM",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "FREE" => Some(SwimStroke::Free),
            "BACK" => Some(SwimStroke::Back),
            "BREAST" => Some(SwimStroke::Breast),
            "FLY" => Some(SwimStroke::Fly),
            "IM" => Some(SwimStroke::Im),
            _ => None,
        }
    }

    /// Look up a stroke by catalog identifier.
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// English display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            SwimStroke::Free => "Freestyle",
            SwimStroke::Back => "Backstroke",
            SwimStroke::Breast => "Breaststroke",
            SwimStroke::Fly => "Butterfly",
            SwimStroke::Im => "Individual Medley",
        }
    }

    /// Spanish display name, used for event labels.
    pub fn label_es(&self) -> &'static str {
        match self {
            SwimStroke::Free => "Libre",
            SwimStroke::Back => "Espalda",
            SwimStroke::Breast => "Pecho",
            SwimStroke::Fly => "Mariposa",
            SwimStroke::Im => "Combinado",
        }
    }

    /// Official competition distances for this stroke, in meters.
    pub fn official_distances(&self) -> &'static [u32] {
        match self {
            SwimStroke::Free => &[50, 100, 200, 400, 800, 1500],
            SwimStroke::Back | SwimStroke::Breast | SwimStroke::Fly => &[50, 100, 200],
            SwimStroke::Im => &[200, 400],
        }
    }

    /// Whether `distance_m` is an official event for this stroke.
    pub fn is_official_distance(&self, distance_m: u32) -> bool {
        self.official_distances().contains(&distance_m)
    }
}

impl std::fmt::Display for SwimStroke {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pool course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PoolType {
    /// Short course meters (25m)
    #[default]
    Scm,
    /// Long course meters (50m)
    Lcm,
}

impl PoolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolType::Scm => "SCM",
            PoolType::Lcm => "LCM",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "SCM" => Some(PoolType::Scm),
            "LCM" => Some(PoolType::Lcm),
            _ => None,
        }
    }

    /// Pool length in meters.
    pub fn length_m(&self) -> u32 {
        match self {
            PoolType::Scm => 25,
            PoolType::Lcm => 50,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PoolType::Scm => "Short Course Meters (25m)",
            PoolType::Lcm => "Long Course Meters (50m)",
        }
    }
}

/// Training session focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionType {
    Aerobic,
    Threshold,
    Speed,
    Tech,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Aerobic => "AEROBIC",
            SessionType::Threshold => "THRESHOLD",
            SessionType::Speed => "SPEED",
            SessionType::Tech => "TECH",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "AEROBIC" => Some(SessionType::Aerobic),
            "THRESHOLD" => Some(SessionType::Threshold),
            "SPEED" => Some(SessionType::Speed),
            "TECH" => Some(SessionType::Tech),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Aerobic => "Aeróbico",
            SessionType::Threshold => "Umbral",
            SessionType::Speed => "Velocidad",
            SessionType::Tech => "Técnica",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SessionType::Aerobic => "Trabajo de resistencia aeróbica",
            SessionType::Threshold => "Trabajo en umbral anaeróbico",
            SessionType::Speed => "Series de velocidad y potencia",
            SessionType::Tech => "Enfoque en técnica y corrección",
        }
    }
}

/// Competitor gender as recorded in result lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// A dated training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: String,
    pub athlete_id: String,
    pub session_date: NaiveDate,
    pub session_type: SessionType,
    /// Session duration in minutes
    pub duration_min: u32,
    /// Rate of perceived exertion (1-10)
    pub session_rpe: u8,
    pub notes: Option<String>,
}

/// One timed attempt at a test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSet {
    pub id: String,
    pub session_id: String,
    /// Test distance in meters
    pub distance_m: u32,
    pub stroke: SwimStroke,
    pub pool_length_m: u32,
    /// Total elapsed time in milliseconds
    pub total_time_ms: i64,
    pub attempt_no: u32,
    pub is_best: bool,
    /// Stroke counts per pool length
    pub strokes: Vec<TrainingStroke>,
    pub splits: Vec<TrainingSplit>,
}

/// Timed sub-segment of a training set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSplit {
    pub split_index: u32,
    pub split_distance_m: f64,
    pub split_time_ms: i64,
}

impl TrainingSplit {
    pub fn new(split_index: u32, split_distance_m: f64, split_time_ms: i64) -> Self {
        Self {
            split_index,
            split_distance_m,
            split_time_ms,
        }
    }
}

/// Stroke count for one pool length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingStroke {
    pub length_index: u32,
    pub stroke_count: u32,
}
