use crate::{parse_condition, resolve_trigger, CardBonus, EvalConfig, EvalResult};
use serde::{Deserialize, Serialize};

pub const RUNNING_STYLE_KEY: &str = "running_style";
pub const DISTANCE_TYPE_KEY: &str = "distance_type";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillData {
    pub id: u32,
    pub rarity: i64,
    pub group_id: i64,
    pub icon_id: i64,
    pub grade_value: i64,
    pub condition_1: Option<String>,
    pub skill_time_active: f64,
    pub skill_cooldown_time: f64,
    pub ability_type: i64,
    pub ability_value: f64,
    pub skill_name: Option<String>,
    pub skill_desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatHintValue {
    pub stat_id: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardHint {
    SkillHint {
        skill_id: u32,
        #[serde(default)]
        skill_data: Option<SkillData>,
        #[serde(default)]
        hint_level: i64,
    },
    StatHint {
        #[serde(default)]
        stats: Vec<StatHintValue>,
    },
}

impl CardHint {
    pub fn skill_id(&self) -> Option<u32> {
        match self {
            CardHint::SkillHint { skill_id, .. } => Some(*skill_id),
            CardHint::StatHint { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillHint {
    pub id: u32,
    pub name: String,
    pub desc: String,
    pub running_style_trigger: i64,
    pub distance_type_trigger: i64,
}

pub fn skill_hint(hint: &CardHint) -> EvalResult<SkillHint> {
    let (id, data) = match hint {
        CardHint::SkillHint {
            skill_id,
            skill_data,
            ..
        } => (*skill_id, skill_data.clone().unwrap_or_default()),
        CardHint::StatHint { .. } => (0, SkillData::default()),
    };
    let condition = parse_condition(data.condition_1.as_deref().unwrap_or_default())?;
    Ok(SkillHint {
        id,
        name: data.skill_name.unwrap_or_else(|| "Unknown".to_string()),
        desc: data
            .skill_desc
            .unwrap_or_else(|| "No description available.".to_string()),
        running_style_trigger: resolve_trigger(&condition, RUNNING_STYLE_KEY),
        distance_type_trigger: resolve_trigger(&condition, DISTANCE_TYPE_KEY),
    })
}

/// Resolves every hint's triggers. Hints whose condition cannot be parsed are
/// dropped so the rest of the card still evaluates.
pub fn extract_skill_hints<'a>(hints: impl IntoIterator<Item = &'a CardHint>) -> Vec<SkillHint> {
    hints
        .into_iter()
        .filter_map(|hint| match skill_hint(hint) {
            Ok(resolved) => Some(resolved),
            Err(err) => {
                tracing::warn!(skill = ?hint.skill_id(), "skipping hint: {}", err);
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceType {
    Sprint,
    Mile,
    Medium,
    Long,
}

impl DistanceType {
    pub const ALL: [DistanceType; 4] = [
        DistanceType::Sprint,
        DistanceType::Mile,
        DistanceType::Medium,
        DistanceType::Long,
    ];

    pub fn from_keyword(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sprint" | "short" => Some(DistanceType::Sprint),
            "mile" => Some(DistanceType::Mile),
            "medium" | "mid" => Some(DistanceType::Medium),
            "long" => Some(DistanceType::Long),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunningStyle {
    FrontRunner,
    PaceChaser,
    LateSurger,
    EndCloser,
}

impl RunningStyle {
    pub const ALL: [RunningStyle; 4] = [
        RunningStyle::FrontRunner,
        RunningStyle::PaceChaser,
        RunningStyle::LateSurger,
        RunningStyle::EndCloser,
    ];

    pub fn from_keyword(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "front" | "front runner" | "runner" => Some(RunningStyle::FrontRunner),
            "pace" | "pace chaser" | "leader" => Some(RunningStyle::PaceChaser),
            "late" | "late surger" | "betweener" => Some(RunningStyle::LateSurger),
            "end" | "end closer" | "chaser" => Some(RunningStyle::EndCloser),
            _ => None,
        }
    }
}

/// What the player intends to run: active distance and running-style
/// categories (codes 1-4 in skill conditions) and optional races attended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayProfile {
    pub distances: [bool; 4],
    pub running_styles: [bool; 4],
    pub optional_races: u32,
}

impl PlayProfile {
    pub fn with_distance(mut self, distance: DistanceType) -> Self {
        self.distances[distance as usize] = true;
        self
    }

    pub fn with_running_style(mut self, style: RunningStyle) -> Self {
        self.running_styles[style as usize] = true;
        self
    }

    pub fn with_optional_races(mut self, races: u32) -> Self {
        self.optional_races = races;
        self
    }

    pub fn is_useful(&self, hint: &SkillHint) -> bool {
        trigger_matches(&self.distances, hint.distance_type_trigger)
            && trigger_matches(&self.running_styles, hint.running_style_trigger)
    }
}

fn trigger_matches(flags: &[bool; 4], trigger: i64) -> bool {
    if trigger == 0 {
        return true;
    }
    (1..=4).contains(&trigger) && flags[(trigger - 1) as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HintEvaluation {
    pub max_training_turns: i64,
    pub hint_frequency: f64,
    pub hint_levels: f64,
    pub hints_from_events: f64,
    pub useful_hint_rate: f64,
    pub hints_from_training: f64,
    pub total_hints: f64,
}

pub fn evaluate_hints(
    bonus: &CardBonus,
    hints: &[SkillHint],
    hints_from_events: f64,
    profile: &PlayProfile,
    config: &EvalConfig,
) -> HintEvaluation {
    let max_training_turns = config.turns.training_turns(profile.optional_races);
    let hint_frequency = config.base_hint_rate * (bonus.get("Hint Frequency") + 100.0) / 100.0;
    let mut hint_levels = bonus.get("Hint Levels");
    if hint_levels <= 0.0 {
        hint_levels = 1.0;
    }
    let useful_hint_rate = if hints.is_empty() {
        0.0
    } else {
        let useful = hints.iter().filter(|hint| profile.is_useful(hint)).count();
        useful as f64 / hints.len() as f64
    };
    let hints_from_training =
        max_training_turns as f64 * hint_frequency * hint_levels * useful_hint_rate;
    HintEvaluation {
        max_training_turns,
        hint_frequency,
        hint_levels,
        hints_from_events,
        useful_hint_rate,
        hints_from_training,
        total_hints: hints_from_events + hints_from_training,
    }
}
