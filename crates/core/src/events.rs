use crate::{EvalConfig, EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reward type that separates equally likely outcomes of one choice.
pub const GROUP_DIVIDER: &str = "di";
pub const CHAIN_ENDED: &str = "ee";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatKey {
    Speed,
    Stamina,
    Power,
    Guts,
    Intelligence,
    Energy,
    Potential,
    Bond,
    SkillHint,
}

impl StatKey {
    pub const COUNT: usize = 9;

    pub const ALL: [StatKey; StatKey::COUNT] = [
        StatKey::Speed,
        StatKey::Stamina,
        StatKey::Power,
        StatKey::Guts,
        StatKey::Intelligence,
        StatKey::Energy,
        StatKey::Potential,
        StatKey::Bond,
        StatKey::SkillHint,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatKey::Speed => "Speed",
            StatKey::Stamina => "Stamina",
            StatKey::Power => "Power",
            StatKey::Guts => "Guts",
            StatKey::Intelligence => "Intelligence",
            StatKey::Energy => "Energy",
            StatKey::Potential => "Potential",
            StatKey::Bond => "Bond",
            StatKey::SkillHint => "Skill Hint",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.label() == label)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, f64>", from = "BTreeMap<String, f64>")]
pub struct StatVector([f64; StatKey::COUNT]);

impl StatVector {
    pub fn get(&self, key: StatKey) -> f64 {
        self.0[key.slot()]
    }

    pub fn add(&mut self, key: StatKey, value: f64) {
        self.0[key.slot()] += value;
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self(self.0.map(|value| value * factor))
    }

    pub fn plus(self, other: &StatVector) -> Self {
        let mut out = self;
        for key in StatKey::ALL {
            out.add(key, other.get(key));
        }
        out
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|value| *value == 0.0)
    }
}

impl From<StatVector> for BTreeMap<String, f64> {
    fn from(stats: StatVector) -> Self {
        StatKey::ALL
            .into_iter()
            .map(|key| (key.label().to_string(), stats.get(key)))
            .collect()
    }
}

impl From<BTreeMap<String, f64>> for StatVector {
    fn from(map: BTreeMap<String, f64>) -> Self {
        let mut stats = StatVector::default();
        for (label, value) in map {
            if let Some(key) = StatKey::from_label(&label) {
                stats.add(key, value);
            }
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(rename = "type")]
    pub reward_type: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardKind {
    Stat(StatKey),
    Divider,
    ChainEnded,
    Other,
}

impl Reward {
    pub fn new(reward_type: &str, value: &str) -> Self {
        Self {
            reward_type: reward_type.to_string(),
            value: Some(value.to_string()),
            detail: None,
        }
    }

    pub fn kind(&self) -> RewardKind {
        match self.reward_type.as_str() {
            GROUP_DIVIDER => RewardKind::Divider,
            CHAIN_ENDED => RewardKind::ChainEnded,
            label => StatKey::from_label(label)
                .map(RewardKind::Stat)
                .unwrap_or(RewardKind::Other),
        }
    }
}

/// Parses a reward amount: a signed integer or an `a/b` range, which counts
/// as its floored midpoint.
pub fn parse_reward_value(raw: &str) -> EvalResult<i64> {
    let raw = raw.trim();
    if let Some((low, high)) = raw.split_once('/') {
        if let (Ok(low), Ok(high)) = (low.trim().parse::<i64>(), high.trim().parse::<i64>()) {
            return Ok((low + high).div_euclid(2));
        }
    }
    raw.parse::<i64>()
        .map_err(|_| EvalError::InvalidValue(raw.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewardGroup(pub Vec<Reward>);

impl RewardGroup {
    pub fn stats(&self) -> StatVector {
        let mut stats = StatVector::default();
        for reward in &self.0 {
            let RewardKind::Stat(key) = reward.kind() else {
                continue;
            };
            let raw = reward.value.as_deref().unwrap_or_default();
            match parse_reward_value(raw) {
                Ok(value) => stats.add(key, value as f64),
                Err(err) => tracing::warn!("ignoring {} reward: {}", reward.reward_type, err),
            }
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub option: Option<String>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
}

impl Choice {
    pub fn groups(&self) -> Vec<RewardGroup> {
        let mut groups = Vec::new();
        let mut current = Vec::new();
        for reward in &self.rewards {
            if reward.kind() == RewardKind::Divider {
                if !current.is_empty() {
                    groups.push(RewardGroup(std::mem::take(&mut current)));
                }
            } else {
                current.push(reward.clone());
            }
        }
        if !current.is_empty() {
            groups.push(RewardGroup(current));
        }
        groups
    }

    pub fn ends_chain(&self) -> bool {
        self.rewards
            .iter()
            .any(|reward| reward.kind() == RewardKind::ChainEnded)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    #[serde(default)]
    pub period: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryEvent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<HistoryEvent>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardEvents {
    pub dates: Vec<StoryEvent>,
    pub chain_events: Vec<StoryEvent>,
    pub random_events: Vec<StoryEvent>,
    pub special_events: Vec<StoryEvent>,
}

impl CardEvents {
    pub fn scored(&self) -> impl Iterator<Item = &StoryEvent> + '_ {
        self.chain_events.iter().chain(self.dates.iter())
    }

    pub fn all(&self) -> impl Iterator<Item = &StoryEvent> + '_ {
        self.dates
            .iter()
            .chain(self.chain_events.iter())
            .chain(self.random_events.iter())
            .chain(self.special_events.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.all().next().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceEvaluation {
    pub expected: StatVector,
    pub score: f64,
    pub ends_chain: bool,
}

/// Expected stats of a choice whose outcome groups are equally likely, or
/// `None` when the choice has no rewards besides dividers.
pub fn expected_stats(choice: &Choice) -> Option<StatVector> {
    let groups = choice.groups();
    if groups.is_empty() {
        return None;
    }
    let probability = 1.0 / groups.len() as f64;
    Some(
        groups
            .iter()
            .fold(StatVector::default(), |acc, group| {
                acc.plus(&group.stats().scaled(probability))
            }),
    )
}

pub fn score_stats(stats: &StatVector, config: &EvalConfig) -> f64 {
    StatKey::ALL
        .into_iter()
        .map(|key| stats.get(key) * config.stat_weights.weight(key))
        .sum()
}

pub fn evaluate_choice(choice: &Choice, config: &EvalConfig) -> Option<ChoiceEvaluation> {
    let expected = expected_stats(choice)?;
    let ends_chain = choice.ends_chain();
    let mut score = score_stats(&expected, config);
    if ends_chain {
        score -= config.chain_end_penalty;
    }
    Some(ChoiceEvaluation {
        expected,
        score,
        ends_chain,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BestChoice {
    /// Index into the event's choices; `None` when no choice scores above 0.
    pub index: Option<usize>,
    pub score: f64,
    pub stats: StatVector,
}

pub fn best_choice(event: &StoryEvent, config: &EvalConfig) -> BestChoice {
    let mut best = BestChoice::default();
    for (idx, choice) in event.choices.iter().enumerate() {
        let Some(eval) = evaluate_choice(choice, config) else {
            continue;
        };
        if eval.score > best.score {
            best = BestChoice {
                index: Some(idx),
                score: eval.score,
                stats: eval.expected,
            };
        }
    }
    best
}

pub fn event_stat_rewards(events: &CardEvents, config: &EvalConfig) -> StatVector {
    events.scored().fold(StatVector::default(), |total, event| {
        let best = best_choice(event, config);
        tracing::debug!(
            event = event.name.as_deref().unwrap_or("?"),
            choice = ?best.index,
            score = best.score,
            "picked event choice"
        );
        total.plus(&best.stats)
    })
}
