use crate::StatKey;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatWeights {
    pub speed: f64,
    pub stamina: f64,
    pub power: f64,
    pub guts: f64,
    pub intelligence: f64,
    pub energy: f64,
    /// Skill points.
    pub potential: f64,
    pub bond: f64,
    pub skill_hint: f64,
}

impl StatWeights {
    pub fn weight(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Speed => self.speed,
            StatKey::Stamina => self.stamina,
            StatKey::Power => self.power,
            StatKey::Guts => self.guts,
            StatKey::Intelligence => self.intelligence,
            StatKey::Energy => self.energy,
            StatKey::Potential => self.potential,
            StatKey::Bond => self.bond,
            StatKey::SkillHint => self.skill_hint,
        }
    }
}

impl Default for StatWeights {
    fn default() -> Self {
        Self {
            speed: 1.0,
            stamina: 1.0,
            power: 1.0,
            guts: 1.0,
            intelligence: 1.0,
            energy: 2.0,
            potential: 0.2,
            bond: 0.0,
            skill_hint: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnBudget {
    pub season_turns: i64,
    pub extra_turns: i64,
    pub mandatory_races: i64,
}

impl TurnBudget {
    pub fn training_turns(&self, optional_races: u32) -> i64 {
        self.season_turns + self.extra_turns - self.mandatory_races - optional_races as i64
    }
}

impl Default for TurnBudget {
    fn default() -> Self {
        Self {
            season_turns: 72,
            extra_turns: 6,
            mandatory_races: 11,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub stat_weights: StatWeights,
    /// Subtracted from a choice's score when it ends the event chain.
    pub chain_end_penalty: f64,
    pub turns: TurnBudget,
    /// Chance per training turn that a card shows a hint, before bonuses.
    pub base_hint_rate: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            stat_weights: StatWeights::default(),
            chain_end_penalty: 1000.0,
            turns: TurnBudget::default(),
            base_hint_rate: 0.075,
        }
    }
}
