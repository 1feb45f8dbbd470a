use crate::{LimitBreak, TierValues};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Effect type codes whose unique bonus compounds with the base bonus
/// instead of adding to it: friendship bonus, training effectiveness, hint
/// frequency, failure protection and energy cost reduction.
pub const MULTIPLICATIVE_EFFECT_TYPES: [u32; 5] = [1, 8, 18, 27, 28];

pub const EFFECT_NAMES: [&str; 31] = [
    "Friendship Bonus",
    "Mood Effect",
    "Speed Bonus",
    "Stamina Bonus",
    "Power Bonus",
    "Guts Bonus",
    "Wit Bonus",
    "Training Effectiveness",
    "Initial Speed",
    "Initial Stamina",
    "Initial Power",
    "Initial Guts",
    "Initial Wit",
    "Initial Friendship Gauge",
    "Race Bonus",
    "Fan Bonus",
    "Hint Levels",
    "Hint Frequency",
    "Specialty Priority",
    "Max Speed",
    "Max Stamina",
    "Max Power",
    "Max Guts",
    "Max Wit",
    "Event Recovery",
    "Event Effectiveness",
    "Failure Protection",
    "Energy Cost Reduction",
    "Minigame Effectiveness",
    "Skill Point Bonus",
    "Wit Friendship Recovery",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectEntry {
    #[serde(rename = "type")]
    pub effect_type: u32,
    pub type_name: String,
    #[serde(flatten)]
    pub tiers: TierValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueBonus {
    #[serde(rename = "type")]
    pub effect_type: u32,
    #[serde(default)]
    pub type_name: Option<String>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueOverlay {
    #[serde(default, with = "unlock_tier")]
    pub level_unlocked: Option<LimitBreak>,
    #[serde(default)]
    pub effects: Vec<UniqueBonus>,
}

/// `"none"` marks an overlay whose unlock level maps to no tier. Older
/// snapshots wrote `-1` for the same thing.
mod unlock_tier {
    use crate::LimitBreak;
    use serde::{Deserialize, Deserializer, Serializer};

    const NONE: &str = "none";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawUnlock {
        Key(String),
        Index(i64),
    }

    pub fn serialize<S: Serializer>(value: &Option<LimitBreak>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.map(LimitBreak::key).unwrap_or(NONE))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<LimitBreak>, D::Error> {
        let raw = Option::<RawUnlock>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawUnlock::Key(key)) => LimitBreak::from_key(&key),
            Some(RawUnlock::Index(index)) => usize::try_from(index)
                .ok()
                .and_then(LimitBreak::from_index),
            None => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackingRule {
    Additive,
    Multiplicative,
}

impl StackingRule {
    pub fn for_type(effect_type: u32) -> Self {
        if MULTIPLICATIVE_EFFECT_TYPES.contains(&effect_type) {
            StackingRule::Multiplicative
        } else {
            StackingRule::Additive
        }
    }

    pub fn combine(self, base: f64, overlay: f64) -> f64 {
        match self {
            StackingRule::Additive => base + overlay,
            StackingRule::Multiplicative => {
                let total = ((1.0 + base / 100.0) * (1.0 + overlay / 100.0) - 1.0) * 100.0;
                round_to_hundredths(total)
            }
        }
    }
}

// ties go to the even hundredth
fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Tiers before an overlay's unlock tier and unset base tiers are copied
/// through unchanged.
pub fn apply_unique_effects(base: &[EffectEntry], overlays: &[UniqueOverlay]) -> Vec<EffectEntry> {
    let mut rows: Vec<EffectEntry> = base.to_vec();
    for overlay in overlays {
        let Some(unlock) = overlay.level_unlocked else {
            continue;
        };
        for bonus in &overlay.effects {
            let rule = StackingRule::for_type(bonus.effect_type);
            rows = rows
                .into_iter()
                .map(|row| {
                    if row.effect_type != bonus.effect_type {
                        return row;
                    }
                    let tiers = stack_from(row.tiers, unlock, rule, bonus.value);
                    EffectEntry { tiers, ..row }
                })
                .collect();
        }
    }
    rows
}

fn stack_from(tiers: TierValues, unlock: LimitBreak, rule: StackingRule, value: f64) -> TierValues {
    LimitBreak::ALL
        .into_iter()
        .filter(|lb| *lb >= unlock)
        .fold(tiers, |acc, lb| {
            let base = acc.get(lb);
            if base == TierValues::UNSET {
                acc
            } else {
                acc.with(lb, rule.combine(base, value))
            }
        })
}

/// Missing effects read as `-1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardBonus(BTreeMap<String, f64>);

impl CardBonus {
    pub fn empty() -> Self {
        Self(
            EFFECT_NAMES
                .iter()
                .map(|name| (name.to_string(), TierValues::UNSET))
                .collect(),
        )
    }

    /// Overlay bonuses are only read here for effects without a base value;
    /// the rest were stacked in by [`apply_unique_effects`].
    pub fn at_tier(effects: &[EffectEntry], overlays: &[UniqueOverlay], lb: LimitBreak) -> Self {
        let mut bonus = Self::empty();
        for effect in effects {
            bonus.set(&effect.type_name, effect.tiers.get(lb));
        }
        for overlay in overlays {
            match overlay.level_unlocked {
                Some(unlock) if unlock <= lb => {}
                _ => continue,
            }
            for unique in &overlay.effects {
                let name = overlay_name(unique, effects);
                if bonus.get(&name) == TierValues::UNSET {
                    bonus.set(&name, unique.value);
                }
            }
        }
        bonus
    }

    pub fn get(&self, name: &str) -> f64 {
        self.0.get(name).copied().unwrap_or(TierValues::UNSET)
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.0.insert(name.to_string(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl Default for CardBonus {
    fn default() -> Self {
        Self::empty()
    }
}

fn overlay_name(unique: &UniqueBonus, effects: &[EffectEntry]) -> String {
    if let Some(name) = &unique.type_name {
        return name.clone();
    }
    effects
        .iter()
        .find(|effect| effect.effect_type == unique.effect_type)
        .map(|effect| effect.type_name.clone())
        .unwrap_or_else(|| unique.effect_type.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(effect_type: u32, name: &str, values: [f64; 5]) -> EffectEntry {
        EffectEntry {
            effect_type,
            type_name: name.to_string(),
            tiers: TierValues::from_array(values),
        }
    }

    fn overlay(level: Option<LimitBreak>, effect_type: u32, value: f64) -> UniqueOverlay {
        UniqueOverlay {
            level_unlocked: level,
            effects: vec![UniqueBonus {
                effect_type,
                type_name: None,
                value,
            }],
        }
    }

    #[test]
    fn multiplicative_types_compound() {
        assert_eq!(StackingRule::for_type(1).combine(10.0, 10.0), 21.0);
        assert_eq!(StackingRule::for_type(18).combine(25.0, 10.0), 37.5);
    }

    #[test]
    fn hundredths_round_half_to_even() {
        assert_eq!(round_to_hundredths(0.125), 0.12);
        assert_eq!(round_to_hundredths(0.375), 0.38);
        assert_eq!(round_to_hundredths(32.000000000000014), 32.0);
    }

    #[test]
    fn unlock_tier_reads_keys_none_and_negative_codes() {
        let read = |raw: &str| -> Option<LimitBreak> {
            let overlay: UniqueOverlay = serde_json::from_str(raw).expect("overlay");
            overlay.level_unlocked
        };
        assert_eq!(read(r#"{"level_unlocked": "3lb", "effects": []}"#), Some(LimitBreak::Three));
        assert_eq!(read(r#"{"level_unlocked": "none", "effects": []}"#), None);
        assert_eq!(read(r#"{"level_unlocked": -1, "effects": []}"#), None);
        assert_eq!(read(r#"{"level_unlocked": 2, "effects": []}"#), Some(LimitBreak::Two));
        assert_eq!(read(r#"{"level_unlocked": null}"#), None);
        assert_eq!(read(r#"{"effects": []}"#), None);
        assert_eq!(read(r#"{"level_unlocked": "9lb"}"#), None);
    }

    #[test]
    fn missing_unlock_tier_serializes_as_none() {
        let json = serde_json::to_value(overlay(None, 1, 5.0)).expect("serialize");
        assert_eq!(json["level_unlocked"], "none");
        let json = serde_json::to_value(overlay(Some(LimitBreak::Max), 1, 5.0)).expect("serialize");
        assert_eq!(json["level_unlocked"], "mlb");
    }

    #[test]
    fn other_types_add() {
        assert_eq!(StackingRule::for_type(3).combine(10.0, 5.0), 15.0);
    }

    #[test]
    fn overlay_applies_from_unlock_tier_only() {
        let base = vec![entry(1, "Friendship Bonus", [10.0, 10.0, 10.0, 10.0, 10.0])];
        let out = apply_unique_effects(&base, &[overlay(Some(LimitBreak::Two), 1, 10.0)]);
        assert_eq!(out[0].tiers.to_array(), [10.0, 10.0, 21.0, 21.0, 21.0]);
        // input rows are left alone
        assert_eq!(base[0].tiers.get(LimitBreak::Max), 10.0);
    }

    #[test]
    fn unset_tiers_and_unresolved_overlays_are_untouched() {
        let base = vec![entry(3, "Stamina Bonus", [-1.0, -1.0, 1.0, 1.0, 2.0])];
        let out = apply_unique_effects(
            &base,
            &[overlay(Some(LimitBreak::Zero), 3, 1.0), overlay(None, 3, 50.0)],
        );
        assert_eq!(out[0].tiers.to_array(), [-1.0, -1.0, 2.0, 2.0, 3.0]);
    }

    #[test]
    fn bonus_map_starts_with_known_names_unset() {
        let bonus = CardBonus::empty();
        assert_eq!(bonus.iter().count(), EFFECT_NAMES.len());
        assert_eq!(bonus.get("Race Bonus"), -1.0);
        assert_eq!(bonus.get("not an effect"), -1.0);
    }

    #[test]
    fn bonus_map_takes_overlay_without_base_row() {
        let effects = vec![entry(1, "Friendship Bonus", [20.0; 5])];
        let overlays = vec![UniqueOverlay {
            level_unlocked: Some(LimitBreak::One),
            effects: vec![
                UniqueBonus {
                    effect_type: 1,
                    type_name: Some("Friendship Bonus".to_string()),
                    value: 10.0,
                },
                UniqueBonus {
                    effect_type: 15,
                    type_name: Some("Race Bonus".to_string()),
                    value: 5.0,
                },
            ],
        }];
        let locked = CardBonus::at_tier(&effects, &overlays, LimitBreak::Zero);
        assert_eq!(locked.get("Race Bonus"), -1.0);
        let unlocked = CardBonus::at_tier(&effects, &overlays, LimitBreak::Max);
        assert_eq!(unlocked.get("Race Bonus"), 5.0);
        // already stacked by the aggregator, not applied a second time
        assert_eq!(unlocked.get("Friendship Bonus"), 20.0);
    }
}
