use crate::schema::{CatalogRows, HintGainRow, SkillRow, SupportCardRow, TextRow};
use std::collections::{HashMap, HashSet};
use umaeval_core::{
    apply_unique_effects, interpolate_levels, tier_window, unique_unlock_tier, CardHint,
    CardSnapshot, EffectEntry, SkillData, StatHintValue, SupportCardRecord, UniqueBonus,
    UniqueOverlay,
};

pub const TEXT_EFFECT_NAME: i64 = 151;
pub const TEXT_CHARA_NAME: i64 = 182;
pub const TEXT_SKILL_NAME: i64 = 47;
pub const TEXT_SKILL_DESC: i64 = 48;

const SKILL_HINT_GAIN: i64 = 0;

/// Localized strings keyed by `(category, index)`.
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    entries: HashMap<(i64, i64), String>,
}

impl TextTable {
    pub fn new(rows: &[TextRow]) -> Self {
        let entries = rows
            .iter()
            .map(|row| ((row.category, row.index), row.text.clone()))
            .collect();
        Self { entries }
    }

    pub fn get(&self, category: i64, index: i64) -> Option<&str> {
        self.entries.get(&(category, index)).map(String::as_str)
    }

    pub fn effect_name(&self, effect_type: u32) -> String {
        self.get(TEXT_EFFECT_NAME, i64::from(effect_type))
            .map(str::to_string)
            .unwrap_or_else(|| effect_type.to_string())
    }
}

/// Skill records with their names resolved.
#[derive(Debug, Clone, Default)]
pub struct SkillIndex {
    skills: HashMap<u32, SkillData>,
}

impl SkillIndex {
    pub fn new(rows: &[SkillRow], texts: &TextTable) -> Self {
        let skills = rows
            .iter()
            .map(|row| (row.id, skill_data(row, texts)))
            .collect();
        Self { skills }
    }

    pub fn from_catalog(rows: &CatalogRows) -> Self {
        Self::new(&rows.skills, &TextTable::new(&rows.texts))
    }

    pub fn get(&self, id: u32) -> Option<&SkillData> {
        self.skills.get(&id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

fn skill_data(row: &SkillRow, texts: &TextTable) -> SkillData {
    let index = i64::from(row.id);
    SkillData {
        id: row.id,
        rarity: row.rarity,
        group_id: row.group_id,
        icon_id: row.icon_id,
        grade_value: row.grade_value,
        condition_1: row.condition_1.clone(),
        skill_time_active: row.skill_time_active,
        skill_cooldown_time: row.skill_cooldown_time,
        ability_type: row.ability_type,
        ability_value: row.ability_value,
        skill_name: texts.get(TEXT_SKILL_NAME, index).map(str::to_string),
        skill_desc: texts.get(TEXT_SKILL_DESC, index).map(str::to_string),
    }
}

/// Training type a card specializes in, from the catalog command id.
pub fn preferred_type(command_id: i64) -> Option<(&'static str, i64)> {
    match command_id {
        0 => Some(("Support", 6)),
        101 => Some(("Speed", 0)),
        102 => Some(("Power", 2)),
        103 => Some(("Guts", 3)),
        105 => Some(("Stamina", 1)),
        106 => Some(("Intelligence", 4)),
        _ => None,
    }
}

pub fn stat_name(code: i64) -> &'static str {
    match code {
        0 => "Speed",
        1 => "Stamina",
        2 => "Power",
        3 => "Guts",
        4 => "Intelligence",
        6 => "Support",
        _ => "Unknown",
    }
}

fn base_effects(card: &SupportCardRow, rows: &CatalogRows, texts: &TextTable) -> Vec<EffectEntry> {
    rows.effect_rows
        .iter()
        .filter(|row| row.id == card.effect_table_id)
        .filter_map(|row| {
            let interpolated = interpolate_levels(&row.levels());
            let Some(tiers) = tier_window(card.rarity, &interpolated) else {
                tracing::warn!(
                    card = card.id,
                    rarity = card.rarity,
                    effect_type = row.effect_type,
                    "skipping effect row with unknown rarity"
                );
                return None;
            };
            Some(EffectEntry {
                effect_type: row.effect_type,
                type_name: texts.effect_name(row.effect_type),
                tiers,
            })
        })
        .collect()
}

fn unique_overlays(card: &SupportCardRow, rows: &CatalogRows, texts: &TextTable) -> Vec<UniqueOverlay> {
    if card.unique_effect_id == 0 {
        return Vec::new();
    }
    rows.unique_effect_rows
        .iter()
        .filter(|row| row.id == card.unique_effect_id)
        .map(|row| {
            let effects = [(row.type_0, row.value_0), (row.type_1, row.value_1)]
                .into_iter()
                .filter(|(effect_type, _)| *effect_type != 0)
                .map(|(effect_type, value)| UniqueBonus {
                    effect_type,
                    type_name: texts.get(TEXT_EFFECT_NAME, i64::from(effect_type)).map(str::to_string),
                    value,
                })
                .collect();
            UniqueOverlay {
                level_unlocked: unique_unlock_tier(card.rarity, row.lv),
                effects,
            }
        })
        .collect()
}

/// Groups hint rows by `hint_group` in first-seen order. A skill row replaces
/// its group; stat rows accumulate into a stat hint.
fn hint_table(card_id: u32, rows: &[HintGainRow], skills: &SkillIndex) -> Vec<CardHint> {
    let mut groups: Vec<(i64, CardHint)> = Vec::new();
    for row in rows.iter().filter(|row| row.support_card_id == card_id) {
        let slot = groups.iter().position(|(group, _)| *group == row.hint_group);
        if row.hint_gain_type == SKILL_HINT_GAIN {
            let skill_id = match u32::try_from(row.hint_value_1) {
                Ok(id) => id,
                Err(_) => {
                    tracing::warn!(card = card_id, value = row.hint_value_1, "bad skill id in hint row");
                    continue;
                }
            };
            let hint = CardHint::SkillHint {
                skill_id,
                skill_data: skills.get(skill_id).cloned(),
                hint_level: row.hint_value_2,
            };
            match slot {
                Some(index) => groups[index].1 = hint,
                None => groups.push((row.hint_group, hint)),
            }
            continue;
        }

        let stat = StatHintValue {
            stat_id: stat_name(row.hint_value_1).to_string(),
            value: row.hint_value_2,
        };
        let index = match slot {
            Some(index) => index,
            None => {
                groups.push((row.hint_group, CardHint::StatHint { stats: Vec::new() }));
                groups.len() - 1
            }
        };
        match &mut groups[index].1 {
            CardHint::StatHint { stats } => stats.push(stat),
            CardHint::SkillHint { .. } => {
                tracing::warn!(
                    card = card_id,
                    group = row.hint_group,
                    "stat row in a skill hint group"
                );
            }
        }
    }
    groups.into_iter().map(|(_, hint)| hint).collect()
}

fn build_card(
    card: &SupportCardRow,
    rows: &CatalogRows,
    texts: &TextTable,
    skills: &SkillIndex,
) -> SupportCardRecord {
    let base = base_effects(card, rows, texts);
    let unique_effects = unique_overlays(card, rows, texts);
    let effects = apply_unique_effects(&base, &unique_effects);
    let preferred = preferred_type(card.command_id);
    SupportCardRecord {
        id: card.id,
        chara_id_card: card.chara_id,
        card_chara_name: texts.get(TEXT_CHARA_NAME, card.chara_id).map(str::to_string),
        rarity: card.rarity,
        prefered_type: preferred.map(|(name, _)| name.to_string()),
        prefered_type_id: preferred.map(|(_, id)| id),
        effects,
        unique_effects,
        hints_table: hint_table(card.id, &rows.hint_rows, skills),
        hints_event_table: Vec::new(),
        all_events: None,
    }
}

/// Builds records for every catalog card missing from `existing`. Existing
/// records are kept untouched and come first.
pub fn build_support_cards(
    rows: &CatalogRows,
    existing: Vec<SupportCardRecord>,
) -> Vec<SupportCardRecord> {
    let texts = TextTable::new(&rows.texts);
    let skills = SkillIndex::new(&rows.skills, &texts);
    let known: HashSet<u32> = existing.iter().map(|card| card.id).collect();
    let mut cards = existing;
    for row in &rows.support_cards {
        if known.contains(&row.id) {
            tracing::debug!(card = row.id, "card already built");
            continue;
        }
        let card = build_card(row, rows, &texts, &skills);
        tracing::debug!(card = card.id, name = card.display_name(), "built card");
        cards.push(card);
    }
    cards
}

pub fn build_snapshot(rows: &CatalogRows, existing: CardSnapshot) -> CardSnapshot {
    CardSnapshot::new(build_support_cards(rows, existing.into_cards()))
}
