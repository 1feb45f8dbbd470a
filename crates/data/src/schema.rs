//! Records handed over by the catalog reader and the event page scraper.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use umaeval_core::{LEVEL_COUNT, UNSET};

fn unset() -> i64 {
    UNSET
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportCardRow {
    pub id: u32,
    #[serde(alias = "chara_id_card")]
    pub chara_id: i64,
    pub rarity: u8,
    pub effect_table_id: i64,
    #[serde(default)]
    pub unique_effect_id: i64,
    #[serde(default)]
    pub command_id: i64,
    #[serde(default)]
    pub skill_set_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectRow {
    pub id: i64,
    #[serde(rename = "type")]
    pub effect_type: u32,
    #[serde(default = "unset")]
    pub init: i64,
    #[serde(default = "unset")]
    pub limit_lv5: i64,
    #[serde(default = "unset")]
    pub limit_lv10: i64,
    #[serde(default = "unset")]
    pub limit_lv15: i64,
    #[serde(default = "unset")]
    pub limit_lv20: i64,
    #[serde(default = "unset")]
    pub limit_lv25: i64,
    #[serde(default = "unset")]
    pub limit_lv30: i64,
    #[serde(default = "unset")]
    pub limit_lv35: i64,
    #[serde(default = "unset")]
    pub limit_lv40: i64,
    #[serde(default = "unset")]
    pub limit_lv45: i64,
    #[serde(default = "unset")]
    pub limit_lv50: i64,
}

impl EffectRow {
    pub fn levels(&self) -> [i64; LEVEL_COUNT] {
        [
            self.init,
            self.limit_lv5,
            self.limit_lv10,
            self.limit_lv15,
            self.limit_lv20,
            self.limit_lv25,
            self.limit_lv30,
            self.limit_lv35,
            self.limit_lv40,
            self.limit_lv45,
            self.limit_lv50,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueEffectRow {
    pub id: i64,
    pub lv: i64,
    #[serde(default)]
    pub type_0: u32,
    #[serde(default)]
    pub value_0: f64,
    #[serde(default)]
    pub type_1: u32,
    #[serde(default)]
    pub value_1: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintGainRow {
    pub support_card_id: u32,
    pub hint_group: i64,
    pub hint_gain_type: i64,
    pub hint_value_1: i64,
    pub hint_value_2: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillRow {
    pub id: u32,
    pub rarity: i64,
    pub group_id: i64,
    pub icon_id: i64,
    pub grade_value: i64,
    pub condition_1: Option<String>,
    #[serde(alias = "float_ability_time_1")]
    pub skill_time_active: f64,
    #[serde(alias = "float_cooldown_time_1")]
    pub skill_cooldown_time: f64,
    #[serde(alias = "ability_type_1_1")]
    pub ability_type: i64,
    #[serde(alias = "float_ability_value_1_1")]
    pub ability_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRow {
    pub category: i64,
    pub index: i64,
    pub text: String,
}

/// Dump of the catalog tables the engine reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogRows {
    pub support_cards: Vec<SupportCardRow>,
    pub effect_rows: Vec<EffectRow>,
    pub unique_effect_rows: Vec<UniqueEffectRow>,
    pub hint_rows: Vec<HintGainRow>,
    pub skills: Vec<SkillRow>,
    pub texts: Vec<TextRow>,
}

/// Event page payload of one card, keyed by the page's short codes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEventData {
    pub random: Vec<RawEvent>,
    pub arrows: Vec<RawEvent>,
    pub special: Vec<RawEvent>,
    pub dates: Vec<RawEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEvent {
    pub n: Option<String>,
    pub c: Vec<RawOption>,
    pub history: Vec<RawHistory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawHistory {
    pub period: Option<Value>,
    pub data: RawEventBody,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEventBody {
    pub n: Option<String>,
    pub c: Vec<RawOption>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOption {
    pub o: Option<String>,
    pub r: Vec<RawReward>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawReward {
    pub t: Option<String>,
    pub v: Option<Value>,
    pub d: Option<Value>,
}
