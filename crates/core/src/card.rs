use crate::{CardEvents, CardHint, EffectEntry, EvalError, EvalResult, UniqueOverlay};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportCardRecord {
    pub id: u32,
    #[serde(default)]
    pub chara_id_card: i64,
    #[serde(default)]
    pub card_chara_name: Option<String>,
    pub rarity: u8,
    #[serde(default)]
    pub prefered_type: Option<String>,
    #[serde(default)]
    pub prefered_type_id: Option<i64>,
    /// Base effects with unique bonuses already stacked in.
    #[serde(default)]
    pub effects: Vec<EffectEntry>,
    #[serde(default)]
    pub unique_effects: Vec<UniqueOverlay>,
    #[serde(default)]
    pub hints_table: Vec<CardHint>,
    #[serde(default)]
    pub hints_event_table: Vec<CardHint>,
    /// `None` until event pages have been merged in.
    #[serde(default)]
    pub all_events: Option<CardEvents>,
}

impl SupportCardRecord {
    pub fn display_name(&self) -> &str {
        self.card_chara_name.as_deref().unwrap_or("Unknown")
    }

    pub fn hints(&self) -> impl Iterator<Item = &CardHint> + '_ {
        self.hints_table.iter().chain(self.hints_event_table.iter())
    }
}

/// Read-only set of card records one evaluation run works against.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardSnapshot {
    cards: Vec<SupportCardRecord>,
}

impl CardSnapshot {
    pub fn new(cards: Vec<SupportCardRecord>) -> Self {
        Self { cards }
    }

    pub fn find(&self, id: u32) -> EvalResult<&SupportCardRecord> {
        self.cards
            .iter()
            .find(|card| card.id == id)
            .ok_or(EvalError::NotFound(id))
    }

    pub fn contains(&self, id: u32) -> bool {
        self.cards.iter().any(|card| card.id == id)
    }

    pub fn cards(&self) -> &[SupportCardRecord] {
        &self.cards
    }

    pub fn ids(&self) -> Vec<u32> {
        self.cards.iter().map(|card| card.id).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn into_cards(self) -> Vec<SupportCardRecord> {
        self.cards
    }
}
