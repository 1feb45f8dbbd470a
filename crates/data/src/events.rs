use crate::catalog::SkillIndex;
use crate::schema::{RawEvent, RawEventData, RawOption, RawReward};
use serde_json::Value;
use std::collections::BTreeMap;
use umaeval_core::{CardEvents, CardHint, Choice, HistoryEvent, Reward, StoryEvent, SupportCardRecord};

pub const SKILL_CHOICE: &str = "Skill Choice";
const SKILL_CHOICE_CODE: &str = "sr";
const SKILL_HINT_LABEL: &str = "Skill Hint";

/// Label for an event page reward code; unknown codes pass through.
pub fn reward_label(code: &str) -> &str {
    match code {
        "sp" => "Speed",
        "st" => "Stamina",
        "po" => "Power",
        "gu" => "Guts",
        "in" => "Intelligence",
        "en" => "Energy",
        "sk" => SKILL_HINT_LABEL,
        "sr" => SKILL_CHOICE,
        "bo" => "Bond",
        "pt" => "Potential",
        "mo" => "Mood",
        other => other,
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn decode_reward(raw: &RawReward, out: &mut Vec<Reward>) {
    let code = raw.t.as_deref().unwrap_or_default();
    if code == SKILL_CHOICE_CODE {
        if let Some(Value::Array(choices)) = &raw.d {
            for choice in choices {
                out.push(Reward {
                    reward_type: SKILL_CHOICE.to_string(),
                    value: choice.get("v").and_then(value_text),
                    detail: choice.get("d").cloned(),
                });
            }
            return;
        }
    }
    out.push(Reward {
        reward_type: reward_label(code).to_string(),
        value: raw.v.as_ref().and_then(value_text),
        detail: raw.d.clone(),
    });
}

fn decode_choice(raw: &RawOption) -> Choice {
    let mut rewards = Vec::with_capacity(raw.r.len());
    for reward in &raw.r {
        decode_reward(reward, &mut rewards);
    }
    Choice {
        option: raw.o.clone(),
        rewards,
    }
}

pub fn decode_event(raw: &RawEvent) -> StoryEvent {
    StoryEvent {
        name: raw.n.clone(),
        choices: raw.c.iter().map(decode_choice).collect(),
        history: raw
            .history
            .iter()
            .map(|entry| HistoryEvent {
                period: entry.period.clone(),
                name: entry.data.n.clone(),
                choices: entry.data.c.iter().map(decode_choice).collect(),
            })
            .collect(),
    }
}

fn decode_events(events: &[RawEvent]) -> Vec<StoryEvent> {
    events.iter().map(decode_event).collect()
}

/// Decodes one card's event page. Arrow events are the card's chain.
pub fn decode_card_events(raw: &RawEventData) -> CardEvents {
    CardEvents {
        dates: decode_events(&raw.dates),
        chain_events: decode_events(&raw.arrows),
        random_events: decode_events(&raw.random),
        special_events: decode_events(&raw.special),
    }
}

fn detail_skill_id(detail: &Value) -> Option<u32> {
    match detail {
        Value::Number(number) => number.as_u64().and_then(|id| u32::try_from(id).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Skill hints handed out by events, one per skill, in event order.
pub fn extract_event_hints(events: &CardEvents, skills: &SkillIndex) -> Vec<CardHint> {
    let mut hints: Vec<CardHint> = Vec::new();
    let choices = events.all().flat_map(|event| {
        event
            .choices
            .iter()
            .chain(event.history.iter().flat_map(|entry| entry.choices.iter()))
    });
    for reward in choices.flat_map(|choice| choice.rewards.iter()) {
        if reward.reward_type != SKILL_HINT_LABEL {
            continue;
        }
        let Some(skill_id) = reward.detail.as_ref().and_then(detail_skill_id) else {
            continue;
        };
        let Some(skill) = skills.get(skill_id) else {
            tracing::debug!(skill = skill_id, "event hint for unknown skill");
            continue;
        };
        if hints.iter().any(|hint| hint.skill_id() == Some(skill_id)) {
            continue;
        }
        hints.push(CardHint::SkillHint {
            skill_id,
            skill_data: Some(skill.clone()),
            hint_level: 1,
        });
    }
    hints
}

/// Fills in events and event hints for cards that have none yet.
pub fn attach_events(
    cards: Vec<SupportCardRecord>,
    payloads: &BTreeMap<u32, RawEventData>,
    skills: &SkillIndex,
) -> Vec<SupportCardRecord> {
    cards
        .into_iter()
        .map(|mut card| {
            if card.all_events.is_some() {
                return card;
            }
            match payloads.get(&card.id) {
                Some(raw) => {
                    let events = decode_card_events(raw);
                    card.hints_event_table = extract_event_hints(&events, skills);
                    tracing::debug!(
                        card = card.id,
                        events = events.all().count(),
                        hints = card.hints_event_table.len(),
                        "attached events"
                    );
                    card.all_events = Some(events);
                }
                None => tracing::warn!(card = card.id, "no event page for card"),
            }
            card
        })
        .collect()
}
