use crate::{
    event_stat_rewards, evaluate_hints, extract_skill_hints, CardBonus, CardSnapshot, EvalConfig,
    EvalResult, HintEvaluation, LimitBreak, PlayProfile, StatKey, StatVector, SupportCardRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub card_id: u32,
    pub limit_break: LimitBreak,
    pub card_bonus: CardBonus,
    pub events_stat_reward: StatVector,
    pub hint_stats: HintEvaluation,
}

pub fn evaluate_record(
    card: &SupportCardRecord,
    limit_break: LimitBreak,
    profile: &PlayProfile,
    config: &EvalConfig,
) -> EvaluationResult {
    let card_bonus = CardBonus::at_tier(&card.effects, &card.unique_effects, limit_break);
    let events_stat_reward = card
        .all_events
        .as_ref()
        .map(|events| event_stat_rewards(events, config))
        .unwrap_or_default();
    let hints = extract_skill_hints(card.hints());
    let hint_stats = evaluate_hints(
        &card_bonus,
        &hints,
        events_stat_reward.get(StatKey::SkillHint),
        profile,
        config,
    );
    tracing::debug!(
        card = card.id,
        name = card.display_name(),
        total_hints = hint_stats.total_hints,
        "evaluated card"
    );
    EvaluationResult {
        card_id: card.id,
        limit_break,
        card_bonus,
        events_stat_reward,
        hint_stats,
    }
}

pub fn evaluate_card(
    snapshot: &CardSnapshot,
    card_id: u32,
    limit_break: LimitBreak,
    profile: &PlayProfile,
    config: &EvalConfig,
) -> EvalResult<EvaluationResult> {
    let card = snapshot.find(card_id)?;
    Ok(evaluate_record(card, limit_break, profile, config))
}

/// Evaluates each requested card on its own; a missing id only fails its own
/// entry.
pub fn evaluate_cards(
    snapshot: &CardSnapshot,
    card_ids: &[u32],
    limit_break: LimitBreak,
    profile: &PlayProfile,
    config: &EvalConfig,
) -> Vec<(u32, EvalResult<EvaluationResult>)> {
    card_ids
        .iter()
        .map(|id| {
            (
                *id,
                evaluate_card(snapshot, *id, limit_break, profile, config),
            )
        })
        .collect()
}
