use umaeval_core::{
    apply_unique_effects, evaluate_card, evaluate_cards, interpolate_levels, parse_condition,
    resolve_trigger, tier_window, CardEvents, CardHint, CardSnapshot, Choice, DistanceType,
    EffectEntry, EvalConfig, EvalError, LimitBreak, PlayProfile, Reward, RunningStyle, SkillData,
    StatKey, StoryEvent, SupportCardRecord, TierValues, UniqueBonus, UniqueOverlay,
};

macro_rules! trigger_case {
    ($name:ident, $condition:expr, $key:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let tree = parse_condition($condition).expect("parse condition");
            assert_eq!(resolve_trigger(&tree, $key), $expected);
        }
    };
}

trigger_case!(trigger_and_first, "running_style==1&distance_type==2", "running_style", 1);
trigger_case!(trigger_and_second, "running_style==1&distance_type==2", "distance_type", 2);
trigger_case!(trigger_missing_key, "running_style==1&distance_type==2", "unrelated_key", 0);
trigger_case!(trigger_second_alternative, "a==1@b==2", "b", 2);
trigger_case!(trigger_not_equal_ignored, "distance_type!=4", "distance_type", 0);
trigger_case!(trigger_spaced_atom, " distance_type == 4 ", "distance_type", 4);
trigger_case!(
    trigger_nested_mix,
    "phase>=2&order<=3@running_style==4&distance_type==1",
    "running_style",
    4
);

macro_rules! interpolation_case {
    ($name:ident, $input:expr, $expected:expr) => {
        #[test]
        fn $name() {
            assert_eq!(interpolate_levels(&$input), $expected.to_vec());
        }
    };
}

interpolation_case!(
    interpolation_gap_and_tail,
    [-1, -1, 10, -1, -1, 20, -1, -1, -1, -1, -1],
    [-1, -1, 10, 13, 16, 20, 20, 20, 20, 20, 20]
);
interpolation_case!(interpolation_all_unset, [-1; 11], [-1; 11]);
interpolation_case!(
    interpolation_full_table,
    [5, 5, 5, 5, 10, 10, 10, 10, 15, 15, 15],
    [5, 5, 5, 5, 10, 10, 10, 10, 15, 15, 15]
);
interpolation_case!(
    interpolation_two_gaps,
    [0, -1, -1, -1, 8, -1, 10, -1, -1, -1, 25],
    [0, 2, 4, 6, 8, 9, 10, 13, 17, 21, 25]
);

fn rewards(items: &[(&str, &str)]) -> Vec<Reward> {
    items
        .iter()
        .map(|(kind, value)| Reward::new(kind, value))
        .collect()
}

fn event(name: &str, choices: Vec<Vec<Reward>>) -> StoryEvent {
    StoryEvent {
        name: Some(name.to_string()),
        choices: choices
            .into_iter()
            .map(|rewards| Choice {
                option: None,
                rewards,
            })
            .collect(),
        history: Vec::new(),
    }
}

fn hint(skill_id: u32, condition: &str) -> CardHint {
    CardHint::SkillHint {
        skill_id,
        skill_data: Some(SkillData {
            id: skill_id,
            condition_1: Some(condition.to_string()),
            skill_name: Some(format!("skill {}", skill_id)),
            ..SkillData::default()
        }),
        hint_level: 1,
    }
}

fn sample_card() -> SupportCardRecord {
    let raw = [-1, -1, -1, -1, -1, -1, 10, -1, -1, -1, 20];
    let interpolated = interpolate_levels(&raw);
    let base = vec![
        EffectEntry {
            effect_type: 18,
            type_name: "Hint Frequency".to_string(),
            tiers: tier_window(3, &interpolated).expect("window"),
        },
        EffectEntry {
            effect_type: 17,
            type_name: "Hint Levels".to_string(),
            tiers: TierValues::from_array([1.0, 1.0, 2.0, 2.0, 2.0]),
        },
    ];
    let overlays = vec![UniqueOverlay {
        level_unlocked: Some(LimitBreak::Zero),
        effects: vec![UniqueBonus {
            effect_type: 18,
            type_name: Some("Hint Frequency".to_string()),
            value: 10.0,
        }],
    }];
    let effects = apply_unique_effects(&base, &overlays);
    SupportCardRecord {
        id: 30001,
        chara_id_card: 1001,
        card_chara_name: Some("Special Week".to_string()),
        rarity: 3,
        prefered_type: Some("Speed".to_string()),
        prefered_type_id: Some(0),
        effects,
        unique_effects: overlays,
        hints_table: vec![hint(1, "distance_type==1"), hint(2, "running_style==2")],
        hints_event_table: vec![hint(3, "")],
        all_events: Some(CardEvents {
            chain_events: vec![
                event(
                    "(❯) Chain 1",
                    vec![
                        rewards(&[("Speed", "+10"), ("di", ""), ("Speed", "+0")]),
                        rewards(&[("Energy", "+5")]),
                    ],
                ),
                event(
                    "(❯❯) Chain 2",
                    vec![
                        rewards(&[("Power", "+50"), ("ee", "")]),
                        rewards(&[("Skill Hint", "1"), ("Guts", "5/15")]),
                    ],
                ),
            ],
            dates: vec![event("Date", vec![rewards(&[("Bond", "+5"), ("Energy", "-10")])])],
            random_events: vec![event("Random", vec![rewards(&[("Speed", "+100")])])],
            special_events: Vec::new(),
        }),
    }
}

#[test]
fn evaluates_full_card() {
    let snapshot = CardSnapshot::new(vec![sample_card()]);
    let profile = PlayProfile::default()
        .with_distance(DistanceType::Sprint)
        .with_running_style(RunningStyle::FrontRunner);
    let result = evaluate_card(
        &snapshot,
        30001,
        LimitBreak::Max,
        &profile,
        &EvalConfig::default(),
    )
    .expect("card evaluates");

    // 20 compounded with the unique 10%: 1.2 * 1.1 = 1.32
    assert_eq!(result.card_bonus.get("Hint Frequency"), 32.0);
    assert_eq!(result.card_bonus.get("Hint Levels"), 2.0);
    assert_eq!(result.card_bonus.get("Race Bonus"), -1.0);

    let stats = result.events_stat_reward;
    // chain 1 picks energy (score 10) over the 5.0 expected speed
    assert_eq!(stats.get(StatKey::Energy), 5.0);
    assert_eq!(stats.get(StatKey::Speed), 0.0);
    // chain 2 avoids the chain-ending choice
    assert_eq!(stats.get(StatKey::Power), 0.0);
    assert_eq!(stats.get(StatKey::Guts), 10.0);
    assert_eq!(stats.get(StatKey::SkillHint), 1.0);
    // the date only loses energy and random events are not scored
    assert_eq!(stats.get(StatKey::Bond), 0.0);

    let hints = result.hint_stats;
    assert_eq!(hints.hints_from_events, 1.0);
    assert!((hints.useful_hint_rate - 2.0 / 3.0).abs() < 1e-12);
    assert!((hints.hint_frequency - 0.075 * 1.32).abs() < 1e-12);
    let expected_training = 67.0 * 0.075 * 1.32 * 2.0 * (2.0 / 3.0);
    assert!((hints.hints_from_training - expected_training).abs() < 1e-9);
    assert!((hints.total_hints - (1.0 + expected_training)).abs() < 1e-9);
}

#[test]
fn lower_limit_breaks_read_their_own_tier() {
    let snapshot = CardSnapshot::new(vec![sample_card()]);
    let result = evaluate_card(
        &snapshot,
        30001,
        LimitBreak::Zero,
        &PlayProfile::default(),
        &EvalConfig::default(),
    )
    .expect("card evaluates");
    // rank 6 is the first anchor: 10 compounded with 10%
    assert_eq!(result.card_bonus.get("Hint Frequency"), 21.0);
    assert_eq!(result.card_bonus.get("Hint Levels"), 1.0);
}

#[test]
fn missing_card_does_not_affect_others() {
    let snapshot = CardSnapshot::new(vec![sample_card()]);
    let results = evaluate_cards(
        &snapshot,
        &[42, 30001],
        LimitBreak::Max,
        &PlayProfile::default(),
        &EvalConfig::default(),
    );
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].1.as_ref().err(), Some(&EvalError::NotFound(42)));
    assert!(results[1].1.is_ok());
}

#[test]
fn card_without_events_has_zero_rewards() {
    let mut card = sample_card();
    card.all_events = None;
    card.hints_table.clear();
    card.hints_event_table.clear();
    let snapshot = CardSnapshot::new(vec![card]);
    let result = evaluate_card(
        &snapshot,
        30001,
        LimitBreak::Max,
        &PlayProfile::default(),
        &EvalConfig::default(),
    )
    .expect("card evaluates");
    assert!(result.events_stat_reward.is_zero());
    assert_eq!(result.hint_stats.useful_hint_rate, 0.0);
    assert_eq!(result.hint_stats.total_hints, 0.0);
}

#[test]
fn evaluation_result_serializes_with_stable_field_names() {
    let snapshot = CardSnapshot::new(vec![sample_card()]);
    let result = evaluate_card(
        &snapshot,
        30001,
        LimitBreak::Two,
        &PlayProfile::default(),
        &EvalConfig::default(),
    )
    .expect("card evaluates");
    let json = serde_json::to_value(&result).expect("serialize");
    assert_eq!(json["limit_break"], "2lb");
    assert_eq!(json["card_bonus"]["Hint Levels"], 2.0);
    assert!(json["events_stat_reward"]["Skill Hint"].is_number());
    assert!(json["hint_stats"]["total_hints"].is_number());
}
