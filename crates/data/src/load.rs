use crate::catalog::{build_support_cards, SkillIndex};
use crate::events::attach_events;
use crate::schema::{CatalogRows, RawEventData};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use umaeval_core::{CardSnapshot, EvalConfig};

pub fn load_catalog_rows(path: &Path) -> anyhow::Result<CatalogRows> {
    load_json(path)
}

/// Event pages keyed by card id. Keys are card ids written as strings.
pub fn load_event_payloads(path: &Path) -> anyhow::Result<BTreeMap<u32, RawEventData>> {
    let raw: BTreeMap<String, RawEventData> = load_json(path)?;
    let mut payloads = BTreeMap::new();
    for (key, payload) in raw {
        let id: u32 = key
            .trim()
            .parse()
            .with_context(|| format!("card id {key:?} in {}", path.display()))?;
        payloads.insert(id, payload);
    }
    Ok(payloads)
}

pub fn load_snapshot(path: &Path) -> anyhow::Result<CardSnapshot> {
    load_json(path)
}

/// Like [`load_snapshot`], but a missing file is an empty snapshot.
pub fn load_existing_snapshot(path: &Path) -> anyhow::Result<CardSnapshot> {
    if !path.exists() {
        return Ok(CardSnapshot::default());
    }
    load_snapshot(path)
}

pub fn write_snapshot(path: &Path, snapshot: &CardSnapshot) -> anyhow::Result<()> {
    write_json(path, snapshot)
}

pub fn load_eval_config(path: &Path) -> anyhow::Result<EvalConfig> {
    load_json(path)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildReport {
    pub kept: usize,
    pub built: usize,
    pub with_events: usize,
}

/// Builds a snapshot from catalog rows and optional event pages on top of an
/// existing one.
pub fn build_snapshot_files(
    catalog: &Path,
    events: Option<&Path>,
    existing: CardSnapshot,
) -> anyhow::Result<(CardSnapshot, BuildReport)> {
    let rows = load_catalog_rows(catalog)?;
    let kept = existing.len();
    let mut cards = build_support_cards(&rows, existing.into_cards());
    if let Some(path) = events {
        let payloads = load_event_payloads(path)?;
        cards = attach_events(cards, &payloads, &SkillIndex::from_catalog(&rows));
    }
    let report = BuildReport {
        kept,
        built: cards.len() - kept,
        with_events: cards.iter().filter(|card| card.all_events.is_some()).count(),
    };
    Ok((CardSnapshot::new(cards), report))
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(value)
        .with_context(|| format!("serialize {}", path.display()))?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
