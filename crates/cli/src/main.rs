use anyhow::Context;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use umaeval_core::{
    evaluate_cards, DistanceType, EvalConfig, EvaluationResult, LimitBreak, PlayProfile,
    RunningStyle,
};
use umaeval_data::{
    build_snapshot_files, load_eval_config, load_existing_snapshot, load_snapshot, write_snapshot,
};

const USAGE: &str = "\
usage:
  umaeval build --catalog <rows.json> [--events <events.json>] --output <snapshot.json> [--fresh]
  umaeval eval --data <snapshot.json> [--card <id> ...] [--lb 0-4|0lb..mlb]
               [--distance sprint,mile,medium,long] [--style front,pace,late,end]
               [--optional-races N] [--config <config.json>]";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Build(BuildOptions),
    Eval(EvalOptions),
    Help,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct BuildOptions {
    catalog: Option<PathBuf>,
    events: Option<PathBuf>,
    output: Option<PathBuf>,
    fresh: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct EvalOptions {
    data: Option<PathBuf>,
    cards: Vec<u32>,
    limit_break: LimitBreak,
    profile: PlayProfile,
    config: Option<PathBuf>,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            data: None,
            cards: Vec::new(),
            limit_break: LimitBreak::Max,
            profile: PlayProfile::default(),
            config: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum EvalEntry {
    Evaluated(EvaluationResult),
    Failed { card_id: u32, error: String },
}

fn flag_value<'a>(args: &'a [String], idx: usize, flag: &str) -> Result<&'a str, String> {
    args.get(idx + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} needs a value"))
}

fn parse_limit_break(value: &str) -> Result<LimitBreak, String> {
    value
        .parse::<usize>()
        .ok()
        .and_then(LimitBreak::from_index)
        .or_else(|| LimitBreak::from_key(value))
        .ok_or_else(|| format!("unknown limit break {value:?}"))
}

fn parse_list<T>(value: &str, parse: fn(&str) -> Option<T>, what: &str) -> Result<Vec<T>, String> {
    value
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| parse(item).ok_or_else(|| format!("unknown {what} {item:?}")))
        .collect()
}

fn parse_build_options(args: &[String]) -> Result<BuildOptions, String> {
    let mut options = BuildOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--catalog" => {
                options.catalog = Some(PathBuf::from(flag_value(args, idx, "--catalog")?));
                idx += 1;
            }
            "--events" => {
                options.events = Some(PathBuf::from(flag_value(args, idx, "--events")?));
                idx += 1;
            }
            "--output" | "-o" => {
                options.output = Some(PathBuf::from(flag_value(args, idx, "--output")?));
                idx += 1;
            }
            "--fresh" => options.fresh = true,
            other => return Err(format!("unknown build option {other:?}")),
        }
        idx += 1;
    }
    Ok(options)
}

fn parse_eval_options(args: &[String]) -> Result<EvalOptions, String> {
    let mut options = EvalOptions::default();
    let mut distances: Option<Vec<DistanceType>> = None;
    let mut styles: Option<Vec<RunningStyle>> = None;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--data" => {
                options.data = Some(PathBuf::from(flag_value(args, idx, "--data")?));
                idx += 1;
            }
            "--card" => {
                let value = flag_value(args, idx, "--card")?;
                for id in value.split(',') {
                    let id = id
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| format!("bad card id {id:?}"))?;
                    options.cards.push(id);
                }
                idx += 1;
            }
            "--lb" => {
                options.limit_break = parse_limit_break(flag_value(args, idx, "--lb")?)?;
                idx += 1;
            }
            "--distance" => {
                let value = flag_value(args, idx, "--distance")?;
                distances = Some(parse_list(value, DistanceType::from_keyword, "distance")?);
                idx += 1;
            }
            "--style" => {
                let value = flag_value(args, idx, "--style")?;
                styles = Some(parse_list(value, RunningStyle::from_keyword, "running style")?);
                idx += 1;
            }
            "--optional-races" => {
                let value = flag_value(args, idx, "--optional-races")?;
                let races = value
                    .parse::<u32>()
                    .map_err(|_| format!("bad race count {value:?}"))?;
                options.profile = options.profile.with_optional_races(races);
                idx += 1;
            }
            "--config" => {
                options.config = Some(PathBuf::from(flag_value(args, idx, "--config")?));
                idx += 1;
            }
            other => return Err(format!("unknown eval option {other:?}")),
        }
        idx += 1;
    }
    // no filter means every category is in play
    for distance in distances.unwrap_or_else(|| DistanceType::ALL.to_vec()) {
        options.profile = options.profile.with_distance(distance);
    }
    for style in styles.unwrap_or_else(|| RunningStyle::ALL.to_vec()) {
        options.profile = options.profile.with_running_style(style);
    }
    Ok(options)
}

fn parse_cli_options(args: &[String]) -> Result<Command, String> {
    let Some(command) = args.first() else {
        return Ok(Command::Help);
    };
    match command.as_str() {
        "build" => parse_build_options(&args[1..]).map(Command::Build),
        "eval" => parse_eval_options(&args[1..]).map(Command::Eval),
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => Err(format!("unknown command {other:?}")),
    }
}

fn run_build(options: BuildOptions) -> anyhow::Result<()> {
    let catalog = options.catalog.context("build needs --catalog")?;
    let output = options.output.context("build needs --output")?;
    let existing = if options.fresh {
        Default::default()
    } else {
        load_existing_snapshot(&output)?
    };
    let (snapshot, report) = build_snapshot_files(&catalog, options.events.as_deref(), existing)?;
    write_snapshot(&output, &snapshot)?;
    tracing::info!(
        kept = report.kept,
        built = report.built,
        with_events = report.with_events,
        output = %output.display(),
        "snapshot written"
    );
    Ok(())
}

fn run_eval(options: EvalOptions) -> anyhow::Result<()> {
    let data = options.data.context("eval needs --data")?;
    let snapshot = load_snapshot(&data)?;
    let config = match &options.config {
        Some(path) => load_eval_config(path)?,
        None => EvalConfig::default(),
    };
    let cards = if options.cards.is_empty() {
        snapshot.ids()
    } else {
        options.cards
    };
    tracing::info!(
        cards = cards.len(),
        limit_break = options.limit_break.key(),
        "evaluating"
    );
    let entries: Vec<EvalEntry> = evaluate_cards(
        &snapshot,
        &cards,
        options.limit_break,
        &options.profile,
        &config,
    )
    .into_iter()
    .map(|(card_id, result)| match result {
        Ok(result) => EvalEntry::Evaluated(result),
        Err(err) => {
            tracing::warn!(card = card_id, "{}", err);
            EvalEntry::Failed {
                card_id,
                error: err.to_string(),
            }
        }
    })
    .collect();
    let rendered = serde_json::to_string_pretty(&entries).context("serialize results")?;
    println!("{rendered}");
    Ok(())
}

/// `RUST_LOG` directives when set and valid, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_cli_options(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            std::process::exit(1);
        }
    };
    let outcome = match command {
        Command::Build(options) => run_build(options),
        Command::Eval(options) => run_eval(options),
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
    };
    if let Err(err) = outcome {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
