use anyhow::{bail, Context};
use meldsort_core::{
    detect_matches, detect_sequences, random_hand, BudgetPolicy, Card, GroupingResult, Hand,
    Optimizer, SearchConfig, SearchStats, Strategy,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SEED: u64 = 0xC0FFEE;
const DEFAULT_HAND: &[u8] = &[26, 1, 17, 29, 0, 15, 42, 3, 13, 2, 16];

const USAGE: &str = "\
usage: meldsort [hand] [method] [search] [output]

hand (default: a fixed 11-card sample):
  --ids 26,1,17,...        card ids, suit * 13 + rank
  --cards AS,2S,10H,...    card labels
  --random N [--seed S]    N cards from a seeded shuffle

method:
  --method sequences|matches|optimal   (default optimal)

search (optimal only):
  --config PATH            SearchConfig JSON, flags below override it
  --strategy exhaustive|greedy
  --max-nodes N
  --time-limit-ms N
  --strict                 fail instead of falling back when the budget runs out

output:
  --json                   print JSON instead of text
  --out PATH               also write the JSON report to PATH

logging is controlled by RUST_LOG, e.g. RUST_LOG=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SortMethod {
    Sequences,
    Matches,
    Optimal,
}

impl SortMethod {
    fn from_id(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sequences" | "sequence" | "runs" | "straight" => Some(Self::Sequences),
            "matches" | "match" | "sets" => Some(Self::Matches),
            "optimal" | "best" => Some(Self::Optimal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HandSource {
    Ids(Vec<u8>),
    Labels(String),
    Random(usize),
}

#[derive(Debug, Clone)]
struct CliOptions {
    source: HandSource,
    seed: u64,
    method: SortMethod,
    config_path: Option<PathBuf>,
    strategy: Option<Strategy>,
    max_nodes: Option<u64>,
    time_limit_ms: Option<u64>,
    strict: bool,
    json: bool,
    out: Option<PathBuf>,
    help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            source: HandSource::Ids(DEFAULT_HAND.to_vec()),
            seed: DEFAULT_SEED,
            method: SortMethod::Optimal,
            config_path: None,
            strategy: None,
            max_nodes: None,
            time_limit_ms: None,
            strict: false,
            json: false,
            out: None,
            help: false,
        }
    }
}

fn parse_cli_options(args: &[String]) -> anyhow::Result<CliOptions> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        match flag {
            "--help" | "-h" => options.help = true,
            "--json" => options.json = true,
            "--strict" => options.strict = true,
            "--ids" => {
                options.source = HandSource::Ids(parse_ids(value_of(args, &mut idx)?)?);
            }
            "--cards" => {
                options.source = HandSource::Labels(value_of(args, &mut idx)?.to_string());
            }
            "--random" => options.source = HandSource::Random(parse_number(args, &mut idx)?),
            "--seed" => options.seed = parse_number(args, &mut idx)?,
            "--method" | "-m" => {
                let value = value_of(args, &mut idx)?;
                options.method = SortMethod::from_id(value)
                    .with_context(|| format!("unknown method '{value}'"))?;
            }
            "--strategy" => {
                let value = value_of(args, &mut idx)?;
                options.strategy = Some(
                    Strategy::from_id(value)
                        .with_context(|| format!("unknown strategy '{value}'"))?,
                );
            }
            "--max-nodes" => options.max_nodes = Some(parse_number(args, &mut idx)?),
            "--time-limit-ms" => options.time_limit_ms = Some(parse_number(args, &mut idx)?),
            "--config" => options.config_path = Some(PathBuf::from(value_of(args, &mut idx)?)),
            "--out" | "-o" => options.out = Some(PathBuf::from(value_of(args, &mut idx)?)),
            other => bail!("unknown argument '{other}' (see --help)"),
        }
        idx += 1;
    }
    Ok(options)
}

fn value_of<'a>(args: &'a [String], idx: &mut usize) -> anyhow::Result<&'a str> {
    let flag = &args[*idx];
    *idx += 1;
    args.get(*idx)
        .map(String::as_str)
        .with_context(|| format!("{flag} needs a value"))
}

fn parse_number<T>(args: &[String], idx: &mut usize) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let flag = args[*idx].clone();
    let value = value_of(args, idx)?;
    value
        .parse::<T>()
        .with_context(|| format!("{flag}: '{value}' is not a number"))
}

fn parse_ids(value: &str) -> anyhow::Result<Vec<u8>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<u8>()
                .with_context(|| format!("'{item}' is not a card id"))
        })
        .collect()
}

fn build_hand(options: &CliOptions) -> anyhow::Result<Hand> {
    let hand = match &options.source {
        HandSource::Ids(ids) => Hand::from_ids(ids)?,
        HandSource::Labels(labels) => Hand::parse(labels)?,
        HandSource::Random(size) => random_hand(options.seed, *size)?,
    };
    Ok(hand)
}

fn build_config(options: &CliOptions) -> anyhow::Result<SearchConfig> {
    let mut config: SearchConfig = match &options.config_path {
        Some(path) => load_json(path)?,
        None => SearchConfig::default(),
    };
    if let Some(strategy) = options.strategy {
        config.strategy = strategy;
    }
    if options.max_nodes.is_some() {
        config.max_nodes = options.max_nodes;
    }
    if options.time_limit_ms.is_some() {
        config.time_limit_ms = options.time_limit_ms;
    }
    if options.strict {
        config.on_budget = BudgetPolicy::Fail;
    }
    Ok(config)
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[derive(Debug, Serialize)]
struct SortReport {
    method: SortMethod,
    hand: Vec<Card>,
    arranged: Vec<Card>,
    score: u32,
    result: GroupingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<SearchStats>,
}

impl SortReport {
    fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!("hand:     {}", labels(&self.hand)),
            format!("arranged: {}", labels(&self.arranged)),
            self.result.to_text_report(),
        ];
        if let Some(stats) = &self.search {
            lines.push(stats.summary());
        }
        lines.join("\n")
    }
}

fn labels(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn sort_hand(hand: &Hand, method: SortMethod, config: SearchConfig) -> anyhow::Result<SortReport> {
    let (result, search) = match method {
        SortMethod::Sequences => (GroupingResult::from(detect_sequences(hand)), None),
        SortMethod::Matches => (GroupingResult::from(detect_matches(hand)), None),
        SortMethod::Optimal => {
            let outcome = Optimizer::new(config).optimize(hand)?;
            (outcome.result, Some(outcome.stats))
        }
    };
    Ok(SortReport {
        method,
        hand: hand.cards().to_vec(),
        arranged: result.arranged(),
        score: result.score(),
        result,
        search,
    })
}

fn write_json(path: &Path, report: &SortReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(report)?;
    fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let options = parse_cli_options(args)?;
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }
    let hand = build_hand(&options)?;
    let config = build_config(&options)?;
    log::info!("sorting {} cards with {:?}", hand.len(), options.method);

    let report = sort_hand(&hand, options.method, config)?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.to_text_report());
    }
    if let Some(path) = &options.out {
        write_json(path, &report)?;
        log::info!("report written to {}", path.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn defaults_sort_the_sample_hand_optimally() {
        let options = parse_cli_options(&[]).unwrap();
        assert_eq!(options.method, SortMethod::Optimal);
        assert_eq!(options.source, HandSource::Ids(DEFAULT_HAND.to_vec()));
        let hand = build_hand(&options).unwrap();
        let report = sort_hand(&hand, options.method, SearchConfig::default()).unwrap();
        assert_eq!(report.score, 30);
        assert_eq!(report.arranged.len(), hand.len());
    }

    #[test]
    fn parses_hand_sources() {
        let options = parse_cli_options(&args(&["--ids", "0, 1,2"])).unwrap();
        assert_eq!(options.source, HandSource::Ids(vec![0, 1, 2]));

        let options = parse_cli_options(&args(&["--cards", "AS,2S,3S"])).unwrap();
        assert_eq!(build_hand(&options).unwrap().ids(), vec![0, 1, 2]);

        let options = parse_cli_options(&args(&["--random", "13", "--seed", "9"])).unwrap();
        assert_eq!(options.source, HandSource::Random(13));
        assert_eq!(options.seed, 9);
        assert_eq!(build_hand(&options).unwrap().len(), 13);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_cli_options(&args(&["--frobnicate"])).is_err());
        assert!(parse_cli_options(&args(&["--seed"])).is_err());
        assert!(parse_cli_options(&args(&["--max-nodes", "lots"])).is_err());
        assert!(parse_cli_options(&args(&["--method", "alphabetical"])).is_err());
        assert!(parse_cli_options(&args(&["--ids", "1,x"])).is_err());

        let options = parse_cli_options(&args(&["--ids", "1,1"])).unwrap();
        assert!(build_hand(&options).is_err());
    }

    #[test]
    fn flags_override_the_config() {
        let options = parse_cli_options(&args(&[
            "--strategy",
            "greedy",
            "--max-nodes",
            "50",
            "--strict",
        ]))
        .unwrap();
        let config = build_config(&options).unwrap();
        assert_eq!(config.strategy, Strategy::Greedy);
        assert_eq!(config.max_nodes, Some(50));
        assert_eq!(config.time_limit_ms, None);
        assert_eq!(config.on_budget, BudgetPolicy::Fail);
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = std::env::temp_dir().join(format!("meldsort-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("search.json");
        fs::write(&path, r#"{ "strategy": "greedy", "time_limit_ms": 250 }"#).unwrap();

        let options = parse_cli_options(&args(&["--config", path.to_str().unwrap()])).unwrap();
        let config = build_config(&options).unwrap();
        assert_eq!(config.strategy, Strategy::Greedy);
        assert_eq!(config.time_limit_ms, Some(250));
        assert_eq!(config.max_nodes, None);

        let missing = parse_cli_options(&args(&["--config", "/nonexistent/search.json"])).unwrap();
        assert!(build_config(&missing).is_err());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn detector_methods_skip_search_stats() {
        let hand = Hand::parse("5S 6S 7S 7H 7C").unwrap();
        let report = sort_hand(&hand, SortMethod::Matches, SearchConfig::default()).unwrap();
        assert!(report.search.is_none());
        assert_eq!(labels(&report.arranged), "7S 7H 7C 5S 6S");
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"method\":\"matches\""));
        assert!(!json.contains("\"search\""));
    }

    #[test]
    fn writes_json_report() {
        let dir = std::env::temp_dir().join(format!("meldsort-out-{}", std::process::id()));
        let path = dir.join("nested").join("report.json");
        let hand = Hand::parse("5S 6S 7S").unwrap();
        let report = sort_hand(&hand, SortMethod::Optimal, SearchConfig::default()).unwrap();
        write_json(&path, &report).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        assert!(body.contains("\"score\": 18"));
        let _ = fs::remove_dir_all(&dir);
    }
}
