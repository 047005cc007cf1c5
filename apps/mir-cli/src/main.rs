mod config;
mod history;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use history::{HistoryLog, HistoryRecord};
use intent_parser::{
    create_router, extract, normalize, ConsoleOperator, DispatchOutcome, IntentRouter, OperatorIo,
};
use robot_client::{Catalog, MirHttpClient, MockRobot, RobotClient};

type Router = IntentRouter<Box<dyn RobotClient>>;

#[derive(Parser, Debug)]
#[command(
    name = "mir",
    version,
    about = "Voice command front end for MiR robots",
    disable_help_subcommand = true
)]
struct Cli {
    /// Use the in-memory mock robot instead of the MiR REST API
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    mock: bool,

    /// Fleet YAML (robots, auth, language)
    #[arg(long, global = true)]
    fleet: Option<PathBuf>,

    /// Intent YAML (thresholds, vocabulary, lexicon)
    #[arg(long, global = true)]
    intent: Option<PathBuf>,

    /// Robot to start on, by name or alias
    #[arg(long, global = true)]
    robot: Option<String>,

    /// Append every resolved phrase to this JSONL file
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read phrases from stdin and act on each one
    Listen,
    /// Act on a single phrase
    Say { phrase: String },
    /// Resolve a phrase and print the intent as JSON without acting on it
    Parse { phrase: String },
    /// List the active robot's positions
    Positions,
    /// List the active robot's missions
    Missions,
    /// Send the robot to a position by exact name
    Goto { position: String },
    /// Queue a mission by exact name
    RunMission { mission: String },
    /// Show which verbs of a phrase are synonyms of a word
    Synonyms {
        phrase: String,
        #[arg(long, default_value = "go")]
        word: String,
    },
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Listen => listen(&cli),
        Commands::Say { phrase } => say(&cli, phrase),
        Commands::Parse { phrase } => parse(&cli, phrase),
        Commands::Positions => {
            let mut client = connect(&cli)?;
            let catalog = client.list_positions()?;
            print_catalog(&catalog);
            Ok(())
        }
        Commands::Missions => {
            let mut client = connect(&cli)?;
            let catalog = client.list_missions()?;
            print_catalog(&catalog);
            Ok(())
        }
        Commands::Goto { position } => goto(&cli, position),
        Commands::RunMission { mission } => run_mission(&cli, mission),
        Commands::Synonyms { phrase, word } => synonyms(&cli, phrase, word),
    }
}

fn setup_tracing() {
    // Best-effort; avoid panics if already set
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn connect(cli: &Cli) -> Result<Box<dyn RobotClient>> {
    let fleet = config::fleet(cli.fleet.as_deref())?;
    let mut client: Box<dyn RobotClient> = if cli.mock {
        info!("Using mock robot");
        Box::new(MockRobot::demo_with(&fleet))
    } else {
        Box::new(MirHttpClient::new(fleet).context("creating MiR client")?)
    };
    if let Some(name) = &cli.robot {
        client
            .select_robot(name)
            .with_context(|| format!("selecting robot '{}'", name))?;
    }
    info!("Active robot: {}", client.active_robot());
    Ok(client)
}

fn router(cli: &Cli) -> Result<Router> {
    let intent = config::intent(cli.intent.as_deref())?;
    let client = connect(cli)?;
    create_router(&intent, client).context("loading language model")
}

fn history(cli: &Cli) -> Result<Option<HistoryLog>> {
    cli.history.as_deref().map(HistoryLog::open).transpose()
}

/// Resolve and dispatch one phrase, print the outcome and record it.
fn handle(
    router: &mut Router,
    phrase: &str,
    operator: &mut dyn OperatorIo,
    log: &mut Option<HistoryLog>,
) -> Result<DispatchOutcome> {
    let resolution = router.resolve(phrase);
    let outcome = router.dispatch(&resolution.result, operator);
    operator.tell(&outcome.to_string())?;
    if let Some(log) = log.as_mut() {
        let record = HistoryRecord::new(
            &resolution.robot,
            &resolution.phrase,
            &resolution.result,
            Some(&outcome),
        );
        if let Err(e) = log.append(&record) {
            warn!("history write failed: {:#}", e);
        }
    }
    Ok(outcome)
}

fn listen(cli: &Cli) -> Result<()> {
    let mut router = router(cli)?;
    let mut log = history(cli)?;
    // phrases and selections share one stdin lock
    let mut operator = ConsoleOperator::stdio();
    operator.tell("Say a command (empty line to skip, 'quit' to stop)")?;

    while let Some(line) = operator.ask("phrase> ")? {
        let phrase = line.trim();
        if phrase.is_empty() {
            continue;
        }
        if matches!(phrase, "quit" | "exit") {
            break;
        }
        handle(&mut router, phrase, &mut operator, &mut log)?;
    }
    Ok(())
}

fn say(cli: &Cli, phrase: &str) -> Result<()> {
    let mut router = router(cli)?;
    let mut log = history(cli)?;
    let mut operator = ConsoleOperator::stdio();
    let outcome = handle(&mut router, phrase, &mut operator, &mut log)?;
    if !outcome.is_dispatched() {
        std::process::exit(2);
    }
    Ok(())
}

fn parse(cli: &Cli, phrase: &str) -> Result<()> {
    let mut router = router(cli)?;
    let resolution = router.resolve(phrase);
    println!("{}", serde_json::to_string_pretty(&resolution.result)?);
    if let Some(mut log) = history(cli)? {
        log.append(&HistoryRecord::new(
            &resolution.robot,
            &resolution.phrase,
            &resolution.result,
            None,
        ))?;
    }
    Ok(())
}

fn goto(cli: &Cli, position: &str) -> Result<()> {
    let mut client = connect(cli)?;
    client.refresh().context("listing catalogs")?;
    client
        .navigate_to(position)
        .with_context(|| format!("sending robot to '{}'", position))?;
    let outcome = DispatchOutcome::Navigated {
        position: position.to_string(),
    };
    println!("{}", outcome);
    Ok(())
}

fn run_mission(cli: &Cli, mission: &str) -> Result<()> {
    let mut client = connect(cli)?;
    client.refresh().context("listing catalogs")?;
    client
        .execute_mission(mission)
        .with_context(|| format!("queueing mission '{}'", mission))?;
    let outcome = DispatchOutcome::MissionQueued {
        mission: mission.to_string(),
    };
    println!("{}", outcome);
    Ok(())
}

fn synonyms(cli: &Cli, phrase: &str, word: &str) -> Result<()> {
    // Only the model is needed; the mock keeps this offline.
    let intent = config::intent(cli.intent.as_deref())?;
    let router = create_router(&intent, MockRobot::demo()).context("loading language model")?;
    let extraction = extract(router.model(), &normalize(phrase));
    let hits = router.classifier().synonyms(&extraction.verbs, word);
    if hits.is_empty() {
        println!("no synonyms of '{}' in '{}'", word, phrase);
    }
    for hit in hits {
        println!("{}\t{:.2}", hit.word, hit.similarity);
    }
    Ok(())
}

fn print_catalog(catalog: &Catalog) {
    for entry in catalog.entries() {
        match entry.type_id {
            Some(type_id) => println!("{}\t{}\t{}", entry.name, entry.guid, type_id),
            None => println!("{}\t{}", entry.name, entry.guid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intent_parser::ScriptedOperator;

    fn mock_router() -> Router {
        let client: Box<dyn RobotClient> = Box::new(MockRobot::demo());
        create_router(&Default::default(), client).unwrap()
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "mir",
            "say",
            "go to pos1",
            "--mock",
            "--robot",
            "batman",
        ])
        .unwrap();
        assert!(cli.mock);
        assert_eq!(cli.robot.as_deref(), Some("batman"));
        assert!(matches!(cli.command, Commands::Say { ref phrase } if phrase == "go to pos1"));
    }

    #[test]
    fn test_synonyms_default_word() {
        let cli = Cli::try_parse_from(["mir", "synonyms", "move there"]).unwrap();
        assert!(matches!(cli.command, Commands::Synonyms { ref word, .. } if word == "go"));
    }

    #[test]
    fn test_connect_mock_selects_robot() {
        let cli = Cli::try_parse_from(["mir", "--mock", "--robot", "batman", "positions"]).unwrap();
        let client = connect(&cli).unwrap();
        assert_eq!(client.active_robot(), "mir250");

        let cli = Cli::try_parse_from(["mir", "--mock", "--robot", "joker", "positions"]).unwrap();
        assert!(connect(&cli).is_err());
    }

    #[test]
    fn test_handle_records_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.jsonl");
        let mut log = Some(HistoryLog::open(&path).unwrap());
        let mut router = mock_router();
        let mut operator = ScriptedOperator::new(Vec::<String>::new());

        let outcome = handle(&mut router, "go to pos1", &mut operator, &mut log).unwrap();
        assert!(outcome.is_dispatched());
        let outcome = handle(&mut router, "please dance", &mut operator, &mut log).unwrap();
        assert_eq!(outcome, DispatchOutcome::NoInstruction);
        drop(log);

        let raw = std::fs::read_to_string(&path).unwrap();
        let first: serde_json::Value = serde_json::from_str(raw.lines().next().unwrap()).unwrap();
        assert_eq!(first["result"]["instruction"], "go");
        assert_eq!(first["robot"], "mir200");
        assert_eq!(raw.lines().count(), 2);
        assert_eq!(
            operator.transcript().last().map(String::as_str),
            Some("no instruction found: instruction not recognized")
        );
    }
}
