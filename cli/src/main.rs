use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use encoding_rs::Encoding;
use npchelper_engine::api::{parse_roster, perform_targeted, roster_to_json, Outcome, RosterFormat};
use npchelper_engine::content::builtin_roster;
use npchelper_engine::{Dice, Request, Roster};
use std::{fs, path::PathBuf};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Args)]
struct RosterSource {
    /// Path to a roster file (.json, .yaml or .yml); takes precedence over --builtin
    #[arg(long)]
    roster: Option<PathBuf>,
    /// Name of a bundled roster
    #[arg(long, default_value = "avernus_party")]
    builtin: String,
}

#[derive(Subcommand)]
enum Cmd {
    /// Evaluate a dice expression such as 2d6+3 or 2d20kh1+5
    Roll {
        expr: String,
        /// RNG seed for determinism (OS entropy when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Resolve a check, save, attack or initiative for a character (or * for everyone)
    Act {
        /// Character name prefix, or * for every character in the roster
        character: String,
        /// e.g. `attack greatsword -pow 2 adv`
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true, trailing_var_arg = true)]
        command: Vec<String>,
        #[command(flatten)]
        source: RosterSource,
        /// RNG seed for determinism (OS entropy when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Print outcomes as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the characters in a roster
    List {
        #[command(flatten)]
        source: RosterSource,
    },
    /// Serialize a bundled roster to JSON (stdout)
    Dump {
        #[arg(long, default_value = "avernus_party")]
        builtin: String,
        /// Pretty-print JSON (`--pretty false` for one line)
        #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
        pretty: bool,
    },
}

#[derive(Parser)]
#[command(name = "npchelper")]
#[command(about = "Dice and combat resolution for tabletop NPCs")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn dice_for(seed: Option<u64>) -> Dice {
    match seed {
        Some(seed) => Dice::from_seed(seed),
        None => Dice::from_entropy(),
    }
}

/// Sheet exports sometimes carry a BOM; decode it away before parsing.
fn read_text_auto(path: &std::path::Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn load_source(source: &RosterSource) -> anyhow::Result<Roster> {
    match &source.roster {
        Some(path) => {
            let text = read_text_auto(path)?;
            parse_roster(&text, RosterFormat::from_path(path))
                .with_context(|| format!("invalid roster: {}", path.display()))
        }
        None => builtin_roster(&source.builtin),
    }
}

fn marker(outcome: &Outcome) -> &'static str {
    match (outcome.result.is_critical_hit, outcome.result.is_critical_miss) {
        (true, true) => " [CRIT] [FUMBLE]",
        (true, false) => " [CRIT]",
        (false, true) => " [FUMBLE]",
        (false, false) => "",
    }
}

fn print_outcome(outcome: &Outcome) {
    println!("{}{}", outcome.title, marker(outcome));
    for line in &outcome.result.narrative {
        println!("  {}", line);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "npchelper_engine=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Roll { expr, seed } => {
            let mut dice = dice_for(seed);
            let roll = dice.evaluate(&expr)?;
            println!("{}", roll);
        }
        Cmd::Act {
            character,
            command,
            source,
            seed,
            json,
        } => {
            let roster = load_source(&source)?;
            let request = Request::parse_tokens(command.as_slice())?;
            debug!(?request, "parsed request");
            let mut dice = dice_for(seed);

            let results = perform_targeted(&mut dice, &roster, &character, &request);
            let mut outcomes = Vec::new();
            let mut failures = 0;
            for result in results {
                match result {
                    Ok(outcome) => outcomes.push(outcome),
                    Err(e) => {
                        failures += 1;
                        eprintln!("Error: {}", e);
                    }
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&outcomes)?);
            } else {
                for outcome in &outcomes {
                    print_outcome(outcome);
                }
            }
            if outcomes.is_empty() && failures > 0 {
                bail!("nothing was resolved");
            }
        }
        Cmd::List { source } => {
            let roster = load_source(&source)?;
            for character in roster.iter() {
                println!("{} ({})", character.name, character.system);
            }
        }
        Cmd::Dump { builtin, pretty } => {
            let roster = builtin_roster(&builtin)?;
            println!("{}", roster_to_json(&roster, pretty)?);
        }
    }
    Ok(())
}
