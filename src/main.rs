#![warn(rust_2018_idioms)]

use clap::{Parser, Subcommand};
use log::{error, LevelFilter};

use hanchan::app::{CalculatorApp, EngineApp};
use hanchan::control::common::{calc_seat_wind, round_number_within_wind, wind_for_round};
use hanchan::model::*;
use hanchan::util::{log::init as init_logger, misc::Res};

#[derive(Parser, Debug)]
#[command(name = "hanchan")]
#[command(about = "Riichi mahjong round settlement and hanchan progression")]
#[command(version)]
struct Cli {
    #[arg(long, global = true, default_value = "info")]
    #[arg(help = "Log level (off, error, warn, info, debug, trace)")]
    log_level: LevelFilter,

    #[arg(long, global = true)]
    #[arg(help = "Rule file (json). Missing fields use the default rule")]
    rule: Option<String>,

    #[arg(long, global = true)]
    #[arg(help = "Override the initial score")]
    initial_score: Option<Point>,

    #[arg(long, global = true)]
    #[arg(help = "Override the settlement score")]
    settlement_score: Option<Point>,

    #[arg(long, global = true)]
    #[arg(help = "Override the last round number (4: tonpuu, 8: hanchan)")]
    last_round: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Settle rounds from json requests")]
    Settle {
        #[arg(short, long)]
        #[arg(help = "Read requests from file (one json per line)")]
        file: Option<String>,
        #[arg(help = "Request as a json expression")]
        exp: Option<String>,
    },
    #[command(about = "Simulate hanchans with random round results")]
    Simulate {
        #[arg(short, long, default_value_t = 0)]
        #[arg(help = "RNG seed (0: unix time)")]
        seed: u64,
        #[arg(short, long, default_value_t = 0)]
        #[arg(help = "Number of games (0: single game with event output)")]
        games: u32,
        #[arg(short, long)]
        #[arg(help = "Write events to data/ as json")]
        write: bool,
        #[arg(short, long)]
        #[arg(help = "Suppress event output")]
        quiet: bool,
    },
    #[command(about = "Show the prevalent wind and seat winds of a round")]
    Wind {
        #[arg(help = "Round number (1-based)")]
        round: u32,
        #[arg(short, long, default_value_t = 0)]
        #[arg(help = "Dealer seat")]
        dealer: Seat,
    },
}

fn load_rule(cli: &Cli) -> Res<Rule> {
    let mut rule = match &cli.rule {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => Rule::default(),
    };
    if let Some(s) = cli.initial_score {
        rule.initial_score = s;
    }
    if let Some(s) = cli.settlement_score {
        rule.settlement_score = s;
    }
    if let Some(r) = cli.last_round {
        rule.last_round = r;
    }
    Ok(rule)
}

fn run(cli: Cli) -> Res {
    let rule = load_rule(&cli)?;
    match cli.command {
        Command::Settle { file, exp } => CalculatorApp::new(rule, file, exp).run(),
        Command::Simulate {
            seed,
            games,
            write,
            quiet,
        } => EngineApp::new(seed, rule, games, write, quiet).run(),
        Command::Wind { round, dealer } => {
            if round == 0 || dealer >= SEAT {
                return Err(format!("invalid round or dealer: {} {}", round, dealer).into());
            }
            println!(
                "round {}: {}{}局",
                round,
                wind_for_round(round),
                round_number_within_wind(round)
            );
            for s in 0..SEAT {
                println!("seat{}: {}", s, calc_seat_wind(dealer, s));
            }
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}
