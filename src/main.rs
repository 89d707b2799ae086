use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{error, info};

use seeker_bot::agents::{Agent, HumanAgent, RandomAgent};
use seeker_bot::game::{Game, GameResult, Scenario};
use seeker_bot::navigator::Navigator;

#[derive(ValueEnum, Clone)]
enum AgentName {
    /// One-step lookahead that avoids cells it already visited.
    Seeker,
    /// Uniformly random moves.
    Random,
    /// Asks for every move on the terminal.
    Human,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Agent implementation that picks the moves.
    #[arg(short, long, value_enum,
          default_value_t = AgentName::Seeker)]
    agent: AgentName,

    /// Scenario JSON file to play.
    #[arg(short, long, default_value = "games/cave_7x9.json")]
    scenario: String,

    /// Seed for the agent's randomness. Falls back to SEEKER_SEED, then to
    /// entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the scenario's turn limit.
    #[arg(long)]
    max_turns: Option<u32>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

fn new_agent(name: &AgentName, seed: Option<u64>) -> Box<dyn Agent> {
    match name {
        AgentName::Seeker => match seed {
            Some(seed) => Box::new(Navigator::new(seed)),
            None => Box::new(Navigator::from_entropy()),
        },
        AgentName::Random => match seed {
            Some(seed) => Box::new(RandomAgent::new(seed)),
            None => Box::new(RandomAgent::from_entropy()),
        },
        AgentName::Human => Box::new(HumanAgent::stdio()),
    }
}

fn print_result(result: &GameResult, json: bool) {
    if json {
        match serde_json::to_string_pretty(result) {
            Ok(text) => println!("{text}"),
            Err(err) => error!("Could not serialize the result: {err}"),
        }
    } else {
        println!("Outcome:        {:?}", result.outcome);
        println!("Turns:          {}", result.turns);
        println!("Final strength: {}", result.final_strength);
        println!("Cells visited:  {}", result.cells_visited);
        println!("Bumps:          {}", result.bumps);
    }
}

fn main() {
    // Load .env file
    dotenvy::dotenv().ok();
    // Init logger with default value of info
    // This can be overriden with RUST_LOG env var
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let seed = cli.seed.or_else(|| {
        dotenvy::var("SEEKER_SEED").ok().and_then(|value| value.parse().ok())
    });
    let mut scenario = match Scenario::load(&cli.scenario) {
        Ok(scenario) => scenario,
        Err(err) => {
            error!("Could not load scenario {}:", cli.scenario);
            error!("  {}", err);
            std::process::exit(1);
        },
    };
    if let Some(max_turns) = cli.max_turns {
        scenario.max_turns = max_turns;
    }
    info!("Seed: {seed:?}");

    let mut agent = new_agent(&cli.agent, seed);
    match Game::new(&scenario).run(agent.as_mut()) {
        Ok(result) => print_result(&result, cli.json),
        Err(err) => {
            error!("Error while running the game with underlying error:");
            error!("  {}", err);
            std::process::exit(1);
        },
    }
}
