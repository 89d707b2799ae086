// Binary that plays every scenario JSON in a folder with the seeker and the
// random agents over a range of seeds, to compare how often each one reaches
// the goal and how much strength it has left.
//
// Usage: map_evaler <directory> [seeds]

use env_logger::Env;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use seeker_bot::agents::RandomAgent;
use seeker_bot::game::{Game, GameError, GameResult, Outcome, Scenario, ScenarioError};
use seeker_bot::navigator::Navigator;

#[derive(Debug, Clone)]
struct SavedScenario {
    name: String,
    path: String,
}

#[derive(Error, Debug)]
enum ScenarioEvalError {
    #[error("Failed loading the scenario ({0})")]
    LoadError(#[from] ScenarioError),
    #[error("Failed playing the scenario ({0})")]
    GameError(#[from] GameError),
}

#[derive(Default)]
struct Tally {
    games: u32,
    reached: u32,
    exhausted: u32,
    timed_out: u32,
    turns: u64,
    strength: i64,
}

impl Tally {
    fn add(&mut self, result: &GameResult) {
        self.games += 1;
        match result.outcome {
            Outcome::Reached => self.reached += 1,
            Outcome::Exhausted => self.exhausted += 1,
            Outcome::TimedOut => self.timed_out += 1,
        }
        self.turns += result.turns as u64;
        self.strength += result.final_strength as i64;
    }

    fn print(&self, name: &str) {
        let games = self.games.max(1) as f32;
        println!("  {name:<8} reached {:>3}/{} | exhausted {:>3} | timed out {:>3} | avg turns {:.1} | avg strength {:.1}",
                 self.reached, self.games, self.exhausted, self.timed_out,
                 self.turns as f32 / games, self.strength as f32 / games);
    }
}

fn read_saved_scenarios(directory: &str) -> std::io::Result<Vec<SavedScenario>> {
    lazy_static! {
        static ref SCENARIO_PATH: Regex = Regex::new(r"([^/\\]+)\.json$").unwrap();
    }
    let mut out = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path().to_string_lossy().to_string();
        if let Some(name) = SCENARIO_PATH.captures(&path)
            .and_then(|caps| caps.get(1))
            .map(|name| name.as_str().to_string()) {
            out.push(SavedScenario { name, path });
        }
    }
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}

fn evaluate_scenario(saved: &SavedScenario, seeds: u64)
    -> Result<(Tally, Tally), ScenarioEvalError> {
    let scenario = Scenario::load(&saved.path)?;
    let mut seeker = Tally::default();
    let mut random = Tally::default();
    for seed in 0..seeds {
        let mut agent = Navigator::new(seed);
        seeker.add(&Game::new(&scenario).run(&mut agent)?);
        let mut agent = RandomAgent::new(seed);
        random.add(&Game::new(&scenario).run(&mut agent)?);
    }
    Ok((seeker, random))
}

fn main() {
    // Per-game logs are noisy here, only show errors unless asked.
    env_logger::Builder::from_env(Env::default().default_filter_or("error")).init();

    let directory = std::env::args().nth(1).unwrap_or_else(|| "games".to_string());
    let seeds = std::env::args().nth(2)
        .and_then(|seeds| seeds.parse::<u64>().ok())
        .unwrap_or(20);

    let saved = match read_saved_scenarios(&directory) {
        Ok(saved) => saved,
        Err(err) => {
            eprintln!("Could not list {directory}: {err}");
            std::process::exit(1);
        },
    };
    println!("{} scenario(s), {} seed(s) each", saved.len(), seeds);
    for scenario in &saved {
        println!("{}:", scenario.name);
        match evaluate_scenario(scenario, seeds) {
            Ok((seeker, random)) => {
                seeker.print("seeker");
                random.print("random");
            },
            Err(err) => println!("  error: {err}"),
        }
    }
}
