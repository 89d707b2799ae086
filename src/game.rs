// Local stand-in for the game engine: loads a scenario, feeds observations to
// an agent turn after turn and applies its moves.

use log::{debug, info};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::iter;
use std::path::Path;
use thiserror::Error;

use crate::agents::{Agent, AgentError};
use crate::game_interface::{Direction, GameMap, MapObject, MapObjects, Number, Position, Tile};

fn default_vision_radius() -> Number {
    2
}

fn default_max_turns() -> u32 {
    200
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ScenarioObject {
    pub position: Position,
    #[serde(flatten)]
    pub object: MapObject,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub map: GameMap,
    pub start: Position,
    #[serde(default)]
    pub goal: Option<Position>,
    pub initial_strength: Number,
    #[serde(default)]
    pub objects: Vec<ScenarioObject>,
    /// Objects within this Manhattan distance of the agent get discovered.
    #[serde(default = "default_vision_radius")]
    pub vision_radius: Number,
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
}

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed reading the scenario ({0})")]
    Read(#[from] std::io::Error),
    #[error("Failed parsing the scenario ({0})")]
    Parse(#[from] serde_json::Error),
    #[error("The {what} at {position:?} is off the map")]
    OutOfBounds { what: &'static str, position: Position },
    #[error("The {what} at {position:?} is inside a wall")]
    Blocked { what: &'static str, position: Position },
}

impl Scenario {
    pub fn from_json(data: &str) -> Result<Scenario, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(data)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Scenario, ScenarioError> {
        let data = std::fs::read_to_string(path)?;
        Scenario::from_json(&data)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        let walkable = [("start", Some(self.start)), ("goal", self.goal)];
        for (what, position) in walkable {
            let Some(position) = position else { continue };
            match self.map.tile(position) {
                None => return Err(ScenarioError::OutOfBounds { what, position }),
                Some(Tile::Wall) => return Err(ScenarioError::Blocked { what, position }),
                Some(_) => {},
            }
        }
        for object in &self.objects {
            if !self.map.contains(&object.position) {
                return Err(ScenarioError::OutOfBounds { what: "object", position: object.position });
            }
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Stepped on the goal.
    Reached,
    /// Strength dropped to zero or below.
    Exhausted,
    /// Hit the turn limit.
    TimedOut,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub struct GameResult {
    pub outcome: Outcome,
    pub turns: u32,
    pub final_strength: Number,
    /// Distinct cells occupied, start included.
    pub cells_visited: usize,
    /// Moves into a wall or off the map.
    pub bumps: u32,
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Error while running the agent's code ({0})")]
    AgentError(#[from] AgentError),
}

#[derive(Serialize, Debug, Clone)]
struct TurnVisualization {
    turn: u32,
    direction: Direction,
    location: Position,
    strength: Number,
}

pub struct Game<'a> {
    scenario: &'a Scenario,
    location: Position,
    strength: Number,
    turn: u32,
    bumps: u32,
    // Objects still lying on the map.
    objects: MapObjects,
    // What the agent gets to see.
    discovered: MapObjects,
    visited: FxHashSet<Position>,
    visualization: Option<Vec<TurnVisualization>>,
}

impl<'a> Game<'a> {
    pub fn new(scenario: &'a Scenario) -> Self {
        let objects: MapObjects = scenario.objects.iter()
            .map(|placed| (placed.position, placed.object))
            .collect();
        let visualization = if cfg!(feature = "visualization_dump") {
            Some(Vec::new())
        } else {
            None
        };
        Game {
            scenario,
            location: scenario.start,
            strength: scenario.initial_strength,
            turn: 0,
            bumps: 0,
            objects,
            discovered: MapObjects::default(),
            visited: iter::once(scenario.start).collect(),
            visualization,
        }
    }

    pub fn location(&self) -> Position {
        self.location
    }

    pub fn strength(&self) -> Number {
        self.strength
    }

    pub fn discovered(&self) -> &MapObjects {
        &self.discovered
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if Some(self.location) == self.scenario.goal {
            Some(Outcome::Reached)
        } else if self.strength <= 0 {
            Some(Outcome::Exhausted)
        } else if self.turn >= self.scenario.max_turns {
            Some(Outcome::TimedOut)
        } else {
            None
        }
    }

    pub fn run(&mut self, agent: &mut dyn Agent) -> Result<GameResult, GameError> {
        info!("Playing {name:?} ({height}x{width}) with {agent}, strength {strength}",
              name = self.scenario.name, height = self.scenario.map.height,
              width = self.scenario.map.width, agent = agent.name(),
              strength = self.strength);
        while self.outcome().is_none() {
            self.discover();
            let direction = agent.decide(self.location, self.strength,
                                         &self.scenario.map, &self.discovered)?;
            self.step(direction);
        }
        if let Some(viz) = &self.visualization {
            debug!("[VIZ_DATA] {}", json!(viz));
        }
        let result = self.result();
        info!("Game over: {outcome:?} after {turns} turns, strength {strength}, {cells} cells visited",
              outcome = result.outcome, turns = result.turns,
              strength = result.final_strength, cells = result.cells_visited);
        Ok(result)
    }

    /// Apply one move. Bumping into a wall or the map edge wastes the turn.
    pub fn step(&mut self, direction: Direction) {
        self.turn += 1;
        let target = self.location.step(direction);
        match self.scenario.map.tile(target).and_then(|tile| tile.cost()) {
            Some(cost) => {
                self.location = target;
                self.strength = self.strength.saturating_sub(cost);
                self.visited.insert(target);
                self.touch_objects();
            },
            None => {
                self.bumps += 1;
                debug!("Turn {turn}: bumped moving {direction} from {location:?}",
                       turn = self.turn, location = self.location);
            },
        }
        if let Some(viz) = &mut self.visualization {
            viz.push(TurnVisualization {
                turn: self.turn,
                direction,
                location: self.location,
                strength: self.strength,
            });
        }
    }

    fn discover(&mut self) {
        for (position, object) in &self.objects {
            if position.manhattan(&self.location) <= self.scenario.vision_radius
                && self.discovered.insert(*position, *object).is_none() {
                debug!("Discovered {:?} at {:?}", object.label, position);
            }
        }
    }

    // Objects on or next to the agent apply their delta once, then vanish.
    fn touch_objects(&mut self) {
        let location = self.location;
        let reach = iter::once(location)
            .chain(Direction::ALL.iter().map(|&direction| location.step(direction)));
        for cell in reach {
            if let Some(object) = self.objects.remove(&cell) {
                self.discovered.remove(&cell);
                self.strength = self.strength.saturating_add(object.delta);
                info!("Turn {turn}: {label:?} at {cell:?} changed strength by {delta} to {strength}",
                      turn = self.turn, label = object.label, delta = object.delta,
                      strength = self.strength);
            }
        }
    }

    pub fn result(&self) -> GameResult {
        GameResult {
            outcome: self.outcome().unwrap_or(Outcome::TimedOut),
            turns: self.turn,
            final_strength: self.strength,
            cells_visited: self.visited.len(),
            bumps: self.bumps,
        }
    }
}
