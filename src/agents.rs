// Interchangeable agents. Anything that can pick a move given the agent's
// observation implements `Agent`, so the game can drive any of them.

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::time::Instant;
use thiserror::Error;

use crate::game_interface::{Direction, GameMap, MapObjects, Number, Position};
use crate::navigator::Navigator;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Could not talk to the player ({0})")]
    Io(#[from] io::Error),
    #[error("Input was closed before a direction was given")]
    InputClosed,
}

pub trait Agent {
    // Name to display for this agent.
    fn name(&self) -> &str;

    // Implementation of the agent.
    fn do_decide(&mut self, location: Position, strength: Number, map: &GameMap,
                 objects: &MapObjects) -> Result<Direction, AgentError>;

    // Wrapper to do_decide, to log timing and the chosen move.
    fn decide(&mut self, location: Position, strength: Number, map: &GameMap,
              objects: &MapObjects) -> Result<Direction, AgentError> {
        let start = Instant::now();
        let direction = self.do_decide(location, strength, map, objects)?;
        debug!("Agent {} moves {} from {:?} (strength {}), took {:?}",
               self.name(), direction, location, strength, start.elapsed());
        Ok(direction)
    }
}

impl Agent for Box<dyn Agent> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn do_decide(&mut self, location: Position, strength: Number, map: &GameMap,
                 objects: &MapObjects) -> Result<Direction, AgentError> {
        (**self).do_decide(location, strength, map, objects)
    }
}

impl<R: Rng> Agent for Navigator<R> {
    fn name(&self) -> &str {
        Navigator::name(self)
    }

    fn do_decide(&mut self, location: Position, strength: Number, map: &GameMap,
                 objects: &MapObjects) -> Result<Direction, AgentError> {
        Ok(Navigator::decide(self, location, strength, map, objects))
    }
}

// Moves in a uniformly random direction every turn, whatever it observes.
pub struct RandomAgent<R: Rng = SmallRng> {
    name: String,
    rng: R,
}

impl RandomAgent<SmallRng> {
    pub fn new(seed: u64) -> Self {
        RandomAgent::with_rng(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        RandomAgent::with_rng(SmallRng::from_entropy())
    }
}

impl<R: Rng> RandomAgent<R> {
    pub fn with_rng(rng: R) -> Self {
        RandomAgent { name: "random_agent".to_string(), rng }
    }
}

impl<R: Rng> Agent for RandomAgent<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn do_decide(&mut self, _location: Position, _strength: Number, _map: &GameMap,
                 _objects: &MapObjects) -> Result<Direction, AgentError> {
        Ok(Direction::random(&mut self.rng))
    }
}

// Shows the observed map to a person and asks them for each move.
pub struct HumanAgent<I: BufRead, O: Write> {
    name: String,
    input: I,
    output: O,
}

impl HumanAgent<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        HumanAgent::new(io::stdin().lock(), io::stdout())
    }
}

impl<I: BufRead, O: Write> HumanAgent<I, O> {
    pub fn new(input: I, output: O) -> Self {
        HumanAgent { name: "human_agent".to_string(), input, output }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    fn prompt(&mut self) -> Result<Direction, AgentError> {
        loop {
            write!(self.output, "Please enter a direction (N/S/E/W): ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(AgentError::InputClosed);
            }
            let answer = line.trim().to_uppercase();
            let mut symbols = answer.chars();
            if let (Some(symbol), None) = (symbols.next(), symbols.next()) {
                if let Some(direction) = Direction::from_symbol(symbol) {
                    return Ok(direction);
                }
            }
            info!("Not a direction: {answer:?}");
        }
    }
}

impl<I: BufRead, O: Write> Agent for HumanAgent<I, O> {
    fn name(&self) -> &str {
        &self.name
    }

    fn do_decide(&mut self, location: Position, strength: Number, map: &GameMap,
                 objects: &MapObjects) -> Result<Direction, AgentError> {
        writeln!(self.output)?;
        write!(self.output, "{}", map.render(location, objects))?;
        writeln!(self.output, "Strength: {strength}")?;
        self.prompt()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use rustc_hash::FxHashSet;
    use crate::game_interface::{MapObject, ObjectKind};
    use super::*;

    fn small_map() -> GameMap {
        GameMap::from_rows(&["...", ".:.", "..."]).unwrap()
    }

    #[test]
    fn test_human_reprompts() {
        let map = small_map();
        let objects = MapObjects::default();
        let input = Cursor::new("x\nnorth\n\n e \n");
        let mut agent = HumanAgent::new(input, Vec::new());
        let direction = agent.decide(Position::new(1, 1), 12, &map, &objects).unwrap();
        assert_eq!(direction, Direction::E);
        let output = String::from_utf8(agent.output().clone()).unwrap();
        assert_eq!(output.matches("Please enter a direction (N/S/E/W): ").count(), 4);
        assert!(output.contains("...\n.@.\n...\n"));
        assert!(output.contains("Strength: 12"));
    }

    #[test]
    fn test_human_shows_objects() {
        let map = small_map();
        let mut objects = MapObjects::default();
        objects.insert(Position::new(2, 2), MapObject { label: ObjectKind::Skeleton, delta: -2 });
        let mut agent = HumanAgent::new(Cursor::new("S\n"), Vec::new());
        let direction = agent.decide(Position::new(0, 0), 5, &map, &objects).unwrap();
        assert_eq!(direction, Direction::S);
        let output = String::from_utf8(agent.output().clone()).unwrap();
        assert!(output.contains("@..\n.:.\n..s\n"));
    }

    #[test]
    fn test_human_input_closed() {
        let map = small_map();
        let objects = MapObjects::default();
        let mut agent = HumanAgent::new(Cursor::new("q\n"), Vec::new());
        let result = agent.decide(Position::new(1, 1), 12, &map, &objects);
        assert!(matches!(result, Err(AgentError::InputClosed)));
    }

    #[test]
    fn test_random_covers_all_directions() {
        let map = small_map();
        let objects = MapObjects::default();
        let mut agent = RandomAgent::new(17);
        let seen: FxHashSet<Direction> = (0..200)
            .map(|_| agent.decide(Position::new(1, 1), 12, &map, &objects).unwrap())
            .collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_agents_are_interchangeable() {
        let map = GameMap::from_rows(&["#.#", "#.#", "###"]).unwrap();
        let objects = MapObjects::default();
        let mut agents: Vec<Box<dyn Agent>> = vec![
            Box::new(Navigator::new(1)),
            Box::new(RandomAgent::new(1)),
            Box::new(HumanAgent::new(Cursor::new("N\n"), Vec::new())),
        ];
        let names: Vec<&str> = agents.iter().map(|agent| agent.name()).collect();
        assert_eq!(names, vec!["seeker_agent", "random_agent", "human_agent"]);
        for agent in agents.iter_mut() {
            assert!(agent.decide(Position::new(1, 1), 10, &map, &objects).is_ok());
        }
        // The only open neighbour is north.
        assert_eq!(agents[0].decide(Position::new(1, 1), 10, &map, &objects).unwrap(),
                   Direction::N);
    }
}
