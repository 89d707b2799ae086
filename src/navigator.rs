// One-step lookahead navigation: score the four neighbours of the agent and
// greedily step to the best one it hasn't occupied yet.

use arrayvec::ArrayVec;
use itertools::Itertools;
use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;

use crate::game_interface::{Direction, GameMap, MapObjects, Number, Position};

/// Penalty when the step heads into the half of the map the move points to.
pub const FORWARD_PENALTY: Number = 1;
/// Penalty when the step stays in (or goes back to) the near half.
pub const BACKWARD_PENALTY: Number = 5;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Candidate {
    pub position: Position,
    pub direction: Direction,
    /// Projected strength after taking the step.
    pub score: Number,
}

pub type Candidates = ArrayVec<Candidate, 4>;

/// Every cell the agent has occupied, in order. Never shrinks.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    order: Vec<Position>,
    seen: FxHashSet<Position>,
}

impl VisitedSet {
    pub fn new() -> Self {
        VisitedSet::default()
    }

    pub fn record(&mut self, pos: Position) {
        self.order.push(pos);
        self.seen.insert(pos);
    }

    pub fn contains(&self, pos: &Position) -> bool {
        self.seen.contains(pos)
    }

    /// Number of recorded steps, revisits included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn last(&self) -> Option<&Position> {
        self.order.last()
    }
}

/// Best delta among the objects flanking `candidate`, perpendicular to the
/// move. Cells without a known object count as 0.
pub fn adjacent_delta(candidate: Position, direction: Direction,
                      objects: &MapObjects) -> Number {
    direction.flanks().iter()
        .map(|&flank| match objects.get(&candidate.step(flank)) {
            Some(object) if object.label.is_known() => object.delta,
            _ => 0,
        })
        .max()
        .unwrap_or(0)
}

/// Penalty 1 when the candidate lies in the far half of the move (north half
/// going N, south half going S, east half going E, west half going W), else 5.
/// Heading into the near half (e.g. N while in the south half) is the costly case.
pub fn positional_penalty(candidate: Position, direction: Direction,
                          map: &GameMap) -> Number {
    // Compare doubled coordinates so odd sizes split without rounding.
    let forward = match direction {
        Direction::N => 2 * candidate.row < map.height,
        Direction::S => 2 * candidate.row > map.height,
        Direction::E => 2 * candidate.col > map.width,
        Direction::W => 2 * candidate.col < map.width,
    };
    if forward { FORWARD_PENALTY } else { BACKWARD_PENALTY }
}

/// Score of stepping from `location` towards `direction`, None when the
/// target is off the map or a wall. Saturates at the bounds of `Number`.
pub fn score(location: Position, direction: Direction, strength: Number,
             map: &GameMap, objects: &MapObjects) -> Option<Number> {
    let candidate = location.step(direction);
    let cost = map.tile(candidate)?.cost()?;
    let penalty = positional_penalty(candidate, direction, map);
    Some(strength
        .saturating_sub(cost + penalty)
        .saturating_add(adjacent_delta(candidate, direction, objects)))
}

/// All enterable neighbours of `location` with their scores.
pub fn candidates(location: Position, strength: Number, map: &GameMap,
                  objects: &MapObjects) -> Candidates {
    Direction::ALL.iter()
        .filter_map(|&direction| {
            score(location, direction, strength, map, objects).map(|score| Candidate {
                position: location.step(direction),
                direction,
                score,
            })
        })
        .collect()
}

pub struct Navigator<R: Rng = SmallRng> {
    name: String,
    visited: VisitedSet,
    rng: R,
}

impl Navigator<SmallRng> {
    pub fn new(seed: u64) -> Self {
        Navigator::with_rng(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Navigator::with_rng(SmallRng::from_entropy())
    }
}

impl<R: Rng> Navigator<R> {
    pub fn with_rng(rng: R) -> Self {
        Navigator {
            name: "seeker_agent".to_string(),
            visited: VisitedSet::new(),
            rng,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Pick the next move. Records `location` as visited, then steps to the
    /// best scoring neighbour not visited yet, breaking ties at random. With
    /// no such neighbour, moves in a random direction (which may bump a wall
    /// or revisit a cell).
    ///
    /// Note that the whole history is consulted, so once every neighbour has
    /// been seen the agent keeps falling back to random moves.
    pub fn decide(&mut self, location: Position, strength: Number, map: &GameMap,
                  objects: &MapObjects) -> Direction {
        self.visited.record(location);

        let options: Candidates = candidates(location, strength, map, objects)
            .into_iter()
            .filter(|candidate| !self.visited.contains(&candidate.position))
            .collect();
        for candidate in &options {
            debug!("[{name}] candidate {dir} -> {pos:?}: {score}",
                   name = self.name, dir = candidate.direction,
                   pos = candidate.position, score = candidate.score);
        }

        let best = options.iter().max_set_by_key(|candidate| candidate.score);
        match best.choose(&mut self.rng) {
            Some(candidate) => {
                if best.len() > 1 {
                    debug!("[{name}] {ties} candidates tied at {score}",
                           name = self.name, ties = best.len(), score = candidate.score);
                }
                candidate.direction
            },
            None => {
                let direction = Direction::random(&mut self.rng);
                warn!("[{name}] No unvisited candidate around {location:?}, moving {direction} at random",
                      name = self.name);
                direction
            },
        }
    }
}
