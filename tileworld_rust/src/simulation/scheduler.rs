//! Lock-step driver for a world and its agents.
//!
//! Every tick runs in fixed phases: the world advances, the bus starts a
//! fresh tick, every agent senses, every agent publishes, every agent reads,
//! and finally each agent thinks and acts in id order. Publishing before
//! anyone reads means every message sent in a tick is seen by every agent
//! in that same tick.

use tracing::info;

use crate::simulation::agent::ForagerAgent;
use crate::simulation::config::{AgentConfig, SimulationConfig};
use crate::simulation::coordination::{AgentId, MessageBus};
use crate::simulation::environment::{GridWorld, World};
use crate::simulation::error::WorldError;
use crate::simulation::grid::{Coord, Tick};
use crate::simulation::planning::{AStarPlanner, PathFinder};

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationReport {
    pub ticks: Tick,
    /// Holes filled across all agents
    pub total_score: u32,
    /// Agents that know where the fuel station is
    pub fuel_station_known_by: usize,
    pub min_fuel: f64,
}

pub struct Simulation<P = AStarPlanner> {
    pub world: GridWorld,
    pub agents: Vec<ForagerAgent>,
    pub bus: MessageBus,
    planner: P,
}

impl Simulation<AStarPlanner> {
    /// Builds a seeded world and drops `agent.agent_count` agents on random
    /// free cells.
    pub fn new(config: &SimulationConfig) -> Result<Self, WorldError> {
        let mut world = GridWorld::new(&config.world);
        let mut starts = Vec::with_capacity(config.agent.agent_count);
        for _ in 0..config.agent.agent_count {
            let pos = world.random_free_cell().ok_or(WorldError::NoFreeCell)?;
            world.add_agent(pos)?;
            starts.push(pos);
        }
        Ok(Self::assemble(world, &starts, &config.agent))
    }

    /// Puts agents at `starts` into an existing world. Agent ids follow the
    /// order of `starts`.
    pub fn from_world(mut world: GridWorld, starts: &[Coord], agent: &AgentConfig) -> Result<Self, WorldError> {
        for &pos in starts {
            world.add_agent(pos)?;
        }
        Ok(Self::assemble(world, starts, agent))
    }

    fn assemble(world: GridWorld, starts: &[Coord], agent: &AgentConfig) -> Self {
        let (width, height) = world.dimensions();
        let agents: Vec<ForagerAgent> = starts
            .iter()
            .enumerate()
            .map(|(i, &pos)| {
                let id = AgentId(u32::try_from(i).unwrap_or(u32::MAX));
                ForagerAgent::new(id, pos, width, height, agent.clone())
            })
            .collect();
        info!(agents = agents.len(), width, height, station = %world.fuel_station(), "simulation ready");
        Self::with_planner(world, agents, AStarPlanner::for_world(width, height))
    }
}

impl<P: PathFinder> Simulation<P> {
    /// Wires already-registered agents to a world with a custom planner.
    pub fn with_planner(world: GridWorld, agents: Vec<ForagerAgent>, planner: P) -> Self {
        Self {
            world,
            agents,
            bus: MessageBus::new(),
            planner,
        }
    }

    /// Runs one tick.
    pub fn step(&mut self) {
        self.world.update();
        self.bus.advance_tick();

        for agent in &mut self.agents {
            agent.sense(&self.world);
        }
        for agent in &mut self.agents {
            agent.broadcast(&self.bus);
        }
        for agent in &mut self.agents {
            agent.receive(&self.bus);
        }
        for agent in &mut self.agents {
            let thought = agent.think(&self.world, &self.planner);
            agent.act(&mut self.world, thought);
        }
    }

    /// Runs `ticks` ticks and reports on the outcome.
    pub fn run(&mut self, ticks: u64) -> SimulationReport {
        for _ in 0..ticks {
            self.step();
        }
        let report = self.report();
        info!(
            ticks = report.ticks,
            score = report.total_score,
            informed = report.fuel_station_known_by,
            min_fuel = report.min_fuel,
            "run finished"
        );
        report
    }

    #[must_use]
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            ticks: self.world.now(),
            total_score: self.agents.iter().map(|a| a.status.score).sum(),
            fuel_station_known_by: self
                .agents
                .iter()
                .filter(|a| a.fuel_station().is_some())
                .count(),
            min_fuel: self
                .agents
                .iter()
                .map(|a| a.status.fuel)
                .fold(f64::INFINITY, f64::min),
        }
    }

    #[must_use]
    pub fn tick(&self) -> Tick {
        self.world.now()
    }
}
