pub mod agent;
pub mod config;
pub mod coordination;
pub mod environment;
pub mod error;
pub mod grid;
pub mod memory;
pub mod mode;
pub mod params;
pub mod planning;
pub mod scheduler;

pub use agent::{AgentStatus, ForagerAgent, Thought};
pub use mode::Mode;
pub use scheduler::{Simulation, SimulationReport};
