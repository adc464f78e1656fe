//! Flood-style propagation of the fuel station location.
//!
//! An agent that knows where the station is re-announces it every tick, and
//! nobody ever unlearns it, so once any agent has seen the station the rumour
//! reaches every agent still listening to the bus.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::simulation::coordination::bus::MessageBus;
use crate::simulation::coordination::message::{AgentId, Message, MessageKind};
use crate::simulation::grid::Coord;
use crate::simulation::memory::AreaMemory;

/// One agent's view of the shared facts carried over the bus.
#[derive(Clone, Debug)]
pub struct Gossip {
    id: AgentId,
    fuel_station: Option<Coord>,
    /// Latest announced position of every agent heard from so far
    positions: BTreeMap<AgentId, Coord>,
}

impl Gossip {
    #[must_use]
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            fuel_station: None,
            positions: BTreeMap::new(),
        }
    }

    /// Publishing half of the gossip step.
    ///
    /// Announces `own_pos`, then either re-announces the known station or,
    /// when the station was just sighted in `memory`, adopts and announces it.
    pub fn broadcast(&mut self, bus: &MessageBus, own_pos: Coord, memory: &AreaMemory) {
        bus.publish(Message::broadcast(self.id, MessageKind::AgentPosition(own_pos)));
        self.positions.insert(self.id, own_pos);

        if self.fuel_station.is_none() {
            if let Some(station) = memory.fuel_station() {
                info!(agent = %self.id, %station, "found fuel station");
                self.fuel_station = Some(station);
            }
        }
        if let Some(station) = self.fuel_station {
            bus.publish(Message::broadcast(self.id, MessageKind::FuelStationFound(station)));
        }
    }

    /// Reading half of the gossip step: records announced positions and, if
    /// the station is still unknown, adopts the first announcement of it.
    pub fn receive(&mut self, bus: &MessageBus) {
        for message in bus.drain(self.id) {
            match message.kind {
                MessageKind::AgentPosition(pos) => {
                    self.positions.insert(message.from, pos);
                }
                MessageKind::FuelStationFound(station) => {
                    if self.fuel_station.is_none() {
                        debug!(agent = %self.id, from = %message.from, %station, "learned fuel station");
                        self.fuel_station = Some(station);
                    }
                }
            }
        }
    }

    /// Both halves back to back, for a single agent acting alone.
    pub fn communicate(&mut self, bus: &MessageBus, own_pos: Coord, memory: &AreaMemory) {
        self.broadcast(bus, own_pos, memory);
        self.receive(bus);
    }

    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    #[must_use]
    pub const fn fuel_station(&self) -> Option<Coord> {
        self.fuel_station
    }

    /// Positions announced so far, ordered by agent id.
    #[must_use]
    pub const fn positions(&self) -> &BTreeMap<AgentId, Coord> {
        &self.positions
    }

    /// Number of distinct agents heard from, this agent included.
    #[must_use]
    pub fn announced_count(&self) -> usize {
        self.positions.len()
    }
}
