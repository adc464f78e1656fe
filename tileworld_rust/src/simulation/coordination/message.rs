//! Message types exchanged over the broadcast bus.

use std::fmt;

use crate::simulation::grid::Coord;

/// Identity of a forager agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent{}", self.0)
    }
}

/// Who a message is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    Agent(AgentId),
    Broadcast,
}

impl Recipient {
    /// True when `reader` should see a message sent to this recipient.
    #[must_use]
    pub fn includes(self, reader: AgentId) -> bool {
        match self {
            Self::Broadcast => true,
            Self::Agent(id) => id == reader,
        }
    }
}

/// Message payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    /// The sender's current position
    AgentPosition(Coord),
    /// Where the fuel station is
    FuelStationFound(Coord),
}

/// A message on the bus. Lives for a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Message {
    pub from: AgentId,
    pub to: Recipient,
    pub kind: MessageKind,
}

impl Message {
    #[must_use]
    pub const fn broadcast(from: AgentId, kind: MessageKind) -> Self {
        Self {
            from,
            to: Recipient::Broadcast,
            kind,
        }
    }
}
