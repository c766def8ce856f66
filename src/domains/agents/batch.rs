use prost::Message;

use super::identity;
use super::proto;
use crate::domains::trace::{EntityRecord, Timestep};

/// Which entity lists of a timestep feed the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityCoverage {
    #[default]
    VehiclesOnly,
    VehiclesAndPersons,
}

impl EntityCoverage {
    pub fn from_include_persons(include_persons: bool) -> Self {
        if include_persons {
            EntityCoverage::VehiclesAndPersons
        } else {
            EntityCoverage::VehiclesOnly
        }
    }
}

/// Resolved id plus the source (x, y) pair, forwarded untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPosition {
    pub id: i32,
    pub point: [f64; 2],
}

impl From<&EntityRecord> for AgentPosition {
    fn from(record: &EntityRecord) -> Self {
        Self {
            id: identity::resolve(&record.label),
            point: [record.x, record.y],
        }
    }
}

impl From<&AgentPosition> for proto::PAgent {
    fn from(agent: &AgentPosition) -> Self {
        proto::PAgent {
            id: agent.id,
            point: agent.point.to_vec(),
        }
    }
}

/// Cumulative set of agent positions. Entries are only ever appended, so
/// an id seen in several timesteps appears once per sighting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutboundBatch {
    pub sequence: u64,
    pub agents: Vec<AgentPosition>,
}

impl OutboundBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn ids(&self) -> Vec<i32> {
        self.agents.iter().map(|a| a.id).collect()
    }

    /// Append every covered record of `timestep` in order and return how many were added.
    pub fn extend_from_timestep(&mut self, timestep: &Timestep, coverage: EntityCoverage) -> usize {
        let before = self.agents.len();
        self.agents.extend(timestep.vehicles.iter().map(AgentPosition::from));
        if coverage == EntityCoverage::VehiclesAndPersons {
            self.agents.extend(timestep.persons.iter().map(AgentPosition::from));
        }
        self.sequence += 1;
        self.agents.len() - before
    }

    pub fn to_proto(&self) -> proto::PAgents {
        proto::PAgents {
            agents: self.agents.iter().map(Into::into).collect(),
        }
    }

    /// Wire payload. Encoding into a growable buffer cannot fail.
    pub fn encode(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }
}

/// Fold one timestep into the running batch.
pub fn accumulate(
    mut batch: OutboundBatch,
    timestep: &Timestep,
    coverage: EntityCoverage,
) -> OutboundBatch {
    batch.extend_from_timestep(timestep, coverage);
    batch
}
