
/// Which element an entity record was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Vehicle,
    Person,
}

impl EntityKind {
    pub fn tag(&self) -> &'static str {
        match self {
            EntityKind::Vehicle => "vehicle",
            EntityKind::Person => "person",
        }
    }
}

/// One observed entity at one timestep.
///
/// Only `label`, `x` and `y` are forwarded downstream; the remaining
/// attributes are kept so the record mirrors the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub kind: EntityKind,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub angle: f64,
    pub entity_type: String,
    pub speed: f64,
    pub pos: f64,
    pub lane: String,
    pub slope: f64,
    pub signals: i32,
    pub distance: f64,
    pub acceleration: f64,
    pub acceleration_lat: f64,
}

impl EntityRecord {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            label: String::new(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            angle: 0.0,
            entity_type: String::new(),
            speed: 0.0,
            pos: 0.0,
            lane: String::new(),
            slope: 0.0,
            signals: 0,
            distance: 0.0,
            acceleration: 0.0,
            acceleration_lat: 0.0,
        }
    }

    pub fn vehicle(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            label: label.into(),
            x,
            y,
            ..Self::new(EntityKind::Vehicle)
        }
    }

    pub fn person(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            label: label.into(),
            x,
            y,
            ..Self::new(EntityKind::Person)
        }
    }
}

/// One simulated time instant. Vehicles and persons keep their document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timestep {
    pub time: f64,
    pub vehicles: Vec<EntityRecord>,
    pub persons: Vec<EntityRecord>,
}

impl Timestep {
    pub fn new(time: f64) -> Self {
        Self {
            time,
            ..Default::default()
        }
    }

    pub fn with_vehicles(mut self, vehicles: Vec<EntityRecord>) -> Self {
        self.vehicles = vehicles;
        self
    }

    pub fn with_persons(mut self, persons: Vec<EntityRecord>) -> Self {
        self.persons = persons;
        self
    }

    pub fn push(&mut self, record: EntityRecord) {
        match record.kind {
            EntityKind::Vehicle => self.vehicles.push(record),
            EntityKind::Person => self.persons.push(record),
        }
    }
}

/// A fully loaded trace. Timesteps are stored in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    timesteps: Vec<Timestep>,
}

impl Trace {
    pub fn new(timesteps: Vec<Timestep>) -> Self {
        Self { timesteps }
    }

    pub fn timesteps(&self) -> &[Timestep] {
        &self.timesteps
    }

    pub fn len(&self) -> usize {
        self.timesteps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timesteps.is_empty()
    }

    pub fn vehicle_count(&self) -> usize {
        self.timesteps.iter().map(|t| t.vehicles.len()).sum()
    }

    pub fn person_count(&self) -> usize {
        self.timesteps.iter().map(|t| t.persons.len()).sum()
    }
}
