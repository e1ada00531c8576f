//! Fundamental geometric and simulation types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 3D position in world units.
/// x = East, z = South, y = Up. The ground plane is y = 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Velocity in world units per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Stable handle for a simulated entity, valid for the lifetime of that entity only.
///
/// Ids are generational: once an entity is removed its id never resolves again,
/// even if the underlying slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_vec(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    pub fn to_vec(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance to another position (all three axes).
    pub fn range_to(&self, other: &Position) -> f64 {
        self.to_vec().distance(other.to_vec())
    }

    /// Distance on the ground plane, ignoring altitude.
    pub fn horizontal_range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Same point projected onto the ground plane.
    pub fn on_ground(self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_vec(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    pub fn to_vec(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Speed magnitude (units per tick).
    pub fn speed(&self) -> f64 {
        self.to_vec().length()
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Elapsed simulation time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_secs * 1000.0
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Box centred on `center` with full extents `size`.
    pub fn from_center_size(center: DVec3, size: DVec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Quadratic Bezier interpolation:
/// P(t) = (1-t)^2 * P0 + 2(1-t)t * P1 + t^2 * P2.
pub fn quadratic_bezier(p0: DVec3, p1: DVec3, p2: DVec3, t: f64) -> DVec3 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}
