//! Visual effect descriptors attached to simulation events.
//!
//! The simulation never draws anything. It only describes the burst a renderer
//! should play; every parameter is a typed field with a default per shape.

use serde::{Deserialize, Serialize};

/// Inclusive random range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Emission pattern of a particle burst.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum EffectShape {
    /// Uniform in all directions.
    Sphere,
    /// Upward plume. `spread` scales the horizontal component (1.0 = 45 degrees).
    Cone { spread: f64 },
    /// Flat ring along the ground, leaving a scorch mark of `crater_radius`.
    Disk { crater_radius: f64 },
}

/// A particle burst request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub shape: EffectShape,
    pub count: u32,
    /// 0xRRGGBB.
    pub color: u32,
    pub size: Span,
    /// Initial particle speed (units per frame).
    pub speed: Span,
    /// Particle lifetime in frames.
    pub lifetime: Span,
    pub gravity: bool,
    pub fade_out: bool,
}

impl EffectSpec {
    /// Defaults for a shape: 20 orange particles, size 0.1..0.3, speed 0.1..0.3,
    /// lifetime 30..60 frames, fading. Spheres and cones fall under gravity;
    /// disks stay on the ground plane.
    pub fn new(shape: EffectShape) -> Self {
        Self {
            shape,
            count: 20,
            color: 0xffaa00,
            size: Span::new(0.1, 0.3),
            speed: Span::new(0.1, 0.3),
            lifetime: Span::new(30.0, 60.0),
            gravity: !matches!(shape, EffectShape::Disk { .. }),
            fade_out: true,
        }
    }

    pub fn sphere() -> Self {
        Self::new(EffectShape::Sphere)
    }

    pub fn cone(spread: f64) -> Self {
        Self::new(EffectShape::Cone { spread })
    }

    pub fn disk(crater_radius: f64) -> Self {
        Self::new(EffectShape::Disk { crater_radius })
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn size(mut self, min: f64, max: f64) -> Self {
        self.size = Span::new(min, max);
        self
    }

    pub fn speed(mut self, min: f64, max: f64) -> Self {
        self.speed = Span::new(min, max);
        self
    }

    pub fn lifetime(mut self, min: f64, max: f64) -> Self {
        self.lifetime = Span::new(min, max);
        self
    }

    pub fn gravity(mut self, gravity: bool) -> Self {
        self.gravity = gravity;
        self
    }
}

// --- Presets ---

pub fn launch() -> EffectSpec {
    EffectSpec::cone(0.3)
        .count(15)
        .color(0x00ffff)
        .size(0.1, 0.2)
        .speed(0.05, 0.2)
        .lifetime(20.0, 30.0)
}

pub fn interception() -> EffectSpec {
    EffectSpec::sphere()
        .count(30)
        .color(0x00ffff)
        .size(0.1, 0.4)
        .speed(0.2, 0.5)
        .lifetime(20.0, 40.0)
}

/// Ground-level blast; the crater matches the missile's blast radius.
pub fn ground_explosion(color: u32, explosion_radius: f64) -> EffectSpec {
    EffectSpec::disk(explosion_radius)
        .count(20)
        .color(color)
        .speed(0.3, 0.6)
        .lifetime(20.0, 30.0)
}

pub fn collapse() -> EffectSpec {
    EffectSpec::sphere()
        .color(0x8b4513)
        .size(0.1, 0.4)
        .lifetime(60.0, 100.0)
}

pub fn production() -> EffectSpec {
    EffectSpec::cone(0.2)
        .count(5)
        .color(0x00ff00)
        .size(0.1, 0.2)
        .speed(0.1, 0.2)
        .lifetime(20.0, 30.0)
}

pub fn delivery() -> EffectSpec {
    EffectSpec::sphere()
        .count(8)
        .color(0x00ff00)
        .size(0.1, 0.2)
        .lifetime(15.0, 25.0)
        .gravity(false)
}

pub fn wave_start() -> EffectSpec {
    EffectSpec::sphere()
        .color(0xffff00)
        .size(0.2, 0.4)
        .speed(0.2, 0.5)
        .lifetime(30.0, 50.0)
}
