//! Scene contents owned by the viewport.
//!
//! The globe view is a textured sphere lit by an ambient and a directional
//! light in front of a starfield. Lab views carry only the lights; their
//! visual is rebuilt from the simulation state every frame.

use serde::Serialize;

use crate::assets::texture::TextureInfo;

/// What the viewport shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneKind {
    Globe,
    Simulation,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Light {
    Ambient { color: [f32; 3], intensity: f32 },
    Directional { color: [f32; 3], intensity: f32, direction: [f32; 3] },
}

/// A background star on a sphere around the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Star {
    pub position: [f32; 3],
    /// Point size multiplier in [0.5, 1.5).
    pub size: f32,
}

/// The textured sphere. Attached once its texture arrives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobeMesh {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub texture: TextureInfo,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SceneContents {
    pub lights: Vec<Light>,
    pub stars: Vec<Star>,
    pub globe: Option<GlobeMesh>,
}

impl SceneContents {
    /// Lights and starfield, without the globe mesh.
    pub fn globe_backdrop(star_count: usize, star_radius: f32, seed: u64) -> Self {
        Self {
            lights: default_lights(),
            stars: starfield(star_count, star_radius, seed),
            globe: None,
        }
    }

    pub fn simulation() -> Self {
        Self {
            lights: default_lights(),
            stars: Vec::new(),
            globe: None,
        }
    }

    pub fn attach_globe(&mut self, texture: TextureInfo) {
        self.globe = Some(GlobeMesh {
            radius: 1.0,
            width_segments: 64,
            height_segments: 64,
            texture,
        });
    }
}

fn default_lights() -> Vec<Light> {
    vec![
        Light::Ambient { color: [1.0, 1.0, 1.0], intensity: 0.3 },
        Light::Directional {
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            direction: [-5.0, -3.0, -5.0],
        },
    ]
}

/// Deterministic stars uniformly spread over a sphere of `radius`.
pub fn starfield(count: usize, radius: f32, seed: u64) -> Vec<Star> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            // Uniform on the sphere: z uniform in [-1, 1], azimuth uniform.
            let z = rng.next_f32() * 2.0 - 1.0;
            let theta = rng.next_f32() * std::f32::consts::TAU;
            let r = (1.0 - z * z).max(0.0).sqrt();
            Star {
                position: [radius * r * theta.cos(), radius * r * theta.sin(), radius * z],
                size: 0.5 + rng.next_f32(),
            }
        })
        .collect()
}

/// Seedable xorshift64 generator.
#[derive(Debug, Clone)]
struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in [0, 1).
    fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}
