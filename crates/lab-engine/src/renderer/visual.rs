//! 2D visuals for the lab views, derived from a state snapshot.
//!
//! Coordinates are stage pixels, origin top-left, y down.

use std::f64::consts::TAU;

use serde::Serialize;

use crate::sim::model::SimulationState;
use crate::sim::titration::{MAX_VOLUME, NEUTRAL_PH};

pub const STAGE_WIDTH: f32 = 400.0;
pub const STAGE_HEIGHT: f32 = 300.0;
const MARGIN: f32 = 20.0;
const ELECTRON_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LabVisual {
    #[serde(rename_all = "camelCase")]
    FreeFall { ball: [f32; 2] },
    #[serde(rename_all = "camelCase")]
    Pendulum { pivot: [f32; 2], bob: [f32; 2], rotation_degrees: f32 },
    #[serde(rename_all = "camelCase")]
    Projectile { path: Vec<[f32; 2]>, ball: [f32; 2] },
    #[serde(rename_all = "camelCase")]
    Titration { burette_level: f32, flask_fill: f32, liquid_rgba: [f32; 4] },
    #[serde(rename_all = "camelCase")]
    Circuit { electrons: Vec<[f32; 2]>, bulb_brightness: f32 },
}

impl LabVisual {
    pub fn from_state(state: &SimulationState) -> Self {
        match state {
            SimulationState::FreeFall { normalized_position, .. } => {
                let drop = STAGE_HEIGHT - 2.0 * MARGIN;
                LabVisual::FreeFall {
                    ball: [STAGE_WIDTH / 2.0, MARGIN + drop * *normalized_position as f32],
                }
            }
            SimulationState::Pendulum { angle, bob_x, bob_y, .. } => {
                let pivot = [STAGE_WIDTH / 2.0, MARGIN];
                let length = bob_x.hypot(*bob_y) as f32;
                // Longest string fits the stage height
                let scale = if length > 0.0 {
                    (100.0f32).min((STAGE_HEIGHT - 2.0 * MARGIN) / length)
                } else {
                    100.0
                };
                LabVisual::Pendulum {
                    pivot,
                    bob: [pivot[0] + *bob_x as f32 * scale, pivot[1] - *bob_y as f32 * scale],
                    rotation_degrees: angle.to_degrees() as f32,
                }
            }
            SimulationState::Projectile { trajectory_points, current_index } => {
                projectile(trajectory_points, *current_index)
            }
            SimulationState::Titration { volume_added, ph, is_neutralized } => {
                let fraction = (volume_added / MAX_VOLUME) as f32;
                LabVisual::Titration {
                    burette_level: 1.0 - fraction,
                    flask_fill: 0.2 + 0.6 * fraction,
                    liquid_rgba: indicator_color(*ph, *is_neutralized),
                }
            }
            SimulationState::Circuit { flow_phase_angle, power, .. } => LabVisual::Circuit {
                electrons: electrons(*flow_phase_angle),
                bulb_brightness: (*power / 50.0).clamp(0.0, 1.0) as f32,
            },
        }
    }
}

fn projectile(points: &[(f64, f64)], index: usize) -> LabVisual {
    let max_x = points.iter().map(|p| p.0).fold(1e-6, f64::max);
    let max_y = points.iter().map(|p| p.1).fold(1e-6, f64::max);
    let sx = (STAGE_WIDTH - 2.0 * MARGIN) as f64 / max_x;
    let sy = (STAGE_HEIGHT - 2.0 * MARGIN) as f64 / max_y;
    let scale = sx.min(sy);
    let ground = STAGE_HEIGHT - MARGIN;

    let to_stage = |&(x, y): &(f64, f64)| {
        [MARGIN + (x * scale) as f32, ground - (y.max(0.0) * scale) as f32]
    };
    let path: Vec<[f32; 2]> = points.iter().map(to_stage).collect();
    let ball = path.get(index).copied().unwrap_or([MARGIN, ground]);
    LabVisual::Projectile { path, ball }
}

/// Colourless until the endpoint, then pink deepening with pH.
fn indicator_color(ph: f64, neutralized: bool) -> [f32; 4] {
    if !neutralized {
        return [0.9, 0.95, 1.0, 0.3];
    }
    let depth = ((ph - NEUTRAL_PH) / (14.0 - NEUTRAL_PH)).clamp(0.0, 1.0) as f32;
    [1.0, 0.41, 0.71, 0.5 + 0.5 * depth]
}

/// Evenly spaced electrons around the rectangular loop, shifted by phase.
fn electrons(phase: f64) -> Vec<[f32; 2]> {
    let (left, top) = (MARGIN * 2.0, MARGIN * 2.0);
    let (w, h) = (STAGE_WIDTH - 4.0 * MARGIN, STAGE_HEIGHT - 4.0 * MARGIN);
    let perimeter = 2.0 * (w + h);
    let offset = (phase / TAU) as f32;

    (0..ELECTRON_COUNT)
        .map(|i| {
            let s = ((i as f32 / ELECTRON_COUNT as f32 + offset).fract()) * perimeter;
            if s < w {
                [left + s, top]
            } else if s < w + h {
                [left + w, top + (s - w)]
            } else if s < 2.0 * w + h {
                [left + w - (s - w - h), top + h]
            } else {
                [left, top + h - (s - 2.0 * w - h)]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_fall_ball_reaches_ground() {
        let top = LabVisual::from_state(&SimulationState::FreeFall {
            position: 0.0,
            normalized_position: 0.0,
            velocity: 0.0,
            elapsed_time: 0.0,
        });
        let bottom = LabVisual::from_state(&SimulationState::FreeFall {
            position: 100.0,
            normalized_position: 1.0,
            velocity: 44.0,
            elapsed_time: 4.5,
        });
        assert_eq!(top, LabVisual::FreeFall { ball: [200.0, 20.0] });
        assert_eq!(bottom, LabVisual::FreeFall { ball: [200.0, 280.0] });
    }

    #[test]
    fn pendulum_bob_hangs_below_pivot() {
        let visual = LabVisual::from_state(&SimulationState::Pendulum {
            angle: 0.0,
            period: 2.0,
            elapsed_time: 0.0,
            bob_x: 0.0,
            bob_y: -1.0,
        });
        match visual {
            LabVisual::Pendulum { pivot, bob, .. } => {
                assert_eq!(bob[0], pivot[0]);
                assert!(bob[1] > pivot[1]);
            }
            other => panic!("Expected Pendulum visual, got {other:?}"),
        }
    }

    #[test]
    fn projectile_path_fits_stage() {
        let points = crate::sim::projectile::ProjectileMotion::trajectory(30.0, 50.0, 9.8);
        let visual = LabVisual::from_state(&SimulationState::Projectile {
            trajectory_points: points.clone(),
            current_index: 4,
        });
        match visual {
            LabVisual::Projectile { path, ball } => {
                assert_eq!(path.len(), points.len());
                assert_eq!(ball, path[4]);
                for [x, y] in path {
                    assert!((0.0..=STAGE_WIDTH).contains(&x));
                    assert!((0.0..=STAGE_HEIGHT).contains(&y));
                }
            }
            other => panic!("Expected Projectile visual, got {other:?}"),
        }
    }

    #[test]
    fn indicator_turns_pink_at_endpoint() {
        assert_eq!(indicator_color(5.0, false)[0], 0.9);
        let pink = indicator_color(8.2, true);
        assert_eq!(pink[1], 0.41);
        assert!(indicator_color(14.0, true)[3] > pink[3]);
    }

    #[test]
    fn electrons_stay_on_loop() {
        for phase in [0.0, 1.0, 3.0, 6.2] {
            let es = electrons(phase);
            assert_eq!(es.len(), ELECTRON_COUNT);
            for [x, y] in es {
                let on_vertical = (x - 40.0).abs() < 1e-3 || (x - 360.0).abs() < 1e-3;
                let on_horizontal = (y - 40.0).abs() < 1e-3 || (y - 260.0).abs() < 1e-3;
                assert!(on_vertical || on_horizontal, "({x}, {y}) off the loop");
            }
        }
    }
}
