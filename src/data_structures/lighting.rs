//! Lamps and the per-draw lighting snapshot.

use cgmath::Vector3;

/// Hard ceiling on simultaneously active lights, matching the shader's
/// static uniform array size. Imports producing more lamps truncate to the
/// first `MAX_LIGHTS` encountered.
pub const MAX_LIGHTS: usize = 8;

/// A point light extracted from a scene file, reduced to position + color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lamp {
    pub position: Vector3<f32>,
    pub color: Vector3<f32>,
}

/// The lighting state uploaded alongside every draw: fixed-capacity light
/// arrays with an active-flag sentinel, one global ambient term and the
/// viewer position. Rebuilt every frame from live [`Lamp`] state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingInfo {
    pub light_pos: [[f32; 3]; MAX_LIGHTS],
    pub light_color: [[f32; 4]; MAX_LIGHTS],
    pub specular_strength: [f32; MAX_LIGHTS],
    pub light_active: [bool; MAX_LIGHTS],
    pub ambient_color: [f32; 4],
    pub ambient_strength: f32,
    pub view_pos: [f32; 3],
}

impl Default for LightingInfo {
    /// No active lights, white ambient at low strength, viewer at origin.
    fn default() -> Self {
        Self {
            light_pos: [[0.0; 3]; MAX_LIGHTS],
            light_color: [[0.0; 4]; MAX_LIGHTS],
            specular_strength: [0.0; MAX_LIGHTS],
            light_active: [false; MAX_LIGHTS],
            ambient_color: [1.0; 4],
            ambient_strength: 0.1,
            view_pos: [0.0; 3],
        }
    }
}

impl LightingInfo {
    /// Build a snapshot from live lamps and the current viewer position.
    ///
    /// Slots beyond the lamp count stay inactive; lamps beyond
    /// [`MAX_LIGHTS`] are dropped deterministically (first N kept).
    pub fn from_lamps(lamps: &[Lamp], specular_strength: f32, view_pos: Vector3<f32>) -> Self {
        let mut info = Self {
            view_pos: view_pos.into(),
            ..Self::default()
        };
        if lamps.len() > MAX_LIGHTS {
            log::warn!(
                "{} lamps exceed the {MAX_LIGHTS}-light ceiling, dropping the rest",
                lamps.len()
            );
        }
        for (slot, lamp) in lamps.iter().take(MAX_LIGHTS).enumerate() {
            info.light_pos[slot] = lamp.position.into();
            info.light_color[slot] = [lamp.color.x, lamp.color.y, lamp.color.z, 1.0];
            info.specular_strength[slot] = specular_strength;
            info.light_active[slot] = true;
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp(x: f32) -> Lamp {
        Lamp {
            position: Vector3::new(x, 0.0, 0.0),
            color: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn snapshot_marks_only_present_lamps_active() {
        let info = LightingInfo::from_lamps(&[lamp(1.0), lamp(2.0)], 0.5, Vector3::new(0.0, 0.0, 3.0));
        assert_eq!(info.light_active[..2], [true, true]);
        assert!(info.light_active[2..].iter().all(|active| !active));
        assert_eq!(info.light_pos[1], [2.0, 0.0, 0.0]);
        assert_eq!(info.specular_strength[0], 0.5);
        assert_eq!(info.view_pos, [0.0, 0.0, 3.0]);
    }

    #[test]
    fn snapshot_truncates_to_capacity() {
        let lamps: Vec<Lamp> = (0..MAX_LIGHTS + 3).map(|i| lamp(i as f32)).collect();
        let info = LightingInfo::from_lamps(&lamps, 0.5, Vector3::new(0.0, 0.0, 0.0));
        assert!(info.light_active.iter().all(|&active| active));
        assert_eq!(info.light_pos[MAX_LIGHTS - 1], [(MAX_LIGHTS - 1) as f32, 0.0, 0.0]);
    }
}
