//! Procedural grave placement.

use std::f32::consts::TAU;

use cgmath::Vector3;
use rand::Rng;

use crate::config::GraveConfig;

/// One grave, as sampled. Graves never move after placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraveMarker {
    pub angle: f32,
    pub radius: f32,
    pub position: Vector3<f32>,
    pub rotation_y: f32,
    pub rotation_z: f32,
}

/// Scatters `config.count` graves over the annulus
/// `[min_radius, min_radius + radius_span)` around the origin.
///
/// Graves may overlap; there is no spacing check.
pub fn place_graves<R: Rng + ?Sized>(rng: &mut R, config: &GraveConfig) -> Vec<GraveMarker> {
    (0..config.count)
        .map(|_| {
            let angle = rng.random::<f32>() * TAU;
            let radius = config.min_radius + rng.random::<f32>() * config.radius_span;
            let rotation_z = (rng.random::<f32>() - 0.5) * config.tilt;
            let rotation_y = (rng.random::<f32>() - 0.5) * config.tilt;

            GraveMarker {
                angle,
                radius,
                position: Vector3::new(angle.cos() * radius, config.height, angle.sin() * radius),
                rotation_y,
                rotation_z,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn sample(seed: u64) -> Vec<GraveMarker> {
        let mut rng = StdRng::seed_from_u64(seed);
        place_graves(&mut rng, &GraveConfig::default())
    }

    #[test]
    fn test_places_requested_count() {
        assert_eq!(sample(1).len(), 50);

        let config = GraveConfig {
            count: 7,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(place_graves(&mut rng, &config).len(), 7);
    }

    #[test]
    fn test_graves_stay_inside_annulus() {
        for seed in 0..20 {
            for grave in sample(seed) {
                assert!((3.0..13.0).contains(&grave.radius), "{grave:?}");
                assert!((0.0..TAU).contains(&grave.angle), "{grave:?}");

                let distance = (grave.position.x.powi(2) + grave.position.z.powi(2)).sqrt();
                assert!((distance - grave.radius).abs() < 1e-4, "{grave:?}");
            }
        }
    }

    #[test]
    fn test_graves_sit_at_fixed_height() {
        for grave in sample(3) {
            assert_eq!(grave.position.y, 0.3);
        }
    }

    #[test]
    fn test_tilt_is_bounded() {
        for seed in 0..20 {
            for grave in sample(seed) {
                assert!((-0.2..0.2).contains(&grave.rotation_y), "{grave:?}");
                assert!((-0.2..0.2).contains(&grave.rotation_z), "{grave:?}");
            }
        }
    }

    #[test]
    fn test_same_seed_reproduces_layout() {
        assert_eq!(sample(99), sample(99));
        assert_ne!(sample(99), sample(100));
    }
}
