//! Ghost light trajectories.
//!
//! Each ghost circles the house on a closed-form path. Positions depend only on
//! elapsed time, so nothing is accumulated between frames and any frame can be
//! reproduced from its timestamp alone.

use cgmath::Vector3;

/// Horizontal radius of an orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitRadius {
    /// Constant radius; the path is a circle.
    Fixed(f32),
    /// The x and z radii each oscillate around `base` by one unit.
    Breathing {
        base: f32,
        x_frequency: f32,
        z_frequency: f32,
    },
}

impl OrbitRadius {
    /// Returns the `(x, z)` radii at time `t`.
    pub fn at(&self, t: f32) -> (f32, f32) {
        match *self {
            OrbitRadius::Fixed(radius) => (radius, radius),
            OrbitRadius::Breathing {
                base,
                x_frequency,
                z_frequency,
            } => (
                base + (t * x_frequency).sin(),
                base + (t * z_frequency).sin(),
            ),
        }
    }
}

/// Time-parameterised path followed by one ghost light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostOrbit {
    /// Radians per second; negative speeds orbit clockwise seen from above.
    pub angular_speed: f32,
    pub radius: OrbitRadius,
    /// Height is the sum of `sin(t * f)` over these frequencies.
    pub bob_frequencies: &'static [f32],
}

impl GhostOrbit {
    pub fn position_at(&self, t: f32) -> Vector3<f32> {
        let angle = t * self.angular_speed;
        let (radius_x, radius_z) = self.radius.at(t);
        let height: f32 = self
            .bob_frequencies
            .iter()
            .map(|frequency| (t * frequency).sin())
            .sum();

        Vector3::new(angle.cos() * radius_x, height, angle.sin() * radius_z)
    }
}

/// Computes every ghost position for elapsed time `t` in seconds.
pub fn step<const N: usize>(orbits: &[GhostOrbit; N], t: f32) -> [Vector3<f32>; N] {
    std::array::from_fn(|i| orbits[i].position_at(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    fn orbits() -> [GhostOrbit; 3] {
        SceneConfig::default().ghosts.map(|ghost| ghost.orbit)
    }

    fn assert_close(actual: Vector3<f32>, expected: [f32; 3]) {
        let eps = 1e-5;
        assert!(
            (actual.x - expected[0]).abs() < eps
                && (actual.y - expected[1]).abs() < eps
                && (actual.z - expected[2]).abs() < eps,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn test_positions_at_time_zero() {
        let [ghost1, ghost2, ghost3] = step(&orbits(), 0.0);

        assert_close(ghost1, [4.0, 0.0, 0.0]);
        assert_close(ghost2, [5.0, 0.0, 0.0]);
        assert_close(ghost3, [7.0, 0.0, 0.0]);
    }

    #[test]
    fn test_first_ghost_stays_on_circle() {
        let orbits = orbits();
        for i in 0..2000 {
            let t = i as f32 * 0.037;
            let position = orbits[0].position_at(t);
            let radius_sq = position.x * position.x + position.z * position.z;
            assert!((radius_sq - 16.0).abs() < 1e-3, "t={t}: {radius_sq}");
        }
    }

    #[test]
    fn test_third_ghost_radii_stay_within_band() {
        let orbit = orbits()[2];
        for i in 0..5000 {
            let t = i as f32 * 0.05;
            let (radius_x, radius_z) = orbit.radius.at(t);
            assert!((6.0..=8.0).contains(&radius_x), "t={t}: {radius_x}");
            assert!((6.0..=8.0).contains(&radius_z), "t={t}: {radius_z}");
        }
    }

    #[test]
    fn test_heights_follow_bob_frequencies() {
        let [ghost1, ghost2, ghost3] = step(&orbits(), 1.3);

        assert!((ghost1.y - (1.3f32 * 3.0).sin()).abs() < 1e-5);
        let expected = (1.3f32 * 4.0).sin() + (1.3f32 * 2.5).sin();
        assert!((ghost2.y - expected).abs() < 1e-5);
        assert!((ghost3.y - expected).abs() < 1e-5);
    }

    #[test]
    fn test_second_ghost_orbits_clockwise() {
        let orbit = orbits()[1];
        // a quarter turn backwards lands on negative z
        let t = std::f32::consts::FRAC_PI_2 / 0.32;
        let position = orbit.position_at(t);

        assert!(position.x.abs() < 1e-4);
        assert!((position.z + 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_step_is_a_pure_function_of_time() {
        let orbits = orbits();
        assert_eq!(step(&orbits, 42.5), step(&orbits, 42.5));
    }
}
