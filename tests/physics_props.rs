//! Property tests for the point and spring primitives

use glam::DVec3;
use proptest::prelude::*;

use spring_wheel::sim::{MassPoint, PointId, Spring, SpringKind};

fn vec3(range: std::ops::Range<f64>) -> impl Strategy<Value = DVec3> {
    (range.clone(), range.clone(), range).prop_map(|(x, y, z)| DVec3::new(x, y, z))
}

proptest! {
    #[test]
    fn acceleration_is_additive(
        mass in 0.1f64..1.0e6,
        forces in prop::collection::vec(vec3(-1000.0..1000.0), 1..8),
    ) {
        let mut p = MassPoint::new(DVec3::ZERO, mass, 0.05);
        p.reset_acceleration();
        for f in &forces {
            p.apply_acceleration(*f);
        }
        let expected = forces.iter().copied().sum::<DVec3>() / mass;
        let tolerance = 1e-9 * (1.0 + expected.length());
        prop_assert!((p.acceleration() - expected).length() < tolerance);
    }

    #[test]
    fn damping_never_inverts_or_amplifies(
        v in vec3(-100.0..100.0),
        gain in 0.0f64..10.0,
        dt in 0.0f64..100.0,
    ) {
        let mut p = MassPoint::with_defaults(DVec3::ZERO);
        p.velocity = v;
        p.apply_damping(gain, dt);
        prop_assert!(p.velocity.x * v.x >= 0.0);
        prop_assert!(p.velocity.y * v.y >= 0.0);
        prop_assert!(p.velocity.z * v.z >= 0.0);
        prop_assert!(p.velocity.length() <= v.length() * (1.0 + 1e-12));
    }

    #[test]
    fn spring_forces_are_equal_and_opposite(
        a in vec3(-1.0..1.0),
        b in vec3(-1.0..1.0),
        rest in 0.01f64..2.0,
        k in 0.0f64..1000.0,
    ) {
        let mut points = vec![
            MassPoint::new(a, 1.0, 0.05),
            MassPoint::new(b, 1.0, 0.05),
        ];
        let spring = Spring::new(&points, PointId(0), PointId(1), rest, k, SpringKind::Rim);
        let distance = (b - a).length();
        spring.apply_force(&mut points);

        let f_a = points[0].acceleration();
        let f_b = points[1].acceleration();
        prop_assert!(f_a.is_finite() && f_b.is_finite());
        prop_assert!((f_a + f_b).length() < 1e-9);
        if distance > 1e-9 {
            let expected = k * (distance - rest).abs();
            prop_assert!((f_a.length() - expected).abs() < 1e-9 * (1.0 + expected));
        }
    }
}
