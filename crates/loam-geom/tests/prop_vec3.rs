use loam_geom::{Aabb, Vec3};
use proptest::num::f32::NORMAL;
use proptest::prelude::*;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vapprox(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx(a.x, b.x, eps) && approx(a.y, b.y, eps) && approx(a.z, b.z, eps)
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e4)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn add_commutative(a in arb_vec3(), b in arb_vec3()) {
        prop_assert!(vapprox(a + b, b + a, 1e-4));
    }

    // cross(a, b) is orthogonal to both inputs
    #[test]
    fn cross_orthogonal(a in arb_vec3(), b in arb_vec3()) {
        let c = a.cross(b);
        let scale = (a.length() * b.length()).max(1.0);
        prop_assert!(approx(c.dot(a) / scale, 0.0, 1e-2));
        prop_assert!(approx(c.dot(b) / scale, 0.0, 1e-2));
    }

    #[test]
    fn sub_then_add_round_trips(a in arb_vec3(), b in arb_vec3()) {
        prop_assert!(vapprox((a - b) + b, a, 1e-2));
    }

    #[test]
    fn aabb_contains_its_corners(a in arb_vec3(), b in arb_vec3()) {
        let min = Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let max = Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        let bb = Aabb::new(min, max);
        prop_assert!(bb.contains(min));
        prop_assert!(bb.contains(max));
    }
}
