//! Comprehensive test suite for eidolon_core.
//!
//! # Test Categories
//!
//! 1. **Vector and Color Types** - arithmetic, epsilon comparison, plane helpers
//! 2. **Rotations and Transforms** - inverses, matrix equivalence
//! 3. **Basis Functions** - partition of unity, node selection
//! 4. **Element Search** - tetrahedra and hexahedra
//! 5. **Ray Queries** - triangles, boxes, spheres
//! 6. **Slicing** - plane/hexahedron polygons
//! 7. **Curves and Spectra** - interpolation at ends and between points
//! 8. **Property-Based Tests**

use eidolon_core::prelude::*;
use eidolon_core::*;
use proptest::prelude::*;

// =============================================================================
// Test Helpers
// =============================================================================

fn assert_vec_close(a: Vec3, b: Vec3, tol: Real) {
    assert!(a.dist_to(b) <= tol, "{:?} != {:?} (tol {})", a, b, tol);
}

/// An irregular tetrahedron with positive volume.
fn skew_tet() -> [Vec3; 4] {
    [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(3.0, 1.5, 1.0),
        Vec3::new(1.5, 4.0, 1.2),
        Vec3::new(1.2, 1.7, 3.5),
    ]
}

// =============================================================================
// SECTION 1: Vector and Color Types
// =============================================================================

mod vec3_tests {
    use super::*;

    #[test]
    fn should_add_and_scale_componentwise() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::splat(3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn should_compare_with_epsilon() {
        let a = Vec3::new(1.0, 1.0, 1.0);
        assert!(a.approx_eq(a + Vec3::splat(1e-12)));
        assert!(!a.approx_eq(a + Vec3::splat(1e-6)));
    }

    #[test]
    fn should_compute_cross_product_right_handed() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
    }

    #[test]
    fn should_order_points_about_normal() {
        use core::cmp::Ordering;
        let o = Vec3::ZERO;
        assert_eq!(o.plane_order(Vec3::Z, Vec3::X, Vec3::Y), Ordering::Greater);
        assert_eq!(o.plane_order(Vec3::Z, Vec3::Y, Vec3::X), Ordering::Less);
    }

    #[test]
    fn should_measure_plane_distance_signed() {
        let d = Vec3::new(0.0, 0.0, -2.0).plane_dist(Vec3::ZERO, Vec3::Z);
        assert_eq!(d, -2.0);
    }

    #[test]
    fn should_convert_polar_both_ways() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_vec_close(v.to_polar().from_polar(), v, 1e-9);
        assert_vec_close(v.to_cylindrical().from_cylindrical(), v, 1e-9);
    }
}

mod color_tests {
    use super::*;

    #[test]
    fn should_default_to_opaque_white() {
        assert_eq!(Color::default(), Color::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn should_pack_rgba() {
        let c = Color::from_rgba(0xff00ffff);
        assert_eq!(c, Color::new(1.0, 0.0, 1.0, 1.0));
        assert_eq!(c.to_rgba(), 0xff00ffff);
    }

    #[test]
    fn should_clamp_interpolation_factor() {
        let a = Color::new(0.0, 0.0, 0.0, 1.0);
        let b = Color::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(a.interpolate(-1.0, &b), a);
        assert_eq!(a.interpolate(2.0, &b), b);
    }
}

// =============================================================================
// SECTION 2: Rotations and Transforms
// =============================================================================

mod transform_tests {
    use super::*;

    #[test]
    fn should_rotate_quarter_turn_about_z() {
        let r = Rotator::from_axis(Vec3::Z, PI / 2.0);
        assert_vec_close(r * Vec3::X, Vec3::Y, 1e-12);
        assert_vec_close(r.unrotate(Vec3::Y), Vec3::X, 1e-12);
    }

    #[test]
    fn should_rotate_from_to() {
        let from = Vec3::new(1.0, 1.0, 0.0).norm();
        let to = Vec3::new(0.0, 0.2, 1.0).norm();
        assert_vec_close(Rotator::from_to(from, to) * from, to, 1e-9);
    }

    #[test]
    fn should_match_matrix_form() {
        let t = Transform::from_euler(
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(2.0, 3.0, 0.5),
            0.4,
            -0.3,
            1.1,
        );
        let v = Vec3::new(0.3, -0.7, 2.0);
        assert_vec_close(t.to_matrix() * v, t * v, 1e-9);

        let inv = t.inverse();
        assert_vec_close(inv.to_matrix() * (t * v), v, 1e-9);
    }

    #[test]
    fn should_invert_matrix() {
        let t = Transform::from_euler(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(2.0), 0.1, 0.2, 0.3);
        let m = t.to_matrix();
        let inv = m.inverse().unwrap();
        let v = Vec3::new(-1.0, 0.5, 4.0);
        assert_vec_close(inv * (m * v), v, 1e-9);
    }

    #[test]
    fn should_reject_singular_matrix() {
        assert_eq!(Mat4::ZERO.inverse(), Err(CoreError::SingularMatrix));
    }
}

// =============================================================================
// SECTION 3: Basis Functions
// =============================================================================

mod basis_tests {
    use super::*;

    #[test]
    fn should_select_node_at_each_hex_corner() {
        for (i, c) in HEX_CORNERS.iter().enumerate() {
            let coeffs = hex1_linear(*c);
            assert_eq!(coeffs[i], 1.0);
            assert_eq!(coeffs.iter().sum::<Real>(), 1.0);
        }
    }

    #[test]
    fn should_share_cached_knots() {
        let a = default_knots(5, 3);
        let b = default_knots(5, 3);
        assert_eq!(a.len(), 9);
        assert_eq!(*a.last().unwrap(), 1.0);
        assert_eq!(&*a, &*b);
    }

    #[test]
    fn should_normalize_nurbs_tensor_basis() {
        let c = nurbs_default(Vec3::new(0.1, 0.9, 0.5), [3, 3, 3], [2, 2, 2]);
        assert!((c.iter().sum::<Real>() - 1.0).abs() < 1e-9);
    }
}

// =============================================================================
// SECTION 4: Element Search
// =============================================================================

mod search_tests {
    use super::*;

    #[test]
    fn should_find_vertex_xi() {
        let tet = skew_tet();
        assert_vec_close(point_in_tet(tet[0], &tet).unwrap(), Vec3::ZERO, 1e-12);
        assert_vec_close(point_in_tet(tet[1], &tet).unwrap(), Vec3::X, 1e-12);
        assert_vec_close(point_in_tet(tet[2], &tet).unwrap(), Vec3::Y, 1e-12);
        assert_vec_close(point_in_tet(tet[3], &tet).unwrap(), Vec3::Z, 1e-12);
    }

    #[test]
    fn should_find_centroid_with_quarter_weights() {
        let tet = skew_tet();
        let centroid = (tet[0] + tet[1] + tet[2] + tet[3]) / 4.0;
        let xi = point_in_tet(centroid, &tet).unwrap();
        for w in tet1_linear(xi) {
            assert!((w - 0.25).abs() < 1e-9);
        }
    }

    #[test]
    fn should_miss_point_outside_tet() {
        let tet = skew_tet();
        assert!(point_in_tet(Vec3::splat(10.0), &tet).is_none());
        assert!(point_in_tet(Vec3::new(2.9, 3.9, 3.4), &tet).is_none());
    }

    #[test]
    fn should_find_hex_centroid() {
        let nodes = HEX_CORNERS.map(|c| c * 3.0 + Vec3::new(1.0, 2.0, 3.0));
        let centroid = nodes.iter().fold(Vec3::ZERO, |a, n| a + *n) / 8.0;
        assert_vec_close(point_search_lin_hex(centroid, &nodes).unwrap(), Vec3::splat(0.5), 1e-9);
        assert!(point_in_hex(centroid, &nodes));
        assert!(!point_in_hex(Vec3::ZERO, &nodes));
    }
}

// =============================================================================
// SECTION 5: Ray Queries
// =============================================================================

mod ray_tests {
    use super::*;

    #[test]
    fn should_hit_triangle_from_above() {
        let ray = Ray::new(Vec3::new(0.33, 0.33, 1.0), -Vec3::Z).unwrap();
        let hit = ray.intersects_tri(Vec3::ZERO, Vec3::X, Vec3::Y).unwrap();
        assert!(hit.t > 0.0);
        assert!(hit.u + hit.v < 1.0);
        assert_vec_close(ray.position_at(hit.t), Vec3::new(0.33, 0.33, 0.0), 1e-12);
    }

    #[test]
    fn should_miss_triangle_beside_it() {
        let ray = Ray::new(Vec3::new(5.0, 5.0, 1.0), -Vec3::Z).unwrap();
        assert!(ray.intersects_tri(Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn should_reject_zero_direction() {
        assert_eq!(Ray::new(Vec3::ZERO, Vec3::ZERO), Err(CoreError::ZeroDirection));
    }

    #[test]
    fn should_pass_through_box_along_axis() {
        let ray = Ray::new(Vec3::new(0.5, 0.5, -1.0), Vec3::Z).unwrap();
        let (near, far) = ray.intersects_aabb(Vec3::ZERO, Vec3::splat(1.0)).unwrap();
        assert!((near - 1.0).abs() < 1e-12);
        assert!((far - 2.0).abs() < 1e-12);

        let offset = Ray::new(Vec3::new(2.0, 0.5, -1.0), Vec3::Z).unwrap();
        assert!(offset.intersects_aabb(Vec3::ZERO, Vec3::splat(1.0)).is_none());
    }

    #[test]
    fn should_cross_sphere_at_two_distances() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X).unwrap();
        let (near, far) = ray.intersects_sphere(Vec3::ZERO, 1.0);
        assert!((near - 4.0).abs() < 1e-12);
        assert!((far - 6.0).abs() < 1e-12);
    }

    #[test]
    fn should_transform_ray() {
        let t = Transform::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::splat(1.0),
            Rotator::IDENTITY,
            false,
        );
        let ray = t.apply_ray(&Ray::new(Vec3::ZERO, Vec3::X).unwrap()).unwrap();
        assert_eq!(ray.position(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(ray.direction(), Vec3::X);
    }
}

// =============================================================================
// SECTION 6: Slicing
// =============================================================================

mod slice_tests {
    use super::*;

    #[test]
    fn should_slice_unit_cube_center_into_quad() {
        let pts = hex_plane_slice(Vec3::splat(0.5), Vec3::Z, &HEX_CORNERS);
        assert_eq!(pts.len(), 4);
        let expected = [
            Vec3::new(0.0, 0.0, 0.5),
            Vec3::new(1.0, 0.0, 0.5),
            Vec3::new(1.0, 1.0, 0.5),
            Vec3::new(0.0, 1.0, 0.5),
        ];
        assert_eq!(pts.as_slice(), &expected);
    }

    #[test]
    fn should_find_nothing_for_out_of_range_value() {
        let vals = HEX_CORNERS.map(|c| c.y);
        assert!(hex_value_intersects(2.0, &vals).is_empty());
        assert_eq!(tet_value_intersects(5.0, [0.0, 1.0, 2.0, 3.0]), [None; 6]);
    }
}

// =============================================================================
// SECTION 7: Curves and Spectra
// =============================================================================

mod curve_spectrum_tests {
    use super::*;

    #[test]
    fn should_return_end_colors_beyond_range() {
        let mut s = Spectrum::new("rg");
        s.add(0.2, Color::new(1.0, 0.0, 0.0, 1.0));
        s.add(0.8, Color::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(s.interpolate_color(0.0), Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(s.interpolate_color(1.0), Color::new(0.0, 1.0, 0.0, 1.0));
        assert!(s.interpolate_color(0.5).approx_eq(&Color::new(0.5, 0.5, 0.0, 1.0)));
    }

    #[test]
    fn should_blend_three_entries_piecewise() {
        let mut s = Spectrum::new("rgb");
        s.add(0.0, Color::new(1.0, 0.0, 0.0, 1.0));
        s.add(0.5, Color::new(0.0, 1.0, 0.0, 1.0));
        s.add(1.0, Color::new(0.0, 0.0, 1.0, 1.0));
        assert!(s.interpolate_color(0.75).approx_eq(&Color::new(0.0, 0.5, 0.5, 1.0)));
    }

    #[test]
    fn should_take_alpha_from_curve() {
        let mut s = Spectrum::new("fade");
        s.add(0.0, Color::new(1.0, 1.0, 1.0, 1.0));
        s.set_alpha_curve(&[Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
        s.set_linear_alpha(true);
        assert!((s.interpolate_color(0.25).a - 0.75).abs() < 1e-6);
    }

    #[test]
    fn should_evaluate_vec3_curve_through_points() {
        let pts = [
            Vec3::ZERO,
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 1.0, -1.0),
            Vec3::new(4.0, 4.0, 4.0),
        ];
        let c = ControlCurve::from_points(&pts);
        assert_vec_close(c.at(0.0).unwrap(), pts[0], 1e-12);
        assert_vec_close(c.at(1.0).unwrap(), pts[3], 1e-12);
        assert_vec_close(c.at(1.0 / 3.0).unwrap(), pts[1], 1e-9);
    }
}

// =============================================================================
// SECTION 8: Property-Based Tests
// =============================================================================

mod property_tests {
    use super::*;

    fn unit() -> impl Strategy<Value = Real> {
        0.01f64..0.99
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_tet_search_recovers_xi(a in unit(), b in unit(), c in unit()) {
            // scale into the simplex
            let s = a + b + c;
            let xi = if s < 1.0 { Vec3::new(a, b, c) } else { Vec3::new(a, b, c) / (s * 1.01) };
            let tet = skew_tet();
            let pt = apply_basis(&tet1_linear(xi), &tet);

            let found = point_in_tet(pt, &tet);
            prop_assert!(found.is_some());
            prop_assert!(found.unwrap().dist_to(xi) < 1e-9);
        }

        #[test]
        fn prop_hex_search_recovers_xi(a in unit(), b in unit(), c in unit()) {
            let nodes = HEX_CORNERS.map(|n| n * Vec3::new(2.0, 0.5, 1.5) + Vec3::new(-1.0, 4.0, 0.0));
            let xi = Vec3::new(a, b, c);
            let pt = apply_basis(&hex1_linear(xi), &nodes);

            let found = point_search_lin_hex(pt, &nodes);
            prop_assert!(found.is_some());
            prop_assert!(found.unwrap().dist_to(xi) < 1e-9);
        }

        #[test]
        fn prop_rotation_preserves_length(x in -10.0f64..10.0, y in -10.0f64..10.0, z in -10.0f64..10.0, ang in -6.0f64..6.0) {
            let r = Rotator::from_axis(Vec3::new(1.0, -2.0, 0.5), ang);
            let v = Vec3::new(x, y, z);
            prop_assert!(((r * v).len() - v.len()).abs() < 1e-9);
            prop_assert!(r.unrotate(r * v).dist_to(v) < 1e-9);
        }

        #[test]
        fn prop_slice_points_lie_on_plane(px in unit(), py in unit(), pz in unit(), nx in -1.0f64..1.0, ny in -1.0f64..1.0) {
            let pt = Vec3::new(px, py, pz);
            let norm = Vec3::new(nx, ny, 1.0).norm();
            let pts = hex_plane_slice(pt, norm, &HEX_CORNERS);
            prop_assert!(pts.len() >= 3);
            for p in pts.iter() {
                prop_assert!(p.plane_dist(pt, norm).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_spectrum_channels_stay_between_ends(pos in -1.0f64..2.0) {
            let mut s = Spectrum::new("bw");
            s.add(0.0, Color::new(0.0, 0.0, 0.0, 1.0));
            s.add(1.0, Color::new(1.0, 1.0, 1.0, 1.0));
            let c = s.interpolate_color(pos);
            prop_assert!((0.0..=1.0).contains(&c.r));
            prop_assert_eq!(c.r, c.g);
            prop_assert_eq!(c.a, 1.0);
        }
    }
}
