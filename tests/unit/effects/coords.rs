use super::*;
use crate::effects::make_color;
use crate::node::flags::Capabilities;

fn grad() -> Box<EffectNode> {
    linear_gradient([0.0, 0.0], [10.0, 0.0], PmColor4f::BLACK, PmColor4f::WHITE)
}

#[test]
fn gradient_reads_coords_directly() {
    let g = grad();
    assert!(g.uses_coords_directly());
    assert!(!g.has_constant_output_for_constant_input());
    assert!(g.preserves_opaque_input());

    let translucent = linear_gradient(
        [0.0, 0.0],
        [1.0, 0.0],
        PmColor4f::TRANSPARENT,
        PmColor4f::WHITE,
    );
    assert!(!translucent.preserves_opaque_input());
}

#[test]
fn device_space_samples_explicitly_and_requests_frag_coord() {
    assert!(device_space(None).is_none());
    let n = device_space(Some(grad())).unwrap();
    assert!(n.child(0).unwrap().sample_usage().is_explicit());
    assert!(n.requested_capabilities().contains(Capabilities::FRAG_COORD));
    assert!(!n.has_constant_output_for_constant_input());
}

#[test]
fn matrix_effect_keeps_child_flags() {
    assert!(matrix_effect(None, Matrix3::IDENTITY).is_none());

    let n = matrix_effect(Some(make_color(PmColor4f::WHITE)), Matrix3::IDENTITY).unwrap();
    assert!(n.has_constant_output_for_constant_input());
    assert!(n.preserves_opaque_input());
    assert_eq!(
        n.constant_output(PmColor4f::BLACK).unwrap(),
        PmColor4f::WHITE
    );
}

#[test]
fn matrix_effect_propagates_coords_upward() {
    let n = matrix_effect(Some(grad()), Matrix3::from(kurbo::Affine::scale(2.0))).unwrap();
    assert!(n.uses_coords_indirectly());
    assert!(!n.child(0).unwrap().has_perspective_transform());
}

#[test]
fn perspective_is_part_of_the_key_not_the_matrix() {
    let affine_a = matrix_effect(Some(grad()), Matrix3::IDENTITY).unwrap();
    let affine_b =
        matrix_effect(Some(grad()), Matrix3::from(kurbo::Affine::translate((3.0, 4.0)))).unwrap();
    let persp = matrix_effect(
        Some(grad()),
        Matrix3::new([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0]),
    )
    .unwrap();

    let key = |n: &EffectNode| crate::codegen::key::ProgramKey::of(n);
    assert_eq!(key(&affine_a), key(&affine_b));
    assert_ne!(key(&affine_a), key(&persp));
    assert!(!affine_a.is_equal(&affine_b));
}

#[test]
fn gradient_with_nan_point_equals_itself() {
    let g = linear_gradient([f32::NAN, 0.0], [1.0, 1.0], PmColor4f::BLACK, PmColor4f::WHITE);
    assert!(g.is_equal(&g));
    assert!(g.is_equal(&g.clone_boxed()));

    let other = linear_gradient([0.0, 0.0], [1.0, 1.0], PmColor4f::BLACK, PmColor4f::WHITE);
    assert!(!g.is_equal(&other));
}

#[test]
fn device_space_keeps_child_flags_and_evaluates_through() {
    let c = PmColor4f::new(0.25, 0.5, 0.0, 1.0);
    let n = device_space(Some(make_color(c))).unwrap();
    assert!(n.has_constant_output_for_constant_input());
    assert!(n.preserves_opaque_input());
    assert_eq!(n.constant_output(PmColor4f::TRANSPARENT).unwrap(), c);
}

#[test]
fn composition_folds_through_device_space() {
    let c = PmColor4f::new(0.25, 0.5, 0.0, 1.0);
    let gray = PmColor4f::new(0.5, 0.5, 0.5, 0.5);
    let f = crate::effects::modulate_rgba(None, gray);
    let expected = f.constant_output(c).unwrap();

    let g = device_space(Some(make_color(c)));
    let n = crate::effects::compose(Some(f), g).unwrap();
    assert_eq!(n.class_id(), crate::foundation::ids::ClassId::Color);
    assert_eq!(n.num_children(), 0);
    assert_eq!(n.constant_output(PmColor4f::WHITE).unwrap(), expected);
}
