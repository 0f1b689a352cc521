use super::*;

#[test]
fn premul_and_unpremul_are_inverse_for_nonzero_alpha() {
    let c = Color4f::new(0.5, 0.25, 1.0, 0.5);
    let pm = c.premul();
    assert_eq!(pm, PmColor4f::new(0.25, 0.125, 0.5, 0.5));
    assert_eq!(pm.unpremul(), c);
}

#[test]
fn transparent_unpremuls_to_black() {
    assert_eq!(
        PmColor4f::TRANSPARENT.unpremul(),
        Color4f::new(0.0, 0.0, 0.0, 0.0)
    );
}

#[test]
fn equality_is_bitwise_and_reflexive_for_nan() {
    let nan = PmColor4f::new(f32::NAN, 0.0, 0.0, 1.0);
    assert_eq!(nan, nan);
    assert_ne!(
        PmColor4f::new(0.0, 0.0, 0.0, 1.0),
        PmColor4f::new(-0.0, 0.0, 0.0, 1.0)
    );
}

#[test]
fn try_from_array_rejects_non_finite() {
    assert!(PmColor4f::try_from_array([0.0, f32::INFINITY, 0.0, 1.0]).is_err());
    assert!(PmColor4f::try_from_array([0.0, 0.5, 0.0, 1.0]).is_ok());
}

#[test]
fn saturate_clamps_every_channel() {
    let c = PmColor4f::new(-1.0, 2.0, 0.5, 1.5).saturate();
    assert_eq!(c, PmColor4f::new(0.0, 1.0, 0.5, 1.0));
}

#[test]
fn matrix_perspective_detection() {
    assert!(!Matrix3::IDENTITY.has_perspective());
    let m = Matrix3::new([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.001, 0.0, 1.0]);
    assert!(m.has_perspective());
}

#[test]
fn matrix_from_affine_translates() {
    let m = Matrix3::from(kurbo::Affine::translate((10.0, -2.0)));
    assert!(!m.has_perspective());
    assert_eq!(m.map_point([1.0, 1.0]), [11.0, -1.0]);
}
