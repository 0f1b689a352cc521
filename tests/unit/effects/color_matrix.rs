use super::*;
use crate::effects::{dest_color, make_color};

const IDENTITY: [f32; 20] = [
    1.0, 0.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

fn matrix_with_offset(offset: [f32; 4]) -> [f32; 20] {
    let mut m = IDENTITY;
    for (i, o) in offset.into_iter().enumerate() {
        m[i * 5 + 4] = o;
    }
    m
}

#[test]
fn from_slice_validates_length_and_values() {
    assert!(ColorMatrix::from_slice(&IDENTITY, false, false, false).is_ok());
    assert!(ColorMatrix::from_slice(&IDENTITY[..19], false, false, false).is_err());
    let mut bad = IDENTITY;
    bad[3] = f32::NAN;
    assert!(ColorMatrix::from_slice(&bad, false, false, false).is_err());
}

#[test]
fn apply_adds_offset_and_clamps_alpha_only_by_default() {
    let cm = ColorMatrix::from_slice(&matrix_with_offset([0.5, 0.0, 0.0, 0.5]), false, false, false)
        .unwrap();
    let out = cm.apply(PmColor4f::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(out, PmColor4f::new(1.5, 0.0, 0.0, 1.0));

    let clamped = ColorMatrix { clamp_rgb_output: true, ..cm };
    assert_eq!(
        clamped.apply(PmColor4f::new(1.0, 0.0, 0.0, 1.0)),
        PmColor4f::new(1.0, 0.0, 0.0, 1.0)
    );
}

#[test]
fn unpremul_and_premul_round_trip_through_identity() {
    let cm = ColorMatrix::from_slice(&IDENTITY, true, true, true).unwrap();
    let c = PmColor4f::new(0.25, 0.125, 0.5, 0.5);
    assert_eq!(cm.apply(c), c);
    assert_eq!(cm.apply(PmColor4f::TRANSPARENT), PmColor4f::TRANSPARENT);
}

#[test]
fn columns_are_column_major() {
    let mut m = IDENTITY;
    m[1] = 7.0; // row 0, column 1
    let cm = ColorMatrix::from_slice(&m, false, false, false).unwrap();
    let cols = cm.columns();
    assert_eq!(cols[4], 7.0);
    assert_eq!(cols[1], 0.0);
    assert_eq!(cm.offset(), [0.0; 4]);
}

#[test]
fn color_matrix_without_child_transforms_the_input() {
    let cm = ColorMatrix::from_slice(&matrix_with_offset([0.0, 0.25, 0.0, 0.0]), false, false, false)
        .unwrap();
    let n = color_matrix(None, cm);
    assert_eq!(n.num_children(), 1);
    assert!(n.child(0).is_none());
    assert!(n.has_constant_output_for_constant_input());
    assert!(!n.preserves_opaque_input());
    assert_eq!(
        n.constant_output(PmColor4f::BLACK).unwrap(),
        PmColor4f::new(0.0, 0.25, 0.0, 1.0)
    );
}

#[test]
fn toggles_are_part_of_equality() {
    let a = color_matrix(None, ColorMatrix::from_slice(&IDENTITY, false, false, false).unwrap());
    let b = color_matrix(None, ColorMatrix::from_slice(&IDENTITY, false, true, false).unwrap());
    assert!(!a.is_equal(&b));
}

#[test]
fn clamp_factories_propagate_null_and_flags() {
    assert!(clamp_output(None).is_none());
    assert!(clamp_premul_output(None).is_none());

    let n = clamp_output(Some(make_color(PmColor4f::new(2.0, -1.0, 0.5, 1.0)))).unwrap();
    assert!(n.preserves_opaque_input());
    assert_eq!(
        n.constant_output(PmColor4f::WHITE).unwrap(),
        PmColor4f::new(1.0, 0.0, 0.5, 1.0)
    );

    let p = clamp_premul_output(Some(make_color(PmColor4f::new(0.8, 0.1, 0.0, 0.5)))).unwrap();
    assert_eq!(p.name(), "ClampPremul");
    assert_eq!(
        p.constant_output(PmColor4f::WHITE).unwrap(),
        PmColor4f::new(0.5, 0.1, 0.0, 0.5)
    );

    let dst = clamp_output(Some(dest_color())).unwrap();
    assert!(!dst.has_constant_output_for_constant_input());
    assert!(dst.will_read_dst_color());
}
