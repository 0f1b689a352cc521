use super::*;
use crate::effects::dest_color;
use crate::foundation::ids::ClassId;

fn c(r: f32, g: f32, b: f32, a: f32) -> PmColor4f {
    PmColor4f::new(r, g, b, a)
}

fn behavior_of(n: &EffectNode) -> BlendBehavior {
    match n.kind() {
        EffectKind::Blend { behavior, .. } => *behavior,
        other => panic!("expected a blend, got {other:?}"),
    }
}

#[test]
fn trivial_modes_short_circuit() {
    let cleared = blend(Some(dest_color()), None, BlendMode::Clear, BlendBehavior::Default).unwrap();
    assert_eq!(cleared.class_id(), ClassId::Color);
    assert_eq!(
        cleared.constant_output(PmColor4f::WHITE).unwrap(),
        PmColor4f::TRANSPARENT
    );

    let src = make_color(PmColor4f::WHITE);
    let src_id = src.id();
    let out = blend(Some(src), Some(dest_color()), BlendMode::Src, BlendBehavior::Default).unwrap();
    assert_eq!(out.id(), src_id);

    assert!(blend(Some(dest_color()), None, BlendMode::Dst, BlendBehavior::Default).is_none());
}

#[test]
fn default_behavior_resolves_by_operand_presence() {
    let two = blend(
        Some(make_color(PmColor4f::WHITE)),
        Some(dest_color()),
        BlendMode::SrcOver,
        BlendBehavior::Default,
    )
    .unwrap();
    assert_eq!(behavior_of(&two), BlendBehavior::ComposeTwo);

    let one = blend(None, Some(dest_color()), BlendMode::SrcOver, BlendBehavior::Default).unwrap();
    assert_eq!(behavior_of(&one), BlendBehavior::ComposeOne);

    let none = blend(None, None, BlendMode::SrcOver, BlendBehavior::Default).unwrap();
    assert_eq!(behavior_of(&none), BlendBehavior::SkMode);
    assert_eq!(none.num_children(), 2);
    assert_eq!(none.num_non_null_children(), 0);
}

#[test]
fn compose_two_scales_by_input_alpha() {
    let n = blend(
        Some(make_color(c(0.0, 0.0, 0.5, 0.5))),
        Some(make_color(PmColor4f::WHITE)),
        BlendMode::SrcOver,
        BlendBehavior::Default,
    )
    .unwrap();
    let out = n.constant_output(c(0.5, 0.5, 0.5, 0.5)).unwrap();
    assert_eq!(out, c(0.25, 0.25, 0.5, 0.5));
}

#[test]
fn mul_child_by_input_alpha_scales_child() {
    assert!(mul_child_by_input_alpha(None).is_none());
    let n = mul_child_by_input_alpha(Some(make_color(c(1.0, 0.0, 0.0, 1.0)))).unwrap();
    assert_eq!(
        n.constant_output(c(0.0, 0.0, 0.5, 0.5)).unwrap(),
        c(0.5, 0.0, 0.0, 0.5)
    );
}

#[test]
fn mul_input_by_child_alpha_scales_input() {
    assert!(mul_input_by_child_alpha(None).is_none());
    let n = mul_input_by_child_alpha(Some(make_color(c(0.0, 0.0, 0.0, 0.25)))).unwrap();
    assert_eq!(
        n.constant_output(PmColor4f::WHITE).unwrap(),
        c(0.25, 0.25, 0.25, 0.25)
    );
}

#[test]
fn modulate_helpers_use_the_input_when_absent() {
    let color = c(0.5, 0.5, 0.0, 0.5);
    let input = c(0.5, 1.0, 1.0, 0.5);

    let rgba = modulate_rgba(None, color);
    assert_eq!(rgba.constant_output(input).unwrap(), c(0.25, 0.5, 0.0, 0.25));

    let alpha = modulate_alpha(None, color);
    assert_eq!(alpha.constant_output(input).unwrap(), c(0.25, 0.25, 0.0, 0.25));
}

#[test]
fn modulate_alpha_with_child_samples_child_with_input() {
    let n = modulate_alpha(Some(make_color(c(0.0, 0.0, 0.0, 0.5))), PmColor4f::WHITE);
    assert_eq!(n.num_non_null_children(), 2);
    assert_eq!(
        n.constant_output(PmColor4f::BLACK).unwrap(),
        c(0.5, 0.5, 0.5, 0.5)
    );
}

#[test]
fn opacity_flags_follow_the_mode() {
    let over = blend(
        Some(make_color(PmColor4f::WHITE)),
        Some(dest_color()),
        BlendMode::SrcOver,
        BlendBehavior::SkMode,
    )
    .unwrap();
    assert!(over.preserves_opaque_input());
    assert!(!over.has_constant_output_for_constant_input());

    let xor = blend(
        Some(make_color(PmColor4f::WHITE)),
        Some(make_color(PmColor4f::BLACK)),
        BlendMode::Xor,
        BlendBehavior::SkMode,
    )
    .unwrap();
    assert!(!xor.preserves_opaque_input());
    assert!(xor.has_constant_output_for_constant_input());
}

#[test]
fn dst_read_reaches_the_blend() {
    let n = mul_child_by_input_alpha(Some(dest_color())).unwrap();
    assert!(n.will_read_dst_color());
}

#[test]
fn cpu_modes_match_porter_duff() {
    let s = c(0.5, 0.0, 0.0, 0.5);
    let d = c(0.0, 0.0, 1.0, 1.0);
    assert_eq!(BlendMode::SrcOver.apply(s, d), c(0.5, 0.0, 0.5, 1.0));
    assert_eq!(BlendMode::DstOver.apply(s, d), d);
    assert_eq!(BlendMode::SrcIn.apply(s, d), s);
    assert_eq!(BlendMode::DstOut.apply(s, d), c(0.0, 0.0, 0.5, 0.5));
    assert_eq!(BlendMode::Plus.apply(d, d), d);
}
