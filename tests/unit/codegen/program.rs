use super::*;
use crate::codegen::builder::UniformType;
use crate::effects::{
    BlendBehavior, BlendMode, blend, dest_color, device_space, linear_gradient, make_color,
    override_input, premul_and_mul_by_output,
};
use crate::foundation::core::PmColor4f;

fn red() -> PmColor4f {
    PmColor4f::new(1.0, 0.0, 0.0, 1.0)
}

#[test]
fn mirror_has_matching_shape() {
    let tree = blend(None, Some(make_color(red())), BlendMode::SrcOver, BlendBehavior::SkMode)
        .unwrap();
    let m = tree.make_program_impl();
    assert_eq!(m.class_id(), ClassId::Blend);
    assert_eq!(m.num_children(), 2);
    assert!(m.child(0).is_none());
    assert_eq!(m.child(1).unwrap().class_id(), ClassId::Color);
    assert!(m.function_name().is_none());
}

#[test]
fn children_are_emitted_before_parents() {
    let tree = premul_and_mul_by_output(Some(make_color(red()))).unwrap();
    let program = build_program(&tree, &ProgramOpts::default()).unwrap();

    let leaf = program.source.find("fn fp0(").unwrap();
    let root = program.source.find("fn fp1(").unwrap();
    assert!(leaf < root);
    assert!(program.source.contains("fp0(vec4<f32>(1.0), _coords)"));
    assert!(program.source.contains("fn main_color(_input: vec4<f32>, _coords: vec2<f32>)"));
    assert!(program.source.contains("return fp1(_input, _coords);"));
    assert_eq!(program.program_impl().function_name(), Some("fp1"));
    assert_eq!(program.entry_point, "main_color");
}

#[test]
fn uniforms_are_declared_and_filled() {
    let tree = premul_and_mul_by_output(Some(make_color(red()))).unwrap();
    let program = build_program(&tree, &ProgramOpts::default()).unwrap();

    assert_eq!(program.uniforms.len(), 1);
    assert_eq!(program.uniforms[0].name, "fp0_color");
    assert_eq!(program.uniforms[0].ty, UniformType::Vec4);
    assert!(program.source.contains("@group(0) @binding(0) var<uniform> u: Uniforms;"));
    assert!(program.source.contains("return u.fp0_color;"));

    let data = program.uniform_data(&tree).unwrap();
    assert_eq!(data.get("fp0_color"), Some(&[1.0, 0.0, 0.0, 1.0][..]));
}

#[test]
fn uniform_data_follows_leaf_updates() {
    let mut tree = premul_and_mul_by_output(Some(make_color(red()))).unwrap();
    let program = build_program(&tree, &ProgramOpts::default()).unwrap();

    tree.child_mut(0)
        .unwrap()
        .set_literal_color(PmColor4f::WHITE)
        .unwrap();
    let data = program.uniform_data(&tree).unwrap();
    assert_eq!(data.get("fp0_color"), Some(&[1.0, 1.0, 1.0, 1.0][..]));
}

#[test]
fn uniform_data_rejects_a_different_tree() {
    let tree = premul_and_mul_by_output(Some(make_color(red()))).unwrap();
    let program = build_program(&tree, &ProgramOpts::default()).unwrap();
    let other = make_color(red());
    assert!(matches!(
        program.uniform_data(&other),
        Err(FxError::Codegen(_))
    ));
}

#[test]
fn specialized_override_input_is_a_literal() {
    let tree = override_input(Some(dest_color()), red(), false).unwrap();
    let program = build_program(&tree, &ProgramOpts::default()).unwrap();
    assert!(program.uniforms.is_empty());
    assert!(program.source.contains("fp0(vec4<f32>(1.0, 0.0, 0.0, 1.0), _coords)"));
    assert!(program.source.contains("var<private> sk_dst_color: vec4<f32>;"));
}

#[test]
fn dst_reads_can_be_disallowed() {
    let tree = dest_color();
    let opts = ProgramOpts {
        allow_dst_read: false,
        ..ProgramOpts::default()
    };
    assert!(matches!(
        build_program(&tree, &opts),
        Err(FxError::Codegen(_))
    ));
}

#[test]
fn device_space_declares_frag_coord() {
    let grad = linear_gradient([0.0, 0.0], [1.0, 0.0], PmColor4f::BLACK, PmColor4f::WHITE);
    let tree = device_space(Some(grad)).unwrap();
    let program = build_program(&tree, &ProgramOpts::default()).unwrap();
    assert!(program.source.contains("var<private> sk_frag_coord: vec4<f32>;"));
    assert!(program.source.contains("fp0(_input, sk_frag_coord.xy)"));

    let data = program.uniform_data(&tree).unwrap();
    assert_eq!(data.len(), 4);
    assert_eq!(data.get("fp0_end"), Some(&[1.0, 0.0][..]));
}

#[test]
fn emitting_against_a_different_shape_fails() {
    let a = premul_and_mul_by_output(Some(make_color(red()))).unwrap();
    let b = premul_and_mul_by_output(Some(dest_color())).unwrap();
    let mut mirror = a.make_program_impl();
    let mut builder = ShaderBuilder::new(ProgramOpts::default());
    assert!(matches!(
        mirror.emit(&b, &mut builder),
        Err(FxError::Codegen(_))
    ));
}

#[test]
fn set_data_requires_emission() {
    let tree = make_color(red());
    let mirror = tree.make_program_impl();
    let mut data = UniformData::default();
    assert!(mirror.set_data(&tree, &mut data).is_err());
}

#[test]
fn invalid_entry_point_is_rejected() {
    let opts = ProgramOpts {
        entry_point: "fp3".to_string(),
        ..ProgramOpts::default()
    };
    assert!(matches!(
        build_program(&make_color(red()), &opts),
        Err(FxError::Validation(_))
    ));
}

#[test]
fn declarations_follow_options() {
    let grad = linear_gradient([0.0, 0.0], [1.0, 0.0], PmColor4f::BLACK, PmColor4f::WHITE);
    let tree = blend(
        device_space(Some(grad)),
        Some(dest_color()),
        BlendMode::SrcOver,
        BlendBehavior::SkMode,
    )
    .unwrap();
    let opts = ProgramOpts {
        entry_point: "shade".to_string(),
        uniform_group: 2,
        uniform_binding: 5,
        ..ProgramOpts::default()
    };
    let program = build_program(&tree, &opts).unwrap();
    let src = &program.source;

    assert!(src.starts_with("// generated by fxtree\n\nstruct Uniforms {\n"));
    assert!(src.contains("    fp0_start: vec2<f32>,\n"));
    assert!(src.contains("};\n\n@group(2) @binding(5) var<uniform> u: Uniforms;\n"));
    assert!(src.contains("\nvar<private> sk_frag_coord: vec4<f32>;\nvar<private> sk_dst_color: vec4<f32>;\n"));
    assert!(src.ends_with("\nfn shade(_input: vec4<f32>, _coords: vec2<f32>) -> vec4<f32> {\n    return fp3(_input, _coords);\n}\n"));
}
