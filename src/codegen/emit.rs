use crate::codegen::builder::{
    COORDS, DST_COLOR, FRAG_COORD, INPUT, ShaderBuilder, UNIFORM_BLOCK, UniformData, UniformType,
    wgsl_vec4,
};
use crate::effects::blend::BlendBehavior;
use crate::foundation::core::PmColor4f;
use crate::foundation::error::{FxError, FxResult};
use crate::node::kind::EffectKind;

const OPAQUE_WHITE: &str = "vec4<f32>(1.0)";

/// Per-node emission context: the node's function name and its children's function names.
pub(crate) struct EmitArgs<'a> {
    pub(crate) fn_name: &'a str,
    pub(crate) children: &'a [Option<String>],
}

impl EmitArgs<'_> {
    /// Call expression for child `i`; an absent child evaluates to the supplied input.
    pub(crate) fn invoke_child(&self, i: usize, input: Option<&str>, coords: Option<&str>) -> String {
        let input = input.unwrap_or(INPUT);
        match self.children.get(i).and_then(|c| c.as_deref()) {
            Some(f) => format!("{f}({input}, {})", coords.unwrap_or(COORDS)),
            None => input.to_string(),
        }
    }
}

fn uniform_ref(name: &str) -> String {
    format!("{UNIFORM_BLOCK}.{name}")
}

/// Emit the body of one node's function. Uniform names are appended to `uniforms` in the
/// order [`write_uniforms`] expects them.
pub(crate) fn emit_body(
    kind: &EffectKind,
    args: &EmitArgs<'_>,
    b: &mut ShaderBuilder,
    uniforms: &mut Vec<String>,
) -> Vec<String> {
    let mut uniform = |b: &mut ShaderBuilder, suffix: &str, ty: UniformType| {
        let name = b.add_uniform(args.fn_name, suffix, ty);
        uniforms.push(name.clone());
        uniform_ref(&name)
    };

    match kind {
        EffectKind::Color { .. } => {
            let color = uniform(b, "color", UniformType::Vec4);
            vec![format!("return {color};")]
        }
        EffectKind::OverrideInput { color, specialized } => {
            let input = if *specialized {
                wgsl_vec4(color.to_array())
            } else {
                uniform(b, "color", UniformType::Vec4)
            };
            vec![format!("return {};", args.invoke_child(0, Some(&input), None))]
        }
        EffectKind::DestColor => vec![format!("return {DST_COLOR};")],
        EffectKind::Swizzle { swizzle } => vec![
            format!("let c = {};", args.invoke_child(0, None, None)),
            format!("return {};", swizzle.wgsl_apply("c")),
        ],
        EffectKind::Premul => vec![
            format!("var c = {};", args.invoke_child(0, Some(OPAQUE_WHITE), None)),
            format!("c = vec4<f32>(c.rgb * {INPUT}.rgb, c.a);"),
            format!("return c * {INPUT}.a;"),
        ],
        EffectKind::Compose => vec![
            format!("let g = {};", args.invoke_child(1, None, None)),
            format!("return {};", args.invoke_child(0, Some("g"), None)),
        ],
        EffectKind::Blend { mode, behavior } => {
            let probe = match behavior {
                BlendBehavior::SkMode => INPUT,
                _ => OPAQUE_WHITE,
            };
            let operand = |i: usize| match args.children.get(i).and_then(|c| c.as_deref()) {
                Some(_) => args.invoke_child(i, Some(probe), None),
                None => INPUT.to_string(),
            };
            let result = mode.wgsl_expr("s", "d");
            let ret = match behavior {
                BlendBehavior::ComposeTwo => format!("return ({result}) * {INPUT}.a;"),
                _ => format!("return {result};"),
            };
            vec![
                format!("let s = {};", operand(0)),
                format!("let d = {};", operand(1)),
                ret,
            ]
        }
        EffectKind::ColorMatrix(cm) => {
            let m = uniform(b, "m", UniformType::Mat4);
            let v = uniform(b, "v", UniformType::Vec4);
            let mut body = vec![format!("var c = {};", args.invoke_child(0, None, None))];
            if cm.unpremul_input {
                body.push(
                    "c = select(vec4<f32>(c.rgb / c.a, c.a), vec4<f32>(0.0), c.a == 0.0);"
                        .to_string(),
                );
            }
            body.push(format!("c = {m} * c + {v};"));
            if cm.clamp_rgb_output {
                body.push("c = saturate(c);".to_string());
            } else {
                body.push("c.a = saturate(c.a);".to_string());
            }
            if cm.premul_output {
                body.push("c = vec4<f32>(c.rgb * c.a, c.a);".to_string());
            }
            body.push("return c;".to_string());
            body
        }
        EffectKind::Clamp { premul: false } => vec![
            format!("let c = {};", args.invoke_child(0, None, None)),
            "return saturate(c);".to_string(),
        ],
        EffectKind::Clamp { premul: true } => vec![
            format!("let c = {};", args.invoke_child(0, None, None)),
            "let a = saturate(c.a);".to_string(),
            "return vec4<f32>(clamp(c.rgb, vec3<f32>(0.0), vec3<f32>(a)), a);".to_string(),
        ],
        EffectKind::DeviceSpace => {
            let coords = format!("{FRAG_COORD}.xy");
            vec![format!(
                "return {};",
                args.invoke_child(0, None, Some(&coords))
            )]
        }
        EffectKind::Matrix { matrix } => {
            let m = uniform(b, "matrix", UniformType::Mat3);
            let mapped = if matrix.has_perspective() {
                "p.xy / p.z"
            } else {
                "p.xy"
            };
            vec![
                format!("let p = {m} * vec3<f32>({COORDS}, 1.0);"),
                format!("return {};", args.invoke_child(0, None, Some(mapped))),
            ]
        }
        EffectKind::LinearGradient { .. } => {
            let start = uniform(b, "start", UniformType::Vec2);
            let end = uniform(b, "end", UniformType::Vec2);
            let c0 = uniform(b, "c0", UniformType::Vec4);
            let c1 = uniform(b, "c1", UniformType::Vec4);
            vec![
                format!("let d = {end} - {start};"),
                format!(
                    "let t = saturate(dot({COORDS} - {start}, d) / max(dot(d, d), 1e-12));"
                ),
                format!("return mix({c0}, {c1}, t);"),
            ]
        }
    }
}

/// Write the uniform values of one node under the names recorded during emission.
pub(crate) fn write_uniforms(
    kind: &EffectKind,
    names: &[String],
    data: &mut UniformData,
) -> FxResult<()> {
    let name = |i: usize| {
        names.get(i).map(String::as_str).ok_or_else(|| {
            FxError::codegen(format!(
                "'{}' is missing uniform #{i}; was the program emitted?",
                kind.name()
            ))
        })
    };
    let color = |c: PmColor4f| c.to_array();

    match kind {
        EffectKind::Color { color: c } => data.set(name(0)?, &color(*c)),
        EffectKind::OverrideInput {
            color: c,
            specialized: false,
        } => data.set(name(0)?, &color(*c)),
        EffectKind::ColorMatrix(cm) => {
            data.set(name(0)?, &cm.columns());
            data.set(name(1)?, &cm.offset());
        }
        EffectKind::Matrix { matrix } => {
            let m = &matrix.m;
            let columns = [m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8]];
            data.set(name(0)?, &columns);
        }
        EffectKind::LinearGradient { start, end, colors } => {
            data.set(name(0)?, start);
            data.set(name(1)?, end);
            data.set(name(2)?, &color(colors[0]));
            data.set(name(3)?, &color(colors[1]));
        }
        EffectKind::OverrideInput { .. }
        | EffectKind::DestColor
        | EffectKind::Swizzle { .. }
        | EffectKind::Premul
        | EffectKind::Compose
        | EffectKind::Blend { .. }
        | EffectKind::Clamp { .. }
        | EffectKind::DeviceSpace => {}
    }
    Ok(())
}
