use std::collections::BTreeMap;

use crate::node::flags::Capabilities;
use crate::schema::opts::ProgramOpts;

/// Parameter name of the input color in every generated function.
pub(crate) const INPUT: &str = "_input";
/// Parameter name of the sample coordinate in every generated function.
pub(crate) const COORDS: &str = "_coords";
/// Name of the uniform block instance.
pub(crate) const UNIFORM_BLOCK: &str = "u";
/// Private global holding the fragment position.
pub(crate) const FRAG_COORD: &str = "sk_frag_coord";
/// Private global holding the destination color.
pub(crate) const DST_COLOR: &str = "sk_dst_color";

/// Shader type of a uniform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UniformType {
    Vec2,
    Vec4,
    Mat3,
    Mat4,
}

impl UniformType {
    pub fn wgsl(self) -> &'static str {
        match self {
            Self::Vec2 => "vec2<f32>",
            Self::Vec4 => "vec4<f32>",
            Self::Mat3 => "mat3x3<f32>",
            Self::Mat4 => "mat4x4<f32>",
        }
    }

    /// Number of `f32` values expected by [`UniformData`].
    pub fn component_count(self) -> usize {
        match self {
            Self::Vec2 => 2,
            Self::Vec4 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}

/// A uniform declared by the generated program.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct UniformDecl {
    pub name: String,
    pub ty: UniformType,
}

/// Uniform values by name; matrices are column-major.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct UniformData {
    values: BTreeMap<String, Vec<f32>>,
}

impl UniformData {
    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.values.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub(crate) fn set(&mut self, name: &str, values: &[f32]) {
        self.values.insert(name.to_string(), values.to_vec());
    }
}

/// Accumulates generated functions and uniforms for one program.
#[derive(Debug)]
pub struct ShaderBuilder {
    opts: ProgramOpts,
    functions: Vec<String>,
    uniforms: Vec<UniformDecl>,
    next_fn: u32,
}

impl ShaderBuilder {
    pub fn new(opts: ProgramOpts) -> Self {
        Self {
            opts,
            functions: Vec::new(),
            uniforms: Vec::new(),
            next_fn: 0,
        }
    }

    pub(crate) fn next_function_name(&mut self) -> String {
        let name = format!("fp{}", self.next_fn);
        self.next_fn += 1;
        name
    }

    /// Declare a uniform owned by function `owner` and return its declared name.
    pub(crate) fn add_uniform(&mut self, owner: &str, suffix: &str, ty: UniformType) -> String {
        let name = format!("{owner}_{suffix}");
        self.uniforms.push(UniformDecl {
            name: name.clone(),
            ty,
        });
        name
    }

    pub(crate) fn add_function(&mut self, name: &str, body: &[String]) {
        let mut text = format!(
            "fn {name}({INPUT}: vec4<f32>, {COORDS}: vec2<f32>) -> vec4<f32> {{\n"
        );
        for line in body {
            text.push_str("    ");
            text.push_str(line);
            text.push('\n');
        }
        text.push_str("}\n");
        self.functions.push(text);
    }

    pub fn uniforms(&self) -> &[UniformDecl] {
        &self.uniforms
    }

    /// Assemble the final source: declarations, functions in emission order, entry point.
    pub(crate) fn finish(self, root_fn: &str, caps: Capabilities, reads_dst: bool) -> String {
        let mut out = String::from("// generated by fxtree\n");

        if !self.uniforms.is_empty() {
            out.push_str("\nstruct Uniforms {\n");
            for u in &self.uniforms {
                out.push_str(&format!("    {}: {},\n", u.name, u.ty.wgsl()));
            }
            out.push_str("};\n\n");
            out.push_str(&format!(
                "@group({}) @binding({}) var<uniform> {UNIFORM_BLOCK}: Uniforms;\n",
                self.opts.uniform_group, self.opts.uniform_binding
            ));
        }

        if caps.contains(Capabilities::FRAG_COORD) || reads_dst {
            out.push('\n');
        }
        if caps.contains(Capabilities::FRAG_COORD) {
            out.push_str(&format!("var<private> {FRAG_COORD}: vec4<f32>;\n"));
        }
        if reads_dst {
            out.push_str(&format!("var<private> {DST_COLOR}: vec4<f32>;\n"));
        }

        for f in &self.functions {
            out.push('\n');
            out.push_str(f);
        }

        out.push_str(&format!(
            "\nfn {}({INPUT}: vec4<f32>, {COORDS}: vec2<f32>) -> vec4<f32> {{\n    return {root_fn}({INPUT}, {COORDS});\n}}\n",
            self.opts.entry_point
        ));
        out
    }
}

/// Format an `f32` as a shader float literal.
pub(crate) fn wgsl_f32(v: f32) -> String {
    let s = format!("{v:?}");
    if s.contains('.') || s.contains('e') {
        s
    } else {
        format!("{s}.0")
    }
}

/// Format a color as a `vec4<f32>` constructor.
pub(crate) fn wgsl_vec4(c: [f32; 4]) -> String {
    format!(
        "vec4<f32>({}, {}, {}, {})",
        wgsl_f32(c[0]),
        wgsl_f32(c[1]),
        wgsl_f32(c[2]),
        wgsl_f32(c[3])
    )
}
