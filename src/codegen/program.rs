use crate::codegen::builder::{ShaderBuilder, UniformData, UniformDecl};
use crate::codegen::emit::{EmitArgs, emit_body, write_uniforms};
use crate::codegen::key::{ProgramFingerprint, ProgramKey};
use crate::foundation::error::{FxError, FxResult};
use crate::foundation::ids::ClassId;
use crate::node::tree::EffectNode;
use crate::schema::opts::ProgramOpts;

/// Code-emission mirror of an effect tree: one entry per node, same arity, same absent
/// slots.
///
/// Emission is post-order. Each child is emitted as its own function before the parent's
/// function, which receives the child function names and combines their invocations.
#[derive(Clone, Debug)]
pub struct ProgramImpl {
    class_id: ClassId,
    children: Vec<Option<ProgramImpl>>,
    uniforms: Vec<String>,
    function: Option<String>,
}

impl ProgramImpl {
    pub(crate) fn mirror(node: &EffectNode) -> Self {
        Self {
            class_id: node.class_id(),
            children: node.children().map(|c| c.map(Self::mirror)).collect(),
            uniforms: Vec::new(),
            function: None,
        }
    }

    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, i: usize) -> Option<&ProgramImpl> {
        self.children.get(i).and_then(Option::as_ref)
    }

    /// Name of the function emitted for this node, once [`ProgramImpl::emit`] ran.
    pub fn function_name(&self) -> Option<&str> {
        self.function.as_deref()
    }

    /// Uniform names declared for this node during emission.
    pub fn uniform_names(&self) -> &[String] {
        &self.uniforms
    }

    fn check_shape(&self, node: &EffectNode) -> FxResult<()> {
        if self.class_id != node.class_id() {
            return Err(FxError::codegen(format!(
                "mirror is {:?} but node is '{}'",
                self.class_id,
                node.name()
            )));
        }
        if self.children.len() != node.num_children() {
            return Err(FxError::codegen(format!(
                "'{}' has {} child slots, mirror has {}",
                node.name(),
                node.num_children(),
                self.children.len()
            )));
        }
        Ok(())
    }

    fn paired<'a, 'n>(
        &'a self,
        node: &'n EffectNode,
    ) -> FxResult<Vec<Option<(&'a ProgramImpl, &'n EffectNode)>>> {
        self.check_shape(node)?;
        self.children
            .iter()
            .zip(node.children())
            .enumerate()
            .map(|(i, pair)| match pair {
                (Some(m), Some(c)) => Ok(Some((m, c))),
                (None, None) => Ok(None),
                _ => Err(FxError::codegen(format!(
                    "'{}' slot #{i}: presence differs from the mirror",
                    node.name()
                ))),
            })
            .collect()
    }

    /// Emit this subtree into `b` and return the name of the function computing `node`.
    pub fn emit(&mut self, node: &EffectNode, b: &mut ShaderBuilder) -> FxResult<String> {
        self.check_shape(node)?;

        let mut child_fns = Vec::with_capacity(self.children.len());
        for (i, (slot, child)) in self.children.iter_mut().zip(node.children()).enumerate() {
            match (slot, child) {
                (Some(m), Some(c)) => child_fns.push(Some(m.emit(c, b)?)),
                (None, None) => child_fns.push(None),
                _ => {
                    return Err(FxError::codegen(format!(
                        "'{}' slot #{i}: presence differs from the mirror",
                        node.name()
                    )));
                }
            }
        }

        let name = b.next_function_name();
        self.uniforms.clear();
        let args = EmitArgs {
            fn_name: &name,
            children: &child_fns,
        };
        let body = emit_body(node.kind(), &args, b, &mut self.uniforms);
        b.add_function(&name, &body);
        self.function = Some(name.clone());
        Ok(name)
    }

    /// Write the uniform values of every node in `node`'s subtree.
    pub fn set_data(&self, node: &EffectNode, data: &mut UniformData) -> FxResult<()> {
        if self.function.is_none() {
            return Err(FxError::codegen(format!(
                "'{}' has not been emitted",
                node.name()
            )));
        }
        for (m, c) in self.paired(node)?.into_iter().flatten() {
            m.set_data(c, data)?;
        }
        write_uniforms(node.kind(), &self.uniforms, data)
    }
}

/// A generated program together with everything needed to cache and feed it.
#[derive(Clone, Debug)]
pub struct FragmentProgram {
    pub source: String,
    pub uniforms: Vec<UniformDecl>,
    pub key: ProgramKey,
    pub fingerprint: ProgramFingerprint,
    pub entry_point: String,
    program_impl: ProgramImpl,
}

impl FragmentProgram {
    pub fn program_impl(&self) -> &ProgramImpl {
        &self.program_impl
    }

    /// Uniform values for drawing `root` with this program.
    ///
    /// `root` may differ from the tree the program was built from only in uniform-backed
    /// values; anything else changes the key and is rejected.
    pub fn uniform_data(&self, root: &EffectNode) -> FxResult<UniformData> {
        if ProgramKey::of(root) != self.key {
            return Err(FxError::codegen(format!(
                "tree rooted at '{}' does not match program {}",
                root.name(),
                self.fingerprint
            )));
        }
        let mut data = UniformData::default();
        self.program_impl.set_data(root, &mut data)?;
        Ok(data)
    }
}

/// Mirror `root`, emit its program and compute its key.
#[tracing::instrument(skip_all, fields(root = root.name()))]
pub fn build_program(root: &EffectNode, opts: &ProgramOpts) -> FxResult<FragmentProgram> {
    opts.validate()?;
    if root.will_read_dst_color() && !opts.allow_dst_read {
        return Err(FxError::codegen(
            "tree reads the destination color but destination reads are disabled",
        ));
    }

    let key = ProgramKey::of(root);
    let fingerprint = key.fingerprint();

    let mut program_impl = root.make_program_impl();
    let mut b = ShaderBuilder::new(opts.clone());
    let root_fn = program_impl.emit(root, &mut b)?;
    let uniforms = b.uniforms().to_vec();
    let source = b.finish(
        &root_fn,
        root.requested_capabilities(),
        root.will_read_dst_color(),
    );

    tracing::debug!(
        %fingerprint,
        key_words = key.words().len(),
        uniforms = uniforms.len(),
        "program built"
    );

    Ok(FragmentProgram {
        source,
        uniforms,
        key,
        fingerprint,
        entry_point: opts.entry_point.clone(),
        program_impl,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/codegen/program.rs"]
mod tests;
