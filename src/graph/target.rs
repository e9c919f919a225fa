use crate::graph::pass::{PassDef, PassType};

/// Barrier issued once for the whole target pass before its first pass runs, instead of per pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TargetLevelBarrier {
    pub enabled: bool,
    /// Additional textures transitioned by the barrier, besides the target itself.
    pub textures: Vec<String>,
}

/// Binds one render target and renders an ordered list of passes into it.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetPassDef {
    pub(crate) render_target_name: String,
    pub(crate) rt_index: u32,
    pub(crate) passes: Vec<PassDef>,
    pub target_level_barrier: TargetLevelBarrier,
}

impl TargetPassDef {
    pub(crate) fn new(render_target_name: impl Into<String>, rt_index: u32) -> Self {
        TargetPassDef {
            render_target_name: render_target_name.into(),
            rt_index,
            passes: vec![],
            target_level_barrier: TargetLevelBarrier::default(),
        }
    }

    /// Name of the render target view this target pass renders into.
    pub fn render_target_name(&self) -> &str {
        &self.render_target_name
    }

    pub fn rt_index(&self) -> u32 {
        self.rt_index
    }

    pub fn passes(&self) -> &[PassDef] {
        &self.passes
    }

    /// Reserve space for `count` passes.
    pub fn set_num_passes(&mut self, count: usize) {
        self.passes.reserve(count.saturating_sub(self.passes.len()));
    }

    /// Append a pass and return a reference to it.
    pub fn add_pass(&mut self, pass: PassDef) -> &mut PassDef {
        let index = self.passes.len();
        self.passes.push(pass);
        &mut self.passes[index]
    }

    /// All passes of the given type, in order.
    pub fn passes_of_type(&self, ty: PassType) -> impl Iterator<Item = &PassDef> {
        self.passes.iter().filter(move |pass| pass.pass_type() == ty)
    }

    pub fn num_scene_passes(&self) -> usize {
        self.passes_of_type(PassType::Scene).count()
    }
}
