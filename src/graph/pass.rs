//! This module exposes the pass definitions stored inside a [`TargetPassDef`](crate::graph::target::TargetPassDef),
//! and the [`PassBuilder`] used to create them.
//!
//! A pass definition is made of two parts: the [`PassDefCommon`] fields every pass type carries, and a
//! [`PassKind`] holding the payload of one specific pass type. The payload is reached through checked
//! accessors such as [`PassDef::as_scene()`] or [`WarmUpPassDef::from_def()`], never by assuming a type.
//!
//! # Example
//!
//! A scene pass that renders render queues 0 through 50 and updates a shadow node first:
//! ```
//! use ember::prelude::*;
//!
//! let pass = PassBuilder::scene()
//!     .identifier(7)
//!     .render_queues(0, 50)?
//!     .shadow_node("sun_shadows")?
//!     .visibility_mask(0x0000_00ff)?
//!     .build();
//! assert_eq!(pass.pass_type(), PassType::Scene);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! Warm-up passes are usually derived from scene passes by the
//! [`WarmUpGraphBuilder`](crate::graph::warm_up::WarmUpGraphBuilder), but can be authored by hand as well:
//! ```
//! use ember::prelude::*;
//!
//! let pass = PassBuilder::warm_up()
//!     .mode(WarmUpMode::COLLECT_AND_TRIGGER)?
//!     .num_initial(1)
//!     .build();
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::Result;
use bitflags::bitflags;

use crate::Error;

/// Type tag of a pass definition.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum PassType {
    Clear,
    Quad,
    Scene,
    WarmUp,
}

bitflags! {
    /// What a warm-up pass does when executed. The two bits are independent.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WarmUpMode: u8 {
        /// Gather the shader pipeline states reachable by the pass and request their compilation.
        const COLLECT = 1 << 0;
        /// Kick off compilation of everything collected so far.
        const TRIGGER = 1 << 1;
        const COLLECT_AND_TRIGGER = Self::COLLECT.bits() | Self::TRIGGER.bits();
    }
}

impl Default for WarmUpMode {
    fn default() -> Self {
        WarmUpMode::COLLECT_AND_TRIGGER
    }
}

/// Fields shared by every pass type.
#[derive(Debug, Clone, PartialEq)]
pub struct PassDefCommon {
    pub identifier: u32,
    pub profiling_id: String,
    pub execution_mask: u8,
    pub viewport_modifier_mask: u8,
    pub skip_load_store_semantics: bool,
    pub colour_write: bool,
    pub read_only_depth: bool,
    pub read_only_stencil: bool,
    pub include_overlays: bool,
    pub shadow_map_full_viewport: bool,
    /// Textures this pass exposes to shaders, so their barriers are resolved before it runs.
    pub exposed_textures: Vec<String>,
    /// How many times the pass executes before turning into a no-op. `None` means unbounded.
    pub num_initial: Option<u32>,
}

impl Default for PassDefCommon {
    fn default() -> Self {
        PassDefCommon {
            identifier: 0,
            profiling_id: String::new(),
            execution_mask: 0xff,
            viewport_modifier_mask: 0xff,
            skip_load_store_semantics: false,
            colour_write: true,
            read_only_depth: false,
            read_only_stencil: false,
            include_overlays: false,
            shadow_map_full_viewport: false,
            exposed_textures: vec![],
            num_initial: None,
        }
    }
}

/// What part of the scene a scene-like pass looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneScope {
    pub visibility_mask: u32,
    pub first_rq: u8,
    pub last_rq: u8,
    pub shadow_node: Option<String>,
    pub enable_forward_plus: bool,
}

impl Default for SceneScope {
    fn default() -> Self {
        SceneScope {
            visibility_mask: 0xffff_ffff,
            first_rq: 0,
            last_rq: u8::MAX,
            shadow_node: None,
            enable_forward_plus: true,
        }
    }
}

impl SceneScope {
    /// Whether render queue `rq` is rendered by this pass.
    pub fn contains_render_queue(&self, rq: u8) -> bool {
        (self.first_rq..=self.last_rq).contains(&rq)
    }
}

/// Renders the scene.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScenePassDef {
    pub scope: SceneScope,
    pub camera_name: Option<String>,
    pub lod_camera_name: Option<String>,
}

/// Pre-compiles the shader pipelines a scene pass would need, without rendering anything visible.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WarmUpPassDef {
    pub scope: SceneScope,
    pub camera_name: Option<String>,
    pub mode: WarmUpMode,
}

/// Clears the target.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearPassDef {
    pub colour: [f32; 4],
    pub depth: f32,
    pub stencil: u32,
}

impl Default for ClearPassDef {
    fn default() -> Self {
        ClearPassDef {
            colour: [0.0, 0.0, 0.0, 1.0],
            depth: 1.0,
            stencil: 0,
        }
    }
}

/// Draws a fullscreen quad with a material.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QuadPassDef {
    pub material: String,
}

/// Payload of a pass definition.
#[derive(Debug, Clone, PartialEq)]
pub enum PassKind {
    Clear(ClearPassDef),
    Quad(QuadPassDef),
    Scene(ScenePassDef),
    WarmUp(WarmUpPassDef),
}

/// A single pass inside a target pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassDef {
    pub common: PassDefCommon,
    pub kind: PassKind,
}

impl PassDef {
    /// Create a pass definition with default common fields.
    pub fn new(kind: PassKind) -> Self {
        PassDef {
            common: PassDefCommon::default(),
            kind,
        }
    }

    /// Get the type tag of this pass.
    pub fn pass_type(&self) -> PassType {
        match &self.kind {
            PassKind::Clear(_) => PassType::Clear,
            PassKind::Quad(_) => PassType::Quad,
            PassKind::Scene(_) => PassType::Scene,
            PassKind::WarmUp(_) => PassType::WarmUp,
        }
    }

    pub fn is_scene(&self) -> bool {
        matches!(self.kind, PassKind::Scene(_))
    }

    pub fn as_scene(&self) -> Option<&ScenePassDef> {
        match &self.kind {
            PassKind::Scene(scene) => Some(scene),
            _ => None,
        }
    }

    pub fn as_warm_up(&self) -> Option<&WarmUpPassDef> {
        match &self.kind {
            PassKind::WarmUp(warm_up) => Some(warm_up),
            _ => None,
        }
    }

    pub fn as_warm_up_mut(&mut self) -> Option<&mut WarmUpPassDef> {
        match &mut self.kind {
            PassKind::WarmUp(warm_up) => Some(warm_up),
            _ => None,
        }
    }

    /// The scene scope of scene-like passes.
    pub fn scope(&self) -> Option<&SceneScope> {
        match &self.kind {
            PassKind::Scene(scene) => Some(&scene.scope),
            PassKind::WarmUp(warm_up) => Some(&warm_up.scope),
            _ => None,
        }
    }

    fn scope_mut(&mut self) -> Option<&mut SceneScope> {
        match &mut self.kind {
            PassKind::Scene(scene) => Some(&mut scene.scope),
            PassKind::WarmUp(warm_up) => Some(&mut warm_up.scope),
            _ => None,
        }
    }

    fn camera_name_mut(&mut self) -> Option<&mut Option<String>> {
        match &mut self.kind {
            PassKind::Scene(scene) => Some(&mut scene.camera_name),
            PassKind::WarmUp(warm_up) => Some(&mut warm_up.camera_name),
            _ => None,
        }
    }
}

impl WarmUpPassDef {
    /// Downcast a pass definition to a warm-up pass.
    /// # Errors
    /// * Fails with [`Error::PassTypeMismatch`] if `def` is not a warm-up pass.
    pub fn from_def(def: &PassDef) -> Result<&WarmUpPassDef> {
        def.as_warm_up().ok_or_else(|| {
            anyhow::Error::from(Error::PassTypeMismatch {
                expected: PassType::WarmUp,
                found: def.pass_type(),
            })
        })
    }
}

impl ScenePassDef {
    /// Downcast a pass definition to a scene pass.
    /// # Errors
    /// * Fails with [`Error::PassTypeMismatch`] if `def` is not a scene pass.
    pub fn from_def(def: &PassDef) -> Result<&ScenePassDef> {
        def.as_scene().ok_or_else(|| {
            anyhow::Error::from(Error::PassTypeMismatch {
                expected: PassType::Scene,
                found: def.pass_type(),
            })
        })
    }
}

/// Used to create [`PassDef`] objects correctly.
/// # Example
/// See the [`pass`](crate::graph::pass) module level documentation.
pub struct PassBuilder {
    inner: PassDef,
}

impl PassBuilder {
    /// Create a new pass of the given kind.
    pub fn new(kind: PassKind) -> Self {
        PassBuilder {
            inner: PassDef::new(kind),
        }
    }

    /// Create a scene pass rendering every render queue with every visibility bit.
    pub fn scene() -> Self {
        Self::new(PassKind::Scene(ScenePassDef::default()))
    }

    /// Create a warm-up pass that both collects and triggers.
    pub fn warm_up() -> Self {
        Self::new(PassKind::WarmUp(WarmUpPassDef::default()))
    }

    /// Create a pass clearing to opaque black, depth 1 and stencil 0.
    pub fn clear() -> Self {
        Self::new(PassKind::Clear(ClearPassDef::default()))
    }

    /// Create a fullscreen quad pass using `material`.
    pub fn quad(material: impl Into<String>) -> Self {
        Self::new(PassKind::Quad(QuadPassDef {
            material: material.into(),
        }))
    }

    pub fn identifier(mut self, identifier: u32) -> Self {
        self.inner.common.identifier = identifier;
        self
    }

    pub fn profiling_id(mut self, id: impl Into<String>) -> Self {
        self.inner.common.profiling_id = id.into();
        self
    }

    pub fn execution_mask(mut self, mask: u8) -> Self {
        self.inner.common.execution_mask = mask;
        self
    }

    pub fn skip_load_store_semantics(mut self, skip: bool) -> Self {
        self.inner.common.skip_load_store_semantics = skip;
        self
    }

    pub fn colour_write(mut self, enabled: bool) -> Self {
        self.inner.common.colour_write = enabled;
        self
    }

    pub fn read_only(mut self, depth: bool, stencil: bool) -> Self {
        self.inner.common.read_only_depth = depth;
        self.inner.common.read_only_stencil = stencil;
        self
    }

    pub fn include_overlays(mut self, include: bool) -> Self {
        self.inner.common.include_overlays = include;
        self
    }

    pub fn shadow_map_full_viewport(mut self, full: bool) -> Self {
        self.inner.common.shadow_map_full_viewport = full;
        self
    }

    /// Expose a texture to the shaders of this pass.
    pub fn expose(mut self, texture: impl Into<String>) -> Self {
        self.inner.common.exposed_textures.push(texture.into());
        self
    }

    /// Only execute this pass `count` times.
    pub fn num_initial(mut self, count: u32) -> Self {
        self.inner.common.num_initial = Some(count);
        self
    }

    fn with_scope(mut self, f: impl FnOnce(&mut SceneScope)) -> Result<Self> {
        let found = self.inner.pass_type();
        let scope = self.inner.scope_mut().ok_or(Error::PassTypeMismatch {
            expected: PassType::Scene,
            found,
        })?;
        f(scope);
        Ok(self)
    }

    /// Set the visibility mask used to filter scene objects.
    /// # Errors
    /// * Fails if this is not a scene or warm-up pass.
    pub fn visibility_mask(self, mask: u32) -> Result<Self> {
        self.with_scope(|scope| scope.visibility_mask = mask)
    }

    /// Restrict the pass to render queues `first..=last`.
    /// # Errors
    /// * Fails if this is not a scene or warm-up pass.
    /// * Fails if `first > last`.
    pub fn render_queues(self, first: u8, last: u8) -> Result<Self> {
        if first > last {
            return Err(anyhow::Error::from(Error::InvalidRenderQueueRange {
                first,
                last,
            }));
        }
        self.with_scope(|scope| {
            scope.first_rq = first;
            scope.last_rq = last;
        })
    }

    /// Update the named shadow node before this pass executes.
    /// # Errors
    /// * Fails if this is not a scene or warm-up pass.
    pub fn shadow_node(self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        self.with_scope(|scope| scope.shadow_node = Some(name))
    }

    /// # Errors
    /// * Fails if this is not a scene or warm-up pass.
    pub fn forward_plus(self, enabled: bool) -> Result<Self> {
        self.with_scope(|scope| scope.enable_forward_plus = enabled)
    }

    /// Use the named workspace camera instead of the default camera.
    /// # Errors
    /// * Fails if this is not a scene or warm-up pass.
    pub fn camera(mut self, name: impl Into<String>) -> Result<Self> {
        let found = self.inner.pass_type();
        let camera = self.inner.camera_name_mut().ok_or(Error::PassTypeMismatch {
            expected: PassType::Scene,
            found,
        })?;
        *camera = Some(name.into());
        Ok(self)
    }

    /// Set the warm-up mode.
    /// # Errors
    /// * Fails if this is not a warm-up pass.
    pub fn mode(mut self, mode: WarmUpMode) -> Result<Self> {
        let found = self.inner.pass_type();
        let warm_up = self.inner.as_warm_up_mut().ok_or(Error::PassTypeMismatch {
            expected: PassType::WarmUp,
            found,
        })?;
        warm_up.mode = mode;
        Ok(self)
    }

    /// Obtain the built [`PassDef`].
    pub fn build(self) -> PassDef {
        self.inner
    }
}
