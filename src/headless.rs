//! In-memory host: screens, elements and shared element handles that record what the engine
//! does to them. Used by the CLI and the test suites.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::animation::keyframes::{StyleFrame, StyleTarget};
use crate::engine::screen::{Screen, ScreenElement};
use crate::foundation::core::Rect;
use crate::foundation::error::RouterResult;
use crate::navigation::route::RouteEntry;
use crate::shared::element::{SharedElementConfig, SharedElementHandle, SharedElementNode};
use crate::shared::scene::SceneHandle;

/// Style target that keeps the last applied frame.
#[derive(Debug)]
pub struct HeadlessElement {
    name: String,
    style: RefCell<Option<StyleFrame>>,
    writes: Cell<usize>,
    animating: Cell<bool>,
    visible: Cell<bool>,
}

impl HeadlessElement {
    pub fn new(name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            style: RefCell::new(None),
            writes: Cell::new(0),
            animating: Cell::new(false),
            visible: Cell::new(true),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current animated style layer, `None` when cleared.
    pub fn style(&self) -> Option<StyleFrame> {
        self.style.borrow().clone()
    }

    /// Number of `apply_style` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn is_animating(&self) -> bool {
        self.animating.get()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

impl StyleTarget for HeadlessElement {
    fn apply_style(&self, style: &StyleFrame) {
        self.writes.set(self.writes.get() + 1);
        *self.style.borrow_mut() = Some(style.clone());
    }

    fn clear_style(&self) {
        *self.style.borrow_mut() = None;
    }
}

impl ScreenElement for HeadlessElement {
    fn set_animating(&self, animating: bool) {
        self.animating.set(animating);
    }

    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }
}

/// Shared element with a settable layout box. Detaching makes it report no rect and refuse
/// cloning.
#[derive(Debug)]
pub struct HeadlessSharedElement {
    id: String,
    rect: Cell<Option<Rect>>,
    hidden: Cell<bool>,
    refuse_clone: Cell<bool>,
    declared: StyleFrame,
    clones: RefCell<Vec<Rc<HeadlessElement>>>,
}

impl HeadlessSharedElement {
    pub fn new(id: &str, rect: Rect) -> Rc<Self> {
        Self::with_style(id, rect, StyleFrame::default())
    }

    pub fn with_style(id: &str, rect: Rect, declared: StyleFrame) -> Rc<Self> {
        Rc::new(Self {
            id: id.to_string(),
            rect: Cell::new(Some(rect)),
            hidden: Cell::new(false),
            refuse_clone: Cell::new(false),
            declared,
            clones: RefCell::new(Vec::new()),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(Some(rect));
    }

    pub fn detach(&self) {
        self.rect.set(None);
        self.refuse_clone.set(true);
    }

    /// Keep the layout box but fail cloning, as a node removed between measuring and cloning.
    pub fn refuse_clone(&self) {
        self.refuse_clone.set(true);
    }

    pub fn clones(&self) -> Vec<Rc<HeadlessElement>> {
        self.clones.borrow().clone()
    }
}

impl SharedElementHandle for HeadlessSharedElement {
    fn bounding_rect(&self) -> Option<Rect> {
        self.rect.get()
    }

    fn clone_node(&self) -> Option<Rc<dyn StyleTarget>> {
        if self.refuse_clone.get() {
            return None;
        }
        let ghost = HeadlessElement::new(&format!("{}-ghost", self.id));
        self.clones.borrow_mut().push(ghost.clone());
        Some(ghost)
    }

    fn set_hidden(&self, hidden: bool) {
        self.hidden.set(hidden);
    }

    fn is_hidden(&self) -> bool {
        self.hidden.get()
    }

    fn declared_style(&self) -> StyleFrame {
        self.declared.clone()
    }
}

/// Shared element a [`HeadlessScreen`] mounts on every render.
///
/// An id of the form `:name` takes the value of route param `name`.
#[derive(Clone, Debug)]
pub struct SharedDeclaration {
    pub id: String,
    pub rect: Rect,
    pub config: SharedElementConfig,
    pub declared: StyleFrame,
}

/// Screen that mounts a [`HeadlessElement`] root plus declared shared elements.
#[derive(Debug)]
pub struct HeadlessScreen {
    name: String,
    shared: Vec<SharedDeclaration>,
    fail_render: Cell<bool>,
    renders: Cell<u32>,
    entered: Cell<u32>,
    exited: Cell<u32>,
    element: RefCell<Option<Rc<HeadlessElement>>>,
    mounted: RefCell<Vec<Rc<HeadlessSharedElement>>>,
}

impl HeadlessScreen {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            shared: Vec::new(),
            fail_render: Cell::new(false),
            renders: Cell::new(0),
            entered: Cell::new(0),
            exited: Cell::new(0),
            element: RefCell::new(None),
            mounted: RefCell::new(Vec::new()),
        }
    }

    pub fn with_shared(self, id: &str, rect: Rect) -> Self {
        self.with_shared_config(id, rect, SharedElementConfig::default())
    }

    pub fn with_shared_config(self, id: &str, rect: Rect, config: SharedElementConfig) -> Self {
        self.declare(SharedDeclaration {
            id: id.to_string(),
            rect,
            config,
            declared: StyleFrame::default(),
        })
    }

    pub fn declare(mut self, decl: SharedDeclaration) -> Self {
        self.shared.push(decl);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Make subsequent renders fail.
    pub fn fail_renders(&self, fail: bool) {
        self.fail_render.set(fail);
    }

    pub fn render_count(&self) -> u32 {
        self.renders.get()
    }

    pub fn enter_count(&self) -> u32 {
        self.entered.get()
    }

    pub fn exit_count(&self) -> u32 {
        self.exited.get()
    }

    /// Root element of the latest render.
    pub fn element(&self) -> Option<Rc<HeadlessElement>> {
        self.element.borrow().clone()
    }

    /// Shared element of the latest render with resolved id `id`.
    pub fn shared(&self, id: &str) -> Option<Rc<HeadlessSharedElement>> {
        self.mounted.borrow().iter().find(|s| s.id() == id).cloned()
    }

    pub fn all_shared(&self) -> Vec<Rc<HeadlessSharedElement>> {
        self.mounted.borrow().clone()
    }
}

fn resolve_id(template: &str, entry: &RouteEntry) -> String {
    template
        .strip_prefix(':')
        .and_then(|name| entry.param(name))
        .unwrap_or_else(|| template.to_string())
}

impl Screen for HeadlessScreen {
    fn render(
        &self,
        entry: &RouteEntry,
        scene: &SceneHandle,
    ) -> RouterResult<Rc<dyn ScreenElement>> {
        if self.fail_render.get() {
            return Err(anyhow::anyhow!("screen '{}' failed to render", self.name).into());
        }
        self.renders.set(self.renders.get() + 1);
        let root = HeadlessElement::new(&self.name);
        let mut mounted = Vec::with_capacity(self.shared.len());
        {
            let mut scene = scene.borrow_mut();
            for decl in &self.shared {
                let id = resolve_id(&decl.id, entry);
                let handle =
                    HeadlessSharedElement::with_style(&id, decl.rect, decl.declared.clone());
                scene.add_node(SharedElementNode::new(
                    id,
                    handle.clone(),
                    decl.config.clone(),
                ))?;
                mounted.push(handle);
            }
        }
        *self.mounted.borrow_mut() = mounted;
        *self.element.borrow_mut() = Some(root.clone());
        Ok(root)
    }

    fn on_enter(&self, _entry: &RouteEntry) {
        self.entered.set(self.entered.get() + 1);
    }

    fn on_exit(&self, _entry: &RouteEntry) {
        self.exited.set(self.exited.get() + 1);
    }
}

#[cfg(test)]
#[path = "../tests/unit/headless.rs"]
mod tests;
