//! Per-screen registry of shared elements.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::foundation::core::Rect;
use crate::foundation::error::{RouterError, RouterResult};
use crate::shared::element::SharedElementNode;

pub type SceneHandle = Rc<RefCell<SharedElementScene>>;

/// Shared elements mounted by one screen instance, keyed by id.
pub struct SharedElementScene {
    id: String,
    nodes: BTreeMap<String, SharedElementNode>,
    previous_scene: Option<Weak<RefCell<SharedElementScene>>>,
    pub keep_alive: bool,
    pub can_transition: bool,
    screen_rect: Option<Rc<dyn Fn() -> Rect>>,
}

impl fmt::Debug for SharedElementScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedElementScene")
            .field("id", &self.id)
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("keep_alive", &self.keep_alive)
            .field("can_transition", &self.can_transition)
            .finish()
    }
}

impl SharedElementScene {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: BTreeMap::new(),
            previous_scene: None,
            keep_alive: false,
            can_transition: true,
            screen_rect: None,
        }
    }

    pub fn new_handle(id: impl Into<String>) -> SceneHandle {
        Rc::new(RefCell::new(Self::new(id)))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Register a node. A second node with the same id is a programming error in the host.
    pub fn add_node(&mut self, node: SharedElementNode) -> RouterResult<()> {
        if self.nodes.contains_key(&node.id) {
            tracing::error!(
                scene = %self.id,
                id = %node.id,
                "duplicate shared element id"
            );
            return Err(RouterError::DuplicateSharedElement {
                id: node.id,
                scene: self.id.clone(),
            });
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    pub fn remove_node(&mut self, id: &str) -> Option<SharedElementNode> {
        self.nodes.remove(id)
    }

    pub fn node(&self, id: &str) -> Option<&SharedElementNode> {
        self.nodes.get(id)
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &SharedElementNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn previous_scene(&self) -> Option<SceneHandle> {
        self.previous_scene.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_previous_scene(&mut self, scene: Option<&SceneHandle>) {
        self.previous_scene = scene.map(Rc::downgrade);
    }

    pub fn set_screen_rect(&mut self, f: impl Fn() -> Rect + 'static) {
        self.screen_rect = Some(Rc::new(f));
    }

    pub fn screen_rect(&self) -> Option<Rect> {
        self.screen_rect.as_ref().map(|f| f())
    }

    /// Whether this scene can take part in a shared element phase at all.
    pub fn is_transitionable(&self) -> bool {
        self.can_transition && !self.nodes.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shared/scene.rs"]
mod tests;
