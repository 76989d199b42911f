use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::scope::Scope;
use crate::{Rect, Scene, Vec2, View, semantics::Role};

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
    static ROOT_SCOPE: RefCell<Option<Scope>> = const { RefCell::new(None) };
}

#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

pub struct ComposeGuard {
    scope: Scope,
}

impl ComposeGuard {
    pub fn begin() -> Self {
        let scope = Scope::new();

        COMPOSER.with(|c| {
            c.borrow_mut().cursor = 0;
        });

        ROOT_SCOPE.with(|rs| {
            *rs.borrow_mut() = Some(scope.clone());
        });

        ComposeGuard { scope }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        ROOT_SCOPE.with(|rs| {
            *rs.borrow_mut() = None;
        });
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;

        if cursor >= c.slots.len() {
            let rc: Rc<T> = Rc::new(init());
            c.slots.push(Box::new(rc.clone()));
            return rc;
        }

        if let Some(rc) = c.slots[cursor].downcast_ref::<Rc<T>>() {
            rc.clone()
        } else {
            log::warn!(
                "remember: slot {} type changed; replacing. \
                 If this is due to conditional composition, prefer remember_with_key.",
                cursor
            );
            let rc: Rc<T> = Rc::new(init());
            c.slots[cursor] = Box::new(rc.clone());
            rc
        }
    })
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let key = key.into();

        if let Some(existing) = c.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return rc.clone();
            }
            log::warn!(
                "remember_with_key: key '{}' reused with a different type; replacing.",
                key
            );
        }

        let rc: Rc<T> = Rc::new(init());
        c.keyed_slots.insert(key, Box::new(rc.clone()));
        rc
    })
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

/// Drops every remembered value on this thread. The next composition starts
/// from fresh state, as if the screen had been recreated.
pub fn reset_composition() {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let dropped = c.slots.len() + c.keyed_slots.len();
        c.slots.clear();
        c.keyed_slots.clear();
        c.cursor = 0;
        log::debug!("composition reset, {dropped} slots dropped");
    });
}

/// Frame — output of composition for a tick: scene + input/semantics.
pub struct Frame {
    pub scene: Scene,
    pub hit_regions: Vec<HitRegion>,
    pub semantics_nodes: Vec<SemNode>,
    pub focus_chain: Vec<u64>,
}

impl Frame {
    pub fn semantics_by_label(&self, label: &str) -> Option<&SemNode> {
        self.semantics_nodes
            .iter()
            .find(|n| n.label.as_deref() == Some(label))
    }

    pub fn hit(&self, id: u64) -> Option<&HitRegion> {
        self.hit_regions.iter().rev().find(|h| h.id == id)
    }
}

#[derive(Clone)]
pub struct HitRegion {
    pub id: u64,
    pub rect: Rect,
    pub on_click: Option<Rc<dyn Fn()>>,
    pub on_scroll: Option<Rc<dyn Fn(Vec2) -> Vec2>>,
    pub focusable: bool,
    pub on_text_change: Option<Rc<dyn Fn(String)>>,
    /// Current value of a text field, seeds the platform's editing state.
    pub text: Option<String>,
    /// Offset in px from `rect.x` to where a text field's first glyph starts.
    pub text_inset: f32,
}

impl std::fmt::Debug for HitRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRegion")
            .field("id", &self.id)
            .field("rect", &self.rect)
            .field("on_click", &self.on_click.is_some())
            .field("on_scroll", &self.on_scroll.is_some())
            .field("focusable", &self.focusable)
            .field("on_text_change", &self.on_text_change.is_some())
            .field("text", &self.text)
            .finish()
    }
}

/// Flattened semantics node produced by `layout_and_paint`.
///
/// It carries the resolved screen rect, role, label and focus/enabled state.
/// Tests use it to find controls by label; a platform accessibility bridge
/// would consume the same list.
#[derive(Clone, Debug)]
pub struct SemNode {
    /// Stable id, shared with the associated `HitRegion` / `ViewId`.
    pub id: u64,
    pub role: Role,
    pub label: Option<String>,
    pub rect: Rect,
    pub focused: bool,
    pub enabled: bool,
}

pub struct Scheduler {
    next_id: u64,
    pub focused: Option<u64>,
    pub size: (u32, u32),
    scope: Option<Scope>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            focused: None,
            size: (412, 915),
            scope: None,
        }
    }

    pub fn id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Composes the root, lays it out and paints it at `self.size`.
    ///
    /// Disposers registered during the previous composition run before the
    /// new one starts.
    pub fn repose<F, E>(
        &mut self,
        mut build_root: F,
        layout_paint: impl FnOnce(&View, (u32, u32)) -> Result<(Scene, Vec<HitRegion>, Vec<SemNode>), E>,
    ) -> Result<Frame, E>
    where
        F: FnMut(&mut Scheduler) -> View,
    {
        if let Some(prev) = self.scope.take() {
            prev.dispose();
        }

        let guard = ComposeGuard::begin();
        let root = guard.scope().run(|| build_root(self));
        self.scope = Some(guard.scope().clone());
        drop(guard);

        let (scene, hits, sem) = layout_paint(&root, self.size)?;

        let focus_chain: Vec<u64> = hits.iter().filter(|h| h.focusable).map(|h| h.id).collect();

        Ok(Frame {
            scene,
            hit_regions: hits,
            semantics_nodes: sem,
            focus_chain,
        })
    }
}
