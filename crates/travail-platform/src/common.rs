//! Window-system independent input routing, shared by the desktop and
//! Android runners and exercised headlessly by tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use travail_core::*;
use travail_ui::textfield::{TF_FONT_SP, index_for_x};
use travail_ui::{Interactions, TextFieldState, layout_and_paint};

/// Find the top-most hit region index under `pos` (reverse iteration).
pub fn top_hit_index(frame: &Frame, pos: Vec2) -> Option<usize> {
    frame
        .hit_regions
        .iter()
        .enumerate()
        .rev()
        .find(|(_, h)| h.rect.contains(pos))
        .map(|(i, _)| i)
}

/// Dispatch wheel/touch-scroll to the top-most scroll consumer under `pos`.
/// A consumer that cannot use any of the delta (already at its edge) passes
/// it on to the next one below it. Returns `true` if something consumed it.
pub fn dispatch_scroll(frame: &Frame, pos: Vec2, delta: Vec2) -> bool {
    for hit in frame
        .hit_regions
        .iter()
        .rev()
        .filter(|h| h.rect.contains(pos))
    {
        if let Some(cb) = &hit.on_scroll {
            let leftover = cb(delta);
            let consumed_x = (delta.x - leftover.x).abs() > 0.001;
            let consumed_y = (delta.y - leftover.y).abs() > 0.001;
            if consumed_x || consumed_y {
                return true;
            }
        }
    }
    false
}

/// What a pointer press did to focus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FocusChange {
    None,
    /// A text field gained focus; the runner should enable IME over `rect`.
    TextField { id: u64, rect: Rect },
    /// Focus moved to a non-text control or was cleared.
    Other,
}

/// Pointer, keyboard and IME state a runner keeps between frames.
///
/// Text field editing state lives here, keyed by the field's view id, and is
/// handed to `layout_and_paint` for caret and composition painting.
pub struct Router {
    pub textfield_states: HashMap<u64, Rc<RefCell<TextFieldState>>>,
    pub interactions: Interactions,
    pub modifiers: Modifiers,
    /// dp -> px factor of the window, used for caret hit testing.
    pub scale: f32,
    capture: Option<u64>,
    drag_accum: f32,
    dragged: bool,
    /// Fields edited since the last composed frame; their frame value is stale.
    edited: HashSet<u64>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Router {
    pub fn new(scale: f32) -> Self {
        Self {
            textfield_states: HashMap::new(),
            interactions: Interactions::default(),
            modifiers: Modifiers::default(),
            scale,
            capture: None,
            drag_accum: 0.0,
            dragged: false,
            edited: HashSet::new(),
        }
    }

    /// Composes `root` under the window density and lays it out at
    /// `sched.size`.
    pub fn compose(
        &mut self,
        sched: &mut Scheduler,
        root: &mut dyn FnMut(&mut Scheduler) -> View,
    ) -> UiResult<Frame> {
        let focused = sched.focused;
        let states = &self.textfield_states;
        let interactions = &self.interactions;
        let frame = with_density(Density { scale: self.scale }, || {
            sched.repose(root, |view, size| {
                layout_and_paint(view, size, states, interactions, focused)
            })
        })?;
        self.edited.clear();

        // Focus on a view that no longer exists is dropped.
        if let Some(id) = sched.focused
            && frame.hit(id).is_none()
        {
            log::debug!("focused view {id} disappeared");
            sched.focused = None;
        }
        Ok(frame)
    }

    pub fn pointer_moved(&mut self, frame: &Frame, pos: Vec2) -> bool {
        let hover = top_hit_index(frame, pos).map(|i| frame.hit_regions[i].id);
        let changed = hover != self.interactions.hover;
        self.interactions.hover = hover;
        changed
    }

    pub fn pointer_down(&mut self, frame: &Frame, focused: &mut Option<u64>, pos: Vec2) -> FocusChange {
        self.drag_accum = 0.0;
        self.dragged = false;

        let Some(i) = top_hit_index(frame, pos) else {
            self.capture = None;
            if focused.take().is_some() {
                return FocusChange::Other;
            }
            return FocusChange::None;
        };
        let hit = &frame.hit_regions[i];
        self.capture = Some(hit.id);
        if hit.on_click.is_some() || hit.text.is_some() {
            self.interactions.pressed.insert(hit.id);
        }

        if let Some(value) = hit.text.as_deref() {
            *focused = Some(hit.id);
            let st = self.state_for(hit.id, value);
            let size_px = TF_FONT_SP * self.scale;
            let x = pos.x - (hit.rect.x + hit.text_inset);
            let mut st = st.borrow_mut();
            let idx = index_for_x(&st.text, size_px, x);
            st.selection = idx..idx;
            return FocusChange::TextField {
                id: hit.id,
                rect: hit.rect,
            };
        }
        if hit.focusable {
            *focused = Some(hit.id);
            return FocusChange::Other;
        }
        if focused.is_some() && hit.on_scroll.is_none() {
            *focused = None;
            return FocusChange::Other;
        }
        FocusChange::None
    }

    /// Releases the captured region; fires its click when the pointer is
    /// still inside and the gesture did not turn into a scroll.
    pub fn pointer_up(&mut self, frame: &Frame, pos: Vec2) {
        let Some(cid) = self.capture.take() else {
            return;
        };
        self.interactions.pressed.remove(&cid);
        if self.dragged {
            return;
        }
        if let Some(hit) = frame.hit(cid)
            && hit.rect.contains(pos)
            && let Some(cb) = &hit.on_click
        {
            cb();
        }
    }

    pub fn pointer_cancel(&mut self) {
        if let Some(cid) = self.capture.take() {
            self.interactions.pressed.remove(&cid);
        }
        self.dragged = false;
    }

    pub fn wheel(&mut self, frame: &Frame, pos: Vec2, delta: Vec2) -> bool {
        dispatch_scroll(frame, pos, delta)
    }

    /// Touch drag by `delta` px of finger travel. Content moves with the
    /// finger, so the scroll delta is the negated travel. Past `slop` px the
    /// gesture no longer counts as a tap.
    pub fn drag(&mut self, frame: &Frame, pos: Vec2, delta: Vec2, slop: f32) -> bool {
        self.drag_accum += delta.x.abs() + delta.y.abs();
        let consumed = dispatch_scroll(
            frame,
            pos,
            Vec2 {
                x: -delta.x,
                y: -delta.y,
            },
        );
        if self.drag_accum > slop {
            self.dragged = true;
            if let Some(cid) = self.capture {
                self.interactions.pressed.remove(&cid);
            }
        }
        consumed
    }

    /// Returns `true` when the key changed anything worth repainting.
    pub fn key(&mut self, frame: &Frame, focused: &mut Option<u64>, ev: &KeyEvent) -> bool {
        match &ev.key {
            Key::Tab => {
                let next = next_in_chain(&frame.focus_chain, *focused, ev.modifiers.shift);
                let changed = next != *focused;
                *focused = next;
                return changed;
            }
            Key::Escape => return focused.take().is_some(),
            _ => {}
        }

        let Some(id) = *focused else {
            return false;
        };
        let Some(hit) = frame.hit(id) else {
            return false;
        };
        if hit.text.is_none() {
            // Keyboard activation of a focused button.
            if matches!(ev.key, Key::Enter)
                && let Some(cb) = &hit.on_click
            {
                cb();
                return true;
            }
            return false;
        }

        let shift = ev.modifiers.shift;
        let plain = !(ev.modifiers.ctrl || ev.modifiers.alt || ev.modifiers.meta);
        self.edit(frame, id, |st| match &ev.key {
            Key::Backspace => st.delete_backward(),
            Key::Delete => st.delete_forward(),
            Key::ArrowLeft => st.move_cursor(-1, shift),
            Key::ArrowRight => st.move_cursor(1, shift),
            Key::Home => st.home(shift),
            Key::End => st.end(shift),
            Key::Character(s) if plain => {
                let text: String = s.chars().filter(|c| !c.is_control()).collect();
                if !text.is_empty() {
                    st.insert_text(&text);
                }
            }
            _ => {}
        })
    }

    pub fn ime(&mut self, frame: &Frame, focused: Option<u64>, ev: &ImeEvent) -> bool {
        let Some(id) = focused else {
            return false;
        };
        self.edit(frame, id, |st| match ev {
            ImeEvent::Update { text, cursor } => st.set_composition(text, *cursor),
            ImeEvent::Commit(text) => st.commit_composition(text),
            ImeEvent::Cancel => st.cancel_composition(),
        })
    }

    fn state_for(&mut self, id: u64, value: &str) -> Rc<RefCell<TextFieldState>> {
        let st = self
            .textfield_states
            .entry(id)
            .or_insert_with(|| Rc::new(RefCell::new(TextFieldState::with_text(value))))
            .clone();
        if !self.edited.contains(&id) {
            st.borrow_mut().sync(value);
        }
        st
    }

    /// Applies `f` to the field's editing state and reports a changed value
    /// through the field's `on_text_change`.
    fn edit(&mut self, frame: &Frame, id: u64, f: impl FnOnce(&mut TextFieldState)) -> bool {
        let Some(hit) = frame.hit(id) else {
            return false;
        };
        let Some(value) = hit.text.as_deref() else {
            return false;
        };
        let st = self.state_for(id, value);
        let (before, after) = {
            let mut st = st.borrow_mut();
            let before = st.clone();
            f(&mut st);
            (before, st.clone())
        };
        let changed = before != after;
        if before.text != after.text {
            self.edited.insert(id);
            if let Some(cb) = &hit.on_text_change {
                cb(after.text);
            }
        }
        changed
    }
}

/// Tab order: next (or previous) focusable after `current`, wrapping.
pub fn next_in_chain(chain: &[u64], current: Option<u64>, reverse: bool) -> Option<u64> {
    if chain.is_empty() {
        return None;
    }
    let n = chain.len();
    let idx = match current.and_then(|c| chain.iter().position(|&id| id == c)) {
        Some(i) if reverse => (i + n - 1) % n,
        Some(i) => (i + 1) % n,
        None if reverse => n - 1,
        None => 0,
    };
    Some(chain[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use travail_ui::*;

    fn at(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }

    #[test]
    fn click_fires_on_release_inside_only() {
        let clicks = Rc::new(Cell::new(0));
        let c = clicks.clone();
        let mut sched = Scheduler::new();
        let mut router = Router::default();
        let mut root = move |_: &mut Scheduler| {
            let c = c.clone();
            Column(Modifier::new().fill_max_size()).child(
                Box(Modifier::new()
                    .size(100.0, 50.0)
                    .clickable(move || c.set(c.get() + 1))),
            )
        };
        let frame = router.compose(&mut sched, &mut root).unwrap();

        let mut focused = None;
        router.pointer_down(&frame, &mut focused, at(10.0, 10.0));
        assert_eq!(router.interactions.pressed.len(), 1);
        router.pointer_up(&frame, at(20.0, 20.0));
        assert_eq!(clicks.get(), 1);
        assert!(router.interactions.pressed.is_empty());

        router.pointer_down(&frame, &mut focused, at(10.0, 10.0));
        router.pointer_up(&frame, at(300.0, 300.0));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn nested_scroll_hands_leftover_outwards() {
        let outer = Rc::new(ScrollState::new());
        let inner = Rc::new(ScrollState::new());
        let (o, i) = (outer.clone(), inner.clone());
        let mut sched = Scheduler::new();
        sched.size = (200, 200);
        let mut router = Router::default();
        let mut root = move |_: &mut Scheduler| {
            VerticalScroll(
                Modifier::new().fill_max_size(),
                o.clone(),
                Column(Modifier::new()).child((
                    VerticalScroll(
                        Modifier::new().size(200.0, 100.0),
                        i.clone(),
                        Box(Modifier::new().size(200.0, 150.0)),
                    ),
                    Box(Modifier::new().size(200.0, 400.0)),
                )),
            )
        };
        let frame = router.compose(&mut sched, &mut root).unwrap();

        // Inner has 50px of travel; it takes that first.
        assert!(router.wheel(&frame, at(50.0, 50.0), at(0.0, 30.0)));
        assert_eq!(inner.get(), 30.0);
        assert_eq!(outer.get(), 0.0);

        assert!(router.wheel(&frame, at(50.0, 50.0), at(0.0, 60.0)));
        assert_eq!(inner.get(), 50.0);
        assert_eq!(outer.get(), 0.0);

        // Inner is at its end now, so the outer body scrolls.
        assert!(router.wheel(&frame, at(50.0, 50.0), at(0.0, 40.0)));
        assert_eq!(inner.get(), 50.0);
        assert_eq!(outer.get(), 40.0);
    }

    #[test]
    fn touch_drag_cancels_the_tap() {
        let clicks = Rc::new(Cell::new(0));
        let c = clicks.clone();
        let mut sched = Scheduler::new();
        let mut router = Router::default();
        let mut root = move |_: &mut Scheduler| {
            let c = c.clone();
            Box(Modifier::new()
                .size(100.0, 100.0)
                .clickable(move || c.set(c.get() + 1)))
        };
        let frame = router.compose(&mut sched, &mut root).unwrap();
        let mut focused = None;

        router.pointer_down(&frame, &mut focused, at(10.0, 10.0));
        router.drag(&frame, at(10.0, 30.0), at(0.0, 20.0), 6.0);
        router.pointer_up(&frame, at(10.0, 30.0));
        assert_eq!(clicks.get(), 0);

        router.pointer_down(&frame, &mut focused, at(10.0, 10.0));
        router.drag(&frame, at(10.0, 12.0), at(0.0, 2.0), 6.0);
        router.pointer_up(&frame, at(10.0, 12.0));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn typing_goes_to_focused_field_and_its_callback() {
        let value = Rc::new(RefCell::new(String::new()));
        let v = value.clone();
        let mut sched = Scheduler::new();
        let mut router = Router::default();
        let mut root = move |_: &mut Scheduler| {
            let v2 = v.clone();
            TextField(
                v.borrow().clone(),
                "From",
                Modifier::new().size(200.0, 48.0),
                move |s| *v2.borrow_mut() = s,
            )
        };
        let frame = router.compose(&mut sched, &mut root).unwrap();

        let change = router.pointer_down(&frame, &mut sched.focused, at(20.0, 20.0));
        assert!(matches!(change, FocusChange::TextField { .. }));
        router.pointer_up(&frame, at(20.0, 20.0));

        let key = |k: Key| KeyEvent {
            key: k,
            modifiers: Modifiers::default(),
        };
        // Two keys before the next frame: the stale frame value must not
        // reset the editing state in between.
        assert!(router.key(&frame, &mut sched.focused, &key(Key::Character("P".into()))));
        assert!(router.key(&frame, &mut sched.focused, &key(Key::Character("a".into()))));
        assert_eq!(value.borrow().as_str(), "Pa");

        let frame = router.compose(&mut sched, &mut root).unwrap();
        router.key(&frame, &mut sched.focused, &key(Key::Backspace));
        assert_eq!(value.borrow().as_str(), "P");

        router.ime(
            &frame,
            sched.focused,
            &ImeEvent::Update {
                text: "ar".into(),
                cursor: None,
            },
        );
        router.ime(&frame, sched.focused, &ImeEvent::Commit("aris".into()));
        assert_eq!(value.borrow().as_str(), "Paris");

        // Escape drops focus; later keys go nowhere.
        assert!(router.key(&frame, &mut sched.focused, &key(Key::Escape)));
        assert!(!router.key(&frame, &mut sched.focused, &key(Key::Character("x".into()))));
        assert_eq!(value.borrow().as_str(), "Paris");
    }

    #[test]
    fn caret_moves_repaint_without_reporting_text() {
        let value = Rc::new(RefCell::new(String::new()));
        let reports = Rc::new(Cell::new(0));
        let (v, r) = (value.clone(), reports.clone());
        let mut sched = Scheduler::new();
        let mut router = Router::default();
        let mut root = move |_: &mut Scheduler| {
            let (v2, r2) = (v.clone(), r.clone());
            TextField(
                v.borrow().clone(),
                "To",
                Modifier::new().size(200.0, 48.0),
                move |s| {
                    r2.set(r2.get() + 1);
                    *v2.borrow_mut() = s;
                },
            )
        };
        let frame = router.compose(&mut sched, &mut root).unwrap();
        router.pointer_down(&frame, &mut sched.focused, at(20.0, 20.0));
        router.pointer_up(&frame, at(20.0, 20.0));

        let key = |k: Key| KeyEvent {
            key: k,
            modifiers: Modifiers::default(),
        };
        assert!(router.key(&frame, &mut sched.focused, &key(Key::Character("ab".into()))));
        assert_eq!(reports.get(), 1);
        assert_eq!(value.borrow().as_str(), "ab");

        let frame = router.compose(&mut sched, &mut root).unwrap();
        assert!(router.key(&frame, &mut sched.focused, &key(Key::ArrowLeft)));
        assert!(router.key(&frame, &mut sched.focused, &key(Key::Home)));
        assert_eq!(reports.get(), 1);

        // Already at the start: nothing changes, nothing to repaint.
        assert!(!router.key(&frame, &mut sched.focused, &key(Key::Home)));
        assert!(!router.key(&frame, &mut sched.focused, &key(Key::Backspace)));
        assert_eq!(reports.get(), 1);
        assert_eq!(value.borrow().as_str(), "ab");
    }

    #[test]
    fn tab_cycles_focus_chain() {
        let chain = [3, 7, 9];
        assert_eq!(next_in_chain(&chain, None, false), Some(3));
        assert_eq!(next_in_chain(&chain, Some(3), false), Some(7));
        assert_eq!(next_in_chain(&chain, Some(9), false), Some(3));
        assert_eq!(next_in_chain(&chain, Some(3), true), Some(9));
        assert_eq!(next_in_chain(&chain, None, true), Some(9));
        assert_eq!(next_in_chain(&[], Some(1), false), None);
    }
}
