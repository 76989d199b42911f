//! # Scroll model
//!
//! A scroll container is a `ViewKind::Scroll` node along one `Axis` plus a
//! `ScrollState` that owns the offset. The state stores viewport extent,
//! content extent and offset, and keeps the offset clamped to
//! `[0, content - viewport]` whenever any of them change.
//!
//! `scroll_by` consumes a requested delta and returns what it could not use,
//! so the platform can hand the leftover to an enclosing container (a
//! horizontal card row inside the vertical body, for instance).
//!
//! ```rust
//! use travail_core::*;
//! use travail_ui::*;
//!
//! fn Cards() -> View {
//!     let state = remember_scroll_state("cards");
//!     HorizontalScroll(
//!         Modifier::new().fill_max_width(),
//!         state,
//!         Row(Modifier::new().spaced_by(16.0)).child(
//!             (0..4).map(|i| Text(format!("Card {i}"))).collect::<Vec<_>>(),
//!         ),
//!     )
//! }
//! ```
//!
//! `layout_and_paint` uses the inner content rect (after padding) as the
//! viewport, reports extents back through `set_extents`, clips the children,
//! translates them by the current offset and clips their hit regions to the
//! viewport.

use std::rc::Rc;

use travail_core::*;

pub struct ScrollState {
    offset: Signal<f32>,
    viewport: Signal<f32>,
    content: Signal<f32>,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollState {
    pub fn new() -> Self {
        Self {
            offset: signal(0.0),
            viewport: signal(0.0),
            content: signal(0.0),
        }
    }

    fn max_offset(&self) -> f32 {
        (self.content.get() - self.viewport.get()).max(0.0)
    }

    pub fn set_extents(&self, viewport: f32, content: f32) {
        self.viewport.set(viewport.max(0.0));
        self.content.set(content.max(0.0));
        let max_off = self.max_offset();
        self.offset.update(|o| *o = o.clamp(0.0, max_off));
    }

    pub fn set_offset(&self, off: f32) {
        let max_off = self.max_offset();
        self.offset.set(off.clamp(0.0, max_off));
    }

    pub fn get(&self) -> f32 {
        self.offset.get()
    }

    /// Consume `delta` (px), clamp to bounds, return leftover.
    pub fn scroll_by(&self, delta: f32) -> f32 {
        let before = self.offset.get();
        let after = (before + delta).clamp(0.0, self.max_offset());
        self.offset.set(after);
        delta - (after - before)
    }
}

/// Remembered ScrollState (requires unique key).
pub fn remember_scroll_state(key: impl Into<String>) -> Rc<ScrollState> {
    travail_core::remember_with_key(key.into(), ScrollState::new)
}

fn scroll_view(axis: Axis, modifier: Modifier, state: Rc<ScrollState>, content: View) -> View {
    let on_scroll = {
        let st = state.clone();
        Rc::new(move |d: f32| -> f32 { st.scroll_by(d) })
    };
    let set_extents = {
        let st = state.clone();
        Rc::new(move |viewport: f32, content: f32| st.set_extents(viewport, content))
    };
    let get_scroll = {
        let st = state.clone();
        Rc::new(move || st.get())
    };
    View::new(
        0,
        ViewKind::Scroll {
            axis,
            on_scroll: Some(on_scroll),
            set_extents: Some(set_extents),
            get_scroll_offset: Some(get_scroll),
        },
    )
    .modifier(modifier)
    .with_children(vec![content])
}

/// Vertically scrolling container, like verticalScroll.
pub fn VerticalScroll(modifier: Modifier, state: Rc<ScrollState>, content: View) -> View {
    scroll_view(Axis::Vertical, modifier, state, content)
}

pub fn HorizontalScroll(modifier: Modifier, state: Rc<ScrollState>, content: View) -> View {
    scroll_view(Axis::Horizontal, modifier, state, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_clamps_and_returns_leftover() {
        let st = ScrollState::new();
        st.set_extents(100.0, 250.0);

        assert_eq!(st.scroll_by(40.0), 0.0);
        assert_eq!(st.get(), 40.0);

        // 110 of 150 available, 40 left over
        assert_eq!(st.scroll_by(150.0), 40.0);
        assert_eq!(st.get(), 150.0);

        assert_eq!(st.scroll_by(-200.0), -50.0);
        assert_eq!(st.get(), 0.0);
    }

    #[test]
    fn shrinking_content_reclamps_offset() {
        let st = ScrollState::new();
        st.set_extents(100.0, 300.0);
        st.set_offset(180.0);
        assert_eq!(st.get(), 180.0);

        st.set_extents(100.0, 150.0);
        assert_eq!(st.get(), 50.0);

        st.set_extents(200.0, 150.0);
        assert_eq!(st.get(), 0.0);
        assert_eq!(st.scroll_by(10.0), 10.0);
    }
}
