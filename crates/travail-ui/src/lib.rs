#![allow(non_snake_case)]
//! Widgets, layout and text fields.
//!
//! Widgets are plain functions returning a `View`; containers take their
//! children through `ViewExt::child`, which accepts a single view, a `Vec`,
//! an array or a tuple of any of those:
//!
//! ```rust
//! use travail_core::*;
//! use travail_ui::*;
//!
//! let card = Column(Modifier::new().padding(8.0)).child((
//!     Text("Eiffel Tower").size(14.0).bold(),
//!     Text("2450 KMS").size(12.0).color(theme().muted),
//! ));
//! assert_eq!(card.children.len(), 2);
//! ```

pub mod layout;
pub mod scroll;
pub mod textfield;

use std::collections::HashSet;
use std::rc::Rc;

use travail_core::*;

pub use layout::layout_and_paint;
pub use scroll::{HorizontalScroll, ScrollState, VerticalScroll, remember_scroll_state};
pub use textfield::{BasicTextField, TextField, TextFieldState};

/// Pointer state the platform tracks between frames.
#[derive(Default)]
pub struct Interactions {
    pub hover: Option<u64>,
    pub pressed: HashSet<u64>,
}

pub fn Box(modifier: Modifier) -> View {
    View::new(0, ViewKind::Box).modifier(modifier)
}

pub fn Row(modifier: Modifier) -> View {
    View::new(0, ViewKind::Row).modifier(modifier)
}

pub fn Column(modifier: Modifier) -> View {
    View::new(0, ViewKind::Column).modifier(modifier)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(
        0,
        ViewKind::Text {
            text: text.into(),
            color: theme().on_surface,
            font_size: 16.0, // sp (converted to px in layout/paint)
            weight: FontWeight::Normal,
        },
    )
}

pub fn Spacer() -> View {
    Box(Modifier::new().flex_grow(1.0))
}

/// Fixed-size gap, e.g. between stacked sections.
pub fn Gap(dp: f32) -> View {
    Box(Modifier::new().size(dp, dp).flex_shrink(0.0))
}

/// Bundled image resource `id`, drawn to fill the modifier's box.
pub fn Icon(resource: impl Into<String>, modifier: Modifier) -> View {
    View::new(
        0,
        ViewKind::Icon {
            resource: resource.into(),
            tint: None,
            scale: ContentScale::Fit,
        },
    )
    .modifier(modifier)
}

/// Filled text button. Uses the theme's primary color unless the modifier
/// sets a background.
pub fn Button(text: impl Into<String>, modifier: Modifier, on_click: impl Fn() + 'static) -> View {
    let text = text.into();
    View::new(
        0,
        ViewKind::Button {
            on_click: Some(Rc::new(on_click)),
        },
    )
    .modifier(modifier)
    .semantics(Semantics::button(text.clone()))
    .child(Text(text).color(theme().on_primary).bold())
}

/// Clickable icon. `label` names the action for semantics.
pub fn IconButton(
    resource: impl Into<String>,
    label: impl Into<String>,
    modifier: Modifier,
    icon_size: f32,
    on_click: impl Fn() + 'static,
) -> View {
    View::new(
        0,
        ViewKind::Button {
            on_click: Some(Rc::new(on_click)),
        },
    )
    .modifier(modifier)
    .semantics(Semantics::button(label))
    .child(Icon(resource, Modifier::new().size(icon_size, icon_size)))
}

/// Extension trait for child building
pub trait ViewExt: Sized {
    fn child(self, children: impl IntoChildren) -> Self;
}

impl ViewExt for View {
    fn child(self, children: impl IntoChildren) -> Self {
        self.with_children(children.into_children())
    }
}

pub trait IntoChildren {
    fn into_children(self) -> Vec<View>;
}

impl IntoChildren for View {
    fn into_children(self) -> Vec<View> {
        vec![self]
    }
}

impl IntoChildren for Vec<View> {
    fn into_children(self) -> Vec<View> {
        self
    }
}

impl<const N: usize> IntoChildren for [View; N] {
    fn into_children(self) -> Vec<View> {
        self.into()
    }
}

macro_rules! impl_into_children_tuple {
    ($($idx:tt $t:ident),+) => {
        impl<$($t: IntoChildren),+> IntoChildren for ($($t,)+) {
            fn into_children(self) -> Vec<View> {
                let mut v = Vec::new();
                $(v.extend(self.$idx.into_children());)+
                v
            }
        }
    };
}

impl_into_children_tuple!(0 A, 1 B);
impl_into_children_tuple!(0 A, 1 B, 2 C);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J);

/// Method styling
pub trait TextStyle {
    fn color(self, c: Color) -> View;
    fn size(self, sp: f32) -> View;
    fn weight(self, w: FontWeight) -> View;
    fn bold(self) -> View;
}

impl TextStyle for View {
    fn color(mut self, c: Color) -> View {
        match &mut self.kind {
            ViewKind::Text { color, .. } | ViewKind::TextField { color, .. } => *color = c,
            _ => {}
        }
        self
    }
    fn size(mut self, sp: f32) -> View {
        match &mut self.kind {
            ViewKind::Text { font_size, .. } | ViewKind::TextField { font_size, .. } => {
                *font_size = sp
            }
            _ => {}
        }
        self
    }
    fn weight(mut self, w: FontWeight) -> View {
        if let ViewKind::Text { weight, .. } = &mut self.kind {
            *weight = w;
        }
        self
    }
    fn bold(self) -> View {
        self.weight(FontWeight::Bold)
    }
}

pub trait IconExt {
    fn tint(self, c: Color) -> View;
    fn content_scale(self, s: ContentScale) -> View;
}

impl IconExt for View {
    /// Tints an icon, or the icons inside an `IconButton`.
    fn tint(mut self, c: Color) -> View {
        match &mut self.kind {
            ViewKind::Icon { tint, .. } => *tint = Some(c),
            ViewKind::Button { .. } => {
                self.children = self.children.into_iter().map(|ch| ch.tint(c)).collect();
            }
            _ => {}
        }
        self
    }
    fn content_scale(mut self, s: ContentScale) -> View {
        if let ViewKind::Icon { scale, .. } = &mut self.kind {
            *scale = s;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_children_flatten_in_order() {
        let v = Row(Modifier::new()).child((
            Text("a"),
            vec![Text("b"), Text("c")],
            [Text("d")],
        ));
        let labels: Vec<_> = v
            .children
            .iter()
            .filter_map(|c| match &c.kind {
                ViewKind::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, ["a", "b", "c", "d"]);
    }

    #[test]
    fn text_style_only_touches_text() {
        let t = Text("Hi").size(20.0).bold().color(Color::WHITE);
        match t.kind {
            ViewKind::Text {
                font_size,
                weight,
                color,
                ..
            } => {
                assert_eq!(font_size, 20.0);
                assert_eq!(weight, FontWeight::Bold);
                assert_eq!(color, Color::WHITE);
            }
            other => panic!("unexpected kind {other:?}"),
        }

        let b = Box(Modifier::new()).bold();
        assert!(matches!(b.kind, ViewKind::Box));
    }

    #[test]
    fn button_carries_label_semantics() {
        let b = Button("Search Flight", Modifier::new(), || {});
        assert_eq!(
            b.semantics.as_ref().and_then(|s| s.label.as_deref()),
            Some("Search Flight")
        );
        assert_eq!(b.children.len(), 1);

        let i = IconButton("baseline_add_box_24", "Increase", Modifier::new(), 24.0, || {});
        assert_eq!(i.semantics.as_ref().map(|s| s.role), Some(Role::Button));
        assert!(matches!(i.children[0].kind, ViewKind::Icon { tint: None, .. }));

        let tinted = i.tint(Color::WHITE);
        assert!(matches!(
            tinted.children[0].kind,
            ViewKind::Icon {
                tint: Some(Color::WHITE),
                ..
            }
        ));
    }
}
