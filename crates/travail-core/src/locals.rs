//! # Theming and locals
//!
//! Thread‑local "composition locals" carry parameters that every widget reads
//! but nobody wants to thread through arguments:
//!
//! - `Theme` — palette and shape radii.
//! - `Density` — dp→px scale factor.
//! - `TextScale` — user font scaling applied on top of density for sp values.
//!
//! Override them for a subtree with `with_theme`, `with_density` and
//! `with_text_scale`:
//!
//! ```rust
//! use travail_core::*;
//!
//! let dark = Theme {
//!     background: Color::BLACK,
//!     on_surface: Color::WHITE,
//!     ..Theme::default()
//! };
//!
//! with_theme(dark, || {
//!     assert_eq!(theme().background, Color::BLACK);
//! });
//! assert_eq!(theme().background, Theme::default().background);
//! ```

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::Color;

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

/// Palette and shape radii used by widgets and screens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    /// Window background / app root.
    pub background: Color,
    /// Bars, cards and the booking form.
    pub surface: Color,
    /// Primary foreground color on top of `surface`/`background`.
    pub on_surface: Color,
    /// Secondary text, placeholders and unselected labels.
    pub muted: Color,

    /// Brand accent for buttons, selected chips and links.
    pub primary: Color,
    /// Foreground color used on top of `primary`.
    pub on_primary: Color,

    /// Input field and unselected chip fill.
    pub field: Color,
    /// Low‑emphasis fill behind round avatars and placeholders.
    pub outline: Color,
    /// Selected bottom‑bar tab tint.
    pub tab_selected: Color,
    /// Text caret in focused fields.
    pub caret: Color,

    /// Corner radius (dp) of small shapes: chips and fields.
    pub shape_small: f32,
    /// Corner radius (dp) of medium shapes: cards, form and buttons.
    pub shape_medium: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_hex("#FAFAFA"),
            surface: Color::WHITE,
            on_surface: Color::BLACK,
            muted: Color::GRAY,
            primary: Color::from_argb(0xFF6C63FF),
            on_primary: Color::WHITE,
            field: Color::from_argb(0xFFF6F6F6),
            outline: Color::LIGHT_GRAY,
            tab_selected: Color::from_argb(0xFF8E44AD),
            caret: Color::BLACK,
            shape_small: 8.0,
            shape_medium: 12.0,
        }
    }
}

/// dp→px factor of the current output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Density {
    pub scale: f32,
}

impl Default for Density {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextScale(pub f32);

impl Default for TextScale {
    fn default() -> Self {
        Self(1.0)
    }
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Pops on unwind as well.
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local<T: 'static>(v: T) {
    LOCALS_STACK.with(|st| {
        let mut st = st.borrow_mut();
        if st.is_empty() {
            st.push(HashMap::new());
        }
        if let Some(top) = st.last_mut() {
            top.insert(TypeId::of::<T>(), Box::new(v));
        }
    });
}

fn get_local<T: Copy + Default + 'static>() -> T {
    LOCALS_STACK.with(|st| {
        st.borrow()
            .iter()
            .rev()
            .find_map(|frame| {
                frame
                    .get(&TypeId::of::<T>())
                    .and_then(|v| v.downcast_ref::<T>())
                    .copied()
            })
            .unwrap_or_default()
    })
}

pub fn with_theme<R>(theme: Theme, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local(theme);
        f()
    })
}

pub fn with_density<R>(density: Density, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local(density);
        f()
    })
}

pub fn with_text_scale<R>(scale: TextScale, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local(scale);
        f()
    })
}

pub fn theme() -> Theme {
    get_local::<Theme>()
}

pub fn density() -> Density {
    get_local::<Density>()
}

pub fn text_scale() -> TextScale {
    get_local::<TextScale>()
}

/// Convert a dp scalar into px using the current Density.
pub fn dp_to_px(dp: f32) -> f32 {
    dp * density().scale
}

/// Convert a font size in sp into px (Density × TextScale).
pub fn sp_to_px(sp: f32) -> f32 {
    sp * density().scale * text_scale().0
}
