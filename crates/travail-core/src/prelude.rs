pub use crate::color::Color;
pub use crate::error::*;
pub use crate::geometry::{Rect, Size, Vec2};
pub use crate::input::*;
pub use crate::locals::{
    Density, TextScale, Theme, density, dp_to_px, sp_to_px, text_scale, theme, with_density,
    with_text_scale, with_theme,
};
pub use crate::modifier::{Border, Modifier, PaddingValues};
pub use crate::render_api::RenderBackend;
pub use crate::runtime::{
    ComposeGuard, Frame, HitRegion, Scheduler, SemNode, remember, remember_state,
    remember_with_key, reset_composition,
};
pub use crate::scope::{Scope, current_scope, on_dispose};
pub use crate::semantics::{Role, Semantics};
pub use crate::signal::{Signal, signal};
pub use crate::view::{Axis, ContentScale, FontWeight, Scene, SceneNode, View, ViewId, ViewKind};
pub use taffy::{AlignItems, AlignSelf, JustifyContent};
