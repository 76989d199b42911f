//! # State and composition
//!
//! Screens are plain functions returning a `View` tree. They are re-run on
//! every frame; anything that must survive between frames lives in a
//! `remember*` slot.
//!
//! - `Signal<T>` — cloneable observable cell.
//! - `remember` / `remember_state` — order‑based slots owned by the thread's
//!   composer. The Nth call in a composition always refers to the Nth value.
//! - `remember_with_key` — key‑based slots, stable across conditional branches.
//!
//! ```rust
//! use travail_core::*;
//!
//! let count = signal(0u32);
//! count.update(|c| *c += 1);
//! assert_eq!(count.get(), 1);
//! ```
//!
//! A counter widget keeps its value in a remembered signal and re-renders the
//! text from it on the next frame:
//!
//! ```rust,ignore
//! fn Counter() -> View {
//!     let count = remember(|| signal(0u32));
//!     travail_ui::Button(format!("Count = {}", count.get()), {
//!         let count = count.clone();
//!         move || count.update(|c| *c += 1)
//!     })
//! }
//! ```
//!
//! `reset_composition` drops every slot, which is how a widget tree is
//! "recreated" with fresh state.

pub mod color;
pub mod error;
pub mod geometry;
pub mod input;
pub mod locals;
pub mod modifier;
pub mod prelude;
pub mod render_api;
pub mod runtime;
pub mod scope;
pub mod semantics;
pub mod signal;
pub mod tests;
pub mod view;

pub use color::*;
pub use error::*;
pub use geometry::*;
pub use locals::*;
pub use modifier::*;
pub use prelude::*;
pub use runtime::*;
pub use semantics::*;
pub use signal::*;
pub use view::*;
