#![allow(non_snake_case)]
//! Travail: a single travel dashboard screen.
//!
//! `app` is the composition root handed to the platform runners. It can be
//! composed headlessly as well:
//!
//! ```rust
//! use travail_core::*;
//! use travail_ui::*;
//! use std::collections::HashMap;
//!
//! let mut sched = Scheduler::new();
//! let frame = sched
//!     .repose(travail::app, |view, size| {
//!         layout_and_paint(view, size, &HashMap::new(), &Interactions::default(), None)
//!     })
//!     .unwrap();
//! assert!(frame.semantics_by_label("Search Flight").is_some());
//! ```

pub mod res;
pub mod screen;

use travail_core::*;

pub use screen::MainScreen;

/// Composition root.
pub fn app(_sched: &mut Scheduler) -> View {
    MainScreen()
}

#[cfg(target_os = "android")]
#[unsafe(no_mangle)]
pub extern "C" fn android_main(android_app: winit::platform::android::activity::AndroidApp) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag("travail"),
    );
    if let Err(e) = travail_platform::android::run_android_app(android_app, app) {
        log::error!("travail exited with an error: {e:?}");
    }
}
