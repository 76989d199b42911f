use travail_core::*;
use travail_ui::*;

use crate::res;

pub const GREETING: &str = "Good Morning, Shreya....";
pub const TAGLINE: &str = "Make plan for weekend";

/// Top bar: menu and notification icons over the greeting.
pub fn Navbar() -> View {
    let th = theme();
    Column(
        Modifier::new()
            .fill_max_width()
            .background(th.surface)
            .padding(16.0),
    )
    .child((
        Row(Modifier::new().fill_max_width().align_items(AlignItems::Center)).child((
            Icon(res::IC_MENU, Modifier::new().size(24.0, 24.0))
                .tint(th.primary)
                .semantics(Semantics::new(Role::Image).label("Menu")),
            Gap(16.0),
            Column(Modifier::new().weight(1.0)),
            Gap(16.0),
            Icon(
                res::NOTIFICATION,
                Modifier::new()
                    .size(40.0, 40.0)
                    .background(th.outline)
                    .clip_rounded(20.0),
            )
            .semantics(Semantics::new(Role::Image).label("Profile")),
        )),
        Gap(16.0),
        MorningMessage(),
    ))
}

fn MorningMessage() -> View {
    Column(Modifier::new().fill_max_width()).child((
        Text(GREETING)
            .size(18.0)
            .color(Color::BLACK)
            .modifier(Modifier::new().padding_values(PaddingValues {
                bottom: 4.0,
                ..Default::default()
            })),
        Text(TAGLINE).size(20.0).bold().color(Color::BLACK),
    ))
}
