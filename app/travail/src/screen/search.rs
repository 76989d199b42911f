use travail_core::*;
use travail_ui::*;

use crate::res;

pub const SEARCH_HINT: &str = "Search Places";

/// Search field with a leading loupe and the filter button next to it.
pub fn SearchBar() -> View {
    let query = remember(|| signal(String::new()));
    let th = theme();

    Row(Modifier::new()
        .fill_max_width()
        .padding_hv(16.0, 0.0)
        .align_items(AlignItems::Center))
    .child((
        Box(Modifier::new()
            .weight(1.0)
            .background(th.field)
            .clip_rounded(res::SEARCH_RADIUS)
            .padding_hv(16.0, 12.0))
        .child(
            Row(Modifier::new().align_items(AlignItems::Center)).child((
                Icon(res::SEARCH, Modifier::new().size(20.0, 20.0))
                    .tint(th.muted)
                    .semantics(Semantics::new(Role::Image).label("Search")),
                Gap(8.0),
                BasicTextField(query.get(), SEARCH_HINT, Modifier::new().weight(1.0), {
                    let query = (*query).clone();
                    move |s| query.set(s)
                })
                .color(Color::BLACK),
            )),
        ),
        Gap(8.0),
        FilterButton(),
    ))
}

fn FilterButton() -> View {
    let th = theme();
    Box(Modifier::new()
        .size(50.0, 50.0)
        .background(th.primary)
        .clip_rounded(res::SEARCH_RADIUS)
        .center_content()
        .clickable(|| {})
        .semantics(Semantics::button("Filter")))
    .child(Icon(res::FILTER, Modifier::new().size(20.0, 20.0)).tint(Color::WHITE))
}
