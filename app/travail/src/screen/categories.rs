use travail_core::*;
use travail_ui::*;

use crate::res;

/// Travel categories, in display order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Category {
    Places,
    #[default]
    Flights,
    Trains,
    Buses,
    Taxi,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Places,
        Category::Flights,
        Category::Trains,
        Category::Buses,
        Category::Taxi,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Places => "Places",
            Category::Flights => "Flights",
            Category::Trains => "Trains",
            Category::Buses => "Buses",
            Category::Taxi => "Taxi",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Places => res::PLACES,
            Category::Flights => res::PLANE,
            Category::Trains => res::TRAIN,
            Category::Buses => res::BUS_STOP,
            Category::Taxi => res::TAXI,
        }
    }
}

/// Horizontally scrolling category strip with a single selection.
pub fn CategorySelector() -> View {
    let selected = remember(|| signal(Category::default()));
    let current = selected.get();

    let items: Vec<View> = Category::ALL
        .into_iter()
        .map(|c| {
            let selected = (*selected).clone();
            CategoryItem(c, c == current, move || {
                log::debug!("category -> {}", c.label());
                selected.set(c)
            })
        })
        .collect();

    HorizontalScroll(
        Modifier::new().fill_max_width(),
        remember_scroll_state("categories"),
        Row(Modifier::new().padding(16.0).spaced_by(16.0)).child(items),
    )
}

fn CategoryItem(category: Category, is_selected: bool, on_click: impl Fn() + 'static) -> View {
    let th = theme();
    let ring = if is_selected {
        th.primary
    } else {
        Color::TRANSPARENT
    };

    Column(
        Modifier::new()
            .size(80.0, 100.0)
            .align_items(AlignItems::Center)
            .justify_content(JustifyContent::Center)
            .clickable(on_click)
            .semantics(Semantics::button(category.label())),
    )
    .child((
        Box(Modifier::new()
            .size(68.0, 68.0)
            .clip_rounded(34.0)
            .border(2.0, ring, 34.0)
            .center_content())
        .child(
            Box(Modifier::new()
                .size(60.0, 60.0)
                .clip_rounded(30.0)
                .center_content())
            .child(
                Icon(category.icon(), Modifier::new().size(40.0, 40.0))
                    .semantics(Semantics::new(Role::Image).label(category.label())),
            ),
        ),
        Gap(8.0),
        Text(category.label())
            .size(14.0)
            .color(if is_selected { Color::BLACK } else { th.muted })
            .weight(if is_selected {
                FontWeight::Bold
            } else {
                FontWeight::Normal
            }),
    ))
}
