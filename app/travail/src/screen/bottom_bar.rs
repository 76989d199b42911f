use travail_core::*;
use travail_ui::*;

use crate::res;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Home,
    Bag,
    Bookmark,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Bag, Tab::Bookmark, Tab::Profile];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Bag => "Bag",
            Tab::Bookmark => "Bookmark",
            Tab::Profile => "Profile",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tab::Home => res::TAB_HOME,
            Tab::Bag => res::TAB_BAG,
            Tab::Bookmark => res::TAB_BOOKMARK,
            Tab::Profile => res::TAB_PROFILE,
        }
    }
}

/// There is a single screen, so Home is always the current tab.
pub const SELECTED_TAB: Tab = Tab::Home;

pub fn BottomBar() -> View {
    let th = theme();
    Row(Modifier::new()
        .fill_max_width()
        .background(th.surface)
        .padding(8.0)
        .justify_content(JustifyContent::SpaceBetween)
        .align_items(AlignItems::Center))
    .child(
        Tab::ALL
            .into_iter()
            .map(|t| BottomBarItem(t, t == SELECTED_TAB))
            .collect::<Vec<_>>(),
    )
}

fn BottomBarItem(tab: Tab, selected: bool) -> View {
    let th = theme();
    Icon(tab.icon(), Modifier::new().size(24.0, 24.0))
        .tint(if selected { th.tab_selected } else { th.muted })
        .semantics(Semantics::new(Role::Image).label(tab.label()))
}
