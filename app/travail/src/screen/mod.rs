//! The dashboard screen: a fixed top bar and bottom bar around a vertically
//! scrolling body.

pub mod booking;
pub mod bottom_bar;
pub mod carousels;
pub mod categories;
pub mod navbar;
pub mod search;

use travail_core::*;
use travail_ui::*;

pub use booking::{FlightBookingForm, PassengerCount, TripType};
pub use bottom_bar::{BottomBar, Tab};
pub use carousels::{
    BestOffersSection, MyAchievementsSection, PopularLocationsSection, WinterJourneySection,
};
pub use categories::{Category, CategorySelector};
pub use navbar::Navbar;
pub use search::SearchBar;

/// Space between body sections, in dp.
pub const SECTION_GAP: f32 = 16.0;

pub fn MainScreen() -> View {
    let th = theme();
    let body = Column(Modifier::new().fill_max_width()).child(vec![
        Gap(SECTION_GAP),
        SearchBar(),
        Gap(SECTION_GAP),
        CategorySelector(),
        Gap(SECTION_GAP),
        FlightBookingForm(),
        Gap(SECTION_GAP),
        BestOffersSection(),
        Gap(SECTION_GAP),
        WinterJourneySection(),
        Gap(SECTION_GAP),
        PopularLocationsSection(),
        Gap(SECTION_GAP),
        MyAchievementsSection(),
        Gap(SECTION_GAP),
    ]);

    Column(Modifier::new().fill_max_size().background(th.background)).child((
        Navbar(),
        VerticalScroll(
            Modifier::new().weight(1.0).fill_max_width(),
            remember_scroll_state("body"),
            body,
        ),
        BottomBar(),
    ))
}
