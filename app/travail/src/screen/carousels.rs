//! Read-only promotional card rows and the achievements banner.

use travail_core::*;
use travail_ui::*;

use crate::res;

pub const BEST_OFFERS: &str = "Best offers";
pub const WINTER_JOURNEY: &str = "Winter Journey";
pub const POPULAR_LOCATION: &str = "Popular Location";
pub const SEE_ALL: &str = "See all";
pub const VIEW_DETAIL: &str = "View Detail";
pub const ACHIEVEMENTS: &str = "🎁 1/10 Journeys";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Offer {
    pub image: &'static str,
    pub title: &'static str,
    pub discount: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Journey {
    pub image: &'static str,
    pub title: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub image: &'static str,
    pub name: &'static str,
    pub place: &'static str,
    pub distance: &'static str,
}

pub const OFFERS: [Offer; 2] = [
    Offer {
        image: res::IMAGE0,
        title: "Couple's Gift for Couples",
        discount: "Up to 30% OFF",
    },
    Offer {
        image: res::IMAGE1,
        title: "For Winter Holidays",
        discount: "Up to 20% OFF",
    },
];

pub const JOURNEYS: [Journey; 2] = [
    Journey {
        image: res::IMAGE2,
        title: "Shimla Best Kept Secret",
    },
    Journey {
        image: res::IMAGE3,
        title: "Charming Kasol Vibes",
    },
];

pub const LOCATIONS: [Location; 2] = [
    Location {
        image: res::IMAGE4,
        name: "Eiffel Tower",
        place: "Paris Eytel Kulesi",
        distance: "2450 KMS",
    },
    Location {
        image: res::IMAGE5,
        name: "Beautiful China",
        place: "Shanghai, China",
        distance: "6000 KMS",
    },
];

/// Title with a "See all" link that goes nowhere.
pub fn SectionHeader(title: &str) -> View {
    Row(Modifier::new()
        .fill_max_width()
        .padding_hv(16.0, 0.0)
        .justify_content(JustifyContent::SpaceBetween)
        .align_items(AlignItems::Center))
    .child((
        Text(title).size(18.0).bold().color(Color::BLACK),
        Text(SEE_ALL)
            .size(14.0)
            .bold()
            .color(theme().primary)
            .modifier(
                Modifier::new()
                    .clickable(|| {})
                    .semantics(Semantics::button(format!("{SEE_ALL} {title}"))),
            ),
    ))
}

/// Header plus a horizontally scrolling row of `cards`.
fn Section(title: &str, cards: Vec<View>) -> View {
    Column(Modifier::new().fill_max_width().spaced_by(8.0)).child((
        SectionHeader(title),
        HorizontalScroll(
            Modifier::new().fill_max_width(),
            remember_scroll_state(format!("section:{title}")),
            Row(Modifier::new().padding_hv(16.0, 0.0).spaced_by(16.0)).child(cards),
        ),
    ))
}

/// Card container modifier and its cropped header image.
fn card_frame(width: f32, image: &str, image_height: f32) -> (Modifier, View) {
    let th = theme();
    (
        Modifier::new()
            .width(width)
            .background(th.surface)
            .clip_rounded(th.shape_medium)
            .padding(8.0),
        Icon(
            image,
            Modifier::new()
                .fill_max_width()
                .height(image_height)
                .clip_rounded(th.shape_medium),
        )
        .content_scale(ContentScale::Crop),
    )
}

fn OfferCard(offer: &Offer) -> View {
    let (m, image) = card_frame(200.0, offer.image, 100.0);
    Column(m).child((
        image,
        Gap(8.0),
        Text(offer.title).size(14.0).bold().color(Color::BLACK),
        Text(offer.discount)
            .size(12.0)
            .weight(FontWeight::Light)
            .color(theme().muted),
        Gap(8.0),
        Text(VIEW_DETAIL)
            .size(12.0)
            .bold()
            .color(theme().primary)
            .modifier(
                Modifier::new()
                    .clickable(|| {})
                    .semantics(Semantics::button(format!("{VIEW_DETAIL} {}", offer.title))),
            ),
    ))
}

fn JourneyCard(journey: &Journey) -> View {
    let (m, image) = card_frame(150.0, journey.image, 80.0);
    Column(m).child((
        image,
        Gap(8.0),
        Text(journey.title).size(14.0).bold().color(Color::BLACK),
    ))
}

fn LocationCard(location: &Location) -> View {
    let (m, image) = card_frame(150.0, location.image, 100.0);
    Column(m).child((
        image,
        Gap(8.0),
        Text(location.name).size(14.0).bold().color(Color::BLACK),
        Text(location.place).size(12.0).color(theme().muted),
        Text(location.distance).size(12.0).bold().color(Color::BLACK),
    ))
}

pub fn BestOffersSection() -> View {
    Section(BEST_OFFERS, OFFERS.iter().map(OfferCard).collect())
}

pub fn WinterJourneySection() -> View {
    Section(WINTER_JOURNEY, JOURNEYS.iter().map(JourneyCard).collect())
}

pub fn PopularLocationsSection() -> View {
    Section(POPULAR_LOCATION, LOCATIONS.iter().map(LocationCard).collect())
}

pub fn MyAchievementsSection() -> View {
    let th = theme();
    Box(Modifier::new().fill_max_width().padding_hv(16.0, 0.0)).child(
        Box(Modifier::new()
            .fill_max_width()
            .background(th.primary)
            .clip_rounded(th.shape_medium)
            .padding(16.0)
            .center_content())
        .child(Text(ACHIEVEMENTS).size(16.0).bold().color(Color::WHITE)),
    )
}
