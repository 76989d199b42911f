//! Headless checks of the dashboard: compose, lay out at a phone-sized
//! surface, then drive it through the same router the runners use.

use travail::screen::booking::{
    ADULTS, ARRIVAL_HINT, CHILDREN, DATE_HINT, DEPARTURE_HINT, SEARCH_FLIGHT, TITLE, TripType,
};
use travail::screen::carousels::{
    ACHIEVEMENTS, BEST_OFFERS, JOURNEYS, LOCATIONS, OFFERS, POPULAR_LOCATION, SEE_ALL,
    VIEW_DETAIL, WINTER_JOURNEY,
};
use travail::screen::navbar::{GREETING, TAGLINE};
use travail::screen::search::SEARCH_HINT;
use travail::screen::{Category, Tab};
use travail_core::*;
use travail_platform::Router;

struct Screen {
    sched: Scheduler,
    router: Router,
    frame: Frame,
}

impl Screen {
    /// Fresh screen, tall enough that nothing sits below the fold.
    fn open() -> Self {
        Self::open_at((412, 2600))
    }

    fn open_at(size: (u32, u32)) -> Self {
        reset_composition();
        let mut sched = Scheduler::new();
        sched.size = size;
        let mut router = Router::default();
        let mut root = travail::app;
        let frame = router.compose(&mut sched, &mut root).expect("compose");
        Self {
            sched,
            router,
            frame,
        }
    }

    fn recompose(&mut self) {
        let mut root = travail::app;
        self.frame = self
            .router
            .compose(&mut self.sched, &mut root)
            .expect("compose");
    }

    fn controls(&self, role: Role, label: &str) -> Vec<&SemNode> {
        self.frame
            .semantics_nodes
            .iter()
            .filter(|n| n.role == role && n.label.as_deref() == Some(label))
            .collect()
    }

    fn control(&self, role: Role, label: &str) -> &SemNode {
        self.controls(role, label)
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("no {role:?} labelled {label:?}"))
    }

    fn tap(&mut self, id: u64) {
        let at = self.frame.hit(id).expect("hit region").rect.center();
        self.router
            .pointer_down(&self.frame, &mut self.sched.focused, at);
        self.router.pointer_up(&self.frame, at);
        self.recompose();
    }

    fn tap_button(&mut self, label: &str) {
        let id = self.control(Role::Button, label).id;
        self.tap(id);
    }

    fn press(&mut self, key: Key) {
        let ev = KeyEvent {
            key,
            modifiers: Modifiers::default(),
        };
        self.router
            .key(&self.frame, &mut self.sched.focused, &ev);
    }

    fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press(Key::Character(ch.to_string()));
        }
        self.recompose();
    }

    fn texts(&self) -> Vec<(&str, Color, FontWeight)> {
        self.frame.scene.texts().collect()
    }

    fn has_text(&self, needle: &str) -> bool {
        self.frame.scene.texts().any(|(t, ..)| t == needle)
    }

    fn text_rect(&self, needle: &str) -> Rect {
        self.frame
            .scene
            .nodes
            .iter()
            .find_map(|n| match n {
                SceneNode::Text { rect, text, .. } if text == needle => Some(*rect),
                _ => None,
            })
            .unwrap_or_else(|| panic!("text {needle:?} not painted"))
    }

    /// The text painted right after `label`.
    fn text_after(&self, label: &str) -> String {
        let texts = self.texts();
        let i = texts
            .iter()
            .position(|(t, ..)| *t == label)
            .unwrap_or_else(|| panic!("text {label:?} not painted"));
        texts[i + 1].0.to_string()
    }

    fn image_tint(&self, resource: &str) -> Option<Color> {
        self.frame.scene.nodes.iter().find_map(|n| match n {
            SceneNode::Image {
                resource: r, tint, ..
            } if r == resource => *tint,
            _ => None,
        })
    }
}

fn bold_categories(screen: &Screen) -> Vec<&'static str> {
    let texts = screen.texts();
    Category::ALL
        .into_iter()
        .map(Category::label)
        .filter(|label| {
            texts
                .iter()
                .any(|(t, _, w)| t == label && *w == FontWeight::Bold)
        })
        .collect()
}

fn primary_rings(screen: &Screen) -> Vec<Rect> {
    let primary = theme().primary;
    screen
        .frame
        .scene
        .nodes
        .iter()
        .filter_map(|n| match n {
            SceneNode::Border { rect, color, .. } if *color == primary => Some(*rect),
            _ => None,
        })
        .collect()
}

fn inside(inner: Rect, outer: Rect) -> bool {
    inner.x >= outer.x
        && inner.y >= outer.y
        && inner.x + inner.w <= outer.x + outer.w
        && inner.y + inner.h <= outer.y + outer.h
}

#[test]
fn initial_render_defaults() {
    let screen = Screen::open();
    let th = theme();

    assert_eq!(bold_categories(&screen), ["Flights"]);
    assert_eq!(screen.text_after(ADULTS), "0");
    assert_eq!(screen.text_after(CHILDREN), "0");

    for t in TripType::ALL {
        let color = screen
            .texts()
            .into_iter()
            .find(|(text, ..)| *text == t.label())
            .map(|(_, c, _)| c);
        let expected = if t == TripType::OneWay {
            Color::WHITE
        } else {
            th.muted
        };
        assert_eq!(color, Some(expected), "{}", t.label());
    }
    let one_way_bg = screen.frame.scene.nodes.windows(2).find_map(|w| match w {
        [SceneNode::Rect { color, .. }, SceneNode::Text { text, .. }] if text == "One Way" => {
            Some(*color)
        }
        _ => None,
    });
    assert_eq!(one_way_bg, Some(th.primary));

    for tab in Tab::ALL {
        let expected = if tab == Tab::Home {
            th.tab_selected
        } else {
            th.muted
        };
        assert_eq!(screen.image_tint(tab.icon()), Some(expected), "{tab:?}");
    }
    assert_eq!(th.tab_selected, Color::from_hex("#8E44AD"));
}

#[test]
fn clicking_a_category_selects_only_that_one() {
    let mut screen = Screen::open();

    for category in Category::ALL {
        screen.tap_button(category.label());

        assert_eq!(bold_categories(&screen), [category.label()]);

        let rings = primary_rings(&screen);
        assert_eq!(rings.len(), 1, "{category:?}");
        let item = screen.control(Role::Button, category.label()).rect;
        assert!(inside(rings[0], item), "{category:?}: ring outside item");
    }

    // Re-selecting the current category keeps it selected.
    screen.tap_button("Taxi");
    assert_eq!(bold_categories(&screen), ["Taxi"]);
}

#[test]
fn counter_stays_at_zero_when_decremented() {
    let mut screen = Screen::open();

    let adult_decrease = screen.controls(Role::Button, "Decrease")[0].id;
    for _ in 0..3 {
        screen.tap(adult_decrease);
        assert_eq!(screen.text_after(ADULTS), "0");
    }

    let adult_increase = screen.controls(Role::Button, "Increase")[0].id;
    screen.tap(adult_increase);
    screen.tap(adult_decrease);
    screen.tap(adult_decrease);
    assert_eq!(screen.text_after(ADULTS), "0");
}

#[test]
fn counter_counts_every_increment() {
    let mut screen = Screen::open();

    let child_increase = screen.controls(Role::Button, "Increase")[1].id;
    for n in 1..=12 {
        screen.tap(child_increase);
        assert_eq!(screen.text_after(CHILDREN), n.to_string());
    }
    // Counters are independent.
    assert_eq!(screen.text_after(ADULTS), "0");
}

#[test]
fn placeholder_shows_only_while_empty() {
    let mut screen = Screen::open();
    let muted = theme().muted;

    for hint in [SEARCH_HINT, DEPARTURE_HINT, ARRIVAL_HINT, DATE_HINT] {
        assert!(
            screen
                .texts()
                .contains(&(hint, muted, FontWeight::Normal)),
            "{hint} missing"
        );
    }

    let departure = screen.control(Role::TextField, DEPARTURE_HINT).id;
    screen.tap(departure);
    assert_eq!(screen.sched.focused, Some(departure));

    screen.type_text("Paris");
    assert!(screen.texts().contains(&("Paris", Color::BLACK, FontWeight::Normal)));
    assert!(!screen.has_text(DEPARTURE_HINT));
    assert!(screen.has_text(ARRIVAL_HINT));

    for _ in 0.."Paris".len() {
        screen.press(Key::Backspace);
    }
    screen.recompose();
    assert!(screen.has_text(DEPARTURE_HINT));
    assert!(!screen.has_text("Paris"));
}

#[test]
fn each_field_keeps_its_own_text() {
    let mut screen = Screen::open();

    let search = screen.control(Role::TextField, SEARCH_HINT).id;
    screen.tap(search);
    screen.type_text("Goa");

    let date = screen.control(Role::TextField, DATE_HINT).id;
    screen.tap(date);
    screen.type_text("12/01");

    assert!(screen.has_text("Goa"));
    assert!(screen.has_text("12/01"));
    assert!(!screen.has_text(SEARCH_HINT));
    assert!(!screen.has_text(DATE_HINT));
    assert!(screen.has_text(DEPARTURE_HINT));
}

#[test]
fn search_flight_changes_nothing() {
    let mut screen = Screen::open();
    let before = screen.frame.scene.nodes.clone();

    screen.tap_button(SEARCH_FLIGHT);
    screen.tap_button("Swap");
    screen.tap_button("Filter");
    screen.tap_button(&format!("{SEE_ALL} {BEST_OFFERS}"));

    assert_eq!(screen.frame.scene.nodes, before);
    assert!(screen.has_text(TITLE));
}

#[test]
fn trip_chips_and_detail_links_are_inert() {
    let mut screen = Screen::open();
    let before = screen.frame.scene.nodes.clone();

    for t in TripType::ALL {
        screen.tap_button(t.label());
    }
    for offer in &OFFERS {
        screen.tap_button(&format!("{VIEW_DETAIL} {}", offer.title));
    }

    assert_eq!(screen.frame.scene.nodes, before);
    let one_way = screen
        .texts()
        .into_iter()
        .find(|(t, ..)| *t == TripType::OneWay.label())
        .map(|(_, c, _)| c);
    assert_eq!(one_way, Some(Color::WHITE));
    for t in [TripType::RoundTrip, TripType::Multicity] {
        assert!(
            screen
                .texts()
                .contains(&(t.label(), theme().muted, FontWeight::Bold)),
            "{}",
            t.label()
        );
    }
}

#[test]
fn recreation_resets_local_state() {
    let mut screen = Screen::open();

    screen.tap_button("Trains");
    let increase = screen.controls(Role::Button, "Increase")[0].id;
    screen.tap(increase);
    let departure = screen.control(Role::TextField, DEPARTURE_HINT).id;
    screen.tap(departure);
    screen.type_text("Delhi");
    assert_eq!(screen.text_after(ADULTS), "1");

    reset_composition();
    screen.recompose();

    assert_eq!(bold_categories(&screen), ["Flights"]);
    assert_eq!(screen.text_after(ADULTS), "0");
    assert!(screen.has_text(DEPARTURE_HINT));
    assert!(!screen.has_text("Delhi"));
}

#[test]
fn carousels_render_their_cards() {
    let screen = Screen::open();

    for header in [BEST_OFFERS, WINTER_JOURNEY, POPULAR_LOCATION] {
        assert!(screen.has_text(header), "{header}");
        assert_eq!(
            screen.controls(Role::Button, &format!("{SEE_ALL} {header}")).len(),
            1
        );
    }
    for offer in OFFERS {
        assert!(screen.has_text(offer.title));
        assert!(screen.has_text(offer.discount));
        assert!(!screen
            .controls(Role::Button, &format!("{VIEW_DETAIL} {}", offer.title))
            .is_empty());
    }
    for journey in JOURNEYS {
        assert!(screen.has_text(journey.title));
    }
    for location in LOCATIONS {
        assert!(screen.has_text(location.name));
        assert!(screen.has_text(location.place));
        assert!(screen.has_text(location.distance));
    }
    assert!(screen.has_text(ACHIEVEMENTS));
    assert!(screen.has_text(GREETING));
    assert!(screen.has_text(TAGLINE));

    let cropped = screen
        .frame
        .scene
        .nodes
        .iter()
        .filter(|n| {
            matches!(
                n,
                SceneNode::Image {
                    scale: ContentScale::Crop,
                    ..
                }
            )
        })
        .count();
    assert_eq!(cropped, 6);
}

#[test]
fn body_sections_stack_in_order() {
    let screen = Screen::open();
    let ys: Vec<f32> = [
        TAGLINE,
        SEARCH_HINT,
        "Flights",
        TITLE,
        BEST_OFFERS,
        WINTER_JOURNEY,
        POPULAR_LOCATION,
        ACHIEVEMENTS,
    ]
    .into_iter()
    .map(|t| screen.text_rect(t).y)
    .collect();
    assert!(ys.windows(2).all(|w| w[0] < w[1]), "{ys:?}");

    let offer_h = screen
        .frame
        .scene
        .nodes
        .iter()
        .find_map(|n| match n {
            SceneNode::Image { rect, resource, .. } if resource == OFFERS[0].image => Some(rect.h),
            _ => None,
        });
    assert_eq!(offer_h, Some(100.0));
}

#[test]
fn wheel_scrolls_carousel_then_body() {
    let mut screen = Screen::open_at((412, 915));

    // Vertical wheel over the search bar moves the body, not the bars.
    let tagline = screen.text_rect(TAGLINE);
    let title = screen.text_rect(TITLE);
    let over_search = screen.text_rect(SEARCH_HINT).center();
    assert!(screen.router.wheel(
        &screen.frame,
        over_search,
        Vec2 { x: 0.0, y: 200.0 }
    ));
    screen.recompose();
    assert_eq!(screen.text_rect(TAGLINE), tagline);
    assert!((screen.text_rect(TITLE).y - (title.y - 200.0)).abs() < 0.5);

    // Scroll further so the first carousel is on screen.
    let over_title = screen.text_rect(TITLE).center();
    screen
        .router
        .wheel(&screen.frame, over_title, Vec2 { x: 0.0, y: 400.0 });
    screen.recompose();

    // Two 200dp cards overflow a 412dp row by 36dp.
    let card = screen.text_rect(OFFERS[0].title);
    assert!(screen.router.wheel(
        &screen.frame,
        card.center(),
        Vec2 { x: 100.0, y: 0.0 }
    ));
    screen.recompose();
    let moved = screen.text_rect(OFFERS[0].title);
    assert!((moved.x - (card.x - 36.0)).abs() < 0.5, "{moved:?} vs {card:?}");
    assert!((moved.y - card.y).abs() < 0.5);
}
