//! Flight booking card.
//!
//! Everything here is local, throwaway UI state: field texts and passenger
//! counts live in `remember` slots and reset when the screen is recreated.
//! The trip-type chips, the swap button and "Search Flight" are inert.

use travail_core::*;
use travail_ui::*;

use crate::res;

pub const TITLE: &str = "Book your Flight";
pub const DEPARTURE_HINT: &str = "Choose Departure from";
pub const ARRIVAL_HINT: &str = "Choose Arrival at";
pub const DATE_HINT: &str = "Choose your Date";
pub const ADULTS: &str = "Adult (12+)";
pub const CHILDREN: &str = "Childs (2-12)";
pub const SEARCH_FLIGHT: &str = "Search Flight";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TripType {
    OneWay,
    RoundTrip,
    Multicity,
}

impl TripType {
    pub const ALL: [TripType; 3] = [TripType::OneWay, TripType::RoundTrip, TripType::Multicity];

    pub fn label(self) -> &'static str {
        match self {
            TripType::OneWay => "One Way",
            TripType::RoundTrip => "Round Trip",
            TripType::Multicity => "Multicity",
        }
    }
}

/// The chip drawn as selected. Trip type is display only.
pub const SELECTED_TRIP: TripType = TripType::OneWay;

/// Passenger count, never below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct PassengerCount(u32);

impl PassengerCount {
    pub fn new(n: u32) -> Self {
        Self(n)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

pub fn FlightBookingForm() -> View {
    let th = theme();
    Box(Modifier::new().fill_max_width().padding(16.0)).child(
        Column(
            Modifier::new()
                .fill_max_width()
                .background(th.surface)
                .clip_rounded(th.shape_medium)
                .padding(16.0),
        )
        .child((
            Text(TITLE)
                .size(20.0)
                .bold()
                .color(Color::BLACK)
                .modifier(Modifier::new().padding_values(PaddingValues {
                    bottom: 16.0,
                    ..Default::default()
                })),
            Row(Modifier::new()
                .fill_max_width()
                .padding_hv(0.0, 8.0)
                .justify_content(JustifyContent::SpaceBetween))
            .child(
                TripType::ALL
                    .into_iter()
                    .map(|t| FlightTypeButton(t.label(), t == SELECTED_TRIP))
                    .collect::<Vec<_>>(),
            ),
            Gap(16.0),
            Column(
                Modifier::new()
                    .fill_max_width()
                    .align_items(AlignItems::Center),
            )
            .child((
                FlightTextField(DEPARTURE_HINT, None),
                Gap(8.0),
                IconButton(
                    res::SWAP,
                    "Swap",
                    Modifier::new()
                        .size(48.0, 48.0)
                        .background(th.primary)
                        .clip_rounded(24.0),
                    24.0,
                    || {},
                )
                .tint(Color::WHITE),
                Gap(8.0),
                FlightTextField(ARRIVAL_HINT, None),
            )),
            Gap(16.0),
            FlightTextField(
                DATE_HINT,
                Some(
                    Icon(res::CALENDAR, Modifier::new().size(24.0, 24.0))
                        .tint(th.primary)
                        .semantics(Semantics::new(Role::Image).label("Calendar")),
                ),
            ),
            Gap(16.0),
            Row(Modifier::new()
                .fill_max_width()
                .padding_hv(0.0, 8.0)
                .justify_content(JustifyContent::SpaceBetween))
            .child((
                PassengerCounter(ADULTS, PassengerCount::default()),
                PassengerCounter(CHILDREN, PassengerCount::default()),
            )),
            Gap(16.0),
            Button(
                SEARCH_FLIGHT,
                Modifier::new()
                    .fill_max_width()
                    .height(50.0)
                    .background(th.primary)
                    .clip_rounded(th.shape_medium),
                || {},
            ),
        )),
    )
}

/// Trip-type chip. Clicking does nothing.
pub fn FlightTypeButton(label: &str, is_selected: bool) -> View {
    let th = theme();
    let (bg, fg) = if is_selected {
        (th.primary, Color::WHITE)
    } else {
        (th.field, th.muted)
    };
    Text(label)
        .size(14.0)
        .bold()
        .color(fg)
        .modifier(
            Modifier::new()
                .background(bg)
                .clip_rounded(th.shape_small)
                .padding_hv(16.0, 8.0)
                .clickable(|| {})
                .semantics(Semantics::button(label)),
        )
}

/// Rounded input with its own remembered text; `hint` shows while empty.
pub fn FlightTextField(hint: &str, trailing: Option<View>) -> View {
    let value = remember(|| signal(String::new()));
    let th = theme();

    let mut row = vec![
        BasicTextField(value.get(), hint, Modifier::new().weight(1.0), {
            let value = (*value).clone();
            move |s| value.set(s)
        })
        .size(16.0)
        .color(Color::BLACK),
    ];
    row.extend(trailing);

    Box(Modifier::new()
        .fill_max_width()
        .background(th.field)
        .clip_rounded(th.shape_small)
        .padding_hv(16.0, 12.0))
    .child(Row(Modifier::new().align_items(AlignItems::Center)).child(row))
}

/// Label over a "- n +" stepper.
pub fn PassengerCounter(label: &str, initial: PassengerCount) -> View {
    let count = remember(|| signal(initial));
    let th = theme();

    let step = |resource: &'static str, action: &'static str, f: fn(PassengerCount) -> PassengerCount| {
        let count = (*count).clone();
        IconButton(
            resource,
            action,
            Modifier::new()
                .size(48.0, 48.0)
                .background(Color::TRANSPARENT),
            24.0,
            move || count.update(|c| *c = f(*c)),
        )
        .tint(th.primary)
    };

    Column(Modifier::new().align_items(AlignItems::Center)).child((
        Text(label)
            .size(14.0)
            .bold()
            .color(th.muted)
            .modifier(Modifier::new().padding_values(PaddingValues {
                bottom: 8.0,
                ..Default::default()
            })),
        Row(Modifier::new().align_items(AlignItems::Center)).child((
            step(res::REMOVE, "Decrease", PassengerCount::decrement),
            Text(count.get().get().to_string())
                .size(16.0)
                .bold()
                .color(Color::BLACK),
            step(res::ADD, "Increase", PassengerCount::increment),
        )),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_floors_at_zero() {
        let c = PassengerCount::default();
        assert_eq!(c.decrement(), PassengerCount::new(0));
        assert_eq!(c.increment().decrement().decrement().get(), 0);
    }

    #[test]
    fn count_increments_without_ceiling() {
        let c = (0..250).fold(PassengerCount::default(), |c, _| c.increment());
        assert_eq!(c.get(), 250);
        assert_eq!(PassengerCount::new(u32::MAX).increment().get(), u32::MAX);
    }

    #[test]
    fn only_one_way_is_selected() {
        let selected: Vec<_> = TripType::ALL
            .into_iter()
            .filter(|&t| t == SELECTED_TRIP)
            .map(TripType::label)
            .collect();
        assert_eq!(selected, ["One Way"]);
    }
}
