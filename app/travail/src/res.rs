//! Bundled drawable ids, resolved by the renderer as
//! `<assets>/drawable/<id>.png`.

pub const IC_MENU: &str = "ic_menu";
pub const NOTIFICATION: &str = "notification";
pub const SEARCH: &str = "baseline_search_24";
pub const FILTER: &str = "icone";

pub const SWAP: &str = "baseline_autorenew_24";
pub const CALENDAR: &str = "baseline_calendar_month_24";
pub const REMOVE: &str = "baseline_remove_24";
pub const ADD: &str = "baseline_add_box_24";

pub const PLACES: &str = "red";
pub const PLANE: &str = "plane";
pub const TRAIN: &str = "train";
pub const BUS_STOP: &str = "busstop";
pub const TAXI: &str = "taxi";

pub const IMAGE0: &str = "image0";
pub const IMAGE1: &str = "image1";
pub const IMAGE2: &str = "image2";
pub const IMAGE3: &str = "image3";
pub const IMAGE4: &str = "image4";
pub const IMAGE5: &str = "image5";

pub const TAB_HOME: &str = "li_home";
pub const TAB_BAG: &str = "li_briefcase";
pub const TAB_BOOKMARK: &str = "li_bookmark";
pub const TAB_PROFILE: &str = "li_user";

/// Corner radius (dp) of the search box and filter button.
pub const SEARCH_RADIUS: f32 = 5.0;
