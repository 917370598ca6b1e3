//! Declarative description of the app's bottom tab bar.
//!
//! The UI host owns rendering. This module only states which tabs exist, in
//! what order, and how each one's icon and label look depending on whether
//! it is focused. Everything serialises to camelCase JSON.

mod color;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

pub use color::{Color, ColorParseError};

/// Tint of the focused tab.
pub const ACTIVE_TINT: Color = Color::rgb(0xff, 0xa0, 0x01);
/// Tint of every other tab.
pub const INACTIVE_TINT: Color = Color::rgb(0xcd, 0xcd, 0xe0);
/// Icon edge length in points.
pub const ICON_SIZE: u16 = 24;

/// Route a tab opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TabRoute {
    Home,
    Bookmark,
    Create,
    Profile,
}

impl TabRoute {
    /// Every route, in tab bar order.
    pub const ALL: [Self; 4] = [Self::Home, Self::Bookmark, Self::Create, Self::Profile];

    /// Route name used by the router.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Bookmark => "bookmark",
            Self::Create => "create",
            Self::Profile => "profile",
        }
    }
}

impl fmt::Display for TabRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised when a string names no tab.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tab route {0:?}")]
pub struct UnknownTabRoute(pub String);

impl FromStr for TabRoute {
    type Err = UnknownTabRoute;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|route| route.name() == raw)
            .ok_or_else(|| UnknownTabRoute(raw.to_owned()))
    }
}

/// Bundled icon image a tab shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconAsset {
    Home,
    Bookmark,
    Plus,
    Profile,
}

/// Label font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Semibold,
}

impl FontWeight {
    /// Style class of the bundled Poppins face for this weight.
    pub const fn font_class(self) -> &'static str {
        match self {
            Self::Regular => "font-pregular",
            Self::Semibold => "font-psemibold",
        }
    }
}

/// Label text size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Xs,
}

/// One tab of the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub route: TabRoute,
    pub title: &'static str,
    pub icon: IconAsset,
}

/// Icon and label of one tab as the host should draw them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabIndicator {
    pub route: TabRoute,
    pub icon: IconAsset,
    pub icon_size: u16,
    pub label: &'static str,
    pub label_size: TextSize,
    pub tint: Color,
    pub font_weight: FontWeight,
    pub focused: bool,
}

/// Chrome of the bar itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabBarStyle {
    pub background_color: Color,
    pub border_top_width: u16,
    pub border_top_color: Color,
    pub height: u16,
}

/// The whole tab bar configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabBar {
    pub tabs: Vec<Tab>,
    /// The bar's own labels; indicators draw their label instead.
    pub show_label: bool,
    pub header_shown: bool,
    pub active_tint: Color,
    pub inactive_tint: Color,
    pub style: TabBarStyle,
}

impl TabBar {
    /// Tab opening `route`, if the bar has one.
    pub fn tab(&self, route: TabRoute) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.route == route)
    }

    /// Indicator for `tab` in the given focus state.
    pub fn indicator(&self, tab: &Tab, focused: bool) -> TabIndicator {
        let (tint, font_weight) = if focused {
            (self.active_tint, FontWeight::Semibold)
        } else {
            (self.inactive_tint, FontWeight::Regular)
        };
        TabIndicator {
            route: tab.route,
            icon: tab.icon,
            icon_size: ICON_SIZE,
            label: tab.title,
            label_size: TextSize::Xs,
            tint,
            font_weight,
            focused,
        }
    }

    /// Indicators for every tab while `focused` is selected.
    pub fn render(&self, focused: TabRoute) -> Vec<TabIndicator> {
        self.tabs
            .iter()
            .map(|tab| self.indicator(tab, tab.route == focused))
            .collect()
    }
}

/// The app's four-tab bar.
pub fn app_tabs() -> TabBar {
    TabBar {
        tabs: vec![
            Tab {
                route: TabRoute::Home,
                title: "Home",
                icon: IconAsset::Home,
            },
            Tab {
                route: TabRoute::Bookmark,
                title: "Bookmark",
                icon: IconAsset::Bookmark,
            },
            Tab {
                route: TabRoute::Create,
                title: "Create",
                icon: IconAsset::Plus,
            },
            Tab {
                route: TabRoute::Profile,
                title: "Profile",
                icon: IconAsset::Profile,
            },
        ],
        show_label: false,
        header_shown: false,
        active_tint: ACTIVE_TINT,
        inactive_tint: INACTIVE_TINT,
        style: TabBarStyle {
            background_color: Color::rgb(0x16, 0x16, 0x22),
            border_top_width: 1,
            border_top_color: Color::rgb(0x23, 0x25, 0x33),
            height: 84,
        },
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn bar() -> TabBar {
        app_tabs()
    }

    #[rstest]
    fn tabs_follow_router_order(bar: TabBar) {
        let routes: Vec<_> = bar.tabs.iter().map(|tab| tab.route).collect();
        assert_eq!(routes, TabRoute::ALL.to_vec());
        assert_eq!(
            bar.tab(TabRoute::Create).map(|tab| tab.icon),
            Some(IconAsset::Plus)
        );
    }

    #[rstest]
    #[case(TabRoute::Home)]
    #[case(TabRoute::Bookmark)]
    #[case(TabRoute::Create)]
    #[case(TabRoute::Profile)]
    fn only_the_focused_tab_is_highlighted(bar: TabBar, #[case] focused: TabRoute) {
        for indicator in bar.render(focused) {
            if indicator.route == focused {
                assert_eq!(indicator.tint.to_string(), "#ffa001");
                assert_eq!(indicator.font_weight, FontWeight::Semibold);
                assert_eq!(indicator.font_weight.font_class(), "font-psemibold");
            } else {
                assert_eq!(indicator.tint.to_string(), "#cdcde0");
                assert_eq!(indicator.font_weight, FontWeight::Regular);
            }
            assert_eq!(indicator.icon_size, 24);
            assert_eq!(indicator.label_size, TextSize::Xs);
        }
    }

    #[rstest]
    fn bar_chrome_serialises_for_the_host(bar: TabBar) {
        let value = serde_json::to_value(&bar).expect("serialises");
        assert_eq!(value["showLabel"], json!(false));
        assert_eq!(value["headerShown"], json!(false));
        assert_eq!(
            value["style"],
            json!({
                "backgroundColor": "#161622",
                "borderTopWidth": 1,
                "borderTopColor": "#232533",
                "height": 84
            })
        );
        assert_eq!(
            value["tabs"][2],
            json!({ "route": "create", "title": "Create", "icon": "plus" })
        );
    }

    #[rstest]
    fn indicator_serialises_camel_case(bar: TabBar) {
        let indicator = bar.render(TabRoute::Home)[0];
        assert_eq!(
            serde_json::to_value(indicator).expect("serialises"),
            json!({
                "route": "home",
                "icon": "home",
                "iconSize": 24,
                "label": "Home",
                "labelSize": "xs",
                "tint": "#ffa001",
                "fontWeight": "semibold",
                "focused": true
            })
        );
    }

    #[rstest]
    #[case("profile", Ok(TabRoute::Profile))]
    #[case("Profile", Err(UnknownTabRoute("Profile".to_owned())))]
    fn parses_route_names(#[case] raw: &str, #[case] expected: Result<TabRoute, UnknownTabRoute>) {
        assert_eq!(raw.parse::<TabRoute>(), expected);
    }
}
