use serde::{Deserialize, Serialize};

use crate::timing::weekly_hours::WeeklyHours;

use super::menu::{Image, Menu, MenuItem, Section};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// The tenant's restaurant together with everything the layout needs.
///
/// `menus`, `menu_items` and `sections` are ordered by their stored position.
/// Menus loaded here carry no sections, those are fetched per page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub custom_host: String,
    pub name: String,
    #[serde(default)]
    pub cover_image: Option<Image>,
    #[serde(default)]
    pub phone: Vec<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub hours: WeeklyHours,
    #[serde(default)]
    pub menus: Vec<Menu>,
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
    #[serde(default)]
    pub sections: Vec<Section>,
}
