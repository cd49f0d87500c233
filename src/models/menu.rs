use serde::{Deserialize, Serialize};

/// An image as stored in the JSON columns. `blurDataURL` is a tiny inline
/// placeholder shown while the real image loads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    #[serde(rename = "blurDataURL", default)]
    pub blur_data_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub position: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub position: i64,
    #[serde(default, rename = "menuItems")]
    pub menu_items: Vec<MenuItem>,
}

/// A menu page. `slug` is the route key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub sections: Vec<Section>,
}
