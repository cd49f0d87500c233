use askama::Template;

use crate::{
    error::SiteResult,
    models::{
        menu::{Image, Menu, MenuItem, Section},
        restaurant::{Address, Restaurant},
    },
    timing::{
        clock::Clock,
        weekly_hours::{today_hours, weekly_table},
    },
};

use super::currency::format_usd;

const STYLESHEET: &str = "\
body{margin:0;font-family:system-ui,sans-serif;background:#f8fafc;color:#0f172a}\
.container{max-width:1024px;margin:0 auto;padding:0 1rem}\
.cover{position:relative;aspect-ratio:21/9;display:flex;flex-direction:column;background:#334155}\
.cover-image{position:absolute;inset:0}.cover-image img{width:100%;height:100%;object-fit:cover}\
.cover-text{position:relative;margin-top:auto;width:100%;padding-bottom:2rem;color:#fff}\
.cover-text h1{font-size:3rem;text-shadow:0 2px 1px #000}.summary{display:flex;gap:2rem}\
.menu-nav{position:sticky;top:0;background:#f8fafc;border-bottom:1px solid #e2e8f0;padding:2rem 0}\
.menu-nav ul{display:flex;gap:.5rem;list-style:none}.menu-nav a{color:inherit}\
.columns{display:grid;grid-template-columns:7fr 1fr 4fr}.columns main{grid-column:1}.columns aside{grid-column:3}\
.card{border:1px solid #e2e8f0;border-radius:.5rem;background:#fff;overflow:hidden;margin-bottom:1rem}\
.card h2{font-size:1.125rem;padding:.5rem 1rem;border-bottom:1px solid #e2e8f0;margin:0}\
.hours-row{display:flex;justify-content:space-between;font-size:.875rem;padding:0 1rem}\
.item-image{aspect-ratio:16/9;overflow:hidden;background-size:cover}.item-image img{width:100%;height:100%;object-fit:cover}\
.item-body{display:flex;padding:1rem}.item-text{flex-grow:1}.item-title{font-weight:600}\
.item-description{color:#64748b}.item-price{font-weight:500}\
@media (max-width:1023px){.columns{display:block}.columns aside{display:none}}";

struct NavLink {
    href: String,
    title: String,
}

struct HoursRow {
    day: &'static str,
    text: String,
}

struct ItemView {
    title: String,
    description: Option<String>,
    price: Option<String>,
    image: Option<Image>,
}

struct SectionView {
    title: String,
    description: Option<String>,
    items: Vec<ItemView>,
}

#[derive(Template)]
#[template(path = "menu.html")]
struct MenuTemplate {
    sections: Vec<SectionView>,
}

#[derive(Template)]
#[template(path = "layout.html")]
struct LayoutTemplate {
    title: String,
    description: Option<String>,
    stylesheet: &'static str,
    cover_src: Option<String>,
    name: String,
    first_phone: Option<String>,
    today_hours: String,
    nav: Vec<NavLink>,
    phones: Vec<String>,
    address: Option<Address>,
    hours: Vec<HoursRow>,
    content: String,
}

impl From<&MenuItem> for ItemView {
    fn from(item: &MenuItem) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            price: item.price.map(format_usd),
            image: item.image.clone(),
        }
    }
}

impl From<&Section> for SectionView {
    fn from(section: &Section) -> Self {
        Self {
            title: section.title.clone(),
            description: section.description.clone(),
            items: section.menu_items.iter().map(ItemView::from).collect(),
        }
    }
}

/**
Render a full document: the restaurant layout wrapped around one menu.

The layout shows the header, the menu navigation, the contact card and the
hours table. Today's hours are resolved against `clock`, the table against
all seven days, both through the same per-day rule.
*/
pub fn render_menu_page(restaurant: &Restaurant, menu: &Menu, clock: &dyn Clock) -> SiteResult<String> {
    let content = MenuTemplate {
        sections: menu.sections.iter().map(SectionView::from).collect(),
    }
    .render()?;

    let layout = LayoutTemplate {
        title: menu.title.clone(),
        description: menu.description.clone(),
        stylesheet: STYLESHEET,
        cover_src: restaurant.cover_image.as_ref().map(|image| image.src.clone()),
        name: restaurant.name.clone(),
        first_phone: restaurant.phone.first().cloned(),
        today_hours: today_hours(&restaurant.hours, clock).display_today(),
        nav: restaurant
            .menus
            .iter()
            .map(|menu| NavLink {
                href: format!("/{}", menu.slug),
                title: menu.title.clone(),
            })
            .collect(),
        phones: restaurant.phone.clone(),
        address: restaurant.address.clone(),
        hours: weekly_table(&restaurant.hours)
            .into_iter()
            .map(|row| HoursRow {
                day: row.day,
                text: row.hours.display(),
            })
            .collect(),
        content,
    };
    Ok(layout.render()?)
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use crate::timing::{clock::FixedClock, day_schedule::DaySchedule};

    use super::*;

    fn restaurant() -> Restaurant {
        let mut restaurant = Restaurant {
            custom_host: "whereslloyd".to_string(),
            name: "Lloyds Diner".to_string(),
            cover_image: Some(Image {
                src: "cover.jpg".to_string(),
                blur_data_url: None,
            }),
            phone: vec!["555-0100".to_string(), "555-0199".to_string()],
            address: Some(Address {
                street_address: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip: "62701".to_string(),
            }),
            hours: Default::default(),
            menus: vec![
                Menu {
                    slug: "lunch".to_string(),
                    title: "Lunch".to_string(),
                    description: None,
                    position: 0,
                    sections: Vec::new(),
                },
                Menu {
                    slug: "dinner".to_string(),
                    title: "Dinner".to_string(),
                    description: None,
                    position: 1,
                    sections: Vec::new(),
                },
            ],
            menu_items: Vec::new(),
            sections: Vec::new(),
        };
        restaurant
            .hours
            .insert("Monday".to_string(), DaySchedule::new_open("09:00", "17:00"));
        restaurant
            .hours
            .insert("Tuesday".to_string(), DaySchedule::new_closed());
        restaurant
    }

    fn lunch() -> Menu {
        Menu {
            slug: "lunch".to_string(),
            title: "Lunch".to_string(),
            description: Some("Served daily".to_string()),
            position: 0,
            sections: vec![Section {
                title: "Sandwiches".to_string(),
                description: Some("On rye".to_string()),
                position: 0,
                menu_items: vec![
                    MenuItem {
                        title: "Reuben".to_string(),
                        description: Some("Corned beef".to_string()),
                        price: Some(1234.5),
                        image: Some(Image {
                            src: "reuben.jpg".to_string(),
                            blur_data_url: Some("placeholder".to_string()),
                        }),
                        position: 0,
                    },
                    MenuItem {
                        title: "Market Soup".to_string(),
                        description: None,
                        price: None,
                        image: None,
                        position: 1,
                    },
                ],
            }],
        }
    }

    #[test]
    fn renders_header_and_contact() {
        let html = render_menu_page(&restaurant(), &lunch(), &FixedClock(Weekday::Mon)).unwrap();
        assert!(html.contains("<title>Lunch</title>"));
        assert!(html.contains("Served daily"));
        assert!(html.contains("<h1>Lloyds Diner</h1>"));
        assert!(html.contains("rel=\"preload\""));
        assert!(html.contains("<span class=\"summary-phone\">555-0100</span>"));
        assert!(html.contains("<li>555-0199</li>"));
        assert!(html.contains("1 Main St <br />Springfield, IL 62701"));
        assert!(html.contains("<span class=\"summary-hours\">9:00 AM - 5:00 PM</span>"));
    }

    #[test]
    fn summary_says_closed_today() {
        let html = render_menu_page(&restaurant(), &lunch(), &FixedClock(Weekday::Tue)).unwrap();
        assert!(html.contains("<span class=\"summary-hours\">Closed Today</span>"));
    }

    #[test]
    fn summary_needs_a_phone_number() {
        let mut restaurant = restaurant();
        restaurant.phone.clear();
        let html = render_menu_page(&restaurant, &lunch(), &FixedClock(Weekday::Mon)).unwrap();
        assert!(!html.contains("summary-phone"));
        assert!(!html.contains("summary-hours"));
        // the hours table is still there
        assert_eq!(html.matches("class=\"hours-row\"").count(), 7);
        assert!(html.contains("<dd>9:00 AM - 5:00 PM</dd>"));
    }

    #[test]
    fn hours_table_lists_every_day_in_order() {
        let html = render_menu_page(&restaurant(), &lunch(), &FixedClock(Weekday::Mon)).unwrap();
        assert_eq!(html.matches("class=\"hours-row\"").count(), 7);
        assert_eq!(html.matches("<dd>Closed</dd>").count(), 6);
        let monday = &html[html.find("<dt>Monday:</dt>").unwrap()..];
        let monday = &monday[monday.find("<dd>").unwrap()..];
        assert!(monday.starts_with("<dd>9:00 AM - 5:00 PM</dd>"));
        let sunday = html.find("<dt>Sunday:</dt>").unwrap();
        let saturday = html.find("<dt>Saturday:</dt>").unwrap();
        assert!(sunday < saturday);
    }

    #[test]
    fn renders_items_with_prices_and_images() {
        let html = render_menu_page(&restaurant(), &lunch(), &FixedClock(Weekday::Mon)).unwrap();
        assert!(html.contains("<h3>Sandwiches</h3>"));
        assert!(html.contains("<p>On rye</p>"));
        assert!(html.contains("<p class=\"item-price\">$1,234.50</p>"));
        assert_eq!(html.matches("class=\"item-price\"").count(), 1);
        assert!(html.contains("loading=\"lazy\" src=\"reuben.jpg\""));
        assert!(html.contains("placeholder"));
        assert!(html.contains("Market Soup"));
    }

    #[test]
    fn nav_follows_menu_order() {
        let html = render_menu_page(&restaurant(), &lunch(), &FixedClock(Weekday::Mon)).unwrap();
        assert_eq!(html.matches("class=\"nav-item\"").count(), 2);
        assert!(html.find(">Lunch</a>").unwrap() < html.find(">Dinner</a>").unwrap());
    }

    #[test]
    fn escapes_store_text() {
        let mut menu = lunch();
        menu.sections[0].title = "<script>".to_string();
        let html = render_menu_page(&restaurant(), &menu, &FixedClock(Weekday::Mon)).unwrap();
        assert!(!html.contains("<h3><script></h3>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
