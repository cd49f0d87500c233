use rusqlite::{Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{
    menu::{Image, Menu, MenuItem, Section},
    restaurant::{Address, Restaurant},
};

pub struct SqliteDatabase {}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS restaurants (
    id INTEGER PRIMARY KEY,
    custom_host TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    cover_image TEXT,
    phone TEXT NOT NULL DEFAULT '[]',
    address TEXT,
    hours TEXT NOT NULL DEFAULT '{}'
);
CREATE TABLE IF NOT EXISTS menus (
    id INTEGER PRIMARY KEY,
    restaurant_id INTEGER NOT NULL REFERENCES restaurants(id),
    slug TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    position INTEGER NOT NULL DEFAULT 0,
    UNIQUE (restaurant_id, slug)
);
CREATE TABLE IF NOT EXISTS sections (
    id INTEGER PRIMARY KEY,
    restaurant_id INTEGER NOT NULL REFERENCES restaurants(id),
    menu_id INTEGER REFERENCES menus(id),
    title TEXT NOT NULL,
    description TEXT,
    position INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS menu_items (
    id INTEGER PRIMARY KEY,
    restaurant_id INTEGER NOT NULL REFERENCES restaurants(id),
    section_id INTEGER REFERENCES sections(id),
    title TEXT NOT NULL,
    description TEXT,
    price REAL,
    image TEXT,
    position INTEGER NOT NULL DEFAULT 0
);
";

/// Decode a JSON text column, `NULL` becomes `None`.
fn json_column<T: DeserializeOwned>(row: &Row, index: usize) -> rusqlite::Result<Option<T>> {
    let text: Option<String> = row.get(index)?;
    match text {
        None => Ok(None),
        Some(text) => serde_json::from_str(&text).map(Some).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(err))
        }),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> rusqlite::Result<String> {
    serde_json::to_string(value).map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))
}

impl SqliteDatabase {
    /**
    Create every table if missing. Safe to call on each start.
    */
    pub fn create_tables(connection: &Connection) -> rusqlite::Result<()> {
        connection.execute_batch(SCHEMA)
    }

    /**
    Look a tenant's restaurant up by its host key.

    Returns `Ok(None)` when there is no such tenant. The id is returned next to
    the record so pages can scope their menu lookup to it.

    Menus come back in position order without their sections, as do the
    restaurant-wide lists of sections and menu items.
    */
    pub fn query_restaurant(
        connection: &Connection,
        custom_host: &str,
    ) -> rusqlite::Result<Option<(i64, Restaurant)>> {
        debug!(custom_host, "query restaurant");
        let restaurant = connection
            .query_row(
                "SELECT id, custom_host, name, cover_image, phone, address, hours
                 FROM restaurants WHERE custom_host = ?1",
                rusqlite::params![custom_host],
                |row| {
                    let id: i64 = row.get(0)?;
                    let restaurant = Restaurant {
                        custom_host: row.get(1)?,
                        name: row.get(2)?,
                        cover_image: json_column::<Image>(row, 3)?,
                        phone: json_column(row, 4)?.unwrap_or_default(),
                        address: json_column::<Address>(row, 5)?,
                        hours: json_column(row, 6)?.unwrap_or_default(),
                        menus: Vec::new(),
                        menu_items: Vec::new(),
                        sections: Vec::new(),
                    };
                    Ok((id, restaurant))
                },
            )
            .optional()?;

        let Some((id, mut restaurant)) = restaurant else {
            return Ok(None);
        };

        restaurant.menus = Self::query_menus(connection, id)?;
        restaurant.sections = Self::query_sections(connection, "restaurant_id", id)?
            .into_iter()
            .map(|(_, section)| section)
            .collect();
        restaurant.menu_items = Self::query_menu_items(connection, "restaurant_id", id)?;
        Ok(Some((id, restaurant)))
    }

    /**
    All of a restaurant's menus in position order, sections left empty.
    */
    pub fn query_menus(connection: &Connection, restaurant_id: i64) -> rusqlite::Result<Vec<Menu>> {
        debug!(restaurant_id, "query menus");
        let mut statement = connection.prepare(
            "SELECT slug, title, description, position FROM menus
             WHERE restaurant_id = ?1 ORDER BY position ASC, id ASC",
        )?;
        let rows = statement.query_map(rusqlite::params![restaurant_id], |row| {
            Ok(Menu {
                slug: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                position: row.get(3)?,
                sections: Vec::new(),
            })
        })?;

        let mut menus = Vec::new();
        for row in rows {
            menus.push(row?);
        }
        Ok(menus)
    }

    /**
    Fetch one menu of a restaurant with its sections and their items.

    With `slug` set the menu must match it. Without a slug the first menu by
    position is returned, which is what the bare root page shows.

    Returns `Ok(None)` if nothing matches.
    */
    pub fn query_menu(
        connection: &Connection,
        restaurant_id: i64,
        slug: Option<&str>,
    ) -> rusqlite::Result<Option<Menu>> {
        debug!(restaurant_id, slug, "query menu");
        let menu = connection
            .query_row(
                "SELECT id, slug, title, description, position FROM menus
                 WHERE restaurant_id = ?1 AND (?2 IS NULL OR slug = ?2)
                 ORDER BY position ASC, id ASC LIMIT 1",
                rusqlite::params![restaurant_id, slug],
                |row| {
                    let id: i64 = row.get(0)?;
                    let menu = Menu {
                        slug: row.get(1)?,
                        title: row.get(2)?,
                        description: row.get(3)?,
                        position: row.get(4)?,
                        sections: Vec::new(),
                    };
                    Ok((id, menu))
                },
            )
            .optional()?;

        let Some((menu_id, mut menu)) = menu else {
            return Ok(None);
        };

        for (section_id, mut section) in Self::query_sections(connection, "menu_id", menu_id)? {
            section.menu_items = Self::query_menu_items(connection, "section_id", section_id)?;
            menu.sections.push(section);
        }
        Ok(Some(menu))
    }

    /**
    Sections filtered on one owning column, in position order, with their ids.

    `owner` is one of our own column names, never user input.
    */
    fn query_sections(
        connection: &Connection,
        owner: &str,
        owner_id: i64,
    ) -> rusqlite::Result<Vec<(i64, Section)>> {
        let mut statement = connection.prepare(&format!(
            "SELECT id, title, description, position FROM sections
             WHERE {} = ?1 ORDER BY position ASC, id ASC",
            owner
        ))?;
        let rows = statement.query_map(rusqlite::params![owner_id], |row| {
            let id: i64 = row.get(0)?;
            let section = Section {
                title: row.get(1)?,
                description: row.get(2)?,
                position: row.get(3)?,
                menu_items: Vec::new(),
            };
            Ok((id, section))
        })?;

        let mut sections = Vec::new();
        for row in rows {
            sections.push(row?);
        }
        Ok(sections)
    }

    fn query_menu_items(
        connection: &Connection,
        owner: &str,
        owner_id: i64,
    ) -> rusqlite::Result<Vec<MenuItem>> {
        let mut statement = connection.prepare(&format!(
            "SELECT title, description, price, image, position FROM menu_items
             WHERE {} = ?1 ORDER BY position ASC, id ASC",
            owner
        ))?;
        let rows = statement.query_map(rusqlite::params![owner_id], |row| {
            Ok(MenuItem {
                title: row.get(0)?,
                description: row.get(1)?,
                price: row.get(2)?,
                image: json_column(row, 3)?,
                position: row.get(4)?,
            })
        })?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /**
    Insert a whole restaurant document in one transaction.

    Sections nested in `menus` are attached to their menu, items nested in
    sections to their section. The restaurant-wide `sections` and `menu_items`
    lists are inserted unattached.
    */
    pub fn insert_restaurant(connection: &Connection, restaurant: &Restaurant) -> rusqlite::Result<i64> {
        let transaction = connection.unchecked_transaction()?;
        transaction.execute(
            "INSERT INTO restaurants (custom_host, name, cover_image, phone, address, hours)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                restaurant.custom_host,
                restaurant.name,
                restaurant.cover_image.as_ref().map(to_json).transpose()?,
                to_json(&restaurant.phone)?,
                restaurant.address.as_ref().map(to_json).transpose()?,
                to_json(&restaurant.hours)?,
            ],
        )?;
        let restaurant_id = transaction.last_insert_rowid();

        for menu in &restaurant.menus {
            transaction.execute(
                "INSERT INTO menus (restaurant_id, slug, title, description, position)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![restaurant_id, menu.slug, menu.title, menu.description, menu.position],
            )?;
            let menu_id = transaction.last_insert_rowid();
            for section in &menu.sections {
                Self::insert_section(&transaction, restaurant_id, Some(menu_id), section)?;
            }
        }
        for section in &restaurant.sections {
            Self::insert_section(&transaction, restaurant_id, None, section)?;
        }
        for item in &restaurant.menu_items {
            Self::insert_menu_item(&transaction, restaurant_id, None, item)?;
        }

        transaction.commit()?;
        Ok(restaurant_id)
    }

    fn insert_section(
        connection: &Connection,
        restaurant_id: i64,
        menu_id: Option<i64>,
        section: &Section,
    ) -> rusqlite::Result<()> {
        connection.execute(
            "INSERT INTO sections (restaurant_id, menu_id, title, description, position)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![restaurant_id, menu_id, section.title, section.description, section.position],
        )?;
        let section_id = connection.last_insert_rowid();
        for item in &section.menu_items {
            Self::insert_menu_item(connection, restaurant_id, Some(section_id), item)?;
        }
        Ok(())
    }

    fn insert_menu_item(
        connection: &Connection,
        restaurant_id: i64,
        section_id: Option<i64>,
        item: &MenuItem,
    ) -> rusqlite::Result<()> {
        connection.execute(
            "INSERT INTO menu_items (restaurant_id, section_id, title, description, price, image, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                restaurant_id,
                section_id,
                item.title,
                item.description,
                item.price,
                item.image.as_ref().map(to_json).transpose()?,
                item.position,
            ],
        )?;
        Ok(())
    }
}
