use std::{fs, path::Path};

use rusqlite::Connection;
use tracing::info;

use crate::{
    error::{SiteError, SiteResult},
    models::restaurant::Restaurant,
};

use super::sqlite::SqliteDatabase;

/**
Import a restaurant document into the store unless the tenant already exists.

The document has the same shape as the stored records, camelCase keys and
nested `menus → sections → menuItems`. Its `customHost` must be `tenant`.

Returns whether anything was written.
*/
pub fn seed_if_missing(connection: &Connection, tenant: &str, path: &Path) -> SiteResult<bool> {
    if SqliteDatabase::query_restaurant(connection, tenant)?.is_some() {
        return Ok(false);
    }

    let restaurant: Restaurant = serde_json::from_str(&fs::read_to_string(path)?)?;
    if restaurant.custom_host != tenant {
        return Err(SiteError::Config(format!(
            "Seed {} is for {:?}, not {:?}",
            path.display(),
            restaurant.custom_host,
            tenant
        )));
    }

    SqliteDatabase::insert_restaurant(connection, &restaurant)?;
    info!(tenant, menus = restaurant.menus.len(), "seeded store");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const DOCUMENT: &str = r#"{
        "customHost": "whereslloyd",
        "name": "Lloyds",
        "menus": [
            {"slug": "lunch", "title": "Lunch", "position": 1,
             "sections": [{"title": "Soups", "menuItems": [{"title": "Tomato", "price": 6}]}]}
        ]
    }"#;

    fn store() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        SqliteDatabase::create_tables(&connection).unwrap();
        connection
    }

    fn document(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn seeds_once() {
        let connection = store();
        let file = document(DOCUMENT);
        assert!(seed_if_missing(&connection, "whereslloyd", file.path()).unwrap());
        assert!(!seed_if_missing(&connection, "whereslloyd", file.path()).unwrap());

        let (id, restaurant) = SqliteDatabase::query_restaurant(&connection, "whereslloyd")
            .unwrap()
            .unwrap();
        assert_eq!(restaurant.menus.len(), 1);
        let menu = SqliteDatabase::query_menu(&connection, id, Some("lunch")).unwrap().unwrap();
        assert_eq!(menu.sections[0].menu_items[0].price, Some(6.0));
    }

    #[test]
    fn rejects_other_tenant() {
        let connection = store();
        let file = document(DOCUMENT);
        assert!(matches!(
            seed_if_missing(&connection, "someone-else", file.path()),
            Err(SiteError::Config(_))
        ));
    }

    #[test]
    fn malformed_document_is_a_json_error() {
        let connection = store();
        let file = document("{\"name\": ");
        assert!(matches!(
            seed_if_missing(&connection, "whereslloyd", file.path()),
            Err(SiteError::Json(_))
        ));
    }
}
