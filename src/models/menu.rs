//! Menu entity
//!
//! An item of the `menu_makanan` table, mapped from a normalized row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::normalize::{CanonicalRow, RowExt};

/// Table holding menu items.
pub const MENU_TABLE: &str = "menu_makanan";

/// A menu item as served to the point-of-sale frontend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kemitraan: String,
    pub price: f64,
    pub sub_brand: String,
    pub created_at: Option<DateTime<Utc>>,
    pub image_url: String,
    pub image_id: String,
    pub image_data: String,
}

impl Menu {
    /// Maps a normalized row. Missing or malformed fields take their zero
    /// value; a numeric price sent as text is parsed.
    pub fn from_row(row: &CanonicalRow) -> Self {
        Self {
            id: row.str_field("id"),
            name: row.str_field("name"),
            description: row.str_field("description"),
            kemitraan: row.str_field("kemitraan"),
            price: row.f64_field("price"),
            sub_brand: row.str_field("subBrand"),
            created_at: row.datetime_field("createdAt"),
            image_url: row.str_field("imageUrl"),
            image_id: row.str_field("imageId"),
            image_data: row.str_field("imageData"),
        }
    }

    /// Case-insensitive match on sub-brand, ignoring non-alphanumerics.
    pub fn matches_sub_brand(&self, query: &str) -> bool {
        fold(&self.sub_brand) == fold(query)
    }

    /// Case-insensitive substring match on partnership, ignoring
    /// non-alphanumerics.
    pub fn matches_kemitraan(&self, query: &str) -> bool {
        fold(&self.kemitraan).contains(&fold(query))
    }
}

fn fold(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{extract_rows, normalize_row};
    use serde_json::json;

    #[test]
    fn test_menu_from_columns_row() {
        let body = json!({
            "value": [{
                "columns": [
                    {"name": "id", "value": {"value": "m-1"}},
                    {"name": "name", "value": "Nasi Goreng"},
                    {"name": "price", "value": "25000"},
                    {"name": "subBrand", "value": ["Sagawa Kitchen"]},
                    {"name": "createdAt", "value": "2024-05-01T10:30:00Z"}
                ]
            }]
        });

        let rows = extract_rows(&body);
        let menu = Menu::from_row(&rows[0]);

        assert_eq!(menu.id, "m-1");
        assert_eq!(menu.name, "Nasi Goreng");
        assert_eq!(menu.price, 25000.0);
        assert_eq!(menu.sub_brand, "Sagawa Kitchen");
        assert!(menu.created_at.is_some());
        assert_eq!(menu.description, "");
        assert_eq!(menu.image_url, "");
    }

    #[test]
    fn test_menu_from_malformed_row_defaults() {
        let row = normalize_row(json!({"price": {"a": 1}, "name": null}).as_object().unwrap());
        let menu = Menu::from_row(&row);
        assert_eq!(menu, Menu::default());
    }

    #[test]
    fn test_menu_serializes_camel_case() {
        let menu = Menu {
            id: "1".to_string(),
            sub_brand: "X".to_string(),
            ..Menu::default()
        };
        let json = serde_json::to_value(&menu).unwrap();
        assert_eq!(json["subBrand"], "X");
        assert!(json.get("imageUrl").is_some());
    }

    #[test]
    fn test_menu_filters() {
        let menu = Menu {
            sub_brand: "Kopi Kenangan!".to_string(),
            kemitraan: "Mitra Gold Plus".to_string(),
            ..Menu::default()
        };
        assert!(menu.matches_sub_brand("kopi-kenangan"));
        assert!(!menu.matches_sub_brand("kopi"));
        assert!(menu.matches_kemitraan("gold"));
        assert!(!menu.matches_kemitraan("silver"));
    }
}
