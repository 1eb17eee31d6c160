//! Core domain records for the restaurant catalog and the catalog normalizer.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub mod catalog;

pub use catalog::{optimize_items, rank, CatalogItem, DimensionMap, OptimizedItems};

pub const CRATE_NAME: &str = "chipotle-core";

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero_f64(value: &f64) -> bool {
    *value == 0.0
}

fn is_zero_i64(value: &i64) -> bool {
    *value == 0
}

/// Body of the paginated restaurant search call. Zero/empty fields are left off the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub latitude: f64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub longitude: f64,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub radius: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub restaurant_statuses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub concept_ids: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub order_by: String,
    #[serde(skip_serializing_if = "is_false")]
    pub order_by_descending: bool,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub page_size: i64,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub page_index: i64,
    pub embeds: Embeds,
}

impl SearchQuery {
    /// Nationwide query centred on Sacramento that returns every open or lab restaurant.
    pub fn nationwide() -> Self {
        Self {
            latitude: 38.495_693_700_000_004,
            longitude: -121.194_520_400_000_02,
            radius: 9_046_700,
            restaurant_statuses: vec!["OPEN".to_string(), "LAB".to_string()],
            concept_ids: vec!["CMG".to_string()],
            order_by: "distance".to_string(),
            order_by_descending: false,
            page_size: 4000,
            page_index: 0,
            embeds: Embeds::everything(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Embeds {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub address_types: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub real_hours: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub directions: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub catering: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub online_ordering: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub timezone: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub marketing: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub chipotlane: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub sustainability: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub experience: bool,
}

impl Embeds {
    pub fn everything() -> Self {
        Self {
            address_types: vec!["MAIN".to_string()],
            real_hours: true,
            directions: true,
            catering: true,
            online_ordering: true,
            timezone: true,
            marketing: true,
            chipotlane: true,
            sustainability: true,
            experience: true,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResult {
    #[serde(rename = "data")]
    pub restaurants: Vec<Restaurant>,
    pub paging_info: PagingInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PagingInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub items_per_page: i64,
    pub total_items: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Restaurant {
    pub restaurant_number: i64,
    pub restaurant_name: String,
    pub restaurant_location_type: String,
    pub restaurant_status: String,
    pub open_date: String,
    pub real_estate_category: String,
    pub operational_region: String,
    pub operational_sub_region: String,
    pub operational_patch: String,
    pub designated_market_area_name: String,
    pub distance: f64,
    pub addresses: Vec<Address>,
    pub directions: Directions,
    pub timezone: Timezone,
    pub marketing: Marketing,
    pub real_hours: Vec<RealHours>,
    pub online_ordering: OnlineOrdering,
    pub catering: Catering,
    pub chipotlane: Chipotlane,
    pub experience: Experience,
    pub sustainability: Sustainability,
    pub planned_subs_compl_date: String,
    pub actual_subs_compl_date: String,
}

impl Restaurant {
    /// Name used in log lines; falls back to the restaurant number.
    pub fn display_name(&self) -> String {
        if self.restaurant_name.trim().is_empty() {
            format!("#{}", self.restaurant_number)
        } else {
            self.restaurant_name.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub address_type: String,
    pub address_line1: String,
    pub address_line2: String,
    pub locality: String,
    pub administrative_area: String,
    pub postal_code: String,
    pub sub_administrative_area: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_determination: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Directions {
    pub landmark: String,
    pub cross_street1: String,
    pub cross_street2: String,
    pub pickup_instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Timezone {
    pub current_timezone_offset: i64,
    pub timezone_offset: i64,
    pub timezone: String,
    pub timezone_id: String,
    pub observe_daylight_savings: String,
    pub daylight_savings_offset: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Marketing {
    pub operations_market: String,
    pub special_menu_panel_instructions: String,
    pub feature_menu_panel: String,
    pub kids_menu_panel: String,
    pub calories_on_menu_panel: String,
    pub food_with_integrity_menu_board_width_id: String,
    pub menu_board_panel_height_id: String,
    pub menu_panel_type_id: String,
    pub alcohol_category: String,
    pub alcohol_category_description: String,
    pub marketing_alcohol_description: String,
}

/// One weekly opening window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RealHours {
    pub day_of_week: String,
    pub open_date_time: String,
    pub close_date_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OnlineOrdering {
    pub online_ordering_enabled: bool,
    pub online_ordering_dot_com_search_enabled: String,
    pub online_ordering_credit_cards_accepted: bool,
    pub online_ordering_gift_cards_accepted: bool,
    pub online_ordering_bulk_orders_accepted: bool,
    pub online_ordering_tax_assessed: bool,
    pub restaurant_terminal_site_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Catering {
    pub catering_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Chipotlane {
    pub chipotlane_pickup_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub curbside_pickup_enabled: bool,
    pub dining_room_open: bool,
    pub digital_kitchen: bool,
    pub walkup_window_enabled: bool,
    pub pickup_inside_enabled: bool,
    pub crew_tip_pickup_enabled: bool,
    pub crew_tip_delivery_enabled: bool,
    pub context_rest_exp_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Sustainability {
    pub utensils_default_state: String,
}

/// Online menu for a single restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Menu {
    pub restaurant_id: i64,
    pub entrees: Vec<Entree>,
    pub sides: Vec<Side>,
    pub drinks: Vec<Drink>,
    pub non_food_items: Vec<NonFoodItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Entree {
    pub item_category: String,
    pub item_type: String,
    pub item_id: String,
    pub item_name: String,
    pub pos_id: i64,
    pub primary_filling_name: String,
    pub unit_price: f64,
    pub unit_delivery_price: f64,
    pub unit_count: i64,
    pub max_quantity: i64,
    pub eligible_for_delivery: bool,
    pub max_contents: i64,
    pub max_customizations: i64,
    pub max_on_the_side_customizations: i64,
    pub max_extras: i64,
    pub max_halfs: i64,
    pub max_extras_plus_halfs: i64,
    pub is_universal: bool,
    pub is_item_available: bool,
    pub content_groups: Vec<ContentGroup>,
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentGroup {
    pub content_group_name: String,
    pub min_quantity: i64,
    pub max_quantity: i64,
}

/// A sub-item (filling, topping, ...) that can be placed inside an entree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Content {
    pub item_type: String,
    pub item_id: String,
    pub item_name: String,
    pub pos_id: i64,
    pub unit_price: f64,
    pub unit_delivery_price: f64,
    pub unit_count: i64,
    pub eligible_for_delivery: bool,
    pub pricing_reference_item_id: String,
    pub count_towards_customization_max: i64,
    pub count_towards_content_max: i64,
    pub content_group_name: String,
    pub default_content: bool,
    pub is_item_available: bool,
    pub customizations: Vec<JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Side {
    pub item_category: String,
    pub item_type: String,
    pub item_id: String,
    pub item_name: String,
    pub pos_id: i64,
    pub unit_price: f64,
    pub unit_delivery_price: f64,
    pub unit_count: i64,
    pub max_quantity: i64,
    pub eligible_for_delivery: bool,
    pub is_universal: bool,
    pub is_item_available: bool,
}

/// Drinks share the side-item wire shape.
pub type Drink = Side;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NonFoodItem {
    pub item_category: String,
    pub item_type: String,
    pub item_id: String,
    pub item_name: String,
    pub pos_id: i64,
    pub unit_price: f64,
    pub unit_delivery_price: f64,
    pub unit_count: i64,
    pub max_quantity: i64,
    pub eligible_for_delivery: bool,
    pub is_universal: bool,
    pub is_item_available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_document_decodes_nested_contents() {
        let raw = r#"{
            "restaurantId": 1234,
            "entrees": [{
                "itemCategory": "Burrito",
                "itemType": "Entree",
                "itemId": "CMG-1001",
                "itemName": "Chicken Burrito",
                "primaryFillingName": "Chicken",
                "unitPrice": 10.25,
                "maxContents": 12,
                "isItemAvailable": true,
                "contentGroups": [{"contentGroupName": "Rice", "minQuantity": 0, "maxQuantity": 1}],
                "contents": [{
                    "itemType": "Topping",
                    "itemId": "CMG-5001",
                    "itemName": "White Rice",
                    "contentGroupName": "Rice",
                    "defaultContent": true,
                    "customizations": [{"customizationId": 1}]
                }]
            }],
            "drinks": [{"itemId": "CMG-7001", "itemName": "Lemonade", "unitPrice": 3.5}],
            "somethingNew": {"ignored": true}
        }"#;

        let menu: Menu = serde_json::from_str(raw).expect("menu json");
        assert_eq!(menu.restaurant_id, 1234);
        assert_eq!(menu.entrees.len(), 1);
        let entree = &menu.entrees[0];
        assert_eq!(entree.primary_filling_name, "Chicken");
        assert_eq!(entree.max_contents, 12);
        assert_eq!(entree.content_groups[0].max_quantity, 1);
        assert!(entree.contents[0].default_content);
        assert_eq!(entree.contents[0].customizations.len(), 1);
        assert_eq!(menu.drinks[0].unit_price, 3.5);
        assert!(menu.sides.is_empty());
        assert!(menu.non_food_items.is_empty());
    }

    #[test]
    fn search_result_reads_restaurants_from_data() {
        let raw = r#"{
            "data": [{
                "restaurantNumber": 42,
                "restaurantName": "Folsom",
                "addresses": [{"addressType": "MAIN", "addressLine1": "1 Main St", "latitude": 38.6}],
                "realHours": [{"dayOfWeek": "MONDAY", "openDateTime": "10:45", "closeDateTime": "22:00"}],
                "timezone": {"timezoneId": "America/Los_Angeles", "timezoneOffset": -8},
                "onlineOrdering": {"onlineOrderingEnabled": true, "restaurantTerminalSiteId": 9}
            }],
            "pagingInfo": {"currentPage": 0, "totalPages": 3, "itemsPerPage": 1, "totalItems": 3}
        }"#;

        let page: SearchResult = serde_json::from_str(raw).expect("search json");
        assert_eq!(page.paging_info.total_pages, 3);
        let restaurant = &page.restaurants[0];
        assert_eq!(restaurant.restaurant_number, 42);
        assert_eq!(restaurant.addresses[0].address_line1, "1 Main St");
        assert_eq!(restaurant.real_hours[0].day_of_week, "MONDAY");
        assert_eq!(restaurant.timezone.timezone_id, "America/Los_Angeles");
        assert_eq!(restaurant.online_ordering.restaurant_terminal_site_id, 9);
    }

    #[test]
    fn query_omits_empty_fields_on_the_wire() {
        let body = serde_json::to_value(SearchQuery {
            page_index: 2,
            ..Default::default()
        })
        .expect("query json");
        assert_eq!(body, serde_json::json!({"pageIndex": 2, "embeds": {}}));

        let body = serde_json::to_value(SearchQuery::default()).expect("query json");
        assert_eq!(body, serde_json::json!({"embeds": {}}));

        let body = serde_json::to_value(SearchQuery::nationwide()).expect("query json");
        assert_eq!(body["restaurantStatuses"], serde_json::json!(["OPEN", "LAB"]));
        assert_eq!(body["pageSize"], 4000);
        assert_eq!(body["embeds"]["addressTypes"], serde_json::json!(["MAIN"]));
        assert!(body.get("orderByDescending").is_none());
        assert!(body.get("pageIndex").is_none());
    }

    #[test]
    fn display_name_falls_back_to_number() {
        let unnamed = Restaurant {
            restaurant_number: 7,
            ..Default::default()
        };
        assert_eq!(unnamed.display_name(), "#7");
    }
}
