//! Table definitions, in creation order.

pub const TABLES: &[(&str, &str)] = &[
    (
        "menus",
        r#"
        CREATE TABLE menus (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            restaurant_id INTEGER
        )"#,
    ),
    (
        "item_types",
        r#"
        CREATE TABLE item_types (
            id INTEGER PRIMARY KEY,
            item_type TEXT UNIQUE
        )"#,
    ),
    (
        "item_categories",
        r#"
        CREATE TABLE item_categories (
            id INTEGER PRIMARY KEY,
            item_category TEXT UNIQUE
        )"#,
    ),
    (
        "item_names",
        r#"
        CREATE TABLE item_names (
            id INTEGER PRIMARY KEY,
            item_name TEXT UNIQUE
        )"#,
    ),
    (
        "primary_filling_names",
        r#"
        CREATE TABLE primary_filling_names (
            id INTEGER PRIMARY KEY,
            primary_filling_name TEXT UNIQUE
        )"#,
    ),
    (
        "items",
        r#"
        CREATE TABLE items (
            id TEXT PRIMARY KEY,
            item_type_id INTEGER,
            item_category_id INTEGER,
            item_name_id INTEGER,
            primary_filling_name_id INTEGER,
            FOREIGN KEY(item_type_id) REFERENCES item_types(id),
            FOREIGN KEY(item_category_id) REFERENCES item_categories(id),
            FOREIGN KEY(item_name_id) REFERENCES item_names(id),
            FOREIGN KEY(primary_filling_name_id) REFERENCES primary_filling_names(id)
        )"#,
    ),
    (
        "content_groups",
        r#"
        CREATE TABLE content_groups (
            id INTEGER PRIMARY KEY,
            content_group_name TEXT UNIQUE
        )"#,
    ),
    (
        "entrees",
        r#"
        CREATE TABLE entrees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            menu_id INTEGER,
            item_id TEXT,
            pos_id INTEGER,
            unit_price REAL,
            unit_delivery_price REAL,
            unit_count INTEGER,
            max_quantity INTEGER,
            eligible_for_delivery BOOLEAN,
            max_contents INTEGER,
            max_customizations INTEGER,
            max_on_the_side_customizations INTEGER,
            max_extras INTEGER,
            max_halfs INTEGER,
            max_extras_plus_halfs INTEGER,
            is_universal BOOLEAN,
            is_item_available BOOLEAN,
            FOREIGN KEY(menu_id) REFERENCES menus(id),
            FOREIGN KEY(item_id) REFERENCES items(id)
        )"#,
    ),
    (
        "entree_content_groups",
        r#"
        CREATE TABLE entree_content_groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entree_id INTEGER,
            content_group_id INTEGER,
            min_quantity INTEGER,
            max_quantity INTEGER,
            FOREIGN KEY(entree_id) REFERENCES entrees(id),
            FOREIGN KEY(content_group_id) REFERENCES content_groups(id)
        )"#,
    ),
    (
        "contents",
        r#"
        CREATE TABLE contents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entree_id INTEGER,
            item_id TEXT,
            pos_id INTEGER,
            unit_price REAL,
            unit_delivery_price REAL,
            unit_count INTEGER,
            eligible_for_delivery BOOLEAN,
            pricing_reference_item_id TEXT,
            count_towards_customization_max INTEGER,
            count_towards_content_max INTEGER,
            content_group_id INTEGER,
            default_content BOOLEAN,
            is_item_available BOOLEAN,
            FOREIGN KEY(entree_id) REFERENCES entrees(id),
            FOREIGN KEY(item_id) REFERENCES items(id),
            FOREIGN KEY(content_group_id) REFERENCES content_groups(id)
        )"#,
    ),
    (
        "drinks",
        r#"
        CREATE TABLE drinks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            menu_id INTEGER,
            item_id TEXT,
            pos_id INTEGER,
            unit_price REAL,
            unit_delivery_price REAL,
            unit_count INTEGER,
            max_quantity INTEGER,
            eligible_for_delivery BOOLEAN,
            is_universal BOOLEAN,
            is_item_available BOOLEAN,
            FOREIGN KEY(menu_id) REFERENCES menus(id),
            FOREIGN KEY(item_id) REFERENCES items(id)
        )"#,
    ),
    (
        "non_food_items",
        r#"
        CREATE TABLE non_food_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            menu_id INTEGER,
            item_id TEXT,
            pos_id INTEGER,
            unit_price REAL,
            unit_delivery_price REAL,
            unit_count INTEGER,
            max_quantity INTEGER,
            eligible_for_delivery BOOLEAN,
            is_universal BOOLEAN,
            is_item_available BOOLEAN,
            FOREIGN KEY(menu_id) REFERENCES menus(id),
            FOREIGN KEY(item_id) REFERENCES items(id)
        )"#,
    ),
    (
        "sides",
        r#"
        CREATE TABLE sides (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            menu_id INTEGER,
            item_id TEXT,
            pos_id INTEGER,
            unit_price REAL,
            unit_delivery_price REAL,
            unit_count INTEGER,
            max_quantity INTEGER,
            eligible_for_delivery BOOLEAN,
            is_universal BOOLEAN,
            is_item_available BOOLEAN,
            FOREIGN KEY(menu_id) REFERENCES menus(id),
            FOREIGN KEY(item_id) REFERENCES items(id)
        )"#,
    ),
    (
        "restaurants",
        r#"
        CREATE TABLE restaurants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            restaurant_number INTEGER,
            restaurant_name TEXT,
            restaurant_location_type TEXT,
            restaurant_status TEXT,
            open_date TEXT,
            real_estate_category TEXT,
            operational_region TEXT,
            operational_sub_region TEXT,
            operational_patch TEXT,
            designated_market_area_name TEXT,
            distance REAL,
            directions_landmark TEXT,
            directions_cross_street1 TEXT,
            directions_cross_street2 TEXT,
            directions_pickup_instructions TEXT,
            timezone_current_timezone_offset INTEGER,
            timezone_timezone_offset INTEGER,
            timezone_timezone TEXT,
            timezone_timezone_id TEXT,
            timezone_observe_daylight_savings TEXT,
            timezone_daylight_savings_offset INTEGER,
            marketing_operations_market TEXT,
            marketing_special_menu_panel_instructions TEXT,
            marketing_feature_menu_panel TEXT,
            marketing_kids_menu_panel TEXT,
            marketing_calories_on_menu_panel TEXT,
            marketing_food_with_integrity_menu_board_width_id TEXT,
            marketing_menu_board_panel_height_id TEXT,
            marketing_menu_panel_type_id TEXT,
            marketing_alcohol_category TEXT,
            marketing_alcohol_category_description TEXT,
            marketing_marketing_alcohol_description TEXT,
            catering_enabled BOOLEAN,
            chipotlane_pickup_enabled BOOLEAN,
            experience_curbside_pickup_enabled BOOLEAN,
            experience_dining_room_open BOOLEAN,
            experience_digital_kitchen BOOLEAN,
            experience_walkup_window_enabled BOOLEAN,
            experience_pickup_inside_enabled BOOLEAN,
            experience_crew_tip_pickup_enabled BOOLEAN,
            experience_crew_tip_delivery_enabled BOOLEAN,
            experience_context_rest_exp_enabled BOOLEAN,
            sustainability_utensils_default_state TEXT,
            planned_subs_compl_date TEXT,
            actual_subs_compl_date TEXT,
            online_ordering_enabled BOOLEAN,
            online_ordering_dot_com_search_enabled TEXT,
            online_ordering_credit_cards_accepted BOOLEAN,
            online_ordering_gift_cards_accepted BOOLEAN,
            online_ordering_bulk_orders_accepted BOOLEAN,
            online_ordering_tax_assessed BOOLEAN,
            restaurant_terminal_site_id INTEGER
        )"#,
    ),
    (
        "addresses",
        r#"
        CREATE TABLE addresses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            restaurant_id INTEGER,
            address_type TEXT,
            address_line1 TEXT,
            address_line2 TEXT,
            locality TEXT,
            administrative_area TEXT,
            postal_code TEXT,
            sub_administrative_area TEXT,
            country_code TEXT,
            latitude REAL,
            longitude REAL,
            accuracy_determination TEXT,
            FOREIGN KEY(restaurant_id) REFERENCES restaurants(id)
        )"#,
    ),
    (
        "real_hours",
        r#"
        CREATE TABLE real_hours (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            restaurant_id INTEGER,
            day_of_week TEXT,
            open_date_time TEXT,
            close_date_time TEXT,
            FOREIGN KEY(restaurant_id) REFERENCES restaurants(id)
        )"#,
    ),
];
