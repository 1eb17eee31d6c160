//! SQLite persistence for restaurants, menus and the normalized item catalog.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chipotle_core::{rank, DimensionMap, Entree, Menu, NonFoodItem, OptimizedItems, Restaurant, Side};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{SqliteConnection, SqlitePool};
use tokio::fs;
use tracing::{debug, info};

pub mod schema;

pub const CRATE_NAME: &str = "chipotle-store";

/// Destination of a sync run. Every method failure is fatal to the run.
#[async_trait]
pub trait CatalogWriter: Send + Sync {
    /// Leaves an empty store with every table created.
    async fn prepare(&mut self) -> Result<()>;

    /// Writes one restaurant with its addresses and hours, outside any transaction.
    async fn insert_restaurant(&self, restaurant: &Restaurant) -> Result<i64>;

    /// Writes every dimension row and item row in one transaction.
    async fn insert_optimized_items(&self, items: &OptimizedItems) -> Result<()>;

    /// Writes one menu and all of its fact rows in one transaction. Content
    /// groups not seen during normalization are added to `items` on the way.
    async fn insert_menu(&self, menu: &Menu, items: &mut OptimizedItems) -> Result<i64>;

    async fn finish(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct SqliteCatalogStore {
    path: PathBuf,
    pool: Option<SqlitePool>,
}

impl SqliteCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool
            .as_ref()
            .ok_or_else(|| anyhow!("store at {} has not been prepared", self.path.display()))
    }

    async fn remove_existing(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "removed previous database");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("removing old database {}", self.path.display()))
            }
        }
    }
}

pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    for (table, ddl) in schema::TABLES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .with_context(|| format!("creating table {table}"))?;
        debug!(table, "created table");
    }
    Ok(())
}

#[async_trait]
impl CatalogWriter for SqliteCatalogStore {
    async fn prepare(&mut self) -> Result<()> {
        self.remove_existing().await?;

        // Bulk-load settings; `finish` restores durable ones. The journal
        // stays in memory rather than off so a failed transaction still rolls back.
        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Memory)
            .synchronous(SqliteSynchronous::Off);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .with_context(|| format!("opening sqlite database {}", self.path.display()))?;

        create_tables(&pool).await?;
        self.pool = Some(pool);
        Ok(())
    }

    async fn insert_restaurant(&self, restaurant: &Restaurant) -> Result<i64> {
        let pool = self.pool()?;
        let mut conn = pool.acquire().await.context("acquiring sqlite connection")?;
        let r = restaurant;

        let restaurant_id = sqlx::query(
            r#"
            INSERT INTO restaurants (
                restaurant_number, restaurant_name, restaurant_location_type,
                restaurant_status, open_date, real_estate_category,
                operational_region, operational_sub_region, operational_patch,
                designated_market_area_name, distance, directions_landmark,
                directions_cross_street1, directions_cross_street2, directions_pickup_instructions,
                timezone_current_timezone_offset, timezone_timezone_offset, timezone_timezone,
                timezone_timezone_id, timezone_observe_daylight_savings, timezone_daylight_savings_offset,
                marketing_operations_market, marketing_special_menu_panel_instructions, marketing_feature_menu_panel,
                marketing_kids_menu_panel, marketing_calories_on_menu_panel,
                marketing_food_with_integrity_menu_board_width_id, marketing_menu_board_panel_height_id, marketing_menu_panel_type_id,
                marketing_alcohol_category, marketing_alcohol_category_description, marketing_marketing_alcohol_description,
                catering_enabled, chipotlane_pickup_enabled, experience_curbside_pickup_enabled,
                experience_dining_room_open, experience_digital_kitchen, experience_walkup_window_enabled,
                experience_pickup_inside_enabled, experience_crew_tip_pickup_enabled, experience_crew_tip_delivery_enabled,
                experience_context_rest_exp_enabled, sustainability_utensils_default_state,
                planned_subs_compl_date, actual_subs_compl_date, online_ordering_enabled,
                online_ordering_dot_com_search_enabled, online_ordering_credit_cards_accepted,
                online_ordering_gift_cards_accepted, online_ordering_bulk_orders_accepted,
                online_ordering_tax_assessed, restaurant_terminal_site_id
            ) VALUES (
                ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
            )
            "#,
        )
        .bind(r.restaurant_number)
        .bind(&r.restaurant_name)
        .bind(&r.restaurant_location_type)
        .bind(&r.restaurant_status)
        .bind(&r.open_date)
        .bind(&r.real_estate_category)
        .bind(&r.operational_region)
        .bind(&r.operational_sub_region)
        .bind(&r.operational_patch)
        .bind(&r.designated_market_area_name)
        .bind(r.distance)
        .bind(&r.directions.landmark)
        .bind(&r.directions.cross_street1)
        .bind(&r.directions.cross_street2)
        .bind(&r.directions.pickup_instructions)
        .bind(r.timezone.current_timezone_offset)
        .bind(r.timezone.timezone_offset)
        .bind(&r.timezone.timezone)
        .bind(&r.timezone.timezone_id)
        .bind(&r.timezone.observe_daylight_savings)
        .bind(r.timezone.daylight_savings_offset)
        .bind(&r.marketing.operations_market)
        .bind(&r.marketing.special_menu_panel_instructions)
        .bind(&r.marketing.feature_menu_panel)
        .bind(&r.marketing.kids_menu_panel)
        .bind(&r.marketing.calories_on_menu_panel)
        .bind(&r.marketing.food_with_integrity_menu_board_width_id)
        .bind(&r.marketing.menu_board_panel_height_id)
        .bind(&r.marketing.menu_panel_type_id)
        .bind(&r.marketing.alcohol_category)
        .bind(&r.marketing.alcohol_category_description)
        .bind(&r.marketing.marketing_alcohol_description)
        .bind(r.catering.catering_enabled)
        .bind(r.chipotlane.chipotlane_pickup_enabled)
        .bind(r.experience.curbside_pickup_enabled)
        .bind(r.experience.dining_room_open)
        .bind(r.experience.digital_kitchen)
        .bind(r.experience.walkup_window_enabled)
        .bind(r.experience.pickup_inside_enabled)
        .bind(r.experience.crew_tip_pickup_enabled)
        .bind(r.experience.crew_tip_delivery_enabled)
        .bind(r.experience.context_rest_exp_enabled)
        .bind(&r.sustainability.utensils_default_state)
        .bind(&r.planned_subs_compl_date)
        .bind(&r.actual_subs_compl_date)
        .bind(r.online_ordering.online_ordering_enabled)
        .bind(&r.online_ordering.online_ordering_dot_com_search_enabled)
        .bind(r.online_ordering.online_ordering_credit_cards_accepted)
        .bind(r.online_ordering.online_ordering_gift_cards_accepted)
        .bind(r.online_ordering.online_ordering_bulk_orders_accepted)
        .bind(r.online_ordering.online_ordering_tax_assessed)
        .bind(r.online_ordering.restaurant_terminal_site_id)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("inserting restaurant {}", r.restaurant_number))?
        .last_insert_rowid();

        for address in &r.addresses {
            sqlx::query(
                r#"
                INSERT INTO addresses (
                    restaurant_id, address_type, address_line1, address_line2, locality,
                    administrative_area, postal_code, sub_administrative_area, country_code,
                    latitude, longitude, accuracy_determination
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(restaurant_id)
            .bind(&address.address_type)
            .bind(&address.address_line1)
            .bind(&address.address_line2)
            .bind(&address.locality)
            .bind(&address.administrative_area)
            .bind(&address.postal_code)
            .bind(&address.sub_administrative_area)
            .bind(&address.country_code)
            .bind(address.latitude)
            .bind(address.longitude)
            .bind(&address.accuracy_determination)
            .execute(&mut *conn)
            .await
            .with_context(|| format!("inserting address for restaurant {}", r.restaurant_number))?;
        }

        for hours in &r.real_hours {
            sqlx::query(
                "INSERT INTO real_hours (restaurant_id, day_of_week, open_date_time, close_date_time) VALUES (?, ?, ?, ?)",
            )
            .bind(restaurant_id)
            .bind(&hours.day_of_week)
            .bind(&hours.open_date_time)
            .bind(&hours.close_date_time)
            .execute(&mut *conn)
            .await
            .with_context(|| format!("inserting real hours for restaurant {}", r.restaurant_number))?;
        }

        Ok(restaurant_id)
    }

    async fn insert_optimized_items(&self, items: &OptimizedItems) -> Result<()> {
        let mut tx = self
            .pool()?
            .begin()
            .await
            .context("starting optimized items transaction")?;

        insert_dimension(&mut tx, "item_types", "item_type", &items.item_types).await?;
        insert_dimension(&mut tx, "item_categories", "item_category", &items.item_categories).await?;
        insert_dimension(&mut tx, "item_names", "item_name", &items.item_names).await?;
        insert_dimension(
            &mut tx,
            "primary_filling_names",
            "primary_filling_name",
            &items.primary_filling_names,
        )
        .await?;
        insert_dimension(&mut tx, "content_groups", "content_group_name", &items.content_groups).await?;

        for item in items.items() {
            sqlx::query(
                "INSERT INTO items (id, item_type_id, item_category_id, item_name_id, primary_filling_name_id) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&item.id)
            .bind(item.item_type.map(rank))
            .bind(item.category.map(rank))
            .bind(item.name.map(rank))
            .bind(item.primary_filling_name.map(rank))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("inserting item {}", item.id))?;
        }

        tx.commit()
            .await
            .context("committing optimized items transaction")?;
        Ok(())
    }

    async fn insert_menu(&self, menu: &Menu, items: &mut OptimizedItems) -> Result<i64> {
        let mut tx = self
            .pool()?
            .begin()
            .await
            .with_context(|| format!("starting menu transaction for restaurant {}", menu.restaurant_id))?;

        let menu_id = sqlx::query("INSERT INTO menus (restaurant_id) VALUES (?)")
            .bind(menu.restaurant_id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("inserting menu for restaurant {}", menu.restaurant_id))?
            .last_insert_rowid();

        for entree in &menu.entrees {
            insert_entree(&mut tx, menu_id, entree, items).await?;
        }
        for drink in &menu.drinks {
            insert_menu_item(&mut tx, "drinks", menu_id, MenuItemRow::from(drink)).await?;
        }
        for nfi in &menu.non_food_items {
            insert_menu_item(&mut tx, "non_food_items", menu_id, MenuItemRow::from(nfi)).await?;
        }
        for side in &menu.sides {
            insert_menu_item(&mut tx, "sides", menu_id, MenuItemRow::from(side)).await?;
        }

        tx.commit()
            .await
            .with_context(|| format!("committing menu for restaurant {}", menu.restaurant_id))?;
        debug!(menu_id, restaurant_id = menu.restaurant_id, "inserted menu");
        Ok(menu_id)
    }

    async fn finish(&self) -> Result<()> {
        let pool = self.pool()?;
        for pragma in ["PRAGMA synchronous = FULL", "PRAGMA journal_mode = DELETE"] {
            sqlx::query(pragma)
                .execute(pool)
                .await
                .with_context(|| format!("applying {pragma}"))?;
        }
        pool.close().await;
        Ok(())
    }
}

async fn insert_dimension(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
    map: &DimensionMap,
) -> Result<()> {
    let sql = format!("INSERT INTO {table} ({column}, id) VALUES (?, ?)");
    for (value, id) in map.ranked() {
        sqlx::query(&sql)
            .bind(value)
            .bind(id)
            .execute(&mut *conn)
            .await
            .with_context(|| format!("inserting {table} row {value:?} ({id})"))?;
    }
    Ok(())
}

/// Persisted id of a content group, registering the group if this is its first sighting.
async fn resolve_content_group(
    conn: &mut SqliteConnection,
    items: &mut OptimizedItems,
    name: &str,
) -> Result<i64> {
    let (surrogate, created) = items.content_groups.intern_reporting(name);
    let id = rank(surrogate);
    if created {
        sqlx::query("INSERT INTO content_groups (content_group_name, id) VALUES (?, ?)")
            .bind(name)
            .bind(id)
            .execute(&mut *conn)
            .await
            .with_context(|| format!("inserting late content group {name:?}"))?;
    }
    Ok(id)
}

async fn insert_entree(
    conn: &mut SqliteConnection,
    menu_id: i64,
    entree: &Entree,
    items: &mut OptimizedItems,
) -> Result<()> {
    let entree_id = sqlx::query(
        r#"
        INSERT INTO entrees (
            menu_id, item_id, pos_id, unit_price, unit_delivery_price, unit_count, max_quantity,
            eligible_for_delivery, max_contents, max_customizations, max_on_the_side_customizations,
            max_extras, max_halfs, max_extras_plus_halfs, is_universal, is_item_available
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(menu_id)
    .bind(&entree.item_id)
    .bind(entree.pos_id)
    .bind(entree.unit_price)
    .bind(entree.unit_delivery_price)
    .bind(entree.unit_count)
    .bind(entree.max_quantity)
    .bind(entree.eligible_for_delivery)
    .bind(entree.max_contents)
    .bind(entree.max_customizations)
    .bind(entree.max_on_the_side_customizations)
    .bind(entree.max_extras)
    .bind(entree.max_halfs)
    .bind(entree.max_extras_plus_halfs)
    .bind(entree.is_universal)
    .bind(entree.is_item_available)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("inserting entree {}", entree.item_id))?
    .last_insert_rowid();

    for group in &entree.content_groups {
        let group_id = resolve_content_group(conn, items, &group.content_group_name).await?;
        sqlx::query(
            "INSERT INTO entree_content_groups (entree_id, content_group_id, min_quantity, max_quantity) VALUES (?, ?, ?, ?)",
        )
        .bind(entree_id)
        .bind(group_id)
        .bind(group.min_quantity)
        .bind(group.max_quantity)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("inserting content group for entree {}", entree.item_id))?;
    }

    for content in &entree.contents {
        let group_id = resolve_content_group(conn, items, &content.content_group_name).await?;
        sqlx::query(
            r#"
            INSERT INTO contents (
                entree_id, item_id, pos_id, unit_price, unit_delivery_price, unit_count,
                eligible_for_delivery, pricing_reference_item_id, count_towards_customization_max,
                count_towards_content_max, content_group_id, default_content, is_item_available
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entree_id)
        .bind(&content.item_id)
        .bind(content.pos_id)
        .bind(content.unit_price)
        .bind(content.unit_delivery_price)
        .bind(content.unit_count)
        .bind(content.eligible_for_delivery)
        .bind(&content.pricing_reference_item_id)
        .bind(content.count_towards_customization_max)
        .bind(content.count_towards_content_max)
        .bind(group_id)
        .bind(content.default_content)
        .bind(content.is_item_available)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("inserting content {} for entree {}", content.item_id, entree.item_id))?;
    }

    Ok(())
}

/// Columns shared by the drink, side and non-food-item fact tables.
struct MenuItemRow<'a> {
    item_id: &'a str,
    pos_id: i64,
    unit_price: f64,
    unit_delivery_price: f64,
    unit_count: i64,
    max_quantity: i64,
    eligible_for_delivery: bool,
    is_universal: bool,
    is_item_available: bool,
}

impl<'a> From<&'a Side> for MenuItemRow<'a> {
    fn from(side: &'a Side) -> Self {
        Self {
            item_id: &side.item_id,
            pos_id: side.pos_id,
            unit_price: side.unit_price,
            unit_delivery_price: side.unit_delivery_price,
            unit_count: side.unit_count,
            max_quantity: side.max_quantity,
            eligible_for_delivery: side.eligible_for_delivery,
            is_universal: side.is_universal,
            is_item_available: side.is_item_available,
        }
    }
}

impl<'a> From<&'a NonFoodItem> for MenuItemRow<'a> {
    fn from(nfi: &'a NonFoodItem) -> Self {
        Self {
            item_id: &nfi.item_id,
            pos_id: nfi.pos_id,
            unit_price: nfi.unit_price,
            unit_delivery_price: nfi.unit_delivery_price,
            unit_count: nfi.unit_count,
            max_quantity: nfi.max_quantity,
            eligible_for_delivery: nfi.eligible_for_delivery,
            is_universal: nfi.is_universal,
            is_item_available: nfi.is_item_available,
        }
    }
}

async fn insert_menu_item(
    conn: &mut SqliteConnection,
    table: &str,
    menu_id: i64,
    row: MenuItemRow<'_>,
) -> Result<()> {
    let sql = format!(
        "INSERT INTO {table} (menu_id, item_id, pos_id, unit_price, unit_delivery_price, unit_count, max_quantity, eligible_for_delivery, is_universal, is_item_available) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    );
    sqlx::query(&sql)
        .bind(menu_id)
        .bind(row.item_id)
        .bind(row.pos_id)
        .bind(row.unit_price)
        .bind(row.unit_delivery_price)
        .bind(row.unit_count)
        .bind(row.max_quantity)
        .bind(row.eligible_for_delivery)
        .bind(row.is_universal)
        .bind(row.is_item_available)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("inserting {table} row {}", row.item_id))?;
    Ok(())
}
