//! Catalog normalization.
//!
//! Every fetched menu repeats the same item types, categories and names
//! thousands of times. `optimize_items` walks the whole menu collection once
//! and collapses those strings into dense surrogate keys, plus one
//! `CatalogItem` per natural item identifier.
//!
//! Surrogates are zero-based and assigned in first-seen order. The store
//! persists them as 1-based ranks (see [`rank`]); anything that writes a
//! dimension id or a foreign key to one must go through that conversion.

use std::collections::HashMap;

use crate::Menu;

/// Persisted id for a zero-based surrogate.
pub fn rank(surrogate: u32) -> i64 {
    i64::from(surrogate) + 1
}

/// Append-only string to surrogate mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionMap {
    surrogates: HashMap<String, u32>,
    values: Vec<String>,
}

impl DimensionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the surrogate for `value`, assigning the next one on first sight.
    pub fn intern(&mut self, value: &str) -> u32 {
        self.intern_reporting(value).0
    }

    /// Like [`DimensionMap::intern`], also reporting whether the value was new.
    pub fn intern_reporting(&mut self, value: &str) -> (u32, bool) {
        if let Some(&surrogate) = self.surrogates.get(value) {
            return (surrogate, false);
        }
        let surrogate = self.values.len() as u32;
        self.surrogates.insert(value.to_string(), surrogate);
        self.values.push(value.to_string());
        (surrogate, true)
    }

    pub fn get(&self, value: &str) -> Option<u32> {
        self.surrogates.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(value, surrogate)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(idx, value)| (value.as_str(), idx as u32))
    }

    /// `(value, persisted id)` pairs in first-seen order.
    pub fn ranked(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.iter().map(|(value, surrogate)| (value, rank(surrogate)))
    }
}

/// Deduplicated identity of a catalog item. `None` means the attribute was
/// never set in the context the item was first seen in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogItem {
    pub id: String,
    pub item_type: Option<u32>,
    pub category: Option<u32>,
    pub name: Option<u32>,
    pub primary_filling_name: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct OptimizedItems {
    pub item_types: DimensionMap,
    pub item_categories: DimensionMap,
    pub item_names: DimensionMap,
    pub primary_filling_names: DimensionMap,
    pub content_groups: DimensionMap,
    items: Vec<CatalogItem>,
    item_index: HashMap<String, usize>,
}

impl OptimizedItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `item` unless its id is already known. The first record wins and
    /// later ones are dropped even when they carry more attributes.
    pub fn add_item(&mut self, item: CatalogItem) -> &CatalogItem {
        let idx = match self.item_index.get(&item.id) {
            Some(&idx) => idx,
            None => {
                let idx = self.items.len();
                self.item_index.insert(item.id.clone(), idx);
                self.items.push(item);
                idx
            }
        };
        &self.items[idx]
    }

    pub fn item(&self, id: &str) -> Option<&CatalogItem> {
        self.item_index.get(id).map(|&idx| &self.items[idx])
    }

    /// Items in first-seen order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn add_content_group(&mut self, name: &str) -> u32 {
        self.content_groups.intern(name)
    }

    fn register(
        &mut self,
        id: &str,
        item_type: &str,
        category: Option<&str>,
        name: &str,
        primary_filling_name: Option<&str>,
    ) {
        // Dimensions are interned before the dedup check so that every value
        // observed anywhere in the catalog gets a row. Blank strings are values
        // too; only attributes the context never carries stay `None`.
        let item = CatalogItem {
            id: id.to_string(),
            item_type: Some(self.item_types.intern(item_type)),
            category: category.map(|c| self.item_categories.intern(c)),
            name: Some(self.item_names.intern(name)),
            primary_filling_name: primary_filling_name.map(|p| self.primary_filling_names.intern(p)),
        };
        self.add_item(item);
    }
}

/// Single pass over every menu. Must only run once fetching has finished.
pub fn optimize_items<'a>(menus: impl IntoIterator<Item = &'a Menu>) -> OptimizedItems {
    let mut oi = OptimizedItems::new();
    for menu in menus {
        for entree in &menu.entrees {
            oi.register(
                &entree.item_id,
                &entree.item_type,
                Some(&entree.item_category),
                &entree.item_name,
                Some(&entree.primary_filling_name),
            );

            // Contents only carry type and name.
            for content in &entree.contents {
                oi.register(&content.item_id, &content.item_type, None, &content.item_name, None);
            }

            for group in &entree.content_groups {
                oi.add_content_group(&group.content_group_name);
            }
        }
        for side in &menu.sides {
            oi.register(&side.item_id, &side.item_type, Some(&side.item_category), &side.item_name, None);
        }
        for drink in &menu.drinks {
            oi.register(
                &drink.item_id,
                &drink.item_type,
                Some(&drink.item_category),
                &drink.item_name,
                None,
            );
        }
        for nfi in &menu.non_food_items {
            oi.register(&nfi.item_id, &nfi.item_type, Some(&nfi.item_category), &nfi.item_name, None);
        }
    }
    oi
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Content, ContentGroup, Entree, NonFoodItem, Side};

    fn entree(id: &str, item_type: &str, category: &str, name: &str, filling: &str) -> Entree {
        Entree {
            item_id: id.to_string(),
            item_type: item_type.to_string(),
            item_category: category.to_string(),
            item_name: name.to_string(),
            primary_filling_name: filling.to_string(),
            ..Default::default()
        }
    }

    fn content(id: &str, item_type: &str, name: &str, group: &str) -> Content {
        Content {
            item_id: id.to_string(),
            item_type: item_type.to_string(),
            item_name: name.to_string(),
            content_group_name: group.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn surrogates_are_dense_and_first_seen() {
        let mut map = DimensionMap::new();
        assert_eq!(map.intern("ENTREE"), 0);
        assert_eq!(map.intern("TOPPING"), 1);
        assert_eq!(map.intern("ENTREE"), 0);
        assert_eq!(map.intern("SIDE"), 2);
        assert_eq!(map.intern("TOPPING"), 1);
        assert_eq!(map.len(), 3);

        let ranked: Vec<_> = map.ranked().collect();
        assert_eq!(ranked, vec![("ENTREE", 1), ("TOPPING", 2), ("SIDE", 3)]);
    }

    #[test]
    fn intern_reporting_flags_only_the_first_sight() {
        let mut map = DimensionMap::new();
        assert_eq!(map.intern_reporting("Fillings"), (0, true));
        assert_eq!(map.intern_reporting("Fillings"), (0, false));
        assert_eq!(map.get("Fillings"), Some(0));
        assert_eq!(map.get("Rice"), None);
    }

    #[test]
    fn first_item_record_wins() {
        let mut oi = OptimizedItems::new();
        let first = CatalogItem {
            id: "C1".into(),
            item_type: Some(1),
            name: Some(4),
            ..Default::default()
        };
        oi.add_item(first.clone());
        let kept = oi
            .add_item(CatalogItem {
                id: "C1".into(),
                item_type: Some(0),
                category: Some(2),
                name: Some(3),
                primary_filling_name: Some(5),
            })
            .clone();

        assert_eq!(kept, first);
        assert_eq!(oi.items().len(), 1);
        assert_eq!(oi.item("C1"), Some(&first));
    }

    #[test]
    fn item_seen_as_content_first_keeps_partial_identity() {
        let restaurant_a = Menu {
            restaurant_id: 1,
            entrees: vec![Entree {
                content_groups: vec![ContentGroup {
                    content_group_name: "Fillings".into(),
                    min_quantity: 1,
                    max_quantity: 2,
                }],
                contents: vec![content("C1", "TOPPING", "Rice", "Fillings")],
                ..entree("E1", "ENTREE", "BURRITO", "Burrito", "Chicken")
            }],
            ..Default::default()
        };
        let restaurant_b = Menu {
            restaurant_id: 2,
            entrees: vec![entree("C1", "ENTREE", "BOWL", "Rice Bowl", "Sofritas")],
            ..Default::default()
        };

        let oi = optimize_items([&restaurant_a, &restaurant_b]);

        let types: Vec<_> = oi.item_types.ranked().collect();
        assert_eq!(types, vec![("ENTREE", 1), ("TOPPING", 2)]);
        assert_eq!(oi.content_groups.ranked().collect::<Vec<_>>(), vec![("Fillings", 1)]);

        let c1 = oi.item("C1").expect("C1 recorded");
        assert_eq!(c1.item_type, oi.item_types.get("TOPPING"));
        assert_eq!(c1.name, oi.item_names.get("Rice"));
        assert_eq!(c1.category, None);
        assert_eq!(c1.primary_filling_name, None);

        // The dropped record still contributed its dimension values.
        assert_eq!(oi.item_categories.get("BOWL"), Some(1));
        assert_eq!(oi.primary_filling_names.get("Sofritas"), Some(1));
        assert_eq!(oi.items().len(), 2);
    }

    #[test]
    fn sides_drinks_and_non_food_items_skip_primary_filling() {
        let menu = Menu {
            sides: vec![Side {
                item_id: "S1".into(),
                item_type: "SIDE".into(),
                item_category: "CHIPS".into(),
                item_name: "Chips".into(),
                ..Default::default()
            }],
            drinks: vec![Side {
                item_id: "D1".into(),
                item_type: "DRINK".into(),
                item_category: "SODA".into(),
                item_name: "Cola".into(),
                ..Default::default()
            }],
            non_food_items: vec![NonFoodItem {
                item_id: "N1".into(),
                item_type: "NONFOOD".into(),
                item_category: "UTENSILS".into(),
                item_name: "Fork".into(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let oi = optimize_items([&menu]);
        assert!(oi.primary_filling_names.is_empty());
        for id in ["S1", "D1", "N1"] {
            let item = oi.item(id).expect("item");
            assert!(item.category.is_some());
            assert!(item.primary_filling_name.is_none());
        }
        assert_eq!(oi.item("D1").and_then(|i| i.name), Some(1));
    }

    #[test]
    fn blank_attributes_take_a_surrogate_like_any_other_value() {
        let menu = Menu {
            entrees: vec![
                Entree {
                    content_groups: vec![ContentGroup::default()],
                    ..entree("E0", "ENTREE", "TACOS", "Tacos", "")
                },
                entree("E1", "ENTREE", "BURRITO", "Burrito", "Chicken"),
            ],
            sides: vec![Side {
                item_id: "S1".into(),
                item_type: "SIDE".into(),
                item_name: "Chips".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let oi = optimize_items([&menu]);

        assert_eq!(oi.primary_filling_names.get(""), Some(0));
        assert_eq!(oi.primary_filling_names.get("Chicken"), Some(1));
        assert_eq!(oi.item("E0").and_then(|i| i.primary_filling_name), Some(0));
        assert_eq!(oi.content_groups.get(""), Some(0));

        let s1 = oi.item("S1").expect("S1 recorded");
        assert_eq!(s1.category, oi.item_categories.get(""));
        assert_eq!(s1.category, Some(2));
        assert_eq!(s1.primary_filling_name, None);
    }
}
