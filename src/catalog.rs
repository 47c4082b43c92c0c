use serde::Serialize;

use crate::models::Fruit;
use crate::ordering::max_orderable;

pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Case-insensitive substring match on name or description. An empty query
/// keeps everything.
pub fn filter_fruits<'a>(fruits: &'a [Fruit], query: &str) -> Vec<&'a Fruit> {
    let needle = query.to_lowercase();
    fruits
        .iter()
        .filter(|fruit| {
            fruit.name.to_lowercase().contains(&needle)
                || fruit.description.to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockBadge {
    OutOfStock,
    LowStock,
}

impl StockBadge {
    pub fn for_stock(stock: i64) -> Option<StockBadge> {
        if stock <= 0 {
            Some(StockBadge::OutOfStock)
        } else if stock <= LOW_STOCK_THRESHOLD {
            Some(StockBadge::LowStock)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockBadge::OutOfStock => "Habis",
            StockBadge::LowStock => "Stok Terbatas",
        }
    }
}

/// A fruit as the catalog presents it.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FruitCard {
    #[serde(flatten)]
    pub fruit: Fruit,
    pub badge: Option<StockBadge>,
    pub badge_label: Option<&'static str>,
    pub orderable: bool,
    pub max_quantity: i64,
}

impl From<Fruit> for FruitCard {
    fn from(fruit: Fruit) -> Self {
        let badge = StockBadge::for_stock(fruit.stock);
        FruitCard {
            badge,
            badge_label: badge.map(StockBadge::label),
            orderable: badge != Some(StockBadge::OutOfStock),
            max_quantity: max_orderable(fruit.stock),
            fruit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogPage {
    pub query: String,
    pub fruits: Vec<FruitCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

impl CatalogPage {
    pub fn build(fruits: &[Fruit], query: &str) -> Self {
        let cards: Vec<FruitCard> = filter_fruits(fruits, query)
            .into_iter()
            .cloned()
            .map(FruitCard::from)
            .collect();
        let empty_message = match (cards.is_empty(), query.is_empty()) {
            (false, _) => None,
            (true, false) => Some("Tidak ada buah yang cocok dengan pencarian Anda"),
            (true, true) => Some("Belum ada buah tersedia"),
        };
        CatalogPage {
            query: query.to_string(),
            fruits: cards,
            empty_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FruitFields;

    fn fruit(name: &str, description: &str, stock: i64) -> Fruit {
        Fruit::create(FruitFields {
            name: name.to_string(),
            price: 20000.0,
            stock,
            image: String::new(),
            description: description.to_string(),
        })
    }

    fn names(found: Vec<&Fruit>) -> Vec<&str> {
        found.into_iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let fruits = vec![fruit("Apel", "Merah", 20), fruit("Jeruk", "Asam", 3)];
        assert_eq!(names(filter_fruits(&fruits, "")), vec!["Apel", "Jeruk"]);
    }

    #[test]
    fn matches_name_or_description_ignoring_case() {
        let fruits = vec![
            fruit("Apel Fuji", "Manis dan renyah", 20),
            fruit("Jeruk", "Segar, cocok untuk JUS", 3),
            fruit("Mangga", "Harum", 0),
        ];
        assert_eq!(names(filter_fruits(&fruits, "apel")), vec!["Apel Fuji"]);
        assert_eq!(names(filter_fruits(&fruits, "jus")), vec!["Jeruk"]);
        assert_eq!(names(filter_fruits(&fruits, "AN")), vec!["Apel Fuji", "Mangga"]);
        assert!(filter_fruits(&fruits, "durian").is_empty());
    }

    #[test]
    fn badges_follow_stock_thresholds() {
        assert_eq!(StockBadge::for_stock(0), Some(StockBadge::OutOfStock));
        assert_eq!(StockBadge::for_stock(1), Some(StockBadge::LowStock));
        assert_eq!(StockBadge::for_stock(10), Some(StockBadge::LowStock));
        assert_eq!(StockBadge::for_stock(11), None);
    }

    #[test]
    fn out_of_stock_cards_cannot_be_ordered() {
        let card = FruitCard::from(fruit("Mangga", "", 0));
        assert!(!card.orderable);
        assert_eq!(card.badge_label, Some("Habis"));

        let card = FruitCard::from(fruit("Apel", "", 250));
        assert!(card.orderable);
        assert_eq!(card.badge, None);
        assert_eq!(card.max_quantity, 100);
    }

    #[test]
    fn empty_page_explains_why() {
        let fruits = vec![fruit("Apel", "", 5)];
        assert_eq!(
            CatalogPage::build(&fruits, "durian").empty_message,
            Some("Tidak ada buah yang cocok dengan pencarian Anda")
        );
        assert_eq!(CatalogPage::build(&[], "").empty_message, Some("Belum ada buah tersedia"));
        assert_eq!(CatalogPage::build(&fruits, "").empty_message, None);
    }
}
