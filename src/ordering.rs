use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Fruit, Order, OrderStatus};
use crate::store::Store;

/// Largest single order in kilograms, whatever the stock.
pub const MAX_ORDER_KG: i64 = 100;

pub fn max_orderable(stock: i64) -> i64 {
    stock.clamp(0, MAX_ORDER_KG)
}

/// Clamps a requested quantity into `[1, min(stock, 100)]`. The lower bound
/// wins when nothing is in stock; such orders are refused before submission.
pub fn clamp_quantity(requested: i64, stock: i64) -> i64 {
    requested.min(max_orderable(stock)).max(1)
}

/// Reads whatever the client sent in the quantity field. Anything that does
/// not start with an integer, or is zero, counts as 1.
pub fn parse_quantity(raw: &Value) -> i64 {
    let parsed = match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => leading_integer(s),
        _ => None,
    };
    match parsed {
        Some(0) | None => 1,
        Some(n) => n,
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }
    // Runs too long for i64 saturate, so they still clamp to the maximum.
    Some(digits.parse::<i64>().map_or(sign * i64::MAX, |n| sign * n))
}

/// A buyer's order in progress for one fruit.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    fruit: Fruit,
    pub quantity: i64,
    pub customer_name: String,
    pub contact: String,
}

impl OrderDraft {
    pub fn new(fruit: Fruit) -> Self {
        OrderDraft {
            fruit,
            quantity: 1,
            customer_name: String::new(),
            contact: String::new(),
        }
    }

    pub fn fruit(&self) -> &Fruit {
        &self.fruit
    }

    pub fn set_quantity(&mut self, requested: i64) {
        self.quantity = clamp_quantity(requested, self.fruit.stock);
    }

    /// Display total; the stored order keeps only the quantity.
    pub fn total(&self) -> f64 {
        self.fruit.price * self.quantity as f64
    }

    pub fn reset(&mut self) {
        self.quantity = 1;
        self.customer_name.clear();
        self.contact.clear();
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.fruit.stock <= 0 {
            return Err(AppError::Validation(format!("Stok {} sedang habis", self.fruit.name)));
        }
        if self.customer_name.trim().is_empty() {
            return Err(AppError::Validation("Nama lengkap wajib diisi".to_string()));
        }
        if self.contact.trim().is_empty() {
            return Err(AppError::Validation("Kontak wajib diisi".to_string()));
        }
        Ok(())
    }

    /// Stores the order as pending. The draft is cleared only when the
    /// insert succeeds, so a failed attempt can be retried as is.
    pub async fn submit(&mut self, store: &dyn Store) -> Result<Order, AppError> {
        self.validate()?;
        let order = Order {
            id: Uuid::new_v4().to_string(),
            fruit_id: self.fruit.id.clone(),
            quantity: clamp_quantity(self.quantity, self.fruit.stock),
            customer_name: self.customer_name.trim().to_string(),
            contact: self.contact.trim().to_string(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        store
            .insert_order(&order)
            .await
            .map_err(AppError::store("Gagal mengirim pesanan. Silakan coba lagi."))?;
        log::info!("order {} placed: {}kg of {}", order.id, order.quantity, self.fruit.name);
        self.reset();
        Ok(order)
    }
}
