use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Notification;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub role: Role,
    pub exp: usize,
    pub jti: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub role: Role,
    pub notification: Notification,
}

/// A fruit on sale. Price is per kilogram in rupiah, stock is in kilograms.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Fruit {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub image: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// The editable part of a fruit, after the admin form has been parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct FruitFields {
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub image: String,
    pub description: String,
}

impl Fruit {
    pub fn create(fields: FruitFields) -> Self {
        Fruit {
            id: uuid::Uuid::new_v4().to_string(),
            name: fields.name,
            price: fields.price,
            stock: fields.stock,
            image: fields.image,
            description: fields.description,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, fields: &FruitFields) {
        self.name = fields.name.clone();
        self.price = fields.price;
        self.stock = fields.stock;
        self.image = fields.image.clone();
        self.description = fields.description.clone();
    }
}

/// Admin product form as submitted: numeric fields arrive as text, or as JSON
/// numbers which are kept in their textual form.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FruitForm {
    pub name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub price: String,
    #[serde(deserialize_with = "text_or_number")]
    pub stock: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected text or number, got {}", other))),
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Statuses reachable in one admin step.
    pub fn next(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Processing, OrderStatus::Cancelled],
            OrderStatus::Processing => &[OrderStatus::Completed, OrderStatus::Cancelled],
            OrderStatus::Completed | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        self.next().contains(&to)
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_empty()
    }

    /// Label shown on the admin order table.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Menunggu",
            OrderStatus::Processing => "Diproses",
            OrderStatus::Completed => "Selesai",
            OrderStatus::Cancelled => "Dibatalkan",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub fruit_id: String,
    pub quantity: i64,
    pub customer_name: String,
    pub contact: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Buyer's order form. `quantity` is kept raw so the clamp sees whatever
/// the client typed.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrderInput {
    pub fruit_id: String,
    #[serde(default)]
    pub quantity: serde_json::Value,
    pub customer_name: String,
    pub contact: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusInput {
    pub status: OrderStatus,
}

/// The referenced fruit's name and price, joined onto an order.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FruitRef {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub fruit: Option<FruitRef>,
    pub total: f64,
    pub status_label: &'static str,
    pub next_statuses: &'static [OrderStatus],
}
