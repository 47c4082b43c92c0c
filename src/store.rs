use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Fruit, FruitFields, Order, OrderStatus, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mongodb: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for the `fruits`, `orders` and `users` collections.
///
/// Listings come back newest first. Update and delete calls report whether a
/// record matched instead of failing on a missing id.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_fruits(&self) -> Result<Vec<Fruit>, StoreError>;
    async fn get_fruit(&self, id: &str) -> Result<Option<Fruit>, StoreError>;
    async fn insert_fruit(&self, fruit: &Fruit) -> Result<(), StoreError>;
    async fn update_fruit(&self, id: &str, fields: &FruitFields) -> Result<bool, StoreError>;
    async fn delete_fruit(&self, id: &str) -> Result<bool, StoreError>;

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;
    async fn get_order(&self, id: &str) -> Result<Option<Order>, StoreError>;
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError>;
    /// Writes `to` only while the order is still in `from`.
    async fn update_order_status(
        &self,
        id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
}

pub fn newest_first_fruits(fruits: &mut [Fruit]) {
    fruits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

pub fn newest_first_orders(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Process-local store used by tests and `STORE_BACKEND=memory`.
#[derive(Default)]
pub struct MemoryStore {
    fruits: RwLock<HashMap<String, Fruit>>,
    orders: RwLock<HashMap<String, Order>>,
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryStore {
    /// Rewrites a stored user's role, as an operator would in the database.
    pub fn set_role(&self, email: &str, role: crate::models::Role) {
        let mut users = self.users.write().unwrap();
        for user in users.values_mut().filter(|user| user.email == email) {
            user.role = role;
        }
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_fruits(&self) -> Result<Vec<Fruit>, StoreError> {
        let mut fruits: Vec<Fruit> = self.fruits.read().map_err(poisoned)?.values().cloned().collect();
        newest_first_fruits(&mut fruits);
        Ok(fruits)
    }

    async fn get_fruit(&self, id: &str) -> Result<Option<Fruit>, StoreError> {
        Ok(self.fruits.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn insert_fruit(&self, fruit: &Fruit) -> Result<(), StoreError> {
        self.fruits
            .write()
            .map_err(poisoned)?
            .insert(fruit.id.clone(), fruit.clone());
        Ok(())
    }

    async fn update_fruit(&self, id: &str, fields: &FruitFields) -> Result<bool, StoreError> {
        let mut fruits = self.fruits.write().map_err(poisoned)?;
        match fruits.get_mut(id) {
            Some(fruit) => {
                fruit.apply(fields);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_fruit(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.fruits.write().map_err(poisoned)?.remove(id).is_some())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self.orders.read().map_err(poisoned)?.values().cloned().collect();
        newest_first_orders(&mut orders);
        Ok(orders)
    }

    async fn get_order(&self, id: &str) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn insert_order(&self, order: &Order) -> Result<(), StoreError> {
        self.orders
            .write()
            .map_err(poisoned)?
            .insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn update_order_status(
        &self,
        id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, StoreError> {
        let mut orders = self.orders.write().map_err(poisoned)?;
        match orders.get_mut(id) {
            Some(order) if order.status == from => {
                order.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .map_err(poisoned)?
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.users
            .write()
            .map_err(poisoned)?
            .insert(user.id.clone(), user.clone());
        Ok(())
    }
}
