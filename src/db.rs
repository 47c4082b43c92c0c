use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{options::ClientOptions, Client, Collection, Database};

use crate::models::{Fruit, FruitFields, Order, OrderStatus, User};
use crate::store::{newest_first_fruits, newest_first_orders, Store, StoreError};

pub async fn connect(database_url: &str, database_name: &str) -> Result<Database, StoreError> {
    let client_options = ClientOptions::parse(database_url).await?;
    let client = Client::with_options(client_options)?;
    Ok(client.database(database_name))
}

pub struct MongoStore {
    fruits: Collection<Fruit>,
    orders: Collection<Order>,
    users: Collection<User>,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        MongoStore {
            fruits: db.collection("fruits"),
            orders: db.collection("orders"),
            users: db.collection("users"),
        }
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn list_fruits(&self) -> Result<Vec<Fruit>, StoreError> {
        let cursor = self.fruits.find(None, None).await?;
        let mut fruits: Vec<Fruit> = cursor.try_collect().await?;
        // created_at is stored as an RFC 3339 string; order on the parsed value.
        newest_first_fruits(&mut fruits);
        Ok(fruits)
    }

    async fn get_fruit(&self, id: &str) -> Result<Option<Fruit>, StoreError> {
        Ok(self.fruits.find_one(doc! {"id": id}, None).await?)
    }

    async fn insert_fruit(&self, fruit: &Fruit) -> Result<(), StoreError> {
        self.fruits.insert_one(fruit, None).await?;
        Ok(())
    }

    async fn update_fruit(&self, id: &str, fields: &FruitFields) -> Result<bool, StoreError> {
        let update = doc! {"$set": {
            "name": &fields.name,
            "price": fields.price,
            "stock": fields.stock,
            "image": &fields.image,
            "description": &fields.description,
        }};
        let result = self.fruits.update_one(doc! {"id": id}, update, None).await?;
        Ok(result.matched_count == 1)
    }

    async fn delete_fruit(&self, id: &str) -> Result<bool, StoreError> {
        let result = self.fruits.delete_one(doc! {"id": id}, None).await?;
        Ok(result.deleted_count == 1)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let cursor = self.orders.find(None, None).await?;
        let mut orders: Vec<Order> = cursor.try_collect().await?;
        newest_first_orders(&mut orders);
        Ok(orders)
    }

    async fn get_order(&self, id: &str) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.find_one(doc! {"id": id}, None).await?)
    }

    async fn insert_order(&self, order: &Order) -> Result<(), StoreError> {
        self.orders.insert_one(order, None).await?;
        Ok(())
    }

    async fn update_order_status(
        &self,
        id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, StoreError> {
        let filter = doc! {"id": id, "status": from.as_str()};
        let update = doc! {"$set": {"status": to.as_str()}};
        let result = self.orders.update_one(filter, update, None).await?;
        Ok(result.modified_count == 1)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.find_one(doc! {"email": email}, None).await?)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.find_one(doc! {"id": id}, None).await?)
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.users.insert_one(user, None).await?;
        Ok(())
    }
}
