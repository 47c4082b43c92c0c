use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::catalog::FruitCard;
use crate::config::Config;
use crate::dashboard::{join_orders, DashboardStats};
use crate::error::{AppError, Notification};
use crate::messaging::whatsapp_link;
use crate::middleware::Session;
use crate::models::{Fruit, FruitFields, FruitForm, OrderView, StatusInput};
use crate::store::Store;

const LOAD_FRUITS_FAILED: &str = "Gagal memuat data buah";
const LOAD_ORDERS_FAILED: &str = "Gagal memuat data pesanan";

/// Only checks what the form cannot: that the numbers are numbers.
pub fn parse_form(form: &FruitForm) -> Result<FruitFields, AppError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Nama buah wajib diisi".to_string()));
    }
    let price = form
        .price
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| AppError::Validation("Harga harus berupa angka".to_string()))?;
    let stock = form
        .stock
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation("Stok harus berupa bilangan bulat".to_string()))?;
    if price < 0.0 || stock < 0 {
        return Err(AppError::Validation(
            "Harga dan stok tidak boleh negatif".to_string(),
        ));
    }
    Ok(FruitFields {
        name: name.to_string(),
        price,
        stock,
        image: form.image.trim().to_string(),
        description: form.description.trim().to_string(),
    })
}

async fn fruit_cards(store: &dyn Store) -> Result<Vec<FruitCard>, AppError> {
    let fruits = store
        .list_fruits()
        .await
        .map_err(AppError::store(LOAD_FRUITS_FAILED))?;
    Ok(fruits.into_iter().map(FruitCard::from).collect())
}

async fn order_views(store: &dyn Store, fruits: &[Fruit]) -> Result<Vec<OrderView>, AppError> {
    let orders = store
        .list_orders()
        .await
        .map_err(AppError::store(LOAD_ORDERS_FAILED))?;
    Ok(join_orders(orders, fruits))
}

async fn load_everything(store: &dyn Store) -> Result<(Vec<Fruit>, Vec<OrderView>), AppError> {
    let fruits = store
        .list_fruits()
        .await
        .map_err(AppError::store(LOAD_FRUITS_FAILED))?;
    let orders = order_views(store, &fruits).await?;
    Ok((fruits, orders))
}

pub async fn dashboard(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    let (fruits, orders) = load_everything(store.get_ref()).await?;
    let stats = DashboardStats::compute(&fruits, &orders);
    let fruits: Vec<FruitCard> = fruits.into_iter().map(FruitCard::from).collect();
    Ok(HttpResponse::Ok().json(json!({
        "stats": stats,
        "fruits": fruits,
        "orders": orders,
    })))
}

pub async fn stats(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    let (fruits, orders) = load_everything(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(DashboardStats::compute(&fruits, &orders)))
}

pub async fn list_fruits(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(fruit_cards(store.get_ref()).await?))
}

pub async fn create_fruit(
    store: web::Data<dyn Store>,
    session: Session,
    form: web::Json<FruitForm>,
) -> Result<HttpResponse, AppError> {
    let fruit = Fruit::create(parse_form(&form)?);
    store
        .insert_fruit(&fruit)
        .await
        .map_err(AppError::store("Gagal menambahkan buah"))?;
    log::info!("{} added fruit {} ({})", session.claims.email, fruit.name, fruit.id);

    Ok(HttpResponse::Created().json(json!({
        "notification": Notification::success("Buah berhasil ditambahkan"),
        "fruit": fruit,
        "fruits": fruit_cards(store.get_ref()).await?,
    })))
}

pub async fn update_fruit(
    store: web::Data<dyn Store>,
    session: Session,
    id: web::Path<String>,
    form: web::Json<FruitForm>,
) -> Result<HttpResponse, AppError> {
    let fields = parse_form(&form)?;
    let matched = store
        .update_fruit(&id, &fields)
        .await
        .map_err(AppError::store("Gagal mengupdate buah"))?;
    if !matched {
        return Err(AppError::NotFound("Buah tidak ditemukan".to_string()));
    }
    log::info!("{} updated fruit {}", session.claims.email, id);

    Ok(HttpResponse::Ok().json(json!({
        "notification": Notification::success("Buah berhasil diupdate"),
        "fruits": fruit_cards(store.get_ref()).await?,
    })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

pub async fn delete_fruit(
    store: web::Data<dyn Store>,
    session: Session,
    id: web::Path<String>,
    query: web::Query<DeleteQuery>,
) -> Result<HttpResponse, AppError> {
    if !query.confirm {
        return Err(AppError::Validation(
            "Apakah Anda yakin ingin menghapus buah ini? Kirim ulang dengan confirm=true".to_string(),
        ));
    }
    let deleted = store
        .delete_fruit(&id)
        .await
        .map_err(AppError::store("Gagal menghapus buah"))?;
    if !deleted {
        return Err(AppError::NotFound("Buah tidak ditemukan".to_string()));
    }
    log::info!("{} deleted fruit {}", session.claims.email, id);

    Ok(HttpResponse::Ok().json(json!({
        "notification": Notification::success("Buah berhasil dihapus"),
        "fruits": fruit_cards(store.get_ref()).await?,
    })))
}

pub async fn list_orders(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    let (_, orders) = load_everything(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

pub async fn update_order_status(
    store: web::Data<dyn Store>,
    session: Session,
    id: web::Path<String>,
    input: web::Json<StatusInput>,
) -> Result<HttpResponse, AppError> {
    const FAILED: &str = "Gagal mengupdate status pesanan";

    let order = store
        .get_order(&id)
        .await
        .map_err(AppError::store(FAILED))?
        .ok_or_else(|| AppError::NotFound("Pesanan tidak ditemukan".to_string()))?;

    let to = input.status;
    if order.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "Pesanan sudah {} dan tidak dapat diubah lagi",
            order.status.label().to_lowercase()
        )));
    }
    if !order.status.can_transition_to(to) {
        return Err(AppError::Conflict(format!(
            "Status pesanan tidak dapat diubah dari {} ke {}",
            order.status.label(),
            to.label()
        )));
    }
    let applied = store
        .update_order_status(&id, order.status, to)
        .await
        .map_err(AppError::store(FAILED))?;
    if !applied {
        return Err(AppError::Conflict(
            "Status pesanan sudah diubah oleh admin lain".to_string(),
        ));
    }
    log::info!(
        "{} moved order {} from {} to {}",
        session.claims.email,
        id,
        order.status.as_str(),
        to.as_str()
    );

    let (_, orders) = load_everything(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "notification": Notification::success("Status pesanan berhasil diupdate"),
        "orders": orders,
    })))
}

pub async fn payment_link(
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let (_, orders) = load_everything(store.get_ref()).await?;
    let view = orders
        .into_iter()
        .find(|view| view.order.id == id.as_str())
        .ok_or_else(|| AppError::NotFound("Pesanan tidak ditemukan".to_string()))?;
    Ok(HttpResponse::Ok().json(whatsapp_link(&view, &config.payment)))
}
