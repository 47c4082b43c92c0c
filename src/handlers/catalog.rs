use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::catalog::{CatalogPage, FruitCard};
use crate::error::{AppError, Notification};
use crate::models::OrderInput;
use crate::ordering::{parse_quantity, OrderDraft};
use crate::store::Store;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn list_fruits(
    store: web::Data<dyn Store>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let fruits = store
        .list_fruits()
        .await
        .map_err(AppError::store("Gagal memuat data buah"))?;
    Ok(HttpResponse::Ok().json(CatalogPage::build(&fruits, &query.q)))
}

pub async fn get_fruit(
    store: web::Data<dyn Store>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let fruit = store
        .get_fruit(&id)
        .await
        .map_err(AppError::store("Gagal memuat data buah"))?
        .ok_or_else(|| AppError::NotFound("Buah tidak ditemukan".to_string()))?;
    Ok(HttpResponse::Ok().json(FruitCard::from(fruit)))
}

pub async fn place_order(
    store: web::Data<dyn Store>,
    input: web::Json<OrderInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    let fruit = store
        .get_fruit(&input.fruit_id)
        .await
        .map_err(AppError::store("Gagal mengirim pesanan. Silakan coba lagi."))?
        .ok_or_else(|| AppError::NotFound("Buah tidak ditemukan".to_string()))?;

    let mut draft = OrderDraft::new(fruit);
    draft.set_quantity(parse_quantity(&input.quantity));
    draft.customer_name = input.customer_name;
    draft.contact = input.contact;
    let total = draft.total();

    let order = draft.submit(store.get_ref()).await?;
    let notification = Notification::titled(
        "Pesanan Berhasil!",
        format!(
            "Pesanan {}kg {} telah dikirim. Kami akan segera menghubungi Anda.",
            order.quantity,
            draft.fruit().name
        ),
    );
    Ok(HttpResponse::Created().json(json!({
        "notification": notification,
        "order": order,
        "total": total,
    })))
}
