use serde::Serialize;

use crate::config::PaymentDetails;
use crate::models::OrderView;

/// `Rp 15.000` style amounts, rounded to whole rupiah.
pub fn format_idr(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

pub fn contact_digits(contact: &str) -> String {
    contact.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn payment_message(view: &OrderView, payment: &PaymentDetails) -> String {
    let product = view
        .fruit
        .as_ref()
        .map_or("(produk tidak tersedia)", |f| f.name.as_str());
    format!(
        "Halo {name}! 🍎\n\n\
         Terima kasih sudah memesan di Fresh Fruits!\n\n\
         📋 *Detail Pesanan:*\n\
         • Produk: {product}\n\
         • Jumlah: {quantity}kg\n\
         • Total: {total}\n\n\
         💰 *Silakan transfer ke:*\n\
         {bank}\n\
         A.n: {holder}\n\n\
         Setelah transfer, mohon kirim bukti pembayaran ke nomor ini ya! 😊",
        name = view.order.customer_name,
        quantity = view.order.quantity,
        total = format_idr(view.total),
        bank = payment.bank,
        holder = payment.holder,
    )
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PaymentLink {
    pub phone: String,
    pub message: String,
    pub url: String,
}

/// Builds the chat deep link asking the buyer to pay for `view`.
pub fn whatsapp_link(view: &OrderView, payment: &PaymentDetails) -> PaymentLink {
    let phone = contact_digits(&view.order.contact);
    let message = payment_message(view, payment);
    let url = format!("https://wa.me/{}?text={}", phone, urlencoding::encode(&message));
    PaymentLink { phone, message, url }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::join_orders;
    use crate::models::{Fruit, FruitFields, Order, OrderStatus};
    use chrono::Utc;

    #[test]
    fn rupiah_grouping() {
        assert_eq!(format_idr(0.0), "Rp 0");
        assert_eq!(format_idr(950.0), "Rp 950");
        assert_eq!(format_idr(15000.0), "Rp 15.000");
        assert_eq!(format_idr(1234567.4), "Rp 1.234.567");
    }

    #[test]
    fn link_uses_contact_digits_and_encoded_message() {
        let apel = Fruit::create(FruitFields {
            name: "Apel".to_string(),
            price: 15000.0,
            stock: 50,
            image: String::new(),
            description: String::new(),
        });
        let order = Order {
            id: "o1".to_string(),
            fruit_id: apel.id.clone(),
            quantity: 2,
            customer_name: "Budi".to_string(),
            contact: "+62 812-3456-789".to_string(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        let view = join_orders(vec![order], &[apel]).remove(0);

        let link = whatsapp_link(&view, &PaymentDetails::default());
        assert_eq!(link.phone, "628123456789");
        assert!(link.message.starts_with("Halo Budi!"));
        assert!(link.message.contains("• Total: Rp 30.000"));
        assert!(link.message.contains("BCA: 1234567890"));
        assert!(link.url.starts_with("https://wa.me/628123456789?text=Halo%20Budi%21"));
        assert!(!link.url.contains(' '));
        assert!(!link.url.contains('\n'));
    }
}
