use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::LOW_STOCK_THRESHOLD;
use crate::models::{Fruit, FruitRef, Order, OrderStatus, OrderView};

/// Attaches each order's fruit name and price. Orders whose fruit has since
/// been deleted keep `fruit: None` and a zero total.
pub fn join_orders(orders: Vec<Order>, fruits: &[Fruit]) -> Vec<OrderView> {
    let by_id: HashMap<&str, &Fruit> = fruits.iter().map(|f| (f.id.as_str(), f)).collect();
    orders
        .into_iter()
        .map(|order| {
            let fruit = by_id.get(order.fruit_id.as_str()).map(|f| FruitRef {
                name: f.name.clone(),
                price: f.price,
            });
            let total = fruit
                .as_ref()
                .map_or(0.0, |f| f.price * order.quantity as f64);
            OrderView {
                status_label: order.status.label(),
                next_statuses: order.status.next(),
                order,
                fruit,
                total,
            }
        })
        .collect()
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DashboardStats {
    pub revenue: f64,
    pub pending_orders: usize,
    pub low_stock: usize,
    pub total_fruits: usize,
    pub total_orders: usize,
}

impl DashboardStats {
    pub fn compute(fruits: &[Fruit], orders: &[OrderView]) -> Self {
        DashboardStats {
            revenue: orders
                .iter()
                .filter(|view| view.order.status == OrderStatus::Completed)
                .map(|view| view.total)
                .sum(),
            pending_orders: orders
                .iter()
                .filter(|view| view.order.status == OrderStatus::Pending)
                .count(),
            // Counts sold-out fruits too: both need restocking.
            low_stock: fruits
                .iter()
                .filter(|fruit| fruit.stock <= LOW_STOCK_THRESHOLD)
                .count(),
            total_fruits: fruits.len(),
            total_orders: orders.len(),
        }
    }
}
