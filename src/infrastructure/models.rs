use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::order::{NewOrder, Order, OrderChanges, OrderId};
use crate::schema::orders;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub name: String,
    pub product: String,
    pub address: String,
    pub phone: String,
    pub amount: i64,
    pub image_url: String,
    pub tracking_number: String,
    pub status: String,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: OrderId::new(row.id),
            name: row.name,
            product: row.product,
            address: row.address,
            phone: row.phone,
            amount: row.amount,
            image_url: row.image_url,
            tracking_number: row.tracking_number,
            status: row.status,
        }
    }
}

/// `id` is left to the column default.
#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub name: String,
    pub product: String,
    pub address: String,
    pub phone: String,
    pub amount: i64,
    pub image_url: String,
    pub tracking_number: String,
    pub status: String,
}

impl From<NewOrder> for NewOrderRow {
    fn from(order: NewOrder) -> Self {
        NewOrderRow {
            name: order.name,
            product: order.product,
            address: order.address,
            phone: order.phone,
            amount: order.amount,
            image_url: order.image_url,
            tracking_number: order.tracking_number,
            status: order.status,
        }
    }
}

/// Diesel skips `None` fields, so only supplied columns end up in the SET
/// clause.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderChangeset {
    pub name: Option<String>,
    pub product: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub amount: Option<i64>,
    pub image_url: Option<String>,
    pub tracking_number: Option<String>,
    pub status: Option<String>,
}

impl From<&OrderChanges> for OrderChangeset {
    fn from(changes: &OrderChanges) -> Self {
        OrderChangeset {
            name: changes.name.clone(),
            product: changes.product.clone(),
            address: changes.address.clone(),
            phone: changes.phone.clone(),
            amount: changes.amount,
            image_url: changes.image_url.clone(),
            tracking_number: changes.tracking_number.clone(),
            status: changes.status.clone(),
        }
    }
}
