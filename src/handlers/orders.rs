use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::order_service::SharedOrderService;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderId};
use crate::errors::AppError;
use crate::handlers::forms::OrderForm;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub product: String,
    pub address: String,
    pub phone: String,
    pub amount: i64,
    pub image_url: String,
    pub tracking_number: String,
    pub status: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id.to_string(),
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

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    /// Always "created".
    pub message: String,
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Repository calls are synchronous; run them on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Creates an order. Every field is optional; missing fields are stored as
/// empty strings (or 0 for `amount`).
#[utoipa::path(
    post,
    path = "/orders",
    request_body(content = OrderForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Order created", body = CreateOrderResponse),
        (status = 422, description = "Amount is not a whole number"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<SharedOrderService>,
    form: OrderForm,
) -> Result<HttpResponse, AppError> {
    let order = form.into_new_order()?;

    let id = blocking(move || service.create_order(order)).await?;

    Ok(HttpResponse::Ok().json(CreateOrderResponse {
        message: "created".to_string(),
        id: id.to_string(),
    }))
}

/// GET /orders
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "Every stored order", body = [OrderResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<SharedOrderService>,
) -> Result<HttpResponse, AppError> {
    let orders = blocking(move || service.list_orders()).await?;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/{order_id}
#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    params(
        ("order_id" = String, Path, description = "Order ID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 400, description = "Malformed order ID"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<SharedOrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id: OrderId = path.parse()?;

    let order = blocking(move || service.get_order(id)).await?;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /orders/{order_id}
///
/// Applies only the fields present in the request; everything else keeps
/// its stored value.
#[utoipa::path(
    put,
    path = "/orders/{order_id}",
    params(
        ("order_id" = String, Path, description = "Order ID"),
    ),
    request_body(content = OrderForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Order updated", body = MessageResponse),
        (status = 400, description = "Malformed order ID"),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Amount is not a whole number"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    service: web::Data<SharedOrderService>,
    path: web::Path<String>,
    form: OrderForm,
) -> Result<HttpResponse, AppError> {
    let id: OrderId = path.parse()?;
    let changes = form.into_changes()?;

    blocking(move || service.update_order(id, &changes)).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("updated")))
}

/// DELETE /orders/{order_id}
#[utoipa::path(
    delete,
    path = "/orders/{order_id}",
    params(
        ("order_id" = String, Path, description = "Order ID"),
    ),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 400, description = "Malformed order ID"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    service: web::Data<SharedOrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id: OrderId = path.parse()?;

    blocking(move || service.delete_order(id)).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("deleted")))
}
