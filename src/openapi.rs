use utoipa::OpenApi;

use crate::handlers::{forms, images, orders};

#[derive(OpenApi)]
#[openapi(
    paths(
        images::upload_image,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
    ),
    components(schemas(
        forms::OrderForm,
        images::UploadImageForm,
        images::UploadImageResponse,
        orders::OrderResponse,
        orders::CreateOrderResponse,
        orders::MessageResponse,
    )),
    tags(
        (name = "orders", description = "Order records"),
        (name = "images", description = "Image uploads"),
    )
)]
pub struct ApiDoc;
