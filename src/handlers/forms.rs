use actix_multipart::Multipart;
use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use futures::TryStreamExt;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, OrderChanges};
use crate::errors::AppError;

/// Order fields as submitted by a form. Every field is optional and an empty
/// value counts as not submitted.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderForm {
    pub name: Option<String>,
    pub product: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Whole number, e.g. "5".
    pub amount: Option<String>,
    pub image_url: Option<String>,
    pub tracking_number: Option<String>,
    pub status: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_amount(value: Option<String>) -> Result<Option<i64>, DomainError> {
    present(value)
        .map(|v| {
            v.trim()
                .parse::<i64>()
                .map_err(|_| DomainError::InvalidInput(format!("Invalid amount: {}", v)))
        })
        .transpose()
}

impl OrderForm {
    /// Missing fields take their defaults.
    pub fn into_new_order(self) -> Result<NewOrder, DomainError> {
        Ok(NewOrder {
            amount: parse_amount(self.amount)?.unwrap_or(0),
            name: present(self.name).unwrap_or_default(),
            product: present(self.product).unwrap_or_default(),
            address: present(self.address).unwrap_or_default(),
            phone: present(self.phone).unwrap_or_default(),
            image_url: present(self.image_url).unwrap_or_default(),
            tracking_number: present(self.tracking_number).unwrap_or_default(),
            status: present(self.status).unwrap_or_default(),
        })
    }

    /// Missing fields are left out of the change set.
    pub fn into_changes(self) -> Result<OrderChanges, DomainError> {
        Ok(OrderChanges {
            amount: parse_amount(self.amount)?,
            name: present(self.name),
            product: present(self.product),
            address: present(self.address),
            phone: present(self.phone),
            image_url: present(self.image_url),
            tracking_number: present(self.tracking_number),
            status: present(self.status),
        })
    }

    fn slot(&mut self, field: &str) -> Option<&mut Option<String>> {
        match field {
            "name" => Some(&mut self.name),
            "product" => Some(&mut self.product),
            "address" => Some(&mut self.address),
            "phone" => Some(&mut self.phone),
            "amount" => Some(&mut self.amount),
            "image_url" => Some(&mut self.image_url),
            "tracking_number" => Some(&mut self.tracking_number),
            "status" => Some(&mut self.status),
            _ => None,
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<OrderForm, AppError> {
    let mut form = OrderForm::default();

    while let Some(mut field) = multipart
        .try_next()
        .await
        .map_err(|e| AppError::Unprocessable(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::Unprocessable(e.to_string()))?
        {
            data.extend_from_slice(&chunk);
        }

        if let Some(slot) = form.slot(&name) {
            let value = String::from_utf8(data).map_err(|_| {
                AppError::Unprocessable(format!("Field '{}' is not valid UTF-8", name))
            })?;
            *slot = Some(value);
        }
    }

    Ok(form)
}

/// Accepts url-encoded and multipart bodies. Any other body is ignored and
/// yields an empty form.
impl FromRequest for OrderForm {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        // Media types compare case-insensitively.
        match req.content_type().to_ascii_lowercase().as_str() {
            "multipart/form-data" => {
                let multipart = Multipart::new(req.headers(), payload.take());
                Box::pin(read_multipart(multipart))
            }
            "application/x-www-form-urlencoded" => {
                let form = web::Form::<OrderForm>::from_request(req, payload);
                Box::pin(async move {
                    form.await
                        .map(web::Form::into_inner)
                        .map_err(|e| match e.as_response_error().status_code() {
                            StatusCode::PAYLOAD_TOO_LARGE => {
                                AppError::PayloadTooLarge(e.to_string())
                            }
                            _ => AppError::Unprocessable(e.to_string()),
                        })
                })
            }
            _ => Box::pin(async { Ok(OrderForm::default()) }),
        }
    }
}
