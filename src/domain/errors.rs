use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order not found")]
    NotFound,
    #[error("Invalid order ID: {0}")]
    InvalidId(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
