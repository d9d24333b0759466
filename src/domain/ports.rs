use std::sync::Arc;

use async_trait::async_trait;

use super::errors::DomainError;
use super::order::{NewOrder, Order, OrderChanges, OrderId, UploadedImage};

pub trait OrderRepository: Send + Sync + 'static {
    fn insert(&self, order: NewOrder) -> Result<OrderId, DomainError>;
    fn list_all(&self) -> Result<Vec<Order>, DomainError>;
    fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError>;
    /// Returns the number of matched records (0 or 1).
    fn update_by_id(&self, id: OrderId, changes: &OrderChanges) -> Result<usize, DomainError>;
    /// Returns the number of deleted records (0 or 1).
    fn delete_by_id(&self, id: OrderId) -> Result<usize, DomainError>;
}

impl<R: OrderRepository + ?Sized> OrderRepository for Arc<R> {
    fn insert(&self, order: NewOrder) -> Result<OrderId, DomainError> {
        (**self).insert(order)
    }

    fn list_all(&self) -> Result<Vec<Order>, DomainError> {
        (**self).list_all()
    }

    fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        (**self).find_by_id(id)
    }

    fn update_by_id(&self, id: OrderId, changes: &OrderChanges) -> Result<usize, DomainError> {
        (**self).update_by_id(id, changes)
    }

    fn delete_by_id(&self, id: OrderId) -> Result<usize, DomainError> {
        (**self).delete_by_id(id)
    }
}

#[async_trait]
pub trait ImageStore: Send + Sync + 'static {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: Option<String>,
    ) -> Result<UploadedImage, DomainError>;
}
