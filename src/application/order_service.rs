use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderChanges, OrderId};
use crate::domain::ports::OrderRepository;

pub type SharedOrderService = OrderService<Arc<dyn OrderRepository>>;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_order(&self, order: NewOrder) -> Result<OrderId, DomainError> {
        let id = self.repo.insert(order)?;
        log::debug!("created order {}", id);
        Ok(id)
    }

    pub fn list_orders(&self) -> Result<Vec<Order>, DomainError> {
        self.repo.list_all()
    }

    pub fn get_order(&self, id: OrderId) -> Result<Order, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn update_order(&self, id: OrderId, changes: &OrderChanges) -> Result<(), DomainError> {
        if self.repo.update_by_id(id, changes)? == 0 {
            return Err(DomainError::NotFound);
        }
        log::debug!("updated order {}", id);
        Ok(())
    }

    pub fn delete_order(&self, id: OrderId) -> Result<(), DomainError> {
        if self.repo.delete_by_id(id)? == 0 {
            return Err(DomainError::NotFound);
        }
        log::debug!("deleted order {}", id);
        Ok(())
    }
}
