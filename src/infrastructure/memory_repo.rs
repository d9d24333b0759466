use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderChanges, OrderId};
use crate::domain::ports::OrderRepository;

/// Process-local order store. Used when no database is configured and by
/// the HTTP tests. Iteration follows insertion order.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Order>>, DomainError> {
        self.orders
            .lock()
            .map_err(|_| DomainError::Internal("order store lock poisoned".to_string()))
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn insert(&self, order: NewOrder) -> Result<OrderId, DomainError> {
        let id = OrderId::new(Uuid::new_v4());
        self.lock()?.push(order.with_id(id));
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self.lock()?.clone())
    }

    fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.lock()?.iter().find(|o| o.id == id).cloned())
    }

    fn update_by_id(&self, id: OrderId, changes: &OrderChanges) -> Result<usize, DomainError> {
        let mut orders = self.lock()?;
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                changes.apply_to(order);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_by_id(&self, id: OrderId) -> Result<usize, DomainError> {
        let mut orders = self.lock()?;
        let before = orders.len();
        orders.retain(|o| o.id != id);
        Ok(before - orders.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_all_keeps_insertion_order() {
        let repo = InMemoryOrderRepository::new();
        let names = ["a", "b", "c"];
        let ids: Vec<OrderId> = names
            .iter()
            .map(|n| {
                repo.insert(NewOrder {
                    name: n.to_string(),
                    ..NewOrder::default()
                })
                .expect("insert failed")
            })
            .collect();

        let listed: Vec<OrderId> = repo
            .list_all()
            .expect("list failed")
            .into_iter()
            .map(|o| o.id)
            .collect();

        assert_eq!(listed, ids);
    }

    #[test]
    fn ids_are_unique() {
        let repo = InMemoryOrderRepository::new();
        let a = repo.insert(NewOrder::default()).expect("insert failed");
        let b = repo.insert(NewOrder::default()).expect("insert failed");
        assert_ne!(a, b);
    }

    #[test]
    fn update_reports_matches() {
        let repo = InMemoryOrderRepository::new();
        let id = repo.insert(NewOrder::default()).expect("insert failed");
        let changes = OrderChanges {
            tracking_number: Some("TH123".to_string()),
            ..OrderChanges::default()
        };

        assert_eq!(repo.update_by_id(id, &changes).expect("update failed"), 1);
        assert_eq!(
            repo.update_by_id(OrderId::new(Uuid::new_v4()), &changes)
                .expect("update failed"),
            0
        );
        let order = repo.find_by_id(id).expect("find failed").expect("exists");
        assert_eq!(order.tracking_number, "TH123");
    }

    #[test]
    fn delete_reports_removed_count() {
        let repo = InMemoryOrderRepository::new();
        let keep = repo.insert(NewOrder::default()).expect("insert failed");
        let gone = repo.insert(NewOrder::default()).expect("insert failed");

        assert_eq!(repo.delete_by_id(gone).expect("delete failed"), 1);
        assert_eq!(repo.delete_by_id(gone).expect("delete failed"), 0);

        let left = repo.list_all().expect("list failed");
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, keep);
    }
}
