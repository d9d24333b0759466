use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderChanges, OrderId};
use crate::domain::ports::OrderRepository;
use crate::schema::orders;

use super::models::{NewOrderRow, OrderChangeset, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn insert(&self, order: NewOrder) -> Result<OrderId, DomainError> {
        let mut conn = self.pool.get()?;

        let id: Uuid = diesel::insert_into(orders::table)
            .values(&NewOrderRow::from(order))
            .returning(orders::id)
            .get_result(&mut conn)?;

        Ok(OrderId::new(id))
    }

    fn list_all(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .select(OrderRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = orders::table
            .find(id.as_uuid())
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Order::from))
    }

    fn update_by_id(&self, id: OrderId, changes: &OrderChanges) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;

        // An empty SET clause is a query builder error in Diesel; report
        // whether the record exists instead.
        if changes.is_empty() {
            let exists: bool =
                diesel::select(diesel::dsl::exists(orders::table.find(id.as_uuid())))
                    .get_result(&mut conn)?;
            return Ok(usize::from(exists));
        }

        let matched = diesel::update(orders::table.find(id.as_uuid()))
            .set(&OrderChangeset::from(changes))
            .execute(&mut conn)?;

        Ok(matched)
    }

    fn delete_by_id(&self, id: OrderId) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(orders::table.find(id.as_uuid())).execute(&mut conn)?;

        Ok(deleted)
    }
}
