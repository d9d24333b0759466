use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use super::errors::DomainError;

/// Storage-assigned order identifier. Opaque to clients; they only ever see
/// its string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl FromStr for OrderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| DomainError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub name: String,
    pub product: String,
    pub address: String,
    pub phone: String,
    pub amount: i64,
    pub image_url: String,
    pub tracking_number: String,
    pub status: String,
}

/// Insert payload with every field already defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewOrder {
    pub name: String,
    pub product: String,
    pub address: String,
    pub phone: String,
    pub amount: i64,
    pub image_url: String,
    pub tracking_number: String,
    pub status: String,
}

impl NewOrder {
    pub fn with_id(self, id: OrderId) -> Order {
        Order {
            id,
            name: self.name,
            product: self.product,
            address: self.address,
            phone: self.phone,
            amount: self.amount,
            image_url: self.image_url,
            tracking_number: self.tracking_number,
            status: self.status,
        }
    }
}

/// Partial update. `None` means the field was not supplied and must be left
/// as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderChanges {
    pub name: Option<String>,
    pub product: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub amount: Option<i64>,
    pub image_url: Option<String>,
    pub tracking_number: Option<String>,
    pub status: Option<String>,
}

impl OrderChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, order: &mut Order) {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }

        set(&mut order.name, &self.name);
        set(&mut order.product, &self.product);
        set(&mut order.address, &self.address);
        set(&mut order.phone, &self.phone);
        set(&mut order.amount, &self.amount);
        set(&mut order.image_url, &self.image_url);
        set(&mut order.tracking_number, &self.tracking_number);
        set(&mut order.status, &self.status);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}
