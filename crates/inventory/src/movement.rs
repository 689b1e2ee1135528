use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{Entity, InventoryError, MovementId, ProductId};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    In,
    Out,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "in",
            MovementType::Out => "out",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MovementType::In => "Stock In",
            MovementType::Out => "Stock Out",
        }
    }
}

impl FromStr for MovementType {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(MovementType::In),
            "out" => Ok(MovementType::Out),
            other => Err(InventoryError::validation(format!(
                "unknown movement type: {other:?}"
            ))),
        }
    }
}

/// Ledger record: one applied stock-in or stock-out event.
///
/// `product_id` is a reference, not ownership; it may dangle once the product
/// is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    id: MovementId,
    product_id: ProductId,
    #[serde(rename = "type")]
    movement_type: MovementType,
    quantity: i64,
    #[serde(default)]
    note: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
}

impl Movement {
    pub(crate) fn new(
        id: MovementId,
        product_id: ProductId,
        movement_type: MovementType,
        quantity: i64,
        note: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            product_id,
            movement_type,
            quantity,
            note,
            timestamp,
        }
    }

    pub fn id_typed(&self) -> &MovementId {
        &self.id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn movement_type(&self) -> MovementType {
        self.movement_type
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().filter(|n| !n.is_empty())
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Signed effect on the product balance.
    pub fn delta(&self) -> i64 {
        match self.movement_type {
            MovementType::In => self.quantity,
            MovementType::Out => -self.quantity,
        }
    }
}

impl Entity for Movement {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn movement_type_parses_loosely() {
        assert_eq!(" IN ".parse::<MovementType>().unwrap(), MovementType::In);
        assert_eq!("out".parse::<MovementType>().unwrap(), MovementType::Out);
        assert!(matches!(
            "sideways".parse::<MovementType>(),
            Err(InventoryError::Validation(_))
        ));
    }

    #[test]
    fn wire_format_uses_type_and_epoch_millis() {
        let movement = Movement::new(
            MovementId::from("m-1"),
            ProductId::from("p-1"),
            MovementType::Out,
            3,
            None,
            Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
        );
        let json = serde_json::to_value(&movement).unwrap();
        assert_eq!(json["type"], "out");
        assert_eq!(json["productId"], "p-1");
        assert_eq!(json["timestamp"], 1_700_000_000_123_i64);
        assert_eq!(movement.delta(), -3);
    }

    #[test]
    fn legacy_record_with_empty_note_loads() {
        let raw = r#"{"id":"id-m","productId":"id-p","type":"in","quantity":4,"note":"","timestamp":1700000000000}"#;
        let movement: Movement = serde_json::from_str(raw).unwrap();
        assert_eq!(movement.note(), None);
        assert_eq!(movement.movement_type().label(), "Stock In");
        assert_eq!(movement.timestamp().timestamp_millis(), 1_700_000_000_000);
    }
}
