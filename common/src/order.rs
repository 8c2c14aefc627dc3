use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crop::{CropDetails, CropId};
use crate::form::{parse_positive, FieldErrors, FormFields};
use crate::user::UserRole;

/// Server-assigned order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order lifecycle as reported by the server. Transitions are decided
/// server-side; the client only offers the buttons for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Rejected,
    Delivered,
    Paid,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Accepted,
        OrderStatus::Rejected,
        OrderStatus::Delivered,
        OrderStatus::Paid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Paid => "paid",
        }
    }

    /// Uppercase badge text.
    pub fn badge_label(self) -> String {
        self.as_str().to_ascii_uppercase()
    }

    /// CSS class of the status badge.
    pub fn badge_class(self) -> String {
        format!("badge status-badge status-{}", self.as_str())
    }

    /// Buttons a user of `role` gets for an order in this state.
    pub fn actions_for(self, role: UserRole) -> &'static [OrderAction] {
        match (role, self) {
            (UserRole::Farmer, OrderStatus::Pending) => &[OrderAction::Accept, OrderAction::Reject],
            (UserRole::Farmer, OrderStatus::Accepted) => &[OrderAction::MarkDelivered],
            (UserRole::Buyer, OrderStatus::Accepted) => &[OrderAction::Pay],
            (UserRole::Buyer, OrderStatus::Delivered) => &[OrderAction::ConfirmDelivery],
            _ => &[],
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A button on an order card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    Accept,
    Reject,
    MarkDelivered,
    Pay,
    ConfirmDelivery,
}

impl OrderAction {
    pub fn label(self) -> &'static str {
        match self {
            OrderAction::Accept => "Accept",
            OrderAction::Reject => "Reject",
            OrderAction::MarkDelivered => "Mark Delivered",
            OrderAction::Pay => "Pay Now",
            OrderAction::ConfirmDelivery => "Confirm Delivery",
        }
    }

    pub fn button_class(self) -> &'static str {
        match self {
            OrderAction::Accept => "btn btn-sm btn-success me-1",
            OrderAction::Reject => "btn btn-sm btn-danger",
            OrderAction::MarkDelivered | OrderAction::ConfirmDelivery => "btn btn-sm btn-info",
            OrderAction::Pay => "btn btn-sm btn-success",
        }
    }

    /// Status this button asks the server to set. `Pay` goes through
    /// payment initiation instead and has none.
    pub fn target_status(self) -> Option<OrderStatus> {
        match self {
            OrderAction::Accept => Some(OrderStatus::Accepted),
            OrderAction::Reject => Some(OrderStatus::Rejected),
            OrderAction::MarkDelivered => Some(OrderStatus::Delivered),
            OrderAction::ConfirmDelivery => Some(OrderStatus::Paid),
            OrderAction::Pay => None,
        }
    }
}

/// An order as returned by `GET /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub crop_name: String,
    pub quantity: f64,
    pub total_amount: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub buyer_name: String,
    #[serde(default)]
    pub farmer_name: String,
    #[serde(default)]
    pub delivery_date: Option<String>,
    pub created_at: String,
}

impl Order {
    /// The other party's name: farmers see the buyer, everyone else the farmer.
    pub fn counterpart(&self, role: UserRole) -> (&'static str, &str) {
        match role {
            UserRole::Farmer => ("Buyer", &self.buyer_name),
            _ => ("Farmer", &self.farmer_name),
        }
    }

    pub fn actions(&self, role: UserRole) -> &'static [OrderAction] {
        self.status.actions_for(role)
    }

    pub fn delivery(&self) -> Option<&str> {
        self.delivery_date.as_deref().filter(|d| !d.is_empty())
    }
}

/// Body of `GET /api/orders`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderList {
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Body of `PUT /api/orders/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Payload fields of a successful `POST /api/orders`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlacedOrder {
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

pub fn order_total(quantity: f64, price_per_unit: f64) -> f64 {
    quantity * price_per_unit
}

/// Live total shown while typing; unparseable quantities count as zero.
pub fn order_total_for_input(quantity_input: &str, price_per_unit: f64) -> f64 {
    let quantity = quantity_input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|q| q.is_finite())
        .unwrap_or(0.0);
    order_total(quantity, price_per_unit)
}

/// Contents of the buyer's place-order modal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderForm {
    pub crop_id: Option<CropId>,
    pub quantity: String,
    pub delivery_address: String,
    pub delivery_date: String,
    pub notes: String,
}

impl OrderForm {
    pub const MIN_QUANTITY: f64 = 1.0;
    pub const QUANTITY_STEP: f64 = 0.1;

    pub fn for_crop(crop: &CropDetails) -> Self {
        Self {
            crop_id: Some(crop.id),
            ..Self::default()
        }
    }

    pub fn total(&self, price_per_unit: f64) -> f64 {
        order_total_for_input(&self.quantity, price_per_unit)
    }

    /// The constraints the modal's inputs declare: quantity between one and
    /// the available stock, a delivery address, and no past delivery date
    /// (`today` is `YYYY-MM-DD`).
    pub fn validate(&self, available: f64, today: &str) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        match parse_positive(&self.quantity) {
            None if self.quantity.trim().is_empty() => {
                errors.insert("quantity", "Quantity is required");
            }
            None => errors.insert("quantity", "Quantity must be a positive number"),
            Some(q) if q < Self::MIN_QUANTITY => {
                errors.insert("quantity", format!("Minimum order is {}", Self::MIN_QUANTITY));
            }
            Some(q) if q > available => {
                errors.insert("quantity", format!("Maximum: {available}"));
            }
            Some(_) => {}
        }
        if self.delivery_address.trim().is_empty() {
            errors.insert("delivery_address", "Delivery address is required");
        }
        let date = self.delivery_date.trim();
        if !date.is_empty() && date < today {
            errors.insert("delivery_date", "Delivery date cannot be in the past");
        }
        errors.into_result()
    }

    /// Entries in form order, as the order form submits them.
    pub fn to_fields(&self) -> FormFields {
        FormFields::new()
            .text(
                "crop_id",
                self.crop_id.map(|id| id.to_string()).unwrap_or_default(),
            )
            .text("quantity", self.quantity.trim())
            .text("delivery_address", self.delivery_address.trim())
            .text("delivery_date", self.delivery_date.trim())
            .text("notes", self.notes.as_str())
    }
}
