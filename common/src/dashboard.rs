use crate::crop::Crop;
use crate::order::{Order, OrderStatus};

/// Counters shown at the top of the farmer dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub active_crops: usize,
    pub total_orders: usize,
    pub pending_orders: usize,
}

impl DashboardStats {
    pub fn compute(crops: &[Crop], orders: &[Order]) -> Self {
        Self {
            active_crops: crops.len(),
            total_orders: orders.len(),
            pending_orders: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .count(),
        }
    }
}

/// What a dashboard renders after one load: both lists, or neither.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub crops: Vec<Crop>,
    pub orders: Vec<Order>,
}

impl DashboardData {
    pub fn stats(&self) -> DashboardStats {
        DashboardStats::compute(&self.crops, &self.orders)
    }
}
