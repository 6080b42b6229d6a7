//! Order statistics for the stats tab

use kitchen_core::{OrderRecord, OrderStatus};
use serde::Serialize;

/// Counts of orders by status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OrderStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub failed: usize,
}

impl OrderStats {
    pub fn from_orders(orders: &[OrderRecord]) -> Self {
        orders.iter().fold(Self::default(), |mut stats, order| {
            stats.total += 1;
            match order.status {
                OrderStatus::Pending => stats.pending += 1,
                OrderStatus::Completed => stats.completed += 1,
                OrderStatus::Failed => stats.failed += 1,
            }
            stats
        })
    }

    /// Share of all orders with `status`, 0-100. An empty list counts as one
    /// order so the result is always defined.
    pub fn percent(&self, status: OrderStatus) -> f64 {
        let count = match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::Completed => self.completed,
            OrderStatus::Failed => self.failed,
        };
        count as f64 * 100.0 / self.total.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_core::{Difficulty, OrderId};

    fn order(status: OrderStatus) -> OrderRecord {
        OrderRecord {
            id: OrderId::from("1-a"),
            encoded_items: String::new(),
            created_at: 0,
            chef: "0xabc".into(),
            status,
            difficulty: Difficulty::default(),
        }
    }

    #[test]
    fn test_counts() {
        let orders = vec![
            order(OrderStatus::Pending),
            order(OrderStatus::Completed),
            order(OrderStatus::Completed),
            order(OrderStatus::Failed),
        ];
        let stats = OrderStats::from_orders(&orders);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.percent(OrderStatus::Completed), 50.0);
        assert_eq!(stats.percent(OrderStatus::Failed), 25.0);
    }

    #[test]
    fn test_empty() {
        let stats = OrderStats::from_orders(&[]);
        assert_eq!(stats, OrderStats::default());
        assert_eq!(stats.percent(OrderStatus::Pending), 0.0);
    }
}
