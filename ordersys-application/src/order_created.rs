use chrono::{DateTime, Utc};
use ordersys_events::Event;
use serde_json::Value;

/// 订单创建事件名
pub const ORDER_CREATED: &str = "order.created";

/// 订单创建事件，载荷为 `OrderOutput` 的 JSON 形式
#[derive(Debug, Clone)]
pub struct OrderCreated {
    occurred_at: DateTime<Utc>,
    payload: Value,
}

impl OrderCreated {
    pub fn new() -> Self {
        Self {
            occurred_at: Utc::now(),
            payload: Value::Null,
        }
    }
}

impl Default for OrderCreated {
    fn default() -> Self {
        Self::new()
    }
}

impl Event for OrderCreated {
    fn name(&self) -> &str {
        ORDER_CREATED
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn payload(&self) -> &Value {
        &self.payload
    }

    fn set_payload(&mut self, payload: Value) {
        self.payload = payload;
    }
}
