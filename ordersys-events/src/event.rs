//! 事件（Event）
//!
//! 分发器只关心事件的名称（注册表键），时间戳与载荷由生产方与处理器约定。
//! `GenericEvent` 是一个通用实现，载荷为任意 JSON。
//!
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 可被分发的事件
pub trait Event: Send + Sync {
    /// 事件名称，用作注册表键（如 `order.created`）
    fn name(&self) -> &str;

    /// 事件创建时间
    fn occurred_at(&self) -> DateTime<Utc>;

    /// 事件载荷
    fn payload(&self) -> &Value;

    /// 替换事件载荷
    fn set_payload(&mut self, payload: Value);
}

/// 通用事件：名称 + 时间戳 + JSON 载荷
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct GenericEvent {
    #[builder(into)]
    name: String,
    #[builder(default = Utc::now())]
    occurred_at: DateTime<Utc>,
    #[builder(default)]
    payload: Value,
}

impl GenericEvent {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            occurred_at: Utc::now(),
            payload,
        }
    }
}

impl Event for GenericEvent {
    fn name(&self) -> &str {
        &self.name
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_defaults_to_null_payload_and_now() {
        let before = Utc::now();
        let ev = GenericEvent::builder().name("order.created").build();
        assert_eq!(ev.name(), "order.created");
        assert_eq!(ev.payload(), &Value::Null);
        assert!(ev.occurred_at() >= before);
    }

    #[test]
    fn set_payload_replaces_slot() {
        let mut ev = GenericEvent::new("order.created", json!({"id": "1"}));
        ev.set_payload(json!({"id": "2", "price": 100.0}));
        assert_eq!(ev.payload()["id"], "2");
        assert_eq!(ev.payload()["price"], 100.0);
    }
}
