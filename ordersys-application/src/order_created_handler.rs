//! 订单创建处理器：将事件载荷编码为 JSON 并发布到消息交换机
//!
use crate::publisher::{JSON_CONTENT_TYPE, MessagePublisher, OutboundMessage};
use async_trait::async_trait;
use ordersys_events::{Event, EventHandler, JoinToken};
use std::sync::Arc;

pub const DEFAULT_EXCHANGE: &str = "amqp.direct";

pub struct OrderCreatedHandler {
    publisher: Arc<dyn MessagePublisher>,
    exchange: String,
    routing_key: String,
}

impl OrderCreatedHandler {
    pub fn new(publisher: Arc<dyn MessagePublisher>) -> Self {
        Self::with_exchange(publisher, DEFAULT_EXCHANGE)
    }

    pub fn with_exchange(publisher: Arc<dyn MessagePublisher>, exchange: impl Into<String>) -> Self {
        Self {
            publisher,
            exchange: exchange.into(),
            routing_key: String::new(),
        }
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }
}

#[async_trait]
impl EventHandler for OrderCreatedHandler {
    fn handler_name(&self) -> &str {
        "order_created_publisher"
    }

    async fn handle(&self, event: Arc<dyn Event>, done: JoinToken) -> anyhow::Result<()> {
        // 持有令牌直到返回，任何路径都会归还
        let _done = done;

        tracing::info!(event = event.name(), payload = %event.payload(), "order created");

        let body = serde_json::to_vec(event.payload())?;
        self.publisher
            .publish(OutboundMessage {
                exchange: self.exchange.clone(),
                routing_key: self.routing_key.clone(),
                content_type: JSON_CONTENT_TYPE.to_string(),
                body,
            })
            .await?;

        tracing::debug!(event = event.name(), exchange = %self.exchange, "payload published");
        Ok(())
    }
}
