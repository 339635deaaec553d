//! 消息发布（MessagePublisher）
//!
//! 面向消息中间件的最小发布协议，`OrderCreatedHandler` 通过它把事件载荷送出进程。
//! `InMemoryPublisher` 基于 `tokio::sync::broadcast`：
//! - `publish`：记录并广播消息；
//! - `subscribe`：返回 `'static` 生命周期消息流，便于在 `tokio::spawn` 中消费；
//! - `published`：按发布顺序返回历史消息，便于测试断言。
//!
//! 注意：无订阅者时广播被忽略，但历史记录仍会保留。
//!
use crate::error::AppError;
use async_trait::async_trait;
use futures_core::stream::BoxStream;
use futures_util::StreamExt;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// 待发布的消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub exchange: String,
    pub routing_key: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, message: OutboundMessage) -> anyhow::Result<()>;
}

/// 简单的内存发布器实现
#[derive(Clone)]
pub struct InMemoryPublisher {
    tx: broadcast::Sender<OutboundMessage>,
    history: Arc<Mutex<Vec<OutboundMessage>>>,
}

impl InMemoryPublisher {
    /// `capacity` 为广播缓冲区容量
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self {
            tx,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn subscribe(&self) -> BoxStream<'static, Result<OutboundMessage, AppError>> {
        let rx = self.tx.subscribe();
        let stream =
            BroadcastStream::new(rx).map(|r| r.map_err(|e| AppError::Infra(e.to_string())));
        Box::pin(stream)
    }

    pub fn published(&self) -> Vec<OutboundMessage> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl MessagePublisher for InMemoryPublisher {
    async fn publish(&self, message: OutboundMessage) -> anyhow::Result<()> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.clone());
        // 若当前无订阅者，broadcast 的 send 会返回错误，这里视为非致命并忽略
        let _ = self.tx.send(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(body: &str) -> OutboundMessage {
        OutboundMessage {
            exchange: "amqp.direct".into(),
            routing_key: String::new(),
            content_type: JSON_CONTENT_TYPE.into(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_recorded() {
        let publisher = InMemoryPublisher::new(8);
        publisher.publish(message("{}")).await.unwrap();
        assert_eq!(publisher.published(), vec![message("{}")]);
    }

    #[tokio::test]
    async fn subscribers_receive_messages_in_order() {
        let publisher = InMemoryPublisher::new(8);
        let mut stream = publisher.subscribe();

        publisher.publish(message("1")).await.unwrap();
        publisher.publish(message("2")).await.unwrap();

        assert_eq!(stream.next().await.unwrap().unwrap().body, b"1");
        assert_eq!(stream.next().await.unwrap().unwrap().body, b"2");
    }
}
