//! 订单应用层（ordersys-application）
//!
//! 事件分发器的生产方与消费方：
//! - `create_order`：创建订单用例，成功后分发 `order.created`；
//! - `order_created_handler`：订阅 `order.created`，将载荷发布到消息交换机；
//! - `order_repository` / `publisher`：持久化与消息发布协议及其内存实现。
//!
pub mod create_order;
pub mod dto;
pub mod error;
pub mod order;
pub mod order_created;
pub mod order_created_handler;
pub mod order_repository;
pub mod publisher;

pub use create_order::CreateOrderUseCase;
pub use order_created::{ORDER_CREATED, OrderCreated};
pub use order_created_handler::OrderCreatedHandler;
pub use order_repository::InMemoryOrderRepository;
pub use publisher::InMemoryPublisher;
