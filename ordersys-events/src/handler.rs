//! 事件处理器（EventHandler）
//!
//! 处理器以身份（`Arc` 指向的同一实例）注册，而非按值比较：
//! 两个内部状态完全相同的处理器实例是两条不同的注册。
//!
use crate::event::Event;
use crate::wait_group::JoinToken;
use async_trait::async_trait;
use std::sync::Arc;

/// 事件处理器：处理一次事件分发
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// 处理器名称（用于日志与失败记录）
    fn handler_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// 处理事件
    ///
    /// 任何返回路径都必须归还 `done`：调用 `done.done()`，或让其随作用域结束被丢弃。
    /// 返回的错误在默认分发中仅记录日志，不会传回分发调用方。
    async fn handle(&self, event: Arc<dyn Event>, done: JoinToken) -> anyhow::Result<()>;
}

/// 两个处理器是否为同一实例（只比较数据地址，忽略 vtable）
pub fn same_handler(a: &Arc<dyn EventHandler>, b: &Arc<dyn EventHandler>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
