//! 事件分发器（EventDispatcher）协议
//!
//! 维护“事件名 → 有序处理器列表”的注册表，并将事件并发扇出给该事件名下的全部处理器，
//! 等待所有处理器归还汇合令牌后返回。
//!
use crate::error::DispatchResult;
use crate::event::Event;
use crate::handler::EventHandler;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait EventDispatcher: Send + Sync {
    /// 注册处理器到事件名末尾；同一实例重复注册返回 `AlreadyRegistered`，注册表不变
    fn register_handler(
        &self,
        event_name: &str,
        handler: Arc<dyn EventHandler>,
    ) -> DispatchResult<()>;

    /// 分发事件：为每个处理器启动一个并发任务，等待全部完成后返回
    ///
    /// 事件名下没有处理器时直接成功。处理器自身返回的错误只记录日志。
    async fn dispatch_event(&self, event: Arc<dyn Event>) -> DispatchResult<()>;

    /// 从事件名下移除该处理器的全部出现
    ///
    /// 事件名从未注册过时返回 `HandlerNotFound`；列表存在但不含该处理器时仍视为成功。
    fn remove_handler(
        &self,
        event: &dyn Event,
        handler: &Arc<dyn EventHandler>,
    ) -> DispatchResult<()>;

    /// 该处理器实例是否注册在事件名下
    fn has_handler(&self, event_name: &str, handler: &Arc<dyn EventHandler>) -> bool;

    /// 清空注册表
    fn clear_handlers(&self);
}
