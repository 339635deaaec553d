//! 进程内事件分发（ordersys-events）
//!
//! 提供按事件名注册处理器、并发扇出与汇合等待的最小构件：
//! - `event`：事件协议 `Event` 与通用实现 `GenericEvent`；
//! - `handler`：处理器协议 `EventHandler`，按实例身份注册；
//! - `wait_group`：计数式汇合原语 `WaitGroup` / `JoinToken`；
//! - `dispatcher`：分发器协议 `EventDispatcher`；
//! - `dispatcher_inmemory`：基于 `DashMap` 与 tokio 任务的内存实现。
//!
//! 不提供持久化、重放、重试与跨进程投递。
//!
pub mod dispatcher;
pub mod dispatcher_inmemory;
pub mod error;
pub mod event;
pub mod handler;
pub mod wait_group;

pub use dispatcher::EventDispatcher;
pub use dispatcher_inmemory::{DispatcherConfig, InMemoryEventDispatcher};
pub use error::{DispatchError, DispatchResult, HandlerFailure};
pub use event::{Event, GenericEvent};
pub use handler::{EventHandler, same_handler};
pub use wait_group::{JoinToken, WaitGroup};
