//! 事件分发统一错误定义
//!
//! 区分两类错误：
//! - 注册表形态错误（重复注册、移除时事件名不存在），属于调用方逻辑错误，同步返回；
//! - 分发执行错误（超时、取消、处理器失败聚合），仅在显式启用对应能力时返回。
//!
use thiserror::Error;

/// 单个处理器的失败记录（用于聚合返回）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    /// 处理器名称
    pub handler: String,
    /// 失败原因
    pub reason: String,
}

impl std::fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.handler, self.reason)
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DispatchError {
    // --- 注册表 ---
    #[error("handler already registered: event={event}, handler={handler}")]
    AlreadyRegistered { event: String, handler: String },

    #[error("handler not found: event={event}")]
    HandlerNotFound { event: String },

    // --- 分发执行 ---
    #[error("dispatch timed out: event={event}, pending={pending}")]
    Timeout { event: String, pending: usize },

    #[error("dispatch cancelled: event={event}, pending={pending}")]
    Cancelled { event: String, pending: usize },

    #[error("{} handler(s) failed for event={event}: {}", .failures.len(), join_failures(.failures))]
    HandlerFailures {
        event: String,
        failures: Vec<HandlerFailure>,
    },
}

impl DispatchError {
    pub fn already_registered(event: impl Into<String>, handler: impl Into<String>) -> Self {
        Self::AlreadyRegistered {
            event: event.into(),
            handler: handler.into(),
        }
    }

    pub fn handler_not_found(event: impl Into<String>) -> Self {
        Self::HandlerNotFound {
            event: event.into(),
        }
    }
}

fn join_failures(failures: &[HandlerFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// 统一 Result 类型别名
pub type DispatchResult<T> = Result<T, DispatchError>;
