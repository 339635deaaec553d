//! 内存版事件分发器（InMemoryEventDispatcher）
//!
//! - 注册表基于 `DashMap`，注册/移除/清空与查询在分片锁内完成；
//! - 分发时先复制处理器列表快照并释放锁，再为每个处理器 `tokio::spawn` 一个任务；
//! - 通过 `WaitGroup` 汇合，可选超时（`DispatcherConfig`）或取消令牌；
//! - 超时或取消后，未完成的处理器任务在后台继续运行，不会被中止；
//! - 不收集结果的分发路径把任务句柄交给后台观察任务，处理器 panic 以 `error!` 记录。
//!
use crate::dispatcher::EventDispatcher;
use crate::error::{DispatchError, DispatchResult, HandlerFailure};
use crate::event::Event;
use crate::handler::{EventHandler, same_handler};
use crate::wait_group::WaitGroup;
use async_trait::async_trait;
use bon::Builder;
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

type HandlerList = Vec<Arc<dyn EventHandler>>;

/// 分发器配置
#[derive(Clone, Copy, Debug, Default)]
pub struct DispatcherConfig {
    /// 单次分发等待全部处理器的上限；`None` 表示无限等待
    pub dispatch_timeout: Option<Duration>,
}

/// 基于内存的 EventDispatcher 实现
#[derive(Builder)]
pub struct InMemoryEventDispatcher {
    #[builder(skip)]
    handlers: DashMap<String, HandlerList>,
    #[builder(default)]
    config: DispatcherConfig,
}

impl Default for InMemoryEventDispatcher {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl InMemoryEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// 分发事件并聚合处理器错误
    ///
    /// 与 `dispatch_event` 不同，这里会等待每个处理器任务真正返回（而不仅是归还令牌），
    /// 任一处理器失败或 panic 时返回 `HandlerFailures`。
    pub async fn dispatch_collect(&self, event: Arc<dyn Event>) -> DispatchResult<()> {
        let Some(handlers) = self.snapshot(event.name()) else {
            return Ok(());
        };

        let (wg, tasks) = Self::launch(&event, handlers);
        let results = self
            .join_within(event.name(), &wg, None, async {
                wg.wait().await;
                let (names, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
                names
                    .into_iter()
                    .zip(futures_util::future::join_all(handles).await)
                    .collect::<Vec<_>>()
            })
            .await?;

        let failures: Vec<HandlerFailure> = results
            .into_iter()
            .filter_map(|(handler, res)| match res {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(HandlerFailure {
                    handler,
                    reason: format!("{err:#}"),
                }),
                Err(join_err) => Some(HandlerFailure {
                    handler,
                    reason: join_err.to_string(),
                }),
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::HandlerFailures {
                event: event.name().to_string(),
                failures,
            })
        }
    }

    /// 分发事件，可由外部取消等待
    ///
    /// 取消只结束本次等待并返回 `Cancelled`，已启动的处理器继续运行。
    pub async fn dispatch_with_cancel(
        &self,
        event: Arc<dyn Event>,
        cancel: CancellationToken,
    ) -> DispatchResult<()> {
        let Some(handlers) = self.snapshot(event.name()) else {
            return Ok(());
        };

        let (wg, tasks) = Self::launch(&event, handlers);
        Self::watch_panics(event.name(), tasks);
        self.join_within(event.name(), &wg, Some(&cancel), wg.wait())
            .await
    }

    /// 事件名下的处理器快照（按注册顺序）
    pub fn handlers(&self, event_name: &str) -> Vec<Arc<dyn EventHandler>> {
        self.snapshot(event_name).unwrap_or_default()
    }

    pub fn handler_count(&self, event_name: &str) -> usize {
        self.handlers
            .get(event_name)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    /// 已注册的事件名（排序后的只读视图）
    pub fn registered_events(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn snapshot(&self, event_name: &str) -> Option<HandlerList> {
        self.handlers.get(event_name).map(|list| list.value().clone())
    }

    fn launch(
        event: &Arc<dyn Event>,
        handlers: HandlerList,
    ) -> (WaitGroup, Vec<(String, JoinHandle<anyhow::Result<()>>)>) {
        let wg = WaitGroup::new();

        let tasks = handlers
            .into_iter()
            .map(|h| {
                let name = h.handler_name().to_string();
                let event = event.clone();
                // 令牌在 spawn 之前发放，保证 wait 时计数已包含该处理器
                let token = wg.token();
                let task_name = name.clone();

                let handle = tokio::spawn(async move {
                    let res = h.handle(event.clone(), token).await;
                    if let Err(err) = &res {
                        tracing::warn!(
                            event = event.name(),
                            handler = %task_name,
                            error = %format!("{err:#}"),
                            "event handler failed"
                        );
                    }
                    res
                });

                (name, handle)
            })
            .collect();

        (wg, tasks)
    }

    fn watch_panics(event_name: &str, tasks: Vec<(String, JoinHandle<anyhow::Result<()>>)>) {
        let event_name = event_name.to_string();
        tokio::spawn(async move {
            for (handler, handle) in tasks {
                match handle.await {
                    Err(join_err) if join_err.is_panic() => tracing::error!(
                        event = %event_name,
                        handler = %handler,
                        error = %join_err,
                        "event handler panicked"
                    ),
                    _ => {}
                }
            }
        });
    }

    async fn join_within<F, T>(
        &self,
        event_name: &str,
        wg: &WaitGroup,
        cancel: Option<&CancellationToken>,
        fut: F,
    ) -> DispatchResult<T>
    where
        F: Future<Output = T>,
    {
        let started = Instant::now();
        let timeout = self.config.dispatch_timeout;

        let deadline = async {
            match timeout {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending::<()>().await,
            }
        };
        let cancelled = async {
            match cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            out = fut => {
                tracing::debug!(
                    event = event_name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "dispatch joined"
                );
                Ok(out)
            }
            _ = cancelled => {
                let pending = wg.pending();
                tracing::warn!(event = event_name, pending, "dispatch cancelled");
                Err(DispatchError::Cancelled { event: event_name.to_string(), pending })
            }
            _ = deadline => {
                let pending = wg.pending();
                tracing::warn!(
                    event = event_name,
                    pending,
                    timeout_ms = timeout.map(|d| d.as_millis() as u64),
                    "dispatch timed out"
                );
                Err(DispatchError::Timeout { event: event_name.to_string(), pending })
            }
        }
    }
}

#[async_trait]
impl EventDispatcher for InMemoryEventDispatcher {
    fn register_handler(
        &self,
        event_name: &str,
        handler: Arc<dyn EventHandler>,
    ) -> DispatchResult<()> {
        let mut list = self.handlers.entry(event_name.to_string()).or_default();

        if list.iter().any(|h| same_handler(h, &handler)) {
            return Err(DispatchError::already_registered(
                event_name,
                handler.handler_name(),
            ));
        }

        tracing::debug!(
            event = event_name,
            handler = handler.handler_name(),
            position = list.len(),
            "handler registered"
        );
        list.push(handler);

        Ok(())
    }

    async fn dispatch_event(&self, event: Arc<dyn Event>) -> DispatchResult<()> {
        let Some(handlers) = self.snapshot(event.name()) else {
            tracing::debug!(event = event.name(), "no handlers registered, skipping");
            return Ok(());
        };

        tracing::debug!(
            event = event.name(),
            handlers = handlers.len(),
            "dispatching event"
        );

        let (wg, tasks) = Self::launch(&event, handlers);
        Self::watch_panics(event.name(), tasks);
        self.join_within(event.name(), &wg, None, wg.wait()).await
    }

    fn remove_handler(
        &self,
        event: &dyn Event,
        handler: &Arc<dyn EventHandler>,
    ) -> DispatchResult<()> {
        let Some(mut list) = self.handlers.get_mut(event.name()) else {
            return Err(DispatchError::handler_not_found(event.name()));
        };

        let before = list.len();
        list.retain(|h| !same_handler(h, handler));

        tracing::debug!(
            event = event.name(),
            handler = handler.handler_name(),
            removed = before - list.len(),
            "handler removed"
        );

        Ok(())
    }

    fn has_handler(&self, event_name: &str, handler: &Arc<dyn EventHandler>) -> bool {
        self.handlers
            .get(event_name)
            .is_some_and(|list| list.iter().any(|h| same_handler(h, handler)))
    }

    fn clear_handlers(&self) {
        self.handlers.clear();
        tracing::debug!("handler registry cleared");
    }
}
