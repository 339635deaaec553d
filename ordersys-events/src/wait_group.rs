//! 计数式汇合原语（WaitGroup / JoinToken）
//!
//! 分发时每个处理器持有一个 `JoinToken`，处理结束时调用 `done()` 或直接丢弃，
//! 分发方通过 `WaitGroup::wait()` 等待全部令牌归还。
//!
//! 令牌在 `Drop` 时同样会归还，因此处理器的任何返回路径（包括 `?` 提前返回与 panic 展开）
//! 都会完成计数。
//!
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    pending: AtomicUsize,
    notify: Notify,
}

/// 等待组：发放令牌并等待全部令牌归还
#[derive(Clone, Debug, Default)]
pub struct WaitGroup {
    inner: Arc<Inner>,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发放一个令牌，计数加一
    pub fn token(&self) -> JoinToken {
        self.inner.pending.fetch_add(1, Ordering::AcqRel);
        JoinToken {
            inner: Some(self.inner.clone()),
        }
    }

    /// 尚未归还的令牌数
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::Acquire)
    }

    /// 等待所有已发放的令牌归还；计数为 0 时立即返回
    pub async fn wait(&self) {
        loop {
            // 先登记再检查计数，避免错过最后一次唤醒
            let notified = self.inner.notify.notified();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// 汇合令牌：每个令牌恰好归还一次
#[must_use = "dropping a JoinToken signals completion immediately"]
#[derive(Debug)]
pub struct JoinToken {
    inner: Option<Arc<Inner>>,
}

impl JoinToken {
    /// 显式标记完成
    pub fn done(mut self) {
        self.signal();
    }

    fn signal(&mut self) {
        if let Some(inner) = self.inner.take() {
            if inner.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
                inner.notify.notify_waiters();
            }
        }
    }
}

impl Drop for JoinToken {
    fn drop(&mut self) {
        self.signal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn wait_returns_immediately_without_tokens() {
        let wg = WaitGroup::new();
        tokio::time::timeout(Duration::from_millis(100), wg.wait())
            .await
            .expect("empty group must not block");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn wait_blocks_until_every_token_is_returned() {
        let wg = WaitGroup::new();
        let mut tokens: Vec<JoinToken> = (0..8).map(|_| wg.token()).collect();
        assert_eq!(wg.pending(), 8);

        let last = tokens.pop().unwrap();
        for t in tokens {
            tokio::spawn(async move { t.done() });
        }

        // 仍有一个令牌未归还
        let blocked = tokio::time::timeout(Duration::from_millis(50), wg.wait()).await;
        assert!(blocked.is_err());
        assert_eq!(wg.pending(), 1);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            drop(last);
        });
        tokio::time::timeout(Duration::from_secs(2), wg.wait())
            .await
            .expect("all tokens returned");
        assert_eq!(wg.pending(), 0);
    }

    #[tokio::test]
    async fn token_signals_on_panic_unwind() {
        let wg = WaitGroup::new();
        let token = wg.token();
        let handle = tokio::spawn(async move {
            let _token = token;
            panic!("handler blew up");
        });
        assert!(handle.await.is_err());
        assert_eq!(wg.pending(), 0);
        wg.wait().await;
    }

    #[tokio::test]
    async fn group_is_reusable_after_reaching_zero() {
        let wg = WaitGroup::new();
        wg.token().done();
        wg.wait().await;

        let t = wg.token();
        assert_eq!(wg.pending(), 1);
        t.done();
        wg.wait().await;
        assert_eq!(wg.pending(), 0);
    }
}
