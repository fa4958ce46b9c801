use crate::utils::error::{CrptError, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, Semaphore, TryAcquireError};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// tokio 計時器以毫秒為單位，更短的窗口無法保證
pub const MIN_WINDOW: Duration = Duration::from_millis(1);
pub const MAX_REQUEST_LIMIT: usize = Semaphore::MAX_PERMITS;

/// 固定窗口限流器
///
/// 每個窗口開始時丟棄剩餘許可並重新發放 `request_limit` 個，
/// 未用完的許可不會累積到下一個窗口。超過上限的呼叫會等待下一個窗口，
/// 不會被拒絕。
#[derive(Debug)]
pub struct RateLimiter {
    inner: Arc<LimiterState>,
    shutdown_tx: broadcast::Sender<()>,
    refill_task: JoinHandle<()>,
}

#[derive(Debug)]
struct LimiterState {
    semaphore: Semaphore,
    request_limit: usize,
    window: Duration,
    next_window_start: Mutex<Instant>,
}

impl LimiterState {
    fn refill(&self) {
        // 同一把鎖保護許可重置與窗口時間
        let mut next_window_start = match self.next_window_start.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let unused = self.semaphore.forget_permits(self.request_limit);
        self.semaphore.add_permits(self.request_limit);
        *next_window_start = Instant::now() + self.window;

        tracing::trace!(
            "⏱️ Rate limit window reset: {} permits released, {} unused discarded",
            self.request_limit,
            unused
        );
    }
}

impl RateLimiter {
    /// 建立限流器並啟動背景補充任務，必須在 tokio runtime 內呼叫
    pub fn new(window: Duration, request_limit: usize) -> Result<Self> {
        if request_limit == 0 {
            return Err(CrptError::InvalidRequestLimit);
        }
        if request_limit > MAX_REQUEST_LIMIT {
            return Err(CrptError::RequestLimitTooLarge {
                limit: request_limit,
                max: MAX_REQUEST_LIMIT,
            });
        }
        if window < MIN_WINDOW {
            return Err(CrptError::InvalidTimeWindow);
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| CrptError::RuntimeUnavailable)?;

        let inner = Arc::new(LimiterState {
            semaphore: Semaphore::new(0),
            request_limit,
            window,
            next_window_start: Mutex::new(Instant::now() + window),
        });
        // 第一個窗口立即開放
        inner.refill();

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let refill_task = runtime.spawn(run_refills(Arc::clone(&inner), shutdown_rx));

        tracing::debug!(
            "🚦 Rate limiter started: {} requests per {:?}",
            request_limit,
            window
        );

        Ok(Self {
            inner,
            shutdown_tx,
            refill_task,
        })
    }

    /// 取得一個許可，必要時等待下一個窗口
    pub async fn acquire(&self) -> Result<()> {
        let permit = self
            .inner
            .semaphore
            .acquire()
            .await
            .map_err(|_| CrptError::RateLimiterClosed)?;
        permit.forget();
        Ok(())
    }

    /// 不等待；目前窗口已用完時回傳 `Ok(false)`
    pub fn try_acquire(&self) -> Result<bool> {
        match self.inner.semaphore.try_acquire() {
            Ok(permit) => {
                permit.forget();
                Ok(true)
            }
            Err(TryAcquireError::NoPermits) => Ok(false),
            Err(TryAcquireError::Closed) => Err(CrptError::RateLimiterClosed),
        }
    }

    pub fn available_permits(&self) -> usize {
        self.inner.semaphore.available_permits()
    }

    pub fn request_limit(&self) -> usize {
        self.inner.request_limit
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    pub fn time_until_next_window(&self) -> Duration {
        let next_window_start = match self.inner.next_window_start.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        };
        next_window_start.saturating_duration_since(Instant::now())
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.semaphore.is_closed()
    }

    /// 停止補充任務；等待中的呼叫會收到 `RateLimiterClosed`
    pub fn shutdown(&self) {
        if self.inner.semaphore.is_closed() {
            return;
        }
        self.inner.semaphore.close();
        let _ = self.shutdown_tx.send(());
        tracing::info!("🛑 Rate limiter shut down");
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.inner.semaphore.close();
        self.refill_task.abort();
    }
}

async fn run_refills(state: Arc<LimiterState>, mut shutdown: broadcast::Receiver<()>) {
    let mut ticker = interval_at(Instant::now() + state.window, state.window);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::debug!("Rate limiter refill task received shutdown signal");
                break;
            }
            _ = ticker.tick() => state.refill(),
        }
    }
}
