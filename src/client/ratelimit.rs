// ABOUTME: Token-bucket admission control for outbound sends
// ABOUTME: Refill state lives behind a mutex; the async wait lives with the caller so a cancel never burns a token

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Admission control for the dequeue/send loop.
///
/// `try_acquire` either takes one token or reports how long to wait before
/// asking again. The sleep happens at the call site, which is what makes
/// cancellation free: an aborted wait never consumed a token.
pub trait RateLimiter: Send + Sync {
    fn try_acquire(&self) -> Result<(), Duration>;
}

/// Suspend until the limiter hands over a token.
pub async fn acquire(limiter: &dyn RateLimiter) {
    loop {
        match limiter.try_acquire() {
            Ok(()) => return,
            Err(wait) => tokio::time::sleep(wait).await,
        }
    }
}

struct BucketState {
    tokens: f64,
    updated_at: Instant,
}

/// Token bucket: tokens accrue at `send_rate` per second up to `max_tokens`
/// (the burst ceiling) and each admitted send costs one.
pub struct TokenBucket {
    send_rate: f64,
    max_tokens: f64,
    delay_for_tokens: Duration,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// The bucket starts full, so a burst of up to `max_tokens` sends goes
    /// straight through after connect.
    pub fn new(send_rate: f64, max_tokens: f64, delay_for_tokens: Duration) -> TokenBucket {
        TokenBucket {
            send_rate,
            max_tokens,
            delay_for_tokens,
            state: Mutex::new(BucketState {
                tokens: max_tokens,
                updated_at: Instant::now(),
            }),
        }
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let accrued = now.duration_since(state.updated_at).as_secs_f64() * self.send_rate;
        if accrued > 0.0 {
            state.tokens = (state.tokens + accrued).min(self.max_tokens);
            state.updated_at = now;
        }
    }
}

impl RateLimiter for TokenBucket {
    fn try_acquire(&self) -> Result<(), Duration> {
        let mut state = self.state.lock().unwrap();
        self.refill(&mut state);
        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            Ok(())
        } else {
            Err(self.delay_for_tokens)
        }
    }
}
