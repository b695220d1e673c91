// ABOUTME: Rolling-window detector for ESME_RTHROTTLED responses from the SMSC
// ABOUTME: Advises the dequeue/send loop to pause when the recent throttle ratio crosses the configured threshold

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Decides whether the send loop may dispatch the next PDU, based on the
/// recent ratio of ESME_RTHROTTLED responses observed from the SMSC.
pub trait ThrottleHandler: Send + Sync {
    /// Record one ESME_RTHROTTLED response.
    fn throttled(&self);

    /// Record one response that was not a throttle.
    fn not_throttled(&self);

    /// Called just before each send; `false` means hold off.
    fn allow_request(&self) -> bool;

    /// How long to pause after a denial.
    fn delay(&self) -> Duration;
}

struct Window {
    throttled: u64,
    not_throttled: u64,
    started_at: Instant,
}

/// Default throttle handler.
///
/// Counts responses in buckets of `sampling_period`. Once at least
/// `sample_size` responses have been seen, requests are denied while the
/// throttled percentage exceeds `deny_request_at` percent. Counters reset
/// when the sampling period rolls over.
pub struct RollingWindowThrottle {
    sampling_period: Duration,
    sample_size: u64,
    deny_request_at: f64,
    throttle_wait: Duration,
    window: Mutex<Window>,
}

impl RollingWindowThrottle {
    pub fn new(
        sampling_period: Duration,
        sample_size: u64,
        deny_request_at: f64,
        throttle_wait: Duration,
    ) -> RollingWindowThrottle {
        RollingWindowThrottle {
            sampling_period,
            sample_size,
            deny_request_at,
            throttle_wait,
            window: Mutex::new(Window {
                throttled: 0,
                not_throttled: 0,
                started_at: Instant::now(),
            }),
        }
    }

    /// Throttled percentage over the current window; 0.0 until the sample
    /// is large enough to mean anything.
    pub fn percent_throttled(&self) -> f64 {
        let window = self.window.lock().unwrap();
        Self::percent_of(&window, self.sample_size)
    }

    fn percent_of(window: &Window, sample_size: u64) -> f64 {
        let total = window.throttled + window.not_throttled;
        if total < sample_size {
            return 0.0;
        }
        (window.throttled as f64 / total as f64) * 100.0
    }
}

impl ThrottleHandler for RollingWindowThrottle {
    fn throttled(&self) {
        self.window.lock().unwrap().throttled += 1;
    }

    fn not_throttled(&self) {
        self.window.lock().unwrap().not_throttled += 1;
    }

    fn allow_request(&self) -> bool {
        let mut window = self.window.lock().unwrap();
        // the decision uses the counts gathered so far, even when the
        // window rolls over right after
        let percent = Self::percent_of(&window, self.sample_size);

        let now = Instant::now();
        if now.duration_since(window.started_at) > self.sampling_period {
            window.throttled = 0;
            window.not_throttled = 0;
            window.started_at = now;
        }

        percent <= self.deny_request_at
    }

    fn delay(&self) -> Duration {
        self.throttle_wait
    }
}
