//! Wall-clock deadlines and session time budgets.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Anything the kernel can poll to decide whether to stop.
pub trait Expirable {
    fn reached(&self) -> bool;
}

/// Absolute cutoff in milliseconds since the Unix epoch. Zero means no deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline(u64);

impl Deadline {
    pub const NONE: Self = Self(0);

    pub const fn at_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Deadline at an absolute system time, rounded up to the next whole
    /// millisecond so it never passes before `time` does. Times at or before
    /// the epoch map to the earliest representable deadline, which has
    /// always passed.
    pub fn at(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(since) => {
                let partial = u128::from(since.subsec_nanos() % 1_000_000 != 0);
                let millis = since.as_millis() + partial;
                Self(u64::try_from(millis).unwrap_or(u64::MAX).max(1))
            }
            Err(_) => Self(1),
        }
    }

    /// Deadline `duration` from now.
    pub fn after(duration: Duration) -> Self {
        match SystemTime::now().checked_add(duration) {
            Some(time) => Self::at(time),
            None => Self(u64::MAX),
        }
    }

    pub const fn is_set(&self) -> bool {
        self.0 != 0
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since| u64::try_from(since.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

impl Expirable for Deadline {
    fn reached(&self) -> bool {
        self.is_set() && now_millis() >= self.0
    }
}

/// A benchmark time budget, measured on the monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct Timeout {
    pub start: Instant,
    pub duration: Duration,
}

impl Timeout {
    pub fn new(duration: Duration) -> Self {
        Self {
            start: Instant::now(),
            duration,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.start.elapsed())
    }

    /// The end of the budget as an absolute wall-clock deadline for the kernel.
    ///
    /// Never earlier than the budget's own end; once the budget is spent the
    /// deadline has passed as well.
    pub fn deadline(&self) -> Deadline {
        let remaining = self.remaining();
        if remaining.is_zero() {
            return Deadline::at_millis(1);
        }
        Deadline::after(remaining)
    }
}

impl Expirable for Timeout {
    fn reached(&self) -> bool {
        self.start.elapsed() >= self.duration
    }
}
