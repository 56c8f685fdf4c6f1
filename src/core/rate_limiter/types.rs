//! Rate limiter types

/// Outcome of one admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request is admitted
    pub allowed: bool,
    /// Maximum requests per window
    pub limit: u64,
    /// Requests left in the current window after this one
    pub remaining: u64,
    /// Seconds until a slot frees up (rejections) or the window length (admissions)
    pub reset_secs: u64,
    /// Admitted because the store could not be consulted
    pub fail_open: bool,
}

impl RateLimitDecision {
    pub fn allowed(limit: u64, remaining: u64, reset_secs: u64) -> Self {
        Self {
            allowed: true,
            limit,
            remaining,
            reset_secs,
            fail_open: false,
        }
    }

    pub fn rejected(limit: u64, reset_secs: u64) -> Self {
        Self {
            allowed: false,
            limit,
            remaining: 0,
            reset_secs,
            fail_open: false,
        }
    }

    /// Admission granted without consulting the store
    pub fn fail_open(limit: u64, window_secs: u64) -> Self {
        Self {
            allowed: true,
            limit,
            remaining: limit,
            reset_secs: window_secs,
            fail_open: true,
        }
    }

    /// Whether limit headers should accompany the response
    pub fn has_headers(&self) -> bool {
        !self.fail_open
    }
}
