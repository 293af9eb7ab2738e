//! Bounded retry policy.

use std::future::Future;

/// How many times an operation is attempted before giving up.
///
/// Attempts run back to back with no delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
}

/// Every attempt failed; holds each attempt's error in order.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub errors: Vec<E>,
}

impl RetryPolicy {
    /// A policy making `attempts` attempts in total (at least one).
    pub const fn new(attempts: u32) -> Self {
        Self {
            attempts: if attempts == 0 { 1 } else { attempts },
        }
    }

    /// One attempt plus one retry.
    pub const fn single_retry() -> Self {
        Self::new(2)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Run `operation` until it succeeds or the attempts run out.
    ///
    /// The closure receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut errors = Vec::new();
        for attempt in 1..=self.attempts {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => errors.push(e),
            }
        }
        Err(RetryExhausted { errors })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single_retry()
    }
}
