//! Bootstrap polling of `GET /about.json`.
//!
//! The service catalog is needed before anything else renders, and the
//! server may still be starting when the client launches. The about query is
//! the only request retried automatically, under a bounded [`RetryPolicy`]
//! that a `watch` channel can cancel.

use std::time::Duration;

use tokio::sync::watch;

use area_core::prelude::*;
use area_core::About;

use crate::api::AreaApi;

/// Bounded retry schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay between two attempts.
    pub interval: Duration,
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            max_attempts: 30,
        }
    }
}

/// Fetch the catalog, retrying per `policy` until it succeeds, the attempts
/// run out, or `cancel` turns `true`.
pub async fn fetch_about_with_retry<A: AreaApi>(
    api: &A,
    policy: RetryPolicy,
    mut cancel: watch::Receiver<bool>,
) -> Result<About> {
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        if *cancel.borrow() {
            return Err(Error::BootstrapCancelled);
        }

        match api.about().await {
            Ok(about) => {
                info!(
                    "Catalog loaded: {} services, {} authenticators (attempt {})",
                    about.server.services.len(),
                    about.server.authenticators.len(),
                    attempt
                );
                return Ok(about);
            }
            Err(e) => warn!("About query failed (attempt {}/{}): {}", attempt, max_attempts, e),
        }

        if attempt == max_attempts {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(policy.interval) => {}
            changed = cancel.changed() => {
                // A dropped sender cannot cancel any more; keep polling
                if changed.is_ok() && *cancel.borrow() {
                    return Err(Error::BootstrapCancelled);
                }
                if changed.is_err() {
                    tokio::time::sleep(policy.interval).await;
                }
            }
        }
    }

    error!("Giving up on the catalog after {} attempts", max_attempts);
    Err(Error::BootstrapExhausted {
        attempts: max_attempts,
    })
}
