//! Session expiry warning timer.
//!
//! The backend issues session tokens with a fixed lifetime. To keep the user
//! from losing unsaved work to a silent expiry, the watchdog decodes the
//! token's `exp` claim on login and schedules a one-shot "expiring soon"
//! notice [`WARNING_WINDOW_MS`] before the deadline.
//!
//! The watchdog owns at most one pending timer. Re-arming (on token renewal)
//! cancels the previous timer before installing a new one, and [`disarm`]
//! must be called on logout. Notices are delivered through an injected
//! channel; the auth/UI layer decides how to surface them.
//!
//! [`disarm`]: SessionExpiryWatchdog::disarm
//!
//! # Example
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use magiccode_client::watchdog::SessionExpiryWatchdog;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, mut rx) = mpsc::channel(4);
//!     let mut watchdog = SessionExpiryWatchdog::new(tx);
//!     watchdog.arm_now("header.payload.signature");
//!
//!     if rx.recv().await.is_some() {
//!         println!("session expiring soon, save your work");
//!     }
//! }
//! ```

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::token;

/// Lead time before expiry at which the warning fires (5 minutes).
pub const WARNING_WINDOW_MS: i64 = 5 * 60 * 1000;

/// A notice emitted by the watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionNotice {
    /// The session token expires within the warning window.
    ExpiringSoon,
}

/// Configuration for the watchdog.
#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    /// How far ahead of expiry the warning fires.
    pub warning_window: Duration,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            warning_window: Duration::from_millis(WARNING_WINDOW_MS as u64),
        }
    }
}

/// One-shot session expiry warning timer.
///
/// Holds zero or one armed timer. All mutations go through [`arm`] and
/// [`disarm`], which always cancel the existing timer first, so at most one
/// timer is outstanding at any instant. Cancellation is deterministic: a
/// timer cancelled before its deadline never delivers its notice.
///
/// [`arm`]: SessionExpiryWatchdog::arm
/// [`disarm`]: SessionExpiryWatchdog::disarm
#[derive(Debug)]
pub struct SessionExpiryWatchdog {
    notify_tx: mpsc::Sender<SessionNotice>,
    config: WatchdogConfig,
    timer: Option<JoinHandle<()>>,
}

impl SessionExpiryWatchdog {
    /// Creates a watchdog with the default 5-minute warning window.
    ///
    /// Notices are sent on `notify_tx`; the receiving side belongs to the
    /// auth/UI layer. The channel must keep at least one slot free: an
    /// immediate in-window notice is delivered with a non-blocking send and
    /// is dropped (with a warning) if the sink is full. At most one notice
    /// per arm cycle is ever queued, so capacity 1 with a drained receiver
    /// suffices.
    #[must_use]
    pub fn new(notify_tx: mpsc::Sender<SessionNotice>) -> Self {
        Self::with_config(notify_tx, WatchdogConfig::default())
    }

    /// Creates a watchdog with an explicit configuration.
    #[must_use]
    pub fn with_config(notify_tx: mpsc::Sender<SessionNotice>, config: WatchdogConfig) -> Self {
        Self {
            notify_tx,
            config,
            timer: None,
        }
    }

    /// Arms the expiry warning for `token`, relative to `now_ms` (Unix epoch
    /// milliseconds).
    ///
    /// Any previously armed timer is cancelled first. An empty or
    /// undecodable token, or claims without an expiry, arm nothing; these
    /// are silent, recoverable outcomes. Otherwise:
    ///
    /// - more than a warning window before expiry: a one-shot timer is
    ///   scheduled to deliver [`SessionNotice::ExpiringSoon`] when the
    ///   window opens;
    /// - already inside the window but not expired: the notice is delivered
    ///   immediately and synchronously, and no timer is armed;
    /// - already expired: nothing happens.
    pub fn arm(&mut self, token: &str, now_ms: i64) {
        self.disarm();

        if token.is_empty() {
            return;
        }

        let Some(claims) = token::decode(token) else {
            debug!("token payload undecodable, expiry warning not armed");
            return;
        };
        let Some(exp) = claims.exp else {
            debug!("token carries no expiry claim, warning not armed");
            return;
        };

        // Saturate: an absurdly distant expiry becomes a far-future timer
        // instead of an arithmetic fault.
        let expires_at_ms = exp.saturating_mul(1000);
        let window_ms = self.config.warning_window.as_millis() as i64;
        let warning_in_ms = expires_at_ms
            .saturating_sub(now_ms)
            .saturating_sub(window_ms);

        if warning_in_ms > 0 {
            debug!(warning_in_ms, "arming session expiry warning");
            let tx = self.notify_tx.clone();
            self.timer = Some(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(warning_in_ms as u64)).await;
                if tx.send(SessionNotice::ExpiringSoon).await.is_err() {
                    warn!("expiry notice dropped, receiver closed");
                }
            }));
        } else if expires_at_ms > now_ms {
            // Already inside the window: warn right away, exactly once.
            debug!("token already inside warning window, notifying immediately");
            if let Err(e) = self.notify_tx.try_send(SessionNotice::ExpiringSoon) {
                warn!(error = %e, "immediate expiry notice dropped");
            }
        } else {
            debug!("token already expired, warning not armed");
        }
    }

    /// Arms the expiry warning relative to the current wall clock.
    pub fn arm_now(&mut self, token: &str) {
        self.arm(token, Utc::now().timestamp_millis());
    }

    /// Cancels any pending timer. Safe to call when none is armed.
    ///
    /// Must be invoked on logout; [`arm`](Self::arm) calls it internally on
    /// session replacement.
    pub fn disarm(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            debug!("session expiry warning disarmed");
        }
    }

    /// Returns `true` while a warning timer is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for SessionExpiryWatchdog {
    fn drop(&mut self) {
        self.disarm();
    }
}
