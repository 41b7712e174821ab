//! Background polling that keeps a session in step with other clients.

use std::time::Duration;

use async_trait::async_trait;
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

use crate::{
    api::{BoardApi, ClientError},
    dashboard::DashboardSession,
    session::BoardSession,
};

/// Something that can silently re-fetch its server state.
#[async_trait]
pub trait Refresh: Send + Sync + 'static {
    async fn refresh(&self) -> Result<(), ClientError>;
}

#[async_trait]
impl<A: BoardApi + 'static> Refresh for BoardSession<A> {
    async fn refresh(&self) -> Result<(), ClientError> {
        BoardSession::refresh(self).await.map(|_| ())
    }
}

#[async_trait]
impl<A: BoardApi + 'static> Refresh for DashboardSession<A> {
    async fn refresh(&self) -> Result<(), ClientError> {
        DashboardSession::refresh(self).await
    }
}

/// Stops the poll loop when dropped.
#[derive(Debug)]
pub struct PollerHandle {
    handle: JoinHandle<()>,
}

impl PollerHandle {
    pub fn stop(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Refreshes `target` every `period`, starting one period from now.
///
/// A failed refresh is logged and the next tick tries again; there is no
/// backoff.
pub fn spawn_poller<R: Refresh>(target: R, period: Duration) -> PollerHandle {
    let handle = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; callers have just loaded.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(err) = target.refresh().await {
                tracing::warn!("Background refresh failed: {err}");
            }
        }
    });
    PollerHandle { handle }
}
