//! Navigation executors
//!
//! A committed gesture hands its direction to a `NavigationExecutor`.
//! `DirectExecutor` steps history in-process. `RelayExecutor` asks the
//! privileged relay first and falls back to the direct path when the relay
//! provably did not act, so each committed gesture navigates at most once.

use std::mem;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::ipc::{RelayClient, RelayFailure};
use crate::types::NavDirection;

/// Receives committed navigation intents from the recognizer
pub trait NavigationExecutor {
    /// Start navigating; must return without waiting on slow I/O
    fn request_navigation(&mut self, direction: NavDirection);
}

/// Performs history navigation in the current context
pub trait DirectNavigator: Send + Sync {
    fn navigate(&self, direction: NavDirection) -> Result<()>;
}

/// Which path carried out a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationRoute {
    Relay,
    Direct,
    /// The relay received the request but never answered
    Unconfirmed,
    Failed,
}

/// Result of one navigation attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationReport {
    pub direction: NavDirection,
    pub route: NavigationRoute,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NavigationReport {
    fn new(direction: NavDirection, route: NavigationRoute) -> Self {
        Self {
            direction,
            route,
            error: None,
        }
    }

    fn failed(direction: NavDirection, error: String) -> Self {
        Self {
            direction,
            route: NavigationRoute::Failed,
            error: Some(error),
        }
    }
}

// =============================================================================
// Direct Executor
// =============================================================================

/// Navigates synchronously through a `DirectNavigator`
pub struct DirectExecutor<D> {
    navigator: D,
    reports: Vec<NavigationReport>,
}

impl<D: DirectNavigator> DirectExecutor<D> {
    pub fn new(navigator: D) -> Self {
        Self {
            navigator,
            reports: Vec::new(),
        }
    }

    /// Reports since the last call
    pub fn take_reports(&mut self) -> Vec<NavigationReport> {
        mem::take(&mut self.reports)
    }
}

impl<D: DirectNavigator> NavigationExecutor for DirectExecutor<D> {
    fn request_navigation(&mut self, direction: NavDirection) {
        self.reports.push(navigate_directly(&self.navigator, direction));
    }
}

fn navigate_directly<D: DirectNavigator + ?Sized>(
    navigator: &D,
    direction: NavDirection,
) -> NavigationReport {
    match navigator.navigate(direction) {
        Ok(()) => NavigationReport::new(direction, NavigationRoute::Direct),
        Err(err) => {
            warn!(%direction, error = %err, "direct navigation failed");
            NavigationReport::failed(direction, err.to_string())
        }
    }
}

// =============================================================================
// Relay Executor
// =============================================================================

/// Relays navigation to a privileged context with an in-process fallback
///
/// Each request runs on its own worker thread so the touch handler never
/// waits on the socket.
pub struct RelayExecutor {
    client: Option<RelayClient>,
    fallback: Arc<dyn DirectNavigator>,
    in_flight: Vec<JoinHandle<NavigationReport>>,
    completed: Vec<NavigationReport>,
}

impl RelayExecutor {
    /// `client` of `None` means no relay is available; navigation goes
    /// straight to `fallback`
    pub fn new(client: Option<RelayClient>, fallback: Arc<dyn DirectNavigator>) -> Self {
        Self {
            client,
            fallback,
            in_flight: Vec::new(),
            completed: Vec::new(),
        }
    }

    /// Wait for all dispatched navigations and return the reports
    /// collected since the last call
    pub fn wait_idle(&mut self) -> Vec<NavigationReport> {
        for handle in mem::take(&mut self.in_flight) {
            self.collect(handle);
        }
        mem::take(&mut self.completed)
    }

    /// Join workers that have already finished
    fn reap_finished(&mut self) {
        let (finished, running) = mem::take(&mut self.in_flight)
            .into_iter()
            .partition::<Vec<_>, _>(|handle| handle.is_finished());
        self.in_flight = running;
        for handle in finished {
            self.collect(handle);
        }
    }

    fn collect(&mut self, handle: JoinHandle<NavigationReport>) {
        match handle.join() {
            Ok(report) => self.completed.push(report),
            Err(_) => warn!("navigation worker panicked"),
        }
    }
}

impl NavigationExecutor for RelayExecutor {
    fn request_navigation(&mut self, direction: NavDirection) {
        let Some(client) = self.client.clone() else {
            self.completed
                .push(navigate_directly(self.fallback.as_ref(), direction));
            return;
        };

        self.reap_finished();
        let fallback = Arc::clone(&self.fallback);
        let worker =
            thread::spawn(move || relay_or_fallback(&client, fallback.as_ref(), direction));
        self.in_flight.push(worker);
    }
}

fn relay_or_fallback(
    client: &RelayClient,
    fallback: &dyn DirectNavigator,
    direction: NavDirection,
) -> NavigationReport {
    match client.send_navigation(direction) {
        Ok(response) if response.success => {
            debug!(%direction, "relay navigated");
            NavigationReport::new(direction, NavigationRoute::Relay)
        }
        Ok(response) => {
            warn!(
                %direction,
                error = response.error.as_deref().unwrap_or("unspecified"),
                "relay declined navigation, navigating directly"
            );
            navigate_directly(fallback, direction)
        }
        Err(RelayFailure::Undelivered(err)) => {
            warn!(%direction, error = %err, "relay unreachable, navigating directly");
            navigate_directly(fallback, direction)
        }
        Err(RelayFailure::Unconfirmed(err)) => {
            // The relay may already have navigated; a second attempt could double-step
            warn!(%direction, error = %err, "relay did not confirm navigation");
            NavigationReport {
                direction,
                route: NavigationRoute::Unconfirmed,
                error: Some(err.to_string()),
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
