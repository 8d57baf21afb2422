//! Screen controller: owns the [`FetchState`] and drives a single fetch at mount.
//!
//! The controller holds the state through a [`watch`] channel so a renderer can
//! observe every transition. The spawned fetch only keeps a weak reference to the
//! state holder; if the screen is unmounted first, the result is dropped.

use std::sync::{Arc, Weak};

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info};

use crate::{
    FetchState, WeatherQuery,
    client::{FetchError, HumidityClient},
};

#[derive(Debug)]
pub struct ScreenController {
    state: Arc<watch::Sender<FetchState>>,
    task: JoinHandle<()>,
}

impl ScreenController {
    /// Mount the screen: enter `Loading` and start the one and only fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(client: Arc<dyn HumidityClient>, query: WeatherQuery) -> Self {
        let (tx, _rx) = watch::channel(FetchState::Loading);
        let state = Arc::new(tx);
        let holder = Arc::downgrade(&state);

        let task = tokio::spawn(async move {
            let outcome = client.fetch_humidity(&query).await;
            complete(&holder, outcome);
        });

        Self { state, task }
    }

    /// Current state snapshot.
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change, for the rendering layer.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Wait until the fetch has settled and return the terminal state.
    pub async fn settled(&self) -> FetchState {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        match rx.wait_for(FetchState::is_settled).await {
            Ok(state) => FetchState::clone(&state),
            Err(_) => self.state(),
        }
    }

    /// Tear down the screen.
    ///
    /// The in-flight fetch is not aborted; its result will be discarded. The returned
    /// handle resolves once that fetch has finished.
    pub fn unmount(self) -> JoinHandle<()> {
        let Self { state, task } = self;
        drop(state);
        task
    }
}

fn complete(holder: &Weak<watch::Sender<FetchState>>, outcome: Result<i64, FetchError>) {
    let Some(state) = holder.upgrade() else {
        debug!("Screen unmounted before fetch settled, discarding result");
        return;
    };

    state.send_if_modified(|current| current.settle(outcome));

    match &*state.borrow() {
        FetchState::Success { humidity } => info!(humidity, "Humidity screen settled"),
        FetchState::Failure { message } => info!(%message, "Humidity screen failed"),
        FetchState::Loading => {}
    }
}
