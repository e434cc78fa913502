//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientEvent, ClientHandle, Settings, VotingClient};
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client: Arc<dyn ClientHandle> = VotingClient::new(settings);
            forward_client_events(client.as_ref(), ui_tx.clone());
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            // Commands run concurrently so a slow confirmation never blocks a
            // refresh; every outcome reaches the UI as a client event.
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend: command received");
                let client = client.clone();
                tokio::spawn(async move {
                    let result = match cmd {
                        BackendCommand::Connect => client.connect().await.map(|_| ()),
                        BackendCommand::FetchSessions { generation } => {
                            client.fetch_sessions(generation).await.map(|_| ())
                        }
                        BackendCommand::Submit(action) => client.perform(action).await.map(|_| ()),
                    };
                    if let Err(err) = result {
                        tracing::debug!("backend: command finished with error: {err}");
                    }
                });
            }
            tracing::info!("backend: command queue closed");
        });
    });
}

fn forward_client_events(client: &dyn ClientHandle, ui_tx: Sender<UiEvent>) {
    tokio::spawn(relay_client_events(client.subscribe_events(), ui_tx));
}

/// Forwards client events to the UI. Whenever an event is lost, either
/// skipped by the broadcast channel or refused by a full UI queue, a
/// `UiEvent::Resync` is owed and delivered ahead of the next event.
async fn relay_client_events(mut events: broadcast::Receiver<ClientEvent>, ui_tx: Sender<UiEvent>) {
    let mut resync_owed = false;
    loop {
        match events.recv().await {
            Ok(event) => {
                if resync_owed {
                    resync_owed = ui_tx.try_send(UiEvent::Resync).is_err();
                }
                if ui_tx.try_send(UiEvent::Client(event)).is_err() {
                    tracing::warn!("backend: ui event queue unavailable; dropping event");
                    resync_owed = true;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "backend: client events lagged");
                resync_owed = ui_tx.try_send(UiEvent::Resync).is_err();
            }
            Err(RecvError::Closed) => break,
        }
    }
}
