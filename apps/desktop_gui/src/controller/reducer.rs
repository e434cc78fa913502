//! Translation of backend events into application state events.

use client_core::{AppEvent, ClientEvent};

pub fn app_event_for(event: ClientEvent) -> AppEvent {
    match event {
        ClientEvent::Connected { account } => AppEvent::Connected { account },
        ClientEvent::ConnectFailed { error } => AppEvent::ConnectFailed { error },
        ClientEvent::SessionsFetched {
            generation,
            sessions,
        } => AppEvent::SessionsFetched {
            generation,
            sessions,
        },
        ClientEvent::FetchFailed { generation, error } => {
            AppEvent::FetchFailed { generation, error }
        }
        ClientEvent::ActionSubmitted { action, hash } => AppEvent::ActionSubmitted { action, hash },
        ClientEvent::ActionConfirmed { action, .. } => AppEvent::ActionConfirmed { action },
        ClientEvent::ActionFailed { action, error } => AppEvent::ActionFailed { action, error },
    }
}
