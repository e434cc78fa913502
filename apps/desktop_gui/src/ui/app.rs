use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use client_core::{state::NotificationLevel, AppEvent, AppState, ClientEvent};
use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use shared::domain::FilterState;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    orchestration::{dispatch_backend_command, dispatch_effects},
    reducer::app_event_for,
};
use crate::ui::{panels, widgets};

pub const SETTINGS_STORAGE_KEY: &str = "voting_gui_settings";
const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedUiSettings {
    #[serde(default)]
    pub filter: FilterState,
}

pub struct VotingApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: AppState,
    status: String,
    status_banner: Option<UiError>,
    notification_shown_at: HashMap<u64, Instant>,
}

impl VotingApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted: Option<PersistedUiSettings>,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            state: AppState::default(),
            status: "Backend worker starting...".to_string(),
            status_banner: None,
            notification_shown_at: HashMap::new(),
        };

        if let Some(persisted) = persisted {
            app.apply(AppEvent::OpenFilterChanged(persisted.filter.open));
            app.apply(AppEvent::VotedFilterChanged(persisted.filter.voted));
            app.apply(AppEvent::SearchChanged(persisted.filter.search));
        }
        dispatch_backend_command(&app.cmd_tx, BackendCommand::Connect, &mut app.status);
        app
    }

    fn apply(&mut self, event: AppEvent) {
        let effects = self.state.apply(event);
        dispatch_effects(&self.cmd_tx, effects, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    self.status_banner = Some(err);
                }
                UiEvent::Resync => {
                    tracing::warn!("ui: client events were dropped; resynchronizing");
                    self.apply(AppEvent::ResyncRequested);
                }
                UiEvent::Client(event) => {
                    match &event {
                        ClientEvent::Connected { .. } => {
                            self.status.clear();
                            self.status_banner = None;
                        }
                        ClientEvent::ConnectFailed { error } => {
                            self.status_banner = Some(UiError::from_client_error(
                                UiErrorContext::Connect,
                                error,
                            ));
                        }
                        _ => {}
                    }
                    self.apply(app_event_for(event));
                }
            }
        }
    }

    /// Success and error notifications fade out; pending ones stay until
    /// their action settles.
    fn expire_notifications(&mut self) {
        let now = Instant::now();
        let live: Vec<u64> = self.state.notifications.iter().map(|n| n.id).collect();
        self.notification_shown_at.retain(|id, _| live.contains(id));

        let mut expired = Vec::new();
        for notification in &self.state.notifications {
            let shown_at = *self
                .notification_shown_at
                .entry(notification.id)
                .or_insert(now);
            if notification.level != NotificationLevel::Pending
                && now.duration_since(shown_at) >= NOTIFICATION_TTL
            {
                expired.push(notification.id);
            }
        }
        for id in expired {
            self.apply(AppEvent::NotificationDismissed(id));
        }
    }

    fn show_status_banner(&self, ui: &mut egui::Ui) {
        let Some(err) = &self.status_banner else {
            return;
        };
        egui::Frame::NONE
            .fill(ui.visuals().error_fg_color.gamma_multiply(0.15))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(12, 8))
            .show(ui, |ui| {
                ui.colored_label(ui.visuals().error_fg_color, err.message());
                if err.requires_restart() {
                    ui.weak("Check the wallet node and restart the app.");
                }
            });
        ui.add_space(6.0);
    }
}

impl eframe::App for VotingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.expire_notifications();

        let mut events = Vec::new();
        let view = self.state.view();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            panels::show_header(ui, &self.state, &self.status, &mut events);
            ui.add_space(4.0);
            panels::show_filters(ui, &self.state.filter, &mut events);
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            panels::show_session_list(ui, &view, &self.state, &mut events);
        });

        if let Some(draft) = &self.state.draft {
            panels::show_create_window(ctx, draft, view.create_pending, &mut events);
        }
        widgets::show_notifications(ctx, &self.state.notifications, &mut events);

        for event in events {
            self.apply(event);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedUiSettings {
            filter: self.state.filter.clone(),
        };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
