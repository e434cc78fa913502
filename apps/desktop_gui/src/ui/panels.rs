//! Top-level panels: header, filter bar, session list and creation form.

use client_core::{state::ConnectionStatus, view::SessionListView, AppEvent, AppState};
use shared::domain::{DraftSession, FilterState, OpenFilter, VotedFilter};

use crate::ui::widgets::{session_card, short_address};

pub fn show_header(ui: &mut egui::Ui, state: &AppState, status: &str, events: &mut Vec<AppEvent>) {
    ui.horizontal(|ui| {
        ui.heading("Voting Sessions");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let connected = state.is_connected();
            if ui
                .add_enabled(connected, egui::Button::new("Create session"))
                .clicked()
            {
                events.push(AppEvent::CreateFormOpened);
            }
            if ui
                .add_enabled(connected && !state.loading, egui::Button::new("Refresh"))
                .clicked()
            {
                events.push(AppEvent::RefreshRequested);
            }
            match &state.connection {
                ConnectionStatus::Connecting => {
                    ui.spinner();
                    ui.weak("Connecting to wallet...");
                }
                ConnectionStatus::Connected { account } => {
                    ui.label(format!("Account {}", short_address(account)))
                        .on_hover_text(account.to_string());
                }
                ConnectionStatus::Failed { message } => {
                    ui.colored_label(ui.visuals().error_fg_color, message);
                }
            }
        });
    });
    if !status.is_empty() {
        ui.weak(status);
    }
}

pub fn show_filters(ui: &mut egui::Ui, filter: &FilterState, events: &mut Vec<AppEvent>) {
    ui.horizontal(|ui| {
        let mut open = filter.open;
        egui::ComboBox::from_id_salt("open_filter")
            .selected_text(open.label())
            .show_ui(ui, |ui| {
                for variant in OpenFilter::VARIANTS {
                    ui.selectable_value(&mut open, variant, variant.label());
                }
            });
        if open != filter.open {
            events.push(AppEvent::OpenFilterChanged(open));
        }

        let mut voted = filter.voted;
        egui::ComboBox::from_id_salt("voted_filter")
            .selected_text(voted.label())
            .show_ui(ui, |ui| {
                for variant in VotedFilter::VARIANTS {
                    ui.selectable_value(&mut voted, variant, variant.label());
                }
            });
        if voted != filter.voted {
            events.push(AppEvent::VotedFilterChanged(voted));
        }

        let mut search = filter.search.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut search)
                .hint_text("Search title or proposals")
                .desired_width(260.0),
        );
        if response.changed() {
            events.push(AppEvent::SearchChanged(search));
        }
    });
}

pub fn show_session_list(
    ui: &mut egui::Ui,
    view: &SessionListView,
    state: &AppState,
    events: &mut Vec<AppEvent>,
) {
    ui.horizontal(|ui| {
        ui.label(format!("{} session(s)", view.count()));
        if view.loading {
            ui.spinner();
        }
    });
    ui.add_space(6.0);

    if view.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.weak("No sessions found.");
        });
        return;
    }

    let viewer = state.account();
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for card in &view.cards {
                session_card(ui, card, viewer.as_ref(), events);
                ui.add_space(8.0);
            }
        });
}

pub fn show_create_window(
    ctx: &egui::Context,
    draft: &DraftSession,
    pending: bool,
    events: &mut Vec<AppEvent>,
) {
    egui::Window::new("Create session")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_min_width(360.0);

            ui.label("Title");
            let mut title = draft.title.clone();
            if ui.text_edit_singleline(&mut title).changed() {
                events.push(AppEvent::DraftTitleChanged(title));
            }

            ui.add_space(6.0);
            ui.label("Proposals");
            for (index, proposal) in draft.proposals.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(format!("{}. {proposal}", index + 1));
                    if ui.small_button("Remove").clicked() {
                        events.push(AppEvent::DraftProposalRemoved(index));
                    }
                });
            }

            ui.horizontal(|ui| {
                let mut input = draft.proposal_input.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut input).hint_text("New proposal"),
                );
                if response.changed() {
                    events.push(AppEvent::DraftProposalInputChanged(input));
                }
                let submitted_with_enter =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Add").clicked() || submitted_with_enter {
                    events.push(AppEvent::DraftProposalAdded);
                }
            });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                let label = if pending { "Creating..." } else { "Create" };
                if ui.add_enabled(!pending, egui::Button::new(label)).clicked() {
                    events.push(AppEvent::DraftSubmitted);
                }
                if ui.button("Cancel").clicked() {
                    events.push(AppEvent::CreateFormCancelled);
                }
            });
        });
}
