//! Small reusable widgets: session cards, notifications, address labels.

use client_core::{
    state::{Notification, NotificationLevel},
    view::SessionCard,
    AppEvent,
};
use shared::domain::Address;

pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

pub fn voted_badge(has_voted: bool) -> &'static str {
    if has_voted {
        "VOTED"
    } else {
        "NOT VOTED"
    }
}

fn level_color(level: NotificationLevel) -> egui::Color32 {
    match level {
        NotificationLevel::Pending => egui::Color32::from_rgb(88, 101, 242),
        NotificationLevel::Success => egui::Color32::from_rgb(59, 165, 93),
        NotificationLevel::Error => egui::Color32::from_rgb(237, 66, 69),
    }
}

pub fn session_card(ui: &mut egui::Ui, card: &SessionCard, viewer: Option<&Address>, events: &mut Vec<AppEvent>) {
    egui::Frame::group(ui.style())
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(14, 10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                let (badge, color) = if card.is_open {
                    ("OPEN", egui::Color32::from_rgb(59, 165, 93))
                } else {
                    ("CLOSED", ui.visuals().weak_text_color())
                };
                ui.label(egui::RichText::new(badge).small().strong().color(color));
                let voted_color = if card.has_voted {
                    level_color(NotificationLevel::Pending)
                } else {
                    ui.visuals().weak_text_color()
                };
                ui.label(
                    egui::RichText::new(voted_badge(card.has_voted))
                        .small()
                        .strong()
                        .color(voted_color),
                );
                ui.label(egui::RichText::new(&card.title).strong().size(16.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let toggle = if card.expanded { "Hide" } else { "Details" };
                    if ui.button(toggle).clicked() {
                        events.push(AppEvent::ToggleExpanded(card.id));
                    }
                    ui.weak(format!("#{}", card.id));
                });
            });

            if let Some(choice) = &card.voted_proposal {
                ui.label(format!("You voted for: {choice}"));
            }

            if !card.expanded {
                return;
            }

            let owner = if viewer == Some(&card.owner) {
                "you".to_string()
            } else {
                short_address(&card.owner)
            };
            ui.weak(format!("Owner: {owner}"));
            ui.add_space(4.0);

            for row in &card.proposals {
                ui.horizontal(|ui| {
                    let mut text = egui::RichText::new(format!("{}. {}", row.index + 1, row.text));
                    if row.is_viewer_choice {
                        text = text.strong().color(level_color(NotificationLevel::Success));
                    }
                    ui.label(text);
                    if let Some(votes) = row.votes {
                        ui.weak(format!("{votes} vote(s)"));
                    }
                    if card.vote_offered {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let label = if card.vote_pending { "Voting..." } else { "Vote" };
                            if ui
                                .add_enabled(card.vote_enabled(), egui::Button::new(label))
                                .clicked()
                            {
                                events.push(AppEvent::VoteRequested {
                                    session_id: card.id,
                                    proposal_index: row.index,
                                });
                            }
                        });
                    }
                });
            }

            if card.close_offered {
                ui.add_space(6.0);
                let label = if card.close_pending {
                    "Closing..."
                } else {
                    "Close session"
                };
                if ui
                    .add_enabled(card.close_enabled(), egui::Button::new(label))
                    .clicked()
                {
                    events.push(AppEvent::CloseRequested {
                        session_id: card.id,
                    });
                }
            }
        });
}

pub fn show_notifications(
    ctx: &egui::Context,
    notifications: &[Notification],
    events: &mut Vec<AppEvent>,
) {
    if notifications.is_empty() {
        return;
    }
    egui::Area::new(egui::Id::new("notifications"))
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_max_width(320.0);
            for notification in notifications {
                egui::Frame::popup(ui.style())
                    .stroke(egui::Stroke::new(1.5, level_color(notification.level)))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            if notification.level == NotificationLevel::Pending {
                                ui.spinner();
                            }
                            ui.label(&notification.message);
                            if ui.small_button("x").clicked() {
                                events.push(AppEvent::NotificationDismissed(notification.id));
                            }
                        });
                    });
                ui.add_space(6.0);
            }
        });
}
