//! Command orchestration helpers from UI actions to backend command queue.

use client_core::Effect;
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend command processor disconnected; restart the app".to_string();
        }
    }
}

pub fn dispatch_effects(cmd_tx: &Sender<BackendCommand>, effects: Vec<Effect>, status: &mut String) {
    for effect in effects {
        dispatch_backend_command(cmd_tx, effect.into(), status);
    }
}
