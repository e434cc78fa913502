mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{PersistedUiSettings, VotingApp, SETTINGS_STORAGE_KEY};

#[derive(Parser, Debug)]
#[command(name = "voting-gui", about = "Desktop client for on-chain voting sessions")]
struct Args {
    /// JSON-RPC endpoint of the wallet node.
    #[arg(long)]
    rpc_url: Option<String>,
    /// Address of the deployed voting contract.
    #[arg(long)]
    contract: Option<String>,
}

fn load_settings(args: &Args) -> anyhow::Result<client_core::Settings> {
    let mut settings = client_core::load_settings()?;
    if let Some(rpc_url) = &args.rpc_url {
        settings.set_rpc_url(rpc_url)?;
    }
    if let Some(contract) = &args.contract {
        settings.set_contract_address(contract)?;
    }
    Ok(settings)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .init();
    tracing::info!(rpc_url = %settings.rpc_url, contract = %settings.contract_address, "starting");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Voting Sessions")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Voting Sessions",
        options,
        Box::new(|cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedUiSettings>(&text).ok())
            });
            Ok(Box::new(VotingApp::new(cmd_tx, ui_rx, persisted)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to run the desktop app: {err}"))
}
