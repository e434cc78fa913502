use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    filter::filter_sessions,
    view::{can_close, can_vote, shows_vote_counts},
    ClientHandle, Settings, VotingClient,
};
use shared::{
    domain::{Address, FilterState, OpenFilter, Session, SessionId, VotedFilter},
    protocol::TxReceipt,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "voting", about = "Browse and take part in on-chain voting sessions")]
struct Args {
    /// JSON-RPC endpoint of the wallet node.
    #[arg(long, global = true)]
    rpc_url: Option<String>,
    /// Address of the deployed voting contract.
    #[arg(long, global = true)]
    contract: Option<String>,
    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List sessions, newest first.
    List {
        #[arg(long, default_value = "all")]
        open: OpenFilter,
        #[arg(long, default_value = "all")]
        voted: VotedFilter,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Create a session with at least one proposal.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long = "proposal", required = true)]
        proposals: Vec<String>,
    },
    /// Vote for a proposal by its zero-based index.
    Vote {
        #[arg(long)]
        session: u64,
        #[arg(long)]
        proposal: usize,
    },
    /// Close a session you own.
    Close {
        #[arg(long)]
        session: u64,
    },
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = client_core::load_settings()?;
    if let Some(rpc_url) = &args.rpc_url {
        settings.set_rpc_url(rpc_url)?;
    }
    if let Some(contract) = &args.contract {
        settings.set_contract_address(contract)?;
    }
    Ok(settings)
}

fn print_session(session: &Session, viewer: &Address) {
    let status = if session.is_open { "open" } else { "closed" };
    let owner = if session.is_owned_by(viewer) {
        " (yours)"
    } else {
        ""
    };
    println!("#{} {} [{status}]{owner}", session.id, session.title);

    let show_votes = shows_vote_counts(session, Some(viewer));
    for (index, proposal) in session.proposals.iter().enumerate() {
        let marker = if session.voted_index == Some(index) {
            '*'
        } else {
            ' '
        };
        match session.vote_count(index).filter(|_| show_votes) {
            Some(votes) => println!("  {marker} {index}. {proposal} ({votes} votes)"),
            None => println!("  {marker} {index}. {proposal}"),
        }
    }

    let mut hints = Vec::new();
    if can_vote(session) {
        hints.push("vote open");
    }
    if let Some(choice) = session.voted_proposal() {
        println!("    you voted for: {choice}");
    }
    if can_close(session, Some(viewer)) {
        hints.push("you can close this session");
    }
    if !hints.is_empty() {
        println!("    {}", hints.join(", "));
    }
}

fn receipt_output(message: &str, receipt: &TxReceipt, json: bool) -> Result<String> {
    if json {
        let value = serde_json::json!({
            "message": message,
            "receipt": receipt,
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }
    Ok(format!("{message} ({})", receipt.transaction_hash))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let client = VotingClient::new(settings);
    let account = client
        .connect()
        .await
        .context("failed to connect to the wallet")?;
    tracing::info!(%account, "connected");

    match args.command {
        Command::List {
            open,
            voted,
            search,
        } => {
            let sessions = client
                .fetch_sessions(1)
                .await
                .context("unable to fetch the session list")?;
            let filter = FilterState {
                open,
                voted,
                search,
            };
            let visible = filter_sessions(&sessions, &filter);

            if args.json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
                return Ok(());
            }
            println!("{} session(s)", visible.len());
            if visible.is_empty() {
                println!("No sessions found.");
            }
            for session in visible {
                print_session(session, &account);
            }
        }
        Command::Create { title, proposals } => {
            let receipt = client.create_session(&title, &proposals).await?;
            println!("{}", receipt_output("Session created!", &receipt, args.json)?);
        }
        Command::Vote { session, proposal } => {
            let receipt = client
                .vote_on_proposal(SessionId(session), proposal)
                .await?;
            println!("{}", receipt_output("Vote recorded!", &receipt, args.json)?);
        }
        Command::Close { session } => {
            let receipt = client.close_session(SessionId(session)).await?;
            println!("{}", receipt_output("Session closed!", &receipt, args.json)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use shared::protocol::TxHash;

    use super::*;

    fn receipt() -> TxReceipt {
        TxReceipt {
            transaction_hash: TxHash([0x11; 32]),
            block_number: Some(42),
            succeeded: true,
        }
    }

    #[test]
    fn receipt_prints_as_text_by_default() {
        let text = receipt_output("Vote recorded!", &receipt(), false).expect("text");
        assert_eq!(text, format!("Vote recorded! (0x{})", "11".repeat(32)));
    }

    #[test]
    fn receipt_prints_as_json_when_requested() {
        let text = receipt_output("Session closed!", &receipt(), true).expect("json");
        let value: serde_json::Value = serde_json::from_str(&text).expect("parse");
        assert_eq!(value["message"], "Session closed!");
        assert_eq!(value["receipt"]["transaction_hash"], format!("0x{}", "11".repeat(32)));
        assert_eq!(value["receipt"]["block_number"], 42);
        assert_eq!(value["receipt"]["succeeded"], true);
    }
}
