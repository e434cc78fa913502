use std::sync::{atomic::Ordering, Arc};

use contract_client::MissingWalletProvider;
use shared::{
    domain::{NewSession, SessionId},
    error::ErrorKind,
    protocol::SessionAction,
};

use crate::{
    client::{ClientEvent, ClientHandle, VotingClient},
    state::{AppEvent, AppState, Effect},
    test_support::{account, other_account, session, settings, FakeContract, FakeWallet},
};

#[tokio::test]
async fn connect_binds_the_first_account_once() {
    let wallet = FakeWallet::authorizing(vec![account(), other_account()]);
    let client = VotingClient::new_with_wallet(settings(), wallet.clone());
    let mut events = client.subscribe_events();

    assert_eq!(client.connect().await.expect("connect"), account());
    assert_eq!(client.connect().await.expect("reconnect"), account());
    assert_eq!(client.account().await, Some(account()));
    assert_eq!(wallet.account_requests.load(Ordering::SeqCst), 1);

    assert!(matches!(
        events.recv().await.expect("event"),
        ClientEvent::Connected { account: a } if a == account()
    ));
}

#[tokio::test]
async fn missing_wallet_is_fatal_and_reported() {
    let client = VotingClient::new_with_wallet(settings(), Arc::new(MissingWalletProvider));
    let mut events = client.subscribe_events();

    let err = client.connect().await.expect_err("no wallet");
    assert_eq!(err.kind, ErrorKind::WalletUnavailable);
    assert!(err.is_fatal());
    assert!(matches!(
        events.recv().await.expect("event"),
        ClientEvent::ConnectFailed { .. }
    ));
}

#[tokio::test]
async fn rejected_authorization_is_denied() {
    let client = VotingClient::new_with_wallet(settings(), FakeWallet::rejecting());
    let err = client.connect().await.expect_err("rejected");
    assert_eq!(err.kind, ErrorKind::AuthorizationDenied);
    assert_eq!(client.account().await, None);
}

#[tokio::test]
async fn operations_before_connecting_do_nothing() {
    let client = VotingClient::new_with_wallet(settings(), Arc::new(MissingWalletProvider));
    let mut events = client.subscribe_events();

    let err = client.fetch_sessions(1).await.expect_err("not connected");
    assert_eq!(err.kind, ErrorKind::WalletUnavailable);
    assert!(matches!(
        events.recv().await.expect("event"),
        ClientEvent::FetchFailed { generation: 1, .. }
    ));

    assert!(client.close_session(SessionId(1)).await.is_err());
}

#[tokio::test]
async fn fetch_publishes_tagged_results() {
    let contract = FakeContract::with_sessions(vec![session(1, account(), &["A"], &[2])]);
    let client = VotingClient::from_connection(settings(), contract.connection());
    let mut events = client.subscribe_events();

    let sessions = client.fetch_sessions(7).await.expect("fetch");
    assert_eq!(sessions.len(), 1);
    match events.recv().await.expect("event") {
        ClientEvent::SessionsFetched {
            generation,
            sessions,
        } => {
            assert_eq!(generation, 7);
            assert_eq!(sessions[0].vote_counts, vec![2]);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn vote_reports_submission_then_confirmation() {
    let contract = FakeContract::with_sessions(vec![session(1, other_account(), &["A", "B"], &[0, 0])]);
    let client = VotingClient::from_connection(settings(), contract.connection());
    let mut events = client.subscribe_events();

    let receipt = client
        .vote_on_proposal(SessionId(1), 1)
        .await
        .expect("vote");
    assert!(receipt.succeeded);

    let expected = SessionAction::Vote {
        session_id: SessionId(1),
        proposal_index: 1,
    };
    assert!(matches!(
        events.recv().await.expect("submitted"),
        ClientEvent::ActionSubmitted { action, .. } if action == expected
    ));
    assert!(matches!(
        events.recv().await.expect("confirmed"),
        ClientEvent::ActionConfirmed { action, .. } if action == expected
    ));
}

#[tokio::test]
async fn invalid_create_never_reaches_the_contract() {
    let contract = FakeContract::with_sessions(Vec::new());
    let client = VotingClient::from_connection(settings(), contract.connection());

    let err = client
        .create_session("", &["A".to_string()])
        .await
        .expect_err("blank title");
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = client
        .create_session("Budget", &[])
        .await
        .expect_err("no proposals");
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = client
        .perform(SessionAction::Create(NewSession {
            title: "Budget".into(),
            proposals: vec!["  ".into()],
        }))
        .await
        .expect_err("blank proposal");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(contract.submitted.lock().expect("submitted").is_empty());
}

#[tokio::test]
async fn create_submits_the_title_as_entered() {
    let contract = FakeContract::with_sessions(Vec::new());
    let client = VotingClient::from_connection(settings(), contract.connection());

    client
        .create_session("  Lunch  ", &["Pizza".to_string()])
        .await
        .expect("create");
    let submitted = contract.submitted.lock().expect("submitted");
    assert_eq!(
        *submitted,
        vec![SessionAction::Create(NewSession {
            title: "  Lunch  ".into(),
            proposals: vec!["Pizza".into()],
        })]
    );
}

#[tokio::test]
async fn reverted_transaction_is_a_write_failure() {
    let contract = FakeContract::with_sessions(vec![session(1, account(), &["A"], &[0])]);
    contract.revert.store(true, Ordering::SeqCst);
    let client = VotingClient::from_connection(settings(), contract.connection());
    let mut events = client.subscribe_events();

    let err = client.close_session(SessionId(1)).await.expect_err("revert");
    assert_eq!(err.kind, ErrorKind::Write);

    assert!(matches!(
        events.recv().await.expect("submitted"),
        ClientEvent::ActionSubmitted { .. }
    ));
    assert!(matches!(
        events.recv().await.expect("failed"),
        ClientEvent::ActionFailed { .. }
    ));
}

/// Runs reducer effects against the client until none remain, feeding each
/// outcome back in as an event.
async fn drive(state: &mut AppState, client: &VotingClient, mut effects: Vec<Effect>) {
    while let Some(effect) = effects.pop() {
        let events = match effect {
            Effect::FetchSessions { generation } => match client.fetch_sessions(generation).await {
                Ok(sessions) => vec![AppEvent::SessionsFetched {
                    generation,
                    sessions,
                }],
                Err(error) => vec![AppEvent::FetchFailed { generation, error }],
            },
            Effect::Submit(action) => match client.perform(action.clone()).await {
                Ok(_) => vec![AppEvent::ActionConfirmed { action }],
                Err(error) => vec![AppEvent::ActionFailed { action, error }],
            },
        };
        for event in events {
            effects.extend(state.apply(event));
        }
    }
}

#[tokio::test]
async fn confirmed_vote_is_reflected_after_the_refetch() {
    let contract = FakeContract::with_sessions(vec![session(1, other_account(), &["A", "B"], &[2, 0])]);
    let client = VotingClient::from_connection(settings(), contract.connection());
    let mut state = AppState::default();

    let effects = state.apply(AppEvent::Connected { account: account() });
    drive(&mut state, &client, effects).await;
    assert!(state.view().cards[0].vote_offered);

    let effects = state.apply(AppEvent::VoteRequested {
        session_id: SessionId(1),
        proposal_index: 0,
    });
    drive(&mut state, &client, effects).await;

    let view = state.view();
    let card = &view.cards[0];
    assert!(card.has_voted);
    assert!(!card.vote_offered);
    assert_eq!(card.voted_proposal.as_deref(), Some("A"));
    assert_eq!(state.sessions[0].vote_counts, vec![3, 0]);
    assert_eq!(contract.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn closing_an_owned_session_reveals_counts() {
    let contract = FakeContract::with_sessions(vec![session(4, account(), &["A", "B"], &[1, 5])]);
    let client = VotingClient::from_connection(settings(), contract.connection());
    let mut state = AppState::default();

    let effects = state.apply(AppEvent::Connected { account: account() });
    drive(&mut state, &client, effects).await;
    assert!(state.view().cards[0].close_offered);
    assert!(state.view().cards[0].proposals[0].votes.is_none());

    let effects = state.apply(AppEvent::CloseRequested {
        session_id: SessionId(4),
    });
    drive(&mut state, &client, effects).await;

    let view = state.view();
    assert!(!view.cards[0].is_open);
    assert!(!view.cards[0].close_offered);
    let votes: Vec<Option<u64>> = view.cards[0].proposals.iter().map(|row| row.votes).collect();
    assert_eq!(votes, vec![Some(1), Some(5)]);
}
