use shared::domain::{FilterState, OpenFilter, Session, VotedFilter};

use crate::{
    filter::{filter_sessions, matches_open, matches_search, matches_voted},
    test_support::{account, session},
};

fn sample() -> Vec<Session> {
    let mut budget = session(4, account(), &["Parks", "Roads"], &[1, 2]);
    budget.title = "2024 Budget Plan".into();
    budget.has_voted = true;
    budget.voted_index = Some(1);

    let mut mascot = session(3, account(), &["Owl", "Budgie"], &[0, 0]);
    mascot.title = "Mascot".into();
    mascot.is_open = false;

    let mut lunch = session(2, account(), &["Pizza"], &[5]);
    lunch.title = "Lunch".into();
    lunch.is_open = false;
    lunch.has_voted = true;
    lunch.voted_index = Some(0);

    let mut holiday = session(1, account(), &["Beach", "Mountains"], &[0, 0]);
    holiday.title = "Holiday".into();

    vec![budget, mascot, lunch, holiday]
}

fn ids(sessions: &[&Session]) -> Vec<u64> {
    sessions.iter().map(|s| s.id.0).collect()
}

#[test]
fn default_filter_keeps_everything() {
    let sessions = sample();
    assert_eq!(
        ids(&filter_sessions(&sessions, &FilterState::default())),
        vec![4, 3, 2, 1]
    );
}

#[test]
fn search_is_case_insensitive_over_title_and_proposals() {
    let sessions = sample();
    let filter = FilterState {
        search: "budg".into(),
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_sessions(&sessions, &filter)), vec![4, 3]);

    let filter = FilterState {
        search: "BUDGET".into(),
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_sessions(&sessions, &filter)), vec![4]);
}

#[test]
fn blank_search_matches_everything() {
    let sessions = sample();
    assert!(sessions.iter().all(|s| matches_search("   ", s)));
    assert!(sessions.iter().all(|s| matches_search("", s)));
}

#[test]
fn open_and_voted_filters_combine() {
    let sessions = sample();
    let filter = FilterState {
        open: OpenFilter::Closed,
        voted: VotedFilter::Voted,
        search: String::new(),
    };
    assert_eq!(ids(&filter_sessions(&sessions, &filter)), vec![2]);

    let filter = FilterState {
        open: OpenFilter::Open,
        voted: VotedFilter::NotVoted,
        search: String::new(),
    };
    assert_eq!(ids(&filter_sessions(&sessions, &filter)), vec![1]);
}

#[test]
fn predicate_order_does_not_change_the_result() {
    let sessions = sample();
    let open = OpenFilter::All;
    let voted = VotedFilter::NotVoted;
    let search = "o";

    type Predicate<'a> = Box<dyn Fn(&Session) -> bool + 'a>;
    let predicates: [Predicate; 3] = [
        Box::new(|s: &Session| matches_open(open, s)),
        Box::new(|s: &Session| matches_voted(voted, s)),
        Box::new(|s: &Session| matches_search(search, s)),
    ];
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    let expected = ids(&filter_sessions(
        &sessions,
        &FilterState {
            open,
            voted,
            search: search.into(),
        },
    ));
    for order in orders {
        let mut remaining: Vec<&Session> = sessions.iter().collect();
        for index in order {
            remaining.retain(|s| predicates[index](*s));
        }
        assert_eq!(ids(&remaining), expected, "order {order:?}");
    }
}

#[test]
fn filtering_is_idempotent() {
    let sessions = sample();
    let filter = FilterState {
        open: OpenFilter::Open,
        voted: VotedFilter::All,
        search: "a".into(),
    };
    let once: Vec<Session> = filter_sessions(&sessions, &filter)
        .into_iter()
        .cloned()
        .collect();
    let twice = filter_sessions(&once, &filter);
    assert_eq!(ids(&twice), once.iter().map(|s| s.id.0).collect::<Vec<_>>());
}
