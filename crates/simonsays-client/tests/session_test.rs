//! Session behavior tests against a recording channel and observer.

mod common;

use common::open_session;
use simonsays_client::{
    Color, EndReason, Misuse, PlayerId, PlayerIdentity, Request, Response, SessionError,
    SessionEvent, SessionState, StreamEnd, TurnState,
};

fn turn(state: TurnState) -> Response {
    Response::Turn { state }
}

fn player() -> PlayerId {
    PlayerId::new("Player-4242").unwrap()
}

#[test]
fn full_game_reaches_observer_in_order() {
    let (session, _wire, observer) = open_session();
    session.join(&player()).unwrap();

    session.on_message(turn(TurnState::Begin));
    session.on_message(turn(TurnState::StartTurn));
    session.on_message(Response::Lightup { color: Color::Red });
    session.on_message(turn(TurnState::Win));

    assert_eq!(
        observer.take(),
        vec![
            SessionEvent::TurnChanged(TurnState::Begin),
            SessionEvent::TurnChanged(TurnState::StartTurn),
            SessionEvent::Lightup(Color::Red),
            SessionEvent::TurnChanged(TurnState::Win),
        ]
    );
    assert_eq!(session.state(), SessionState::Finished);
}

#[test]
fn press_outside_started_is_never_transmitted() {
    let (session, wire, _observer) = open_session();
    session.join(&player()).unwrap();

    let before = session.send_color(Color::Blue);
    assert!(matches!(
        before,
        Err(SessionError::ProtocolMisuse { reason: Misuse::NotStarted(SessionState::NotStarted), .. })
    ));

    session.on_message(turn(TurnState::Begin));
    session.on_message(turn(TurnState::Lose));

    let after = session.send_color(Color::Blue);
    assert!(matches!(
        after,
        Err(SessionError::ProtocolMisuse { reason: Misuse::NotStarted(SessionState::Finished), .. })
    ));

    assert_eq!(wire.lock().unwrap().sent, vec![Request::Join { player: player() }]);
}

#[test]
fn join_after_game_decided_is_rejected() {
    let (session, wire, _observer) = open_session();
    session.on_message(turn(TurnState::Begin));
    session.on_message(turn(TurnState::Win));
    assert_eq!(session.state(), SessionState::Finished);

    let result = session.join(&player());

    assert_eq!(
        result,
        Err(SessionError::ProtocolMisuse { operation: "join", reason: Misuse::GameOver })
    );
    assert!(!session.has_joined());
    assert!(wire.lock().unwrap().sent.is_empty());
}

#[test]
fn join_twice_transmits_once() {
    let (session, wire, _observer) = open_session();
    let identity = PlayerIdentity::random();

    session.join(identity.player_id()).unwrap();
    let second = session.join(identity.player_id());

    assert!(second.as_ref().is_err_and(SessionError::is_misuse), "got {second:?}");
    let sent = &wire.lock().unwrap().sent;
    assert_eq!(sent.len(), 1);
    assert!(matches!(&sent[0], Request::Join { player } if player == identity.player_id()));
}

#[test]
fn unrecognized_turn_warns_once_without_state_change() {
    for prefix in [vec![], vec![TurnState::Begin], vec![TurnState::Begin, TurnState::Win]] {
        let (session, _wire, observer) = open_session();
        for state in prefix {
            session.on_message(turn(state));
        }
        let state_before = session.state();
        observer.take();

        session.on_message(turn(TurnState::Unrecognized(42)));

        assert_eq!(session.state(), state_before);
        let events = observer.take();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], SessionEvent::ProtocolWarning(msg) if msg.contains("42")));
    }
}

#[test]
fn finished_ignores_turns_and_lightups() {
    let (session, _wire, observer) = open_session();
    session.on_message(turn(TurnState::Begin));
    session.on_message(turn(TurnState::Lose));
    observer.take();

    session.on_message(turn(TurnState::Begin));
    session.on_message(turn(TurnState::StartTurn));
    session.on_message(turn(TurnState::Win));
    session.on_message(Response::Lightup { color: Color::Yellow });

    assert!(observer.take().is_empty());
    assert_eq!(session.state(), SessionState::Finished);
}

#[test]
fn duplicate_begin_is_silent() {
    let (session, _wire, observer) = open_session();
    session.on_message(turn(TurnState::Begin));
    session.on_message(turn(TurnState::Begin));

    assert_eq!(observer.take(), vec![SessionEvent::TurnChanged(TurnState::Begin)]);
    assert!(session.is_started());
}

#[test]
fn close_twice_signals_once() {
    let (session, wire, observer) = open_session();
    session.join(&player()).unwrap();

    session.close();
    session.close();

    assert_eq!(wire.lock().unwrap().finishes, 1);
    assert_eq!(observer.take(), vec![SessionEvent::SessionEnded(EndReason::Normal)]);
    assert!(session.is_closed());
}

#[test]
fn sentinel_color_never_transmitted() {
    let (session, wire, _observer) = open_session();
    let check = |session: &common::TestSession| {
        assert_eq!(
            session.send_color(Color::Unrecognized),
            Err(SessionError::InvalidColor(Color::Unrecognized))
        );
    };

    check(&session);
    session.join(&player()).unwrap();
    check(&session);
    session.on_message(turn(TurnState::Begin));
    check(&session);
    session.on_message(turn(TurnState::Win));
    check(&session);

    assert_eq!(wire.lock().unwrap().sent.len(), 1);
}

#[test]
fn stream_end_after_outcome_reports_normal() {
    let (session, _wire, observer) = open_session();
    session.on_message(turn(TurnState::Begin));
    session.on_message(turn(TurnState::Win));
    session.on_stream_end(StreamEnd::Completed);
    session.close();

    assert_eq!(
        observer.take(),
        vec![
            SessionEvent::TurnChanged(TurnState::Begin),
            SessionEvent::TurnChanged(TurnState::Win),
            SessionEvent::SessionEnded(EndReason::Normal),
        ]
    );
}

#[test]
fn send_failure_surfaces_error_and_ends_session() {
    let (mut channel, wire) = common::RecordingChannel::new();
    channel.fail_sends = true;
    let observer = common::RecordingObserver::default();
    let session = simonsays_client::GameSession::open(channel, observer.clone()).unwrap();

    assert!(matches!(session.join(&player()), Err(SessionError::Transport(_))));
    assert_eq!(observer.take(), vec![SessionEvent::SessionEnded(EndReason::TransportError)]);
    assert!(wire.lock().unwrap().sent.is_empty());

    assert!(matches!(
        session.send_color(Color::Red),
        Err(SessionError::ProtocolMisuse { reason: Misuse::Closed, .. })
    ));
}
