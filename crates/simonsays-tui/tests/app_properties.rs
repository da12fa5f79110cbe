//! Property-based tests for App state machine.
//!
//! Tests verify that invariants hold under arbitrary event sequences.

use crossterm::event::KeyCode;
use proptest::prelude::*;
use simonsays_client::{Color, EndReason, SessionEvent, TurnState};
use simonsays_tui::{
    App, AppAction, AppEvent,
    app::{LOG_CAPACITY, Phase},
};

/// Generate random app events.
fn event_strategy() -> impl Strategy<Value = AppEvent> {
    let turn = (0i32..6).prop_map(TurnState::from_wire);
    let color = (0i32..5).prop_map(Color::from_wire);
    let key = prop::sample::select(vec!['r', 'g', 'b', 'y', 'x', 'R', '7', ' ']);
    let reason = prop::sample::select(vec![
        EndReason::Normal,
        EndReason::ServerError,
        EndReason::TransportError,
    ]);

    prop_oneof![
        3 => Just(AppEvent::Tick),
        1 => (1u16..200, 1u16..100).prop_map(|(c, r)| AppEvent::Resize(c, r)),
        4 => key.prop_map(|c| AppEvent::Key(KeyCode::Char(c))),
        3 => turn.prop_map(|t| AppEvent::Session(SessionEvent::TurnChanged(t))),
        2 => color.prop_map(|c| AppEvent::Session(SessionEvent::Lightup(c))),
        1 => Just(AppEvent::Session(SessionEvent::ProtocolWarning("odd".into()))),
        1 => reason.prop_map(|r| AppEvent::Session(SessionEvent::SessionEnded(r))),
        1 => Just(AppEvent::WaitTimedOut),
    ]
}

proptest! {
    #[test]
    fn presses_only_emitted_on_own_turn(events in prop::collection::vec(event_strategy(), 0..200)) {
        let mut app = App::new("Player-1", "127.0.0.1:50051");

        for event in events {
            let my_turn = app.is_my_turn();
            let phase = app.phase();
            for action in app.handle(event) {
                if let AppAction::Press(color) = action {
                    prop_assert!(my_turn, "press emitted outside own turn");
                    prop_assert_eq!(phase, Phase::Playing);
                    prop_assert!(color.is_recognized());
                }
            }
        }
    }

    #[test]
    fn finished_is_sticky(events in prop::collection::vec(event_strategy(), 0..200)) {
        let mut app = App::new("Player-1", "127.0.0.1:50051");
        let mut finished = false;

        for event in events {
            app.handle(event);
            if finished {
                prop_assert_eq!(app.phase(), Phase::Finished);
                prop_assert!(!app.is_my_turn());
            }
            finished = app.phase() == Phase::Finished;
        }
    }

    #[test]
    fn log_stays_bounded(events in prop::collection::vec(event_strategy(), 0..400)) {
        let mut app = App::new("Player-1", "127.0.0.1:50051");
        for event in events {
            app.handle(event);
            prop_assert!(app.log().len() <= LOG_CAPACITY);
        }
    }
}
