//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::{MAX_RATING, MINIMUM_AGE};
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ChatContext {
    ChatContext::new("test-session")
}

fn is_input_state(state: &ConvState) -> bool {
    !state.is_terminal()
}

/// Every bot Display is immediately followed by a Narrate with the same text,
/// and no Narrate appears anywhere else.
fn narration_paired(effects: &[Effect]) -> bool {
    let mut i = 0;
    while i < effects.len() {
        match &effects[i] {
            Effect::Display {
                author: Author::Bot,
                text,
            } => match effects.get(i + 1) {
                Some(Effect::Narrate { text: spoken }) if spoken == text => i += 2,
                _ => return false,
            },
            Effect::Narrate { .. } => return false,
            _ => i += 1,
        }
    }
    true
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_completion() -> impl Strategy<Value = Completion> {
    prop_oneof![Just(Completion::Finished), Just(Completion::UnderageRejected)]
}

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        Just(ConvState::CollectingName),
        Just(ConvState::CollectingAge),
        Just(ConvState::CollectingMusicPreference),
        Just(ConvState::PresentingDjs),
        Just(ConvState::CollectingFavoriteDj),
        Just(ConvState::CollectingFeedback),
        arb_completion().prop_map(|outcome| ConvState::Complete { outcome }),
    ]
}

fn arb_session() -> impl Strategy<Value = Session> {
    (
        proptest::option::of("[A-Za-z]{1,12}"),
        proptest::option::of(u64::from(MINIMUM_AGE)..120u64),
        proptest::option::of(prop_oneof![
            Just("DJ MICKY"),
            Just("DJ IPRO"),
            Just("DJ FUSION")
        ]),
        proptest::option::of(1..=MAX_RATING),
    )
        .prop_map(|(name, age, favorite_dj, feedback_rating)| Session {
            name,
            age,
            favorite_dj,
            feedback_rating,
        })
}

/// Inputs a user might plausibly type at any prompt
fn arb_input() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z ]{0,16}",
        (-50i64..150).prop_map(|n| n.to_string()),
        Just("yes".to_string()),
        Just("no".to_string()),
        Just("dj micky".to_string()),
        Just("DJ IPRO".to_string()),
        Just("techno house".to_string()),
        Just("   ".to_string()),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => arb_input().prop_map(|text| Event::UserSubmit { text }),
        1 => "[a-z ]{1,20}".prop_map(|text| Event::FollowUpDue { text }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Invariant 1: An accepted age is >= MINIMUM_AGE and never changes afterwards
    #[test]
    fn prop_age_accepted_once_and_adult(inputs in proptest::collection::vec(arb_input(), 0..20)) {
        let mut state = ConvState::default();
        let mut session = Session::default();
        let ctx = test_context();
        let mut first_age = None;

        for text in inputs {
            if let Ok(result) = transition(&state, &session, &ctx, Event::UserSubmit { text }) {
                state = result.new_state;
                session = result.session;
            }
            if let Some(age) = session.age {
                prop_assert!(age >= u64::from(MINIMUM_AGE));
                match first_age {
                    None => first_age = Some(age),
                    Some(prev) => prop_assert_eq!(prev, age),
                }
            }
        }
    }

    // Invariant 2: Bot messages are always narrated, user echoes never are
    #[test]
    fn prop_bot_messages_paired_with_narration(
        state in arb_state(),
        session in arb_session(),
        event in arb_event(),
    ) {
        if let Ok(result) = transition(&state, &session, &test_context(), event) {
            prop_assert!(narration_paired(&result.effects), "Unpaired narration: {:?}", result.effects);
        }
    }

    // Invariant 3: Terminal states reject user input and never move
    #[test]
    fn prop_terminal_is_absorbing(
        outcome in arb_completion(),
        session in arb_session(),
        event in arb_event(),
    ) {
        let state = ConvState::Complete { outcome };
        match transition(&state, &session, &test_context(), event.clone()) {
            Ok(result) => {
                let follow_up = matches!(event, Event::FollowUpDue { .. });
                prop_assert!(follow_up, "Terminal state accepted user input: {:?}", event);
                prop_assert_eq!(result.new_state, state);
                prop_assert_eq!(result.session, session);
            }
            Err(e) => prop_assert_eq!(e, TransitionError::ConversationClosed),
        }
    }

    // Invariant 4: Any non-blank name advances to the age question and is greeted
    #[test]
    fn prop_name_greeted(name in "[A-Za-z][A-Za-z ]{0,20}") {
        let result = transition(
            &ConvState::CollectingName,
            &Session::default(),
            &test_context(),
            Event::user(name.clone()),
        ).unwrap();

        prop_assert_eq!(result.new_state, ConvState::CollectingAge);
        let greeted = result.effects.iter().any(|e| matches!(
            e.displayed(),
            Some((Author::Bot, text)) if text.contains(name.trim())
        ));
        prop_assert!(greeted);
    }

    // Invariant 5: Non-numeric age leaves state and session untouched apart from a re-prompt
    #[test]
    fn prop_non_numeric_age_reprompts(text in "[A-Za-z][A-Za-z ]{0,12}", session in arb_session()) {
        let session = Session { age: None, ..session };
        let result = transition(&ConvState::CollectingAge, &session, &test_context(), Event::user(text)).unwrap();

        prop_assert_eq!(result.new_state, ConvState::CollectingAge);
        prop_assert_eq!(result.session, session);
    }

    // Invariant 6: Age threshold splits exactly at MINIMUM_AGE
    #[test]
    fn prop_age_threshold(age in -100i64..200) {
        let result = transition(
            &ConvState::CollectingAge,
            &Session::default(),
            &test_context(),
            Event::user(age.to_string()),
        ).unwrap();

        if age < i64::from(MINIMUM_AGE) {
            prop_assert_eq!(result.new_state, ConvState::Complete { outcome: Completion::UnderageRejected });
            prop_assert!(result.effects.contains(&Effect::DisableInput));
        } else {
            prop_assert_eq!(result.new_state, ConvState::CollectingMusicPreference);
            prop_assert_eq!(result.session.age, u64::try_from(age).ok());
        }
    }

    // Invariant 7: Ratings 1-5 complete with that many stars, other integers re-prompt
    #[test]
    fn prop_rating_stars(rating in -10i64..20, session in arb_session()) {
        let session = Session { feedback_rating: None, ..session };
        let result = transition(
            &ConvState::CollectingFeedback,
            &session,
            &test_context(),
            Event::user(rating.to_string()),
        ).unwrap();

        if (1..=i64::from(MAX_RATING)).contains(&rating) {
            prop_assert_eq!(result.new_state, ConvState::Complete { outcome: Completion::Finished });
            let summary = result.effects.iter()
                .find_map(|e| match e.displayed() {
                    Some((Author::Bot, text)) => Some(text.to_string()),
                    _ => None,
                })
                .unwrap();
            prop_assert_eq!(i64::try_from(summary.matches('⭐').count()).unwrap(), rating);
        } else {
            prop_assert_eq!(result.new_state, ConvState::CollectingFeedback);
            prop_assert_eq!(result.session.feedback_rating, None);
        }
    }

    // Invariant 8: Anything mentioning house goes to DJ MICKY, whatever else it says
    #[test]
    fn prop_house_checked_first(prefix in "[a-z ]{0,10}", suffix in "[a-z ]{0,10}") {
        let preference = format!("{prefix}HoUsE{suffix}");
        prop_assert!(recommend(&preference).contains("DJ MICKY"));
    }

    // Invariant 9: Blank input is never accepted and never changes anything
    #[test]
    fn prop_blank_input_rejected(state in arb_state(), session in arb_session(), blank in "[ \t]{0,5}") {
        prop_assert!(transition(&state, &session, &test_context(), Event::user(blank)).is_err());
    }

    // Invariant 10: PresentingDjs always reaches CollectingFavoriteDj
    #[test]
    fn prop_events_answer_always_advances(answer in "[A-Za-z]{1,8}", session in arb_session()) {
        let result = transition(&ConvState::PresentingDjs, &session, &test_context(), Event::user(answer)).unwrap();
        prop_assert_eq!(result.new_state, ConvState::CollectingFavoriteDj);
    }

    // Invariant 11: Only reachable states are produced by random walks
    #[test]
    fn prop_random_walk_valid(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = ConvState::default();
        let mut session = Session::default();
        let ctx = test_context();

        for event in events {
            let was_terminal = state.is_terminal();
            if let Ok(result) = transition(&state, &session, &ctx, event) {
                prop_assert!(!was_terminal || result.new_state == state);
                if is_input_state(&result.new_state) {
                    prop_assert!(!result.effects.contains(&Effect::DisableInput));
                }
                state = result.new_state;
                session = result.session;
            }
        }
    }
}
