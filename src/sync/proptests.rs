//! Property-based tests for the turn state machine

use super::*;
use crate::gateway::types::{ChatTurnReply, FunctionCall};
use crate::session::character::Character;
use crate::session::GameState;
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

fn arb_whitespace() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just(' '), Just('\t'), Just('\n')], 0..8)
        .prop_map(|chars| chars.into_iter().collect())
}

fn arb_message() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z ]{0,40}"
}

fn arb_game_state() -> impl Strategy<Value = GameState> {
    prop_oneof![
        Just(GameState::CharacterCreation),
        Just(GameState::Combat),
        Just(GameState::Adventure),
    ]
}

fn arb_character() -> impl Strategy<Value = Character> {
    "[A-Z][a-z]{2,8}".prop_map(|name| Character {
        name: Some(name),
        ..Character::default()
    })
}

fn arb_function_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("add_world_location".to_string()),
        Just("add_npc".to_string()),
        Just("update_quest".to_string()),
        Just("roll_dice".to_string()),
        Just("save_character".to_string()),
    ]
}

fn arb_function_calls() -> impl Strategy<Value = Vec<FunctionCall>> {
    proptest::collection::vec(
        arb_function_name().prop_map(|function| FunctionCall {
            function,
            ..FunctionCall::default()
        }),
        0..4,
    )
}

fn arb_reply() -> impl Strategy<Value = ChatTurnReply> {
    (
        arb_message(),
        proptest::option::of("[a-f0-9]{8}"),
        proptest::option::of(arb_game_state()),
        proptest::option::of(arb_character()),
        arb_function_calls(),
    )
        .prop_map(
            |(response, session_id, game_state, character, function_calls)| ChatTurnReply {
                response,
                session_id,
                game_state,
                character,
                function_calls,
            },
        )
}

fn triggers_world_reload(calls: &[FunctionCall]) -> bool {
    calls.iter().any(|call| {
        matches!(
            call.function.as_str(),
            "add_world_location" | "add_npc" | "update_quest"
        )
    })
}

fn position(effects: &[Effect], probe: impl Fn(&Effect) -> bool) -> Option<usize> {
    effects.iter().position(probe)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Whitespace-only input never starts a turn.
    #[test]
    fn whitespace_submission_always_rejected(text in arb_whitespace()) {
        let result = transition(
            &TurnState::Idle,
            &SyncContext::default(),
            Event::SubmitTurn { text },
        );
        prop_assert_eq!(result.unwrap_err(), TransitionError::EmptyInput);
    }

    /// No second turn can start while one is in flight.
    #[test]
    fn submission_while_sending_always_rejected(text in arb_message()) {
        let result = transition(
            &TurnState::Sending,
            &SyncContext::default(),
            Event::SubmitTurn { text },
        );
        prop_assert_eq!(result.unwrap_err(), TransitionError::TurnInFlight);
    }

    /// A resolved turn always ends Idle, with the narrative appended
    /// last so every earlier facet update precedes the visible text.
    #[test]
    fn resolution_ends_idle_with_narrative_last(reply in arb_reply()) {
        let expected_response = reply.response.clone();
        let result = transition(
            &TurnState::Sending,
            &SyncContext::default(),
            Event::TurnResolved { reply },
        ).unwrap();

        prop_assert_eq!(result.new_state, TurnState::Idle);
        match result.effects.last() {
            Some(Effect::AppendAssistantTurn { text }) => {
                prop_assert_eq!(text, &expected_response);
            }
            other => prop_assert!(false, "expected narrative append last, got {other:?}"),
        }
    }

    /// Fan-out order is fixed: rotation, game state, character, world
    /// reload, narrative.
    #[test]
    fn fan_out_order_is_fixed(reply in arb_reply()) {
        let result = transition(
            &TurnState::Sending,
            &SyncContext::default(),
            Event::TurnResolved { reply },
        ).unwrap();
        let effects = &result.effects;

        let order = [
            position(effects, |e| matches!(e, Effect::RotateSession { .. })),
            position(effects, |e| matches!(e, Effect::ApplyGameState { .. })),
            position(effects, |e| matches!(e, Effect::ApplyCharacter { .. })),
            position(effects, |e| matches!(e, Effect::ReloadWorld)),
            position(effects, |e| matches!(e, Effect::AppendAssistantTurn { .. })),
        ];
        let present: Vec<usize> = order.iter().copied().flatten().collect();
        prop_assert!(present.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// The world reload fires exactly when a listed side-effect tag is
    /// present.
    #[test]
    fn world_reload_matches_side_effect_tags(reply in arb_reply()) {
        let expected = triggers_world_reload(&reply.function_calls);
        let result = transition(
            &TurnState::Sending,
            &SyncContext::default(),
            Event::TurnResolved { reply },
        ).unwrap();
        prop_assert_eq!(result.effects.contains(&Effect::ReloadWorld), expected);
    }

    /// Failure settles to Idle with exactly the fixed-notice effect.
    #[test]
    fn failure_appends_exactly_one_notice(detail in arb_message()) {
        let result = transition(
            &TurnState::Sending,
            &SyncContext::default(),
            Event::TurnFailed { detail: detail.clone() },
        ).unwrap();
        prop_assert_eq!(result.new_state, TurnState::Idle);
        prop_assert_eq!(result.effects, vec![Effect::AppendFailureNotice { detail }]);
    }

    /// Conversation-length law: N settled submissions produce 2N turns
    /// (one user turn plus one assistant turn each, whether the
    /// assistant turn is narrative or the failure notice), and user
    /// turns are never removed.
    #[test]
    fn conversation_length_law(
        turns in proptest::collection::vec((arb_message(), any::<bool>()), 0..12)
    ) {
        let context = SyncContext::default();
        let mut state = TurnState::Idle;
        let mut log: Vec<&'static str> = Vec::new();

        for (text, succeeds) in &turns {
            let submitted = transition(&state, &context, Event::SubmitTurn { text: text.clone() }).unwrap();
            state = submitted.new_state;
            for effect in &submitted.effects {
                if matches!(effect, Effect::AppendUserTurn { .. }) {
                    log.push("user");
                }
            }

            let event = if *succeeds {
                Event::TurnResolved { reply: ChatTurnReply::narrative("ok") }
            } else {
                Event::TurnFailed { detail: "transport error".to_string() }
            };
            let settled = transition(&state, &context, event).unwrap();
            state = settled.new_state;
            for effect in &settled.effects {
                if matches!(
                    effect,
                    Effect::AppendAssistantTurn { .. } | Effect::AppendFailureNotice { .. }
                ) {
                    log.push("assistant");
                }
            }
        }

        prop_assert_eq!(state, TurnState::Idle);
        prop_assert_eq!(log.len(), turns.len() * 2);
        let user_count = log.iter().filter(|entry| **entry == "user").count();
        prop_assert_eq!(user_count, turns.len());
    }
}
