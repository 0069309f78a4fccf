//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use super::transition::TransitionError;
use crate::backend::{ChatReply, GenerationParams, ResetAck};
use crate::session::Author;
use chrono::Utc;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> TransitionContext {
    TransitionContext::new(GenerationParams::default(), Utc::now())
}

fn appended(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::AppendMessage(_)))
        .count()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_state() -> impl Strategy<Value = RequestState> {
    prop_oneof![Just(RequestState::Idle), Just(RequestState::Pending)]
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n]{0,8}"
}

fn arb_prompt() -> impl Strategy<Value = String> {
    ("[ \t]{0,3}", "[a-zA-Z0-9?!]{1,30}", "[ \t]{0,3}")
        .prop_map(|(lead, body, trail)| format!("{lead}{body}{trail}"))
}

fn arb_mood_label() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("happy".to_string())),
        Just(Some("curious".to_string())),
        Just(Some("grumpy".to_string())),
        "[a-z]{1,10}".prop_map(Some),
    ]
}

fn arb_reply() -> impl Strategy<Value = ChatReply> {
    (proptest::option::of("[a-zA-Z ]{0,40}"), arb_mood_label()).prop_map(|(response, bmo_mood)| {
        ChatReply {
            response,
            bmo_mood,
            ..ChatReply::default()
        }
    })
}

fn arb_outcome() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_reply().prop_map(|reply| Event::ReplyReceived { reply }),
        Just(Event::RequestFailed),
    ]
}

fn arb_reset() -> impl Strategy<Value = Event> {
    prop_oneof![
        proptest::option::of("[a-zA-Z ]{0,20}").prop_map(|message| Event::ResetAcknowledged {
            ack: ResetAck {
                message,
                ..ResetAck::default()
            },
        }),
        Just(Event::ResetFailed),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_blank_prompts_never_accepted(state in arb_state(), text in arb_blank()) {
        let result = transition(state, &test_context(), Event::UserSubmit { text });
        prop_assert!(result.is_err());
    }

    #[test]
    fn prop_pending_rejects_every_submit(text in arb_prompt()) {
        let result = transition(RequestState::Pending, &test_context(), Event::UserSubmit { text });
        prop_assert_eq!(result.unwrap_err(), TransitionError::RequestPending);
    }

    #[test]
    fn prop_completed_exchange_appends_exactly_two(
        text in arb_prompt(),
        outcome in arb_outcome(),
    ) {
        let ctx = test_context();
        let sent = transition(RequestState::Idle, &ctx, Event::UserSubmit { text: text.clone() }).unwrap();
        prop_assert_eq!(sent.new_state, RequestState::Pending);

        // User message precedes the outbound request
        match &sent.effects[..] {
            [Effect::AppendMessage(msg), Effect::SendPrompt(request)] => {
                prop_assert_eq!(msg.author, Author::User);
                prop_assert_eq!(msg.text.as_str(), text.trim());
                prop_assert_eq!(request.prompt.as_str(), text.trim());
            }
            other => prop_assert!(false, "unexpected effects {:?}", other),
        }

        let resolved = transition(sent.new_state, &ctx, outcome).unwrap();
        prop_assert_eq!(resolved.new_state, RequestState::Idle);
        prop_assert_eq!(appended(&sent.effects) + appended(&resolved.effects), 2);

        // The assistant message always comes first in the resolution
        let first_is_assistant = matches!(
            resolved.effects.first(),
            Some(Effect::AppendMessage(msg)) if msg.author == Author::Assistant && !msg.text.is_empty()
        );
        prop_assert!(first_is_assistant);
    }

    #[test]
    fn prop_mood_only_from_successful_reply(outcome in arb_outcome()) {
        let is_reply_with_mood = matches!(
            &outcome,
            Event::ReplyReceived { reply } if reply.bmo_mood.is_some()
        );
        let resolved = transition(RequestState::Pending, &test_context(), outcome).unwrap();
        let sets_mood = resolved.effects.iter().any(|e| matches!(e, Effect::SetMood(_)));
        prop_assert_eq!(sets_mood, is_reply_with_mood);
    }

    #[test]
    fn prop_reset_always_single_message_idle(state in arb_state(), event in arb_reset()) {
        let result = transition(state, &test_context(), event).unwrap();
        prop_assert_eq!(result.new_state, RequestState::Idle);
        match &result.effects[..] {
            [Effect::ReplaceTranscript(seed), Effect::ClearPersisted, Effect::ResetMood] => {
                prop_assert_eq!(seed.len(), 1);
                prop_assert_eq!(seed[0].author, Author::Assistant);
                prop_assert!(!seed[0].text.is_empty());
            }
            other => prop_assert!(false, "unexpected effects {:?}", other),
        }
    }
}
