//! # Client Tests
//!
//! End-to-end operation tests against an in-process store.
//!
//! ## Groups
//! - Elements: create, inspect, erase
//! - Links: content, lookup by content
//! - Iteration: pattern payloads and matches
//! - Session: statistics, events, shutdown
//! - Agents: question initiation

#![allow(clippy::unwrap_used, clippy::panic)]

mod common;

use common::{FakeStore, frame};
use sctp_client::{
    ClientError, CommandCode, EventId, EventNotification, EventSink, EventType, Initiation, Pattern,
    ResultCode, ScAddr, ScType, SctpClient, Slot, StatSample, Subscription, Transport,
    initiate_question,
};

fn client() -> (SctpClient<FakeStore>, FakeStore) {
    let store = FakeStore::new();
    (SctpClient::with_transport(store.clone()), store)
}

// =============================================================================
// ELEMENTS
// =============================================================================

mod elements {
    use super::*;

    #[test]
    fn created_node_exists_and_reports_type() {
        let (mut client, _store) = client();

        let node = client
            .create_node(ScType::NODE_CONST)
            .expect("io")
            .expect("created");

        assert!(client.element_exists(node).expect("io"));
        assert_eq!(
            client.element_type(node).expect("io"),
            Some(ScType::NODE_CONST)
        );
    }

    #[test]
    fn unknown_address_is_absent_not_error() {
        let (mut client, _store) = client();
        let ghost = ScAddr::new(9, 9);

        assert!(!client.element_exists(ghost).expect("io"));
        assert_eq!(client.element_type(ghost).expect("io"), None);
        assert_eq!(client.arc_endpoints(ghost).expect("io"), None);
        assert!(!client.erase_element(ghost).expect("io"));
    }

    #[test]
    fn arc_endpoints_match_creation() {
        let (mut client, _store) = client();
        let a = client.create_node(ScType::NODE_CONST).expect("io").expect("a");
        let b = client.create_node(ScType::NODE_CONST).expect("io").expect("b");

        let arc = client
            .create_arc(ScType::ARC_POS_CONST_PERM, a, b)
            .expect("io")
            .expect("arc");

        assert_eq!(client.arc_endpoints(arc).expect("io"), Some((a, b)));
        let ty = client.element_type(arc).expect("io").expect("type");
        assert!(ty.is_arc());
    }

    #[test]
    fn arc_to_missing_element_is_rejected() {
        let (mut client, _store) = client();
        let a = client.create_node(ScType::NODE_CONST).expect("io").expect("a");

        let arc = client
            .create_arc(ScType::ARC_POS_CONST_PERM, a, ScAddr::new(7, 7))
            .expect("io");
        assert_eq!(arc, None);
    }

    #[test]
    fn erased_element_is_gone() {
        let (mut client, _store) = client();
        let node = client.create_node(ScType::NODE).expect("io").expect("node");

        assert!(client.erase_element(node).expect("io"));
        assert!(!client.element_exists(node).expect("io"));
    }

    #[test]
    fn create_arc_payload_is_type_then_endpoints() {
        let (mut client, store) = client();
        let a = client.create_node(ScType::NODE_CONST).expect("io").expect("a");
        let b = client.create_node(ScType::NODE_CONST).expect("io").expect("b");
        client
            .create_arc(ScType::ARC_POS_CONST_PERM, a, b)
            .expect("io");

        let payloads = store.state().payloads(CommandCode::CreateArc);
        let mut expected = ScType::ARC_POS_CONST_PERM.bits().to_le_bytes().to_vec();
        expected.extend_from_slice(&a.encode_bytes());
        expected.extend_from_slice(&b.encode_bytes());
        assert_eq!(payloads, vec![expected]);
    }

    #[test]
    fn request_headers_carry_zero_flags_and_id() {
        let (mut client, store) = client();
        client.create_link().expect("io");

        let state = store.state();
        let (header, payload) = &state.requests[0];
        assert_eq!(header.command, CommandCode::CreateLink);
        assert_eq!(header.flags, 0);
        assert_eq!(header.request_id, 0);
        assert_eq!(header.payload_len, 0);
        assert!(payload.is_empty());
    }
}

// =============================================================================
// LINKS
// =============================================================================

mod links {
    use super::*;

    #[test]
    fn content_roundtrips_through_store() {
        let (mut client, _store) = client();
        let link = client.create_link().expect("io").expect("link");

        assert!(client.set_link_content(link, b"apple").expect("io"));
        assert_eq!(
            client.link_content(link).expect("io"),
            Some(b"apple".to_vec())
        );
    }

    #[test]
    fn empty_content_is_sent_as_single_space() {
        let (mut client, store) = client();
        let link = client.create_link().expect("io").expect("link");

        assert!(client.set_link_content(link, b"").expect("io"));

        let payloads = store.state().payloads(CommandCode::SetLinkContent);
        let mut expected = link.encode_bytes().to_vec();
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.push(b' ');
        assert_eq!(payloads, vec![expected]);
        assert_eq!(client.link_content(link).expect("io"), Some(b" ".to_vec()));
    }

    #[test]
    fn find_links_lists_matches_in_store_order() {
        let (mut client, _store) = client();
        let first = client.create_link().expect("io").expect("first");
        let other = client.create_link().expect("io").expect("other");
        let second = client.create_link().expect("io").expect("second");
        client.set_link_content(first, b"pear").expect("io");
        client.set_link_content(other, b"plum").expect("io");
        client.set_link_content(second, b"pear").expect("io");

        assert_eq!(
            client.find_links_with_content(b"pear").expect("io"),
            Some(vec![first, second])
        );
        assert_eq!(
            client.find_links_with_content(b"fig").expect("io"),
            Some(Vec::new())
        );
    }

    #[test]
    fn find_links_failure_is_none() {
        let (mut client, store) = client();
        store
            .state()
            .push_canned(frame(CommandCode::FindLinks, ResultCode::Fail, &[]));

        assert_eq!(client.find_links_with_content(b"x").expect("io"), None);
    }

    #[test]
    fn find_links_short_payload_is_none() {
        let (mut client, store) = client();
        // Count says two, payload holds one address.
        let mut payload = 2u32.to_le_bytes().to_vec();
        payload.extend_from_slice(&ScAddr::new(1, 1).encode_bytes());
        store
            .state()
            .push_canned(frame(CommandCode::FindLinks, ResultCode::Ok, &payload));

        assert_eq!(client.find_links_with_content(b"x").expect("io"), None);
    }

    #[test]
    fn content_of_non_link_is_none() {
        let (mut client, _store) = client();
        let node = client.create_node(ScType::NODE_CONST).expect("io").expect("node");
        assert_eq!(client.link_content(node).expect("io"), None);
    }
}

// =============================================================================
// SYSTEM IDENTIFIERS
// =============================================================================

mod identifiers {
    use super::*;

    #[test]
    fn set_then_resolve() {
        let (mut client, _store) = client();
        let node = client.create_node(ScType::NODE_CONST).expect("io").expect("node");

        assert!(client.set_system_identifier(node, "apple").expect("io"));
        assert_eq!(
            client.resolve_system_identifier("apple").expect("io"),
            Some(node)
        );
    }

    #[test]
    fn unknown_identifier_is_none() {
        let (mut client, _store) = client();
        assert_eq!(
            client.resolve_system_identifier("nonexistent").expect("io"),
            None
        );
    }

    #[test]
    fn short_ok_payload_is_none() {
        let (mut client, store) = client();
        store.state().push_canned(frame(
            CommandCode::FindElementBySysIdtf,
            ResultCode::Ok,
            &[1, 0],
        ));
        assert_eq!(client.resolve_system_identifier("apple").expect("io"), None);
    }

    #[test]
    fn identifier_is_length_prefixed_utf8() {
        let (mut client, store) = client();
        client.resolve_system_identifier("nrel_idtf").expect("io");

        let payloads = store.state().payloads(CommandCode::FindElementBySysIdtf);
        let mut expected = 9u32.to_le_bytes().to_vec();
        expected.extend_from_slice(b"nrel_idtf");
        assert_eq!(payloads, vec![expected]);
    }
}

// =============================================================================
// ITERATION
// =============================================================================

mod iteration {
    use super::*;

    #[test]
    fn two_nodes_and_arc_yield_one_triple() {
        let (mut client, _store) = client();
        let n1 = client.create_node(ScType::NODE_CONST).expect("io").expect("n1");
        let n2 = client.create_node(ScType::NODE_CONST).expect("io").expect("n2");
        let arc = client
            .create_arc(ScType::ARC_POS_CONST_PERM, n1, n2)
            .expect("io")
            .expect("arc");

        let matches = client
            .iterate(&Pattern::FixedAnyAny { source: n1 })
            .expect("io");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].as_slice(), &[n1, arc, n2]);
    }

    #[test]
    fn fixed_any_any_payload_is_code_and_address() {
        let (mut client, store) = client();
        let source = ScAddr::new(0x0102, 0x0304);
        client
            .iterate(&Pattern::FixedAnyAny { source })
            .expect("io");

        let payloads = store.state().payloads(CommandCode::IterateElements);
        assert_eq!(payloads, vec![vec![0, 0x02, 0x01, 0x04, 0x03]]);
    }

    #[test]
    fn incoming_arcs_found_from_target() {
        let (mut client, _store) = client();
        let a = client.create_node(ScType::NODE_CONST).expect("io").expect("a");
        let b = client.create_node(ScType::NODE_CONST).expect("io").expect("b");
        let target = client.create_node(ScType::NODE_CONST).expect("io").expect("t");
        let arc_a = client
            .create_arc(ScType::ARC_POS_CONST_PERM, a, target)
            .expect("io")
            .expect("arc");
        let arc_b = client
            .create_arc(ScType::ARC_POS_CONST_PERM, b, target)
            .expect("io")
            .expect("arc");

        let matches = client
            .iterate(&Pattern::AnyAnyFixed { target })
            .expect("io");
        let arcs: Vec<ScAddr> = matches.iter().filter_map(|m| m.get(1)).collect();
        assert_eq!(arcs, vec![arc_a, arc_b]);
    }

    #[test]
    fn five_slot_match_includes_attribute() {
        let (mut client, _store) = client();
        let source = client.create_node(ScType::NODE_CONST).expect("io").expect("s");
        let target = client.create_link().expect("io").expect("t");
        let relation = client
            .create_node(ScType::NODE_CONST | ScType::NODE_NOROLE)
            .expect("io")
            .expect("rel");
        let arc = client
            .create_arc(ScType::ARC_COMMON | ScType::CONST, source, target)
            .expect("io")
            .expect("arc");
        let attr_arc = client
            .create_arc(ScType::ARC_POS_CONST_PERM, relation, arc)
            .expect("io")
            .expect("attr arc");

        let matches = client
            .iterate_slots(&[
                Slot::Fixed(source),
                Slot::Any,
                Slot::Any,
                Slot::Any,
                Slot::Fixed(relation),
            ])
            .expect("io");

        assert_eq!(matches.len(), 1);
        assert_eq!(
            matches[0].as_slice(),
            &[source, arc, target, attr_arc, relation]
        );
    }

    #[test]
    fn no_match_is_empty() {
        let (mut client, _store) = client();
        let lonely = client.create_node(ScType::NODE_CONST).expect("io").expect("n");
        assert!(
            client
                .iterate(&Pattern::FixedAnyAny { source: lonely })
                .expect("io")
                .is_empty()
        );
    }

    #[test]
    fn failure_and_empty_payload_are_empty() {
        let (mut client, store) = client();
        let source = ScAddr::new(1, 1);
        store.state().push_canned(frame(
            CommandCode::IterateElements,
            ResultCode::Fail,
            &[1, 2, 3],
        ));
        store
            .state()
            .push_canned(frame(CommandCode::IterateElements, ResultCode::Ok, &[]));

        assert!(client.iterate(&Pattern::FixedAnyAny { source }).expect("io").is_empty());
        assert!(client.iterate(&Pattern::FixedAnyAny { source }).expect("io").is_empty());
    }

    #[test]
    fn truncated_matches_are_empty() {
        let (mut client, store) = client();
        // One triple announced, two addresses sent.
        let mut payload = 1u32.to_le_bytes().to_vec();
        payload.extend_from_slice(&[0; 8]);
        store.state().push_canned(frame(
            CommandCode::IterateElements,
            ResultCode::Ok,
            &payload,
        ));

        let matches = client
            .iterate(&Pattern::FixedAnyAny {
                source: ScAddr::new(1, 1),
            })
            .expect("io");
        assert!(matches.is_empty());
    }

    #[test]
    fn unsupported_slot_layout_is_rejected_before_sending() {
        let (mut client, store) = client();
        let err = client
            .iterate_slots(&[Slot::Any, Slot::Any, Slot::Any])
            .expect_err("unsupported");

        assert!(matches!(err, ClientError::UnsupportedPattern(_)));
        assert!(store.state().requests.is_empty());
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

mod statistics {
    use super::*;

    fn sample(time: u64, is_initial: bool) -> StatSample {
        StatSample {
            time,
            node_count: 10,
            arc_count: 20,
            link_count: 3,
            live_node_count: 9,
            live_arc_count: 18,
            live_link_count: 3,
            empty_count: 4,
            connection_count: 1,
            command_count: 77,
            command_error_count: 2,
            is_initial,
        }
    }

    #[test]
    fn samples_in_range_are_decoded() {
        let (mut client, store) = client();
        store.state().stats = vec![sample(1_000, true), sample(2_000, false), sample(9_000, false)];

        let samples = client.statistics(0, 5_000).expect("io").expect("ok");
        assert_eq!(samples, vec![sample(1_000, true), sample(2_000, false)]);
    }

    #[test]
    fn empty_range_is_empty_list() {
        let (mut client, _store) = client();
        assert_eq!(client.statistics(0, 0).expect("io"), Some(Vec::new()));
    }

    #[test]
    fn request_carries_both_bounds() {
        let (mut client, store) = client();
        client.statistics(5, 6).expect("io");

        let payloads = store.state().payloads(CommandCode::Statistics);
        let mut expected = 5u64.to_le_bytes().to_vec();
        expected.extend_from_slice(&6u64.to_le_bytes());
        assert_eq!(payloads, vec![expected]);
    }

    #[test]
    fn failure_is_none() {
        let (mut client, store) = client();
        store
            .state()
            .push_canned(frame(CommandCode::Statistics, ResultCode::NoRights, &[]));
        assert_eq!(client.statistics(0, 10).expect("io"), None);
    }
}

// =============================================================================
// EVENTS AND SHUTDOWN
// =============================================================================

mod session {
    use super::*;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::io::{self, Read, Write};
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    /// Plays back scripted reads. `None` reads as an expired timeout.
    struct Stepped {
        reads: VecDeque<Option<Vec<u8>>>,
        closed: Rc<Cell<bool>>,
    }

    impl Read for Stepped {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.reads.pop_front() {
                Some(Some(bytes)) => {
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                    if n < bytes.len() {
                        self.reads.push_front(Some(bytes[n..].to_vec()));
                    }
                    Ok(n)
                }
                Some(None) => Err(io::Error::from(io::ErrorKind::WouldBlock)),
                None => Ok(0),
            }
        }
    }

    impl Write for Stepped {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Transport for Stepped {
        fn close(&mut self) -> io::Result<()> {
            self.closed.set(true);
            Ok(())
        }
    }

    /// Sink that keeps every delivery with its subscription.
    #[derive(Clone, Default)]
    struct Recording(Arc<Mutex<Vec<(Subscription, EventNotification)>>>);

    impl EventSink for Recording {
        fn deliver(&mut self, subscription: &Subscription, notification: EventNotification) {
            self.0
                .lock()
                .expect("lock")
                .push((*subscription, notification));
        }
    }

    fn emitted(records: &[(u32, ScAddr, ScAddr)]) -> Vec<u8> {
        let mut out = (records.len() as u32).to_le_bytes().to_vec();
        for (id, element, argument) in records {
            out.extend_from_slice(&id.to_le_bytes());
            out.extend_from_slice(&element.encode_bytes());
            out.extend_from_slice(&argument.encode_bytes());
        }
        out
    }

    #[test]
    fn subscribe_tracks_and_unsubscribe_releases() {
        let (mut client, store) = client();
        let node = client.create_node(ScType::NODE_CONST).expect("io").expect("n");

        let id = client
            .subscribe(EventType::AddOutputArc, node)
            .expect("io")
            .expect("subscribed");
        assert_eq!(client.subscriptions().count(), 1);
        assert_eq!(store.state().events.len(), 1);

        assert!(client.unsubscribe(id).expect("io"));
        assert_eq!(client.subscriptions().count(), 0);
        assert!(store.state().events.is_empty());
    }

    #[test]
    fn subscription_on_missing_element_is_none() {
        let (mut client, _store) = client();
        let id = client
            .subscribe(EventType::RemoveElement, ScAddr::new(4, 4))
            .expect("io");
        assert_eq!(id, None);
        assert_eq!(client.subscriptions().count(), 0);
    }

    #[test]
    fn shutdown_releases_subscriptions_then_closes() {
        let (mut client, store) = client();
        let node = client.create_node(ScType::NODE_CONST).expect("io").expect("n");
        client
            .subscribe(EventType::AddOutputArc, node)
            .expect("io")
            .expect("first");
        client
            .subscribe(EventType::RemoveElement, node)
            .expect("io")
            .expect("second");

        client.shutdown().expect("shutdown");

        assert!(!client.is_connected());
        let state = store.state();
        assert_eq!(state.payloads(CommandCode::EventDestroy).len(), 2);
        assert!(state.events.is_empty());
        assert!(state.closed);
    }

    #[test]
    fn shutdown_twice_is_noop() {
        let (mut client, store) = client();
        client.shutdown().expect("first");
        let sent = store.state().requests.len();

        client.shutdown().expect("second");
        assert_eq!(store.state().requests.len(), sent);
    }

    #[test]
    fn operations_after_shutdown_are_closed_errors() {
        let (mut client, _store) = client();
        client.shutdown().expect("shutdown");

        assert!(matches!(client.create_link(), Err(ClientError::Closed)));
        assert!(matches!(
            client.element_exists(ScAddr::new(1, 1)),
            Err(ClientError::Closed)
        ));
    }

    #[test]
    fn drop_releases_subscriptions() {
        let store = FakeStore::new();
        {
            let mut client = SctpClient::with_transport(store.clone());
            let node = client.create_node(ScType::NODE_CONST).expect("io").expect("n");
            client
                .subscribe(EventType::AddInputArc, node)
                .expect("io")
                .expect("subscribed");
        }
        let state = store.state();
        assert!(state.events.is_empty());
        assert!(state.closed);
    }

    #[test]
    fn emitted_events_reach_the_queue_for_tracked_ids_only() {
        let (mut client, _store) = client();
        let node = client.create_node(ScType::NODE_CONST).expect("io").expect("n");
        let id = client
            .subscribe(EventType::AddOutputArc, node)
            .expect("io")
            .expect("subscribed");

        let arc = ScAddr::new(1, 50);
        let payload = emitted(&[(id.0, node, arc), (id.0 + 1000, node, arc)]);
        assert_eq!(client.route_emitted(&payload).expect("decode"), 1);

        let events = client.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, id);
        assert_eq!(events[0].element, node);
        assert_eq!(events[0].argument, arc);
        assert!(client.take_events().is_empty());
    }

    #[test]
    fn truncated_emit_payload_is_decode_error() {
        let (mut client, _store) = client();
        let mut payload = emitted(&[(1, ScAddr::new(1, 1), ScAddr::new(1, 2))]);
        payload.truncate(payload.len() - 1);
        assert!(matches!(
            client.route_emitted(&payload),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn custom_sink_receives_matching_subscription() {
        let (mut client, _store) = client();
        let node = client.create_node(ScType::NODE_CONST).expect("io").expect("n");
        let id = client
            .subscribe(EventType::AddOutputArc, node)
            .expect("io")
            .expect("subscribed");

        let sink = Recording::default();
        client.set_event_sink(Box::new(sink.clone()));

        let arc = ScAddr::new(1, 60);
        let payload = emitted(&[(id.0 + 1, node, arc), (id.0, node, arc)]);
        assert_eq!(client.route_emitted(&payload).expect("decode"), 1);

        let recorded = sink.0.lock().expect("lock");
        assert_eq!(recorded.len(), 1);
        let (subscription, notification) = recorded[0];
        assert_eq!(
            subscription,
            Subscription {
                id,
                event_type: EventType::AddOutputArc,
                addr: node,
            }
        );
        assert_eq!(notification.id, id);
        assert_eq!(notification.argument, arc);
        drop(recorded);

        // Non-queueing sinks hand nothing back.
        assert!(client.take_events().is_empty());
    }

    #[test]
    fn timeout_mid_frame_closes_the_session() {
        let first = frame(
            CommandCode::CreateLink,
            ResultCode::Ok,
            &ScAddr::new(1, 1).encode_bytes(),
        );
        let mut rest = first[10..].to_vec();
        rest.extend(frame(
            CommandCode::CreateLink,
            ResultCode::Ok,
            &ScAddr::new(2, 2).encode_bytes(),
        ));
        let closed = Rc::new(Cell::new(false));
        let mut client = SctpClient::with_transport(Stepped {
            reads: VecDeque::from([Some(first[..10].to_vec()), None, Some(rest)]),
            closed: Rc::clone(&closed),
        });

        assert!(matches!(client.create_link(), Err(ClientError::Timeout)));
        assert!(!client.is_connected());
        assert!(closed.get());

        assert!(matches!(client.create_link(), Err(ClientError::Closed)));
        client.shutdown().expect("already closed");
    }

    #[test]
    fn broken_pipe_forgets_subscriptions() {
        let (mut client, store) = client();
        let node = client.create_node(ScType::NODE_CONST).expect("io").expect("n");
        client
            .subscribe(EventType::RemoveElement, node)
            .expect("io")
            .expect("subscribed");

        store.state().closed = true;
        assert!(matches!(client.create_link(), Err(ClientError::Io(_))));
        assert_eq!(client.subscriptions().count(), 0);

        let sent = store.state().requests.len();
        client.shutdown().expect("already closed");
        assert_eq!(store.state().requests.len(), sent);
        assert!(matches!(
            client.element_exists(node),
            Err(ClientError::Closed)
        ));
    }

    #[test]
    fn unsubscribe_unknown_id_is_false() {
        let (mut client, _store) = client();
        assert!(!client.unsubscribe(EventId(4242)).expect("io"));
    }

    #[test]
    fn non_ok_response_leaves_stream_aligned() {
        let (mut client, store) = client();
        store.state().push_canned(frame(
            CommandCode::EraseElement,
            ResultCode::Fail,
            &[0xde, 0xad, 0xbe, 0xef, 0x00],
        ));

        assert!(!client.erase_element(ScAddr::new(1, 1)).expect("io"));
        let link = client.create_link().expect("io");
        assert!(link.is_some());
    }
}

// =============================================================================
// AGENTS
// =============================================================================

mod agents {
    use super::*;

    #[test]
    fn initiation_adds_question_to_three_sets_in_order() {
        let (mut client, store) = client();
        let (question, initiated, class, node) = {
            let mut state = store.state();
            (
                state.add_named_node("question"),
                state.add_named_node("question_initiated"),
                state.add_named_node("question_search_definition"),
                state.add_named_node("my_question"),
            )
        };

        let outcome = initiate_question(&mut client, "question_search_definition", "my_question")
            .expect("io");

        let Initiation::Initiated { question: q, arcs } = outcome.clone() else {
            panic!("not initiated: {outcome:?}");
        };
        assert_eq!(q, node);

        let state = store.state();
        let begins: Vec<ScAddr> = arcs
            .iter()
            .map(|arc| state.elements.get(arc).expect("arc stored").begin)
            .collect();
        assert_eq!(begins, vec![question, class, initiated]);
        for arc in arcs {
            let element = state.elements.get(&arc).expect("arc stored");
            assert_eq!(element.end, node);
            assert_eq!(element.ty, ScType::ARC_POS_CONST_PERM);
        }
    }

    #[test]
    fn missing_keynode_is_reported() {
        let (mut client, store) = client();
        store.state().add_named_node("question");

        let outcome = initiate_question(&mut client, "question_x", "q1").expect("io");
        assert_eq!(
            outcome,
            Initiation::MissingKeynode("question_initiated".to_string())
        );
        assert!(store.state().payloads(CommandCode::CreateArc).is_empty());
    }

    #[test]
    fn missing_question_node_is_reported() {
        let (mut client, store) = client();
        {
            let mut state = store.state();
            state.add_named_node("question");
            state.add_named_node("question_initiated");
            state.add_named_node("question_x");
        }

        let outcome = initiate_question(&mut client, "question_x", "absent").expect("io");
        assert_eq!(outcome, Initiation::MissingKeynode("absent".to_string()));
    }
}
