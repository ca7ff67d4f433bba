//! # Outcome Classification End To End
//!
//! Each target node gets a random combination of trust, ban failure,
//! notification channel and post failure. The summary must count every
//! target exactly once, in the class the step table assigns.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use gb_01_trust_graph::{InMemoryTrustStore, TrustEdge, TrustGraph};
    use gb_03_authorization::{AuthorizationResolver, StaticPermissionSource};
    use gb_04_propagation::{
        BanOrder, CollectingErrorSink, GlobalBanApi, PropagationConfig, PropagationOutcome,
        PropagationRequest, PropagationService, PropagationSummary, RecordingChatPlatform,
        StaticNotificationDirectory,
    };
    use proptest::prelude::*;
    use shared_types::{Actor, ChannelId, NodeId, NodeRef, UserId};

    const ORIGIN: NodeId = NodeId(1000);

    #[derive(Clone, Copy, Debug)]
    struct TargetSetup {
        trusts_origin: bool,
        ban_fails: bool,
        has_channel: bool,
        post_fails: bool,
    }

    impl TargetSetup {
        fn expected(self) -> PropagationOutcome {
            let action_ok = self.trusts_origin && !self.ban_fails;
            let alert_ok = self.has_channel && !self.post_fails;
            PropagationOutcome::from_steps(self.trusts_origin, action_ok, alert_ok)
        }
    }

    fn setups() -> impl Strategy<Value = Vec<TargetSetup>> {
        prop::collection::vec(
            (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
                |(trusts_origin, ban_fails, has_channel, post_fails)| TargetSetup {
                    trusts_origin,
                    ban_fails,
                    has_channel,
                    post_fails,
                },
            ),
            1..12,
        )
    }

    async fn propagate(setups: &[TargetSetup]) -> PropagationSummary {
        let nodes: Vec<NodeId> = (1..=setups.len() as u64).map(NodeId).collect();
        let edges = nodes
            .iter()
            .zip(setups)
            .filter(|(_, s)| s.trusts_origin)
            .map(|(n, _)| TrustEdge::new(*n, ORIGIN));
        let trust = TrustGraph::load(Arc::new(InMemoryTrustStore::with_edges(edges)))
            .await
            .unwrap();

        let platform = Arc::new(RecordingChatPlatform::new());
        let directory = Arc::new(StaticNotificationDirectory::new());
        for (node, setup) in nodes.iter().zip(setups) {
            platform.add_node(NodeRef::new(*node, format!("Node {}", node)));
            if setup.ban_fails {
                platform.fail_bans_on(*node);
            }
            if setup.post_fails {
                platform.fail_sends_on(*node);
            }
            if setup.has_channel {
                directory.set_channel(*node, ChannelId(node.get() + 500));
            }
        }

        let service = PropagationService::new(
            Arc::new(trust),
            Arc::new(AuthorizationResolver::new(Arc::new(
                StaticPermissionSource::new(),
            ))),
            platform,
            directory,
            Arc::new(CollectingErrorSink::new()),
            PropagationConfig {
                handler_timeout: Duration::from_secs(5),
            },
        );
        let order = BanOrder {
            issuer: Actor::new(UserId(1), "issuer"),
            origin: NodeRef::new(ORIGIN, "Origin"),
            target_user: Actor::new(UserId(666), "spammer"),
            reason: "raid".into(),
        };
        service
            .initiate_propagation(PropagationRequest::new(order, nodes))
            .await
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_summary_counts_each_target_in_its_class(setups in setups()) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let summary = rt.block_on(propagate(&setups));

            let outcomes: Vec<PropagationOutcome> = setups.iter().map(|s| s.expected()).collect();
            let expected = PropagationSummary::from_outcomes(&outcomes);
            prop_assert_eq!(summary, expected);
            prop_assert_eq!(summary.total(), setups.len());
        }
    }

    #[test]
    fn test_every_step_combination_is_classified() {
        for bits in 0u8..16 {
            let setup = TargetSetup {
                trusts_origin: bits & 1 != 0,
                ban_fails: bits & 2 != 0,
                has_channel: bits & 4 != 0,
                post_fails: bits & 8 != 0,
            };
            let outcome = setup.expected();
            let alert_ok = setup.has_channel && !setup.post_fails;
            match outcome {
                PropagationOutcome::Success => {
                    assert!(setup.trusts_origin && !setup.ban_fails)
                }
                PropagationOutcome::ErrorFallbackAlert => {
                    assert!(setup.trusts_origin && setup.ban_fails && alert_ok)
                }
                PropagationOutcome::NonTrustedAlert => assert!(!setup.trusts_origin && alert_ok),
                PropagationOutcome::ErrorFailure => assert!(!alert_ok),
            }
        }
    }
}
