//! # Propagation Scenarios
//!
//! One origin, one target, every subsystem real except the chat platform
//! and the notification directory.
//!
//! | Scenario | Trust | Action | Notice | Outcome |
//! |----------|-------|--------|--------|---------|
//! | A | none | skipped | no channel | `ErrorFailure` |
//! | B | T trusts O | succeeds | plain | `Success` |
//! | C | T trusts O | fails | retry control | `ErrorFallbackAlert`, unprivileged click denied |
//! | C' | T trusts O | fails | retry control | member without baseline capability denied |

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use gb_01_trust_graph::{InMemoryTrustStore, TrustApi, TrustEdge, TrustGraph};
    use gb_03_authorization::{
        AuthorizationResolver, CommandId, OverrideTarget, PermissionOverride,
        StaticPermissionSource,
    };
    use gb_04_propagation::{
        BanOrder, CollectingErrorSink, ControlInvocation, DenialReason, FallbackAction,
        FallbackOutcome, GlobalBanApi, PropagationConfig, PropagationRequest,
        RecordingChatPlatform, StaticNotificationDirectory, GBAN_COMMAND,
    };
    use shared_types::{Actor, ChannelId, NodeId, NodeRef, Permission, PermissionSet, UserId};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const ORIGIN: NodeId = NodeId(10);
    const TARGET: NodeId = NodeId(20);
    const CHANNEL: ChannelId = ChannelId(2000);
    const SPAMMER: UserId = UserId(666);
    const MODERATOR: UserId = UserId(77);

    struct World {
        service: Arc<dyn GlobalBanApi>,
        trust: Arc<TrustGraph>,
        permissions: Arc<StaticPermissionSource>,
        platform: Arc<RecordingChatPlatform>,
        directory: Arc<StaticNotificationDirectory>,
        errors: Arc<CollectingErrorSink>,
    }

    async fn world(edges: &[(NodeId, NodeId)]) -> World {
        let store = Arc::new(InMemoryTrustStore::with_edges(
            edges.iter().map(|(s, d)| TrustEdge::new(*s, *d)),
        ));
        let trust = Arc::new(TrustGraph::load(store).await.unwrap());
        let permissions = Arc::new(StaticPermissionSource::new());
        let platform = Arc::new(RecordingChatPlatform::new());
        platform.add_node(NodeRef::new(ORIGIN, "Origin"));
        platform.add_node(NodeRef::new(TARGET, "Target"));
        let directory = Arc::new(StaticNotificationDirectory::new());
        let errors = Arc::new(CollectingErrorSink::new());

        let service = Arc::new(gb_04_propagation::PropagationService::new(
            trust.clone(),
            Arc::new(AuthorizationResolver::new(permissions.clone())),
            platform.clone(),
            directory.clone(),
            errors.clone(),
            PropagationConfig {
                handler_timeout: Duration::from_secs(5),
            },
        ));

        World {
            service,
            trust,
            permissions,
            platform,
            directory,
            errors,
        }
    }

    fn order() -> BanOrder {
        BanOrder {
            issuer: Actor::new(UserId(1), "issuer"),
            origin: NodeRef::new(ORIGIN, "Origin"),
            target_user: Actor::new(SPAMMER, "spammer"),
            reason: "raid".into(),
        }
    }

    fn click(action: FallbackAction) -> ControlInvocation {
        ControlInvocation {
            node: TARGET,
            channel: CHANNEL,
            message: shared_types::MessageId(1),
            operator: Actor::new(MODERATOR, "moderator"),
            action,
        }
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[tokio::test]
    async fn test_scenario_a_untrusted_without_channel_fails_silently() {
        let w = world(&[]).await;

        let summary = w
            .service
            .initiate_propagation(PropagationRequest::new(order(), [TARGET]))
            .await;

        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.total(), 1);
        assert!(w.platform.sent().is_empty());
        assert!(w.platform.bans().is_empty());
    }

    #[tokio::test]
    async fn test_scenario_b_trusted_target_bans_and_notifies() {
        let w = world(&[(TARGET, ORIGIN)]).await;
        w.directory.set_channel(TARGET, CHANNEL);

        let summary = w
            .service
            .initiate_propagation(PropagationRequest::new(order(), [TARGET]))
            .await;

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.total(), 1);
        let notices = w.platform.messages_in(TARGET);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.controls.is_empty());
        assert!(!notices[0].message.allow_mentions);
        assert_eq!(w.platform.banned_on(SPAMMER), [TARGET].into());
    }

    #[tokio::test]
    async fn test_scenario_c_failed_ban_leaves_control_gated_by_authorization() {
        let w = world(&[(TARGET, ORIGIN)]).await;
        w.directory.set_channel(TARGET, CHANNEL);
        w.platform.fail_bans_on(TARGET);

        let summary = w
            .service
            .initiate_propagation(PropagationRequest::new(order(), [TARGET]))
            .await;
        assert_eq!(summary.fallback_alert_count, 1);

        let notices = w.platform.messages_in(TARGET);
        assert_eq!(notices.len(), 1);
        let control = &notices[0].message.controls[0];
        let action = control.action.clone().unwrap();
        assert!(matches!(action, FallbackAction::ApplyBan(_)));

        // The platform recovers, but the clicking moderator is not a member of the target.
        w.platform.allow_bans_on(TARGET);
        let outcome = w
            .service
            .on_fallback_control_invoked(click(action.clone()))
            .await;
        assert_eq!(
            outcome,
            FallbackOutcome::Denied(DenialReason::MissingBanPermission)
        );
        assert!(w.platform.bans().is_empty());
        assert!(w.platform.replaced_controls().is_empty());

        // A moderator holding ban members completes it.
        w.permissions.set_permissions(
            TARGET,
            MODERATOR,
            PermissionSet::of(&[Permission::UseApplicationCommands, Permission::BanMembers]),
        );
        let outcome = w.service.on_fallback_control_invoked(click(action)).await;
        assert_eq!(outcome, FallbackOutcome::Completed);
        assert_eq!(w.platform.banned_on(SPAMMER), [TARGET].into());
        let replaced = w.platform.replaced_controls();
        assert_eq!(replaced.len(), 1);
        assert!(replaced[0].2.disabled);
        assert!(w.errors.fatal().is_empty());
    }

    #[tokio::test]
    async fn test_member_without_baseline_capability_is_denied() {
        let w = world(&[(TARGET, ORIGIN)]).await;
        w.directory.set_channel(TARGET, CHANNEL);
        w.platform.fail_bans_on(TARGET);
        let summary = w
            .service
            .initiate_propagation(PropagationRequest::new(order(), [TARGET]))
            .await;
        assert_eq!(summary.fallback_alert_count, 1);
        let action = w.platform.messages_in(TARGET)[0].message.controls[0]
            .action
            .clone()
            .unwrap();

        // Ban members alone is not enough without the baseline capability.
        w.platform.allow_bans_on(TARGET);
        w.permissions.set_permissions(
            TARGET,
            MODERATOR,
            PermissionSet::of(&[Permission::BanMembers]),
        );
        let outcome = w.service.on_fallback_control_invoked(click(action)).await;

        assert_eq!(
            outcome,
            FallbackOutcome::Denied(DenialReason::MissingBanPermission)
        );
        assert!(w.platform.bans().is_empty());
        assert!(w.platform.replaced_controls().is_empty());
    }

    #[tokio::test]
    async fn test_apply_and_trust_makes_next_ban_automatic() {
        let w = world(&[]).await;
        w.directory.set_channel(TARGET, CHANNEL);
        w.permissions.set_permissions(
            TARGET,
            MODERATOR,
            PermissionSet::of(&[Permission::Administrator]),
        );

        let summary = w
            .service
            .initiate_propagation(PropagationRequest::new(order(), [TARGET]))
            .await;
        assert_eq!(summary.non_trusted_alert_count, 1);

        let notice = w.platform.messages_in(TARGET).remove(0);
        let apply_and_trust = notice
            .message
            .controls
            .iter()
            .filter_map(|c| c.action.clone())
            .find(|a| matches!(a, FallbackAction::ApplyBanAndTrust(_)))
            .unwrap();

        let outcome = w
            .service
            .on_fallback_control_invoked(click(apply_and_trust))
            .await;
        assert_eq!(outcome, FallbackOutcome::Completed);
        assert!(w.trust.trusts(TARGET, ORIGIN));

        let mut second = order();
        second.target_user = Actor::new(UserId(667), "spammer-alt");
        let summary = w
            .service
            .initiate_propagation(PropagationRequest::new(second, [TARGET]))
            .await;
        assert_eq!(summary.success_count, 1);
        assert_eq!(w.platform.banned_on(UserId(667)), [TARGET].into());
    }

    #[tokio::test]
    async fn test_user_override_denial_blocks_privileged_clicker() {
        let w = world(&[(TARGET, ORIGIN)]).await;
        w.directory.set_channel(TARGET, CHANNEL);
        w.platform.fail_bans_on(TARGET);
        w.service
            .initiate_propagation(PropagationRequest::new(order(), [TARGET]))
            .await;

        w.permissions.set_permissions(
            TARGET,
            MODERATOR,
            PermissionSet::of(&[Permission::UseApplicationCommands, Permission::BanMembers]),
        );
        w.permissions.set_overrides(
            TARGET,
            &CommandId::new(GBAN_COMMAND),
            vec![PermissionOverride::deny(OverrideTarget::User(MODERATOR))],
        );
        w.platform.allow_bans_on(TARGET);

        let outcome = w
            .service
            .on_fallback_control_invoked(click(FallbackAction::ApplyBan(order())))
            .await;
        assert_eq!(
            outcome,
            FallbackOutcome::Denied(DenialReason::MissingBanPermission)
        );
        assert!(w.platform.bans().is_empty());
    }

    #[tokio::test]
    async fn test_hung_target_does_not_stall_others() {
        let w = world(&[(TARGET, ORIGIN)]).await;
        let service = gb_04_propagation::PropagationService::new(
            w.trust.clone(),
            Arc::new(AuthorizationResolver::new(w.permissions.clone())),
            w.platform.clone(),
            w.directory.clone(),
            w.errors.clone(),
            PropagationConfig {
                handler_timeout: Duration::from_millis(100),
            },
        );
        w.directory.set_channel(ORIGIN, CHANNEL);
        w.platform.hang_on(TARGET);

        let summary = service
            .initiate_propagation(PropagationRequest::new(order(), [ORIGIN, TARGET]))
            .await;

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failure_count, 1);
        assert!(w
            .errors
            .reports()
            .iter()
            .any(|(_, text)| text.contains("timed out")));
    }
}
