//! # Override Precedence Through The Resolver
//!
//! Precedence cases exercised against a live resolver and permission
//! source rather than a hand-built snapshot.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gb_03_authorization::{
        AuthorizationApi, AuthorizationResolver, CommandId, Decision, OverrideTarget,
        PermissionOverride, StaticPermissionSource,
    };
    use proptest::prelude::*;
    use shared_types::{ChannelId, NodeId, Permission, PermissionSet, RoleId, UserId};

    const NODE: NodeId = NodeId(1);
    const OPERATOR: UserId = UserId(10);
    const CHANNEL: ChannelId = ChannelId(100);
    const MODS: RoleId = RoleId(7);

    fn gban() -> CommandId {
        CommandId::new("gban")
    }

    fn setup(permissions: &[Permission]) -> (Arc<StaticPermissionSource>, AuthorizationResolver) {
        let source = Arc::new(StaticPermissionSource::new());
        source.set_permissions(NODE, OPERATOR, PermissionSet::of(permissions));
        let resolver = AuthorizationResolver::new(source.clone());
        (source, resolver)
    }

    async fn decide(resolver: &AuthorizationResolver) -> Decision {
        resolver
            .decide(
                OPERATOR,
                NODE,
                &gban(),
                Some(Permission::BanMembers),
                Some(CHANNEL),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_baseline_beats_user_allow() {
        let (source, resolver) = setup(&[Permission::BanMembers]);
        source.set_overrides(
            NODE,
            &gban(),
            vec![PermissionOverride::allow(OverrideTarget::User(OPERATOR))],
        );

        assert_eq!(decide(&resolver).await, Decision::MissingBaseline);
    }

    #[tokio::test]
    async fn test_channel_deny_beats_user_allow() {
        let (source, resolver) = setup(&[Permission::UseApplicationCommands]);
        source.set_overrides(
            NODE,
            &gban(),
            vec![
                PermissionOverride::allow(OverrideTarget::User(OPERATOR)),
                PermissionOverride::deny(OverrideTarget::Channel(CHANNEL)),
            ],
        );

        assert_eq!(decide(&resolver).await, Decision::ChannelDenied);
    }

    #[tokio::test]
    async fn test_user_allow_beats_role_deny() {
        let (source, resolver) = setup(&[Permission::UseApplicationCommands]);
        source.set_roles(NODE, OPERATOR, [MODS]);
        source.set_overrides(
            NODE,
            &gban(),
            vec![
                PermissionOverride::deny(OverrideTarget::Role(MODS)),
                PermissionOverride::allow(OverrideTarget::User(OPERATOR)),
            ],
        );

        let decision = decide(&resolver).await;
        assert_eq!(decision, Decision::UserOverride(true));
        assert!(decision.allowed());
    }

    #[tokio::test]
    async fn test_channel_scoped_baseline_is_used() {
        let (source, resolver) = setup(&[Permission::UseApplicationCommands, Permission::BanMembers]);
        source.set_channel_permissions(NODE, OPERATOR, CHANNEL, PermissionSet::of(&[]));

        assert_eq!(decide(&resolver).await, Decision::MissingBaseline);
    }

    #[derive(Clone, Copy, Debug)]
    enum Rule {
        Channel(bool),
        AllChannels(bool),
        User(bool),
        Role(bool),
        Everyone(bool),
    }

    fn rule() -> impl Strategy<Value = Rule> {
        prop_oneof![
            any::<bool>().prop_map(Rule::Channel),
            any::<bool>().prop_map(Rule::AllChannels),
            any::<bool>().prop_map(Rule::User),
            any::<bool>().prop_map(Rule::Role),
            any::<bool>().prop_map(Rule::Everyone),
        ]
    }

    fn to_override(rule: Rule) -> PermissionOverride {
        let (target, enabled) = match rule {
            Rule::Channel(e) => (OverrideTarget::Channel(CHANNEL), e),
            Rule::AllChannels(e) => (OverrideTarget::AllChannels, e),
            Rule::User(e) => (OverrideTarget::User(OPERATOR), e),
            Rule::Role(e) => (OverrideTarget::Role(MODS), e),
            Rule::Everyone(e) => (OverrideTarget::Everyone, e),
        };
        if enabled {
            PermissionOverride::allow(target)
        } else {
            PermissionOverride::deny(target)
        }
    }

    proptest! {
        // A channel deny is final whatever else is configured, and nothing
        // passes without the baseline capability.
        #[test]
        fn prop_channel_deny_and_baseline_dominate(
            rules in prop::collection::vec(rule(), 0..6),
            baseline in any::<bool>(),
            ban_members in any::<bool>(),
        ) {
            let mut permissions = Vec::new();
            if baseline {
                permissions.push(Permission::UseApplicationCommands);
            }
            if ban_members {
                permissions.push(Permission::BanMembers);
            }
            let (source, resolver) = setup(&permissions);
            source.set_roles(NODE, OPERATOR, [MODS]);

            // One rule per target, like the platform stores them.
            let mut seen = Vec::new();
            let overrides: Vec<PermissionOverride> = rules
                .into_iter()
                .map(to_override)
                .filter(|o| {
                    let fresh = !seen.contains(&o.target);
                    seen.push(o.target);
                    fresh
                })
                .collect();
            source.set_overrides(NODE, &gban(), overrides.clone());

            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let decision = rt.block_on(decide(&resolver));

            let channel_rule = overrides
                .iter()
                .find(|o| o.target == OverrideTarget::Channel(CHANNEL))
                .or_else(|| overrides.iter().find(|o| o.target == OverrideTarget::AllChannels));

            if !baseline {
                prop_assert_eq!(decision, Decision::MissingBaseline);
            } else if channel_rule.is_some_and(|o| !o.enabled) {
                prop_assert_eq!(decision, Decision::ChannelDenied);
            } else {
                prop_assert!(decision != Decision::MissingBaseline);
                prop_assert!(decision != Decision::ChannelDenied);
            }
        }
    }
}
