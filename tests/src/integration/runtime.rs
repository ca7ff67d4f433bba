//! # Runtime Flows
//!
//! The assembled service container driven through the operator command
//! handlers, the way the bot binary drives it.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gb_01_trust_graph::TrustApi;
    use gb_03_authorization::StaticPermissionSource;
    use gb_04_propagation::{
        ControlInvocation, FallbackAction, FallbackOutcome, RecordingChatPlatform,
    };
    use gb_05_node_registry::InMemoryWhitelistStore;
    use gban_runtime::{CommandContext, CommandHandler, RuntimeConfig, ServiceContainer, Stores};
    use shared_types::{Actor, ChannelId, NodeId, NodeRef, Permission, PermissionSet, UserId};
    use tokio::sync::watch;

    const MAIN: NodeId = NodeId(1);
    const B: NodeId = NodeId(2);
    const C: NodeId = NodeId(3);
    const MODERATOR: UserId = UserId(50);

    struct Bot {
        platform: Arc<RecordingChatPlatform>,
        permissions: Arc<StaticPermissionSource>,
        container: Arc<ServiceContainer>,
        commands: CommandHandler,
        shutdown: watch::Receiver<bool>,
    }

    async fn bot() -> Bot {
        let platform = Arc::new(RecordingChatPlatform::new());
        for (id, name) in [(MAIN, "Main"), (B, "Bravo"), (C, "Charlie")] {
            platform.add_node(NodeRef::new(id, name));
        }
        let permissions = Arc::new(StaticPermissionSource::new());

        let mut config = RuntimeConfig::default();
        config.bot.main_node_id = MAIN;
        let stores = Stores {
            whitelist: Arc::new(InMemoryWhitelistStore::with_nodes([B, C])),
            ..Stores::in_memory()
        };
        let (tx, rx) = watch::channel(false);
        let container = Arc::new(
            ServiceContainer::build(config, stores, platform.clone(), permissions.clone(), tx)
                .await
                .unwrap(),
        );
        for (node, channel) in [(B, ChannelId(200)), (C, ChannelId(300))] {
            container
                .settings
                .set_notification_channel(node, Some(channel))
                .await
                .unwrap();
        }

        Bot {
            platform,
            permissions,
            commands: CommandHandler::new(container.clone()),
            container,
            shutdown: rx,
        }
    }

    fn on_bravo() -> CommandContext {
        CommandContext {
            node: NodeRef::new(B, "Bravo"),
            channel: ChannelId(201),
            operator: Actor::new(UserId(20), "bravo-admin"),
        }
    }

    #[tokio::test]
    async fn test_untrusting_node_gets_controls_then_trusts_through_them() {
        let bot = bot().await;

        let reply = bot
            .commands
            .global_ban(&on_bravo(), Actor::new(UserId(666), "spammer"), "raid")
            .await;
        assert!(reply.contains("across **1** server."));
        assert!(reply.contains("1 server did not automatically apply the ban"));
        assert_eq!(bot.platform.banned_on(UserId(666)), [B].into());

        let notice = bot.platform.messages_in(C).remove(0);
        assert_eq!(notice.channel, ChannelId(300));
        assert_eq!(notice.message.controls.len(), 2);
        let apply_and_trust = notice.message.controls[1].action.clone().unwrap();
        assert!(matches!(apply_and_trust, FallbackAction::ApplyBanAndTrust(_)));

        bot.permissions.set_permissions(
            C,
            MODERATOR,
            PermissionSet::of(&[
                Permission::UseApplicationCommands,
                Permission::BanMembers,
                Permission::ManageServer,
            ]),
        );
        let outcome = bot
            .commands
            .on_control_invoked(ControlInvocation {
                node: C,
                channel: notice.channel,
                message: notice.id,
                operator: Actor::new(MODERATOR, "charlie-mod"),
                action: apply_and_trust,
            })
            .await;
        assert_eq!(outcome, FallbackOutcome::Completed);
        assert!(bot.container.trust.trusts(C, B));
        assert_eq!(bot.platform.banned_on(UserId(666)), [B, C].into());

        let reply = bot
            .commands
            .global_ban(&on_bravo(), Actor::new(UserId(667), "spammer-alt"), "raid")
            .await;
        assert!(reply.contains("across **2** servers."));
        assert_eq!(bot.platform.banned_on(UserId(667)), [B, C].into());
        assert!(!*bot.shutdown.borrow());
    }

    #[tokio::test]
    async fn test_main_node_without_channel_counts_as_failure() {
        let bot = bot().await;

        let reply = bot
            .commands
            .global_ban(&on_bravo(), Actor::new(UserId(666), "spammer"), "raid")
            .await;

        // Main does not trust Bravo and has no notification channel.
        assert!(reply.contains("1 server failed to apply the ban and did not receive"));
        assert!(bot.platform.messages_in(MAIN).is_empty());
    }

    #[tokio::test]
    async fn test_trusted_command_then_gban_is_automatic() {
        let bot = bot().await;
        let on_charlie = CommandContext {
            node: NodeRef::new(C, "Charlie"),
            channel: ChannelId(301),
            operator: Actor::new(UserId(30), "charlie-admin"),
        };

        bot.commands.trusted_add(&on_charlie, "2").await;
        assert!(bot.container.trust.trusts(C, B));

        let reply = bot
            .commands
            .global_ban(&on_bravo(), Actor::new(UserId(666), "spammer"), "raid")
            .await;
        assert!(reply.contains("across **2** servers."));
        assert!(bot.platform.messages_in(C)[0].message.controls.is_empty());
    }
}
