//! Notice texts posted to notification channels and replies to operators.

use super::requests::{AlertRequest, BanOrder};
use shared_types::{Actor, NodeRef};

/// Generic apology shown when an operation failed unexpectedly.
pub const GENERIC_ERROR_REPLY: &str = "An error occurred while running this command.";

fn ban_header(order: &BanOrder) -> String {
    format!(
        ":hammer: Global ban issued by {} ({}) from *{}* for {} ({}): {}",
        order.issuer.mention(),
        order.issuer.name,
        order.origin.name,
        order.target_user.mention(),
        order.target_user.name,
        order.reason
    )
}

/// Ban applied automatically.
pub fn ban_applied(order: &BanOrder) -> String {
    format!(
        "{}\n - :white_check_mark: This ban has been automatically applied in your server.",
        ban_header(order)
    )
}

/// Ban attempted but failed; carries the "apply" control.
pub fn ban_failed(order: &BanOrder) -> String {
    format!(
        "{}\n - :warning: This ban has **not** been automatically applied in your server because \
         an error occurred when trying to apply the ban. Check that the bot has the ban members \
         permission. You can try to apply the ban again by clicking the below button.",
        ban_header(order)
    )
}

/// Origin not trusted; carries "apply" and "apply and trust" controls.
pub fn ban_not_trusted(order: &BanOrder) -> String {
    format!(
        "{}\n - :warning: This ban has **not** been automatically applied in your server because \
         the origin server is not on your trusted server list. You can use the buttons below to \
         apply the ban, or to apply it and trust the origin server so future bans issued from \
         there are automatically applied in your server as well.",
        ban_header(order)
    )
}

/// Global alert about a user.
pub fn alert(request: &AlertRequest) -> String {
    format!(
        ":loudspeaker: Global alert issued by {} ({}) from *{}* about {} ({}): {}",
        request.issuer.mention(),
        request.issuer.name,
        request.origin.name,
        request.target_user.mention(),
        request.target_user.name,
        request.message
    )
}

/// The bot joined a new node.
pub fn new_node(node: &NodeRef, auto_trusted: bool) -> String {
    let mut msg = format!(
        ":information_source: The bot has been added to a new server: {}",
        node
    );
    if auto_trusted {
        msg.push_str(
            "\nSince you have enabled the option to trust new servers by default, this server has \
             been added to your trusted list. Global bans issued from this server will be \
             automatically applied in your server as well.",
        );
    } else {
        msg.push_str(
            "\nIf you wish to automatically apply global bans issued from this server here, add \
             it to your trusted server list by pressing the button below.",
        );
    }
    msg
}

/// Reply after a manual "apply" click.
pub fn ban_applied_manually(operator: &Actor) -> String {
    format!("Ban successfully applied manually by {}.", operator.mention())
}

/// Reply after a manual "apply and trust" click.
pub fn ban_applied_and_trusted(operator: &Actor) -> String {
    format!(
        "Ban successfully applied manually by {}. The origin server has also been added to the \
         trusted server list.",
        operator.mention()
    )
}

/// Reply after a "trust server" click.
pub const NODE_TRUSTED: &str = "Successfully added the new server to the trusted server list.";
