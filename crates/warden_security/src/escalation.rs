//! # Escalation Policy
//!
//! Maps a player's violation count to a kick or a ban and hands the action
//! to the host session layer.
//!
//! The ledger is always updated before the session layer is called. A
//! failed kick or ban is logged and dropped; it is never retried.

use crate::config::WardenConfig;
use crate::error::SessionError;
use crate::source::PlayerId;

/// Reason attached to every ban.
pub const BAN_REASON: &str = "WARDEN: Multiple violations detected";

/// Prefix of every kick reason.
pub const KICK_PREFIX: &str = "WARDEN: ";

/// Action taken in response to a violation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EscalationAction {
    /// Recorded only.
    #[default]
    None,
    /// Player was kicked.
    Kicked,
    /// Player was permanently banned.
    Banned,
}

/// Kick/ban interface implemented by the host.
pub trait SessionControl: Send + Sync {
    /// Disconnects a player with a reason.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the host could not kick.
    fn kick(&self, player: PlayerId, reason: &str) -> Result<(), SessionError>;

    /// Permanently bans a player.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the host could not ban.
    fn ban(&self, player: PlayerId, reason: &str) -> Result<(), SessionError>;
}

/// Count-based kick/ban policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscalationPolicy {
    violations_before_ban: u32,
    kick_on_violation: bool,
}

impl EscalationPolicy {
    /// Creates a policy.
    #[must_use]
    pub const fn new(violations_before_ban: u32, kick_on_violation: bool) -> Self {
        Self {
            violations_before_ban,
            kick_on_violation,
        }
    }

    /// Policy described by the config.
    #[must_use]
    pub const fn from_config(config: &WardenConfig) -> Self {
        Self::new(config.violations_before_ban, config.kick_on_violation)
    }

    /// Chooses the action for a player now at `violation_count`.
    ///
    /// The ban fires once, on the first report at or above the threshold.
    /// A banned player is never kicked or banned again.
    #[must_use]
    pub const fn decide(&self, violation_count: u32, already_banned: bool) -> EscalationAction {
        if already_banned {
            EscalationAction::None
        } else if violation_count >= self.violations_before_ban {
            EscalationAction::Banned
        } else if self.kick_on_violation {
            EscalationAction::Kicked
        } else {
            EscalationAction::None
        }
    }

    /// Carries out `action` against the session layer.
    pub fn enforce<S: SessionControl + ?Sized>(
        &self,
        session: &S,
        player: PlayerId,
        action: EscalationAction,
        description: &str,
    ) {
        let result = match action {
            EscalationAction::None => return,
            EscalationAction::Kicked => session.kick(player, &format!("{KICK_PREFIX}{description}")),
            EscalationAction::Banned => session.ban(player, BAN_REASON),
        };

        if let Err(err) = result {
            tracing::warn!(player, ?action, "Escalation failed, not retrying: {}", err);
        }
    }
}
