//! Unified error handling for glhf.
//!
//! Handler errors carry enough detail to produce a chat reply and a static
//! label for logs.

use glhf_proto::{Outgoing, Permission};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::store::StoreError;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters, usage: {usage}")]
    NeedMoreParams { usage: &'static str },

    #[error("requires {required:?}, sender has {granted:?}")]
    PermissionDenied {
        required: Permission,
        granted: Permission,
    },

    #[error("no such command: {0}")]
    NoSuchCommand(String),

    #[error("command already exists: {0}")]
    CommandExists(String),

    #[error("name is reserved for a built-in command: {0}")]
    ReservedName(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Outgoing>),
}

impl HandlerError {
    /// Get a static error code string for log labelling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams { .. } => "need_more_params",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::NoSuchCommand(_) => "no_such_command",
            Self::CommandExists(_) => "command_exists",
            Self::ReservedName(_) => "reserved_name",
            Self::Store(_) => "store_error",
            Self::Send(_) => "send_error",
        }
    }

    /// Text to post back to chat, addressed to `user`.
    ///
    /// Returns `None` for errors that don't warrant a visible reply
    /// (permission failures are silent so viewers can't probe for them).
    pub fn to_chat_reply(&self, user: &str, cmd_name: &str) -> Option<String> {
        let text = match self {
            Self::NeedMoreParams { usage } => format!("@{user} usage: !{cmd_name} {usage}"),
            Self::NoSuchCommand(name) => format!("@{user} there is no !{name} command"),
            Self::CommandExists(name) => {
                format!("@{user} !{name} already exists, use !editcmd to change it")
            }
            Self::ReservedName(name) => format!("@{user} !{name} is a built-in command"),
            Self::Store(_) => format!("@{user} could not save commands, try again later"),

            Self::PermissionDenied { .. } => return None,
            Self::Send(_) => return None,
        };
        Some(text)
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            HandlerError::NeedMoreParams { usage: "<name>" }.error_code(),
            "need_more_params"
        );
        assert_eq!(
            HandlerError::NoSuchCommand("x".into()).error_code(),
            "no_such_command"
        );
    }

    #[test]
    fn test_chat_replies() {
        let err = HandlerError::NeedMoreParams {
            usage: "<name> <response...>",
        };
        assert_eq!(
            err.to_chat_reply("Mod", "addcmd").as_deref(),
            Some("@Mod usage: !addcmd <name> <response...>")
        );

        let err = HandlerError::PermissionDenied {
            required: Permission::Moderator,
            granted: Permission::None,
        };
        assert!(err.to_chat_reply("viewer", "addcmd").is_none());
    }
}
