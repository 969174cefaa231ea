//! Moderator commands that manage the custom command store.
//!
//! Every change is saved to disk before the confirmation is posted. The
//! store is serialized under its lock; the file is written after the lock is
//! released, and the change is undone if that write fails.

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::store::{Snapshot, StoreError};
use async_trait::async_trait;
use glhf_proto::{BotCommand, Permission};
use tracing::info;

const DEFINE_USAGE: &str = "<name> <response...>";

/// Name and response text of `!addcmd` / `!editcmd`, after checks shared
/// by both.
fn definition(ctx: &Context<'_>, cmd: &BotCommand<'_>) -> Result<(String, String), HandlerError> {
    let (Some(name), Some(_)) = (cmd.arg(0), cmd.arg(1)) else {
        return Err(HandlerError::NeedMoreParams {
            usage: DEFINE_USAGE,
        });
    };
    let name = name.trim_start_matches('!').to_ascii_lowercase();
    if name.is_empty() {
        return Err(HandlerError::NeedMoreParams {
            usage: DEFINE_USAGE,
        });
    }
    if ctx.registry.is_builtin(&name) {
        return Err(HandlerError::ReservedName(name));
    }
    Ok((name, cmd.args[1..].join(" ")))
}

async fn persist(snapshot: Result<Snapshot, StoreError>) -> Result<(), StoreError> {
    snapshot?.write_async().await
}

/// `!addcmd <name> <response...>` defines a new command.
pub struct AddCmdHandler;

#[async_trait]
impl Handler for AddCmdHandler {
    async fn handle(&self, ctx: &Context<'_>, cmd: &BotCommand<'_>) -> HandlerResult {
        let (name, response) = definition(ctx, cmd)?;
        let snapshot = {
            let mut store = ctx.shared.store.write();
            if store.contains(&name) {
                return Err(HandlerError::CommandExists(name));
            }
            store.insert(&name, response);
            store.snapshot()
        };
        if let Err(e) = persist(snapshot).await {
            ctx.shared.store.write().remove(&name);
            return Err(e.into());
        }

        info!(command = %name, by = ctx.user, channel = ctx.channel, "Custom command added");
        ctx.reply(format!("@{} added !{}", ctx.user, name)).await
    }

    fn permission(&self) -> Permission {
        Permission::Moderator
    }
}

/// `!editcmd <name> <response...>` replaces an existing command's response.
pub struct EditCmdHandler;

#[async_trait]
impl Handler for EditCmdHandler {
    async fn handle(&self, ctx: &Context<'_>, cmd: &BotCommand<'_>) -> HandlerResult {
        let (name, response) = definition(ctx, cmd)?;
        let (previous, snapshot) = {
            let mut store = ctx.shared.store.write();
            let Some(previous) = store.insert(&name, response) else {
                store.remove(&name);
                return Err(HandlerError::NoSuchCommand(name));
            };
            (previous, store.snapshot())
        };
        if let Err(e) = persist(snapshot).await {
            ctx.shared.store.write().insert(&name, previous);
            return Err(e.into());
        }

        info!(command = %name, by = ctx.user, channel = ctx.channel, "Custom command edited");
        ctx.reply(format!("@{} updated !{}", ctx.user, name)).await
    }

    fn permission(&self) -> Permission {
        Permission::Moderator
    }
}

/// `!delcmd <name>` removes a command.
pub struct DelCmdHandler;

#[async_trait]
impl Handler for DelCmdHandler {
    async fn handle(&self, ctx: &Context<'_>, cmd: &BotCommand<'_>) -> HandlerResult {
        let Some(name) = cmd.arg(0) else {
            return Err(HandlerError::NeedMoreParams { usage: "<name>" });
        };
        let name = name.trim_start_matches('!').to_ascii_lowercase();
        let (previous, snapshot) = {
            let mut store = ctx.shared.store.write();
            let Some(previous) = store.remove(&name) else {
                return Err(HandlerError::NoSuchCommand(name));
            };
            (previous, store.snapshot())
        };
        if let Err(e) = persist(snapshot).await {
            ctx.shared.store.write().insert(&name, previous);
            return Err(e.into());
        }

        info!(command = %name, by = ctx.user, channel = ctx.channel, "Custom command deleted");
        ctx.reply(format!("@{} removed !{}", ctx.user, name)).await
    }

    fn permission(&self) -> Permission {
        Permission::Moderator
    }
}
