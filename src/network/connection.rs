//! One chat session, from login to disconnect.
//!
//! ```text
//!    ┌──────────── Session ─────────────────────────────┐
//!    │  Framed<T, LineCodec>        mpsc::Receiver      │
//!    │        │ lines                     ▲ Outgoing    │
//!    │        ▼                           │             │
//!    │   tokio::select! ──► parse ──► Registry ─────────┘
//!    │        │                                         │
//!    │        └─ PING → PONG, RECONNECT → end session   │
//!    └──────────────────────────────────────────────────┘
//! ```
//!
//! The session is generic over its transport so tests can drive it through
//! an in-memory duplex pipe.

use crate::config::Config;
use crate::error::HandlerError;
use crate::handlers::{Context, Registry, Shared};
use futures_util::{SinkExt, StreamExt};
use glhf_proto::{LineCodec, Outgoing, ParsedMessage, ProtocolError};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// NOTICE texts Twitch sends when the token is rejected.
const LOGIN_FAILURES: [&str; 2] = [
    "Login authentication failed",
    "Improperly formatted auth",
];

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("login rejected: {0}")]
    LoginFailed(String),
}

impl SessionError {
    /// True if retrying with the same credentials cannot help.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::LoginFailed(_))
    }
}

/// Why a session ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server sent RECONNECT.
    Reconnect,
    /// The server closed the stream.
    Disconnected,
}

enum LineAction {
    Continue,
    End(SessionEnd),
}

/// A connection to the chat server.
pub struct Connection<'a> {
    config: &'a Config,
    shared: &'a Shared,
    registry: &'a Registry,
}

impl<'a> Connection<'a> {
    pub fn new(config: &'a Config, shared: &'a Shared, registry: &'a Registry) -> Self {
        Self {
            config,
            shared,
            registry,
        }
    }

    /// Connect over TCP and run one session.
    pub async fn connect(&self) -> Result<SessionEnd, SessionError> {
        let addr = self.config.server.address();
        info!(addr = %addr, "Connecting");
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| SessionError::Connect {
                addr: addr.clone(),
                source,
            })?;
        if let Err(e) = stream.set_nodelay(true) {
            debug!(error = %e, "Failed to set TCP_NODELAY");
        }
        self.run(stream).await
    }

    /// Log in and process lines until the session ends.
    pub async fn run<T>(&self, stream: T) -> Result<SessionEnd, SessionError>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        let mut framed = Framed::new(
            stream,
            LineCodec::with_max_len(self.config.limits.max_line_len),
        );
        self.register(&mut framed).await?;

        let (outgoing_tx, mut outgoing_rx) =
            mpsc::channel::<Outgoing>(self.config.limits.outgoing_queue);

        info!("Entering event loop");

        loop {
            tokio::select! {
                result = framed.next() => {
                    let line = match result {
                        Some(Ok(line)) => line,
                        Some(Err(e)) => {
                            warn!(error = %e, "Read error");
                            return Err(e.into());
                        }
                        None => {
                            info!("Server closed the connection");
                            return Ok(SessionEnd::Disconnected);
                        }
                    };

                    if let LineAction::End(end) =
                        self.handle_line(&line, &mut framed, &outgoing_tx).await?
                    {
                        return Ok(end);
                    }

                    // Handlers queue at most a few lines each; flush them
                    // before reading again so the queue never backs up.
                    while let Ok(msg) = outgoing_rx.try_recv() {
                        send(&mut framed, msg).await?;
                    }
                }

                Some(msg) = outgoing_rx.recv() => {
                    send(&mut framed, msg).await?;
                }
            }
        }
    }

    async fn register<T>(&self, framed: &mut Framed<T, LineCodec>) -> Result<(), SessionError>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        let identity = &self.config.identity;
        send(framed, Outgoing::Pass(oauth_pass(&identity.token))).await?;
        send(framed, Outgoing::Nick(identity.nick.to_ascii_lowercase())).await?;
        if !self.config.bot.capabilities.is_empty() {
            send(framed, Outgoing::CapReq(self.config.bot.capabilities.clone())).await?;
        }
        for channel in &self.config.bot.channels {
            send(framed, Outgoing::Join(channel.to_ascii_lowercase())).await?;
        }
        Ok(())
    }

    async fn handle_line<T>(
        &self,
        line: &str,
        framed: &mut Framed<T, LineCodec>,
        outgoing_tx: &mpsc::Sender<Outgoing>,
    ) -> Result<LineAction, SessionError>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        debug!(raw = %line, "<<");

        let msg = match ParsedMessage::parse(line) {
            Ok(msg) => msg,
            Err(cause) => {
                let kind = cause.kind();
                let err = ProtocolError::InvalidMessage {
                    string: line.to_owned(),
                    cause,
                };
                warn!(kind, error = ?err, "Unparseable line");
                return Ok(LineAction::Continue);
            }
        };

        match msg.command_name() {
            "PING" => {
                let server = msg.parameters.unwrap_or("tmi.twitch.tv");
                send(framed, Outgoing::Pong(server.to_owned())).await?;
            }
            "RECONNECT" => {
                info!("Server requested reconnect");
                return Ok(LineAction::End(SessionEnd::Reconnect));
            }
            "001" => {
                info!(nick = msg.channel().unwrap_or_default(), "Logged in");
            }
            "JOIN" => {
                let own = msg
                    .source_nickname()
                    .is_some_and(|nick| nick.eq_ignore_ascii_case(&self.config.identity.nick));
                if own {
                    info!(channel = msg.channel().unwrap_or_default(), "Joined channel");
                }
            }
            "NOTICE" => {
                let text = msg.parameters.unwrap_or_default();
                if LOGIN_FAILURES.iter().any(|failure| text.contains(failure)) {
                    return Err(SessionError::LoginFailed(text.to_owned()));
                }
                info!(channel = msg.channel().unwrap_or_default(), notice = %text, "Notice");
            }
            "PRIVMSG" => {
                if let Some(cmd) = &msg.bot_command {
                    let Some(ctx) =
                        Context::from_message(&msg, outgoing_tx, self.shared, self.registry)
                    else {
                        debug!(raw = %line, "Command without channel or sender");
                        return Ok(LineAction::Continue);
                    };
                    if let Err(e) = self.registry.dispatch(&ctx, cmd).await {
                        warn!(error = %e, code = e.error_code(), "Command dispatch failed");
                        if let HandlerError::Send(_) = e {
                            return Ok(LineAction::End(SessionEnd::Disconnected));
                        }
                    }
                }
            }
            _ => {}
        }

        Ok(LineAction::Continue)
    }
}

/// Twitch expects the token as `oauth:<token>`.
fn oauth_pass(token: &str) -> String {
    if token.starts_with("oauth:") {
        token.to_owned()
    } else {
        format!("oauth:{token}")
    }
}

async fn send<T>(framed: &mut Framed<T, LineCodec>, msg: Outgoing) -> Result<(), SessionError>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    debug!(line = %msg.redacted(), ">>");
    framed.send(msg).await.map_err(|e| {
        warn!(error = %e, "Write error");
        SessionError::from(e)
    })
}
