//! Default value functions for configuration.

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_host() -> String {
    "irc.chat.twitch.tv".to_string()
}

pub fn default_port() -> u16 {
    6667
}

// =============================================================================
// Bot Defaults
// =============================================================================

pub fn default_commands_file() -> String {
    "commands.toml".to_string()
}

pub fn default_capabilities() -> Vec<String> {
    vec!["twitch.tv/tags".to_string(), "twitch.tv/commands".to_string()]
}

// =============================================================================
// Limits Defaults
// =============================================================================

pub fn default_max_line_len() -> usize {
    glhf_proto::DEFAULT_MAX_LINE_LEN
}

pub fn default_outgoing_queue() -> usize {
    64
}

pub fn default_reconnect_delay_secs() -> u64 {
    5
}
