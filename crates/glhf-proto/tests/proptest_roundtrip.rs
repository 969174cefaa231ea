//! Property-based tests for line parsing and command tokenizing.
//!
//! Uses proptest to generate random line components and verify that:
//! 1. Parsing never panics on arbitrary input
//! 2. Canonically reconstructed lines re-parse to the same structure
//! 3. Tag and permission invariants hold across random inputs

use glhf_proto::{BotCommand, ParsedMessage, Permission};
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9_]{1,25}").expect("valid regex")
}

fn hostname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(\\.[a-z0-9]+)*").expect("valid regex")
}

/// `nick!host` or a bare server host.
fn source_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        hostname_strategy(),
        (nickname_strategy(), nickname_strategy(), hostname_strategy())
            .prop_map(|(nick, user, host)| format!("{nick}!{user}@{host}")),
    ]
}

fn command_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z]{3,12}|[0-9]{3}").expect("valid regex")
}

fn channel_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("#?[a-z0-9_]{1,25}").expect("valid regex")
}

/// Trailing text: at least one byte, no line breaks.
fn parameters_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[^\r\n]{1,200}").expect("valid regex"),
        Just(":".to_string()),
        Just(" leading space".to_string()),
        Just("a;b=c @d :e".to_string()),
        Just("!cmd \"quoted arg\" bare".to_string()),
        Just("!cmd \"unterminated".to_string()),
    ]
}

fn bare_arg_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_.,'?-]{1,20}").expect("valid regex")
}

fn tag_key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9-]{0,20}").expect("valid regex")
}

/// Tag value: no spaces, semicolons or `=`.
fn tag_value_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9/,#_-]{0,30}").expect("valid regex")
}

fn canonical_line(
    source: Option<&str>,
    command: &str,
    channel: Option<&str>,
    parameters: Option<&str>,
) -> String {
    let mut line = String::new();
    if let Some(source) = source {
        line.push(':');
        line.push_str(source);
        line.push(' ');
    }
    line.push_str(command);
    if let Some(channel) = channel {
        line.push(' ');
        line.push_str(channel);
    }
    if let Some(parameters) = parameters {
        line.push_str(" :");
        line.push_str(parameters);
    }
    line
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Parsing must never panic, whatever the input.
    #[test]
    fn parse_never_panics(line in any::<String>()) {
        let _ = ParsedMessage::parse(&line);
    }

    /// Tokenizing must never panic or report an internal inconsistency.
    #[test]
    fn tokenize_never_stalls(text in any::<String>()) {
        prop_assert!(BotCommand::parse(&text).is_ok());
    }

    /// Components survive a trip through the canonical line form.
    #[test]
    fn canonical_line_roundtrip(
        source in prop::option::of(source_strategy()),
        command in command_strategy(),
        channel in prop::option::of(channel_strategy()),
        parameters in prop::option::of(parameters_strategy()),
    ) {
        let line = canonical_line(
            source.as_deref(),
            &command,
            channel.as_deref(),
            parameters.as_deref(),
        );
        // Declared before `msg` so it outlives the borrow unified with `msg`.
        let again: String;
        let msg = ParsedMessage::parse(&line).expect("canonical line should parse");

        prop_assert_eq!(msg.command.command, command.as_str());
        prop_assert_eq!(msg.command.channel, channel.as_deref());
        prop_assert_eq!(msg.parameters, parameters.as_deref());
        prop_assert_eq!(msg.source.map(|s| s.to_string()), source.clone());

        // Serializing the parsed form is a fixed point.
        again = msg.to_string();
        prop_assert_eq!(&again, &line);
        let reparsed = ParsedMessage::parse(&again).expect("reserialized line should parse");
        prop_assert_eq!(reparsed.command, msg.command);
        prop_assert_eq!(reparsed.source, msg.source);
        prop_assert_eq!(reparsed.parameters, msg.parameters);
        prop_assert_eq!(reparsed.bot_command, msg.bot_command);
    }

    /// Without a leading `@` there are no tags and no permissions.
    #[test]
    fn untagged_lines_have_no_permissions(
        source in prop::option::of(source_strategy()),
        command in command_strategy(),
        parameters in prop::option::of(parameters_strategy()),
    ) {
        let line = canonical_line(source.as_deref(), &command, None, parameters.as_deref());
        let msg = ParsedMessage::parse(&line).expect("line should parse");
        prop_assert!(msg.tags.is_none());
        prop_assert_eq!(msg.permissions, Permission::None);
    }

    /// Every well-formed tag pair comes back exactly as given.
    #[test]
    fn tags_are_extracted_verbatim(
        pairs in prop::collection::btree_map(tag_key_strategy(), tag_value_strategy(), 1..8),
    ) {
        let block: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        let line = format!("@{} :n!n@h PRIVMSG #c :hi", block.join(";"));
        let msg = ParsedMessage::parse(&line).expect("tagged line should parse");
        let tags = msg.tags.expect("tags present");
        prop_assert_eq!(tags.len(), pairs.len());
        for (key, value) in &pairs {
            prop_assert_eq!(tags.get(key), Some(value.as_str()));
        }
    }

    /// `broadcaster` anywhere in badges wins over `moderator`.
    #[test]
    fn broadcaster_badge_takes_precedence(
        prefix in prop::string::string_regex("[a-z/0-9,]{0,20}").expect("valid regex"),
        with_moderator in any::<bool>(),
    ) {
        let badges = if with_moderator {
            format!("{prefix}moderator/1,broadcaster/1")
        } else {
            format!("broadcaster/1,{prefix}")
        };
        let line = format!("@badges={badges} :n!n@h PRIVMSG #c :hi");
        let msg = ParsedMessage::parse(&line).expect("line should parse");
        prop_assert_eq!(msg.permissions, Permission::Broadcaster);
    }

    /// Bare arguments come back in order.
    #[test]
    fn bare_args_in_order(
        name in bare_arg_strategy(),
        args in prop::collection::vec(bare_arg_strategy(), 0..10),
    ) {
        let mut text = format!("!{name}");
        for arg in &args {
            text.push(' ');
            text.push_str(arg);
        }
        let cmd = BotCommand::parse(&text).unwrap().expect("is a command");
        prop_assert_eq!(cmd.name, name.as_str());
        let got: Vec<&str> = cmd.args.iter().copied().collect();
        let want: Vec<&str> = args.iter().map(String::as_str).collect();
        prop_assert_eq!(got, want);
    }

    /// A quoted argument keeps its inner spaces.
    #[test]
    fn quoted_arg_keeps_spaces(
        words in prop::collection::vec(bare_arg_strategy(), 1..5),
        tail in bare_arg_strategy(),
    ) {
        let quoted = words.join(" ");
        let text = format!("!say \"{quoted}\" {tail}");
        let cmd = BotCommand::parse(&text).unwrap().expect("is a command");
        prop_assert_eq!(cmd.args.as_slice(), &[quoted.as_str(), tail.as_str()]);
    }
}
