//! Message tags and the permission level derived from them.

use std::borrow::Cow;
use std::collections::HashMap;

/// Key/value tags from the leading `@...` block of a line.
///
/// Keys and values borrow from the parsed line. Values are kept exactly as
/// they appeared on the wire; use [`unescape_tag_value`] for display text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tags<'a> {
    map: HashMap<&'a str, &'a str>,
}

impl<'a> Tags<'a> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a tag. A repeated key replaces the earlier value.
    pub(crate) fn insert(&mut self, key: &'a str, value: &'a str) {
        self.map.insert(key, value);
    }

    /// Raw value of `key`, if present.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.map.get(key).copied()
    }

    /// Check if a tag exists (regardless of value).
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Number of distinct tag keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if the block held no tags.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over all tags as (key, value) pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.map.iter().map(|(k, v)| (*k, *v))
    }

    /// The `badges` tag, e.g. `broadcaster/1,subscriber/0`.
    #[inline]
    pub fn badges(&self) -> Option<&'a str> {
        self.get("badges")
    }

    /// The `display-name` tag, if present and non-empty.
    pub fn display_name(&self) -> Option<&'a str> {
        self.get("display-name").filter(|name| !name.is_empty())
    }

    /// The `id` tag: the unique id of a chat message.
    #[inline]
    pub fn msg_id(&self) -> Option<&'a str> {
        self.get("id")
    }

    /// The `user-id` tag of the sender.
    #[inline]
    pub fn user_id(&self) -> Option<&'a str> {
        self.get("user-id")
    }

    /// Permission level granted by the `badges` tag.
    pub fn permission(&self) -> Permission {
        self.badges()
            .map(Permission::from_badges)
            .unwrap_or_default()
    }
}

/// What a chat user is allowed to do, as derived from their badges.
///
/// Ordered so that `Broadcaster > Moderator > None`, which lets callers
/// write `granted >= required`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    /// Regular viewer.
    #[default]
    None,
    /// Channel moderator.
    Moderator,
    /// Channel owner.
    Broadcaster,
}

impl Permission {
    /// Classify a raw `badges` value.
    ///
    /// `broadcaster` wins over `moderator` when both appear.
    ///
    /// ```
    /// use glhf_proto::Permission;
    ///
    /// assert_eq!(Permission::from_badges("moderator/1,broadcaster/1"), Permission::Broadcaster);
    /// assert_eq!(Permission::from_badges("moderator/1"), Permission::Moderator);
    /// assert_eq!(Permission::from_badges("subscriber/12"), Permission::None);
    /// ```
    pub fn from_badges(badges: &str) -> Self {
        if badges.contains("broadcaster") {
            Permission::Broadcaster
        } else if badges.contains("moderator") {
            Permission::Moderator
        } else {
            Permission::None
        }
    }

    /// Lower-case name used in logs and replies.
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::None => "none",
            Permission::Moderator => "moderator",
            Permission::Broadcaster => "broadcaster",
        }
    }
}

/// Unescape an IRCv3 tag value (`\:` `\s` `\\` `\r` `\n`).
///
/// Borrows when there is nothing to unescape. Unknown escapes drop the
/// backslash and a trailing lone backslash is removed.
pub fn unescape_tag_value(value: &str) -> Cow<'_, str> {
    if !value.contains('\\') {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(':') => out.push(';'),
            Some('s') => out.push(' '),
            Some('\\') => out.push('\\'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    Cow::Owned(out)
}
