//! Bot command recognition.
//!
//! A message is a command invocation when its first entity is a bot-command
//! entity starting at offset 0. Only the first entity is examined.
//!
//! # Example
//!
//! ```rust,ignore
//! let entities = [MessageEntity::new(EntityKind::BotCommand, 0, 6)];
//! let cmd = parse_command("/start hello world", &entities).unwrap();
//! assert_eq!(cmd.name(), "start");
//! assert_eq!(cmd.args(), ["hello", "world"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::{MessageEntity, utf16_slice};

/// A recognised command and its arguments.
///
/// `args` always holds at least one element. A bare `/start` yields `[""]`,
/// which callers treat as "no arguments" (see [`BotCommand::has_args`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotCommand {
    name: String,
    args: Vec<String>,
}

impl BotCommand {
    /// The command name without the leading `/` (may include `@botname`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments split on single spaces; empty tokens are preserved.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// `false` when nothing but the command was sent.
    pub fn has_args(&self) -> bool {
        self.args.iter().any(|arg| !arg.is_empty())
    }

    /// Name with any `@botname` suffix stripped.
    pub fn base_name(&self) -> &str {
        self.name
            .split_once('@')
            .map_or(self.name.as_str(), |(base, _)| base)
    }

    /// The `@botname` suffix, if any.
    pub fn addressee(&self) -> Option<&str> {
        self.name.split_once('@').map(|(_, bot)| bot)
    }

    /// Name followed by the non-empty arguments, ready for argument parsers.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.base_name().to_owned())
            .chain(self.args.iter().filter(|arg| !arg.is_empty()).cloned())
            .collect()
    }
}

/// Recognises a command in `text`.
///
/// Returns `None` if `entities` is empty or the first entity is not a
/// bot-command entity at offset 0. Positions past the end of `text` clamp to
/// the end.
pub fn parse_command(text: &str, entities: &[MessageEntity]) -> Option<BotCommand> {
    let first = entities.first()?;
    if !first.is_bot_command() || first.offset != 0 {
        return None;
    }

    let name = utf16_slice(text, 1, Some(first.length));
    let rest = utf16_slice(text, first.length.saturating_add(1), None);
    let args = rest.split(' ').map(str::to_owned).collect();

    Some(BotCommand { name, args })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    fn cmd(length: usize) -> Vec<MessageEntity> {
        vec![MessageEntity::new(EntityKind::BotCommand, 0, length)]
    }

    #[test]
    fn test_command_with_args() {
        let parsed = parse_command("/start hello world", &cmd(6)).unwrap();
        assert_eq!(parsed.name(), "start");
        assert_eq!(parsed.args(), ["hello", "world"]);
        assert!(parsed.has_args());
    }

    #[test]
    fn test_bare_command_has_single_empty_arg() {
        let parsed = parse_command("/start", &cmd(6)).unwrap();
        assert_eq!(parsed.name(), "start");
        assert_eq!(parsed.args(), [""]);
        assert!(!parsed.has_args());
        assert_eq!(parsed.argv(), vec!["start"]);
    }

    #[test]
    fn test_double_space_keeps_empty_token() {
        let parsed = parse_command("/echo a  b", &cmd(5)).unwrap();
        assert_eq!(parsed.args(), ["a", "", "b"]);
        assert_eq!(parsed.argv(), vec!["echo", "a", "b"]);
    }

    #[test]
    fn test_no_entities() {
        assert!(parse_command("/start", &[]).is_none());
    }

    #[test]
    fn test_first_entity_only() {
        let entities = vec![
            MessageEntity::new(EntityKind::Bold, 0, 2),
            MessageEntity::new(EntityKind::BotCommand, 0, 6),
        ];
        assert!(parse_command("/start", &entities).is_none());
    }

    #[test]
    fn test_nonzero_offset() {
        let entities = vec![MessageEntity::new(EntityKind::BotCommand, 3, 6)];
        assert!(parse_command("hi /start", &entities).is_none());
    }

    #[test]
    fn test_utf16_positions() {
        // The emoji takes two code units, so the command spans 7 units.
        let parsed = parse_command("/a😀bcd x😀y", &cmd(7)).unwrap();
        assert_eq!(parsed.name(), "a😀bcd");
        assert_eq!(parsed.args(), ["x😀y"]);
    }

    #[test]
    fn test_length_past_end_clamps() {
        let parsed = parse_command("/go", &cmd(40)).unwrap();
        assert_eq!(parsed.name(), "go");
        assert_eq!(parsed.args(), [""]);
    }

    #[test]
    fn test_addressed_command() {
        let parsed = parse_command("/help@my_bot now", &cmd(12)).unwrap();
        assert_eq!(parsed.name(), "help@my_bot");
        assert_eq!(parsed.base_name(), "help");
        assert_eq!(parsed.addressee(), Some("my_bot"));
        assert_eq!(parsed.argv(), vec!["help", "now"]);
    }
}
