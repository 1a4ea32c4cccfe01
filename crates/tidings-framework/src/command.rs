//! Typed command parsing using clap.
//!
//! A recognised [`BotCommand`](tidings_core::BotCommand) carries its
//! arguments as plain strings. This module feeds them to a `clap::Parser`
//! so routes can accept only well-formed invocations.
//!
//! # Example
//!
//! ```rust,ignore
//! use clap::Parser;
//! use tidings_framework::{TypedCommandFilter, parse_typed_command};
//!
//! #[derive(Parser, Clone)]
//! struct Ban {
//!     user: i64,
//!     #[arg(long)]
//!     reason: Option<String>,
//! }
//!
//! let chain = FilterChain::new("ban").filter(TypedCommandFilter::<Ban>::new("ban"));
//!
//! if let Some(Ok(ban)) = parse_typed_command::<Ban>(&msg) {
//!     println!("banning {}", ban.user);
//! }
//! ```

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use clap::Parser;
use tidings_core::{Event, Message};
use tracing::trace;

use crate::filter::Filter;

/// A parsed command value.
#[derive(Debug, Clone)]
pub struct TypedCommand<T: Parser>(pub T);

impl<T: Parser> TypedCommand<T> {
    /// Unwraps the command value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Parser> Deref for TypedCommand<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Parser> DerefMut for TypedCommand<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Parses the message's command arguments as `T`.
///
/// Returns `None` if the message is not a command invocation. The command
/// name is passed to clap as the program name.
pub fn parse_typed_command<T: Parser>(
    message: &Message,
) -> Option<Result<TypedCommand<T>, clap::Error>> {
    let command = message.bot_command()?;
    Some(T::try_parse_from(command.argv()).map(TypedCommand))
}

/// Passes messages invoking `name` whose arguments parse as `T`.
///
/// Help requests and parse errors are rejections; the filter never replies.
pub struct TypedCommandFilter<T> {
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Parser> TypedCommandFilter<T> {
    /// `name` is the command without the leading `/`, matched
    /// case-insensitively.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            _marker: PhantomData,
        }
    }

    /// Parses the event if it invokes this filter's command.
    pub fn parse(&self, event: &Event) -> Option<Result<TypedCommand<T>, clap::Error>> {
        let msg = event.as_message()?;
        let command = msg.bot_command()?;
        if command.base_name().to_lowercase() != self.name {
            return None;
        }
        parse_typed_command(msg)
    }
}

impl<T: Parser> Filter for TypedCommandFilter<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, event: &Event) -> bool {
        match self.parse(event) {
            Some(Ok(_)) => true,
            Some(Err(err)) => {
                trace!(command = %self.name, kind = ?err.kind(), "Command arguments rejected");
                false
            }
            None => false,
        }
    }
}
