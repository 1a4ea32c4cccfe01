//! Filter registry.
//!
//! Filters are identified by name and built from a declarative
//! [`FilterSpec`]. The registry maps each identifier to a constructor and is
//! consulted once, when a route is set up; evaluating the built filters never
//! touches it again.
//!
//! # Example
//!
//! ```rust,ignore
//! use tidings_framework::{FilterRegistry, FilterSpec};
//!
//! let registry = FilterRegistry::with_builtins();
//! registry.register("long_text", |_args, _registry| {
//!     Ok(filter_fn("long_text", |e| e.as_message().is_some_and(|m| m.text().len() > 100)).boxed())
//! })?;
//!
//! let filter = registry.build(&FilterSpec::with_args("command", json!("start")))?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tidings_core::MediaKind;
use tracing::debug;

use crate::error::{FilterError, FilterResult};
use crate::filter::{BoxedFilter, Filter, FilterExt};
use crate::filters::{
    AllOf, AnyOf, CommandFilter, EditedFilter, ForwardedFilter, ImportedFilter, IncomingFilter,
    KeyboardFilter, MediaFilter, MessageFilter, NotFilter, OutgoingFilter, PollFilter, PsaFilter,
    QuizPollFilter, RegexFilter, RegularPollFilter, ScheduledFilter, ServiceFilter, TextFilter,
    ViaBotFilter,
};

// =============================================================================
// FilterSpec
// =============================================================================

/// A declarative reference to a filter: its identifier plus arguments.
///
/// Deserialises from either a bare identifier (`"quiz_poll"`) or a table
/// (`{ kind = "command", args = "start" }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFilterSpec")]
pub struct FilterSpec {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub args: Value,
}

impl FilterSpec {
    /// A spec without arguments.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            args: Value::Null,
        }
    }

    pub fn with_args(kind: impl Into<String>, args: Value) -> Self {
        Self {
            kind: kind.into(),
            args,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFilterSpec {
    Name(String),
    Full {
        kind: String,
        #[serde(default)]
        args: Value,
    },
}

impl From<RawFilterSpec> for FilterSpec {
    fn from(raw: RawFilterSpec) -> Self {
        match raw {
            RawFilterSpec::Name(kind) => FilterSpec::new(kind),
            RawFilterSpec::Full { kind, args } => FilterSpec::with_args(kind, args),
        }
    }
}

// =============================================================================
// FilterRegistry
// =============================================================================

/// Builds a filter from its arguments. Combinators use the registry to build
/// their children.
pub type FilterConstructor =
    Arc<dyn Fn(&Value, &FilterRegistry) -> FilterResult<BoxedFilter> + Send + Sync>;

/// Explicit mapping from filter identifiers to constructors.
pub struct FilterRegistry {
    constructors: RwLock<HashMap<String, FilterConstructor>>,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl FilterRegistry {
    /// Creates a registry with no filters.
    pub fn empty() -> Self {
        Self {
            constructors: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry with every built-in filter registered.
    pub fn with_builtins() -> Self {
        let registry = Self::empty();
        {
            let mut map = registry.constructors.write();
            for (name, constructor) in builtins() {
                map.insert(name.to_owned(), constructor);
            }
        }
        registry
    }

    /// Registers a plugin filter.
    ///
    /// Fails if the identifier is taken; built-ins cannot be shadowed.
    pub fn register<F>(&self, name: impl Into<String>, constructor: F) -> FilterResult<()>
    where
        F: Fn(&Value, &FilterRegistry) -> FilterResult<BoxedFilter> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut map = self.constructors.write();
        if map.contains_key(&name) {
            return Err(FilterError::AlreadyRegistered(name));
        }
        debug!(filter = %name, "Registered filter");
        map.insert(name, Arc::new(constructor));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.read().contains_key(name)
    }

    /// Registered identifiers, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.constructors.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Builds the filter a spec refers to.
    pub fn build(&self, spec: &FilterSpec) -> FilterResult<BoxedFilter> {
        // Clone out of the lock so combinators can re-enter the registry.
        let constructor = self
            .constructors
            .read()
            .get(&spec.kind)
            .cloned()
            .ok_or_else(|| FilterError::UnknownFilter(spec.kind.clone()))?;
        constructor(&spec.args, self)
    }

    /// Builds every spec, in order.
    pub fn build_all(&self, specs: &[FilterSpec]) -> FilterResult<Vec<BoxedFilter>> {
        specs.iter().map(|spec| self.build(spec)).collect()
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}

// =============================================================================
// Built-in constructors
// =============================================================================

fn builtins() -> Vec<(&'static str, FilterConstructor)> {
    fn unit<F>(name: &'static str) -> (&'static str, FilterConstructor)
    where
        F: Filter + Default + 'static,
    {
        let constructor: FilterConstructor = Arc::new(move |args: &Value, _: &FilterRegistry| {
            no_args(name, args)?;
            Ok(F::default().boxed())
        });
        (name, constructor)
    }

    fn with_args<F>(name: &'static str, make: F) -> (&'static str, FilterConstructor)
    where
        F: Fn(&Value, &FilterRegistry) -> FilterResult<BoxedFilter> + Send + Sync + 'static,
    {
        (name, Arc::new(make))
    }

    vec![
        unit::<MessageFilter>("message"),
        unit::<IncomingFilter>("incoming"),
        unit::<OutgoingFilter>("outgoing"),
        unit::<PollFilter>("poll"),
        unit::<RegularPollFilter>("regular_poll"),
        unit::<QuizPollFilter>("quiz_poll"),
        unit::<ForwardedFilter>("forwarded"),
        unit::<ScheduledFilter>("scheduled"),
        unit::<EditedFilter>("edited"),
        unit::<ImportedFilter>("imported"),
        with_args("service", |args, _| {
            Ok(match optional_str("service", args)? {
                Some(kind) => ServiceFilter::action(kind),
                None => ServiceFilter::any(),
            }
            .boxed())
        }),
        with_args("text", |args, _| {
            Ok(TextFilter::new(required_str("text", args)?).boxed())
        }),
        with_args("regex", |args, _| {
            Ok(RegexFilter::new(&required_str("regex", args)?)?.boxed())
        }),
        with_args("command", |args, _| {
            let names = str_list("command", args)?;
            Ok(if names.is_empty() {
                CommandFilter::any()
            } else {
                CommandFilter::named(names)
            }
            .boxed())
        }),
        with_args("media", |args, _| {
            let kinds = str_list("media", args)?
                .iter()
                .map(|name| {
                    MediaKind::parse(name).ok_or_else(|| {
                        FilterError::invalid_args("media", format!("unknown media kind '{name}'"))
                    })
                })
                .collect::<FilterResult<Vec<_>>>()?;
            Ok(MediaFilter::new(kinds).boxed())
        }),
        with_args("via_bot", |args, _| {
            Ok(match args {
                Value::Null => ViaBotFilter::any(),
                Value::Number(n) => ViaBotFilter::bot(n.as_i64().ok_or_else(|| {
                    FilterError::invalid_args("via_bot", "bot id must be an integer")
                })?),
                other => {
                    return Err(FilterError::invalid_args(
                        "via_bot",
                        format!("expected a bot id, got {other}"),
                    ));
                }
            }
            .boxed())
        }),
        with_args("keyboard", |args, _| {
            Ok(match optional_str("keyboard", args)?.as_deref() {
                None => KeyboardFilter::any(),
                Some("inline") => KeyboardFilter::inline(),
                Some("reply") => KeyboardFilter::reply(),
                Some(other) => {
                    return Err(FilterError::invalid_args(
                        "keyboard",
                        format!("expected \"inline\" or \"reply\", got \"{other}\""),
                    ));
                }
            }
            .boxed())
        }),
        with_args("psa", |args, _| {
            Ok(match optional_str("psa", args)? {
                Some(psa_type) => PsaFilter::of_type(psa_type),
                None => PsaFilter::any(),
            }
            .boxed())
        }),
        with_args("not", |args, registry| {
            let spec = nested_spec("not", args)?;
            Ok(NotFilter::new(registry.build(&spec)?).boxed())
        }),
        with_args("any_of", |args, registry| {
            Ok(AnyOf::new(registry.build_all(&nested_specs("any_of", args)?)?).boxed())
        }),
        with_args("all_of", |args, registry| {
            Ok(AllOf::new(registry.build_all(&nested_specs("all_of", args)?)?).boxed())
        }),
    ]
}

fn no_args(filter: &str, args: &Value) -> FilterResult<()> {
    if args.is_null() {
        Ok(())
    } else {
        Err(FilterError::invalid_args(filter, "takes no arguments"))
    }
}

fn optional_str(filter: &str, args: &Value) -> FilterResult<Option<String>> {
    match args {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(FilterError::invalid_args(
            filter,
            format!("expected a string, got {other}"),
        )),
    }
}

fn required_str(filter: &str, args: &Value) -> FilterResult<String> {
    optional_str(filter, args)?
        .ok_or_else(|| FilterError::invalid_args(filter, "a string argument is required"))
}

/// Accepts nothing, one string, or a list of strings.
fn str_list(filter: &str, args: &Value) -> FilterResult<Vec<String>> {
    match args {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_owned).ok_or_else(|| {
                    FilterError::invalid_args(filter, format!("expected a string, got {item}"))
                })
            })
            .collect(),
        other => Err(FilterError::invalid_args(
            filter,
            format!("expected a string or a list of strings, got {other}"),
        )),
    }
}

fn nested_spec(filter: &str, args: &Value) -> FilterResult<FilterSpec> {
    if args.is_null() {
        return Err(FilterError::invalid_args(filter, "a nested filter is required"));
    }
    serde_json::from_value(args.clone())
        .map_err(|err| FilterError::invalid_args(filter, err.to_string()))
}

fn nested_specs(filter: &str, args: &Value) -> FilterResult<Vec<FilterSpec>> {
    if !args.is_array() {
        return Err(FilterError::invalid_args(filter, "expected a list of filters"));
    }
    serde_json::from_value(args.clone())
        .map_err(|err| FilterError::invalid_args(filter, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_fn;
    use serde_json::json;
    use tidings_core::{EntityKind, Event, Message, MessageEntity};

    fn text(body: &str) -> Event {
        Message::builder(body).build().into()
    }

    fn command(body: &str, length: usize) -> Event {
        Message::builder(body)
            .entities(vec![MessageEntity::new(EntityKind::BotCommand, 0, length)])
            .build()
            .into()
    }

    #[test]
    fn test_builtins_registered() {
        let registry = FilterRegistry::with_builtins();
        for name in [
            "message", "service", "incoming", "outgoing", "text", "regex", "command", "media",
            "poll", "regular_poll", "quiz_poll", "forwarded", "scheduled", "edited", "via_bot",
            "keyboard", "imported", "psa", "not", "any_of", "all_of",
        ] {
            assert!(registry.contains(name), "missing builtin {name}");
        }
        assert!(FilterRegistry::empty().names().is_empty());
    }

    #[test]
    fn test_build_unit_filter() {
        let registry = FilterRegistry::default();
        let filter = registry.build(&FilterSpec::new("message")).unwrap();
        assert_eq!(filter.name(), "message");
        assert!(filter.apply(&text("x")));
    }

    #[test]
    fn test_unit_filter_rejects_args() {
        let registry = FilterRegistry::default();
        let err = registry
            .build(&FilterSpec::with_args("quiz_poll", json!(1)))
            .err()
            .unwrap();
        assert!(matches!(err, FilterError::InvalidArgs { .. }));
    }

    #[test]
    fn test_unknown_filter() {
        let registry = FilterRegistry::default();
        let err = registry.build(&FilterSpec::new("nope")).err().unwrap();
        assert!(matches!(err, FilterError::UnknownFilter(name) if name == "nope"));
    }

    #[test]
    fn test_command_args_forms() {
        let registry = FilterRegistry::default();
        let start = command("/start", 6);

        let any = registry.build(&FilterSpec::new("command")).unwrap();
        let one = registry
            .build(&FilterSpec::with_args("command", json!("start")))
            .unwrap();
        let many = registry
            .build(&FilterSpec::with_args("command", json!(["help", "start"])))
            .unwrap();
        let other = registry
            .build(&FilterSpec::with_args("command", json!("help")))
            .unwrap();

        assert!(any.apply(&start));
        assert!(one.apply(&start));
        assert!(many.apply(&start));
        assert!(!other.apply(&start));
    }

    #[test]
    fn test_media_kind_validation() {
        let registry = FilterRegistry::default();
        assert!(
            registry
                .build(&FilterSpec::with_args("media", json!(["photo", "document"])))
                .is_ok()
        );
        assert!(
            registry
                .build(&FilterSpec::with_args("media", json!("hologram")))
                .is_err()
        );
    }

    #[test]
    fn test_regex_errors_surface() {
        let registry = FilterRegistry::default();
        let err = registry
            .build(&FilterSpec::with_args("regex", json!("(")))
            .err()
            .unwrap();
        assert!(matches!(err, FilterError::InvalidRegex { .. }));

        let err = registry.build(&FilterSpec::new("regex")).err().unwrap();
        assert!(matches!(err, FilterError::InvalidArgs { .. }));
    }

    #[test]
    fn test_nested_combinators() {
        let registry = FilterRegistry::default();
        let spec: FilterSpec = serde_json::from_value(json!({
            "kind": "all_of",
            "args": [
                "message",
                {"kind": "not", "args": {"kind": "text", "args": "skip"}},
                {"kind": "any_of", "args": [
                    {"kind": "regex", "args": "^hello (\\w+)"},
                    {"kind": "command", "args": "hello"},
                ]},
            ],
        }))
        .unwrap();
        let filter = registry.build(&spec).unwrap();

        let event = text("hello world");
        assert!(filter.apply(&event));
        assert_eq!(
            filter.captures(&event),
            Some(vec!["hello world".to_string(), "world".to_string()])
        );
        assert!(!filter.apply(&text("skip")));
        assert!(!filter.apply(&text("bye")));
    }

    #[test]
    fn test_combinator_argument_errors() {
        let registry = FilterRegistry::default();
        assert!(registry.build(&FilterSpec::new("not")).is_err());
        assert!(
            registry
                .build(&FilterSpec::with_args("any_of", json!("message")))
                .is_err()
        );
        assert!(matches!(
            registry.build(&FilterSpec::with_args("all_of", json!(["message", "bogus"]))),
            Err(FilterError::UnknownFilter(_))
        ));
    }

    #[test]
    fn test_register_plugin_filter() {
        let registry = FilterRegistry::default();
        registry
            .register("shouting", |_args, _registry| {
                Ok(filter_fn("shouting", |event: &Event| {
                    event.as_message().is_some_and(|msg| {
                        !msg.text().is_empty() && msg.text() == msg.text().to_uppercase()
                    })
                })
                .boxed())
            })
            .unwrap();

        let filter = registry.build(&FilterSpec::new("shouting")).unwrap();
        assert!(filter.apply(&text("HEY")));
        assert!(!filter.apply(&text("hey")));

        let err = registry
            .register("message", |_args, _registry| Ok(filter_fn("x", |_: &Event| true).boxed()))
            .unwrap_err();
        assert!(matches!(err, FilterError::AlreadyRegistered(_)));
    }

    #[test]
    fn test_spec_deserialize_forms() {
        let specs: Vec<FilterSpec> = serde_json::from_value(json!([
            "quiz_poll",
            {"kind": "psa", "args": "covid"},
            {"kind": "edited"},
        ]))
        .unwrap();
        assert_eq!(
            specs,
            vec![
                FilterSpec::new("quiz_poll"),
                FilterSpec::with_args("psa", json!("covid")),
                FilterSpec::new("edited"),
            ]
        );
    }
}
