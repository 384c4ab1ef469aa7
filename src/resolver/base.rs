use std::collections::{BTreeMap, VecDeque};

use thiserror::Error;

use crate::schema::{CallbackError, CommandLineSchema, OptionDefinition};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The kind of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorCategory {
    /// An error not otherwise classified, including a failing leftover handler.
    Unexpected,
    /// A user-supplied setter callback failed.
    Setter,
    /// A required option resolved no value.
    RequiredOptionNotFound,
    /// A single-use option was specified more than once.
    DuplicatedOption,
}

/// Raised when resolution of the command line fails.
///
/// The offending option is carried by its primary name, matching the name-only identity of
/// [`OptionDefinition`].
/// Underlying causes are exposed through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// An error not otherwise classified surfaced while parsing.
    #[error("an unexpected error has occurred while parsing the command line.")]
    Unexpected {
        /// The underlying failure.
        #[source]
        cause: CallbackError,
    },

    /// A setter callback failed while a resolved value was being applied.
    #[error("setter failed on option '{option}' with value '{value}'.")]
    Setter {
        /// Primary name of the option being applied.
        option: String,
        /// The raw value passed to the setter.
        value: String,
        /// The setter's failure.
        #[source]
        cause: CallbackError,
    },

    /// A required option resolved no value from the tokens nor the settings fallback.
    #[error("required option '{option}' not found.")]
    RequiredOptionNotFound {
        /// Primary name of the missing option.
        option: String,
    },

    /// A single-use option was matched a second time in the token stream.
    #[error("option '{option}' specified more than once.")]
    DuplicatedOption {
        /// Primary name of the duplicated option.
        option: String,
        /// The value accompanying the second occurrence.
        value: String,
    },
}

impl ParseError {
    /// The failure's category.
    pub fn category(&self) -> ParseErrorCategory {
        match self {
            ParseError::Unexpected { .. } => ParseErrorCategory::Unexpected,
            ParseError::Setter { .. } => ParseErrorCategory::Setter,
            ParseError::RequiredOptionNotFound { .. } => ParseErrorCategory::RequiredOptionNotFound,
            ParseError::DuplicatedOption { .. } => ParseErrorCategory::DuplicatedOption,
        }
    }

    /// Primary name of the offending option, when one was involved.
    pub fn option(&self) -> Option<&str> {
        match self {
            ParseError::Unexpected { .. } => None,
            ParseError::Setter { option, .. }
            | ParseError::RequiredOptionNotFound { option }
            | ParseError::DuplicatedOption { option, .. } => Some(option),
        }
    }

    /// The raw value in flight when the failure occurred, when one was involved.
    pub fn value(&self) -> Option<&str> {
        match self {
            ParseError::Unexpected { .. } | ParseError::RequiredOptionNotFound { .. } => None,
            ParseError::Setter { value, .. } | ParseError::DuplicatedOption { value, .. } => {
                Some(value)
            }
        }
    }
}

// Falsy markers recognized (case-insensitively) when a flag resolves from the settings fallback.
const FALSY_SETTINGS: [&str; 5] = ["FALSE", "NO", "0", "F", "N"];

fn normalize_flag(value: &str) -> String {
    let truthy = !FALSY_SETTINGS.contains(&value.to_uppercase().as_str());
    truthy.to_string()
}

/// Drives the resolution phases of one parse call against a borrowed schema.
pub(crate) struct Resolver<'a, T> {
    schema: &'a CommandLineSchema<T>,
}

impl<'a, T> Resolver<'a, T> {
    pub(crate) fn new(schema: &'a CommandLineSchema<T>) -> Self {
        Self { schema }
    }

    /// Resolve the tokens and the settings fallback against the schema, applying values onto
    /// `target` through the option setters.
    ///
    /// Phases:
    /// 1. Token scan: match each token to an option, consuming the following token as the
    /// option's argument where declared; unmatched tokens accumulate as leftovers.
    /// 2. Settings scan: options that resolved no value yet may fall back to their setting key.
    /// 3. The leftover handler receives the unmatched tokens in their original order.
    /// 4. Every required option must have resolved at least one value.
    pub(crate) fn resolve(
        &self,
        tokens: &[&str],
        settings: &BTreeMap<String, String>,
        target: &mut T,
    ) -> Result<(), ParseError> {
        let schema = self.schema;
        let mut pending: VecDeque<&str> = tokens.iter().copied().collect();
        let mut leftovers: Vec<String> = Vec::default();
        // Values resolved so far, keyed by the option's primary name.
        let mut resolved: BTreeMap<&str, Vec<String>> = BTreeMap::default();

        while let Some(former) = pending.pop_front() {
            let latter = pending.front().copied().unwrap_or("");

            let Some(option) = schema.options.find(former, schema.case_sensitive) else {
                leftovers.push(former.to_string());
                continue;
            };

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Matched token '{former}' to option '{}'.", option.name());
            }

            if !option.multiple() && resolved.get(option.name()).is_some_and(|values| !values.is_empty())
            {
                return Err(ParseError::DuplicatedOption {
                    option: option.name().to_string(),
                    value: latter.to_string(),
                });
            }

            let payload = if option.has_argument() { latter } else { "" };
            apply(option, payload, target)?;
            resolved
                .entry(option.name())
                .or_default()
                .push(payload.to_string());

            if option.has_argument() {
                // The peeked token was consumed as this option's argument; it must not be
                // re-processed as a token of its own.
                pending.pop_front();
            }
        }

        for (key, value) in settings {
            let Some(option) = schema.options.find_setting(key) else {
                continue;
            };

            // The fallback never overrides a value resolved from the tokens or from an
            // earlier-processed setting.
            if resolved.get(option.name()).is_some_and(|values| !values.is_empty()) {
                continue;
            }

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Falling back to setting '{key}' for option '{}'.", option.name());
            }

            let payload = if option.has_argument() {
                value.clone()
            } else {
                normalize_flag(value)
            };
            apply(option, &payload, target)?;
            resolved.entry(option.name()).or_default().push(payload);
        }

        (schema.leftover)(target, &leftovers).map_err(|cause| ParseError::Unexpected { cause })?;

        for option in schema.options.iter() {
            if option.required() && resolved.get(option.name()).map_or(true, Vec::is_empty) {
                return Err(ParseError::RequiredOptionNotFound {
                    option: option.name().to_string(),
                });
            }
        }

        Ok(())
    }
}

fn apply<T>(option: &OptionDefinition<T>, payload: &str, target: &mut T) -> Result<(), ParseError> {
    (option.setter)(target, payload).map_err(|cause| ParseError::Setter {
        option: option.name().to_string(),
        value: payload.to_string(),
        cause,
    })
}
