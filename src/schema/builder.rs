use std::str::FromStr;

use thiserror::Error;

use crate::schema::model::{CommandLineSchema, OptionDefinition, OptionRegistry};
use crate::schema::setter::{CallbackError, InvalidConversion, Leftover, Setter};

/// Rejected configuration detected while building a schema.
///
/// Raised eagerly at build time; never produced by a parse call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The command name must not be empty.
    #[error("command name must not be empty.")]
    EmptyCommandName,

    /// A schema must define at least one option.
    #[error("at least one option must be defined.")]
    NoOptions,

    /// An option must carry a primary or an alternative name.
    #[error("option must have a primary or alternative name.")]
    UnnamedOption,

    /// Two options share a primary name.
    #[error("option '{name}' is defined more than once.")]
    DuplicateOption {
        /// The primary name in conflict.
        name: String,
    },
}

fn noop_setter<T>() -> Setter<T> {
    Box::new(|_, _| Ok(()))
}

fn noop_leftover<T>() -> Leftover<T> {
    Box::new(|_, _| Ok(()))
}

/// Fluent builder for an [`OptionDefinition`].
/// Obtained via [`OptionDefinition::builder`].
pub struct OptionBuilder<T> {
    name: String,
    alternative: String,
    setting_name: String,
    required: bool,
    has_argument: bool,
    multiple: bool,
    argument_name: String,
    description: String,
    setter: Setter<T>,
}

impl<T> OptionBuilder<T> {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alternative: String::default(),
            setting_name: String::default(),
            required: false,
            has_argument: false,
            multiple: false,
            argument_name: String::default(),
            description: String::default(),
            setter: noop_setter(),
        }
    }

    /// Set the alternative name under which the option is also recognized.
    pub fn alternative(mut self, name: impl Into<String>) -> Self {
        self.alternative = name.into();
        self
    }

    /// Set the key under which the fallback settings source is consulted when the option
    /// resolves no value from the tokens.
    pub fn setting_name(mut self, key: impl Into<String>) -> Self {
        self.setting_name = key.into();
        self
    }

    /// Mark the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Declare that the option consumes the following token as its argument.
    pub fn has_argument(mut self) -> Self {
        self.has_argument = true;
        self
    }

    /// Allow the option to be specified more than once.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Document the display name for the option's argument.
    pub fn argument_name(mut self, name: impl Into<String>) -> Self {
        self.argument_name = name.into();
        self
    }

    /// Document the help message for this option.
    /// If repeated, only the final help message will apply.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Register the setter invoked with each raw string value resolved for this option.
    ///
    /// A returned error aborts the parse, wrapped as [`crate::ParseError::Setter`].
    pub fn set(
        mut self,
        setter: impl Fn(&mut T, &str) -> Result<(), CallbackError> + 'static,
    ) -> Self {
        self.setter = Box::new(setter);
        self
    }

    /// Register a setter that ignores the resolved value.
    ///
    /// Intended for options that take no argument (flags), whose token-sourced payload is
    /// always the empty string.
    pub fn set_flag(mut self, setter: impl Fn(&mut T) + 'static) -> Self {
        self.setter = Box::new(move |target, _| {
            setter(target);
            Ok(())
        });
        self
    }

    /// Register a setter over a parsed value, converting at the boundary via [`FromStr`].
    ///
    /// A conversion failure aborts the parse, wrapped as [`crate::ParseError::Setter`] with an
    /// [`InvalidConversion`] cause.
    ///
    /// ### Example
    /// ```
    /// use decli::OptionDefinition;
    ///
    /// let option = OptionDefinition::builder("-l")
    ///     .has_argument()
    ///     .set_parsed(|level: &mut u32, value| *level = value)
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn set_parsed<V>(mut self, setter: impl Fn(&mut T, V) + 'static) -> Self
    where
        V: FromStr + 'static,
    {
        self.setter = Box::new(move |target, raw| {
            let value = V::from_str(raw).map_err(|_| InvalidConversion {
                token: raw.to_string(),
                type_name: std::any::type_name::<V>(),
            })?;
            setter(target, value);
            Ok(())
        });
        self
    }

    /// Finalize the option definition.
    ///
    /// Fails with [`SchemaError::UnnamedOption`] when neither a primary nor an alternative
    /// name is set.
    pub fn build(self) -> Result<OptionDefinition<T>, SchemaError> {
        if self.name.is_empty() && self.alternative.is_empty() {
            return Err(SchemaError::UnnamedOption);
        }

        Ok(OptionDefinition {
            name: self.name,
            alternative: self.alternative,
            setting_name: self.setting_name,
            required: self.required,
            has_argument: self.has_argument,
            multiple: self.multiple,
            argument_name: self.argument_name,
            description: self.description,
            setter: self.setter,
        })
    }
}

/// Fluent builder for a [`CommandLineSchema`].
/// Obtained via [`CommandLineSchema::builder`].
pub struct CommandLineBuilder<T> {
    command_name: String,
    description: String,
    case_sensitive: bool,
    options: Vec<OptionDefinition<T>>,
    argument_names: Vec<String>,
    leftover: Leftover<T>,
}

impl<T> CommandLineBuilder<T> {
    pub(crate) fn new(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            description: String::default(),
            case_sensitive: true,
            options: Vec::default(),
            argument_names: Vec::default(),
            leftover: noop_leftover(),
        }
    }

    /// Document the about message for this command line.
    /// If repeated, only the final about message will apply.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Control whether option names are matched case-sensitively.
    /// Defaults to `true`.
    pub fn case_sensitive(mut self, sensitive: bool) -> Self {
        self.case_sensitive = sensitive;
        self
    }

    /// Add an option definition to the schema.
    pub fn option(mut self, option: OptionDefinition<T>) -> Self {
        self.options.push(option);
        self
    }

    /// Append a display name for a trailing positional argument.
    /// Used by the help formatter only.
    pub fn argument_name(mut self, name: impl Into<String>) -> Self {
        self.argument_names.push(name.into());
        self
    }

    /// Register the handler that receives the tokens never matched to any option, in their
    /// original relative order.
    ///
    /// Defaults to a no-op.
    /// A returned error aborts the parse, wrapped as [`crate::ParseError::Unexpected`].
    pub fn leftover(
        mut self,
        handler: impl Fn(&mut T, &[String]) -> Result<(), CallbackError> + 'static,
    ) -> Self {
        self.leftover = Box::new(handler);
        self
    }

    /// Finalize the schema.
    ///
    /// Fails when the command name is empty, when no option is defined, or when two options
    /// share a primary name.
    pub fn build(self) -> Result<CommandLineSchema<T>, SchemaError> {
        if self.command_name.is_empty() {
            return Err(SchemaError::EmptyCommandName);
        }

        if self.options.is_empty() {
            return Err(SchemaError::NoOptions);
        }

        Ok(CommandLineSchema {
            command_name: self.command_name,
            description: self.description,
            case_sensitive: self.case_sensitive,
            options: OptionRegistry::new(self.options)?,
            argument_names: self.argument_names,
            leftover: self.leftover,
        })
    }
}
