use std::collections::BTreeMap;

use crate::schema::builder::{CommandLineBuilder, OptionBuilder, SchemaError};
use crate::schema::{Leftover, Setter};

/// Immutable description of one recognized command line option.
///
/// Built via [`OptionDefinition::builder`].
/// An option is identified by its primary name alone; equality and registry keying never
/// consider the other fields.
pub struct OptionDefinition<T> {
    pub(crate) name: String,
    pub(crate) alternative: String,
    pub(crate) setting_name: String,
    pub(crate) required: bool,
    pub(crate) has_argument: bool,
    pub(crate) multiple: bool,
    pub(crate) argument_name: String,
    pub(crate) description: String,
    pub(crate) setter: Setter<T>,
}

impl<T> OptionDefinition<T> {
    /// Start building an option definition with the given primary name.
    ///
    /// ### Example
    /// ```
    /// use decli::OptionDefinition;
    ///
    /// let option = OptionDefinition::builder("-v")
    ///     .alternative("--verbose")
    ///     .set_flag(|verbose: &mut bool| *verbose = true)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(option.name(), "-v");
    /// ```
    pub fn builder(name: impl Into<String>) -> OptionBuilder<T> {
        OptionBuilder::new(name)
    }

    /// The primary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The alternative name; empty when the option has none.
    pub fn alternative(&self) -> &str {
        &self.alternative
    }

    /// The key into the fallback settings source; empty when the option has no fallback lookup.
    pub fn setting_name(&self) -> &str {
        &self.setting_name
    }

    /// Whether the option must resolve at least one value.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Whether the option consumes the following token as its argument.
    pub fn has_argument(&self) -> bool {
        self.has_argument
    }

    /// Whether the option may be specified more than once.
    pub fn multiple(&self) -> bool {
        self.multiple
    }

    /// Display name for the option's argument; used by the help formatter only.
    pub fn argument_name(&self) -> &str {
        &self.argument_name
    }

    /// Display description; used by the help formatter only.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Match a specified token against this option's names.
    ///
    /// The case-insensitive path consults the primary name only; an alternative name can
    /// never match case-insensitively.
    pub(crate) fn answers_to(&self, specified: &str, case_sensitive: bool) -> bool {
        if case_sensitive {
            (!self.name.is_empty() && self.name == specified)
                || (!self.alternative.is_empty() && self.alternative == specified)
        } else {
            !self.name.is_empty() && self.name.to_uppercase() == specified.to_uppercase()
        }
    }
}

impl<T> std::fmt::Debug for OptionDefinition<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionDefinition")
            .field("name", &self.name)
            .field("alternative", &self.alternative)
            .field("setting_name", &self.setting_name)
            .field("required", &self.required)
            .field("has_argument", &self.has_argument)
            .field("multiple", &self.multiple)
            .field("argument_name", &self.argument_name)
            .field("description", &self.description)
            .finish()
    }
}

impl<T> PartialEq for OptionDefinition<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for OptionDefinition<T> {}

/// The options of a schema, keyed and ordered by primary name.
pub struct OptionRegistry<T> {
    entries: BTreeMap<String, OptionDefinition<T>>,
}

impl<T> OptionRegistry<T> {
    pub(crate) fn new(options: Vec<OptionDefinition<T>>) -> Result<Self, SchemaError> {
        let mut entries = BTreeMap::default();

        for option in options {
            let name = option.name.clone();

            if entries.insert(name.clone(), option).is_some() {
                return Err(SchemaError::DuplicateOption { name });
            }
        }

        Ok(Self { entries })
    }

    /// The number of option definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no options.
    /// Never true on a registry obtained from a built schema.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an option by its exact primary name.
    pub fn get(&self, name: &str) -> Option<&OptionDefinition<T>> {
        self.entries.get(name)
    }

    /// Look up an option by its position in primary-name order.
    pub fn at(&self, index: usize) -> Option<&OptionDefinition<T>> {
        self.entries.values().nth(index)
    }

    /// Iterate the options in primary-name order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionDefinition<T>> {
        self.entries.values()
    }

    /// The first option (primary-name order) whose names match the specified token.
    pub(crate) fn find(&self, specified: &str, case_sensitive: bool) -> Option<&OptionDefinition<T>> {
        self.entries
            .values()
            .find(|option| option.answers_to(specified, case_sensitive))
    }

    /// The first option (primary-name order) whose setting name equals the key verbatim.
    /// Settings keys are always compared case-sensitively.
    pub(crate) fn find_setting(&self, key: &str) -> Option<&OptionDefinition<T>> {
        self.entries
            .values()
            .find(|option| !option.setting_name.is_empty() && option.setting_name == key)
    }
}

impl<T> std::fmt::Debug for OptionRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.values()).finish()
    }
}

/// Immutable description of a command line: identity, matching rules, the option registry, and
/// the leftover-token handler.
///
/// Built via [`CommandLineSchema::builder`].
/// A schema holds no per-parse state and may be reused across many parse calls.
pub struct CommandLineSchema<T> {
    pub(crate) command_name: String,
    pub(crate) description: String,
    pub(crate) case_sensitive: bool,
    pub(crate) options: OptionRegistry<T>,
    pub(crate) argument_names: Vec<String>,
    pub(crate) leftover: Leftover<T>,
}

impl<T> std::fmt::Debug for CommandLineSchema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLineSchema")
            .field("command_name", &self.command_name)
            .field("description", &self.description)
            .field("case_sensitive", &self.case_sensitive)
            .field("options", &self.options)
            .field("argument_names", &self.argument_names)
            .finish()
    }
}

impl<T> CommandLineSchema<T> {
    /// Start building a schema for the given command name.
    ///
    /// ### Example
    /// ```
    /// use decli::{CommandLineSchema, OptionDefinition};
    ///
    /// let schema = CommandLineSchema::builder("program")
    ///     .option(
    ///         OptionDefinition::builder("-v")
    ///             .set_flag(|verbose: &mut bool| *verbose = true)
    ///             .build()
    ///             .unwrap(),
    ///     )
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(schema.command_name(), "program");
    /// ```
    pub fn builder(command_name: impl Into<String>) -> CommandLineBuilder<T> {
        CommandLineBuilder::new(command_name)
    }

    /// The command name.
    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    /// The command description; used by the help formatter only.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether option names are matched case-sensitively.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// The option registry.
    pub fn options(&self) -> &OptionRegistry<T> {
        &self.options
    }

    /// Display names for the trailing positional arguments; used by the help formatter only.
    pub fn argument_names(&self) -> &[String] {
        &self.argument_names
    }
}
