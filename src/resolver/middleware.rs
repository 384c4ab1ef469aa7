use std::collections::BTreeMap;
use std::env;

use crate::resolver::base::{ParseError, Resolver};
use crate::schema::CommandLineSchema;

enum Binding<T> {
    Instance(T),
    Factory(Box<dyn Fn() -> T>),
}

/// Binds a [`CommandLineSchema`] to a destination value and exposes the parse entry points.
///
/// The destination is either a caller-supplied instance ([`Parser::over`]), produced by a
/// factory per parse ([`Parser::with_factory`]), or default-constructed
/// ([`Parser::from_default`]).
pub struct Parser<T> {
    schema: CommandLineSchema<T>,
    binding: Binding<T>,
}

impl<T> Parser<T> {
    /// Bind the schema to the caller-supplied destination instance.
    pub fn over(schema: CommandLineSchema<T>, destination: T) -> Self {
        Self {
            schema,
            binding: Binding::Instance(destination),
        }
    }

    /// Bind the schema to a factory producing a fresh destination for the parse.
    pub fn with_factory(schema: CommandLineSchema<T>, factory: impl Fn() -> T + 'static) -> Self {
        Self {
            schema,
            binding: Binding::Factory(Box::new(factory)),
        }
    }

    /// Parse the tokens against an explicit settings fallback.
    ///
    /// On success the populated destination is returned; on failure a [`ParseError`]
    /// categorizes what went wrong.
    pub fn parse_with(
        self,
        tokens: &[&str],
        settings: &BTreeMap<String, String>,
    ) -> Result<T, ParseError> {
        let Parser { schema, binding } = self;
        let mut destination = match binding {
            Binding::Instance(value) => value,
            Binding::Factory(factory) => factory(),
        };

        Resolver::new(&schema).resolve(tokens, settings, &mut destination)?;
        Ok(destination)
    }

    /// Parse the tokens, using a snapshot of the process environment as the settings fallback.
    pub fn parse(self, tokens: &[&str]) -> Result<T, ParseError> {
        let settings = environment_settings();
        self.parse_with(tokens, &settings)
    }
}

impl<T> Parser<T>
where
    T: Default + 'static,
{
    /// Bind the schema to a default-constructed destination.
    pub fn from_default(schema: CommandLineSchema<T>) -> Self {
        Self::with_factory(schema, T::default)
    }
}

fn environment_settings() -> BTreeMap<String, String> {
    env::vars().collect()
}
