//! `decli` is a declarative command line parser for Rust.
//!
//! Instead of handing back a bag of matched strings, `decli` drives values directly into your
//! program state: each option carries a setter callback, and parsing either mutates the bound
//! destination or fails with a categorized [`ParseError`].
//! The design prioritizes the following concerns:
//! * *Declaration over grammar*:
//! The recognized options are described up front ([`OptionDefinition`]) and collected into an
//! immutable [`CommandLineSchema`].
//! Every token is either a recognized option name, an option's argument, or leftover data for
//! the schema's catch-all handler.
//! There is no sub-command tree, short-option clustering, nor `--opt=value` splitting.
//! * *Settings fallback*:
//! An option may name a key in an external key/value settings source (typically the process
//! environment).
//! The fallback is consulted only for options that resolved no value from the tokens.
//! * *Typed setters at the boundary*:
//! Conversion from `&str` happens inside the setter adapters ([`OptionBuilder::set_parsed`]),
//! and conversion failures surface uniformly as the cause of a setter error.
//!
//! # Usage
//! ```
//! use decli::{CommandLineSchema, OptionDefinition, Parser};
//! use std::collections::BTreeMap;
//!
//! #[derive(Debug, Default)]
//! struct Config {
//!     verbose: bool,
//!     level: u32,
//!     inputs: Vec<String>,
//! }
//!
//! let schema = CommandLineSchema::builder("program")
//!     .about("My program that does awesome stuff.")
//!     .option(
//!         OptionDefinition::builder("-v")
//!             .alternative("--verbose")
//!             .set_flag(|config: &mut Config| config.verbose = true)
//!             .build()?,
//!     )
//!     .option(
//!         OptionDefinition::builder("-l")
//!             .setting_name("PROGRAM_LEVEL")
//!             .has_argument()
//!             .set_parsed(|config: &mut Config, level| config.level = level)
//!             .build()?,
//!     )
//!     .leftover(|config: &mut Config, tokens| {
//!         config.inputs = tokens.to_vec();
//!         Ok(())
//!     })
//!     .build()?;
//!
//! let config = Parser::from_default(schema)
//!     .parse_with(&["-v", "-l", "3", "input.txt"], &BTreeMap::default())?;
//!
//! assert!(config.verbose);
//! assert_eq!(config.level, 3);
//! assert_eq!(config.inputs, vec!["input.txt".to_string()]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![deny(missing_docs)]
mod help;
mod resolver;
mod schema;

pub use help::{HelpConfig, HelpFormatter};
pub use resolver::{ParseError, ParseErrorCategory, Parser};
pub use schema::{
    CallbackError, CommandLineBuilder, CommandLineSchema, InvalidConversion, OptionBuilder,
    OptionDefinition, OptionRegistry, SchemaError,
};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
