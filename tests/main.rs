use std::collections::BTreeMap;

use assert_matches::assert_matches;
use rstest::rstest;

use decli::{
    CommandLineSchema, HelpFormatter, InvalidConversion, OptionDefinition, ParseError,
    ParseErrorCategory, Parser, SchemaError,
};

#[derive(Debug, Default, PartialEq)]
struct Config {
    flag: bool,
    foo: String,
    count: u32,
    items: Vec<String>,
    leftovers: Vec<String>,
}

fn settings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn builder_compiles() {
    CommandLineSchema::<Config>::builder("program");
}

#[test]
fn parse_returns_the_supplied_instance() {
    let schema = CommandLineSchema::builder("foo.exe")
        .option(OptionDefinition::builder("/f").build().unwrap())
        .build()
        .unwrap();
    let destination = Config {
        count: 42,
        ..Config::default()
    };

    let config = Parser::over(schema, destination)
        .parse_with(&["/f"], &BTreeMap::default())
        .unwrap();

    assert_eq!(config.count, 42);
}

#[test]
fn flag_with_leftovers() {
    let schema = CommandLineSchema::builder("test.exe")
        .option(
            OptionDefinition::builder("/f")
                .set_flag(|config: &mut Config| config.flag = true)
                .build()
                .unwrap(),
        )
        .leftover(|config: &mut Config, tokens| {
            config.leftovers = tokens.to_vec();
            Ok(())
        })
        .build()
        .unwrap();

    let config = Parser::from_default(schema)
        .parse_with(&["/f", "/b", "baz"], &BTreeMap::default())
        .unwrap();

    assert!(config.flag);
    assert_eq!(config.leftovers, vec!["/b", "baz"]);
}

#[test]
fn argument_taking_option_with_leftovers() {
    let schema = CommandLineSchema::builder("test.exe")
        .option(
            OptionDefinition::builder("/f")
                .has_argument()
                .set(|config: &mut Config, raw| {
                    config.foo = raw.to_string();
                    Ok(())
                })
                .build()
                .unwrap(),
        )
        .leftover(|config: &mut Config, tokens| {
            config.leftovers = tokens.to_vec();
            Ok(())
        })
        .build()
        .unwrap();

    let config = Parser::from_default(schema)
        .parse_with(&["/f", "bar", "baz"], &BTreeMap::default())
        .unwrap();

    assert_eq!(config.foo, "bar");
    assert_eq!(config.leftovers, vec!["baz"]);
}

fn required_bool_schema() -> CommandLineSchema<Config> {
    CommandLineSchema::builder("test.exe")
        .option(
            OptionDefinition::builder("/f")
                .setting_name("Foo")
                .required()
                .set_parsed(|config: &mut Config, flag| config.flag = flag)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

#[rstest]
#[case("True", true)]
#[case("yes", true)]
#[case("FALSE", false)]
#[case("no", false)]
#[case("0", false)]
fn flag_resolved_from_settings(#[case] value: &str, #[case] expected: bool) {
    // A settings-sourced flag normalizes to a boolean string, which a bool setter can parse.
    let config = Parser::from_default(required_bool_schema())
        .parse_with(&["/b", "baz"], &settings(&[("Foo", value)]))
        .unwrap();

    assert_eq!(config.flag, expected);
}

#[test]
fn required_option_not_found() {
    let error = Parser::from_default(required_bool_schema())
        .parse_with(&["/b", "baz"], &BTreeMap::default())
        .unwrap_err();

    assert_matches!(error, ParseError::RequiredOptionNotFound { ref option } if option.as_str() == "/f");
    assert_eq!(error.category(), ParseErrorCategory::RequiredOptionNotFound);
}

fn string_option_schema(multiple: bool) -> CommandLineSchema<Config> {
    let mut option = OptionDefinition::builder("/f")
        .setting_name("Foo")
        .has_argument()
        .set(|config: &mut Config, raw| {
            config.items.push(raw.to_string());
            Ok(())
        });

    if multiple {
        option = option.multiple();
    }

    CommandLineSchema::builder("test.exe")
        .option(option.build().unwrap())
        .build()
        .unwrap()
}

#[test]
fn settings_do_not_override_tokens() {
    let config = Parser::from_default(string_option_schema(false))
        .parse_with(&["/f", "bar"], &settings(&[("Foo", "BAR")]))
        .unwrap();

    assert_eq!(config.items, vec!["bar"]);
}

#[test]
fn settings_fill_in_for_absent_tokens() {
    let config = Parser::from_default(string_option_schema(false))
        .parse_with(&[], &settings(&[("Foo", "BAR")]))
        .unwrap();

    assert_eq!(config.items, vec!["BAR"]);
}

#[test]
fn duplicated_option_rejected() {
    let error = Parser::from_default(string_option_schema(false))
        .parse_with(&["/f", "bar", "/f", "baz"], &BTreeMap::default())
        .unwrap_err();

    assert_matches!(
        error,
        ParseError::DuplicatedOption { ref option, ref value } if option.as_str() == "/f" && value.as_str() == "baz"
    );
}

#[test]
fn multiple_option_accumulates() {
    let config = Parser::from_default(string_option_schema(true))
        .parse_with(&["/f", "bar", "/f", "baz"], &BTreeMap::default())
        .unwrap();

    assert_eq!(config.items, vec!["bar", "baz"]);
}

#[test]
fn conversion_failure_surfaces_as_setter_error() {
    let schema = CommandLineSchema::builder("test.exe")
        .option(
            OptionDefinition::builder("/n")
                .has_argument()
                .set_parsed(|config: &mut Config, count| config.count = count)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let error = Parser::from_default(schema)
        .parse_with(&["/n", "not-u32"], &BTreeMap::default())
        .unwrap_err();

    assert_matches!(
        error,
        ParseError::Setter { ref option, ref value, .. } if option.as_str() == "/n" && value.as_str() == "not-u32"
    );
    let cause = std::error::Error::source(&error).unwrap();
    let conversion = cause.downcast_ref::<InvalidConversion>().unwrap();
    assert_eq!(conversion.token, "not-u32");
}

#[test]
fn case_insensitive_schema_matches_primary_name_any_case() {
    let schema = CommandLineSchema::builder("test.exe")
        .case_sensitive(false)
        .option(
            OptionDefinition::builder("/f")
                .has_argument()
                .set(|config: &mut Config, raw| {
                    config.foo = raw.to_string();
                    Ok(())
                })
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let config = Parser::from_default(schema)
        .parse_with(&["/F", "bar"], &BTreeMap::default())
        .unwrap();

    assert_eq!(config.foo, "bar");
}

#[test]
fn schema_validation() {
    assert_matches!(
        CommandLineSchema::<Config>::builder("").build().unwrap_err(),
        SchemaError::EmptyCommandName
    );
    assert_matches!(
        CommandLineSchema::<Config>::builder("test.exe")
            .build()
            .unwrap_err(),
        SchemaError::NoOptions
    );
    assert_matches!(
        OptionDefinition::<Config>::builder("").build().unwrap_err(),
        SchemaError::UnnamedOption
    );
}

#[test]
fn help_output() {
    let schema = CommandLineSchema::<Config>::builder("test.exe")
        .about("Exercises the full help pipeline.")
        .option(
            OptionDefinition::builder("/f")
                .alternative("--foo")
                .required()
                .has_argument()
                .argument_name("value")
                .help("The foo option.")
                .build()
                .unwrap(),
        )
        .argument_name("input")
        .build()
        .unwrap();

    let help = HelpFormatter::default().format(&schema);

    assert!(help.contains("Syntax:"));
    assert!(help.contains("test.exe /f <value> <input>"));
    assert!(help.contains("Exercises the full help pipeline."));
    assert!(help.contains("/f, --foo           The foo option."));
}
