use terminal_size::{terminal_size, Width};

use crate::schema::{CommandLineSchema, OptionDefinition};

// Assuming an average word length of 5, this allows precisely 3 words with a space between them.
const MINIMUM_WRAP_WIDTH: usize = 17;

/// Layout configuration for the [`HelpFormatter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpConfig {
    /// Total number of columns available per line.
    /// Defaults to `80`.
    pub line_width: usize,
    /// Columns reserved for the left (option name) column.
    /// Defaults to `20`.
    pub indent_width: usize,
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            line_width: 80,
            indent_width: 20,
        }
    }
}

impl HelpConfig {
    /// Derive the line width from the attached terminal, falling back to the default width when
    /// no terminal is attached.
    pub fn guided() -> Self {
        match terminal_size() {
            Some((Width(width), _)) => Self {
                line_width: width as usize,
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    fn wrap_width(&self) -> usize {
        std::cmp::max(
            self.line_width.saturating_sub(self.indent_width),
            MINIMUM_WRAP_WIDTH,
        )
    }
}

/// Renders the help text for a [`CommandLineSchema`]: a syntax line, the command description,
/// and the option listing.
///
/// ### Example
/// ```
/// use decli::{CommandLineSchema, HelpFormatter, OptionDefinition};
///
/// let schema: decli::CommandLineSchema<()> = CommandLineSchema::builder("program")
///     .about("My program.")
///     .option(
///         OptionDefinition::builder("-v")
///             .help("Verbose output.")
///             .build()
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
///
/// let help = HelpFormatter::default().format(&schema);
/// assert!(help.contains("Syntax:"));
/// assert!(help.contains("-v"));
/// ```
#[derive(Default)]
pub struct HelpFormatter {
    config: HelpConfig,
}

impl HelpFormatter {
    /// Create a formatter with the given layout configuration.
    pub fn with_config(config: HelpConfig) -> Self {
        Self { config }
    }

    /// Render the help text for the schema.
    pub fn format<T>(&self, schema: &CommandLineSchema<T>) -> String {
        let mut out = String::default();
        self.render_section(&mut out, "Syntax", &render_syntax(schema));
        self.render_section(&mut out, "Description", schema.description());
        out.push_str("Options:\n");

        for option in schema.options().iter() {
            self.render_option(&mut out, option);
        }

        out
    }

    fn render_section(&self, out: &mut String, title: &str, content: &str) {
        let indent = " ".repeat(self.config.indent_width);
        out.push_str(title);
        out.push_str(":\n");

        for line in chunk(content, self.config.wrap_width()) {
            out.push_str(&indent);
            out.push_str(&line);
            out.push('\n');
        }

        out.push('\n');
    }

    fn render_option<T>(&self, out: &mut String, option: &OptionDefinition<T>) {
        let indent = " ".repeat(self.config.indent_width);
        let left = render_names(option);

        if left.len() > self.config.indent_width {
            out.push_str(&left);
            out.push('\n');
            out.push_str(&indent);
        } else {
            out.push_str(&format!("{left:width$}", width = self.config.indent_width));
        }

        let description = chunk(option.description(), self.config.wrap_width());

        if description.is_empty() {
            out.push('\n');
            return;
        }

        for (i, line) in description.iter().enumerate() {
            if i > 0 {
                out.push_str(&indent);
            }
            out.push_str(line);
            out.push('\n');
        }
    }
}

fn render_names<T>(option: &OptionDefinition<T>) -> String {
    if option.name().is_empty() {
        option.alternative().to_string()
    } else if option.alternative().is_empty() {
        option.name().to_string()
    } else {
        format!("{}, {}", option.name(), option.alternative())
    }
}

fn render_syntax<T>(schema: &CommandLineSchema<T>) -> String {
    let mut syntax = schema.command_name().to_string();

    for option in schema.options().iter().filter(|option| option.required()) {
        syntax.push(' ');
        syntax.push_str(option.name());

        if option.has_argument() {
            syntax.push_str(&format!(" <{}>", option.argument_name()));
        }
    }

    for option in schema.options().iter().filter(|option| !option.required()) {
        syntax.push_str(&format!(" [{}", option.name()));

        if option.has_argument() {
            syntax.push_str(&format!(" <{}>", option.argument_name()));
        }

        syntax.push(']');
    }

    for argument_name in schema.argument_names() {
        syntax.push_str(&format!(" <{argument_name}>"));
    }

    syntax
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ') {
        if word.is_empty() {
            continue;
        }

        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.len() + word.len() + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = String::default();
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

// Break a word that exceeds the width into hyphen-joined pieces, leaving the remainder in
// `current`.
fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let increment = width - 1;
    let mut left = 0;
    let mut right = increment;

    while right + 1 < word.len() {
        lines.push(format!("{}-", &word[left..right]));
        left += increment;
        right += increment;
    }

    current.push_str(&word[left..]);
}
