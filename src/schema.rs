mod builder;
mod model;
mod setter;

pub use builder::{CommandLineBuilder, OptionBuilder, SchemaError};
pub use model::{CommandLineSchema, OptionDefinition, OptionRegistry};
pub use setter::{CallbackError, InvalidConversion};
pub(crate) use setter::{Leftover, Setter};
