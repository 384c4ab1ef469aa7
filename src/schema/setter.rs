use thiserror::Error;

/// The failure payload produced by user-supplied callbacks (setters and the leftover handler).
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Applies one resolved raw string value onto the destination.
pub(crate) type Setter<T> = Box<dyn Fn(&mut T, &str) -> Result<(), CallbackError>>;

/// Receives the tokens that were never matched to any option.
pub(crate) type Leftover<T> = Box<dyn Fn(&mut T, &[String]) -> Result<(), CallbackError>>;

/// Conversion failure raised by the typed setter adapters (ex: [`crate::OptionBuilder::set_parsed`]).
///
/// Surfaces as the cause of a [`crate::ParseError::Setter`].
#[derive(Debug, Error)]
#[error("cannot convert '{token}' to {type_name}.")]
pub struct InvalidConversion {
    /// The raw value that could not be converted.
    pub token: String,
    /// The requested destination type.
    pub type_name: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_conversion_display() {
        let error = InvalidConversion {
            token: "blah".to_string(),
            type_name: std::any::type_name::<u32>(),
        };
        assert_eq!(error.to_string(), "cannot convert 'blah' to u32.");
    }
}
