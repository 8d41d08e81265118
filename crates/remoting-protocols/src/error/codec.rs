//! Parameter and result codec errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Cannot decode {type_name}: {message}")]
    Decode {
        type_name: &'static str,
        message: String,
    },

    #[error("Cannot encode {type_name}: {message}")]
    Encode {
        type_name: &'static str,
        message: String,
    },
}

impl CodecError {
    pub fn decode<T: ?Sized>(message: impl ToString) -> Self {
        Self::Decode {
            type_name: std::any::type_name::<T>(),
            message: message.to_string(),
        }
    }

    pub fn encode<T: ?Sized>(message: impl ToString) -> Self {
        Self::Encode {
            type_name: std::any::type_name::<T>(),
            message: message.to_string(),
        }
    }
}
