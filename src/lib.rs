pub mod argument_converters;
pub mod arguments;
pub mod builder;
pub mod commands;
pub mod decode;
pub mod executor;
pub mod naming;
pub mod validation;

#[cfg(feature = "bot")]
pub mod bot;

// Re-export macros
pub use twilight_slash_derive::{Choices, CommandBody};

#[doc(hidden)]
pub mod __private {
    pub use anyhow;
    pub use twilight_model;
}
