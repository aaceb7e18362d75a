use anyhow::Result;

use crate::{arguments::CommandOptions, decode::Body};

/// Types a handler can receive in place of a raw [`Body`].
pub trait FromBody: Send + Sized + 'static {
    /// Builds the value from a decoded body
    fn from_body(body: &Body) -> Result<Self>;
}

impl FromBody for Body {
    fn from_body(body: &Body) -> Result<Self> {
        Ok(body.clone())
    }
}

/// A typed body that also knows which options it is decoded from.
///
/// Usually derived with `#[derive(CommandBody)]`.
pub trait CommandBody: FromBody {
    /// Gets the declared options, keyed by field name
    fn options() -> CommandOptions;
}
