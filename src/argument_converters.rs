use anyhow::{Result, anyhow};
use twilight_model::{
    application::{
        command::CommandOptionType, interaction::application_command::CommandOptionValue,
    },
    id::{
        Id,
        marker::{AttachmentMarker, ChannelMarker, GenericMarker, RoleMarker, UserMarker},
    },
};

use crate::arguments::{ArgumentConverter, Error, OptionSchema, ToOption};

impl ArgumentConverter for String {
    fn convert(data: &CommandOptionValue) -> Result<Self> {
        if let CommandOptionValue::String(value) = data {
            Ok(value.clone())
        } else {
            Err(anyhow!(Error::InvalidType))
        }
    }
}

impl ToOption for String {
    fn to_option() -> OptionSchema {
        OptionSchema::string().required(true)
    }
}

// --- Integer Types ---
macro_rules! integer_converter {
    ($($ty:ty),*) => {
        $(
            impl ArgumentConverter for $ty {
                fn convert(data: &CommandOptionValue) -> Result<Self> {
                    if let CommandOptionValue::Integer(value) = data {
                        <$ty>::try_from(*value).map_err(|_| anyhow!(Error::OutOfRange))
                    } else {
                        Err(anyhow!(Error::InvalidType))
                    }
                }
            }

            impl ToOption for $ty {
                fn to_option() -> OptionSchema {
                    OptionSchema::integer().required(true)
                }
            }
        )*
    };
}

integer_converter!(i8, i16, i32, i64, i128, isize);
integer_converter!(u8, u16, u32, u64, u128, usize);

// --- Floating Point Types ---
macro_rules! number_converter {
    ($($ty:ty),*) => {
        $(
            impl ArgumentConverter for $ty {
                fn convert(data: &CommandOptionValue) -> Result<Self> {
                    if let CommandOptionValue::Number(value) = data {
                        Ok(*value as $ty)
                    } else {
                        Err(anyhow!(Error::InvalidType))
                    }
                }
            }

            impl ToOption for $ty {
                fn to_option() -> OptionSchema {
                    OptionSchema::number().required(true)
                }
            }
        )*
    };
}

number_converter!(f32, f64);

impl ArgumentConverter for bool {
    fn convert(data: &CommandOptionValue) -> Result<Self> {
        if let CommandOptionValue::Boolean(v) = data {
            Ok(*v)
        } else {
            Err(anyhow!(Error::InvalidType))
        }
    }
}

impl ToOption for bool {
    fn to_option() -> OptionSchema {
        OptionSchema::boolean().required(true)
    }
}

impl ArgumentConverter for char {
    fn convert(data: &CommandOptionValue) -> Result<Self> {
        if let CommandOptionValue::String(value) = data {
            value.chars().next().ok_or_else(|| anyhow!(Error::InvalidType))
        } else {
            Err(anyhow!(Error::InvalidType))
        }
    }
}

impl ToOption for char {
    fn to_option() -> OptionSchema {
        OptionSchema::string().max_length(1).required(true)
    }
}

// --- Ids ---
macro_rules! id_converter {
    ($marker:ty, $variant:ident, $kind:expr) => {
        impl ArgumentConverter for Id<$marker> {
            fn convert(data: &CommandOptionValue) -> Result<Self> {
                if let CommandOptionValue::$variant(id) = data {
                    Ok(*id)
                } else {
                    Err(anyhow!(Error::InvalidType))
                }
            }
        }

        impl ToOption for Id<$marker> {
            fn to_option() -> OptionSchema {
                OptionSchema::new($kind).required(true)
            }
        }
    };
}

id_converter!(UserMarker, User, CommandOptionType::User);
id_converter!(RoleMarker, Role, CommandOptionType::Role);
// NOTE: channel type filters are set per field, see `OptionSchema::channel_types`
id_converter!(ChannelMarker, Channel, CommandOptionType::Channel);
// Mentionable resolves to either a user or a role
id_converter!(GenericMarker, Mentionable, CommandOptionType::Mentionable);
id_converter!(AttachmentMarker, Attachment, CommandOptionType::Attachment);
