//! Conversion between handler field names (`userId`) and the lowercase,
//! hyphenated names Discord accepts for options (`user-id`).
//!
//! The two functions are inverses for identifiers built from ASCII letters with
//! internal word boundaries. Runs of capitals (`userID`) and a digit followed by
//! a capital (`line2Go`) are not separated by [`to_wire_name`], so they do not
//! survive a round trip.

/// Converts a field name to its wire name.
///
/// A `-` is inserted between every lowercase letter and the uppercase letter
/// following it, then the whole name is lowercased.
pub fn to_wire_name(field: &str) -> String {
    let mut wire = String::with_capacity(field.len() + 4);
    let mut previous: Option<char> = None;
    for c in field.chars() {
        if c.is_ascii_uppercase() && previous.is_some_and(|p| p.is_ascii_lowercase()) {
            wire.push('-');
        }
        wire.push(c.to_ascii_lowercase());
        previous = Some(c);
    }
    wire
}

/// Converts a wire name back to a field name.
///
/// Every `-` directly followed by a lowercase letter is dropped and the letter
/// is uppercased. Anything else passes through untouched.
pub fn to_field_name(wire: &str) -> String {
    let mut field = String::with_capacity(wire.len());
    let mut chars = wire.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-'
            && let Some(next) = chars.peek().copied()
            && next.is_ascii_lowercase()
        {
            field.push(next.to_ascii_uppercase());
            chars.next();
            continue;
        }
        field.push(c);
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_splits_word_boundaries() {
        assert_eq!(to_wire_name("userId"), "user-id");
        assert_eq!(to_wire_name("developmentGuildId"), "development-guild-id");
        assert_eq!(to_wire_name("message"), "message");
    }

    #[test]
    fn wire_name_lowercases_leading_capital() {
        assert_eq!(to_wire_name("Message"), "message");
    }

    #[test]
    fn field_name_joins_hyphenated_words() {
        assert_eq!(to_field_name("user-id"), "userId");
        assert_eq!(to_field_name("development-guild-id"), "developmentGuildId");
        assert_eq!(to_field_name("line"), "line");
    }

    #[test]
    fn field_name_keeps_hyphen_before_non_lowercase() {
        assert_eq!(to_field_name("page-2"), "page-2");
        assert_eq!(to_field_name("trailing-"), "trailing-");
    }

    #[test]
    fn underscores_pass_through_both_ways() {
        assert_eq!(to_wire_name("user_id"), "user_id");
        assert_eq!(to_field_name("user_id"), "user_id");
    }

    #[test]
    fn round_trips_camel_case_identifiers() {
        for name in ["to", "message", "userId", "maxLineCount", "aB", "channelIdOverride"] {
            assert_eq!(to_field_name(&to_wire_name(name)), name, "{name}");
        }
    }

    #[test]
    fn acronyms_do_not_round_trip() {
        assert_eq!(to_wire_name("userID"), "user-id");
        assert_eq!(to_field_name(&to_wire_name("userID")), "userId");
    }

    #[test]
    fn digit_then_capital_does_not_round_trip() {
        assert_eq!(to_wire_name("line2Go"), "line2go");
        assert_eq!(to_field_name(&to_wire_name("line2Go")), "line2go");
    }
}
