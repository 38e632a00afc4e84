//! Identifier filtering for generated constant names.

/// Normalize a display name into an identifier-safe fragment.
///
/// Drops `!`, `'` and `"`, replaces spaces with underscores, uppercases,
/// then strips leading characters until the first alphabetic one.
///
/// ```text
/// "Bob's Pipeline!" → "BOBS_PIPELINE"
/// "Landing Site"    → "LANDING_SITE"
/// "2nd Hall"        → "ND_HALL"
/// "!!!"             → ""
/// ```
///
/// Idempotent: filtering an already-filtered name returns it unchanged.
/// May return an empty string when the input has no alphabetic characters;
/// callers decide what to do with those.
pub fn filter_name(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '!' | '\'' | '"' => {}
            ' ' => result.push('_'),
            _ => result.extend(ch.to_uppercase()),
        }
    }
    let start = result
        .find(|c: char| c.is_alphabetic())
        .unwrap_or(result.len());
    result.split_off(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_uppercases() {
        assert_eq!(filter_name("Bob's Pipeline!"), "BOBS_PIPELINE");
        assert_eq!(filter_name("Landing Site"), "LANDING_SITE");
        assert_eq!(filter_name("Hive Chamber A"), "HIVE_CHAMBER_A");
        assert_eq!(filter_name("\"Quoted\" Hall"), "QUOTED_HALL");
    }

    #[test]
    fn strips_leading_non_alphabetic() {
        assert_eq!(filter_name("2nd Hall"), "ND_HALL");
        assert_eq!(filter_name(" Spires"), "SPIRES");
        assert_eq!(filter_name("!Agon"), "AGON");
    }

    #[test]
    fn all_symbol_input_yields_empty() {
        assert_eq!(filter_name("!!!"), "");
        assert_eq!(filter_name("'\"! 123"), "");
        assert_eq!(filter_name(""), "");
    }

    #[test]
    fn idempotent() {
        for name in ["Bob's Pipeline!", "Landing Site", "M01_SidehopperStation", "!!!"] {
            let once = filter_name(name);
            assert_eq!(filter_name(&once), once);
        }
    }
}
