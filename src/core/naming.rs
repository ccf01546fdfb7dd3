use serde::{Deserialize, Serialize};

/// How declared field names become column names.
///
/// Field names are split into words at `_`, `-` and lower-to-upper case
/// boundaries, then joined again in the target style. Collection item names
/// are never transformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// The declared name, unchanged.
    #[default]
    Verbatim,
    SnakeCase,
    CamelCase,
    PascalCase,
    KebabCase,
    ScreamingSnakeCase,
}

impl NamingConvention {
    /// Applies the convention to a declared field name.
    ///
    /// ```
    /// use csv_mapper::core::naming::NamingConvention;
    ///
    /// assert_eq!(NamingConvention::PascalCase.apply("item_count"), "ItemCount");
    /// assert_eq!(NamingConvention::CamelCase.apply("item_count"), "itemCount");
    /// assert_eq!(NamingConvention::KebabCase.apply("itemCount"), "item-count");
    /// ```
    pub fn apply(self, name: &str) -> String {
        match self {
            NamingConvention::Verbatim => name.to_string(),
            NamingConvention::SnakeCase => join_lower(name, "_"),
            NamingConvention::KebabCase => join_lower(name, "-"),
            NamingConvention::ScreamingSnakeCase => join_lower(name, "_").to_uppercase(),
            NamingConvention::PascalCase => words(name).iter().map(|w| capitalize(w)).collect(),
            NamingConvention::CamelCase => words(name)
                .iter()
                .enumerate()
                .map(|(index, word)| {
                    if index == 0 {
                        word.to_lowercase()
                    } else {
                        capitalize(word)
                    }
                })
                .collect(),
        }
    }
}

fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous_lower = false;

    for ch in name.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_lower = false;
            continue;
        }
        if ch.is_uppercase() && previous_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        previous_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn join_lower(name: &str, separator: &str) -> String {
    words(name)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(separator)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_convention_should_handle_snake_case_fields() {
        let cases = [
            (NamingConvention::Verbatim, "max_hit_points"),
            (NamingConvention::SnakeCase, "max_hit_points"),
            (NamingConvention::CamelCase, "maxHitPoints"),
            (NamingConvention::PascalCase, "MaxHitPoints"),
            (NamingConvention::KebabCase, "max-hit-points"),
            (NamingConvention::ScreamingSnakeCase, "MAX_HIT_POINTS"),
        ];
        for (convention, expected) in cases {
            assert_eq!(convention.apply("max_hit_points"), expected);
        }
    }

    #[test]
    fn words_should_split_on_case_boundaries() {
        assert_eq!(NamingConvention::SnakeCase.apply("ItemCount"), "item_count");
        assert_eq!(NamingConvention::SnakeCase.apply("level2Boss"), "level2_boss");
        assert_eq!(NamingConvention::PascalCase.apply("count"), "Count");
        assert_eq!(NamingConvention::PascalCase.apply(""), "");
    }

    #[test]
    fn convention_should_deserialize_from_snake_case() {
        let convention: NamingConvention = serde_json::from_str("\"pascal_case\"").unwrap();
        assert_eq!(convention, NamingConvention::PascalCase);
    }
}
