//! Mapper swap — literal find-and-replace on the raw body before scanning.
//!
//! `?oldMapper=basket&newMapper=bag` rewrites every whole-word `basket` to
//! `bag` and `basket_MAPPER` to `bag_MAPPER`, case-insensitively.

use std::borrow::Cow;

use regex::{Captures, Regex};

pub const MAPPER_SUFFIX: &str = "_MAPPER";

/// Rewrite whole-word occurrences of `old` (and `old_MAPPER`) to `new`.
pub fn swap_mappers<'a>(template: &'a str, old: &str, new: &str) -> Cow<'a, str> {
    if old.is_empty() {
        return Cow::Borrowed(template);
    }
    let pattern = format!(r"(?i)\b{}({})?\b", regex::escape(old), MAPPER_SUFFIX);
    let mapper = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(err) => {
            tracing::warn!("mapper '{}' not applied: {}", old, err);
            return Cow::Borrowed(template);
        }
    };
    mapper.replace_all(template, |caps: &Captures<'_>| {
        let suffix = caps.get(1).map_or("", |m| m.as_str());
        format!("{new}{suffix}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_whole_words_and_suffixed_variant() {
        let body = "{{> views/basket|basket}} {{> x|basket_MAPPER}} baskets";
        let out = swap_mappers(body, "basket", "bag");
        assert_eq!(out, "{{> views/bag|bag}} {{> x|bag_MAPPER}} baskets");
    }

    #[test]
    fn match_is_case_insensitive() {
        assert_eq!(swap_mappers("Basket BASKET", "basket", "bag"), "bag bag");
    }

    #[test]
    fn replacement_is_literal() {
        assert_eq!(swap_mappers("old", "old", "$1new"), "$1new");
    }

    #[test]
    fn metacharacters_in_old_name_are_escaped() {
        assert_eq!(swap_mappers("a.b axb", "a.b", "c"), "c axb");
    }

    #[test]
    fn empty_old_name_is_a_no_op() {
        assert!(matches!(swap_mappers("abc", "", "x"), Cow::Borrowed("abc")));
    }
}
