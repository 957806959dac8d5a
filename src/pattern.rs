//! Placeholder tokens and template expansion.

use crate::constants::patterns::{TITLE_CASE_DELIMITERS, TOKEN_ORDER};
use crate::errors::MarqueeError;
use crate::pool::PoolKind;

/// Fixed placeholder tokens recognised in templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// `%F`
    FirstName,
    /// `%L`
    LastName,
    /// `%H`
    Honorific,
    /// `%O`
    Occupation,
    /// `%C`
    CharacterName,
    /// `%n`
    Numeral,
    /// `%P`
    PerformerPrefix,
}

impl Token {
    /// Literal placeholder text.
    pub const fn literal(&self) -> &'static str {
        match self {
            Token::FirstName => "%F",
            Token::LastName => "%L",
            Token::Honorific => "%H",
            Token::Occupation => "%O",
            Token::CharacterName => "%C",
            Token::Numeral => "%n",
            Token::PerformerPrefix => "%P",
        }
    }

    /// Pool that supplies this token; `None` for numerals, which use a literal corpus.
    pub const fn pool_kind(&self) -> Option<PoolKind> {
        match self {
            Token::FirstName => Some(PoolKind::FirstName),
            Token::LastName => Some(PoolKind::LastName),
            Token::Honorific => Some(PoolKind::Honorific),
            Token::Occupation => Some(PoolKind::Occupation),
            Token::CharacterName => Some(PoolKind::CharacterName),
            Token::Numeral => None,
            Token::PerformerPrefix => Some(PoolKind::PerformerPrefix),
        }
    }

    /// Whether substituted values are title-cased before insertion.
    pub const fn title_cases_value(&self) -> bool {
        matches!(self, Token::Occupation | Token::CharacterName)
    }
}

/// Tokens present in `template`, in substitution order.
pub fn tokens_in(template: &str) -> Vec<Token> {
    TOKEN_ORDER
        .into_iter()
        .filter(|token| template.contains(token.literal()))
        .collect()
}

/// Replace every present token with one value from `resolve`, then trim.
///
/// `resolve` is called once per distinct token, in substitution order; all
/// occurrences of that token receive the same value. Only placeholders written
/// in `template` are replaced, never text that arrives inside a value.
pub fn expand_template<F>(template: &str, mut resolve: F) -> Result<String, MarqueeError>
where
    F: FnMut(Token) -> Result<String, MarqueeError>,
{
    let mut values = Vec::new();
    for token in tokens_in(template) {
        let mut value = resolve(token)?;
        if token.title_cases_value() {
            value = title_case(&value);
        }
        values.push((token, value));
    }

    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        if let Some((token, value)) = values
            .iter()
            .find(|(token, _)| rest.starts_with(token.literal()))
        {
            expanded.push_str(value);
            rest = &rest[token.literal().len()..];
            continue;
        }
        let mut chars = rest.chars();
        match chars.next() {
            Some(ch) => {
                expanded.push(ch);
                rest = chars.as_str();
            }
            None => break,
        }
    }
    Ok(expanded.trim().to_string())
}

/// Uppercase the first character of every word; words are delimited by spaces and hyphens.
///
/// Other characters are left untouched.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_boundary = true;
    for ch in text.chars() {
        if at_boundary {
            result.extend(ch.to_uppercase());
        } else {
            result.push(ch);
        }
        at_boundary = TITLE_CASE_DELIMITERS.contains(&ch);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_uses_space_and_hyphen_boundaries() {
        assert_eq!(title_case("red orange yellow"), "Red Orange Yellow");
        assert_eq!(title_case("blue-indigo violet"), "Blue-Indigo Violet");
        assert_eq!(title_case("bar-baz"), "Bar-Baz");
        assert_eq!(title_case("the Green"), "The Green");
        assert_eq!(title_case("mcDONALD"), "McDONALD");
        assert_eq!(title_case("élan"), "Élan");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn tokens_are_detected_independently() {
        assert_eq!(tokens_in("%F %L"), [Token::FirstName, Token::LastName]);
        assert_eq!(tokens_in("the %O"), [Token::Occupation]);
        assert_eq!(
            tokens_in("%P %F %L %n"),
            [
                Token::FirstName,
                Token::LastName,
                Token::Numeral,
                Token::PerformerPrefix
            ]
        );
        assert!(tokens_in("plain text").is_empty());
    }

    #[test]
    fn every_occurrence_receives_the_same_value() {
        let mut calls = Vec::new();
        let expanded = expand_template("%F and %F %L", |token| {
            calls.push(token);
            Ok(match token {
                Token::FirstName => "Jane".to_string(),
                _ => "Doe".to_string(),
            })
        })
        .unwrap();
        assert_eq!(expanded, "Jane and Jane Doe");
        assert_eq!(calls, [Token::FirstName, Token::LastName]);
    }

    #[test]
    fn occupations_and_character_names_are_title_cased() {
        let role = expand_template("the %O", |_| Ok("red orange yellow".to_string())).unwrap();
        assert_eq!(role, "the Red Orange Yellow");
        let role = expand_template("%C", |_| Ok("bar-baz".to_string())).unwrap();
        assert_eq!(role, "Bar-Baz");
        let name = expand_template("%F", |_| Ok("blueberry".to_string())).unwrap();
        assert_eq!(name, "blueberry");
    }

    #[test]
    fn placeholder_text_inside_values_is_left_alone() {
        let expanded = expand_template("%F %L", |token| {
            Ok(match token {
                Token::FirstName => "100%Legit".to_string(),
                _ => "Doe".to_string(),
            })
        })
        .unwrap();
        assert_eq!(expanded, "100%Legit Doe");

        let expanded = expand_template("%P %F", |token| {
            Ok(match token {
                Token::FirstName => "%P".to_string(),
                _ => "Sir".to_string(),
            })
        })
        .unwrap();
        assert_eq!(expanded, "Sir %P");
    }

    #[test]
    fn result_is_trimmed_and_errors_propagate() {
        let expanded = expand_template("%H %F", |token| {
            Ok(match token {
                Token::Honorific => String::new(),
                _ => "Max".to_string(),
            })
        })
        .unwrap();
        assert_eq!(expanded, "Max");

        let err = expand_template("%L", |_| {
            Err(MarqueeError::EmptyPool {
                pool: "last_name".into(),
            })
        })
        .unwrap_err();
        assert!(matches!(err, MarqueeError::EmptyPool { .. }));
    }
}
