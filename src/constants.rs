use crate::pattern::Token;

/// Constants used by history persistence.
pub mod history {
    /// Filename of the persisted history inside the data directory.
    pub const HISTORY_FILENAME: &str = "history.json";
    /// Payload written when a history file is created for the first time.
    pub const EMPTY_HISTORY_PAYLOAD: &str = "{}";
}

/// Constants used by corpus files and directory sources.
pub mod corpus {
    /// Extension (without dot) expected on corpus files.
    pub const CORPUS_FILE_EXTENSION: &str = "json";
}

/// Constants used by template expansion.
pub mod patterns {
    use super::Token;

    /// History domain for drawn performer-name templates.
    pub const NAME_PATTERN_DOMAIN: &str = "name_pattern";
    /// History domain for drawn role templates.
    pub const ROLE_PATTERN_DOMAIN: &str = "role_pattern";
    /// History domain for drawn numerals.
    pub const NUMERAL_DOMAIN: &str = "numeral";

    /// Default performer-name templates.
    pub const DEFAULT_NAME_PATTERNS: [&str; 5] = ["%F %L", "%F", "%H %L", "%H %F %L", "%P %F %L"];
    /// Default role templates. Numbered roles (`%O %n`) are opt-in through the manifest.
    pub const DEFAULT_ROLE_PATTERNS: [&str; 2] = ["the %O", "%C"];
    /// Default numerals substituted for `%n` when a configured template uses it.
    pub const DEFAULT_NUMERALS: [&str; 3] = ["1", "2", "3"];

    /// Substitution order applied to every template.
    pub const TOKEN_ORDER: [Token; 7] = [
        Token::FirstName,
        Token::LastName,
        Token::Honorific,
        Token::Occupation,
        Token::CharacterName,
        Token::Numeral,
        Token::PerformerPrefix,
    ];

    /// Characters treated as word boundaries when title-casing.
    pub const TITLE_CASE_DELIMITERS: [char; 2] = [' ', '-'];
}

/// Constants used by the engine and its runner.
pub mod engine {
    /// Environment variable naming the directory that holds `history.json`.
    pub const DATA_DIR_ENV: &str = "MARQUEE_DATA";
    /// Environment variable naming the corpora root directory.
    pub const CORPORA_DIR_ENV: &str = "MARQUEE_CORPORA";
    /// Default manifest filename looked up under the corpora root.
    pub const DEFAULT_MANIFEST_FILENAME: &str = "manifest.json";
}
