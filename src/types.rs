/// History bookkeeping key; equal to the name of the corpus that produced the values.
/// Examples: `first_names`, `name_pattern`, `numeral`
pub type DomainName = String;
/// A single candidate string held by a corpus.
/// Examples: `Blueberry`, `Bradford-On-Avon`, `Vice Chancellor`
pub type CorpusItem = String;
/// Directory-level grouping of corpus files.
/// Examples: `humans`, `occupations`, `geography`
pub type CategoryId = String;
/// Corpus file identifier (file stem without `.json`).
/// Examples: `firstNames`, `english_towns_cities`
pub type CorpusId = String;
/// Template string containing placeholder tokens.
/// Examples: `%F %L`, `the %O`
pub type Template = String;
/// Regex source text used by unwanted-word filters.
/// Examples: `pepsi`, `\s?person`
pub type FilterPattern = String;
