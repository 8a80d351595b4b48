use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"`([^`]*)`|"([^"]*)"|([^.`"]+)"#).expect("identifier pattern"));

pub struct IdentifierParser;

impl IdentifierParser {
    /// Split a raw qualified name (`db.table.column`, `` `table`.`column` ``)
    /// into its identifier parts, stripping backtick and double-quote
    /// delimiters. Empty input yields no parts.
    pub fn parse(raw: &str) -> Vec<String> {
        IDENTIFIER_PART
            .captures_iter(raw)
            .filter_map(|capture| {
                let part = capture
                    .get(1)
                    .or_else(|| capture.get(2))
                    .or_else(|| capture.get(3))
                    .map(|found| found.as_str().trim())?;
                if part.is_empty() {
                    None
                } else {
                    Some(part.to_string())
                }
            })
            .collect()
    }
}
