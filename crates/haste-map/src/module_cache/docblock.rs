//! Leading docblock extraction and `@directive` parsing.

/// Returns the leading block comment (`/* ... */` or `/** ... */`) of
/// `contents`, ignoring leading whitespace.
pub fn extract(contents: &str) -> Option<&str> {
    let trimmed = contents.trim_start();
    if !trimmed.starts_with("/*") {
        return None;
    }
    let end = trimmed[2..].find("*/")?;
    Some(&trimmed[..end + 4])
}

/// Parses `@name value` directives out of a docblock.
///
/// Directives without a value are reported with an empty string.
pub fn parse_directives(docblock: &str) -> Vec<(String, String)> {
    let body = docblock
        .trim_start_matches("/**")
        .trim_start_matches("/*")
        .trim_end_matches("*/");

    let mut directives = Vec::new();
    for line in body.lines() {
        let line = line.trim_start().trim_start_matches('*').trim();
        let Some(rest) = line.strip_prefix('@') else {
            continue;
        };
        let mut parts = rest.splitn(2, char::is_whitespace);
        let Some(key) = parts.next().filter(|key| !key.is_empty()) else {
            continue;
        };
        let value = parts.next().unwrap_or("").trim().to_string();
        directives.push((key.to_string(), value));
    }
    directives
}

/// The name declared with `@providesModule`, if any.
pub fn provides_module(contents: &str) -> Option<String> {
    let docblock = extract(contents)?;
    parse_directives(docblock)
        .into_iter()
        .find(|(key, _)| key == "providesModule")
        .and_then(|(_, value)| value.split_whitespace().next().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_leading_comment_only() {
        let source = "\n  /**\n * @providesModule Foo\n */\nconst a = 1; /* other */";
        assert_eq!(
            extract(source),
            Some("/**\n * @providesModule Foo\n */")
        );
        assert_eq!(extract("const a = 1;\n/** late */"), None);
        assert_eq!(extract("/** unterminated"), None);
    }

    #[test]
    fn parses_directives() {
        let docblock = "/**\n * Copyright\n *\n * @providesModule Foo\n * @flow\n */";
        let directives = parse_directives(docblock);
        assert_eq!(
            directives,
            vec![
                ("providesModule".to_string(), "Foo".to_string()),
                ("flow".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn provides_module_reads_first_token() {
        assert_eq!(
            provides_module("/** @providesModule Bar trailing */\nmodule.exports = {};"),
            Some("Bar".to_string())
        );
        assert_eq!(provides_module("/**\n * @flow\n */"), None);
        assert_eq!(provides_module("/** @providesModule */"), None);
        assert_eq!(provides_module("module.exports = {};"), None);
    }
}
