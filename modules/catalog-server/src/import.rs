//! Parsing for the bulk product import.
//!
//! Accepts either a JSON array of documents or JSON lines. Documents that
//! fail to parse or validate are reported and skipped; the rest are kept.

use catalog_common::Product;

/// A document that was skipped, with its 1-based position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub position: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ParsedDocuments {
    pub products: Vec<Product>,
    pub rejected: Vec<Rejected>,
}

pub fn parse_documents(content: &str) -> anyhow::Result<ParsedDocuments> {
    if content.trim_start().starts_with('[') {
        let values: Vec<serde_json::Value> = serde_json::from_str(content)?;
        Ok(partition_valid(values.into_iter().enumerate().map(|(i, v)| {
            (i + 1, serde_json::from_value::<Product>(v).map_err(|e| e.to_string()))
        })))
    } else {
        Ok(partition_valid(
            content
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(i, line)| {
                    (i + 1, serde_json::from_str::<Product>(line).map_err(|e| e.to_string()))
                }),
        ))
    }
}

fn partition_valid(items: impl Iterator<Item = (usize, Result<Product, String>)>) -> ParsedDocuments {
    let mut parsed = ParsedDocuments::default();
    for (position, result) in items {
        match result.and_then(|p| p.validate().map(|_| p).map_err(|e| e.to_string())) {
            Ok(product) => parsed.products.push(product),
            Err(reason) => parsed.rejected.push(Rejected { position, reason }),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_array() {
        let input = r#"[
            {"_id": "A", "title": "Mug"},
            {"_id": "B", "title": "Lamp", "price": 12.5}
        ]"#;
        let parsed = parse_documents(input).unwrap();
        assert_eq!(parsed.products.len(), 2);
        assert_eq!(parsed.products[1].price, Some(12.5));
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn parses_json_lines_and_skips_blank_lines() {
        let input = "{\"_id\": \"A\", \"title\": \"Mug\"}\n\n{\"_id\": \"B\", \"title\": \"Lamp\"}\n";
        let parsed = parse_documents(input).unwrap();
        let ids: Vec<_> = parsed.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);
    }

    #[test]
    fn reports_bad_documents_by_line() {
        let input = "{\"_id\": \"A\", \"title\": \"Mug\"}\nnot json\n{\"_id\": \"C\", \"title\": \"\"}\n";
        let parsed = parse_documents(input).unwrap();
        assert_eq!(parsed.products.len(), 1);
        let positions: Vec<_> = parsed.rejected.iter().map(|r| r.position).collect();
        assert_eq!(positions, [2, 3]);
    }

    #[test]
    fn malformed_array_is_an_error() {
        assert!(parse_documents("[{\"_id\": \"A\"").is_err());
    }
}
