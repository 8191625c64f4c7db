//! Lenient parsing of classifier responses.

use lazy_static::lazy_static;
use regex::Regex;

use super::Result;
use crate::error::ClassificationError;
use crate::models::invoice::DetectedInvoice;

lazy_static! {
    // Unterminated fences run to the end of the text
    static ref JSON_FENCE: Regex = Regex::new(r"(?s)```json(.*?)(?:```|$)").unwrap();
    static ref PLAIN_FENCE: Regex = Regex::new(r"(?s)```(.*?)(?:```|$)").unwrap();
}

/// Parse the invoice array out of a model response.
///
/// Accepts bare JSON, a ```` ```json ```` fenced block, or a plain fenced block,
/// tried in that order.
pub fn parse_invoice_response(text: &str) -> Result<Vec<DetectedInvoice>> {
    let trimmed = text.trim();

    let direct_error = match serde_json::from_str::<Vec<DetectedInvoice>>(trimmed) {
        Ok(invoices) => return Ok(invoices),
        Err(e) => e,
    };

    let fence = if trimmed.contains("```json") {
        &*JSON_FENCE
    } else if trimmed.contains("```") {
        &*PLAIN_FENCE
    } else {
        return Err(ClassificationError::Parse(direct_error.to_string()));
    };

    let inner = fence
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or_default();

    serde_json::from_str(inner).map_err(|e| ClassificationError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_bare_array() {
        let text = r#"
            [{"invoice_number": "INV-1", "page_numbers": [1, 2], "invoice_type": "GST", "hotel_name": "H1"},
             {"invoice_number": "INV-2", "page_numbers": [3], "invoice_type": "Proforma", "hotel_name": "H2"}]
        "#;

        let invoices = parse_invoice_response(text).unwrap();
        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].invoice_number.as_deref(), Some("INV-1"));
        assert_eq!(invoices[0].page_numbers, Some(vec![1, 2]));
        assert_eq!(invoices[0].invoice_type, "GST");
        assert_eq!(invoices[1].hotel_name, "H2");
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_invoice_response("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_json_fence() {
        let text = "Here you go:\n```json\n[{\"invoice_number\": \"A-7\"}]\n```\nAnything else?";
        let invoices = parse_invoice_response(text).unwrap();
        assert_eq!(invoices, vec![DetectedInvoice {
            invoice_number: Some("A-7".to_string()),
            page_numbers: None,
            invoice_type: "Unknown".to_string(),
            hotel_name: "Unknown".to_string(),
        }]);
    }

    #[test]
    fn test_parse_plain_fence() {
        let text = "```\n[{\"invoice_number\": \"B-1\", \"hotel_name\": \"Ritz\"}]\n```";
        let invoices = parse_invoice_response(text).unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].hotel_name, "Ritz");
    }

    #[test]
    fn test_parse_unterminated_fence() {
        let text = "```json\n[{\"invoice_number\": \"C-3\"}]";
        let invoices = parse_invoice_response(text).unwrap();
        assert_eq!(invoices[0].invoice_number.as_deref(), Some("C-3"));
    }

    #[test]
    fn test_parse_prose_fails() {
        let err = parse_invoice_response("I could not find any invoices.").unwrap_err();
        assert!(matches!(err, ClassificationError::Parse(_)));
    }

    #[test]
    fn test_parse_object_instead_of_array_fails() {
        let err = parse_invoice_response(r#"{"invoice_number": "X"}"#).unwrap_err();
        assert!(matches!(err, ClassificationError::Parse(_)));
    }

    #[test]
    fn test_parse_broken_fenced_json_fails() {
        let err = parse_invoice_response("```json\n[{\"invoice_number\": ]\n```").unwrap_err();
        assert!(matches!(err, ClassificationError::Parse(_)));
    }
}
