use crate::bib::{self, BibError};
use crate::models::Entry;
use leptos::logging::{log, warn};

/// Element the server fills with the bibliography.
pub(crate) const BIB_DATA_ID: &str = "bib-data";

const JSON_TYPE: &str = "application/json";
const BIBTEX_TYPE: &str = "text/x-bibtex";

#[derive(Debug)]
pub(crate) enum BootstrapError {
    UnknownType(String),
    Json(serde_json::Error),
    Bib(BibError),
}

impl std::fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootstrapError::UnknownType(t) => write!(f, "unsupported bib-data type {t:?}"),
            BootstrapError::Json(e) => write!(f, "bad entry JSON: {e}"),
            BootstrapError::Bib(e) => write!(f, "bad BibTeX: {e}"),
        }
    }
}

/// Decode the embedded payload according to its `type` attribute.
pub(crate) fn parse_payload(content_type: &str, text: &str) -> Result<Vec<Entry>, BootstrapError> {
    match content_type.trim() {
        JSON_TYPE => serde_json::from_str(text).map_err(BootstrapError::Json),
        BIBTEX_TYPE => bib::read_entries(text).map_err(BootstrapError::Bib),
        other => Err(BootstrapError::UnknownType(other.to_string())),
    }
}

/// Entries embedded in the current document. Empty when there are none or
/// when the payload cannot be read.
pub(crate) fn load_embedded_entries() -> Vec<Entry> {
    let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(BIB_DATA_ID))
    else {
        log!("no #{BIB_DATA_ID} element; starting with an empty list");
        return vec![];
    };

    let content_type = el
        .get_attribute("type")
        .unwrap_or_else(|| JSON_TYPE.to_string());
    let text = el.text_content().unwrap_or_default();

    match parse_payload(&content_type, &text) {
        Ok(entries) => {
            log!("loaded {} entries", entries.len());
            entries
        }
        Err(e) => {
            warn!("ignoring #{BIB_DATA_ID}: {e}");
            vec![]
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_payload() {
        let json = r#"[
            {"key": "bib42", "type": "article", "fields": [
                {"name": "author", "value": "Doe"},
                {"name": "year", "value": "2001"}
            ]}
        ]"#;
        let entries = parse_payload("application/json", json).expect("json payload");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "bib42");
        assert_eq!(entries[0].fields[1].name, "year");
    }

    #[test]
    fn test_parse_bibtex_payload() {
        let text = "@book{k1,\n  title = {Rust}\n}\n@comment{x}";
        let entries = parse_payload(" text/x-bibtex ", text).expect("bibtex payload");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field("title"), Some("Rust"));
    }

    #[test]
    fn test_parse_payload_rejects_unknown_type() {
        let err = parse_payload("text/plain", "").expect_err("unknown type");
        assert!(matches!(err, BootstrapError::UnknownType(t) if t == "text/plain"));
    }

    #[test]
    fn test_parse_payload_reports_bad_json() {
        let err = parse_payload(JSON_TYPE, "[{").expect_err("bad json");
        assert!(err.to_string().starts_with("bad entry JSON"));
    }
}
