use std::sync::LazyLock;

use regex::Regex;

use super::client::DiagnosisResponse;
use super::DiagnosisError;
use crate::models::DiagnosisEntry;

/// Fence delimiters wrapping the JSON array inside the response text.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("```json\n|\n```").unwrap());

/// Parse the diagnosis list out of a raw service response.
///
/// Failure policy: any parse failure degrades to an empty list. Callers must
/// treat an empty list as "no diagnosis available", not as a confirmed
/// zero-result answer from the service.
pub fn parse_diagnoses(response: &DiagnosisResponse) -> Vec<DiagnosisEntry> {
    match try_parse_diagnoses(response) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!("Failed to parse diagnosis response: {err}");
            Vec::new()
        }
    }
}

/// Fallible variant of [`parse_diagnoses`] for callers that need the cause.
pub fn try_parse_diagnoses(
    response: &DiagnosisResponse,
) -> Result<Vec<DiagnosisEntry>, DiagnosisError> {
    let text = response.response.as_str();
    if !text.contains("```json") {
        return Err(DiagnosisError::MalformedResponse(
            "No fenced JSON block found".into(),
        ));
    }

    let json_str = FENCE_RE.replace_all(text, "");
    let entries: Vec<DiagnosisEntry> = serde_json::from_str(json_str.trim())
        .map_err(|e| DiagnosisError::JsonParsing(e.to_string()))?;

    // An unnamed entry cannot key the diagnosis list; treat the whole
    // response as malformed rather than surfacing a partial differential.
    if entries.iter().any(|e| e.name.is_empty()) {
        return Err(DiagnosisError::MalformedResponse(
            "Diagnosis entry with empty name".into(),
        ));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(text: &str) -> DiagnosisResponse {
        DiagnosisResponse {
            response: text.to_string(),
        }
    }

    fn sample_response() -> DiagnosisResponse {
        response(
            "```json\n\
             [\n\
               {\n\
                 \"Diagnosis\": \"Contact Dermatitis\",\n\
                 \"Risk factors\": [\"exposure to irritant\", \"atopic history\"],\n\
                 \"Clinical features\": [\"erythema\", \"scaling\"]\n\
               },\n\
               {\n\
                 \"Diagnosis\": \"Psoriasis\",\n\
                 \"Risk factors\": [\"family history\"],\n\
                 \"Clinical features\": [\"silvery plaques\"]\n\
               },\n\
               {\n\
                 \"Diagnosis\": \"Tinea Corporis\",\n\
                 \"Risk factors\": [\"contact with infected animals\"],\n\
                 \"Clinical features\": [\"annular lesion\", \"central clearing\"]\n\
               }\n\
             ]\n```",
        )
    }

    #[test]
    fn parse_full_response_preserves_order_and_fields() {
        let entries = parse_diagnoses(&sample_response());
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "Contact Dermatitis");
        assert_eq!(entries[1].name, "Psoriasis");
        assert_eq!(entries[2].name, "Tinea Corporis");
        assert_eq!(
            entries[0].risk_factors,
            vec!["exposure to irritant", "atopic history"]
        );
        assert_eq!(entries[0].clinical_features, vec!["erythema", "scaling"]);
        assert_eq!(entries[2].clinical_features[1], "central clearing");
    }

    #[test]
    fn parse_tolerates_surrounding_whitespace() {
        let entries = parse_diagnoses(&response(
            "\n  ```json\n[{\"Diagnosis\": \"Eczema\", \"Risk factors\": [], \"Clinical features\": []}]\n```  \n",
        ));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Eczema");
    }

    #[test]
    fn parse_empty_array() {
        let entries = parse_diagnoses(&response("```json\n[]\n```"));
        assert!(entries.is_empty());
    }

    #[test]
    fn missing_fence_yields_empty() {
        let entries = parse_diagnoses(&response(
            "[{\"Diagnosis\": \"Eczema\", \"Risk factors\": [], \"Clinical features\": []}]",
        ));
        assert!(entries.is_empty());
    }

    #[test]
    fn invalid_json_yields_empty() {
        let entries = parse_diagnoses(&response("```json\n{not json}\n```"));
        assert!(entries.is_empty());
    }

    #[test]
    fn missing_field_yields_empty() {
        let entries = parse_diagnoses(&response(
            "```json\n[{\"Diagnosis\": \"Eczema\", \"Risk factors\": []}]\n```",
        ));
        assert!(entries.is_empty());
    }

    #[test]
    fn empty_name_yields_empty() {
        let entries = parse_diagnoses(&response(
            "```json\n[{\"Diagnosis\": \"\", \"Risk factors\": [], \"Clinical features\": []}]\n```",
        ));
        assert!(entries.is_empty());
    }

    #[test]
    fn try_parse_reports_missing_fence() {
        let err = try_parse_diagnoses(&response("no diagnosis here")).unwrap_err();
        assert!(matches!(err, DiagnosisError::MalformedResponse(_)));
    }

    #[test]
    fn try_parse_reports_invalid_json() {
        let err = try_parse_diagnoses(&response("```json\n{broken\n```")).unwrap_err();
        assert!(matches!(err, DiagnosisError::JsonParsing(_)));
    }
}
