use serde::{Deserialize, Serialize};

/// One candidate condition from the service's differential diagnosis.
///
/// Serde keys mirror the service's wire format. Entries arrive in ranking
/// order; the first is the presumed primary. `name` is non-empty and keys
/// UI expansion state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiagnosisEntry {
    #[serde(rename = "Diagnosis")]
    pub name: String,
    #[serde(rename = "Risk factors")]
    pub risk_factors: Vec<String>,
    #[serde(rename = "Clinical features")]
    pub clinical_features: Vec<String>,
}

/// Condition labels in ranking order, for the referral selection list.
pub fn diagnosis_names(entries: &[DiagnosisEntry]) -> Vec<String> {
    entries.iter().map(|e| e.name.clone()).collect()
}
