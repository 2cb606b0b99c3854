use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ClinicInfo;
use crate::models::{format_date, non_empty, DiagnosisEntry, PatientHistory, ReferralRequest};

/// Letter title, fixed by the template.
const LETTER_TITLE: &str = "DERMATOLOGY REFERRAL LETTER";

/// Confidentiality footer, fixed by the template.
const LETTER_FOOTER: &str =
    "CONFIDENTIAL: This document contains protected health information.";

const LETTER_CLOSING: &str = "Please do not hesitate to contact me if you require further \
     information. I look forward to your evaluation and recommendations. \
     Thank you for your attention to this referral.";

/// A label/value line in a letter section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LetterRow {
    pub label: String,
    pub value: String,
}

impl LetterRow {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// The assembled referral letter, ready for rendering.
///
/// A pure data product of [`ReferralLetter::build`]; holds no handles and
/// performs no I/O.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferralLetter {
    pub clinic: ClinicInfo,
    /// Date the letter was generated, printed as DD/MM/YYYY.
    pub referral_date: NaiveDate,
    pub title: String,
    pub introduction: String,
    pub patient_information: Vec<LetterRow>,
    pub clinical_details: Vec<LetterRow>,
    /// Present only when at least one medical-background field has content.
    pub medical_background: Option<Vec<LetterRow>>,
    pub diagnosis_statement: String,
    pub closing: String,
    pub signature_lines: Vec<String>,
    pub footer: String,
    /// Full entry for the selected diagnosis when it matches the current
    /// response. The letter template prints only the label; the detail is
    /// carried for callers that want it.
    pub diagnosis_detail: Option<DiagnosisEntry>,
}

impl ReferralLetter {
    /// Assemble a referral letter from the form inputs and the current
    /// differential.
    ///
    /// `selected_diagnosis` is matched against `entries` by exact name; an
    /// unmatched label still produces a letter with the label as given.
    pub fn build(
        request: &ReferralRequest,
        history: &PatientHistory,
        entries: &[DiagnosisEntry],
        clinic: &ClinicInfo,
        today: NaiveDate,
    ) -> Self {
        let diagnosis_detail = entries
            .iter()
            .find(|e| e.name == request.selected_diagnosis)
            .cloned();

        let introduction = format!(
            "I am referring {} to your clinic for further evaluation of suspected {}. \
             I would appreciate your expert assessment and management recommendations \
             for this patient. Please see patient for follow up.",
            request.patient_name, request.selected_diagnosis,
        );

        let mut patient_information = vec![
            LetterRow::new("Name:", request.patient_name.clone()),
            LetterRow::new("Phone:", request.phone.clone()),
            LetterRow::new("Email:", request.email.clone()),
            LetterRow::new("Date of Birth:", format_date(history.date_of_birth)),
            LetterRow::new("Gender:", history.gender.as_str()),
        ];
        if let Some(race) = non_empty(&history.race) {
            patient_information.push(LetterRow::new("Race:", race));
        }

        let mut clinical_details = vec![
            LetterRow::new("Onset Date:", format_date(history.onset)),
            LetterRow::new(
                "Duration:",
                non_empty(&history.duration).unwrap_or("Not provided"),
            ),
            LetterRow::new(
                "Lesion Location:",
                non_empty(&history.location).unwrap_or("Not provided"),
            ),
        ];
        if let Some(itch) = non_empty(&history.itch) {
            clinical_details.push(LetterRow::new("Symptoms:", itch));
        }

        let medical_background = if history.has_medical_background() {
            let mut rows = Vec::new();
            if let Some(past) = non_empty(&history.past_medical_history) {
                rows.push(LetterRow::new("Past Medical History:", past));
            }
            if let Some(family) = non_empty(&history.family_history) {
                rows.push(LetterRow::new("Family History:", family));
            }
            if let Some(other) = non_empty(&history.other_pertinent_history) {
                rows.push(LetterRow::new("Other History:", other));
            }
            Some(rows)
        } else {
            None
        };

        let diagnosis_statement = format!(
            "Based on the submitted images and patient history, findings are suspected \
             to be: {}",
            request.selected_diagnosis,
        );

        let signature_lines = vec![
            "Yours sincerely,".to_string(),
            clinic.physician.clone(),
            clinic.physician_role.clone(),
            clinic.name.clone(),
        ];

        Self {
            clinic: clinic.clone(),
            referral_date: today,
            title: LETTER_TITLE.to_string(),
            introduction,
            patient_information,
            clinical_details,
            medical_background,
            diagnosis_statement,
            closing: LETTER_CLOSING.to_string(),
            signature_lines,
            footer: LETTER_FOOTER.to_string(),
            diagnosis_detail,
        }
    }

    /// The referral date as printed on the letter.
    pub fn formatted_date(&self) -> String {
        self.referral_date.format("%d/%m/%Y").to_string()
    }

    fn row<'a>(rows: &'a [LetterRow], label: &str) -> Option<&'a LetterRow> {
        rows.iter().find(|r| r.label == label)
    }

    /// Look up a patient-information row by label (tests and previews).
    pub fn patient_row(&self, label: &str) -> Option<&LetterRow> {
        Self::row(&self.patient_information, label)
    }

    /// Look up a clinical-details row by label.
    pub fn clinical_row(&self, label: &str) -> Option<&LetterRow> {
        Self::row(&self.clinical_details, label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn jane_request() -> ReferralRequest {
        ReferralRequest {
            patient_name: "Jane Doe".into(),
            phone: "+6591234567".into(),
            email: "jane@example.com".into(),
            selected_diagnosis: "Contact Dermatitis".into(),
        }
    }

    fn jane_history() -> PatientHistory {
        PatientHistory {
            date_of_birth: None,
            gender: Gender::Female,
            race: None,
            onset: NaiveDate::from_ymd_opt(2024, 1, 5),
            duration: Some("3 weeks".into()),
            location: Some("left forearm".into()),
            itch: None,
            past_medical_history: None,
            family_history: None,
            other_pertinent_history: None,
        }
    }

    fn contact_dermatitis() -> DiagnosisEntry {
        DiagnosisEntry {
            name: "Contact Dermatitis".into(),
            risk_factors: vec!["exposure to irritant".into()],
            clinical_features: vec!["erythema".into(), "scaling".into()],
        }
    }

    fn build_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()
    }

    #[test]
    fn end_to_end_letter_content() {
        let letter = ReferralLetter::build(
            &jane_request(),
            &jane_history(),
            &[contact_dermatitis()],
            &ClinicInfo::default(),
            build_date(),
        );

        assert_eq!(letter.patient_row("Name:").unwrap().value, "Jane Doe");
        assert_eq!(letter.patient_row("Phone:").unwrap().value, "+6591234567");
        assert_eq!(
            letter.patient_row("Email:").unwrap().value,
            "jane@example.com"
        );
        assert_eq!(
            letter.patient_row("Date of Birth:").unwrap().value,
            "Not provided"
        );
        assert_eq!(letter.patient_row("Gender:").unwrap().value, "Female");
        assert!(letter.patient_row("Race:").is_none());

        assert!(letter
            .diagnosis_statement
            .ends_with("suspected to be: Contact Dermatitis"));
        assert!(letter.medical_background.is_none());
        assert!(letter.introduction.contains("Jane Doe"));
        assert!(letter.introduction.contains("Contact Dermatitis"));
    }

    #[test]
    fn clinical_details_rows() {
        let letter = ReferralLetter::build(
            &jane_request(),
            &jane_history(),
            &[contact_dermatitis()],
            &ClinicInfo::default(),
            build_date(),
        );
        assert_eq!(
            letter.clinical_row("Onset Date:").unwrap().value,
            "05/01/2024"
        );
        assert_eq!(letter.clinical_row("Duration:").unwrap().value, "3 weeks");
        assert_eq!(
            letter.clinical_row("Lesion Location:").unwrap().value,
            "left forearm"
        );
        assert!(letter.clinical_row("Symptoms:").is_none());
    }

    #[test]
    fn symptoms_row_when_itch_present() {
        let mut history = jane_history();
        history.itch = Some("itching at night".into());
        let letter = ReferralLetter::build(
            &jane_request(),
            &history,
            &[],
            &ClinicInfo::default(),
            build_date(),
        );
        assert_eq!(
            letter.clinical_row("Symptoms:").unwrap().value,
            "itching at night"
        );
    }

    #[test]
    fn race_row_when_present() {
        let mut history = jane_history();
        history.race = Some("Chinese".into());
        let letter = ReferralLetter::build(
            &jane_request(),
            &history,
            &[],
            &ClinicInfo::default(),
            build_date(),
        );
        assert_eq!(letter.patient_row("Race:").unwrap().value, "Chinese");
    }

    #[test]
    fn medical_background_omitted_when_all_empty() {
        let mut history = jane_history();
        history.past_medical_history = Some(String::new());
        let letter = ReferralLetter::build(
            &jane_request(),
            &history,
            &[],
            &ClinicInfo::default(),
            build_date(),
        );
        assert!(letter.medical_background.is_none());
    }

    #[test]
    fn medical_background_contains_only_nonempty_rows() {
        let mut history = jane_history();
        history.family_history = Some("psoriasis (mother)".into());
        let letter = ReferralLetter::build(
            &jane_request(),
            &history,
            &[],
            &ClinicInfo::default(),
            build_date(),
        );
        let rows = letter.medical_background.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Family History:");
        assert_eq!(rows[0].value, "psoriasis (mother)");
    }

    #[test]
    fn medical_background_all_three_rows() {
        let mut history = jane_history();
        history.past_medical_history = Some("eczema".into());
        history.family_history = Some("psoriasis".into());
        history.other_pertinent_history = Some("recent travel".into());
        let letter = ReferralLetter::build(
            &jane_request(),
            &history,
            &[],
            &ClinicInfo::default(),
            build_date(),
        );
        let rows = letter.medical_background.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].label, "Other History:");
    }

    #[test]
    fn matched_diagnosis_detail_carried() {
        let letter = ReferralLetter::build(
            &jane_request(),
            &jane_history(),
            &[contact_dermatitis()],
            &ClinicInfo::default(),
            build_date(),
        );
        let detail = letter.diagnosis_detail.unwrap();
        assert_eq!(detail.name, "Contact Dermatitis");
        assert_eq!(detail.clinical_features, vec!["erythema", "scaling"]);
    }

    #[test]
    fn unmatched_diagnosis_still_builds() {
        let mut request = jane_request();
        request.selected_diagnosis = "Atopic Dermatitis".into();
        let letter = ReferralLetter::build(
            &request,
            &jane_history(),
            &[contact_dermatitis()],
            &ClinicInfo::default(),
            build_date(),
        );
        assert!(letter.diagnosis_detail.is_none());
        assert!(letter
            .diagnosis_statement
            .ends_with("suspected to be: Atopic Dermatitis"));
    }

    #[test]
    fn referral_date_formatting() {
        let letter = ReferralLetter::build(
            &jane_request(),
            &jane_history(),
            &[],
            &ClinicInfo::default(),
            build_date(),
        );
        assert_eq!(letter.formatted_date(), "10/02/2024");
    }

    #[test]
    fn signature_block_from_clinic() {
        let letter = ReferralLetter::build(
            &jane_request(),
            &jane_history(),
            &[],
            &ClinicInfo::default(),
            build_date(),
        );
        assert_eq!(
            letter.signature_lines,
            vec![
                "Yours sincerely,",
                "John Doe",
                "General Practitioner",
                "ABC GP Clinic"
            ]
        );
    }

    #[test]
    fn deterministic_for_equal_inputs() {
        let a = ReferralLetter::build(
            &jane_request(),
            &jane_history(),
            &[contact_dermatitis()],
            &ClinicInfo::default(),
            build_date(),
        );
        let b = ReferralLetter::build(
            &jane_request(),
            &jane_history(),
            &[contact_dermatitis()],
            &ClinicInfo::default(),
            build_date(),
        );
        assert_eq!(a, b);
    }
}
