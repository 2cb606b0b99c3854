use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::Gender;
use super::non_empty;

/// Renders an optional date as DD/MM/YYYY, or the literal "Not provided".
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "Not provided".to_string())
}

/// Patient-supplied skin-condition history, captured once per diagnosis run.
///
/// The presentation layer owns required-field validation; the core treats
/// every optional field as absent when empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientHistory {
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
    pub race: Option<String>,
    pub onset: Option<NaiveDate>,
    pub duration: Option<String>,
    pub location: Option<String>,
    pub itch: Option<String>,
    pub past_medical_history: Option<String>,
    pub family_history: Option<String>,
    pub other_pertinent_history: Option<String>,
}

impl PatientHistory {
    /// Whether any of the three medical-background fields holds content.
    pub fn has_medical_background(&self) -> bool {
        non_empty(&self.past_medical_history).is_some()
            || non_empty(&self.family_history).is_some()
            || non_empty(&self.other_pertinent_history).is_some()
    }

    /// Flatten the history into the text shipped to the diagnostic service.
    ///
    /// Three labeled sections separated by blank lines, matching the format
    /// the service was trained against.
    pub fn history_text(&self) -> String {
        let sections = [
            format!(
                "Patient Information:\n\
                 - Date of Birth: {}\n\
                 - Gender: {}\n\
                 - Race: {}",
                format_date(self.date_of_birth),
                self.gender.as_str(),
                non_empty(&self.race).unwrap_or("Not provided"),
            ),
            format!(
                "Clinical Information:\n\
                 - Onset Date: {}\n\
                 - Duration: {}\n\
                 - Location: {}\n\
                 - Symptoms: {}",
                format_date(self.onset),
                non_empty(&self.duration).unwrap_or("Not provided"),
                non_empty(&self.location).unwrap_or("Not provided"),
                match non_empty(&self.itch) {
                    Some(itch) => format!("Patient reports {itch}"),
                    None => "No symptoms reported".to_string(),
                },
            ),
            format!(
                "Medical Background:\n\
                 - Past Medical History: {}\n\
                 - Family History: {}\n\
                 - Other Pertinent History: {}",
                non_empty(&self.past_medical_history).unwrap_or("None reported"),
                non_empty(&self.family_history).unwrap_or("None reported"),
                non_empty(&self.other_pertinent_history).unwrap_or("None reported"),
            ),
        ];

        sections.join("\n\n")
    }
}
