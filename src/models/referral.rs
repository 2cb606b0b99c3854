use serde::{Deserialize, Serialize};

/// Contact details and diagnosis selection from the referral form.
///
/// The presentation layer validates phone/email patterns before handing
/// this over; `selected_diagnosis` normally names one of the current
/// response's entries, but an unmatched label still produces a letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferralRequest {
    pub patient_name: String,
    pub phone: String,
    pub email: String,
    pub selected_diagnosis: String,
}
