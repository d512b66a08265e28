//! Conservatorship of an adult (GC-310, GC-312, GC-320, GC-340, GC-350)

use crate::common::{Attorney, Court, Fees, Hearing, HearingDefaults};
use crate::defaults;
use crate::format::{age_text, currency, format_amount, format_date, format_us_date, parse_amount};
use crate::submission::RawSubmission;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Form codes in filing order with their inclusion flag
const FORM_FLAGS: [(&str, &str); 5] = [
    ("GC-310", "generate_gc310"),
    ("GC-312", "generate_gc312"),
    ("GC-320", "generate_gc320"),
    ("GC-340", "generate_gc340"),
    ("GC-350", "generate_gc350"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Petitioner {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub relationship: String,
    /// `spouse` or `relative`
    pub relationship_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conservatee {
    pub name: String,
    pub address: String,
    pub phone: String,
    /// `MM/DD/YYYY`, empty when unknown
    pub dob: String,
    /// Whole years on the intake date, empty when unknown
    pub age: String,
    pub ssn: String,
    pub living_situation: String,
    pub unable_provide_needs: bool,
    pub unable_manage_finances: bool,
    pub is_ca_resident: bool,
    pub is_county_resident: bool,
    pub attorney_name: String,
    pub disqualified_voting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conservator {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub relationship: String,
    pub dob: String,
    pub ssn: String,
    pub license_number: String,
    pub license_issue_date: String,
    pub license_expiry_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub required: bool,
    pub amount: String,
    pub blocked_account: String,
    pub blocked_amount: String,
    pub institution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estate {
    pub personal_property: String,
    pub real_property: String,
    pub annual_income: String,
    pub total: String,
}

/// Process server named on the citation (GC-320)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessServer {
    pub info: String,
    pub fee: String,
}

/// Normalized conservatorship submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConservatorshipRecord {
    pub attorney: Attorney,
    pub court: Court,
    pub case_number: String,
    pub petitioner: Petitioner,
    pub conservatee: Conservatee,
    pub conservator: Conservator,
    /// `person`, `estate`, or the raw answer when it is neither
    pub conservatorship_type: String,
    pub is_limited: bool,
    pub is_successor: bool,
    pub petitioner_is_conservator: bool,
    pub hearing: Hearing,
    pub bond: Bond,
    pub estate: Estate,
    pub independent_powers: bool,
    pub medical_consent_powers: bool,
    pub placement_authority: bool,
    pub dementia_authority: bool,
    pub take_possession: bool,
    pub fees: Fees,
    pub server: ProcessServer,
    pub conservatorship_reason: String,
    pub medical_diagnosis: String,
    pub alternatives_considered: bool,
    pub alternatives_explanation: String,
    pub prepared_on: String,
    /// Form codes to produce, in filing order
    pub forms: Vec<String>,
}

impl ConservatorshipRecord {
    /// Normalize a submission as of `today`
    pub fn from_submission(raw: &RawSubmission, today: NaiveDate) -> Self {
        let relationship = raw.text_or("cons_petitioner_relationship", "");
        let relationship_type = if relationship.to_lowercase().contains("spouse") {
            "spouse"
        } else {
            "relative"
        };
        let petitioner = Petitioner {
            name: raw.text_or("cons_petitioner_name", ""),
            address: raw.text_or("cons_petitioner_address", ""),
            phone: raw.text_or("cons_petitioner_phone", ""),
            relationship_type: relationship_type.to_string(),
            relationship,
        };

        let dob = raw.text("conservatee_dob");
        let conservatee = Conservatee {
            name: raw.text_or("conservatee_name", ""),
            address: raw.text_or("conservatee_address", ""),
            phone: raw.text_or("conservatee_phone", ""),
            dob: format_date(dob.as_deref()),
            age: age_text(dob.as_deref(), today),
            ssn: raw.text_or("conservatee_ssn", ""),
            living_situation: raw.text_or("conservatee_living", ""),
            unable_provide_needs: raw.answer_is("personal_needs", "no"),
            unable_manage_finances: raw.answer_is("financial_management", "no"),
            is_ca_resident: raw.flag_unless_no("conservatee_ca_resident"),
            is_county_resident: raw.flag_unless_no("conservatee_county_resident"),
            attorney_name: raw.text_or("conservatee_attorney", ""),
            disqualified_voting: raw.flag("disqualified_voting"),
        };

        let conservator = Conservator {
            name: raw.text_or("conservator_name", ""),
            address: raw.text_or("conservator_address", ""),
            phone: raw.text_or("conservator_phone", ""),
            relationship: raw.text_or("conservator_relationship", ""),
            dob: format_date(raw.text("conservator_dob").as_deref()),
            ssn: raw.text_or("conservator_ssn", ""),
            license_number: raw.text_or("conservator_license_number", ""),
            license_issue_date: format_date(raw.text("conservator_license_issued").as_deref()),
            license_expiry_date: format_date(raw.text("conservator_license_expires").as_deref()),
        };

        let raw_type = raw.text("conservatorship_type");
        let conservatorship_type = match raw_type.as_deref() {
            None | Some("both") => defaults::CONSERVATORSHIP_TYPE.to_string(),
            Some(other) => other.to_string(),
        };

        let personal = raw.text("conservatee_personal_property").map_or(0.0, |v| parse_amount(&v));
        let real = raw.text("conservatee_real_property").map_or(0.0, |v| parse_amount(&v));
        let estate = Estate {
            personal_property: format_amount(personal),
            real_property: format_amount(real),
            annual_income: currency(raw.text("conservatee_income").as_deref()),
            total: format_amount(personal + real),
        };

        let bond = Bond {
            required: raw.flag("bond_required"),
            amount: currency(raw.text("bond_amount").as_deref()),
            blocked_account: currency(raw.text("blocked_account").as_deref()),
            blocked_amount: currency(raw.text("blocked_amount").as_deref()),
            institution: raw.text_or("bond_institution", ""),
        };

        let forms = FORM_FLAGS
            .iter()
            .filter(|(_, flag)| raw.literal_bool(flag) != Some(false))
            .map(|(code, _)| code.to_string())
            .collect();

        Self {
            attorney: Attorney::from_submission(raw, &petitioner.name),
            court: Court::from_submission(raw),
            case_number: raw.text_or("case_number", defaults::UNASSIGNED_CASE_NUMBER),
            petitioner,
            conservatee,
            conservator,
            conservatorship_type,
            is_limited: raw_type.as_deref() == Some("limited"),
            is_successor: raw.flag("is_successor"),
            petitioner_is_conservator: raw.flag_unless_no("petitioner_is_conservator"),
            hearing: Hearing::from_submission(
                raw,
                today,
                HearingDefaults {
                    time: defaults::CONSERVATORSHIP_HEARING_TIME,
                    room: defaults::CONSERVATORSHIP_HEARING_ROOM,
                },
            ),
            bond,
            estate,
            independent_powers: raw.flag("cons_independent_powers"),
            medical_consent_powers: raw.flag("medical_consent_powers"),
            placement_authority: raw.flag("placement_authority"),
            dementia_authority: raw.flag("dementia_authority"),
            take_possession: raw.flag_unless_no("take_possession"),
            fees: Fees::from_submission(raw, defaults::CONSERVATORSHIP_FEE_TERMS),
            server: ProcessServer {
                info: raw.text_or("server_info", ""),
                fee: raw.text_or("server_fee", ""),
            },
            conservatorship_reason: raw.text_or("conservatorship_reason", ""),
            medical_diagnosis: raw.text_or("medical_diagnosis", ""),
            alternatives_considered: raw.flag("alternatives_considered"),
            alternatives_explanation: raw.text_or("alternatives_explanation", ""),
            prepared_on: format_us_date(today),
            forms,
        }
    }

    /// Conservator's name, or the petitioner's when none was named
    pub fn conservator_or_petitioner(&self) -> &str {
        if self.conservator.name.is_empty() {
            &self.petitioner.name
        } else {
            &self.conservator.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn record(value: serde_json::Value) -> ConservatorshipRecord {
        ConservatorshipRecord::from_submission(&RawSubmission::from_value(value).unwrap(), today())
    }

    #[test]
    fn test_empty_submission_uses_defaults() {
        let r = record(json!({}));
        assert_eq!(r.case_number, "To be assigned");
        assert_eq!(r.conservatorship_type, "person");
        assert!(!r.is_limited);
        assert!(r.petitioner_is_conservator);
        assert!(r.take_possession);
        assert!(r.conservatee.is_ca_resident);
        assert!(r.conservatee.is_county_resident);
        assert!(!r.bond.required);
        assert_eq!(r.bond.blocked_account, "0.00");
        assert_eq!(r.hearing.time, "9:00 AM");
        assert_eq!(r.hearing.room, "Room 312");
        assert_eq!(r.hearing.date, "07/15/2025");
        assert_eq!(r.fees.terms, "forthwith");
        assert_eq!(r.petitioner.relationship_type, "relative");
        assert_eq!(r.conservatee.age, "");
        assert_eq!(r.prepared_on, "06/15/2025");
        assert_eq!(r.forms, vec!["GC-310", "GC-312", "GC-320", "GC-340", "GC-350"]);
    }

    #[test]
    fn test_type_normalization() {
        assert_eq!(record(json!({ "conservatorship_type": "both" })).conservatorship_type, "person");
        assert_eq!(record(json!({ "conservatorship_type": "estate" })).conservatorship_type, "estate");

        let limited = record(json!({ "conservatorship_type": "limited" }));
        assert!(limited.is_limited);
        assert_eq!(limited.conservatorship_type, "limited");
    }

    #[test]
    fn test_spouse_relationship_is_case_insensitive() {
        let r = record(json!({ "cons_petitioner_relationship": "Husband / SPOUSE" }));
        assert_eq!(r.petitioner.relationship_type, "spouse");
        assert_eq!(r.petitioner.relationship, "Husband / SPOUSE");
    }

    #[test]
    fn test_conservatee_needs_and_age() {
        let r = record(json!({
            "conservatee_dob": "1940-06-16",
            "personal_needs": "no",
            "financial_management": "yes",
        }));
        assert_eq!(r.conservatee.dob, "06/16/1940");
        assert_eq!(r.conservatee.age, "84");
        assert!(r.conservatee.unable_provide_needs);
        assert!(!r.conservatee.unable_manage_finances);
    }

    #[test]
    fn test_estate_total_reads_formatted_amounts() {
        let r = record(json!({
            "conservatee_personal_property": "$10,000",
            "conservatee_real_property": "250000.50",
            "conservatee_income": "1,200",
        }));
        assert_eq!(r.estate.personal_property, "10000.00");
        assert_eq!(r.estate.total, "260000.50");
        assert_eq!(r.estate.annual_income, "1200.00");
    }

    #[test]
    fn test_answered_no_overrides_defaults() {
        let r = record(json!({
            "petitioner_is_conservator": "no",
            "take_possession": "no",
            "conservatee_county_resident": "no",
            "generate_gc320": false,
        }));
        assert!(!r.petitioner_is_conservator);
        assert!(!r.take_possession);
        assert!(!r.conservatee.is_county_resident);
        assert_eq!(r.forms, vec!["GC-310", "GC-312", "GC-340", "GC-350"]);
    }

    #[test]
    fn test_conservator_or_petitioner() {
        let r = record(json!({ "cons_petitioner_name": "Ann Lee" }));
        assert_eq!(r.conservator_or_petitioner(), "Ann Lee");
        let r = record(json!({ "cons_petitioner_name": "Ann Lee", "conservator_name": "Bo Lee" }));
        assert_eq!(r.conservator_or_petitioner(), "Bo Lee");
    }
}
