//! Guardianship of a minor (GC-210, GC-212, GC-240, GC-250)

use crate::common::{Attorney, Court, Fees, Hearing, HearingDefaults};
use crate::defaults;
use crate::format::{currency, format_amount, format_date, format_date_or_raw, format_us_date, parse_amount};
use crate::roster::{parse_roster, Minor};
use crate::submission::RawSubmission;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Petitioner {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub relationship: String,
    pub is_related: bool,
}

/// Proposed guardian; contact details fall back to the petitioner's
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardian {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub ssn: String,
    pub driver_license: String,
    pub state: String,
    pub home_phone: String,
    pub work_phone: String,
    pub other_phone: String,
    pub corporation_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estate {
    pub personal_property: String,
    pub real_property: String,
    pub total: String,
    pub blocked_account: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub required: bool,
    pub amount: String,
    pub blocked_amount: String,
    pub institution: String,
}

/// Confidential guardian screening answers (GC-212)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screening {
    pub related_to_minor: bool,
    pub convicted_felony: bool,
    pub arrested_drug_alcohol: bool,
    pub convicted_misdemeanor_violence: bool,
    pub domestic_violence_restraining: bool,
    pub court_found_abused_child: bool,
    pub court_found_abused_adult: bool,
    pub under_conservatorship: bool,
    pub unable_to_provide_care: bool,
    pub central_index: bool,
    pub health_safety_central_index: bool,
    pub denied_license_care_children: bool,
    pub financial_conflict: bool,
    pub been_guardian_conservator_trustee: bool,
    pub been_removed_as_guardian: bool,
    pub professional_fiduciary: bool,
    pub public_entity: bool,
    pub private_guardian: bool,
    pub minor_lives_with_you: bool,
}

impl Screening {
    fn from_submission(raw: &RawSubmission) -> Self {
        Self {
            related_to_minor: raw.flag("related_to_minor"),
            convicted_felony: raw.flag("convicted_felony"),
            arrested_drug_alcohol: raw.flag("arrested_drug_alcohol"),
            convicted_misdemeanor_violence: raw.flag("convicted_misdemeanor"),
            domestic_violence_restraining: raw.flag("domestic_violence"),
            court_found_abused_child: raw.flag("abused_child"),
            court_found_abused_adult: raw.flag("abused_adult"),
            under_conservatorship: raw.flag("under_conservatorship"),
            unable_to_provide_care: raw.flag("unable_provide_care"),
            central_index: raw.flag("central_index"),
            health_safety_central_index: raw.flag("health_safety_index"),
            denied_license_care_children: raw.flag("denied_license"),
            financial_conflict: raw.flag("financial_conflict"),
            been_guardian_conservator_trustee: raw.flag("been_guardian"),
            been_removed_as_guardian: raw.flag("been_removed"),
            professional_fiduciary: raw.flag("professional_fiduciary"),
            public_entity: raw.flag("public_entity"),
            private_guardian: raw.flag("private_guardian"),
            minor_lives_with_you: raw.flag("minor_lives_with"),
        }
    }
}

/// Powers and conditions granted with the letters (GC-250)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Powers {
    pub other_powers_granted: bool,
    pub independent_powers: bool,
    pub property_conditions: bool,
    pub care_conditions: bool,
    pub other_conditions_granted: bool,
    pub attachment_specified: bool,
    pub specified_below: bool,
    pub other_powers_text: String,
    pub not_authorized_property: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub appointed: bool,
    pub info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ward {
    pub name: String,
    pub additional_ward_name: String,
    pub eighteenth_birthday_extension: String,
    pub termination_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    pub date: String,
    pub place: String,
}

/// Which guardianship forms to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianshipForms {
    pub gc210: bool,
    pub gc212: bool,
    pub gc240: bool,
    pub gc250: bool,
}

/// Normalized guardianship submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianshipRecord {
    pub attorney: Attorney,
    pub court: Court,
    pub case_number: String,
    /// `person` or `estate`
    pub guardianship_type: String,
    pub petitioner: Petitioner,
    pub guardian: Guardian,
    /// First minor on the roster
    pub minor: Minor,
    pub minors: Vec<Minor>,
    pub estate: Estate,
    pub bond: Bond,
    pub hearing: Hearing,
    pub screening: Screening,
    pub powers: Powers,
    pub independent_powers: bool,
    pub dispense_notice: bool,
    pub take_possession: bool,
    pub order_approved: bool,
    pub fees: Fees,
    pub investigator: Appointment,
    pub referee: Appointment,
    pub ward: Ward,
    pub execution: Execution,
    pub additional_minors_attached: bool,
    pub order_date: String,
    pub attachment_pages: String,
    pub prepared_on: String,
    pub forms: GuardianshipForms,
}

impl GuardianshipRecord {
    /// Normalize a submission as of `today`
    pub fn from_submission(raw: &RawSubmission, today: NaiveDate) -> Self {
        let today_text = format_us_date(today);

        let petitioner = Petitioner {
            name: raw.text_or("petitioner_name", ""),
            address: raw.text_or("petitioner_address", ""),
            phone: raw.text_or("petitioner_phone", ""),
            relationship: raw.text_or("petitioner_relationship", ""),
            is_related: raw.flag("petitioner_related"),
        };

        let guardian = Guardian {
            name: raw.first_text(&["guardian_name", "petitioner_name"]).unwrap_or_default(),
            address: raw
                .first_text(&["guardian_address", "petitioner_address"])
                .unwrap_or_default(),
            phone: raw
                .first_text(&["guardian_phone", "petitioner_phone"])
                .unwrap_or_default(),
            ssn: raw.text_or("guardian_ssn", ""),
            driver_license: raw.text_or("guardian_dl", ""),
            state: raw.text_or("guardian_state", defaults::GUARDIAN_STATE),
            home_phone: raw.text_or("guardian_home_phone", ""),
            work_phone: raw.text_or("guardian_work_phone", ""),
            other_phone: raw.text_or("guardian_other_phone", ""),
            corporation_name: raw.text_or("guardian_corporation", ""),
        };

        let minors = raw
            .first_text(&["minors_list", "minor_name"])
            .map(|list| parse_roster(&list))
            .unwrap_or_default();
        let mut minor = minors.first().cloned().unwrap_or_default();
        if minor.birthdate.is_empty() {
            minor.birthdate = raw.text_or("minor_birthdate", "");
        }
        minor.birthdate = format_date_or_raw(&minor.birthdate);

        let personal = raw.text("personal_property_value").map_or(0.0, |v| parse_amount(&v));
        let real = raw.text("real_property_value").map_or(0.0, |v| parse_amount(&v));
        let total = personal + real;
        let estate = Estate {
            personal_property: format_amount(personal),
            real_property: format_amount(real),
            total: format_amount(total),
            blocked_account: raw.text_or("blocked_account", ""),
        };

        let bond = Bond {
            required: raw.flag("bond_required"),
            amount: match raw.text("bond_amount") {
                Some(amount) => currency(Some(&amount)),
                None => format_amount(total),
            },
            blocked_amount: currency(raw.text("blocked_amount").as_deref()),
            institution: raw.text_or("bond_institution", ""),
        };

        let independent_powers = raw.flag("independent_powers");
        let powers = Powers {
            other_powers_granted: raw.flag("other_powers"),
            independent_powers,
            property_conditions: raw.flag("property_conditions"),
            care_conditions: raw.flag("care_conditions"),
            other_conditions_granted: raw.flag("other_conditions"),
            attachment_specified: raw.flag("attachment_specified"),
            specified_below: raw.flag("specified_below"),
            other_powers_text: raw.text_or("other_powers_text", ""),
            not_authorized_property: raw.flag("not_authorized_property"),
        };

        let ward = Ward {
            name: minor.name.clone(),
            additional_ward_name: minors.get(1).map(|m| m.name.clone()).unwrap_or_default(),
            eighteenth_birthday_extension: raw.text_or("eighteenth_birthday", ""),
            termination_date: raw.text_or("termination_date", ""),
        };

        let court = Court::from_submission(raw);
        let execution = Execution {
            date: today_text.clone(),
            place: format!("{}, California", court.city),
        };

        let order_approved = raw.flag("order_approved");
        let forms = GuardianshipForms {
            gc210: raw.literal_bool("generate_gc210") != Some(false),
            gc212: raw.literal_bool("generate_gc212") != Some(false),
            gc240: raw.literal_bool("generate_gc240") == Some(true) || order_approved,
            gc250: raw.literal_bool("generate_gc250") == Some(true) || order_approved,
        };

        let order_date = match raw.text("order_date") {
            Some(typed) => format_date(Some(&typed)),
            None => today_text.clone(),
        };

        Self {
            attorney: Attorney::from_submission(raw, &petitioner.name),
            court,
            case_number: raw.text_or("case_number", ""),
            guardianship_type: raw.text_or("guardianship_type", defaults::GUARDIANSHIP_TYPE),
            petitioner,
            guardian,
            additional_minors_attached: minors.len() > 3,
            minor,
            minors,
            estate,
            bond,
            hearing: Hearing::from_submission(
                raw,
                today,
                HearingDefaults {
                    time: defaults::GUARDIANSHIP_HEARING_TIME,
                    room: "",
                },
            ),
            screening: Screening::from_submission(raw),
            powers,
            independent_powers,
            dispense_notice: raw.flag("dispense_notice"),
            take_possession: raw.flag("take_possession"),
            order_approved,
            fees: Fees::from_submission(raw, defaults::GUARDIANSHIP_FEE_TERMS),
            investigator: Appointment {
                appointed: raw.flag("investigator_appointed"),
                info: raw.text_or("investigator_info", ""),
            },
            referee: Appointment {
                appointed: raw.flag("referee_appointed"),
                info: raw.text_or("referee_info", ""),
            },
            ward,
            execution,
            order_date,
            attachment_pages: raw.text_or("attachment_pages", "0"),
            prepared_on: today_text,
            forms,
        }
    }

    /// Form codes selected for this submission, in filing order
    pub fn selected_forms(&self) -> Vec<&'static str> {
        [
            ("GC-210", self.forms.gc210),
            ("GC-212", self.forms.gc212),
            ("GC-240", self.forms.gc240),
            ("GC-250", self.forms.gc250),
        ]
        .into_iter()
        .filter_map(|(code, selected)| selected.then_some(code))
        .collect()
    }

    /// Case number for display; unassigned cases read `To be assigned`
    pub fn display_case_number(&self) -> &str {
        if self.case_number.is_empty() {
            defaults::UNASSIGNED_CASE_NUMBER
        } else {
            &self.case_number
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    fn record(value: serde_json::Value) -> GuardianshipRecord {
        GuardianshipRecord::from_submission(&RawSubmission::from_value(value).unwrap(), today())
    }

    #[test]
    fn test_empty_submission_uses_defaults() {
        let r = record(json!({}));
        assert_eq!(r.guardianship_type, "person");
        assert_eq!(r.guardian.state, "CA");
        assert_eq!(r.minor, Minor::default());
        assert!(r.minors.is_empty());
        assert_eq!(r.estate.total, "0.00");
        assert_eq!(r.bond.amount, "0.00");
        assert_eq!(r.fees.terms, "Forthwith from estate");
        assert_eq!(r.hearing.time, "8:30 AM");
        assert_eq!(r.hearing.date, "02/09/2025");
        assert_eq!(r.order_date, "01/10/2025");
        assert_eq!(r.attachment_pages, "0");
        assert_eq!(r.execution.place, "LOS ANGELES, California");
        assert_eq!(r.display_case_number(), "To be assigned");
        assert_eq!(r.selected_forms(), vec!["GC-210", "GC-212"]);
    }

    #[test]
    fn test_guardian_falls_back_to_petitioner() {
        let r = record(json!({
            "petitioner_name": "Mary Smith",
            "petitioner_address": "1 Main St",
            "petitioner_phone": "555-0100",
            "guardian_phone": "555-0199",
        }));
        assert_eq!(r.guardian.name, "Mary Smith");
        assert_eq!(r.guardian.address, "1 Main St");
        assert_eq!(r.guardian.phone, "555-0199");
        assert_eq!(r.attorney.representing, "Petitioner Mary Smith");
    }

    #[test]
    fn test_minors_roster() {
        let r = record(json!({
            "minors_list": "Jane Doe, 2010-05-01\nJohn Doe, 2012-03-15\nA\nB",
        }));
        assert_eq!(r.minors.len(), 4);
        assert_eq!(r.minor.name, "Jane Doe");
        assert_eq!(r.minor.birthdate, "05/01/2010");
        assert_eq!(r.ward.name, "Jane Doe");
        assert_eq!(r.ward.additional_ward_name, "John Doe");
        assert!(r.additional_minors_attached);
    }

    #[test]
    fn test_single_minor_name_uses_separate_birthdate() {
        let r = record(json!({
            "minor_name": "Sam Roe",
            "minor_birthdate": "2014-07-04",
        }));
        assert_eq!(r.minors.len(), 1);
        assert_eq!(r.minor.name, "Sam Roe");
        assert_eq!(r.minor.birthdate, "07/04/2014");
        assert!(!r.additional_minors_attached);
    }

    #[test]
    fn test_estate_and_bond_amounts() {
        let r = record(json!({
            "personal_property_value": "$1,234.56",
            "real_property_value": 1000,
            "blocked_amount": "500",
        }));
        assert_eq!(r.estate.personal_property, "1234.56");
        assert_eq!(r.estate.real_property, "1000.00");
        assert_eq!(r.estate.total, "2234.56");
        assert_eq!(r.bond.amount, "2234.56");
        assert_eq!(r.bond.blocked_amount, "500.00");

        let r = record(json!({ "personal_property_value": "100", "bond_amount": "$50" }));
        assert_eq!(r.bond.amount, "50.00");
    }

    #[test]
    fn test_flags_require_literal_yes() {
        let r = record(json!({
            "convicted_felony": "yes",
            "abused_child": "Yes",
            "minor_lives_with": true,
            "bond_required": "yes",
        }));
        assert!(r.screening.convicted_felony);
        assert!(!r.screening.court_found_abused_child);
        assert!(!r.screening.minor_lives_with_you);
        assert!(r.bond.required);
    }

    #[test]
    fn test_form_selection() {
        let r = record(json!({ "generate_gc210": false, "generate_gc250": true }));
        assert_eq!(r.selected_forms(), vec!["GC-212", "GC-250"]);

        let r = record(json!({ "generate_gc212": "false", "order_approved": "yes" }));
        assert_eq!(r.selected_forms(), vec!["GC-210", "GC-212", "GC-240", "GC-250"]);
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let body = json!({ "minor_name": "Sam Roe", "attorney_fees": "$900" });
        assert_eq!(record(body.clone()), record(body));
    }
}
