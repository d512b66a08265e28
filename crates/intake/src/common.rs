//! Record sections shared by guardianship and conservatorship petitions

use crate::defaults;
use crate::format::{currency, format_date, format_us_date};
use crate::submission::RawSubmission;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Attorney of record shown in the caption of every form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attorney {
    pub name: String,
    pub bar_number: String,
    pub firm_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub fax: String,
    pub email: String,
    /// "Attorney for" line, e.g. `Petitioner JANE DOE`
    pub representing: String,
    pub appointed: bool,
}

impl Attorney {
    pub fn from_submission(raw: &RawSubmission, petitioner_name: &str) -> Self {
        Self {
            name: raw.text_or("attorney_name", defaults::ATTORNEY_NAME),
            bar_number: raw.text_or("attorney_bar", defaults::ATTORNEY_BAR_NUMBER),
            firm_name: raw.text_or("firm_name", defaults::FIRM_NAME),
            street: raw.text_or("firm_street", defaults::FIRM_STREET),
            city: raw.text_or("firm_city", defaults::FIRM_CITY),
            state: raw.text_or("firm_state", defaults::FIRM_STATE),
            zip: raw.text_or("firm_zip", defaults::FIRM_ZIP),
            phone: raw.text_or("firm_phone", defaults::FIRM_PHONE),
            fax: raw.text_or("firm_fax", defaults::FIRM_FAX),
            email: raw.text_or("firm_email", defaults::FIRM_EMAIL),
            representing: format!("Petitioner {petitioner_name}"),
            appointed: raw.flag("attorney_appointed"),
        }
    }
}

/// Superior court branch hearing the petition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    pub county: String,
    pub branch: String,
    pub street: String,
    pub mailing: String,
    pub city: String,
    pub zip: String,
    /// `"<city>, CA <zip>"`
    pub city_zip: String,
}

impl Court {
    pub fn from_submission(raw: &RawSubmission) -> Self {
        let street = raw.text_or("court_street", defaults::COURT_STREET);
        let city = raw.text_or("court_city", defaults::COURT_CITY);
        let zip = raw.text_or("court_zip", defaults::COURT_ZIP);
        Self {
            county: raw.text_or("court_county", defaults::COURT_COUNTY),
            branch: raw.text_or("court_branch", defaults::COURT_BRANCH),
            mailing: raw.text("court_mailing").unwrap_or_else(|| street.clone()),
            city_zip: format!("{city}, CA {zip}"),
            street,
            city,
            zip,
        }
    }
}

/// Hearing defaults that differ between petition kinds
pub(crate) struct HearingDefaults {
    pub time: &'static str,
    pub room: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hearing {
    /// `MM/DD/YYYY`
    pub date: String,
    pub time: String,
    /// `hearing_datetime` as typed, or `"<date> at <time>"`
    pub datetime: String,
    pub dept: String,
    pub room: String,
    pub judge: String,
}

impl Hearing {
    pub(crate) fn from_submission(
        raw: &RawSubmission,
        today: NaiveDate,
        defaults: HearingDefaults,
    ) -> Self {
        let date = match raw.text("hearing_date") {
            Some(typed) => format_date(Some(&typed)),
            None => {
                let default = today
                    .checked_add_days(Days::new(defaults::HEARING_LEAD_DAYS))
                    .unwrap_or(today);
                format_us_date(default)
            }
        };
        let time = raw.text_or("hearing_time", defaults.time);
        let datetime = raw
            .text("hearing_datetime")
            .unwrap_or_else(|| format!("{date} at {time}"));

        Self {
            dept: raw.text_or("hearing_dept", defaults::HEARING_DEPT),
            room: raw.text_or("hearing_room", defaults.room),
            judge: raw.text_or("hearing_judge", ""),
            date,
            time,
            datetime,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fees {
    pub amount: String,
    pub terms: String,
}

impl Fees {
    pub(crate) fn from_submission(raw: &RawSubmission, default_terms: &str) -> Self {
        Self {
            amount: currency(raw.text("attorney_fees").as_deref()),
            terms: raw.text_or("fee_terms", default_terms),
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

    fn raw(value: serde_json::Value) -> RawSubmission {
        RawSubmission::from_value(value).unwrap()
    }

    #[test]
    fn test_attorney_defaults() {
        let attorney = Attorney::from_submission(&raw(json!({})), "JANE DOE");
        assert_eq!(attorney.name, "ROZSA GYENE, ESQ.");
        assert_eq!(attorney.bar_number, "208356");
        assert_eq!(attorney.email, "ROZSAGYENELAW@YAHOO.COM");
        assert_eq!(attorney.representing, "Petitioner JANE DOE");
        assert!(!attorney.appointed);
    }

    #[test]
    fn test_attorney_overrides_only_answered_fields() {
        let attorney = Attorney::from_submission(
            &raw(json!({ "attorney_name": "A. LAWYER", "firm_city": "" })),
            "",
        );
        assert_eq!(attorney.name, "A. LAWYER");
        assert_eq!(attorney.city, "GLENDALE");
    }

    #[test]
    fn test_court_mailing_falls_back_to_street() {
        let court = Court::from_submission(&raw(json!({})));
        assert_eq!(court.mailing, "111 N HILL ST");
        assert_eq!(court.city_zip, "LOS ANGELES, CA 90012");

        let court = Court::from_submission(&raw(json!({ "court_mailing": "PO BOX 1" })));
        assert_eq!(court.mailing, "PO BOX 1");
    }

    #[test]
    fn test_hearing_defaults_to_thirty_days_out() {
        let hearing = Hearing::from_submission(
            &raw(json!({})),
            today(),
            HearingDefaults {
                time: "9:00 AM",
                room: "Room 312",
            },
        );
        assert_eq!(hearing.date, "02/09/2025");
        assert_eq!(hearing.datetime, "02/09/2025 at 9:00 AM");
        assert_eq!(hearing.dept, "11");
        assert_eq!(hearing.room, "Room 312");
    }

    #[test]
    fn test_hearing_from_submission() {
        let hearing = Hearing::from_submission(
            &raw(json!({
                "hearing_date": "2025-03-04",
                "hearing_time": "1:30 PM",
                "hearing_dept": "9",
            })),
            today(),
            HearingDefaults {
                time: "8:30 AM",
                room: "",
            },
        );
        assert_eq!(hearing.date, "03/04/2025");
        assert_eq!(hearing.datetime, "03/04/2025 at 1:30 PM");
        assert_eq!(hearing.dept, "9");
        assert_eq!(hearing.room, "");
    }

    #[test]
    fn test_fees() {
        let fees = Fees::from_submission(&raw(json!({ "attorney_fees": "$2,500" })), "forthwith");
        assert_eq!(fees.amount, "2500.00");
        assert_eq!(fees.terms, "forthwith");
    }
}
