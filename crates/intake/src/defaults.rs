//! Standing values used when a submission leaves a field blank

pub const ATTORNEY_NAME: &str = "ROZSA GYENE, ESQ.";
pub const ATTORNEY_BAR_NUMBER: &str = "208356";
pub const FIRM_NAME: &str = "LAW OFFICES OF ROZSA GYENE";
pub const FIRM_STREET: &str = "450 N BRAND BLVD SUITE 600";
pub const FIRM_CITY: &str = "GLENDALE";
pub const FIRM_STATE: &str = "CA";
pub const FIRM_ZIP: &str = "91203";
pub const FIRM_PHONE: &str = "818-291-6217";
pub const FIRM_FAX: &str = "818-291-6205";
pub const FIRM_EMAIL: &str = "ROZSAGYENELAW@YAHOO.COM";

pub const COURT_COUNTY: &str = "LOS ANGELES";
pub const COURT_BRANCH: &str = "STANLEY MOSK COURTHOUSE";
pub const COURT_STREET: &str = "111 N HILL ST";
pub const COURT_CITY: &str = "LOS ANGELES";
pub const COURT_ZIP: &str = "90012";

pub const HEARING_DEPT: &str = "11";
/// Days between intake and the default hearing date
pub const HEARING_LEAD_DAYS: u64 = 30;

pub const GUARDIANSHIP_HEARING_TIME: &str = "8:30 AM";
pub const GUARDIANSHIP_FEE_TERMS: &str = "Forthwith from estate";
pub const GUARDIANSHIP_TYPE: &str = "person";
pub const GUARDIAN_STATE: &str = "CA";

pub const CONSERVATORSHIP_HEARING_TIME: &str = "9:00 AM";
pub const CONSERVATORSHIP_HEARING_ROOM: &str = "Room 312";
pub const CONSERVATORSHIP_FEE_TERMS: &str = "forthwith";
pub const CONSERVATORSHIP_TYPE: &str = "person";

/// Case number shown before the court assigns one
pub const UNASSIGNED_CASE_NUMBER: &str = "To be assigned";
