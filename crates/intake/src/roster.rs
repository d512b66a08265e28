//! Minor rosters typed as one line per child

use serde::{Deserialize, Serialize};

/// One child named in a guardianship petition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minor {
    pub name: String,
    pub birthdate: String,
    pub home_phone: String,
    pub school: String,
    pub school_phone: String,
    pub other_phone: String,
}

/// Parse a roster of minors
///
/// Each line is `name, birthdate, home phone, school, school phone, other
/// phone`. Missing positions are empty and extra positions are ignored.
/// Every line yields an entry, blank lines included.
///
/// ```
/// use intake::parse_roster;
///
/// let minors = parse_roster("Jane Doe, 2010-05-01\nJohn Doe, 2012-03-15");
/// assert_eq!(minors.len(), 2);
/// assert_eq!(minors[1].birthdate, "2012-03-15");
/// ```
pub fn parse_roster(raw: &str) -> Vec<Minor> {
    raw.split('\n').map(parse_line).collect()
}

fn parse_line(line: &str) -> Minor {
    let mut parts = line.split(',').map(str::trim);
    let mut next = || parts.next().unwrap_or_default().to_string();
    Minor {
        name: next(),
        birthdate: next(),
        home_phone: next(),
        school: next(),
        school_phone: next(),
        other_phone: next(),
    }
}
