//! License records stored by the backend.

use serde::{Deserialize, Serialize};

/// A stored license record. Read-only on the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseRecord {
    #[serde(rename = "_id")]
    pub id: String,
    /// Holder's first name.
    pub name: String,
    pub last_name: String,
    pub license_type: String,
    /// Birthdate as sent by the backend, usually an RFC 3339 date-time.
    pub birthdate: String,
}

impl LicenseRecord {
    /// The calendar-date part of the birthdate (everything before `T`).
    pub fn birth_date(&self) -> &str {
        self.birthdate
            .split_once('T')
            .map_or(self.birthdate.as_str(), |(date, _)| date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(birthdate: &str) -> LicenseRecord {
        LicenseRecord {
            id: "1".into(),
            name: "Jane".into(),
            last_name: "Doe".into(),
            license_type: "Drivers".into(),
            birthdate: birthdate.into(),
        }
    }

    #[test]
    fn birth_date_strips_time() {
        assert_eq!(record("1990-05-17T00:00:00.000Z").birth_date(), "1990-05-17");
    }

    #[test]
    fn birth_date_without_time() {
        assert_eq!(record("1990-05-17").birth_date(), "1990-05-17");
    }
}
