//! License list view.

use std::fmt::Write;

use licverify_api::BackendApi;
use licverify_types::LicenseRecord;

use crate::list::ListState;

#[derive(Debug, Default)]
pub struct LicenseListView {
    list: ListState<LicenseRecord>,
}

impl LicenseListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&self, backend: &dyn BackendApi) {
        self.list.load("licenses", backend.licenses()).await;
    }

    pub fn licenses(&self) -> Vec<LicenseRecord> {
        self.list.items()
    }

    pub fn is_loading(&self) -> bool {
        self.list.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.list.error()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Licenses\n");
        if self.list.is_loading() {
            out.push_str("Loading...\n");
            return out;
        }

        let licenses = self.list.items();
        if licenses.is_empty() {
            match self.list.error() {
                Some(error) => {
                    let _ = writeln!(out, "{error}");
                }
                None => out.push_str("No licenses found.\n"),
            }
            return out;
        }

        out.push_str("Driver's Licenses\n");
        for license in &licenses {
            let _ = writeln!(out);
            let _ = writeln!(out, "{} License", license.license_type);
            let _ = writeln!(out, "  First Name: {}", license.name);
            let _ = writeln!(out, "  Last Name: {}", license.last_name);
            let _ = writeln!(out, "  Birthdate: {}", license.birth_date());
        }
        out
    }
}
