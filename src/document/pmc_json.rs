use super::DocumentLayout;

/// Documents derived from PMC XML, stored as `pmc_json/<PMCID>.xml.json`.
pub struct PmcJsonLayout;

impl DocumentLayout for PmcJsonLayout {
    fn name(&self) -> &str {
        "pmc_json"
    }

    fn subdirectory(&self) -> &str {
        "pmc_json"
    }

    fn extension(&self) -> &str {
        ".xml.json"
    }
}
