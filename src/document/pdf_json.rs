use super::DocumentLayout;

/// Documents extracted from PDFs, stored as `pdf_json/<sha>.json`.
pub struct PdfJsonLayout;

impl DocumentLayout for PdfJsonLayout {
    fn name(&self) -> &str {
        "pdf_json"
    }

    fn subdirectory(&self) -> &str {
        "pdf_json"
    }

    fn extension(&self) -> &str {
        ".json"
    }
}
