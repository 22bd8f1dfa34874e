// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Template configuration: printed labels and signature parties.
//
// Page geometry is deliberately absent here. It lives in the immutable
// per-variant layout config of `lembar-layout`.

use std::path::Path;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LembarError, Result};
use crate::types::{DocumentKind, SignatureParty, Variant};

/// Everything about a printed document that is template wording rather than
/// business data or geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub signatures: SignatureTemplate,
}

impl TemplateConfig {
    /// Load a template from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        info!("Loaded template from {}", path.display());
        Ok(config)
    }

    /// Persist the template as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        debug!("Wrote template to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject templates that could not produce a correct document.
    pub fn validate(&self) -> Result<()> {
        for variant in Variant::ALL {
            let parties = self.signatures.parties(variant);
            if parties.is_empty() {
                return Err(LembarError::InvalidTemplate(format!(
                    "signature party list for the {variant} variant is empty"
                )));
            }
            if parties.iter().any(|p| p.label().trim().is_empty()) {
                return Err(LembarError::InvalidTemplate(format!(
                    "signature party list for the {variant} variant has a blank label"
                )));
            }
        }

        let pattern = &self.labels.page_indicator;
        if !pattern.contains("{page}") || !pattern.contains("{total}") {
            return Err(LembarError::InvalidTemplate(format!(
                "page indicator {pattern:?} must contain both {{page}} and {{total}}"
            )));
        }

        if StrftimeItems::new(&self.labels.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(LembarError::InvalidTemplate(format!(
                "date format {:?} is not a valid strftime pattern",
                self.labels.date_format
            )));
        }

        Ok(())
    }
}

/// Printed captions. Defaults are the Indonesian delivery-note wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub title_delivery_note: String,
    pub title_invoice: String,
    pub title_receipt: String,
    pub document_number: String,
    pub document_date: String,
    pub source_reference: String,
    pub counterpart: String,
    pub phone: String,
    pub email: String,
    pub column_number: String,
    pub column_name: String,
    pub column_quantity: String,
    pub column_unit: String,
    /// Must contain `{page}` and `{total}`.
    pub page_indicator: String,
    /// Printed in place of any blank field.
    pub placeholder: String,
    /// `chrono` strftime pattern for the document date.
    pub date_format: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            title_delivery_note: "SURAT JALAN".into(),
            title_invoice: "INVOICE".into(),
            title_receipt: "KWITANSI".into(),
            document_number: "No.".into(),
            document_date: "Tanggal".into(),
            source_reference: "Ref. Faktur".into(),
            counterpart: "Kepada".into(),
            phone: "Telp".into(),
            email: "Email".into(),
            column_number: "No".into(),
            column_name: "Nama Barang".into(),
            column_quantity: "Jumlah".into(),
            column_unit: "Satuan".into(),
            page_indicator: "Halaman {page} dari {total}".into(),
            placeholder: "-".into(),
            date_format: "%d/%m/%Y".into(),
        }
    }
}

impl Labels {
    pub fn title(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::DeliveryNote => &self.title_delivery_note,
            DocumentKind::Invoice => &self.title_invoice,
            DocumentKind::Receipt => &self.title_receipt,
        }
    }

    /// Page indicator for a 0-based page index.
    pub fn page_indicator(&self, page_index: usize, total_pages: usize) -> String {
        self.page_indicator
            .replace("{page}", &(page_index + 1).to_string())
            .replace("{total}", &total_pages.to_string())
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    /// `value` trimmed, or the placeholder when blank.
    pub fn or_placeholder<'a>(&'a self, value: Option<&'a str>) -> &'a str {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => &self.placeholder,
        }
    }
}

/// Ordered signature roles per variant. Template configuration, never
/// derived from document data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureTemplate {
    pub standard: Vec<SignatureParty>,
    pub dot_matrix: Vec<SignatureParty>,
}

impl Default for SignatureTemplate {
    fn default() -> Self {
        let parties = vec![
            SignatureParty::new("Pengirim"),
            SignatureParty::new("Sopir/Ekspedisi"),
            SignatureParty::new("Penerima"),
        ];
        Self {
            standard: parties.clone(),
            dot_matrix: parties,
        }
    }
}

impl SignatureTemplate {
    pub fn parties(&self, variant: Variant) -> &[SignatureParty] {
        match variant {
            Variant::Standard => &self.standard,
            Variant::DotMatrix => &self.dot_matrix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_is_valid() {
        TemplateConfig::default().validate().expect("default template valid");
    }

    #[test]
    fn default_parties_are_shared_by_both_variants() {
        let signatures = SignatureTemplate::default();
        let labels: Vec<&str> = signatures
            .parties(Variant::Standard)
            .iter()
            .map(SignatureParty::label)
            .collect();
        assert_eq!(labels, ["Pengirim", "Sopir/Ekspedisi", "Penerima"]);
        assert_eq!(
            signatures.parties(Variant::Standard),
            signatures.parties(Variant::DotMatrix)
        );
    }

    #[test]
    fn empty_party_list_is_rejected() {
        let mut config = TemplateConfig::default();
        config.signatures.dot_matrix.clear();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, LembarError::InvalidTemplate(_)));
    }

    #[test]
    fn page_indicator_needs_both_placeholders() {
        let mut config = TemplateConfig::default();
        config.labels.page_indicator = "Page {page}".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_date_format_is_rejected() {
        let mut config = TemplateConfig::default();
        config.labels.date_format = "%Q".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn page_indicator_is_one_based() {
        let labels = Labels::default();
        assert_eq!(labels.page_indicator(0, 3), "Halaman 1 dari 3");
        assert_eq!(labels.page_indicator(2, 3), "Halaman 3 dari 3");
    }

    #[test]
    fn placeholder_replaces_blank_values() {
        let labels = Labels::default();
        assert_eq!(labels.or_placeholder(None), "-");
        assert_eq!(labels.or_placeholder(Some("   ")), "-");
        assert_eq!(labels.or_placeholder(Some(" CV Maju ")), "CV Maju");
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("template.json");

        let mut config = TemplateConfig::default();
        config.labels.title_delivery_note = "DELIVERY NOTE".into();
        config.signatures.dot_matrix = vec![SignatureParty::new("Gudang")];
        config.save(&path).expect("save");

        let loaded = TemplateConfig::load(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: TemplateConfig =
            serde_json::from_str(r#"{"labels":{"placeholder":"n/a"}}"#).unwrap();
        assert_eq!(config.labels.placeholder, "n/a");
        assert_eq!(config.labels.column_name, "Nama Barang");
        assert_eq!(config.signatures, SignatureTemplate::default());
    }
}
