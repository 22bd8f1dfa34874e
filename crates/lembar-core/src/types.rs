// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Lembar document engine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::LembarError;

/// Physical document format.
///
/// Both variants target half-letter landscape media; they differ in font
/// pitch, page capacity and drawing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Laser/inkjet layout with proportional fonts and vector rules.
    Standard,
    /// Fixed-pitch layout for continuous-feed, pre-printed multi-part forms.
    DotMatrix,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Standard, Variant::DotMatrix];

    /// Keyword used on the wire and in file names.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::DotMatrix => "dot-matrix",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Variant {
    type Err = LembarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "dot-matrix" | "dotmatrix" | "dot_matrix" => Ok(Self::DotMatrix),
            _ => Err(LembarError::UnsupportedVariant(s.to_string())),
        }
    }
}

/// Which member of the document family is being printed.
///
/// The kind only changes the printed title and the filename prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    #[default]
    DeliveryNote,
    Invoice,
    Receipt,
}

impl DocumentKind {
    /// Prefix for suggested output file names.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Self::DeliveryNote => "surat-jalan",
            Self::Invoice => "invoice",
            Self::Receipt => "kwitansi",
        }
    }
}

/// Identity of the issuing tenant. Read-only for the duration of a render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Logo image bytes, already resolved by the data-fetch layer.
    #[serde(skip)]
    pub logo: Option<Vec<u8>>,
}

/// The document this one was derived from, e.g. the originating invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReference {
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub counterpart_name: Option<String>,
}

/// Printed identity of one document instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentHeader {
    #[serde(default)]
    pub kind: DocumentKind,
    #[serde(default)]
    pub number: String,
    /// ISO 8601 date or timestamp; only the date portion is printed.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub source: SourceReference,
    pub organization: OrganizationProfile,
}

impl DocumentHeader {
    /// Header fields that are blank and will print as a placeholder.
    pub fn missing_fields(&self) -> Vec<HeaderField> {
        let org = &self.organization;
        let checks = [
            (HeaderField::OrganizationName, is_blank(org.name.as_deref())),
            (HeaderField::OrganizationAddress, is_blank(org.address.as_deref())),
            (HeaderField::OrganizationPhone, is_blank(org.phone.as_deref())),
            (HeaderField::OrganizationEmail, is_blank(org.email.as_deref())),
            (HeaderField::DocumentNumber, is_blank(Some(&self.number))),
            (HeaderField::DocumentDate, is_blank(self.date.as_deref())),
            (
                HeaderField::SourceDocumentNumber,
                is_blank(self.source.document_number.as_deref()),
            ),
            (
                HeaderField::CounterpartName,
                is_blank(self.source.counterpart_name.as_deref()),
            ),
        ];
        checks
            .into_iter()
            .filter_map(|(field, missing)| missing.then_some(field))
            .collect()
    }

    /// The document date truncated to its date portion, if it parses.
    pub fn document_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_document_date)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Parse an ISO 8601 date, truncating timestamps to their date portion.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_document_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(ts.date());
        }
    }
    // Last resort: a leading date followed by anything.
    raw.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

/// Header identity fields that may print as a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    OrganizationName,
    OrganizationAddress,
    OrganizationPhone,
    OrganizationEmail,
    DocumentNumber,
    DocumentDate,
    SourceDocumentNumber,
    CounterpartName,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OrganizationName => "organization name",
            Self::OrganizationAddress => "organization address",
            Self::OrganizationPhone => "organization phone",
            Self::OrganizationEmail => "organization email",
            Self::DocumentNumber => "document number",
            Self::DocumentDate => "document date",
            Self::SourceDocumentNumber => "source document number",
            Self::CounterpartName => "counterpart name",
        };
        f.write_str(name)
    }
}

/// Quantity of one line item.
///
/// Prints without a decimal part when whole; otherwise with up to
/// [`Quantity::MAX_DECIMALS`] decimals, trailing zeros trimmed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(pub f64);

impl Quantity {
    pub const MAX_DECIMALS: usize = 4;

    /// Printed form, or `None` for NaN/infinite values.
    pub fn formatted(&self) -> Option<String> {
        let value = self.0;
        if !value.is_finite() {
            return None;
        }
        if value.fract() == 0.0 {
            return Some(format!("{value:.0}"));
        }
        let fixed = format!("{value:.prec$}", prec = Self::MAX_DECIMALS);
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        // -0.00001 rounds to "-0"
        if trimmed == "-0" {
            return Some("0".to_string());
        }
        Some(trimmed.to_string())
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// One line of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRow {
    pub name: String,
    pub quantity: Quantity,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl ItemRow {
    pub fn new(name: impl Into<String>, quantity: impl Into<Quantity>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            unit: None,
            sort_order: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = Some(sort_order);
        self
    }
}

/// A named role that signs the printed document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureParty(pub String);

impl SignatureParty {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

/// Key identifying one document in the data-fetch layer. Only used for
/// lookup and logging, never for layout decisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentKey(pub String);

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A data-quality gap the renderer worked around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderWarning {
    MissingHeaderField { field: HeaderField },
    UnparsableDate { raw: String },
    LogoUndecodable { reason: String },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeaderField { field } => write!(f, "{field} is missing"),
            Self::UnparsableDate { raw } => {
                write!(f, "document date {raw:?} is not an ISO 8601 date")
            }
            Self::LogoUndecodable { reason } => write!(f, "logo could not be decoded: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parses_aliases() {
        assert_eq!("standard".parse::<Variant>().unwrap(), Variant::Standard);
        assert_eq!("Dot-Matrix".parse::<Variant>().unwrap(), Variant::DotMatrix);
        assert_eq!("dotmatrix".parse::<Variant>().unwrap(), Variant::DotMatrix);
        assert_eq!(" dot_matrix ".parse::<Variant>().unwrap(), Variant::DotMatrix);
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let err = "inkjet".parse::<Variant>().unwrap_err();
        assert!(matches!(err, LembarError::UnsupportedVariant(ref v) if v == "inkjet"));
    }

    #[test]
    fn variant_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Variant::DotMatrix).unwrap();
        assert_eq!(json, "\"dot-matrix\"");
    }

    #[test]
    fn quantity_whole_prints_integral() {
        assert_eq!(Quantity(12.0).formatted().as_deref(), Some("12"));
        assert_eq!(Quantity(0.0).formatted().as_deref(), Some("0"));
        assert_eq!(Quantity(-3.0).formatted().as_deref(), Some("-3"));
    }

    #[test]
    fn quantity_fraction_keeps_precision() {
        assert_eq!(Quantity(2.5).formatted().as_deref(), Some("2.5"));
        assert_eq!(Quantity(1.125).formatted().as_deref(), Some("1.125"));
        assert_eq!(Quantity(0.1 + 0.2).formatted().as_deref(), Some("0.3"));
    }

    #[test]
    fn quantity_non_finite_has_no_form() {
        assert_eq!(Quantity(f64::NAN).formatted(), None);
        assert_eq!(Quantity(f64::INFINITY).formatted(), None);
    }

    #[test]
    fn date_accepts_plain_and_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(parse_document_date("2026-10-18"), Some(expected));
        assert_eq!(parse_document_date("2026-10-18T09:30:00+07:00"), Some(expected));
        assert_eq!(parse_document_date("2026-10-18T09:30:00"), Some(expected));
        assert_eq!(parse_document_date("2026-10-18 09:30:00.123"), Some(expected));
        assert_eq!(parse_document_date("18/10/2026"), None);
    }

    #[test]
    fn missing_fields_lists_blank_values() {
        let header = DocumentHeader {
            number: "SJ-001".into(),
            date: Some("2026-10-18".into()),
            source: SourceReference {
                document_number: Some("INV-9".into()),
                counterpart_name: Some("  ".into()),
            },
            organization: OrganizationProfile {
                id: "org-1".into(),
                name: Some("CV Maju".into()),
                address: Some("Jl. Merdeka 1".into()),
                phone: None,
                email: Some("halo@maju.id".into()),
                logo: None,
            },
            ..Default::default()
        };
        assert_eq!(
            header.missing_fields(),
            vec![HeaderField::OrganizationPhone, HeaderField::CounterpartName]
        );
    }

    #[test]
    fn item_row_deserializes_with_optional_fields() {
        let row: ItemRow =
            serde_json::from_str(r#"{"name":"Semen","quantity":40}"#).unwrap();
        assert_eq!(row.name, "Semen");
        assert_eq!(row.quantity, Quantity(40.0));
        assert!(row.unit.is_none());
        assert!(row.sort_order.is_none());
    }
}
