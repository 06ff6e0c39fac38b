use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cannareg_core::{DomainError, DomainResult, Timestamps};

use crate::classification::{RegulatoryStatus, SpectrumType, TherapeuticCategory};
use crate::percentage::Percentage;
use crate::risk::{evaluate_risk, validate_for_write, RiskAssessment};

cannareg_core::uuid_newtype!(
    /// Product identifier, assigned once on creation.
    ProductId,
    "ProductId"
);

/// Maximum product name length, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// How the approval rule sees an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Check only the fields present in the write payload.
    ///
    /// A partial update carrying `regulatory_status = approved` without
    /// `thc_percent` passes even if the stored THC is above the threshold.
    #[default]
    Supplied,
    /// Check the record as it will look after the write.
    Merged,
}

impl core::str::FromStr for ValidationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supplied" => Ok(ValidationMode::Supplied),
            "merged" => Ok(ValidationMode::Merged),
            other => Err(DomainError::validation(format!(
                "unknown validation mode '{other}' (expected: supplied, merged)"
            ))),
        }
    }
}

/// The mutable attributes of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub spectrum_type: SpectrumType,
    pub thc_percent: Percentage,
    pub cbd_percent: Percentage,
    pub therapeutic_category: TherapeuticCategory,
    pub regulatory_status: RegulatoryStatus,
}

/// A registered product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    fields: ProductFields,
    timestamps: Timestamps,
}

/// Command: create a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub spectrum_type: SpectrumType,
    pub thc_percent: Decimal,
    pub cbd_percent: Decimal,
    pub therapeutic_category: TherapeuticCategory,
    /// Defaults to `pending` when omitted.
    #[serde(default)]
    pub regulatory_status: Option<RegulatoryStatus>,
}

/// Command: full update. An omitted `regulatory_status` keeps the stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceProduct {
    pub name: String,
    pub spectrum_type: SpectrumType,
    pub thc_percent: Decimal,
    pub cbd_percent: Decimal,
    pub therapeutic_category: TherapeuticCategory,
    #[serde(default)]
    pub regulatory_status: Option<RegulatoryStatus>,
}

/// Command: partial update. Only the supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchProduct {
    pub name: Option<String>,
    pub spectrum_type: Option<SpectrumType>,
    pub thc_percent: Option<Decimal>,
    pub cbd_percent: Option<Decimal>,
    pub therapeutic_category: Option<TherapeuticCategory>,
    pub regulatory_status: Option<RegulatoryStatus>,
}

/// Trimmed name, checked for emptiness and length after trimming.
fn normalize_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn thc(value: Decimal) -> DomainResult<Percentage> {
    Percentage::try_new("thc_percent", value)
}

fn cbd(value: Decimal) -> DomainResult<Percentage> {
    Percentage::try_new("cbd_percent", value)
}

impl Product {
    /// Validate a create command and build the new record.
    ///
    /// Field checks run first, then the approval rule. Nothing is built when
    /// either fails.
    pub fn create(
        id: ProductId,
        cmd: &CreateProduct,
        mode: ValidationMode,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = normalize_name(&cmd.name)?;
        let thc_percent = thc(cmd.thc_percent)?;
        let cbd_percent = cbd(cmd.cbd_percent)?;
        let regulatory_status = cmd.regulatory_status.unwrap_or_default();

        match mode {
            ValidationMode::Supplied => {
                validate_for_write(Some(thc_percent.value()), cmd.regulatory_status)?
            }
            ValidationMode::Merged => {
                validate_for_write(Some(thc_percent.value()), Some(regulatory_status))?
            }
        }

        Ok(Self {
            id,
            fields: ProductFields {
                name,
                spectrum_type: cmd.spectrum_type,
                thc_percent,
                cbd_percent,
                therapeutic_category: cmd.therapeutic_category,
                regulatory_status,
            },
            timestamps: Timestamps::created(now),
        })
    }

    /// Rebuild a product from persisted state.
    ///
    /// No rule is re-checked: the store holds whatever was last written.
    pub fn restore(id: ProductId, fields: ProductFields, timestamps: Timestamps) -> Self {
        Self {
            id,
            fields,
            timestamps,
        }
    }

    /// Full update. Returns the new state; `self` is untouched.
    pub fn apply_replace(
        &self,
        cmd: &ReplaceProduct,
        mode: ValidationMode,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = normalize_name(&cmd.name)?;
        let thc_percent = thc(cmd.thc_percent)?;
        let cbd_percent = cbd(cmd.cbd_percent)?;

        let fields = ProductFields {
            name,
            spectrum_type: cmd.spectrum_type,
            thc_percent,
            cbd_percent,
            therapeutic_category: cmd.therapeutic_category,
            regulatory_status: cmd.regulatory_status.unwrap_or(self.fields.regulatory_status),
        };

        match mode {
            ValidationMode::Supplied => {
                validate_for_write(Some(thc_percent.value()), cmd.regulatory_status)?
            }
            ValidationMode::Merged => Self::validate_merged(&fields)?,
        }

        Ok(self.with_fields(fields, now))
    }

    /// Partial update. Returns the new state; `self` is untouched.
    pub fn apply_patch(
        &self,
        cmd: &PatchProduct,
        mode: ValidationMode,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut fields = self.fields.clone();

        if let Some(name) = &cmd.name {
            fields.name = normalize_name(name)?;
        }
        if let Some(value) = cmd.thc_percent {
            fields.thc_percent = thc(value)?;
        }
        if let Some(value) = cmd.cbd_percent {
            fields.cbd_percent = cbd(value)?;
        }
        if let Some(spectrum) = cmd.spectrum_type {
            fields.spectrum_type = spectrum;
        }
        if let Some(category) = cmd.therapeutic_category {
            fields.therapeutic_category = category;
        }
        if let Some(status) = cmd.regulatory_status {
            fields.regulatory_status = status;
        }

        match mode {
            ValidationMode::Supplied => validate_for_write(
                cmd.thc_percent.map(|_| fields.thc_percent.value()),
                cmd.regulatory_status,
            )?,
            ValidationMode::Merged => Self::validate_merged(&fields)?,
        }

        Ok(self.with_fields(fields, now))
    }

    fn validate_merged(fields: &ProductFields) -> DomainResult<()> {
        validate_for_write(
            Some(fields.thc_percent.value()),
            Some(fields.regulatory_status),
        )?;
        Ok(())
    }

    fn with_fields(&self, fields: ProductFields, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            fields,
            timestamps: self.timestamps.touched(now),
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn fields(&self) -> &ProductFields {
        &self.fields
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn spectrum_type(&self) -> SpectrumType {
        self.fields.spectrum_type
    }

    pub fn thc_percent(&self) -> Percentage {
        self.fields.thc_percent
    }

    pub fn cbd_percent(&self) -> Percentage {
        self.fields.cbd_percent
    }

    pub fn therapeutic_category(&self) -> TherapeuticCategory {
        self.fields.therapeutic_category
    }

    pub fn regulatory_status(&self) -> RegulatoryStatus {
        self.fields.regulatory_status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at()
    }

    /// Derived risk classification (computed on every call, never stored).
    pub fn risk(&self) -> RiskAssessment {
        evaluate_risk(self.fields.thc_percent.value(), self.fields.therapeutic_category)
    }

    pub fn has_risk(&self) -> bool {
        self.risk().has_risk
    }
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} - {}", self.fields.name, self.fields.spectrum_type.label())
    }
}
