//! Enumerated product fields.
//!
//! Wire spellings (`as_str`) are part of the API contract and must never be
//! renumbered or renamed. Display labels (`label`) are a static lookup table.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use cannareg_core::DomainError;

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $variant:ident => $wire:literal, $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable wire spelling.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Human-readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(DomainError::validation(format!(
                        "{} must be one of: {}",
                        $field,
                        [$($wire),+].join(", "),
                    ))),
                }
            }
        }
    };
}

labelled_enum! {
    /// Cannabis strain spectrum.
    SpectrumType, "spectrum_type" {
        Sativa => "sativa", "Sativa",
        Indica => "indica", "Indica",
        Hybrid => "hybrid", "Hybrid",
    }
}

labelled_enum! {
    /// Therapeutic area the product is intended for.
    TherapeuticCategory, "therapeutic_category" {
        Neurology => "neurology", "Neurology",
        Pediatrics => "pediatrics", "Pediatrics",
        Oncology => "oncology", "Oncology",
        Dermatology => "dermatology", "Dermatology",
        Other => "other", "Other",
    }
}

labelled_enum! {
    /// Approval state assigned by the health authority.
    ///
    /// There is no enforced transition graph; any status may follow any other.
    RegulatoryStatus, "regulatory_status" {
        Approved => "approved", "Approved",
        Pending => "pending", "Pending",
        Rejected => "rejected", "Rejected",
    }
}

impl Default for RegulatoryStatus {
    fn default() -> Self {
        RegulatoryStatus::Pending
    }
}
