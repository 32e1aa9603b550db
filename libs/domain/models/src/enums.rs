// [libs/domain/models/src/enums.rs]
//! Closed sum types for every categorical field in the credit/payment
//! schemas, plus the job lifecycle and field-type schema enums.
//!
//! Each domain enum carries a stable wire `code` (what is stored in the
//! warehouse and sent over the wire) and a human `label` (what an operator
//! or the upstream bank might type instead). `EnumCode::from_code_or_label`
//! is the single place that reconciles the two, consulted by the
//! normalizer's `to_enum` primitive.

use serde::{Deserialize, Serialize};

/// A closed categorical domain value with a stable wire code and a display label.
pub trait EnumCode: Sized + Copy + 'static {
    fn code(&self) -> &'static str;
    fn label(&self) -> &'static str;
    fn all() -> &'static [Self];

    fn from_code_or_label(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::all()
            .iter()
            .find(|v| v.code() == trimmed)
            .or_else(|| {
                Self::all()
                    .iter()
                    .find(|v| v.label().eq_ignore_ascii_case(trimmed))
            })
            .copied()
    }
}

macro_rules! enum_code {
    ($name:ident { $($variant:ident => ($code:literal, $label:literal)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl EnumCode for $name {
            fn code(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.code())
            }
        }
    };
}

enum_code!(CustomerType {
    Individual => ("B", "Bireysel"),
    Corporate => ("K", "Kurumsal"),
});

enum_code!(LoanStatusCode {
    Active => ("A", "Aktif"),
    Closed => ("K", "Kapali"),
    NonPerforming => ("T", "Takipte"),
    Restructured => ("Y", "Yeniden Yapilandirildi"),
});

enum_code!(LoanStatusFlag {
    Performing => ("P", "Performing"),
    NonPerforming => ("N", "Non-Performing"),
    Closed => ("K", "Closed"),
});

enum_code!(InsuranceIncluded {
    Yes => ("E", "Evet"),
    No => ("H", "Hayir"),
});

enum_code!(InstallmentStatus {
    Paid => ("O", "Odendi"),
    Pending => ("B", "Bekliyor"),
    Overdue => ("G", "Gecikti"),
});

enum_code!(LoanProductType {
    Mortgage => ("M", "Mortgage"),
    AutoLoan => ("A", "Auto Loan"),
    WorkingCapital => ("W", "Working Capital"),
    Consumer => ("C", "Consumer"),
    CommercialTerm => ("T", "Commercial Term"),
    Overdraft => ("V", "Overdraft"),
});

/// Selects which pair of upstream file-types (`{category}_credit` /
/// `{category}_payment`) a sync targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanCategory {
    Commercial,
    Retail,
}

impl LoanCategory {
    /// Lower-case form used in upstream `file_type` query parameters and
    /// staging table names (`stg_<tenant>_<category>_<role>`).
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Commercial => "commercial",
            Self::Retail => "retail",
        }
    }

    /// Upper-case form injected into rows as `loan_type` and used in the
    /// operator trigger API body.
    pub fn wire(&self) -> &'static str {
        match self {
            Self::Commercial => "COMMERCIAL",
            Self::Retail => "RETAIL",
        }
    }

    pub fn file_type(&self, role: FileRole) -> String {
        format!("{}_{}", self.slug(), role.suffix())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "COMMERCIAL" => Some(Self::Commercial),
            "RETAIL" => Some(Self::Retail),
            _ => None,
        }
    }

    pub fn all() -> [Self; 2] {
        [Self::Commercial, Self::Retail]
    }
}

impl std::fmt::Display for LoanCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire())
    }
}

/// Which upstream stream a file-type string refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Credit,
    Payment,
}

impl FileRole {
    fn suffix(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Payment => "payment",
        }
    }
}

/// Job lifecycle. `Warning` is reserved, never constructed by the core today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncJobStatus {
    Pending,
    InProgress,
    Success,
    Failed,
    Warning,
}

impl SyncJobStatus {
    pub fn wire(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Warning => "WARNING",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PENDING" => Some(Self::Pending),
            "IN_PROGRESS" => Some(Self::InProgress),
            "SUCCESS" => Some(Self::Success),
            "FAILED" => Some(Self::Failed),
            "WARNING" => Some(Self::Warning),
            _ => None,
        }
    }

    /// True for the two states the dedup guard treats as "already active".
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

impl std::fmt::Display for SyncJobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire())
    }
}

/// Profiler dispatch key, consulted per-field against the static schema
/// tables in [`crate::credit::CREDIT_FIELD_SCHEMA`] and
/// [`crate::payment::PAYMENT_FIELD_SCHEMA`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Numeric,
    Categorical,
    Date,
    String,
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_code_or_label_case_insensitively() {
        assert_eq!(
            LoanStatusCode::from_code_or_label("K"),
            Some(LoanStatusCode::Closed)
        );
        assert_eq!(
            LoanStatusCode::from_code_or_label("kapali"),
            Some(LoanStatusCode::Closed)
        );
        assert_eq!(LoanStatusCode::from_code_or_label("nope"), None);
    }

    #[test]
    fn loan_category_round_trips_through_wire_form() {
        assert_eq!(LoanCategory::parse("commercial"), Some(LoanCategory::Commercial));
        assert_eq!(LoanCategory::Retail.wire(), "RETAIL");
        assert_eq!(LoanCategory::Commercial.file_type(FileRole::Credit), "commercial_credit");
    }

    #[test]
    fn job_status_active_set_matches_dedup_guard_contract() {
        assert!(SyncJobStatus::Pending.is_active());
        assert!(SyncJobStatus::InProgress.is_active());
        assert!(!SyncJobStatus::Success.is_active());
        assert!(!SyncJobStatus::Failed.is_active());
    }
}
