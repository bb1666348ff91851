use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// ENUMERATED FIELD VALUES
// ═══════════════════════════════════════════════════════════════════════════

/// Whether an account tracks money owed (credit) or money held (debit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Credit,
    Debit,
}

impl AccountType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "credit" => Some(Self::Credit),
            "debit" => Some(Self::Debit),
            _ => None,
        }
    }

    pub fn allowed_values() -> &'static [&'static str] {
        &["credit", "debit"]
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Credit => write!(f, "credit"),
            AccountType::Debit => write!(f, "debit"),
        }
    }
}

/// Settlement state of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    Cleared,
    Outstanding,
    Future,
}

impl TransactionState {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cleared" => Some(Self::Cleared),
            "outstanding" => Some(Self::Outstanding),
            "future" => Some(Self::Future),
            _ => None,
        }
    }

    pub fn allowed_values() -> &'static [&'static str] {
        &["cleared", "outstanding", "future"]
    }
}

impl std::fmt::Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionState::Cleared => write!(f, "cleared"),
            TransactionState::Outstanding => write!(f, "outstanding"),
            TransactionState::Future => write!(f, "future"),
        }
    }
}

/// Direction of a transaction.
///
/// When the field is absent the value is the literal string `"undefined"`,
/// never JSON null; downstream consumers round-trip the enum through JSON
/// and rely on that spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
    Transfer,
    Undefined,
}

impl TransactionType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "expense" => Some(Self::Expense),
            "income" => Some(Self::Income),
            "transfer" => Some(Self::Transfer),
            "undefined" => Some(Self::Undefined),
            _ => None,
        }
    }

    pub fn allowed_values() -> &'static [&'static str] {
        &["expense", "income", "transfer", "undefined"]
    }
}

impl Default for TransactionType {
    fn default() -> Self {
        Self::Undefined
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Transfer => "transfer",
            Self::Undefined => "undefined",
        };
        write!(f, "{}", s)
    }
}

/// Recurrence schedule for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReoccurringType {
    Onetime,
    Weekly,
    Fortnightly,
    Monthly,
    Quarterly,
    BiAnnually,
    Annually,
    Undefined,
}

impl ReoccurringType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "onetime" => Some(Self::Onetime),
            "weekly" => Some(Self::Weekly),
            "fortnightly" => Some(Self::Fortnightly),
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "bi_annually" => Some(Self::BiAnnually),
            "annually" => Some(Self::Annually),
            "undefined" => Some(Self::Undefined),
            _ => None,
        }
    }

    pub fn allowed_values() -> &'static [&'static str] {
        &[
            "onetime",
            "weekly",
            "fortnightly",
            "monthly",
            "quarterly",
            "bi_annually",
            "annually",
            "undefined",
        ]
    }
}

impl Default for ReoccurringType {
    fn default() -> Self {
        Self::Onetime
    }
}

impl std::fmt::Display for ReoccurringType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Onetime => "onetime",
            Self::Weekly => "weekly",
            Self::Fortnightly => "fortnightly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::BiAnnually => "bi_annually",
            Self::Annually => "annually",
            Self::Undefined => "undefined",
        };
        write!(f, "{}", s)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DOMAIN ENTITIES
// ═══════════════════════════════════════════════════════════════════════════

/// An application user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub user_id: Option<i64>,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// A ledger account owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default)]
    pub account_id: Option<i64>,
    pub account_name_owner: String,
    pub account_type: AccountType,
    #[serde(default = "default_active_status")]
    pub active_status: bool,
    #[serde(default = "default_moniker")]
    pub moniker: String,
    #[serde(default)]
    pub cleared: Decimal,
    #[serde(default)]
    pub outstanding: Decimal,
    #[serde(default)]
    pub future: Decimal,
}

/// A single ledger entry against an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub transaction_id: Option<i64>,
    #[serde(default)]
    pub guid: Option<String>,
    pub account_name_owner: String,
    pub transaction_date: NaiveDate,
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub amount: Decimal,
    pub transaction_state: TransactionState,
    #[serde(default)]
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub reoccurring_type: ReoccurringType,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_active_status")]
    pub active_status: bool,
}

/// A bill payment from one account to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default)]
    pub payment_id: Option<i64>,
    pub source_account: String,
    pub destination_account: String,
    pub transaction_date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub guid_source: Option<String>,
    #[serde(default)]
    pub guid_destination: Option<String>,
    #[serde(default = "default_active_status")]
    pub active_status: bool,
}

/// A balance transfer between two accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    #[serde(default)]
    pub transfer_id: Option<i64>,
    pub source_account: String,
    pub destination_account: String,
    pub transaction_date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub guid_source: Option<String>,
    #[serde(default)]
    pub guid_destination: Option<String>,
    #[serde(default = "default_active_status")]
    pub active_status: bool,
}

/// A spending category label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub category_id: Option<i64>,
    pub category_name: String,
    #[serde(default = "default_active_status")]
    pub active_status: bool,
}

/// A reusable transaction description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    #[serde(default)]
    pub description_id: Option<i64>,
    pub description_name: String,
    #[serde(default = "default_active_status")]
    pub active_status: bool,
}

fn default_active_status() -> bool {
    true
}

fn default_moniker() -> String {
    "0000".to_string()
}
