use lazy_static::lazy_static;
use rust_decimal::Decimal;

/// Process-wide financial and field-length limits.
///
/// The sanitizer and the schema validator both consult this one static so the
/// two stages can never disagree about what is in range.
#[derive(Debug, Clone)]
pub struct FinancialLimits {
    /// Largest absolute amount accepted anywhere in the application
    pub max_amount: Decimal,
    /// Smallest (most negative) amount accepted
    pub min_amount: Decimal,
    /// Amounts carry at most this many decimal places
    pub max_decimal_places: u32,
    /// Maximum length for transaction descriptions
    pub max_description_length: usize,
    /// Maximum length for free-form notes
    pub max_notes_length: usize,
    /// Maximum length for category names
    pub max_category_length: usize,
    /// Account name length bounds
    pub min_account_name_length: usize,
    pub max_account_name_length: usize,
    /// Username length bounds
    pub min_username_length: usize,
    pub max_username_length: usize,
    /// Password length bounds
    pub min_password_length: usize,
    pub max_password_length: usize,
    /// Maximum length for first/last names
    pub max_person_name_length: usize,
}

lazy_static! {
    pub static ref FINANCIAL_LIMITS: FinancialLimits = FinancialLimits {
        max_amount: Decimal::new(99_999_999_999, 2),
        min_amount: Decimal::new(-99_999_999_999, 2),
        max_decimal_places: 2,
        max_description_length: 75,
        max_notes_length: 100,
        max_category_length: 50,
        min_account_name_length: 3,
        max_account_name_length: 40,
        min_username_length: 3,
        max_username_length: 50,
        min_password_length: 8,
        max_password_length: 255,
        max_person_name_length: 50,
    };
}
