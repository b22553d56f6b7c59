//! Gateway Settings
//!
//! String-keyed option storage as exposed by the host platform. All
//! options are optional; readers degrade to empty values rather than
//! failing on an unconfigured merchant account.

use std::collections::HashMap;
use std::sync::RwLock;

/// Currency used when neither the form nor the gateway configures one
pub const DEFAULT_CURRENCY: &str = "BRL";

/// Option keys consumed by the gateway
pub mod keys {
    pub const ACCOUNT_NAME: &str = "account_name";
    pub const ACCOUNT_EMAIL: &str = "account_email";
    pub const ACCOUNT_TAX_ID: &str = "account_tax_id";
    pub const ACCOUNT_PHONE: &str = "account_phone";
    pub const ACCOUNT_PHONE_PREFIX: &str = "account_phone_prefix";
    pub const ACCOUNT_ZIP_CODE: &str = "account_zip_code";
    pub const ACCOUNT_STATE: &str = "account_state";
    pub const ACCOUNT_CITY: &str = "account_city";
    pub const ACCOUNT_STREET: &str = "account_street";
    pub const ACCOUNT_STREET_NUMBER: &str = "account_street_number";
    pub const USER_TOKEN: &str = "user_token";
    pub const LIVE_TOKEN: &str = "live_token";
    pub const TEST_TOKEN: &str = "test_token";
    pub const TEST_ENABLED: &str = "test_enabled";
    pub const CHECKOUT_URL: &str = "checkout_url";
    pub const CURRENCY: &str = "currency";
    pub const VERIFY_INVOICE: &str = "verify_invoice";

    /// All keys, for environment seeding
    pub const ALL: &[&str] = &[
        ACCOUNT_NAME,
        ACCOUNT_EMAIL,
        ACCOUNT_TAX_ID,
        ACCOUNT_PHONE,
        ACCOUNT_PHONE_PREFIX,
        ACCOUNT_ZIP_CODE,
        ACCOUNT_STATE,
        ACCOUNT_CITY,
        ACCOUNT_STREET,
        ACCOUNT_STREET_NUMBER,
        USER_TOKEN,
        LIVE_TOKEN,
        TEST_TOKEN,
        TEST_ENABLED,
        CHECKOUT_URL,
        CURRENCY,
        VERIFY_INVOICE,
    ];
}

/// Option storage trait
pub trait SettingsStore: Send + Sync {
    /// Raw option lookup; `None` when never configured
    fn get(&self, key: &str) -> Option<String>;

    /// Option lookup degraded to an empty string when unset
    fn get_or_empty(&self, key: &str) -> String {
        self.get(key).unwrap_or_default()
    }

    /// True when a flag option equals the literal `"on"`
    fn is_on(&self, key: &str) -> bool {
        self.get(key).as_deref() == Some("on")
    }

    /// Donation currency for a form: per-form override, then the
    /// gateway-wide option, then [`DEFAULT_CURRENCY`]
    fn currency_for(&self, form_id: i64) -> String {
        self.get(&format!("form_{form_id}_currency"))
            .or_else(|| self.get(keys::CURRENCY))
            .unwrap_or_else(|| DEFAULT_CURRENCY.into())
    }
}

/// In-memory settings store (for development and tests)
pub struct MemorySettingsStore {
    options: RwLock<HashMap<String, String>>,
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self {
            options: RwLock::new(HashMap::new()),
        }
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.options.write().unwrap().insert(key.into(), value.into());
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.options.read().unwrap().get(key).cloned()
    }
}
