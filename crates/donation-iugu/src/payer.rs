//! Invoice Payer Assembly
//!
//! Iugu requires a payer contact/address block on bank-slip invoices
//! for tax purposes. The payer is the merchant account, assembled from
//! settings; it always comes out fully shaped, with unset options
//! degraded to empty strings. No format validation happens here, the
//! API rejects what it cannot accept.

use serde::{Deserialize, Serialize};

use donation_core::{SettingsStore, keys};

/// Invoices are domestic only; the API expects this literal
pub const PAYER_COUNTRY: &str = "BRASIL";

/// Payer address block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerAddress {
    pub zip_code: String,
    pub state: String,
    pub street: String,
    pub number: String,
    pub country: String,
    pub city: String,
}

/// Payer contact record sent with invoice creation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub name: String,
    pub email: String,
    pub cpf_cnpj: String,
    pub phone: String,
    pub phone_prefix: String,
    pub address: PayerAddress,
}

/// Assemble the merchant payer record from settings
pub fn build_payer(settings: &dyn SettingsStore) -> Payer {
    Payer {
        name: settings.get_or_empty(keys::ACCOUNT_NAME),
        email: settings.get_or_empty(keys::ACCOUNT_EMAIL),
        cpf_cnpj: settings.get_or_empty(keys::ACCOUNT_TAX_ID),
        phone: settings.get_or_empty(keys::ACCOUNT_PHONE),
        phone_prefix: settings.get_or_empty(keys::ACCOUNT_PHONE_PREFIX),
        address: PayerAddress {
            zip_code: settings.get_or_empty(keys::ACCOUNT_ZIP_CODE),
            state: settings.get_or_empty(keys::ACCOUNT_STATE),
            street: settings.get_or_empty(keys::ACCOUNT_STREET),
            number: settings.get_or_empty(keys::ACCOUNT_STREET_NUMBER),
            country: PAYER_COUNTRY.into(),
            city: settings.get_or_empty(keys::ACCOUNT_CITY),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use donation_core::MemorySettingsStore;

    #[test]
    fn test_unconfigured_payer_is_fully_shaped() {
        let settings = MemorySettingsStore::new();
        let payer = build_payer(&settings);

        assert_eq!(
            payer,
            Payer {
                name: String::new(),
                email: String::new(),
                cpf_cnpj: String::new(),
                phone: String::new(),
                phone_prefix: String::new(),
                address: PayerAddress {
                    zip_code: String::new(),
                    state: String::new(),
                    street: String::new(),
                    number: String::new(),
                    country: PAYER_COUNTRY.into(),
                    city: String::new(),
                },
            }
        );
    }

    #[test]
    fn test_configured_values_pass_through() {
        let settings = MemorySettingsStore::new();
        settings.set(keys::ACCOUNT_NAME, "ONG Esperança");
        settings.set(keys::ACCOUNT_TAX_ID, "12.345.678/0001-90");
        settings.set(keys::ACCOUNT_ZIP_CODE, "01310-100");
        settings.set(keys::ACCOUNT_CITY, "São Paulo");

        let payer = build_payer(&settings);
        assert_eq!(payer.name, "ONG Esperança");
        assert_eq!(payer.cpf_cnpj, "12.345.678/0001-90");
        assert_eq!(payer.address.zip_code, "01310-100");
        assert_eq!(payer.address.city, "São Paulo");
        assert_eq!(payer.address.country, "BRASIL");
    }

    #[test]
    fn test_payer_serializes_with_nested_address() {
        let settings = MemorySettingsStore::new();
        settings.set(keys::ACCOUNT_STREET, "Av. Paulista");

        let json = serde_json::to_value(build_payer(&settings)).unwrap();
        assert_eq!(json["address"]["street"], "Av. Paulista");
        assert_eq!(json["address"]["country"], "BRASIL");
        assert_eq!(json["cpf_cnpj"], "");
    }
}
