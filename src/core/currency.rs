//! Currency codes and the static catalogs each provider supports

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;
use std::str::FromStr;

pub const AUD: &str = "AUD"; // Australian Dollar
pub const BGN: &str = "BGN"; // Bulgarian Lev
pub const BRL: &str = "BRL"; // Brazilian Real
pub const CAD: &str = "CAD"; // Canadian Dollar
pub const CHF: &str = "CHF"; // Swiss Franc
pub const CNY: &str = "CNY"; // Chinese Yuan
pub const CZK: &str = "CZK"; // Czech Koruna
pub const DKK: &str = "DKK"; // Danish Krone
pub const EUR: &str = "EUR"; // Euro
pub const GBP: &str = "GBP"; // British Pound Sterling
pub const GHS: &str = "GHS"; // Ghanaian Cedi
pub const HKD: &str = "HKD"; // Hong Kong Dollar
pub const HRK: &str = "HRK"; // Croatian Kuna
pub const HUF: &str = "HUF"; // Hungarian Forint
pub const IDR: &str = "IDR"; // Indonesian Rupiah
pub const ILS: &str = "ILS"; // Israeli New Shekel
pub const INR: &str = "INR"; // Indian Rupee
pub const JPY: &str = "JPY"; // Japanese Yen
pub const KRW: &str = "KRW"; // South Korean Won
pub const LKR: &str = "LKR"; // Sri Lankan Rupee
pub const MXN: &str = "MXN"; // Mexican Peso
pub const MYR: &str = "MYR"; // Malaysian Ringgit
pub const NOK: &str = "NOK"; // Norwegian Krone
pub const NZD: &str = "NZD"; // New Zealand Dollar
pub const PHP: &str = "PHP"; // Philippine Peso
pub const PLN: &str = "PLN"; // Polish Zloty
pub const RON: &str = "RON"; // Romanian Leu
pub const RUB: &str = "RUB"; // Russian Ruble
pub const SEK: &str = "SEK"; // Swedish Krona
pub const SGD: &str = "SGD"; // Singapore Dollar
pub const THB: &str = "THB"; // Thai Baht
pub const TRY: &str = "TRY"; // Turkish Lira
pub const USD: &str = "USD"; // US Dollar
pub const ZAR: &str = "ZAR"; // South African Rand

/// Codes published in the ECB daily reference rates.
pub const ECB_CURRENCIES: &[&str] = &[
    AUD, BGN, BRL, CAD, CHF, CNY, CZK, DKK, EUR, GBP, HKD, HRK, HUF, IDR, ILS, INR, JPY, KRW, MXN,
    MYR, NOK, NZD, PHP, PLN, RON, RUB, SEK, SGD, THB, TRY, USD, ZAR,
];

/// Codes quoted by the apilayer currency feed.
pub const APILAYER_CURRENCIES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BRL", "BSD", "BTC", "BTN", "BWP", "BYR", "BZD",
    "CAD", "CDF", "CHF", "CLF", "CLP", "CNY", "COP", "CRC", "CUP", "CVE", "CZK", "DJF", "DKK",
    "DOP", "DZD", "EEK", "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP", "GEL", "GGP", "GHS",
    "GIP", "GMD", "GNF", "GTQ", "GYD", "HKD", "HNL", "HRK", "HTG", "HUF", "IDR", "ILS", "IMP",
    "INR", "IQD", "IRR", "ISK", "JEP", "JMD", "JOD", "JPY", "KES", "KGS", "KHR", "KMF", "KPW",
    "KRW", "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LTL", "LVL", "LYD", "MAD",
    "MDL", "MGA", "MKD", "MMK", "MNT", "MOP", "MRO", "MUR", "MVR", "MWK", "MXN", "MYR", "MZN",
    "NAD", "NGN", "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN",
    "PYG", "QAR", "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP",
    "SLL", "SOS", "SRD", "STD", "SVC", "SYP", "SZL", "THB", "TJS", "TMT", "TND", "TOP", "TRY",
    "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "UYU", "UZS", "VEF", "VND", "VUV", "WST", "XAF",
    "XAG", "XAU", "XCD", "XDR", "XOF", "XPF", "YER", "ZAR", "ZMK", "ZMW", "ZWL",
];

/// A three letter currency code, always upper case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    pub const EUR: CurrencyCode = CurrencyCode(*b"EUR");
    pub const USD: CurrencyCode = CurrencyCode(*b"USD");

    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        match bytes {
            [a, b, c] if bytes.iter().all(u8::is_ascii_alphabetic) => Ok(CurrencyCode([
                a.to_ascii_uppercase(),
                b.to_ascii_uppercase(),
                c.to_ascii_uppercase(),
            ])),
            _ => Err(anyhow::anyhow!("Invalid currency code: {}", s)),
        }
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a catalog known to hold valid codes.
pub(crate) fn catalog_codes(catalog: &[&str]) -> Vec<CurrencyCode> {
    catalog.iter().filter_map(|c| c.parse().ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let code: CurrencyCode = "usd".parse().unwrap();
        assert_eq!(code.as_str(), "USD");
        assert_eq!(code.to_string(), "USD");
    }

    #[test]
    fn test_parse_rejects_invalid_codes() {
        assert!("US".parse::<CurrencyCode>().is_err());
        assert!("USDX".parse::<CurrencyCode>().is_err());
        assert!("U$D".parse::<CurrencyCode>().is_err());
        assert!("".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_catalogs_are_valid_codes() {
        assert_eq!(catalog_codes(ECB_CURRENCIES).len(), ECB_CURRENCIES.len());
        assert_eq!(
            catalog_codes(APILAYER_CURRENCIES).len(),
            APILAYER_CURRENCIES.len()
        );
        assert!(ECB_CURRENCIES.contains(&EUR));
        assert!(APILAYER_CURRENCIES.contains(&USD));
    }
}
