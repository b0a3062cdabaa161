//! Account SAS signing for Azure Blob Storage.
//!
//! Produces a signed, time-boxed query string granting scoped access to the
//! storage account without revealing the account key. Pure computation: the
//! signer performs no network I/O and keeps no record of issued tokens
//! (stateless issuance, expiry by timestamp, no revocation).
//!
//! The signature follows the published account-SAS algorithm: an
//! HMAC-SHA256 over a newline-joined string-to-sign, keyed with the
//! base64-decoded account key.

use std::fmt;

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Storage service version the signature is computed against.
pub const SERVICE_VERSION: &str = "2022-11-02";

/// Query-string value encoding, equivalent to JavaScript's
/// `encodeURIComponent` for the characters that matter here.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Long-lived storage account credentials. Held only by the server process;
/// the key is never logged and never leaves the process.
#[derive(Clone)]
pub struct StorageIdentity {
    account_name: String,
    account_key: String,
}

impl StorageIdentity {
    /// Create an identity, validating both fields up front.
    ///
    /// An empty name or key, or a key that is not valid base64, is a
    /// configuration error: no token can ever be issued from it, so the
    /// caller should treat this as fatal at startup.
    pub fn new(account_name: impl Into<String>, account_key: impl Into<String>) -> Result<Self, AppError> {
        let account_name = account_name.into();
        let account_key = account_key.into();

        if account_name.trim().is_empty() {
            return Err(AppError::Configuration(
                "Storage account name is empty".to_string(),
            ));
        }
        if account_key.trim().is_empty() {
            return Err(AppError::Configuration(
                "Storage account key is empty".to_string(),
            ));
        }
        general_purpose::STANDARD
            .decode(account_key.trim())
            .map_err(|e| {
                AppError::Configuration(format!("Storage account key is not valid base64: {}", e))
            })?;

        Ok(Self {
            account_name,
            account_key,
        })
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    fn key_bytes(&self) -> Result<Vec<u8>, AppError> {
        general_purpose::STANDARD
            .decode(self.account_key.trim())
            .map_err(|e| AppError::Issuance(format!("Failed to decode account key: {}", e)))
    }
}

// Keep the account key out of debug output.
impl fmt::Debug for StorageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageIdentity")
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .finish()
    }
}

/// Account-level SAS permissions.
///
/// Serialized in the provider's canonical order (`r w d l a c u p`), which is
/// required for the signature to verify. `rwdlacup` is the full set issued by
/// the token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccountSasPermissions {
    pub read: bool,
    pub write: bool,
    pub delete: bool,
    pub list: bool,
    pub add: bool,
    pub create: bool,
    pub update: bool,
    pub process: bool,
}

impl AccountSasPermissions {
    /// Parse a permission string such as `"rwdlacup"`. Order-insensitive;
    /// unknown characters are rejected.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let mut permissions = Self::default();
        for c in raw.chars() {
            match c {
                'r' => permissions.read = true,
                'w' => permissions.write = true,
                'd' => permissions.delete = true,
                'l' => permissions.list = true,
                'a' => permissions.add = true,
                'c' => permissions.create = true,
                'u' => permissions.update = true,
                'p' => permissions.process = true,
                other => {
                    return Err(AppError::InvalidInput(format!(
                        "Unknown SAS permission: {}",
                        other
                    )))
                }
            }
        }
        Ok(permissions)
    }
}

impl fmt::Display for AccountSasPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, c) in [
            (self.read, 'r'),
            (self.write, 'w'),
            (self.delete, 'd'),
            (self.list, 'l'),
            (self.add, 'a'),
            (self.create, 'c'),
            (self.update, 'u'),
            (self.process, 'p'),
        ] {
            if flag {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// Storage services the token applies to. The token endpoint signs for the
/// blob service only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountSasServices {
    pub blob: bool,
    pub queue: bool,
    pub table: bool,
    pub file: bool,
}

impl AccountSasServices {
    pub fn blob_only() -> Self {
        Self {
            blob: true,
            queue: false,
            table: false,
            file: false,
        }
    }
}

impl fmt::Display for AccountSasServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, c) in [
            (self.blob, 'b'),
            (self.queue, 'q'),
            (self.table, 't'),
            (self.file, 'f'),
        ] {
            if flag {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// Resource levels the token applies to: service, container, and object
/// (`sco` authorizes operations across all containers in the account).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountSasResourceTypes {
    pub service: bool,
    pub container: bool,
    pub object: bool,
}

impl AccountSasResourceTypes {
    pub fn all() -> Self {
        Self {
            service: true,
            container: true,
            object: true,
        }
    }
}

impl fmt::Display for AccountSasResourceTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, c) in [
            (self.service, 's'),
            (self.container, 'c'),
            (self.object, 'o'),
        ] {
            if flag {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// Transport the token may be presented over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SasProtocol {
    Https,
    HttpsAndHttp,
}

impl fmt::Display for SasProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SasProtocol::Https => write!(f, "https"),
            SasProtocol::HttpsAndHttp => write!(f, "https,http"),
        }
    }
}

/// Parameters for one token issuance.
#[derive(Clone, Debug)]
pub struct AccountSasOptions {
    pub permissions: AccountSasPermissions,
    pub services: AccountSasServices,
    pub resource_types: AccountSasResourceTypes,
    pub protocol: SasProtocol,
    pub starts_on: DateTime<Utc>,
    pub expires_on: DateTime<Utc>,
}

/// An issued token: the signed query string plus its validity window.
/// Appending `query` to the account's blob endpoint URL authorizes requests
/// until `expires_on`.
#[derive(Clone, Debug)]
pub struct SasToken {
    query: String,
    pub starts_on: DateTime<Utc>,
    pub expires_on: DateTime<Utc>,
}

impl SasToken {
    pub fn as_str(&self) -> &str {
        &self.query
    }
}

impl fmt::Display for SasToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

/// Compute a signed account-SAS query string for the given identity and
/// options.
pub fn issue_account_sas(
    identity: &StorageIdentity,
    options: &AccountSasOptions,
) -> Result<SasToken, AppError> {
    if options.expires_on <= options.starts_on {
        return Err(AppError::Issuance(format!(
            "Expiry {} is not after start {}",
            options.expires_on, options.starts_on
        )));
    }

    let permissions = options.permissions.to_string();
    if permissions.is_empty() {
        return Err(AppError::Issuance("Empty permission set".to_string()));
    }

    let services = options.services.to_string();
    let resource_types = options.resource_types.to_string();
    let protocol = options.protocol.to_string();
    let starts_on = format_timestamp(options.starts_on);
    let expires_on = format_timestamp(options.expires_on);

    // Field order and the trailing newline are part of the signing contract.
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
        identity.account_name(),
        permissions,
        services,
        resource_types,
        starts_on,
        expires_on,
        "", // signed IP range (unrestricted)
        protocol,
        SERVICE_VERSION,
        "", // encryption scope (none)
    );

    let key = identity.key_bytes()?;
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| AppError::Issuance(format!("Invalid signing key: {}", e)))?;
    mac.update(string_to_sign.as_bytes());
    let signature = general_purpose::STANDARD.encode(mac.finalize().into_bytes());

    let query = [
        ("sv", SERVICE_VERSION),
        ("ss", services.as_str()),
        ("srt", resource_types.as_str()),
        ("sp", permissions.as_str()),
        ("st", starts_on.as_str()),
        ("se", expires_on.as_str()),
        ("spr", protocol.as_str()),
        ("sig", signature.as_str()),
    ]
    .iter()
    .map(|(k, v)| format!("{}={}", k, utf8_percent_encode(v, QUERY_ENCODE_SET)))
    .collect::<Vec<_>>()
    .join("&");

    Ok(SasToken {
        query,
        starts_on: options.starts_on,
        expires_on: options.expires_on,
    })
}

fn format_timestamp(t: DateTime<Utc>) -> String {
    // Truncated to whole seconds, as the signing algorithm requires.
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn test_identity() -> StorageIdentity {
        let key = general_purpose::STANDARD.encode(b"01234567890123456789012345678901");
        StorageIdentity::new("paveaiblob", key).unwrap()
    }

    fn test_options(now: DateTime<Utc>) -> AccountSasOptions {
        AccountSasOptions {
            permissions: AccountSasPermissions::parse("rwdlacup").unwrap(),
            services: AccountSasServices::blob_only(),
            resource_types: AccountSasResourceTypes::all(),
            protocol: SasProtocol::HttpsAndHttp,
            starts_on: now - Duration::minutes(15),
            expires_on: now + Duration::hours(1),
        }
    }

    fn parse_query(query: &str) -> Vec<(String, String)> {
        query
            .split('&')
            .map(|pair| {
                let (k, v) = pair.split_once('=').expect("key=value pair");
                (k.to_string(), v.to_string())
            })
            .collect()
    }

    #[test]
    fn issues_query_string_shaped_token() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let token = issue_account_sas(&test_identity(), &test_options(now)).unwrap();

        assert!(!token.as_str().is_empty());
        let params = parse_query(token.as_str());
        let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["sv", "ss", "srt", "sp", "st", "se", "spr", "sig"]);

        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("ss"), "b");
        assert_eq!(get("srt"), "sco");
        assert_eq!(get("sp"), "rwdlacup");
        assert_eq!(get("spr"), "https%2Chttp");
        assert!(!get("sig").is_empty());
        // Timestamps are percent-encoded ISO8601
        assert_eq!(get("st"), "2025-03-01T11%3A45%3A00Z");
        assert_eq!(get("se"), "2025-03-01T13%3A00%3A00Z");
    }

    #[test]
    fn window_is_backdated_start_plus_fixed_ttl() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let token = issue_account_sas(&test_identity(), &test_options(now)).unwrap();

        assert!(token.expires_on > token.starts_on);
        assert_eq!(
            token.expires_on - token.starts_on,
            Duration::hours(1) + Duration::minutes(15)
        );
    }

    #[test]
    fn signatures_are_time_dependent() {
        let identity = test_identity();
        let first = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let second = first + Duration::seconds(1);

        let a = issue_account_sas(&identity, &test_options(first)).unwrap();
        let b = issue_account_sas(&identity, &test_options(second)).unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn signature_is_deterministic_for_same_window() {
        let identity = test_identity();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        let a = issue_account_sas(&identity, &test_options(now)).unwrap();
        let b = issue_account_sas(&identity, &test_options(now)).unwrap();
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn missing_identity_fields_never_issue() {
        assert!(matches!(
            StorageIdentity::new("", "a2V5"),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(
            StorageIdentity::new("account", ""),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(
            StorageIdentity::new("account", "   "),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn non_base64_key_is_a_configuration_error() {
        assert!(matches!(
            StorageIdentity::new("account", "not base64!!"),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let mut options = test_options(now);
        options.expires_on = options.starts_on;
        assert!(matches!(
            issue_account_sas(&test_identity(), &options),
            Err(AppError::Issuance(_))
        ));
    }

    #[test]
    fn permissions_serialize_in_canonical_order() {
        // Parse order does not matter; output order does.
        let shuffled = AccountSasPermissions::parse("pucaldwr").unwrap();
        assert_eq!(shuffled.to_string(), "rwdlacup");

        let partial = AccountSasPermissions::parse("rl").unwrap();
        assert_eq!(partial.to_string(), "rl");
    }

    #[test]
    fn unknown_permission_is_rejected() {
        assert!(AccountSasPermissions::parse("rwx").is_err());
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let rendered = format!("{:?}", test_identity());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("0123"));
    }
}
