// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::PathBuf;

use crate::error::{Result, UploadError};

use super::{
    RawConfig, Settings, DEFAULT_TRANSFER_CLIENT, KEY_LOCAL_SOURCE, KEY_REMOTE_DEST,
    KEY_REMOTE_HOST, KEY_TRANSFER_CLIENT, KEY_USER_NAME, KEY_VERIFY_CERTIFICATE, REQUIRED_KEYS,
};

impl Settings {
    /// Build validated settings from raw pairs.
    ///
    /// All missing required keys come back together in one
    /// [`UploadError::MissingKeys`]; the caller prints them.
    pub fn from_raw(raw: &RawConfig) -> Result<Self> {
        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| raw.get(key).is_none())
            .map(|key| key.to_string())
            .collect();

        if !missing.is_empty() {
            tracing::debug!(target: "foscam.config", keys = ?missing, "Required config keys missing");
            return Err(UploadError::MissingKeys(missing));
        }

        let remote_ftp_hostname = required(raw, KEY_REMOTE_HOST)?;
        check_host_scheme(&remote_ftp_hostname)?;

        let verify_certificate = match raw.get(KEY_VERIFY_CERTIFICATE) {
            Some(value) => parse_bool(value).ok_or_else(|| {
                UploadError::Config(format!(
                    "'{}' must be true or false, got '{}'",
                    KEY_VERIFY_CERTIFICATE, value
                ))
            })?,
            None => true,
        };

        let settings = Settings {
            remote_ftp_hostname,
            ftp_user_name: required(raw, KEY_USER_NAME)?,
            local_source_path: expand_home(&required(raw, KEY_LOCAL_SOURCE)?),
            remote_dest_path: required(raw, KEY_REMOTE_DEST)?,
            transfer_client: raw
                .get(KEY_TRANSFER_CLIENT)
                .unwrap_or(DEFAULT_TRANSFER_CLIENT)
                .to_string(),
            verify_certificate,
        };

        tracing::debug!(
            target: "foscam.config",
            host = %settings.remote_ftp_hostname,
            user = %settings.ftp_user_name,
            source = %settings.local_source_path.display(),
            dest = %settings.remote_dest_path,
            "Configuration validated"
        );

        Ok(settings)
    }
}

fn required(raw: &RawConfig, key: &str) -> Result<String> {
    raw.get(key)
        .map(str::to_string)
        .ok_or_else(|| UploadError::MissingKeys(vec![key.to_string()]))
}

/// Only `ftps://` is accepted as an explicit scheme; a bare host name gets
/// explicit TLS through `ftp:ssl-force`.
fn check_host_scheme(host: &str) -> Result<()> {
    match host.split_once("://") {
        None => Ok(()),
        Some((scheme, _)) if scheme.eq_ignore_ascii_case("ftps") => Ok(()),
        Some((scheme, _)) => Err(UploadError::Config(format!(
            "'{}' uses unsupported scheme '{}://'; plaintext transfers are not allowed",
            KEY_REMOTE_HOST, scheme
        ))),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_raw() -> RawConfig {
        let mut raw = RawConfig::default();
        raw.set(KEY_REMOTE_HOST, "ftp.example.com");
        raw.set(KEY_USER_NAME, "camera");
        raw.set(KEY_LOCAL_SOURCE, "/var/cam");
        raw.set(KEY_REMOTE_DEST, "/backup");
        raw
    }

    #[test]
    fn test_from_raw_with_defaults() {
        let settings = Settings::from_raw(&full_raw()).unwrap();
        assert_eq!(settings.transfer_client, "lftp");
        assert!(settings.verify_certificate);
        assert_eq!(settings.local_source_path, PathBuf::from("/var/cam"));
    }

    #[test]
    fn test_from_raw_reports_all_missing_keys() {
        let mut raw = RawConfig::default();
        raw.set(KEY_USER_NAME, "camera");

        match Settings::from_raw(&raw) {
            Err(UploadError::MissingKeys(keys)) => {
                assert_eq!(
                    keys,
                    vec![
                        "remote_ftp_hostname".to_string(),
                        "local_source_path".to_string(),
                        "remote_dest_path".to_string(),
                    ]
                );
            }
            other => panic!("Expected MissingKeys, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_plain_ftp_scheme() {
        let mut raw = full_raw();
        raw.set(KEY_REMOTE_HOST, "ftp://ftp.example.com");
        let err = Settings::from_raw(&raw).unwrap_err();
        assert!(matches!(err, UploadError::Config(_)));
        assert!(err.to_string().contains("plaintext"));
    }

    #[test]
    fn test_accepts_ftps_scheme() {
        let mut raw = full_raw();
        raw.set(KEY_REMOTE_HOST, "ftps://ftp.example.com:990");
        let settings = Settings::from_raw(&raw).unwrap();
        assert_eq!(settings.remote_ftp_hostname, "ftps://ftp.example.com:990");
    }

    #[test]
    fn test_verify_certificate_values() {
        let mut raw = full_raw();
        raw.set(KEY_VERIFY_CERTIFICATE, "no");
        assert!(!Settings::from_raw(&raw).unwrap().verify_certificate);

        raw.set(KEY_VERIFY_CERTIFICATE, "maybe");
        assert!(matches!(
            Settings::from_raw(&raw),
            Err(UploadError::Config(_))
        ));
    }

    #[test]
    fn test_transfer_client_override() {
        let mut raw = full_raw();
        raw.set(KEY_TRANSFER_CLIENT, "/opt/lftp/bin/lftp");
        let settings = Settings::from_raw(&raw).unwrap();
        assert_eq!(settings.transfer_client, "/opt/lftp/bin/lftp");
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/data/cam"), PathBuf::from("/data/cam"));
        assert_eq!(expand_home("relative/cam"), PathBuf::from("relative/cam"));
    }

    #[test]
    fn test_expand_home_prefix() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/cam"), home.join("cam"));
        }
    }
}
