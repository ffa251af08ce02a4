//! Request signing for the three Alibaba Cloud auth schemes in use
//!
//! - FC: `Authorization: FC <akid>:<base64(HMAC-SHA256)>`
//! - SLS: `Authorization: LOG <akid>:<base64(HMAC-SHA1)>`
//! - POP RPC (VPC, NAS): `Signature=<base64(HMAC-SHA1)>` query parameter

use crate::error::{AliyunError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;
use sha2::Sha256;
use std::collections::BTreeMap;

/// RFC 3986 unreserved characters stay as-is
const POP_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn invalid_key(_: hmac::digest::InvalidLength) -> AliyunError {
    AliyunError::InvalidConfig("access key secret is not a valid HMAC key".to_string())
}

pub fn hmac_sha256_base64(secret: &str, message: &str) -> Result<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(invalid_key)?;
    mac.update(message.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

pub fn hmac_sha1_base64(secret: &str, message: &str) -> Result<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes()).map_err(invalid_key)?;
    mac.update(message.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// `Date` header value, e.g. `Mon, 05 Oct 2026 08:00:00 GMT`
pub fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// POP `Timestamp` parameter, e.g. `2026-10-05T08:00:00Z`
pub fn iso8601(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn pop_encode(value: &str) -> String {
    utf8_percent_encode(value, POP_ENCODE_SET).to_string()
}

/// Sorted `k=v` pairs joined with `&`, both sides percent-encoded
pub fn pop_canonical_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", pop_encode(k), pop_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn pop_string_to_sign(method: &str, canonical_query: &str) -> String {
    let root = pop_encode("/");
    format!("{}&{}&{}", method, root, pop_encode(canonical_query))
}

pub fn pop_signature(access_key_secret: &str, string_to_sign: &str) -> Result<String> {
    hmac_sha1_base64(&format!("{}&", access_key_secret), string_to_sign)
}

/// Lowercased headers with the given prefixes, sorted, one `k:v\n` per header
fn canonical_headers(headers: &BTreeMap<String, String>, prefixes: &[&str]) -> String {
    let mut selected: Vec<(String, &str)> = headers
        .iter()
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.as_str()))
        .filter(|(k, _)| prefixes.iter().any(|p| k.starts_with(p)))
        .collect();
    selected.sort();
    selected
        .into_iter()
        .map(|(k, v)| format!("{}:{}\n", k, v))
        .collect()
}

fn header<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> &'a str {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

/// FC string-to-sign; query parameters are appended sorted, one per line
pub fn fc_string_to_sign(
    method: &str,
    path: &str,
    headers: &BTreeMap<String, String>,
    query: &[(String, String)],
) -> String {
    let mut out = format!(
        "{}\n{}\n{}\n{}\n{}{}",
        method,
        header(headers, "content-md5"),
        header(headers, "content-type"),
        header(headers, "date"),
        canonical_headers(headers, &["x-fc-"]),
        path
    );
    if !query.is_empty() {
        let mut params: Vec<String> = query
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        params.sort();
        out.push('\n');
        out.push_str(&params.join("\n"));
    }
    out
}

pub fn fc_authorization(
    access_key_id: &str,
    access_key_secret: &str,
    string_to_sign: &str,
) -> Result<String> {
    let signature = hmac_sha256_base64(access_key_secret, string_to_sign)?;
    Ok(format!("FC {}:{}", access_key_id, signature))
}

/// SLS string-to-sign for requests without query parameters
pub fn sls_string_to_sign(
    method: &str,
    resource: &str,
    headers: &BTreeMap<String, String>,
) -> String {
    format!(
        "{}\n{}\n{}\n{}\n{}{}",
        method,
        header(headers, "content-md5"),
        header(headers, "content-type"),
        header(headers, "date"),
        canonical_headers(headers, &["x-log-", "x-acs-"]),
        resource
    )
}

pub fn sls_authorization(
    access_key_id: &str,
    access_key_secret: &str,
    string_to_sign: &str,
) -> Result<String> {
    let signature = hmac_sha1_base64(access_key_secret, string_to_sign)?;
    Ok(format!("LOG {}:{}", access_key_id, signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_date_formats() {
        let now = Utc.with_ymd_and_hms(2026, 10, 5, 8, 0, 0).unwrap();
        assert_eq!(http_date(now), "Mon, 05 Oct 2026 08:00:00 GMT");
        assert_eq!(iso8601(now), "2026-10-05T08:00:00Z");
    }

    #[test]
    fn test_pop_encode() {
        assert_eq!(pop_encode("a b*c~d"), "a%20b%2Ac~d");
        assert_eq!(pop_encode("/"), "%2F");
        assert_eq!(
            pop_encode("2026-10-05T08:00:00Z"),
            "2026-10-05T08%3A00%3A00Z"
        );
    }

    #[test]
    fn test_pop_string_to_sign() {
        let params = string_map(&[("Version", "2016-04-28"), ("Action", "DescribeVpcs")]);
        let canonical = pop_canonical_query(&params);
        assert_eq!(canonical, "Action=DescribeVpcs&Version=2016-04-28");
        assert_eq!(
            pop_string_to_sign("POST", &canonical),
            "POST&%2F&Action%3DDescribeVpcs%26Version%3D2016-04-28"
        );
    }

    #[test]
    fn test_fc_string_to_sign() {
        let h = string_map(&[
            ("Content-Type", "application/json"),
            ("Date", "Mon, 05 Oct 2026 08:00:00 GMT"),
            ("X-Fc-Account-Id", "1234"),
            ("x-fc-security-token", "sts"),
        ]);
        let s = fc_string_to_sign(
            "GET",
            "/2016-08-15/services/demo/functions/index/triggers",
            &h,
            &[("limit".to_string(), "100".to_string())],
        );
        assert_eq!(
            s,
            "GET\n\napplication/json\nMon, 05 Oct 2026 08:00:00 GMT\n\
             x-fc-account-id:1234\nx-fc-security-token:sts\n\
             /2016-08-15/services/demo/functions/index/triggers\nlimit=100"
        );
    }

    #[test]
    fn test_sls_string_to_sign() {
        let h = string_map(&[
            ("Date", "Mon, 05 Oct 2026 08:00:00 GMT"),
            ("x-log-apiversion", "0.6.0"),
            ("x-log-signaturemethod", "hmac-sha1"),
            ("x-log-bodyrawsize", "0"),
        ]);
        assert_eq!(
            sls_string_to_sign("DELETE", "/", &h),
            "DELETE\n\n\nMon, 05 Oct 2026 08:00:00 GMT\n\
             x-log-apiversion:0.6.0\nx-log-bodyrawsize:0\nx-log-signaturemethod:hmac-sha1\n/"
        );
    }

    #[test]
    fn test_authorization_prefixes() {
        let fc = fc_authorization("ak", "sk", "x").unwrap();
        let sls = sls_authorization("ak", "sk", "x").unwrap();
        assert!(fc.starts_with("FC ak:"));
        assert!(sls.starts_with("LOG ak:"));
        // HMAC-SHA1 / SHA256 digests encode to 28 / 44 base64 characters
        assert_eq!(hmac_sha1_base64("sk", "x").unwrap().len(), 28);
        assert_eq!(hmac_sha256_base64("sk", "x").unwrap().len(), 44);
    }
}
