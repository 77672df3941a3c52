//! Donor domain models and intake validation.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_COUNTRY;
use crate::errors::{Error, Result, ValidationError};

lazy_static! {
    /// Pragmatic email shape check: no whitespace, one '@', a dot in the
    /// domain part. Deliverability is the backend's problem.
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern");
}

/// Normalizes free-form phone input to E.164, or `None` if it cannot be.
///
/// Everything except digits and `+` is stripped first. Input that already
/// starts with `+` and has a plausible length is kept as typed. Bare
/// digits are treated as North American: ten digits gain `+1`, eleven
/// digits starting with `1` gain `+`.
pub fn normalize_phone_e164(raw: &str) -> Option<String> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    if kept.starts_with('+') && (11..=16).contains(&kept.len()) {
        return Some(kept);
    }
    let digits: String = kept.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => Some(format!("+1{digits}")),
        11 if digits.starts_with('1') => Some(format!("+{digits}")),
        _ => None,
    }
}

/// Raw donor intake form, exactly as typed at the kiosk.
///
/// Nothing here is trimmed or checked until [`DonorForm::validate`] runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorForm {
    pub title: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    /// Date of birth as YYYY-MM-DD.
    pub dob: String,
    pub mobile: String,
    pub email: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for DonorForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            first_name: String::new(),
            middle_name: String::new(),
            last_name: String::new(),
            dob: String::new(),
            mobile: String::new(),
            email: String::new(),
            address1: String::new(),
            address2: String::new(),
            city: String::new(),
            region: String::new(),
            postal_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl DonorForm {
    /// Validates the form and produces a normalized profile.
    ///
    /// Checks run in screen order and stop at the first failure so the
    /// kiosk can point at one field at a time. Optional fields (title,
    /// middle name, address line 2) become `None` when blank. Eligibility
    /// rules such as the minimum age are enforced by the backend on
    /// upsert, not here.
    pub fn validate(&self) -> Result<DonorProfile> {
        let first_name = self.first_name.trim();
        if first_name.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "First name is required".to_string(),
            )));
        }
        let last_name = self.last_name.trim();
        if last_name.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Last name is required".to_string(),
            )));
        }
        let dob = self.dob.trim();
        if NaiveDate::parse_from_str(dob, "%Y-%m-%d").is_err() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "DOB must be YYYY-MM-DD".to_string(),
            )));
        }
        let email = self.email.trim();
        if !EMAIL_REGEX.is_match(email) {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Valid email is required".to_string(),
            )));
        }
        let mobile_e164 = normalize_phone_e164(self.mobile.trim()).ok_or_else(|| {
            Error::Validation(ValidationError::InvalidInput(
                "Valid mobile phone (E.164) is required".to_string(),
            ))
        })?;
        let address1 = self.address1.trim();
        let city = self.city.trim();
        let region = self.region.trim();
        let postal_code = self.postal_code.trim();
        if address1.is_empty() || city.is_empty() || region.is_empty() || postal_code.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Full address is required".to_string(),
            )));
        }
        let country = self.country.trim();

        Ok(DonorProfile {
            title: blank_to_none(&self.title),
            first_name: first_name.to_string(),
            middle_name: blank_to_none(&self.middle_name),
            last_name: last_name.to_string(),
            dob_iso: dob.to_string(),
            mobile_e164,
            email: email.to_string(),
            address1: address1.to_string(),
            address2: blank_to_none(&self.address2),
            city: city.to_string(),
            region: region.to_string(),
            postal_code: postal_code.to_string(),
            country: if country.is_empty() {
                DEFAULT_COUNTRY.to_string()
            } else {
                country.to_string()
            },
        })
    }
}

/// A validated donor ready for upsert. All fields are trimmed and the
/// phone is normalized to E.164.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfile {
    pub title: Option<String>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub dob_iso: String,
    pub mobile_e164: String,
    pub email: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

impl DonorProfile {
    /// Display name assembled from the name parts, skipping blanks.
    pub fn full_name(&self) -> String {
        let mut parts = vec![self.first_name.as_str()];
        if let Some(middle) = self.middle_name.as_deref() {
            parts.push(middle);
        }
        parts.push(self.last_name.as_str());
        parts.join(" ")
    }

    /// One-line postal address for receipts and the session cache.
    pub fn address_line(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.address1, self.city, self.region, self.postal_code
        )
    }
}

fn blank_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
