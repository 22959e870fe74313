// Client-side checks run before any booking leaves the browser
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::country;
use crate::form::BookingForm;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{7,15}$").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

// Display text is what the user sees in the notice
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingRequiredFields,

    #[error("Check-out date must be after check-in date")]
    CheckOutNotAfterCheckIn,

    #[error("{field} date cannot be in the past")]
    DateInPast { field: &'static str },

    #[error("Please enter a valid phone number (7-15 digits)")]
    InvalidPhone,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Unsupported country code: {0}")]
    UnknownCountryCode(String),

    #[error("At least one adult is required")]
    NoAdults,
}

pub trait Clock: Send + Sync + 'static {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn validate(form: &BookingForm, today: NaiveDate) -> Result<(), ValidationError> {
    let (check_in, check_out) = required_dates(form)?;

    if check_out <= check_in {
        return Err(ValidationError::CheckOutNotAfterCheckIn);
    }
    if check_in < today {
        return Err(ValidationError::DateInPast { field: "Check-in" });
    }
    // check_out > check_in >= today, so only check-in can be stale

    if !PHONE_RE.is_match(&form.phone) {
        return Err(ValidationError::InvalidPhone);
    }
    if !EMAIL_RE.is_match(form.email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    if !country::is_known(&form.country_code) {
        return Err(ValidationError::UnknownCountryCode(form.country_code.clone()));
    }
    if form.adults < 1 {
        return Err(ValidationError::NoAdults);
    }

    Ok(())
}

fn required_dates(form: &BookingForm) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    let blank = |value: &str| value.trim().is_empty();
    if blank(&form.name) || blank(&form.phone) || blank(&form.email) {
        return Err(ValidationError::MissingRequiredFields);
    }
    match (form.check_in, form.check_out) {
        (Some(check_in), Some(check_out)) => Ok((check_in, check_out)),
        _ => Err(ValidationError::MissingRequiredFields),
    }
}
