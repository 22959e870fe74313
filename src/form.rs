// Booking form state owned by the client
//
// Fields are edited one at a time from raw input strings, the way a browser
// form hands them over. Destination is the one field users cannot touch: it
// mirrors the loaded package's title.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PhoneShaping;
use crate::country::{self, DEFAULT_COUNTRY_CODE};
use crate::validation::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Booking form is not ready until the package has loaded")]
    NotInitialized,

    #[error("Field '{0}' is read-only")]
    ReadOnlyField(&'static str),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Unknown form field: {0}")]
    UnknownField(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingField {
    Name,
    CountryCode,
    Phone,
    Email,
    Address,
    CheckIn,
    CheckOut,
    Destination,
    Price,
    Adults,
    Children,
    Request,
}

impl BookingField {
    pub const ALL: [BookingField; 12] = [
        BookingField::Name,
        BookingField::CountryCode,
        BookingField::Phone,
        BookingField::Email,
        BookingField::Address,
        BookingField::CheckIn,
        BookingField::CheckOut,
        BookingField::Destination,
        BookingField::Price,
        BookingField::Adults,
        BookingField::Children,
        BookingField::Request,
    ];

    // Input names, identical to the wire field names
    pub fn name(&self) -> &'static str {
        match self {
            BookingField::Name => "name",
            BookingField::CountryCode => "countryCode",
            BookingField::Phone => "phone",
            BookingField::Email => "email",
            BookingField::Address => "address",
            BookingField::CheckIn => "checkin",
            BookingField::CheckOut => "checkout",
            BookingField::Destination => "destination",
            BookingField::Price => "price",
            BookingField::Adults => "adults",
            BookingField::Children => "children",
            BookingField::Request => "request",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, FormError> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingForm {
    pub name: String,
    pub country_code: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    destination: String,
    pub price: String,
    pub adults: u32,
    pub children: u32,
    pub request: String,
}

impl BookingForm {
    pub fn seeded(destination: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            check_in: None,
            check_out: None,
            destination: destination.into(),
            price: String::new(),
            adults: 1,
            children: 0,
            request: String::new(),
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    // Only the controller re-seeds, and only from a loaded package
    pub(crate) fn set_destination(&mut self, destination: &str) {
        self.destination = destination.to_string();
    }

    pub fn edit(&mut self, field: BookingField, value: &str) -> Result<(), FormError> {
        match field {
            BookingField::Name => self.name = value.to_string(),
            BookingField::CountryCode => {
                if !country::is_known(value) {
                    return Err(FormError::InvalidValue {
                        field: field.name(),
                        reason: format!("unsupported dialing code '{}'", value),
                    });
                }
                self.country_code = value.to_string();
            }
            BookingField::Phone => self.phone = value.to_string(),
            BookingField::Email => self.email = value.to_string(),
            BookingField::Address => self.address = value.to_string(),
            BookingField::CheckIn => self.check_in = parse_date(field, value)?,
            BookingField::CheckOut => self.check_out = parse_date(field, value)?,
            BookingField::Destination => return Err(FormError::ReadOnlyField(field.name())),
            BookingField::Price => self.price = value.to_string(),
            BookingField::Adults => self.adults = parse_count(field, value)?,
            BookingField::Children => self.children = parse_count(field, value)?,
            BookingField::Request => self.request = value.to_string(),
        }
        Ok(())
    }

    pub fn check_in_min(today: NaiveDate) -> NaiveDate {
        today
    }

    pub fn check_out_min(&self, today: NaiveDate) -> NaiveDate {
        self.check_in.unwrap_or(today)
    }

    pub fn to_payload(&self, shaping: PhoneShaping) -> Result<BookingPayload, ValidationError> {
        let (check_in, check_out) = match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => (check_in, check_out),
            _ => return Err(ValidationError::MissingRequiredFields),
        };

        let (country_code, phone) = match shaping {
            PhoneShaping::Separate => (Some(self.country_code.clone()), self.phone.clone()),
            PhoneShaping::Combined => (None, format!("{}{}", self.country_code, self.phone)),
        };

        Ok(BookingPayload {
            name: self.name.clone(),
            country_code,
            phone,
            email: self.email.clone(),
            address: self.address.clone(),
            check_in,
            check_out,
            destination: self.destination.clone(),
            price: self.price.clone(),
            adults: self.adults,
            children: self.children,
            request: self.request.clone(),
        })
    }
}

fn parse_date(field: BookingField, value: &str) -> Result<Option<NaiveDate>, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|e| FormError::InvalidValue {
            field: field.name(),
            reason: format!("expected YYYY-MM-DD: {}", e),
        })
}

fn parse_count(field: BookingField, value: &str) -> Result<u32, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value.parse::<u32>().map_err(|_| FormError::InvalidValue {
        field: field.name(),
        reason: format!("'{}' is not a non-negative whole number", value),
    })
}

// Body of POST /bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: String,
    #[serde(rename = "checkin")]
    pub check_in: NaiveDate,
    #[serde(rename = "checkout")]
    pub check_out: NaiveDate,
    pub destination: String,
    pub price: String,
    pub adults: u32,
    pub children: u32,
    pub request: String,
}
