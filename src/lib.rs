// Package detail and booking flow for the tour site

pub mod api;
pub mod config;
pub mod controller;
pub mod country;
pub mod form;
pub mod loader;
pub mod package;
pub mod page;
pub mod validation;

// Re-export key types for convenience
pub use crate::api::{ApiError, BookingReceipt, HttpTourApi, TourApi};
pub use crate::config::{ClientConfig, ClientError, PhoneShaping};
pub use crate::controller::{BookingFormController, SubmissionState, SubmitOutcome};
pub use crate::country::{country_codes, CountryCode};
pub use crate::form::{BookingField, BookingForm, BookingPayload, FormError};
pub use crate::loader::{LoadOutcome, LoadState, LoadToken, PackageDetailLoader};
pub use crate::package::{Package, PackageView, Section, SectionView};
pub use crate::page::{NotFoundView, PackageDetailPage, PageView};
pub use crate::validation::{validate, Clock, FixedClock, SystemClock, ValidationError};
