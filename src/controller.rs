// Booking form controller
//
// Owns the form, validates it and sends at most one booking at a time.
// Succeeded and Failed are one-shot: the outcome carries the notice and the
// controller is back to Idle by the time `submit` returns.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::api::TourApi;
use crate::config::PhoneShaping;
use crate::form::{BookingField, BookingForm, FormError};
use crate::loader::LoadToken;
use crate::package::Package;
use crate::validation::{validate, Clock, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed(String),
}

impl SubmissionState {
    pub fn submit_enabled(&self) -> bool {
        !matches!(self, SubmissionState::Validating | SubmissionState::Submitting)
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            SubmissionState::Submitting => "Submitting...",
            _ => "Submit Booking",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    // A submission was already in flight, or nothing is loaded yet
    Ignored,
    Rejected(ValidationError),
    Booked { booking_id: Option<String> },
    Failed { reason: String },
    // The page went away while the request was out
    Discarded,
}

impl SubmitOutcome {
    pub fn notice(&self) -> Option<String> {
        match self {
            SubmitOutcome::Rejected(err) => Some(err.to_string()),
            SubmitOutcome::Booked {
                booking_id: Some(booking_id),
            } => Some(format!(
                "Booking created successfully! Booking ID: {}",
                booking_id
            )),
            SubmitOutcome::Booked { booking_id: None } => {
                Some("Booking created successfully!".to_string())
            }
            SubmitOutcome::Failed { reason } => Some(format!("Error: {}", reason)),
            SubmitOutcome::Ignored | SubmitOutcome::Discarded => None,
        }
    }
}

struct ControllerInner {
    form: Option<BookingForm>,
    package_title: Option<String>,
    seeded_from: Option<LoadToken>,
    state: SubmissionState,
    // Bumped on detach so late responses can be recognised
    session: u64,
}

pub struct BookingFormController {
    api: Arc<dyn TourApi>,
    shaping: PhoneShaping,
    clock: Arc<dyn Clock>,
    inner: Mutex<ControllerInner>,
}

impl BookingFormController {
    pub fn new(api: Arc<dyn TourApi>, shaping: PhoneShaping, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            shaping,
            clock,
            inner: Mutex::new(ControllerInner {
                form: None,
                package_title: None,
                seeded_from: None,
                state: SubmissionState::Idle,
                session: 0,
            }),
        }
    }

    /// Seeds `destination` from a freshly loaded package. Applies once per
    /// load; repeated calls with the same token are no-ops and return false.
    pub fn seed(&self, token: LoadToken, package: &Package) -> bool {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if inner.seeded_from == Some(token) {
            return false;
        }

        match inner.form.as_mut() {
            Some(form) => form.set_destination(&package.title),
            None => inner.form = Some(BookingForm::seeded(package.title.as_str())),
        }
        inner.package_title = Some(package.title.clone());
        inner.seeded_from = Some(token);
        debug!(title = %package.title, "booking form seeded");
        true
    }

    // Navigation away: forget the form and ignore anything still in flight
    pub fn detach(&self) {
        let mut inner = self.inner.lock();
        inner.form = None;
        inner.package_title = None;
        inner.seeded_from = None;
        inner.state = SubmissionState::Idle;
        inner.session += 1;
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.lock().form.is_some()
    }

    pub fn form(&self) -> Option<BookingForm> {
        self.inner.lock().form.clone()
    }

    pub fn state(&self) -> SubmissionState {
        self.inner.lock().state.clone()
    }

    pub fn submit_enabled(&self) -> bool {
        let inner = self.inner.lock();
        inner.form.is_some() && inner.state.submit_enabled()
    }

    pub fn submit_label(&self) -> &'static str {
        self.inner.lock().state.submit_label()
    }

    pub fn edit(&self, field: BookingField, value: &str) -> Result<(), FormError> {
        let mut inner = self.inner.lock();
        let form = inner.form.as_mut().ok_or(FormError::NotInitialized)?;
        form.edit(field, value)
    }

    // Edit by input name, e.g. "checkin"
    pub fn edit_named(&self, name: &str, value: &str) -> Result<(), FormError> {
        self.edit(BookingField::from_name(name)?, value)
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let (payload, session) = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            if inner.state != SubmissionState::Idle {
                debug!(state = ?inner.state, "submit ignored while busy");
                return SubmitOutcome::Ignored;
            }
            let Some(form) = inner.form.as_ref() else {
                debug!("submit ignored before package load");
                return SubmitOutcome::Ignored;
            };

            inner.state = SubmissionState::Validating;
            let checked = validate(form, self.clock.today()).and_then(|_| form.to_payload(self.shaping));
            match checked {
                Ok(payload) => {
                    inner.state = SubmissionState::Submitting;
                    (payload, inner.session)
                }
                Err(err) => {
                    debug!(error = %err, "booking rejected by validation");
                    inner.state = SubmissionState::Idle;
                    return SubmitOutcome::Rejected(err);
                }
            }
        };

        let result = self.api.create_booking(&payload).await;

        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if inner.session != session {
            debug!("discarding booking response for a detached form");
            return SubmitOutcome::Discarded;
        }

        let outcome = match result {
            Ok(receipt) => {
                info!(booking_id = ?receipt.booking_id, destination = %payload.destination, "booking created");
                if let Some(title) = inner.package_title.as_deref() {
                    inner.form = Some(BookingForm::seeded(title));
                }
                inner.state = SubmissionState::Succeeded;
                SubmitOutcome::Booked {
                    booking_id: receipt.booking_id,
                }
            }
            Err(err) => {
                error!(error = %err, destination = %payload.destination, "booking failed");
                let reason = err.user_message();
                inner.state = SubmissionState::Failed(reason.clone());
                SubmitOutcome::Failed { reason }
            }
        };

        // Notice handed to the caller; back to a fresh cycle
        inner.state = SubmissionState::Idle;
        outcome
    }
}
