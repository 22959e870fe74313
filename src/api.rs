// Backend API client
// Two calls: read one package, create one booking. No retries at this layer.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ClientConfig, ClientError};
use crate::form::BookingPayload;
use crate::package::Package;

pub const FALLBACK_BOOKING_ERROR: &str = "Failed to create booking. Please try again.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Resource not found")]
    NotFound,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {status_code} - {}", .message.as_deref().unwrap_or("no message"))]
    ApiResponseError {
        status_code: u16,
        message: Option<String>,
    },

    #[error("Malformed response: {0}")]
    DecodeError(String),
}

impl ApiError {
    // Reason shown to the user when a booking is refused
    pub fn user_message(&self) -> String {
        match self {
            ApiError::ApiResponseError {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => FALLBACK_BOOKING_ERROR.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::DecodeError(err.to_string())
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingReceipt {
    // None when the backend accepted the booking but sent no usable id
    pub booking_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[async_trait]
pub trait TourApi: Send + Sync + 'static {
    // GET {base}/packages/{id}
    async fn fetch_package(&self, id: &str) -> Result<Package, ApiError>;

    // POST {base}/bookings
    async fn create_booking(&self, payload: &BookingPayload) -> Result<BookingReceipt, ApiError>;
}

pub struct HttpTourApi {
    config: ClientConfig,
    http: reqwest::Client,
}

impl HttpTourApi {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl TourApi for HttpTourApi {
    async fn fetch_package(&self, id: &str) -> Result<Package, ApiError> {
        let url = self.config.endpoint(&format!("packages/{}", id));
        debug!(%url, "fetching package");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(ApiError::ApiResponseError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let mut package: Package =
            serde_json::from_str(&body).map_err(|e| ApiError::DecodeError(e.to_string()))?;
        if package.id.is_empty() {
            package.id = id.to_string();
        }
        Ok(package)
    }

    async fn create_booking(&self, payload: &BookingPayload) -> Result<BookingReceipt, ApiError> {
        let url = self.config.endpoint("bookings");
        debug!(%url, destination = %payload.destination, "posting booking");

        let response = self.http.post(&url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(ApiError::ApiResponseError {
                status_code: status.as_u16(),
                message,
            });
        }

        // Any 2xx means the reservation exists; never turn it into a failure
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "could not read booking receipt body");
                String::new()
            }
        };
        Ok(parse_receipt(&body))
    }
}

fn parse_receipt(body: &str) -> BookingReceipt {
    let booking_id = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("bookingID")? {
            serde_json::Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
            serde_json::Value::Number(id) => Some(id.to_string()),
            _ => None,
        });
    if booking_id.is_none() {
        warn!(body_len = body.len(), "booking accepted without a readable bookingID");
    }
    BookingReceipt { booking_id }
}

// `{ "error": "..." }` when the backend bothers to say why
async fn error_message(response: reqwest::Response) -> Option<String> {
    let body = response.text().await.ok()?;
    serde_json::from_str::<ErrorBody>(&body).ok()?.error
}

// In-memory backend for tests
#[cfg(test)]
pub mod mock_backend {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::{Mutex, Notify, Semaphore};

    pub struct MockBackend {
        packages: Mutex<HashMap<String, Package>>,
        package_failures: Mutex<HashMap<String, ApiError>>,
        package_gates: Mutex<HashMap<String, std::sync::Arc<Semaphore>>>,
        booking_failures: Mutex<Vec<ApiError>>,
        bookings: Mutex<Vec<BookingPayload>>,
        hold_bookings: AtomicBool,
        booking_gate: Semaphore,
        pub booking_entered: Notify,
        package_request_count: AtomicUsize,
        booking_request_count: AtomicUsize,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self {
                packages: Mutex::new(HashMap::new()),
                package_failures: Mutex::new(HashMap::new()),
                package_gates: Mutex::new(HashMap::new()),
                booking_failures: Mutex::new(Vec::new()),
                bookings: Mutex::new(Vec::new()),
                hold_bookings: AtomicBool::new(false),
                booking_gate: Semaphore::new(0),
                booking_entered: Notify::new(),
                package_request_count: AtomicUsize::new(0),
                booking_request_count: AtomicUsize::new(0),
            }
        }

        pub async fn add_package(&self, id: &str, package: Package) {
            self.packages.lock().await.insert(id.to_string(), package);
        }

        pub async fn fail_package(&self, id: &str, error: ApiError) {
            self.package_failures.lock().await.insert(id.to_string(), error);
        }

        // Requests for `id` wait until `release_package(id)`
        pub async fn hold_package(&self, id: &str) {
            self.package_gates
                .lock()
                .await
                .insert(id.to_string(), std::sync::Arc::new(Semaphore::new(0)));
        }

        pub async fn release_package(&self, id: &str) {
            if let Some(gate) = self.package_gates.lock().await.get(id) {
                gate.add_permits(1);
            }
        }

        pub async fn fail_next_booking(&self, error: ApiError) {
            self.booking_failures.lock().await.push(error);
        }

        pub fn hold_bookings(&self) {
            self.hold_bookings.store(true, Ordering::SeqCst);
        }

        pub fn release_booking(&self) {
            self.booking_gate.add_permits(1);
        }

        pub fn package_requests(&self) -> usize {
            self.package_request_count.load(Ordering::SeqCst)
        }

        pub fn booking_requests(&self) -> usize {
            self.booking_request_count.load(Ordering::SeqCst)
        }

        pub async fn received_bookings(&self) -> Vec<BookingPayload> {
            self.bookings.lock().await.clone()
        }
    }

    #[async_trait]
    impl TourApi for MockBackend {
        async fn fetch_package(&self, id: &str) -> Result<Package, ApiError> {
            self.package_request_count.fetch_add(1, Ordering::SeqCst);

            let gate = self.package_gates.lock().await.get(id).cloned();
            if let Some(gate) = gate {
                gate.acquire()
                    .await
                    .map_err(|e| ApiError::NetworkError(e.to_string()))?
                    .forget();
            }

            if let Some(error) = self.package_failures.lock().await.get(id) {
                return Err(error.clone());
            }

            match self.packages.lock().await.get(id) {
                Some(package) => {
                    let mut package = package.clone();
                    package.id = id.to_string();
                    Ok(package)
                }
                None => Err(ApiError::NotFound),
            }
        }

        async fn create_booking(
            &self,
            payload: &BookingPayload,
        ) -> Result<BookingReceipt, ApiError> {
            self.booking_request_count.fetch_add(1, Ordering::SeqCst);
            self.bookings.lock().await.push(payload.clone());

            if self.hold_bookings.load(Ordering::SeqCst) {
                self.booking_entered.notify_one();
                self.booking_gate
                    .acquire()
                    .await
                    .map_err(|e| ApiError::NetworkError(e.to_string()))?
                    .forget();
            }

            let mut failures = self.booking_failures.lock().await;
            if !failures.is_empty() {
                return Err(failures.remove(0));
            }

            Ok(BookingReceipt {
                booking_id: Some(format!("booking-{}", rand::random::<u32>())),
            })
        }
    }

    pub fn package(title: &str) -> Package {
        Package {
            id: String::new(),
            title: title.to_string(),
            description: format!("{} description", title),
            price: 199.0,
            image: "/uploads/hero.jpg".to_string(),
            detailed_title: None,
            detailed_intro: None,
            pro_tip: None,
            sections: vec![],
        }
    }
}
