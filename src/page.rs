// Package detail page: loads one package and hosts its booking form
use std::sync::Arc;

use crate::api::{HttpTourApi, TourApi};
use crate::config::{ClientConfig, ClientError};
use crate::controller::{BookingFormController, SubmitOutcome};
use crate::loader::{LoadState, PackageDetailLoader};
use crate::package::PackageView;
use crate::validation::{Clock, SystemClock};

pub const LISTING_ROUTE: &str = "/packages";
pub const CONTACT_ROUTE: &str = "/contact";

#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Loading,
    NotFound(NotFoundView),
    Ready(PackageView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundView {
    pub title: &'static str,
    pub message: &'static str,
    pub action_label: &'static str,
    pub action_route: &'static str,
}

impl Default for NotFoundView {
    fn default() -> Self {
        Self {
            title: "Package Not Found",
            message: "The package you're looking for doesn't exist or has been removed.",
            action_label: "Back to Packages",
            action_route: LISTING_ROUTE,
        }
    }
}

pub struct PackageDetailPage {
    base_url: String,
    loader: PackageDetailLoader,
    controller: BookingFormController,
}

impl PackageDetailPage {
    pub fn new(api: Arc<dyn TourApi>, config: &ClientConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            base_url: config.base_url.clone(),
            loader: PackageDetailLoader::new(api.clone()),
            controller: BookingFormController::new(api, config.phone_shaping, clock),
        }
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let api = Arc::new(HttpTourApi::new(config.clone())?);
        Ok(Self::new(api, &config, Arc::new(SystemClock)))
    }

    // Mount or identifier change: the old form goes, the new package seeds a fresh one
    pub async fn mount(&self, package_id: &str) -> PageView {
        // Stop the previous load from seeding before the form is dropped
        self.loader.invalidate();
        self.controller.detach();
        let controller = &self.controller;
        self.loader
            .load(package_id, |token, package| {
                controller.seed(token, package);
            })
            .await;
        self.view()
    }

    pub fn view(&self) -> PageView {
        match self.loader.state() {
            LoadState::Idle | LoadState::Loading { .. } => PageView::Loading,
            LoadState::Done(outcome) => match outcome.package() {
                Some(package) => PageView::Ready(PackageView::build(package, &self.base_url)),
                None => PageView::NotFound(NotFoundView::default()),
            },
        }
    }

    pub fn controller(&self) -> &BookingFormController {
        &self.controller
    }

    pub async fn submit(&self) -> SubmitOutcome {
        self.controller.submit().await
    }

    pub fn unmount(&self) {
        self.loader.invalidate();
        self.controller.detach();
    }

    // Leaving for the listing never re-fetches this package
    pub fn navigate_to_listing(&self) -> &'static str {
        self.unmount();
        LISTING_ROUTE
    }

    pub fn navigate_to_contact(&self) -> &'static str {
        self.unmount();
        CONTACT_ROUTE
    }
}
