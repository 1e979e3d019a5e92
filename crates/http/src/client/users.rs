//! Account API client methods

use super::{ClientError, StayNestClient};
use staynest_core::types::{Booking, Guest, GuestRequest, ProfileUpdateRequest, UserProfile};

impl StayNestClient {
    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        let req = self.request(reqwest::Method::GET, "/users/profile");
        self.execute(req).await
    }

    /// Update the fields that are set in `request`
    pub async fn update_profile(&self, request: &ProfileUpdateRequest) -> Result<(), ClientError> {
        let req = self
            .request(reqwest::Method::PATCH, "/users/profile")
            .json(request);
        self.execute_empty(req).await
    }

    /// Bookings made by the current user
    pub async fn my_bookings(&self) -> Result<Vec<Booking>, ClientError> {
        let req = self.request(reqwest::Method::GET, "/users/myBookings");
        self.execute(req).await
    }

    /// Saved guests of the current user
    pub async fn guests(&self) -> Result<Vec<Guest>, ClientError> {
        let req = self.request(reqwest::Method::GET, "/users/guests");
        self.execute(req).await
    }

    pub async fn add_guest(&self, request: &GuestRequest) -> Result<Guest, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/users/guests")
            .json(request);
        self.execute(req).await
    }

    pub async fn update_guest(
        &self,
        guest_id: u64,
        request: &GuestRequest,
    ) -> Result<(), ClientError> {
        let req = self
            .request(reqwest::Method::PUT, &format!("/users/guests/{guest_id}"))
            .json(request);
        self.execute_empty(req).await
    }

    pub async fn delete_guest(&self, guest_id: u64) -> Result<(), ClientError> {
        let req = self.request(reqwest::Method::DELETE, &format!("/users/guests/{guest_id}"));
        self.execute_empty(req).await
    }
}
