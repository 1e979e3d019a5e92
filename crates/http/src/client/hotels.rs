//! Hotel browsing API client methods

use super::{ClientError, StayNestClient};
use staynest_core::types::{HotelInfo, HotelInfoRequest, HotelSearchRequest, HotelSearchResult, Page};

impl StayNestClient {
    /// Search hotels with availability for the whole stay
    pub async fn search_hotels(
        &self,
        request: &HotelSearchRequest,
    ) -> Result<Page<HotelSearchResult>, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/hotels/search")
            .json(request);
        self.execute(req).await
    }

    /// Hotel details with the price of each room type for the stay
    pub async fn hotel_info(
        &self,
        hotel_id: u64,
        request: &HotelInfoRequest,
    ) -> Result<HotelInfo, ClientError> {
        let req = self
            .request(reqwest::Method::POST, &format!("/hotels/{hotel_id}/info"))
            .json(request);
        self.execute(req).await
    }
}
