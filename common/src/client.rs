//! Typed marketplace client over any [`Transport`].
//!
//! Read endpoints fail with [`ApiError::Http`] on a non-2xx status and
//! [`ApiError::Decode`] on a malformed body. Mutating endpoints answer with
//! an [`ActionResponse`]; `success: false` becomes [`ApiError::Rejected`]
//! whatever the status code, so callers can tell "the server said no" apart
//! from "the request failed".

use serde::de::DeserializeOwned;

use crate::api::{ActionResponse, ApiError, ApiRequest, RawResponse, Transport};
use crate::crop::{Crop, CropDetails, CropFilters, CropForm, CropId, CropList, FarmerContact};
use crate::dashboard::DashboardData;
use crate::endpoints;
use crate::market::{LocationList, MarketPrice, PriceList, PriceQuery};
use crate::message::{Conversation, ConversationList, Message, MessageThread, OutgoingMessage};
use crate::order::{Order, OrderForm, OrderId, OrderList, OrderStatus, PlacedOrder};
use crate::payment::{PaymentReceipt, PaymentRequest};
use crate::user::UserId;

#[derive(Debug, Clone)]
pub struct MarketClient<T> {
    transport: T,
}

impl<T: Transport> MarketClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let label = format!("{} {}", request.method, request.path_and_query());
        tracing::debug!("-> {label}");
        match self.transport.send(request).await {
            Ok(resp) => {
                tracing::debug!("<- {label}: {}", resp.status);
                Ok(resp)
            }
            Err(e) => {
                tracing::warn!("{label} failed: {e}");
                Err(e)
            }
        }
    }

    async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        self.send(request).await?.ensure_ok()?.json()
    }

    async fn act<P: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<ActionResponse<P>, ApiError> {
        let resp = self.send(request).await?;
        match resp.json::<ActionResponse<P>>() {
            Ok(action) if !action.success => {
                tracing::info!(
                    "Server rejected request: {}",
                    action.message.as_deref().unwrap_or("(no message)")
                );
                Err(ApiError::Rejected {
                    message: action.message,
                })
            }
            Ok(action) => {
                resp.ensure_ok()?;
                Ok(action)
            }
            Err(e) => {
                let resp = resp.ensure_ok()?;
                tracing::warn!("Unreadable action response ({} bytes): {e}", resp.body.len());
                Err(e)
            }
        }
    }

    /// Submit a request built from a marked form.
    pub async fn submit(&self, request: ApiRequest) -> Result<ActionResponse, ApiError> {
        self.act(request).await
    }

    /// HTML of a server-rendered page.
    pub async fn fetch_page(&self, path: &str) -> Result<String, ApiError> {
        Ok(self.send(endpoints::page(path)).await?.ensure_ok()?.body)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<ActionResponse, ApiError> {
        self.act(endpoints::login(username, password)).await
    }

    pub async fn list_crops(&self, filters: &CropFilters) -> Result<Vec<Crop>, ApiError> {
        let list: CropList = self.fetch(endpoints::list_crops(filters)).await?;
        Ok(list.crops)
    }

    /// Listings owned by `farmer`; all listings when the farmer is unknown.
    pub async fn own_crops(&self, farmer: Option<UserId>) -> Result<Vec<Crop>, ApiError> {
        let crops = self.list_crops(&CropFilters::default()).await?;
        Ok(own_only(crops, farmer))
    }

    pub async fn crop_details(&self, id: CropId) -> Result<CropDetails, ApiError> {
        self.fetch(endpoints::crop_details(id)).await
    }

    pub async fn contact_farmer(&self, id: CropId) -> Result<FarmerContact, ApiError> {
        self.fetch(endpoints::contact_farmer(id)).await
    }

    pub async fn add_crop(&self, form: &CropForm) -> Result<ActionResponse, ApiError> {
        self.act(endpoints::add_crop(form)).await
    }

    pub async fn delete_crop(&self, id: CropId) -> Result<ActionResponse, ApiError> {
        self.act(endpoints::delete_crop(id)).await
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let list: OrderList = self.fetch(endpoints::list_orders()).await?;
        Ok(list.orders)
    }

    pub async fn place_order(
        &self,
        form: &OrderForm,
    ) -> Result<ActionResponse<PlacedOrder>, ApiError> {
        self.act(endpoints::place_order(form)).await
    }

    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<ActionResponse, ApiError> {
        self.act(endpoints::update_order_status(id, status)).await
    }

    pub async fn initiate_payment(
        &self,
        payment: &PaymentRequest,
    ) -> Result<ActionResponse<PaymentReceipt>, ApiError> {
        self.act(endpoints::initiate_payment(payment)).await
    }

    pub async fn locations(&self) -> Result<Vec<String>, ApiError> {
        let list: LocationList = self.fetch(endpoints::locations()).await?;
        Ok(list.counties)
    }

    pub async fn market_prices(&self, query: &PriceQuery) -> Result<Vec<MarketPrice>, ApiError> {
        let list: PriceList = self.fetch(endpoints::market_prices(query)).await?;
        Ok(list.prices)
    }

    pub async fn conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let list: ConversationList = self.fetch(endpoints::conversations()).await?;
        Ok(list.conversations)
    }

    pub async fn thread(&self, partner: UserId) -> Result<Vec<Message>, ApiError> {
        let thread: MessageThread = self.fetch(endpoints::thread(partner)).await?;
        Ok(thread.messages)
    }

    pub async fn send_message(
        &self,
        message: &OutgoingMessage,
    ) -> Result<ActionResponse, ApiError> {
        self.act(endpoints::send_message(message)).await
    }

    /// Crops and orders fetched concurrently. A failure of either discards
    /// both.
    pub async fn load_dashboard(&self, filters: &CropFilters) -> Result<DashboardData, ApiError> {
        let (crops, orders) = futures::join!(self.list_crops(filters), self.list_orders());
        Ok(DashboardData {
            crops: crops?,
            orders: orders?,
        })
    }

    /// Farmer variant of [`Self::load_dashboard`]: unfiltered, narrowed to
    /// the farmer's own listings.
    pub async fn load_farmer_dashboard(
        &self,
        farmer: Option<UserId>,
    ) -> Result<DashboardData, ApiError> {
        let mut data = self.load_dashboard(&CropFilters::default()).await?;
        data.crops = own_only(data.crops, farmer);
        Ok(data)
    }
}

fn own_only(crops: Vec<Crop>, farmer: Option<UserId>) -> Vec<Crop> {
    match farmer {
        Some(id) => crops.into_iter().filter(|c| c.farmer_id == id).collect(),
        None => crops,
    }
}
