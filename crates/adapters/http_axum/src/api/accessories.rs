//! JSON REST handlers for accessories.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use thermohub_app::ports::{AccessoryRepository, CharacteristicStore, HistorySink};
use thermohub_domain::accessory::LogicalAccessory;
use thermohub_domain::address::MacAddress;
use thermohub_domain::channel::{ChannelState, SensorStatus, ServiceType};
use thermohub_domain::characteristic::Characteristic;
use thermohub_domain::id::AccessoryId;
use thermohub_domain::sensor::SensorVariant;
use thermohub_domain::time::Timestamp;

use crate::error::ApiError;
use crate::state::AppState;

/// An accessory as seen by the host: identity, information and channels.
#[derive(Debug, Serialize)]
pub struct AccessoryView {
    pub id: AccessoryId,
    pub display_name: String,
    pub address: MacAddress,
    pub created_at: Timestamp,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    /// Worst status across all channels.
    pub status: SensorStatus,
    pub channels: Vec<ChannelState>,
}

impl AccessoryView {
    fn build(
        accessory: LogicalAccessory,
        characteristics: &[(ServiceType, Characteristic)],
        variant: SensorVariant,
    ) -> Self {
        let on = |service: ServiceType| {
            characteristics
                .iter()
                .filter(move |(st, _)| *st == service)
                .map(|(_, c)| c)
        };

        let mut manufacturer = None;
        let mut model = None;
        let mut serial_number = None;
        for characteristic in on(ServiceType::AccessoryInformation) {
            match characteristic {
                Characteristic::Manufacturer(v) => manufacturer = Some(v.clone()),
                Characteristic::Model(v) => model = Some(v.clone()),
                Characteristic::SerialNumber(v) => serial_number = Some(v.clone()),
                _ => {}
            }
        }

        let channels: Vec<ChannelState> = variant
            .channels()
            .iter()
            .map(|kind| ChannelState::from_characteristics(*kind, on(kind.service_type())))
            .collect();

        Self {
            id: accessory.id,
            display_name: accessory.display_name,
            address: accessory.context.address,
            created_at: accessory.created_at,
            manufacturer,
            model,
            serial_number,
            status: overall_status(&channels),
            channels,
        }
    }
}

fn overall_status(channels: &[ChannelState]) -> SensorStatus {
    let statuses: Vec<SensorStatus> = channels.iter().map(ChannelState::status).collect();
    if statuses.contains(&SensorStatus::Fault) {
        SensorStatus::Fault
    } else if statuses.contains(&SensorStatus::LowBattery) {
        SensorStatus::LowBattery
    } else {
        SensorStatus::Normal
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<AccessoryView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<AccessoryView>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/accessories`
pub async fn list<R, C, H>(
    State(state): State<AppState<R, C, H>>,
) -> Result<ListResponse, ApiError>
where
    R: AccessoryRepository + 'static,
    C: CharacteristicStore + 'static,
    H: HistorySink + 'static,
{
    let accessories = state.accessories.load_all().await?;
    let mut views = Vec::with_capacity(accessories.len());
    for accessory in accessories {
        let characteristics = state.characteristics.characteristics(accessory.id).await?;
        views.push(AccessoryView::build(accessory, &characteristics, state.variant));
    }
    Ok(ListResponse::Ok(Json(views)))
}

/// `GET /api/accessories/{id}`
pub async fn get<R, C, H>(
    State(state): State<AppState<R, C, H>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: AccessoryRepository + 'static,
    C: CharacteristicStore + 'static,
    H: HistorySink + 'static,
{
    let accessory = super::find_accessory(state.accessories.as_ref(), &id).await?;
    let characteristics = state.characteristics.characteristics(accessory.id).await?;
    Ok(GetResponse::Ok(Json(AccessoryView::build(
        accessory,
        &characteristics,
        state.variant,
    ))))
}
