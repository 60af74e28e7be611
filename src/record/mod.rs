//! Building records: detail fetching and normalization
//!
//! One building ref resolves to one raw JSON payload and then to one
//! [`BuildingRecord`]. A failure anywhere along that path is isolated to the
//! single building; the caller logs it and moves on to the next sibling.

mod normalize;

pub use normalize::normalize;

use crate::catalog::{BuildingRef, Catalog, Region};
use crate::transport::{RawPayload, Transport};
use crate::{TransportError, TransportResult};

/// The canonical flat output entity, one CSV row per record
///
/// Every optional field degrades to an empty string rather than failing the
/// whole record; partial data is acceptable, a missing record is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingRecord {
    pub id: String,
    pub region: String,
    /// Populated place, derived from the region label
    pub place: String,
    pub street: String,
    /// House number, with the block suffix as `number/block` when present
    pub house_number: String,
    pub wall_material: String,
    pub floor_min: String,
    pub floor_max: String,
    pub living_area: String,
    pub phase: String,
    pub completion_planned: String,
    pub commissioning_planned: String,
    pub collected_on: String,
}

impl BuildingRecord {
    /// The record's fields in on-disk column order
    pub fn fields(&self) -> [&str; 13] {
        [
            &self.id,
            &self.region,
            &self.place,
            &self.street,
            &self.house_number,
            &self.wall_material,
            &self.floor_min,
            &self.floor_max,
            &self.living_area,
            &self.phase,
            &self.completion_planned,
            &self.commissioning_planned,
            &self.collected_on,
        ]
    }
}

/// Resolves one building ref into its raw detail payload
///
/// Unlike the listing calls, a non-2xx status here is a hard error: the
/// building is skipped and the error surfaces at the call site.
pub async fn fetch_building(
    catalog: &Catalog<'_>,
    transport: &Transport,
    region: &Region,
    building: &BuildingRef,
    use_proxy: bool,
) -> TransportResult<RawPayload> {
    let url = catalog.building_detail_url(region, building)?;
    let payload = transport.fetch(&url, use_proxy).await?;

    if !payload.is_success() {
        return Err(TransportError::Status {
            url: url.to_string(),
            status: payload.status,
        });
    }

    Ok(payload)
}
