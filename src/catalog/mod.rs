//! Catalog enumerator for the region → complex → building hierarchy
//!
//! Each listing operation is one network round-trip against the registry REST
//! API. Non-2xx listing responses are logged and enumeration continues with
//! whatever body came back; a failed building listing skips only its complex.

use crate::transport::Transport;
use crate::{TransportError, TransportResult};
use serde_json::Value;
use url::Url;

const DICTIONARY_PATH: &str = "erz-rest/api/v1/filtered/dictionary";
const COMPLEX_TABLE_PATH: &str = "erz-rest/api/v1/gk/table";
const COMPLEX_TABS_PATH: &str = "erz-rest/api/v1/gk/tabs";
const BUILDING_INFO_PATH: &str = "erz-rest/api/v1/buildinfo";

// Fixed cost/sort filters the remote expects on every hierarchy query
const COST_TYPE: &str = "1";
const COMPLEX_SORT: &str = "cmxrating";
const BUILDING_SORT: &str = "qrooms";

/// A geographic region from the registry dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Opaque dictionary key; the remote requires it together with the title
    pub key: String,
    /// Human-readable label, e.g. "50 Московская область"
    pub title: String,
}

/// Identifier of a building complex within a region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexId(pub String);

/// Lightweight building identifier returned when listing a complex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingRef {
    pub id: String,
}

/// Walks the three-level catalog hierarchy lazily
pub struct Catalog<'a> {
    transport: &'a Transport,
    base: Url,
    complex_page_bound: u32,
}

impl<'a> Catalog<'a> {
    pub fn new(transport: &'a Transport, base: Url, complex_page_bound: u32) -> Self {
        Self {
            transport,
            base,
            complex_page_bound,
        }
    }

    /// Fetches the full region dictionary
    ///
    /// The first dictionary entry is a nationwide placeholder, not a region;
    /// it is dropped by position.
    pub async fn list_regions(&self) -> TransportResult<Vec<Region>> {
        let mut url = self.join(DICTIONARY_PATH)?;
        url.query_pairs_mut()
            .append_pair("dictionaryType", "buildings_regions");

        let payload = self.transport.fetch(&url, false).await?;
        if !payload.is_success() {
            tracing::warn!("{} [status code {}]", url, payload.status);
        }

        Ok(parse_regions(&payload.body))
    }

    /// Lists the complexes in one region, one request per region
    ///
    /// The page bound is far larger than any realistic result count, so the
    /// remote never paginates.
    pub async fn list_complexes(&self, region: &Region) -> TransportResult<Vec<ComplexId>> {
        let mut url = self.join(COMPLEX_TABLE_PATH)?;
        url.query_pairs_mut()
            .append_pair("region", &region.title)
            .append_pair("regionKey", &region.key)
            .append_pair("costType", COST_TYPE)
            .append_pair("sortType", COMPLEX_SORT)
            .append_pair("min", "1")
            .append_pair("max", &self.complex_page_bound.to_string());

        let payload = self.transport.fetch(&url, false).await?;
        if !payload.is_success() {
            tracing::warn!("{} [status code {}]", url, payload.status);
        }

        Ok(parse_complexes(&payload.body))
    }

    /// Lists the building refs in one complex, one request per complex
    pub async fn list_building_refs(
        &self,
        region: &Region,
        complex: &ComplexId,
    ) -> TransportResult<Vec<BuildingRef>> {
        let mut url = self.join(COMPLEX_TABS_PATH)?;
        url.query_pairs_mut()
            .append_pair("gkId", &complex.0)
            .append_pair("region", &region.title)
            .append_pair("regionKey", &region.key)
            .append_pair("costType", COST_TYPE)
            .append_pair("sortType", BUILDING_SORT);

        let payload = self.transport.fetch(&url, false).await?;
        if !payload.is_success() {
            tracing::warn!("{} [status code {}]", url, payload.status);
        }

        Ok(parse_building_refs(&payload.body))
    }

    /// Builds the detail endpoint URL for one building
    pub fn building_detail_url(
        &self,
        region: &Region,
        building: &BuildingRef,
    ) -> TransportResult<Url> {
        let mut url = self.join(&format!("{}/{}", BUILDING_INFO_PATH, building.id))?;
        url.query_pairs_mut()
            .append_pair("regionKey", &region.key)
            .append_pair("costType", COST_TYPE)
            .append_pair("sortType", BUILDING_SORT);
        Ok(url)
    }

    fn join(&self, path: &str) -> TransportResult<Url> {
        self.base.join(path).map_err(|e| TransportError::MalformedBody {
            url: format!("{}{}", self.base, path),
            message: e.to_string(),
        })
    }
}

/// Parses the region dictionary body, discarding the leading placeholder
fn parse_regions(body: &Value) -> Vec<Region> {
    let Some(entries) = body.as_array() else {
        tracing::warn!("Region dictionary body is not an array");
        return Vec::new();
    };

    // entries[0] is the placeholder, dropped by position
    entries
        .iter()
        .skip(1)
        .filter_map(|entry| {
            let key = field_string(entry, "id")?;
            let title = field_string(entry, "text")?;
            Some(Region { key, title })
        })
        .collect()
}

/// Parses the complex table body: `{"list": [{"gkId": ...}, ...]}`
fn parse_complexes(body: &Value) -> Vec<ComplexId> {
    let Some(entries) = body.get("list").and_then(Value::as_array) else {
        tracing::warn!("Complex table body has no 'list' array");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| field_string(entry, "gkId").map(ComplexId))
        .collect()
}

/// Parses the complex tabs body: a JSON array of `{"id": ...}` entries
fn parse_building_refs(body: &Value) -> Vec<BuildingRef> {
    let Some(entries) = body.as_array() else {
        tracing::warn!("Building listing body is not an array");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| field_string(entry, "id").map(|id| BuildingRef { id }))
        .collect()
}

/// Reads a field as a string, accepting both JSON strings and numbers
fn field_string(entry: &Value, key: &str) -> Option<String> {
    match entry.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
