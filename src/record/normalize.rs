//! Raw payload → [`BuildingRecord`] normalization
//!
//! Fallback precedence for every field is an explicit ordered rule chain with
//! a defined default, rather than nested exception handling. Only the
//! mandatory identifier/region/material/floor fields can fail a record.

use crate::record::BuildingRecord;
use crate::NormalizeError;
use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// House number: the digits immediately following a " д. " marker
static HOUSE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" д\. (\d+)").expect("invalid house number regex"));

/// Block ("corpus") suffix: everything after a "корп. " marker
static BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"корп\. (.+)").expect("invalid block regex"));

/// Populated place: the first capitalized-word run in the region label
static PLACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Lu}.+").expect("invalid place regex"));

/// Normalizes one raw building payload into the canonical record
///
/// Fails only when a mandatory field (identifier, region, wall material,
/// floor bounds) is absent; every other field degrades to an empty string.
pub fn normalize(payload: &Value, collected_on: NaiveDate) -> Result<BuildingRecord, NormalizeError> {
    let id = mandatory_field(payload, "id")?;
    let region = mandatory_field(payload, "region")?;
    let wall_material = mandatory_field(payload, "buildMaterial")?;
    let floor_min = mandatory_field(payload, "floorFrom")?;
    let floor_max = mandatory_field(payload, "floorTo")?;

    let address = extract_address(payload);

    Ok(BuildingRecord {
        place: extract_place(&region),
        street: extract_street(&address),
        house_number: extract_house_number(&address),
        id,
        region,
        wall_material,
        floor_min,
        floor_max,
        living_area: optional_field(payload, "livingSquare"),
        phase: optional_field(payload, "phase"),
        completion_planned: optional_field(payload, "endPlan"),
        commissioning_planned: first_commissioning_date(payload),
        collected_on: collected_on.format("%Y-%m-%d").to_string(),
    })
}

/// The canonical address, first match wins:
///   1. `address.adrPrim` — the preliminary address sub-field
///   2. `address` as a plain string
///   3. empty string
fn extract_address(payload: &Value) -> String {
    payload
        .pointer("/address/adrPrim")
        .and_then(Value::as_str)
        .or_else(|| payload.get("address").and_then(Value::as_str))
        .unwrap_or("")
        .to_string()
}

/// Street is the substring before the first comma of the address
fn extract_street(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    address.split(',').next().unwrap_or("").to_string()
}

/// House number with optional block suffix
///
/// A block marker with no house number yields an empty field, not the bare
/// block. With neither marker present the address passes through unchanged.
fn extract_house_number(address: &str) -> String {
    let number = HOUSE_NUMBER.captures(address).map(|c| c[1].to_string());
    let block = BLOCK.captures(address).map(|c| c[1].to_string());

    match (number, block) {
        (Some(number), Some(block)) => format!("{}/{}", number, block),
        (Some(number), None) => number,
        (None, Some(_)) => String::new(),
        (None, None) => address.to_string(),
    }
}

/// Populated place from the region label, e.g. "50 Московская область" →
/// "Московская область"
fn extract_place(region: &str) -> String {
    PLACE
        .find(region)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Reads a mandatory field, stringifying JSON numbers
fn mandatory_field(payload: &Value, field: &'static str) -> Result<String, NormalizeError> {
    match payload.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(NormalizeError::MissingField { field }),
    }
}

/// Reads an optional field, degrading to an empty string
fn optional_field(payload: &Value, field: &str) -> String {
    match payload.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// The first planned commissioning date, if any were announced
fn first_commissioning_date(payload: &Value) -> String {
    match payload.pointer("/endToInvestors/0") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collected() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()
    }

    fn full_payload() -> Value {
        json!({
            "id": 31337,
            "region": "50 Московская область",
            "address": {"adrPrim": "Ленина, д. 12, корп. 3"},
            "buildMaterial": "монолит-кирпич",
            "floorFrom": 5,
            "floorTo": 17,
            "livingSquare": 12345.6,
            "phase": "строится",
            "endPlan": "4 кв. 2023",
            "endToInvestors": ["2 кв. 2024", "4 кв. 2024"],
        })
    }

    #[test]
    fn test_normalize_full_payload() {
        let record = normalize(&full_payload(), collected()).unwrap();
        assert_eq!(record.id, "31337");
        assert_eq!(record.region, "50 Московская область");
        assert_eq!(record.place, "Московская область");
        assert_eq!(record.street, "Ленина");
        assert_eq!(record.house_number, "12/3");
        assert_eq!(record.wall_material, "монолит-кирпич");
        assert_eq!(record.floor_min, "5");
        assert_eq!(record.floor_max, "17");
        assert_eq!(record.living_area, "12345.6");
        assert_eq!(record.commissioning_planned, "2 кв. 2024");
        assert_eq!(record.collected_on, "2023-01-15");
    }

    #[test]
    fn test_missing_mandatory_field_fails() {
        for field in ["id", "region", "buildMaterial", "floorFrom", "floorTo"] {
            let mut payload = full_payload();
            payload.as_object_mut().unwrap().remove(field);
            let err = normalize(&payload, collected()).unwrap_err();
            assert!(matches!(err, NormalizeError::MissingField { field: f } if f == field));
        }
    }

    #[test]
    fn test_optional_fields_degrade_to_empty() {
        let payload = json!({
            "id": 1,
            "region": "78 Санкт-Петербург",
            "buildMaterial": "панель",
            "floorFrom": 1,
            "floorTo": 9,
        });

        let record = normalize(&payload, collected()).unwrap();
        assert_eq!(record.street, "");
        assert_eq!(record.house_number, "");
        assert_eq!(record.living_area, "");
        assert_eq!(record.phase, "");
        assert_eq!(record.completion_planned, "");
        assert_eq!(record.commissioning_planned, "");
    }

    #[test]
    fn test_address_falls_back_to_plain_string() {
        let mut payload = full_payload();
        payload["address"] = json!("Мира, д. 7");
        let record = normalize(&payload, collected()).unwrap();
        assert_eq!(record.street, "Мира");
        assert_eq!(record.house_number, "7");
    }

    #[test]
    fn test_house_number_with_block() {
        assert_eq!(extract_house_number("пр. Победы, д. 12, корп. 3"), "12/3");
    }

    #[test]
    fn test_block_without_number_is_empty() {
        assert_eq!(extract_house_number("пр. Победы, корп. 3"), "");
    }

    #[test]
    fn test_no_markers_passes_address_through() {
        assert_eq!(
            extract_house_number("Новая улица без номера"),
            "Новая улица без номера"
        );
    }

    #[test]
    fn test_number_without_block() {
        assert_eq!(extract_house_number("Ленина, д. 5"), "5");
    }

    #[test]
    fn test_street_extraction() {
        assert_eq!(extract_street("Ленина, д. 5"), "Ленина");
        assert_eq!(extract_street(""), "");
        assert_eq!(extract_street("Без запятой"), "Без запятой");
    }

    #[test]
    fn test_place_extraction() {
        assert_eq!(extract_place("50 Московская область"), "Московская область");
        assert_eq!(extract_place("78 Санкт-Петербург"), "Санкт-Петербург");
        assert_eq!(extract_place("без заглавных"), "");
    }

    #[test]
    fn test_fields_order_is_13_columns() {
        let record = normalize(&full_payload(), collected()).unwrap();
        let fields = record.fields();
        assert_eq!(fields.len(), 13);
        assert_eq!(fields[0], "31337");
        assert_eq!(fields[12], "2023-01-15");
    }
}
