//! Production-plan request payloads
//!
//! Field names follow the public payload format. Numeric fields accept JSON
//! numbers as well as numeric strings. Fuel entries that are present but not
//! numeric decode to NaN so the dispatch stages can report them against the
//! unit that needs them.

use std::{collections::HashMap, fs, path::Path};

use merit_core::{DispatchError, DispatchRequest, DispatchResult, MarketState, Unit, UnitCategory};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const GAS_KEY: &str = "gas(euro/MWh)";
pub const KEROSINE_KEY: &str = "kerosine(euro/MWh)";
pub const CO2_KEY: &str = "co2(euro/ton)";
pub const WIND_KEY: &str = "wind(%)";

/// Failure to turn a payload file into a request
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("failed to read payload {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Top-level payload; every field is checked by hand so that a missing key
/// reports which one.
#[derive(Debug, Deserialize)]
struct PayloadJson {
    load: Option<Value>,
    fuels: Option<HashMap<String, Value>>,
    powerplants: Option<Vec<PlantJson>>,
}

#[derive(Debug, Deserialize)]
struct PlantJson {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    efficiency: Option<Value>,
    pmin: Option<Value>,
    pmax: Option<Value>,
}

fn malformed(msg: impl Into<String>) -> DispatchError {
    DispatchError::MalformedRequest(msg.into())
}

/// Number or numeric string; `None` for anything else
fn value_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Required numeric field
fn require_f64(value: Option<&Value>, field: &str) -> DispatchResult<f64> {
    let value = value.ok_or_else(|| malformed(format!("missing field '{}'", field)))?;
    value_f64(value).ok_or_else(|| malformed(format!("field '{}' is not a number", field)))
}

/// Fuel entry: absent or null stays `None`, anything non-numeric becomes NaN
fn fuel_value(fuels: &HashMap<String, Value>, key: &str) -> Option<f64> {
    match fuels.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value_f64(value).unwrap_or(f64::NAN)),
    }
}

/// Map a payload plant type onto a unit category
pub fn category_from_type(kind: &str) -> UnitCategory {
    match kind {
        "gasfired" => UnitCategory::ThermalGas,
        "turbojet" => UnitCategory::ThermalDistillate,
        "windturbine" => UnitCategory::VariableWind,
        _ => UnitCategory::Other,
    }
}

fn decode_plant(index: usize, plant: &PlantJson) -> DispatchResult<Unit> {
    let name = plant
        .name
        .as_deref()
        .ok_or_else(|| malformed(format!("powerplant #{} has no name", index)))?;
    let kind = plant
        .kind
        .as_deref()
        .ok_or_else(|| malformed(format!("powerplant '{}' has no type", name)))?;

    let pmin = require_f64(plant.pmin.as_ref(), &format!("{}.pmin", name))?;
    let pmax = require_f64(plant.pmax.as_ref(), &format!("{}.pmax", name))?;
    let mut unit = Unit::new(name, category_from_type(kind)).with_p_limits(pmin, pmax);

    match plant.efficiency.as_ref() {
        None | Some(Value::Null) => {}
        Some(value) => {
            let efficiency = value_f64(value).ok_or_else(|| {
                malformed(format!("field '{}.efficiency' is not a number", name))
            })?;
            unit = unit.with_efficiency(efficiency);
        }
    }
    Ok(unit)
}

/// Decode and validate a request payload.
///
/// Any structural problem is reported as
/// [`DispatchError::MalformedRequest`]; price and availability problems are
/// left for the planner, which knows which unit needs what.
pub fn decode_request(json: impl AsRef<[u8]>) -> DispatchResult<DispatchRequest> {
    let payload: PayloadJson = serde_json::from_slice(json.as_ref())
        .map_err(|e| malformed(format!("wrong payload format: {}", e)))?;

    let load = require_f64(payload.load.as_ref(), "load")?;
    let fuels = payload
        .fuels
        .ok_or_else(|| malformed("missing field 'fuels'"))?;
    let plants = payload
        .powerplants
        .ok_or_else(|| malformed("missing field 'powerplants'"))?;

    let units = plants
        .iter()
        .enumerate()
        .map(|(index, plant)| decode_plant(index, plant))
        .collect::<DispatchResult<Vec<_>>>()?;

    let market = MarketState {
        gas_price: fuel_value(&fuels, GAS_KEY),
        distillate_price: fuel_value(&fuels, KEROSINE_KEY),
        carbon_price: fuel_value(&fuels, CO2_KEY),
        wind_availability_pct: fuel_value(&fuels, WIND_KEY),
    };

    let request = DispatchRequest::new(load, units, market);
    request.validate()?;
    Ok(request)
}

/// Read and decode a payload file
pub fn load_payload(path: impl AsRef<Path>) -> Result<DispatchRequest, PayloadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| PayloadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(decode_request(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use merit_core::Megawatts;

    const PAYLOAD: &str = r#"{
        "load": 480,
        "fuels": {
            "gas(euro/MWh)": 13.4,
            "kerosine(euro/MWh)": 50.8,
            "co2(euro/ton)": 20,
            "wind(%)": 60
        },
        "powerplants": [
            {"name": "gasfiredbig1", "type": "gasfired", "efficiency": 0.53, "pmin": 100, "pmax": 460},
            {"name": "tj1", "type": "turbojet", "efficiency": 0.3, "pmin": 0, "pmax": 16},
            {"name": "windpark1", "type": "windturbine", "efficiency": 1, "pmin": 0, "pmax": 150}
        ]
    }"#;

    #[test]
    fn test_decode_full_payload() {
        let request = decode_request(PAYLOAD).unwrap();
        assert_eq!(request.load, Megawatts(480.0));
        assert_eq!(request.units.len(), 3);
        assert_eq!(request.units[0].category, UnitCategory::ThermalGas);
        assert_eq!(request.units[1].category, UnitCategory::ThermalDistillate);
        assert_eq!(request.units[2].category, UnitCategory::VariableWind);
        assert_eq!(request.units[0].efficiency, Some(0.53));
        assert_eq!(request.market.gas_price, Some(13.4));
        assert_eq!(request.market.carbon_price, Some(20.0));
        assert_eq!(request.market.wind_availability_pct, Some(60.0));
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let json = r#"{"load": "50", "fuels": {"gas(euro/MWh)": "13.4"},
            "powerplants": [{"name": "g", "type": "gasfired", "pmin": "0", "pmax": "100"}]}"#;
        let request = decode_request(json).unwrap();
        assert_eq!(request.load, Megawatts(50.0));
        assert_eq!(request.market.gas_price, Some(13.4));
        assert_eq!(request.units[0].pmax, Megawatts(100.0));
        assert_eq!(request.units[0].efficiency, None);
    }

    #[test]
    fn test_unknown_type_maps_to_other() {
        assert_eq!(category_from_type("nuclear"), UnitCategory::Other);
        assert_eq!(category_from_type("windturbine"), UnitCategory::VariableWind);
    }

    #[test]
    fn test_non_numeric_fuel_decodes_to_nan() {
        let json = r#"{"load": 10, "fuels": {"wind(%)": "breezy", "co2(euro/ton)": null},
            "powerplants": []}"#;
        let request = decode_request(json).unwrap();
        assert!(request.market.wind_availability_pct.unwrap().is_nan());
        assert_eq!(request.market.carbon_price, None);
        assert_eq!(request.market.gas_price, None);
    }

    #[test]
    fn test_missing_top_level_keys() {
        for (json, field) in [
            (r#"{"fuels": {}, "powerplants": []}"#, "load"),
            (r#"{"load": 1, "powerplants": []}"#, "fuels"),
            (r#"{"load": 1, "fuels": {}}"#, "powerplants"),
        ] {
            match decode_request(json) {
                Err(DispatchError::MalformedRequest(msg)) => assert!(msg.contains(field), "{msg}"),
                other => panic!("expected malformed request, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_bad_plants_are_malformed() {
        for plant in [
            r#"{"type": "gasfired", "pmin": 0, "pmax": 1}"#,
            r#"{"name": "g", "pmin": 0, "pmax": 1}"#,
            r#"{"name": "g", "type": "gasfired", "pmax": 1}"#,
            r#"{"name": "g", "type": "gasfired", "pmin": 0, "pmax": "lots"}"#,
            r#"{"name": "g", "type": "gasfired", "efficiency": "high", "pmin": 0, "pmax": 1}"#,
            r#"{"name": "g", "type": "gasfired", "efficiency": 0, "pmin": 0, "pmax": 1}"#,
        ] {
            let json = format!(r#"{{"load": 1, "fuels": {{}}, "powerplants": [{}]}}"#, plant);
            assert!(
                matches!(decode_request(&json), Err(DispatchError::MalformedRequest(_))),
                "{plant}"
            );
        }
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            decode_request("not json"),
            Err(DispatchError::MalformedRequest(msg)) if msg.starts_with("wrong payload format")
        ));
    }

    #[test]
    fn test_load_payload_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");
        fs::write(&path, PAYLOAD).unwrap();

        let request = load_payload(&path).unwrap();
        assert_eq!(request.units.len(), 3);

        let missing = load_payload(dir.path().join("absent.json"));
        assert!(matches!(missing, Err(PayloadError::Read { .. })));
    }
}
