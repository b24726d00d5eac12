//! # merit-io: Payload Wire Format
//!
//! Decoding of production-plan request payloads into a typed
//! [`DispatchRequest`](merit_core::DispatchRequest) and encoding of plans and
//! errors back to JSON.
//!
//! ## Request Shape
//!
//! ```json
//! { "load": 480,
//!   "fuels": { "gas(euro/MWh)": 13.4, "kerosine(euro/MWh)": 50.8,
//!              "co2(euro/ton)": 20, "wind(%)": 60 },
//!   "powerplants": [ { "name": "gasfiredbig1", "type": "gasfired",
//!                      "efficiency": 0.53, "pmin": 100, "pmax": 460 } ] }
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use merit_io::payload::decode_request;
//!
//! let request = decode_request(
//!     r#"{"load": 20, "fuels": {"kerosine(euro/MWh)": 50.8},
//!         "powerplants": [{"name": "tj1", "type": "turbojet",
//!                          "efficiency": 0.3, "pmin": 0, "pmax": 16}]}"#,
//! );
//! assert!(request.is_ok());
//! ```
//!
//! ## Modules
//!
//! - [`payload`] - Request decoding and payload files
//! - [`response`] - Plan and error bodies

pub mod payload;
pub mod response;

pub use payload::{decode_request, load_payload, PayloadError};
pub use response::{encode_plan, plan_lines, ErrorBody, PlanLine};
