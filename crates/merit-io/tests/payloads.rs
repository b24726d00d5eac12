//! Demo payloads decoded and planned end to end.

use std::path::PathBuf;

use merit_algo::DispatchPlanner;
use merit_core::{Megawatts, UnitCategory};
use merit_io::{encode_plan, load_payload, PlanLine};

fn demo_payload(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos/payloads")
        .join(name)
}

#[test]
fn test_demo_payloads_decode() {
    for name in ["payload1.json", "payload2.json", "payload3.json"] {
        let request = load_payload(demo_payload(name)).unwrap();
        assert_eq!(request.units.len(), 6, "{name}");
        assert_eq!(request.units[3].category, UnitCategory::ThermalDistillate);
        assert_eq!(request.market.distillate_price, Some(50.8));
    }
}

#[test]
fn test_payload1_plan() {
    let request = load_payload(demo_payload("payload1.json")).unwrap();
    let solution = DispatchPlanner::new().plan(&request).unwrap();

    assert_eq!(solution.power_of("windpark1"), Some(Megawatts(90.0)));
    assert_eq!(solution.power_of("windpark2"), Some(Megawatts(21.6)));
    assert_eq!(solution.power_of("gasfiredbig1"), Some(Megawatts(368.4)));
    assert_eq!(solution.power_of("tj1"), Some(Megawatts::ZERO));

    let lines: Vec<PlanLine> = serde_json::from_str(&encode_plan(&solution.entries).unwrap()).unwrap();
    let total: f64 = lines.iter().map(|l| l.power).sum();
    assert!((total - 480.0).abs() < 1e-6);
}

#[test]
fn test_payload2_plan_without_wind() {
    let request = load_payload(demo_payload("payload2.json")).unwrap();
    let solution = DispatchPlanner::new().plan(&request).unwrap();

    assert_eq!(solution.power_of("windpark1"), Some(Megawatts::ZERO));
    assert_eq!(solution.power_of("gasfiredbig1"), Some(Megawatts(460.0)));
    assert_eq!(solution.power_of("gasfiredbig2"), Some(Megawatts(20.0)));
}
