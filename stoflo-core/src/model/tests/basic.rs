//! Basic model tests: registration, time grid, configuration, output and dot.

use crate::config::ModelConfig;
use crate::flow::StockLink;
use crate::model::Model;
use crate::registry::Named;
use crate::state::StockState;
use crate::time_grid::{FloatValue, Time, TimeGrid};
use ndarray::Array;

#[test]
fn default_time_grid() {
    let model: Model = Model::new();

    assert_eq!(model.time_grid(), &TimeGrid::default());
    assert_eq!(model.time_grid().len(), 21);
    assert_eq!(model.time_grid().at(0), Some(0.0));
    assert_eq!(model.time_grid().at(20), Some(20.0));
}

#[test]
fn add_stock() {
    let mut model: Model = Model::new();
    model.configure_time(0.5, 2.0, 0.0, 1).unwrap();
    model.add_stock("Soil", 3.0);

    let soil = model.stock("Soil").unwrap();
    assert_eq!(soil.values().to_vec(), vec![3.0, 0.0, 0.0, 0.0, 0.0]);
    assert!(model.stock("Lake").is_none());
}

#[test]
fn replacing_stock() {
    let mut model: Model = Model::new();
    model.add_stock("Soil", 3.0);
    model.add_stock("River", 1.0);
    model.add_stock("Soil", 5.0);

    assert_eq!(model.stock("Soil").unwrap().initial(), 5.0);
    assert_eq!(
        model.stocks().map(|stock| stock.name()).collect::<Vec<_>>(),
        vec!["Soil", "River"]
    );
}

#[test]
fn stock_uses_current_grid() {
    let mut model: Model = Model::new();
    model.add_stock("Before", 1.0);
    model.configure_time(1.0, 5.0, 0.0, 1).unwrap();
    model.add_stock("After", 1.0);

    // Changing the grid doesn't resize existing stocks
    assert_eq!(model.stock("Before").unwrap().len(), 21);
    assert_eq!(model.stock("After").unwrap().len(), 6);
}

#[test]
fn replacing_flow() {
    let mut model: Model = Model::new();
    model.add_stock("A", 1.0);
    model.add_flow("f", |_, _, _| 1.0, StockLink::inflow_to("A"));
    model.add_flow("f", |_, _, _| 2.0, StockLink::outflow_from("A"));

    assert_eq!(model.flows().count(), 1);
    let flow = model.flow("f").unwrap();
    assert_eq!(flow.link(), &StockLink::outflow_from("A"));
    assert_eq!(flow.rate(0.0, &StockState::default(), &()).unwrap(), 2.0);
}

#[test]
fn parameters() {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Parameters {
        k: FloatValue,
    }

    let mut model: Model<Parameters> = Model::new();
    assert_eq!(model.parameters(), &Parameters::default());

    model.set_parameters(Parameters { k: 0.5 });
    model.add_stock("A", 10.0);
    model.add_flow(
        "decay",
        |_t: Time, stocks: &StockState, p: &Parameters| p.k * stocks["A"],
        StockLink::outflow_from("A"),
    );
    model.run_euler().unwrap();

    assert_eq!(model.flow_output("decay").unwrap()[0], 5.0);

    // Parameters are replaced, not merged
    model.set_parameters(Parameters { k: 0.0 });
    model.run_euler().unwrap();
    assert_eq!(model.stock("A").unwrap().at(20).unwrap(), 10.0);
}

#[test]
fn from_config() {
    let config = ModelConfig::from_toml(
        r#"
[time]
step = 1.0
stop = 3.0

[stocks]
Bucket = 2.0

[drivers.Rain]
values = [1.0, 2.0, 3.0, 4.0]
into = "Bucket"
"#,
    )
    .unwrap();

    let mut model = Model::from_config(&config, ()).unwrap();
    assert_eq!(model.time_grid().len(), 4);
    assert_eq!(
        model.driver("Rain").unwrap().link(),
        &StockLink::inflow_to("Bucket")
    );

    model.validate().unwrap();
    model.run_euler().unwrap();

    assert_eq!(
        model.stock_values("Bucket").unwrap().to_vec(),
        vec![2.0, 3.0, 5.0, 8.0]
    );
}

#[test]
fn output() {
    let mut model: Model = Model::new();
    model.configure_time(1.0, 2.0, 0.0, 1).unwrap();
    model.add_stock("A", 1.0);
    model.add_flow("growth", |_, s, _| s["A"], StockLink::inflow_to("A"));

    let before = model.output();
    assert!(before.flows.is_empty());

    model.run_euler().unwrap();
    let output = model.output();

    assert_eq!(output.time, Array::range(0.0, 3.0, 1.0));
    assert_eq!(output.stocks["A"].to_vec(), vec![1.0, 2.0, 4.0]);
    assert_eq!(output.flows["growth"].to_vec(), vec![1.0, 2.0, 4.0]);

    let serialised = serde_json::to_string(&output).unwrap();
    let deserialised: crate::model::ModelOutput = serde_json::from_str(&serialised).unwrap();
    assert_eq!(deserialised, output);
}

#[test]
fn dot() {
    let mut model: Model = Model::new();
    model.add_stock("A", 1.0);
    model.add_stock("B", 0.0);
    model.add_flow("transfer", |_, _, _| 1.0, StockLink::transfer("A", "B"));
    model.add_flow("diagnostic", |_, _, _| 1.0, StockLink::unlinked());
    model.add_driver("emissions", vec![1.0; 21], StockLink::inflow_to("A"));

    let dot = model.as_dot();

    assert!(dot.starts_with("digraph {"));
    assert!(dot.contains("0 [ label = \"A\"]"));
    assert!(dot.contains("1 [ label = \"B\"]"));
    assert!(dot.contains("0 -> 1 [ label = \"transfer\"]"));
    assert!(dot.contains("2 [ label = \"\", shape = point]"));
    assert!(dot.contains("2 -> 0 [ label = \"emissions\"]"));
    assert!(!dot.contains("diagnostic"));
}
