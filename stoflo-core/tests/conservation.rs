//! Conservation tests for stock and flow models.
//!
//! These tests verify that quantity is neither created nor destroyed:
//! - transfers between stocks leave the total unchanged
//! - the total only changes by what drivers add or remove

use approx::assert_relative_eq;
use stoflo_core::flow::StockLink;
use stoflo_core::model::Model;
use stoflo_core::state::StockState;
use stoflo_core::time_grid::FloatValue;

#[derive(Debug, Clone)]
struct BoxParameters {
    /// Fraction of the atmosphere taken up by land each year
    land_uptake: FloatValue,
    /// Fraction of the atmosphere taken up by the ocean each year
    ocean_uptake: FloatValue,
    /// Fraction of the land pool respired each year
    respiration: FloatValue,
}

fn three_box_model(sub_steps: usize, emissions: FloatValue) -> Model<BoxParameters> {
    let mut model = Model::with_parameters(BoxParameters {
        land_uptake: 0.02,
        ocean_uptake: 0.015,
        respiration: 0.01,
    });
    model.configure_time(1.0, 2000.0, 1900.0, sub_steps).unwrap();

    model.add_stock("Atmosphere", 590.0);
    model.add_stock("Land", 2300.0);
    model.add_stock("Ocean", 900.0);

    model.add_flow(
        "Land uptake",
        |_, s: &StockState, p: &BoxParameters| p.land_uptake * s["Atmosphere"],
        StockLink::transfer("Atmosphere", "Land"),
    );
    model.add_flow(
        "Respiration",
        |_, s: &StockState, p: &BoxParameters| p.respiration * s["Land"],
        StockLink::transfer("Land", "Atmosphere"),
    );
    model.add_flow(
        "Ocean uptake",
        |_, s: &StockState, p: &BoxParameters| p.ocean_uptake * s["Atmosphere"],
        StockLink::transfer("Atmosphere", "Ocean"),
    );
    model.add_flow(
        "Airborne fraction",
        |_, s: &StockState, _: &BoxParameters| s["Atmosphere"] / 590.0,
        StockLink::unlinked(),
    );

    let n_times = model.time_grid().len();
    model.add_driver(
        "Emissions",
        vec![emissions; n_times],
        StockLink::inflow_to("Atmosphere"),
    );
    model
}

fn total(model: &Model<BoxParameters>, index: usize) -> FloatValue {
    model
        .stocks()
        .map(|stock| stock.at(index).unwrap())
        .sum()
}

mod mass_conservation {
    use super::*;

    /// Without emissions the total quantity never changes
    #[test]
    fn closed_system() {
        let mut model = three_box_model(1, 0.0);
        model.run_euler().unwrap();

        let initial = total(&model, 0);
        for index in 0..model.time_grid().len() {
            assert_relative_eq!(total(&model, index), initial, max_relative = 1e-12);
        }
    }

    /// The total increases by exactly the cumulative emissions
    #[test]
    fn emissions_are_accumulated() {
        for sub_steps in [1, 4, 12] {
            let mut model = three_box_model(sub_steps, 10.0);
            model.run_euler().unwrap();

            let initial = total(&model, 0);
            let dt = model.time_grid().step();
            for index in 0..model.time_grid().len() {
                let expected = initial + 10.0 * dt * index as FloatValue;
                assert_relative_eq!(total(&model, index), expected, max_relative = 1e-12);
            }
        }
    }

    /// Stocks stay positive when uptake is slower than the time step
    #[test]
    fn stocks_non_negative() {
        let mut model = three_box_model(1, 0.0);
        model.run_euler().unwrap();

        for stock in model.stocks() {
            assert!(
                stock.values().iter().all(|value| *value > 0.0),
                "Stock {:?} went negative",
                stock
            );
        }
    }
}

mod flow_history {
    use super::*;

    /// The reconstructed uptake matches the integrated stocks at every saved time
    #[test]
    fn uptake_matches_atmosphere() {
        let mut model = three_box_model(4, 10.0);
        model.run_euler().unwrap();

        let atmosphere = model.stock_values("Atmosphere").unwrap();
        let uptake = model.flow_output("Land uptake").unwrap();
        let airborne = model.flow_output("Airborne fraction").unwrap();

        assert_eq!(uptake.len(), atmosphere.len());
        for index in 0..atmosphere.len() {
            assert_relative_eq!(uptake[index], 0.02 * atmosphere[index]);
            assert_relative_eq!(airborne[index], atmosphere[index] / 590.0);
        }
        assert_relative_eq!(airborne[0], 1.0);
    }

    /// Integrating the first-order decay with many sub-steps approaches the analytic solution
    #[test]
    fn decay_approaches_exponential() {
        let mut model: Model = Model::new();
        model.configure_time(1.0, 5.0, 0.0, 1000).unwrap();
        model.add_stock("Tracer", 100.0);
        model.add_flow(
            "Decay",
            |_, s, _| 0.2 * s["Tracer"],
            StockLink::outflow_from("Tracer"),
        );

        model.run_euler().unwrap();

        let tracer = model.stock_values("Tracer").unwrap();
        for (index, &t) in model.time_grid().values().iter().enumerate() {
            assert_relative_eq!(tracer[index], 100.0 * (-0.2 * t).exp(), max_relative = 1e-3);
        }
    }
}
