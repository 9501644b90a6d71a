use crate::config::ModelConfig;
use crate::driver::Driver;
use crate::errors::StofloResult;
use crate::flow::{Flow, RateOutput, StockLink};
use crate::registry::{Named, Registry};
use crate::state::StockState;
use crate::stock::Stock;
use crate::time_grid::{FloatValue, Time, TimeGrid};
use indexmap::IndexMap;
use log::{debug, warn};
use ndarray::{Array1, ArrayView1};

/// A set of stocks, flows and drivers that are solved on a common time grid
///
/// `P` is the type of the parameters which are passed to every rate function.
/// The model never inspects the parameters.
///
/// The time grid should be configured before any stocks are added.
/// Changing the grid does not resize existing stocks, they must be added again
/// otherwise integration fails once a stock runs out of values.
///
/// # Examples
///
/// ```
/// use stoflo_core::flow::StockLink;
/// use stoflo_core::model::Model;
///
/// let mut model = Model::with_parameters(0.1);
/// model.configure_time(1.0, 10.0, 0.0, 1).unwrap();
/// model.add_stock("Reservoir", 100.0);
/// model.add_stock("River", 0.0);
/// model.add_flow(
///     "Outflow",
///     |_t, stocks, k: &f64| k * stocks["Reservoir"],
///     StockLink::transfer("Reservoir", "River"),
/// );
///
/// model.run_euler().unwrap();
///
/// let reservoir = model.stock("Reservoir").unwrap();
/// assert_eq!(reservoir.len(), 11);
/// assert_eq!(model.flow_output("Outflow").unwrap()[0], 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct Model<P = ()> {
    pub(super) time_grid: TimeGrid,
    pub(super) parameters: P,
    pub(super) stocks: Registry<Stock>,
    pub(super) flows: Registry<Flow<P>>,
    pub(super) drivers: Registry<Driver>,
    /// Reconstructed rate of each flow at every time point
    ///
    /// Replaced on every call to `reconstruct_flows`
    pub(super) flow_output: IndexMap<String, Array1<FloatValue>>,
}

impl<P: Default> Default for Model<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Default> Model<P> {
    /// Create an empty model using the default time grid and parameters
    pub fn new() -> Self {
        Self::with_parameters(P::default())
    }
}

impl<P> Model<P> {
    /// Create an empty model using the default time grid
    ///
    /// The default grid has 21 points from 0 to 20 with a step of 1 and no sub-stepping.
    pub fn with_parameters(parameters: P) -> Self {
        Self {
            time_grid: TimeGrid::default(),
            parameters,
            stocks: Registry::new(),
            flows: Registry::new(),
            drivers: Registry::new(),
            flow_output: IndexMap::new(),
        }
    }

    /// Create a model from a configuration
    ///
    /// The time grid is applied before the stocks and drivers are added.
    /// Flows can't be described by a configuration and are added separately.
    pub fn from_config(config: &ModelConfig, parameters: P) -> StofloResult<Self> {
        let mut model = Self::with_parameters(parameters);
        model.set_time_grid(TimeGrid::try_from(config.time.clone())?);

        for (name, initial) in config.stocks.iter() {
            model.add_stock(name.as_str(), *initial);
        }
        for (name, driver) in config.drivers.iter() {
            model.add_driver(name.as_str(), driver.values.clone(), driver.link());
        }
        Ok(model)
    }

    /// Regenerate the time grid
    ///
    /// See [`TimeGrid::new`] for the meaning of each argument.
    /// Any existing stocks are left untouched.
    pub fn configure_time(
        &mut self,
        step: Time,
        stop: Time,
        start: Time,
        sub_steps: usize,
    ) -> StofloResult<()> {
        self.set_time_grid(TimeGrid::new(step, stop, start, sub_steps)?);
        Ok(())
    }

    /// Replace the time grid
    ///
    /// Any existing stocks are left untouched.
    pub fn set_time_grid(&mut self, time_grid: TimeGrid) {
        for stock in self.stocks.iter() {
            if stock.len() != time_grid.len() {
                warn!(
                    "Stock '{}' has {} values but the new time grid has {}. Add it again before integrating.",
                    stock.name(),
                    stock.len(),
                    time_grid.len()
                );
            }
        }
        self.time_grid = time_grid;
    }

    pub fn time_grid(&self) -> &TimeGrid {
        &self.time_grid
    }

    /// Replace the parameters that are passed to the rate functions
    pub fn set_parameters(&mut self, parameters: P) {
        self.parameters = parameters;
    }

    pub fn parameters(&self) -> &P {
        &self.parameters
    }

    /// Add a stock with an initial value
    ///
    /// The stock has one value per point in the current time grid.
    /// An existing stock with the same name is replaced.
    pub fn add_stock(&mut self, name: impl Into<String>, initial: FloatValue) {
        let stock = Stock::new(name.into(), initial, self.time_grid.len());
        if let Some(previous) = self.stocks.insert(stock) {
            debug!("Replaced stock '{}'", previous.name());
        }
    }

    /// Add a flow defined by a closure
    ///
    /// The closure may return either a rate or a `Result` containing a rate.
    /// An existing flow with the same name is replaced.
    pub fn add_flow<F, R>(&mut self, name: impl Into<String>, rate: F, link: StockLink)
    where
        F: Fn(Time, &StockState, &P) -> R + Send + Sync + 'static,
        R: RateOutput,
    {
        self.insert_flow(Flow::new(name, rate, link));
    }

    /// Add a flow
    ///
    /// An existing flow with the same name is replaced.
    pub fn insert_flow(&mut self, flow: Flow<P>) {
        if let Some(previous) = self.flows.insert(flow) {
            debug!("Replaced flow '{}'", previous.name());
        }
    }

    /// Add a driver with a precomputed series of rates
    ///
    /// The series should have a value for every point in the time grid.
    /// An existing driver with the same name is replaced.
    pub fn add_driver(
        &mut self,
        name: impl Into<String>,
        values: impl Into<Array1<FloatValue>>,
        link: StockLink,
    ) {
        if let Some(previous) = self.drivers.insert(Driver::new(name, values, link)) {
            debug!("Replaced driver '{}'", previous.name());
        }
    }

    pub fn stock(&self, name: &str) -> Option<&Stock> {
        self.stocks.get(name)
    }

    /// Get the trajectory of a stock
    pub fn stock_values(&self, name: &str) -> Option<ArrayView1<'_, FloatValue>> {
        self.stocks.get(name).map(|stock| stock.values())
    }

    pub fn stocks(&self) -> impl Iterator<Item = &Stock> {
        self.stocks.iter()
    }

    pub fn flow(&self, name: &str) -> Option<&Flow<P>> {
        self.flows.get(name)
    }

    pub fn flows(&self) -> impl Iterator<Item = &Flow<P>> {
        self.flows.iter()
    }

    pub fn driver(&self, name: &str) -> Option<&Driver> {
        self.drivers.get(name)
    }

    pub fn drivers(&self) -> impl Iterator<Item = &Driver> {
        self.drivers.iter()
    }

    /// Get the reconstructed rate of a flow at each time point
    ///
    /// Only available after the model has been run.
    pub fn flow_output(&self, name: &str) -> Option<&Array1<FloatValue>> {
        self.flow_output.get(name)
    }

    pub fn flow_outputs(&self) -> &IndexMap<String, Array1<FloatValue>> {
        &self.flow_output
    }
}
