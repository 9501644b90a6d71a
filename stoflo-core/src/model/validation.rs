//! Optional consistency checks that can be run before integrating a model.

use super::runtime::Model;
use crate::errors::{StofloError, StofloResult};
use crate::flow::StockLink;
use crate::registry::{Named, Registry};
use crate::stock::Stock;

fn verify_link(
    stocks: &Registry<Stock>,
    source_name: &str,
    link: &StockLink,
) -> StofloResult<()> {
    match link.targets().find(|(stock, _)| !stocks.contains(stock)) {
        Some((stock, _)) => Err(StofloError::UnknownStockReference {
            source_name: source_name.to_string(),
            stock: stock.to_string(),
        }),
        None => Ok(()),
    }
}

impl<P> Model<P> {
    /// Check that the model can be integrated
    ///
    /// Returns the first problem found out of:
    /// - a flow or driver that links to a stock that hasn't been added
    /// - a stock whose length doesn't match the time grid
    ///   (usually because the grid was changed after the stock was added)
    /// - a linked driver with fewer values than the time grid
    ///
    /// Integration does not call this.
    /// Without it, the same problems are reported part way through a run.
    pub fn validate(&self) -> StofloResult<()> {
        let n_times = self.time_grid.len();

        for flow in self.flows.iter() {
            verify_link(&self.stocks, flow.name(), flow.link())?;
        }
        for driver in self.drivers.iter() {
            verify_link(&self.stocks, driver.name(), driver.link())?;
        }

        if let Some(stock) = self.stocks.iter().find(|stock| stock.len() != n_times) {
            return Err(StofloError::DimensionMismatch {
                name: stock.name().to_string(),
                index: n_times - 1,
                len: stock.len(),
            });
        }

        if let Some(driver) = self
            .drivers
            .iter()
            .find(|driver| driver.link().is_linked() && driver.values().len() < n_times)
        {
            return Err(StofloError::DimensionMismatch {
                name: driver.name().to_string(),
                index: n_times - 1,
                len: driver.values().len(),
            });
        }

        Ok(())
    }
}
