use super::runtime::Model;
use crate::flow::StockLink;
use crate::registry::Named;
use petgraph::dot::{Config, Dot};
use petgraph::graph::NodeIndex;
use petgraph::Graph;
use std::collections::HashMap;

/// Stocks are named nodes, sources and sinks outside of the model are `None`
type StockFlowGraph = Graph<Option<String>, String>;

fn endpoint(
    graph: &mut StockFlowGraph,
    nodes: &mut HashMap<String, NodeIndex>,
    stock: Option<&str>,
) -> NodeIndex {
    match stock {
        Some(stock) => *nodes
            .entry(stock.to_string())
            .or_insert_with(|| graph.add_node(Some(stock.to_string()))),
        None => graph.add_node(None),
    }
}

impl<P> Model<P> {
    fn as_graph(&self) -> StockFlowGraph {
        let mut graph = StockFlowGraph::new();
        let mut nodes = HashMap::new();

        for stock in self.stocks.iter() {
            let node = graph.add_node(Some(stock.name().to_string()));
            nodes.insert(stock.name().to_string(), node);
        }

        let links = self
            .flows
            .iter()
            .map(|flow| (flow.name(), flow.link()))
            .chain(
                self.drivers
                    .iter()
                    .map(|driver| (driver.name(), driver.link())),
            );

        for (name, link) in links.filter(|(_, link)| link.is_linked()) {
            let StockLink { into, outfrom } = link;
            let source = endpoint(&mut graph, &mut nodes, outfrom.as_deref());
            let target = endpoint(&mut graph, &mut nodes, into.as_deref());
            graph.add_edge(source, target, name.to_string());
        }
        graph
    }

    /// Create a stock-flow diagram in the DOT format
    ///
    /// Each stock is a node and each linked flow or driver is an edge from the stock it drains
    /// to the stock it fills.
    /// Missing ends are drawn as points.
    /// Flows that aren't linked to any stock are not shown.
    ///
    /// Useful for debugging
    pub fn as_dot(&self) -> String {
        let graph = self.as_graph();
        let dot = Dot::with_attr_getters(
            &graph,
            &[Config::NodeNoLabel, Config::EdgeNoLabel],
            &|_, er| format!("label = {:?}", er.weight()),
            &|_, (_, node)| match node {
                Some(name) => format!("label = {:?}", name),
                None => "label = \"\", shape = point".to_string(),
            },
        );
        format!("{:?}", dot)
    }
}
