mod load;
mod parse;

pub use load::load_dataset;
pub use parse::{RawEdge, parse_edges};
