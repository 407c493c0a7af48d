pub mod contract;
pub mod part;
pub mod product;
pub mod recommendation;
