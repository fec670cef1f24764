pub mod batch;
pub mod graph;
pub mod grid;
pub mod load;
