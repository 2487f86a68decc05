pub mod distribution_bar;
pub mod header;
