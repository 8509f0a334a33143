pub mod list;
pub mod panels;
pub mod plot;
