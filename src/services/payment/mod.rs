pub mod interface;
pub mod overlay;
