pub mod prices;
pub mod totals;
pub mod years;
