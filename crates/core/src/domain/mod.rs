pub mod assortment;
pub mod competitor;
pub mod product;
pub mod profile;
pub mod sales;
pub mod sentiment;
