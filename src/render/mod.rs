pub mod currency;
pub mod pages;
