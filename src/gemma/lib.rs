#[macro_use] extern crate serde_derive;
#[macro_use] extern crate lazy_static;

pub mod types;
pub mod constants;
pub mod data_types;
pub mod db;
pub mod coexpression;
pub mod multifunctionality;
pub mod bio;
pub mod load;
pub mod store;
