pub mod errors;
pub mod input;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::run;
