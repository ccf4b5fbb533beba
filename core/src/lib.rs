pub mod api;
pub mod incident;
pub mod rca;
pub mod session;

pub mod error;
