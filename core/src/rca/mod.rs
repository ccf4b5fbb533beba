pub mod catalog;
pub mod form;
pub mod model;
pub mod review;
