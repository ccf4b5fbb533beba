pub mod approval;
pub mod assignment;
pub mod decode;
pub mod detail;
pub mod intake;
pub mod model;
pub mod preview;
