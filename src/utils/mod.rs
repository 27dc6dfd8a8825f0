pub mod catchers;
pub mod error;
pub mod fairings;
pub mod jwt;
pub mod swagger_doc;
pub mod validation;
