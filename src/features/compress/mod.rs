pub mod encoder;
pub mod handler;
pub mod models;

pub use handler::create_compress_router;
pub use models::{CompressRequest, CompressResponse};
