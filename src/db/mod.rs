pub mod image;
pub mod pg;
pub mod schema;

pub use image::{ImageRow, PgImageStore};
pub use pg::{establish_connection, resolve_database_url, DbParams};
