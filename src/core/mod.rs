pub mod emitter;
pub mod etl;
pub mod ingest;
pub mod matcher;
pub mod parser;
pub mod pipeline;

pub use crate::domain::model::{Association, Catalogs, Listing, Product};
pub use crate::domain::ports::{ConfigProvider, Diagnostics, Pipeline, Storage};
pub use crate::utils::error::Result;
