pub mod engine;
pub mod migrate;
pub mod phone;
pub mod registry;
pub mod repair;
pub mod resolver;

pub use crate::domain::model::{Contact, FixResult, ProfileRecord};
pub use crate::domain::ports::{ConfigProvider, PhotoResolver, Pipeline, Storage};
pub use crate::utils::error::Result;
