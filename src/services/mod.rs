//! 服务层模块

pub mod doc_generator;
pub mod doc_provider;

pub use doc_provider::{ApiProvider, DocProvider, ManualProvider};
