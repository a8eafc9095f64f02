pub mod aggregate;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod input;
pub mod model;
pub mod report;
pub mod view;

pub mod prelude {
    pub use crate::aggregate::scale::{normalize, percentile};
    pub use crate::dataset::{Dataset, DatasetLoader, LoadState, default_loader};
    pub use crate::input::{BytesSource, DatasetSource, FileSource, LoadError, RetrievalError};
    pub use crate::model::indicators::Indicator;
    pub use crate::model::observation::{MinMax, Observation, UnkeyedRow};
}

#[cfg(test)]
#[path = "../tests/src_inline/fixtures.rs"]
pub(crate) mod fixtures;
