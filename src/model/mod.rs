pub mod indicators;
pub mod observation;
