pub mod analyze;
pub mod build;
pub mod fields;
pub mod run;
