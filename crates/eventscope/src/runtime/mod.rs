//! Runtime module: process lifecycle: boot, then one analysis run.

pub mod boot;
pub mod run;
