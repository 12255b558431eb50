// Each integration test binary compiles this module and uses its own subset
// of the helpers.
#![allow(dead_code)]

pub mod app;
