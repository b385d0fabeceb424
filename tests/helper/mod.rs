#![allow(dead_code)]

mod source;

pub use source::*;
