/// This module provides JSON table readers and writers.
pub mod json;
