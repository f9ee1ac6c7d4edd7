#![cfg(test)]
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod recording_server;

pub use recording_server::{RecordedRequest, RecordingServer};
