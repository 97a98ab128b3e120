#![allow(dead_code)]
pub mod capture_writer;
pub mod recording_handler;
pub mod recording_listener;
