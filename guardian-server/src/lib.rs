//! Last-departure advisor server.
//!
//! A web application that answers: "When is the last train home tonight,
//! and when should I actually leave?"

pub mod advisor;
pub mod cache;
pub mod domain;
pub mod google;
pub mod web;
