// Lucid Trace: terminal client for a remote media authenticity service
//
// This is the library root. The controller owns the upload/result state;
// everything it talks to sits behind a trait so front ends and tests can
// swap in their own implementations.

pub mod analysis;
pub mod config;
pub mod controller;
pub mod decoration;
pub mod media;
pub mod output;
