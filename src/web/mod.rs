//! HTML front end: upload page, report and error views.

pub mod handlers;
