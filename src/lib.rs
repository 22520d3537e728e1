//! Worklog allocation engine for Jira timesheets
//!
//! This crate distributes a fixed daily time budget across weighted tickets
//! for every working day in a date range, and records the resulting
//! worklogs in Jira through its REST API or its web form endpoint.
//!
//! The allocation core ([`calculation`]) is pure and synchronous; the
//! [`submission`] and [`report`] modules talk to the tracker, and [`api`]
//! exposes a plan preview over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod submission;
