//! Publish a rocket launch schedule page to Google Calendar.
//!
//! The interesting part is [`schedule`], which turns the loosely structured
//! schedule markup into [`models::LaunchRecord`]s. [`fetch`], [`auth`] and
//! [`calendar`] are thin wrappers over the page host and the Google APIs;
//! [`sync`] wires them together.

pub mod auth;
pub mod calendar;
pub mod config;
pub mod fetch;
pub mod models;
pub mod schedule;
pub mod sync;
