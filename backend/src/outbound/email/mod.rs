//! Email provider outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `Mailer` port
//! against the SendGrid v3 API.

mod sendgrid;

pub use sendgrid::SendGridMailer;
