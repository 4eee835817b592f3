//! Email delivery of ASCII artworks.
//!
//! A [`DeliveryRequest`] is validated up front, composed into a localized
//! email and posted to a mail relay by [`MailClient`]. Failures are mapped
//! into a few categories so users get a meaningful message.

mod client;
mod error;
mod request;

pub use client::{DeliveryOutcome, MailClient};
pub use error::{DeliveryError, DeliveryFailure};
pub use request::{
    compose, decode_png_data_url, escape_html, is_valid_email, sanitize_filename_part,
    validate_recipient, DeliveryRequest, EmailContent,
};
