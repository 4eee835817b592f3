//! Delivery request validation and email composition.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::DeliveryError;
use crate::messages::Locale;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Basic syntactic check of an email address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Decode a `data:image/png;base64,...` URL into raw bytes.
///
/// Anything after the first comma is treated as base64.
pub fn decode_png_data_url(data_url: &str) -> Result<Vec<u8>, DeliveryError> {
    let (_, encoded) = data_url
        .split_once(',')
        .ok_or_else(|| DeliveryError::InvalidPayload("image data URL has no comma".into()))?;
    if encoded.is_empty() {
        return Err(DeliveryError::InvalidPayload("image data is empty".into()));
    }
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| DeliveryError::InvalidPayload(format!("invalid base64: {}", e)))?;
    if bytes.is_empty() {
        return Err(DeliveryError::InvalidPayload("image buffer is empty".into()));
    }
    Ok(bytes)
}

/// Check the recipient fields, returning them trimmed.
pub fn validate_recipient<'a>(
    email: &'a str,
    display_name: &'a str,
) -> Result<(&'a str, &'a str), DeliveryError> {
    let email = email.trim();
    let display_name = display_name.trim();

    if email.is_empty() {
        return Err(DeliveryError::MissingField("email"));
    }
    if display_name.is_empty() {
        return Err(DeliveryError::MissingField("display name"));
    }
    if !is_valid_email(email) {
        return Err(DeliveryError::InvalidEmail(email.to_string()));
    }
    Ok((email, display_name))
}

/// A validated request to email one ASCII artwork.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    email: String,
    display_name: String,
    text: String,
    png: Vec<u8>,
}

impl DeliveryRequest {
    /// Validate and build a request.
    ///
    /// # Errors
    /// - `MissingField` when the email, display name, text or PNG is empty
    /// - `InvalidEmail` when the address fails the syntax check
    pub fn new(
        email: &str,
        display_name: &str,
        text: impl Into<String>,
        png: Vec<u8>,
    ) -> Result<Self, DeliveryError> {
        let (email, display_name) = validate_recipient(email, display_name)?;
        let text = text.into();

        if text.trim().is_empty() {
            return Err(DeliveryError::MissingField("text"));
        }
        if png.is_empty() {
            return Err(DeliveryError::MissingField("png"));
        }

        Ok(Self {
            email: email.to_string(),
            display_name: display_name.to_string(),
            text,
            png,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }
}

/// Subject, body and attachment name of an outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    pub attachment_filename: String,
}

/// Compose the email for a request.
pub fn compose(
    request: &DeliveryRequest,
    locale: Locale,
    download_url: Option<&str>,
    now_ms: u64,
) -> EmailContent {
    let name = escape_html(request.display_name());
    let dir = locale.dir();

    let (subject, lines, link_label) = match locale {
        Locale::En => (
            format!("Your ASCII art from {}", request.display_name()),
            [
                format!("Hello {},", name),
                "Thanks for using our ASCII art converter! Here is the ASCII art you requested.".to_string(),
                "A PNG copy of your ASCII art is attached to this email.".to_string(),
                "We hope you enjoy it!".to_string(),
                "Best regards,<br>The ASCII Art Converter team".to_string(),
            ],
            "Download link (valid for 5 hours, single use)",
        ),
        Locale::Ar => (
            format!("فن ASCII الخاص بك من {}", request.display_name()),
            [
                format!("مرحباً {},", name),
                "شكرًا لك على استخدام محول فن ASCII الخاص بنا! إليك فن ASCII الذي طلبته:".to_string(),
                "تم إرفاق نسخة PNG من فن ASCII الخاص بك مع هذا البريد الإلكتروني.".to_string(),
                "نأمل أن تستمتع به!".to_string(),
                "مع خالص التقدير،<br>فريق محول فن ASCII".to_string(),
            ],
            "رابط التنزيل (صالح لمدة 5 ساعات ولمرة واحدة)",
        ),
    };

    let mut html = String::new();
    for (i, line) in lines.iter().enumerate() {
        html.push_str(&format!("<p dir=\"{}\">{}</p>\n", dir, line));
        if i == 1 {
            html.push_str(&format!(
                "<pre dir=\"ltr\" style=\"font-family: monospace\">{}</pre>\n",
                escape_html(request.text())
            ));
        }
    }
    if let Some(url) = download_url {
        let url = escape_html(url);
        html.push_str(&format!(
            "<p dir=\"{}\"><a href=\"{}\">{}</a></p>\n",
            dir, url, link_label
        ));
    }

    EmailContent {
        subject,
        html,
        attachment_filename: format!(
            "ascii-art-{}-{}.png",
            sanitize_filename_part(request.display_name()),
            now_ms
        ),
    }
}

/// Keep only `[A-Za-z0-9_-]`, mapping everything else to `_`.
pub fn sanitize_filename_part(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "user".to_string()
    } else {
        cleaned
    }
}

/// Minimal HTML escaping for text interpolated into the body.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
