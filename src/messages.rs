//! User-facing status messages.
//!
//! Every operation exposed to end users reports a success flag plus one of
//! these messages. Internal error text never ends up in them.

use serde::{Deserialize, Serialize};

/// Language of user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Ar,
}

impl Locale {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Locale::En),
            "ar" | "arabic" => Some(Locale::Ar),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    /// Text direction for HTML bodies.
    pub fn dir(&self) -> &'static str {
        match self {
            Locale::En => "ltr",
            Locale::Ar => "rtl",
        }
    }
}

/// A user-facing status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    DeliverySent,
    DeliveryAuthFailed,
    DeliveryConnectivity,
    DeliveryPayload,
    DeliveryConfig,
    DeliveryGeneric,
    InvalidEmail,
    MissingFields,
    NothingToSend,
    NoImagesToClean,
    Cleaned(usize),
    CleanupFailed,
    FileNotFound,
    InvalidFileName,
    ListFailed,
    InvalidImage,
    ConversionFailed,
    Converted,
}

impl Message {
    /// Render the message in a locale.
    pub fn text(&self, locale: Locale) -> String {
        match locale {
            Locale::En => self.english(),
            Locale::Ar => self.arabic(),
        }
    }

    fn english(&self) -> String {
        match self {
            Message::DeliverySent => "Your ASCII art was sent to your email. Thank you!".into(),
            Message::DeliveryAuthFailed => {
                "Authentication failed. Please check the mail service credentials.".into()
            }
            Message::DeliveryConnectivity => {
                "Could not reach the mail server. Please check your connection and try again."
                    .into()
            }
            Message::DeliveryPayload => {
                "Image processing error. Please try again with a different image.".into()
            }
            Message::DeliveryConfig => {
                "Server setup error: email credentials are missing.".into()
            }
            Message::DeliveryGeneric => {
                "Failed to send the ASCII art. Please check your email and try again.".into()
            }
            Message::InvalidEmail => "Please enter a valid email address.".into(),
            Message::MissingFields => "Please enter both your email and your name.".into(),
            Message::NothingToSend => "There is no ASCII art to send.".into(),
            Message::NoImagesToClean => "There are no images to clean up.".into(),
            Message::Cleaned(n) => format!("Successfully cleaned up {} old image(s).", n),
            Message::CleanupFailed => {
                "An unexpected error occurred while cleaning up images.".into()
            }
            Message::FileNotFound => "File not found or inaccessible.".into(),
            Message::InvalidFileName => "Invalid file name.".into(),
            Message::ListFailed => "Failed to list images.".into(),
            Message::InvalidImage => "Please upload a valid image file.".into(),
            Message::ConversionFailed => {
                "Could not convert this image. Try a larger image or a higher resolution.".into()
            }
            Message::Converted => "Conversion complete.".into(),
        }
    }

    fn arabic(&self) -> String {
        match self {
            Message::DeliverySent => {
                "تم إرسال فن ASCII إلى بريدك الإلكتروني بنجاح! شكرًا لك.".into()
            }
            Message::DeliveryAuthFailed => {
                "فشل المصادقة. يرجى التحقق من بيانات اعتماد خدمة البريد.".into()
            }
            Message::DeliveryConnectivity => {
                "خطأ في الاتصال بالخادم. يرجى التحقق من اتصالك بالإنترنت والمحاولة مرة أخرى."
                    .into()
            }
            Message::DeliveryPayload => "خطأ في معالجة الصورة. يرجى المحاولة بصورة مختلفة.".into(),
            Message::DeliveryConfig => {
                "خطأ في إعداد الخادم: بيانات اعتماد البريد الإلكتروني مفقودة.".into()
            }
            Message::DeliveryGeneric => {
                "فشل إرسال فن ASCII. يرجى التحقق من بريدك الإلكتروني والمحاولة مرة أخرى.".into()
            }
            Message::InvalidEmail => "الرجاء إدخال بريد إلكتروني صالح.".into(),
            Message::MissingFields => "الرجاء إدخال البريد الإلكتروني والاسم.".into(),
            Message::NothingToSend => "لا يوجد فن ASCII للإرسال.".into(),
            Message::NoImagesToClean => "لا توجد صور لتنظيفها.".into(),
            Message::Cleaned(n) => format!("تم تنظيف {} صورة قديمة بنجاح.", n),
            Message::CleanupFailed => "حدث خطأ غير متوقع أثناء تنظيف الصور.".into(),
            Message::FileNotFound => "الملف غير موجود أو لا يمكن الوصول إليه.".into(),
            Message::InvalidFileName => "اسم الملف غير صالح.".into(),
            Message::ListFailed => "فشل عرض الصور.".into(),
            Message::InvalidImage => "يرجى رفع ملف صورة صالح.".into(),
            Message::ConversionFailed => {
                "تعذر تحويل هذه الصورة. جرّب صورة أكبر أو دقة أعلى.".into()
            }
            Message::Converted => "اكتمل التحويل.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_code() {
        assert_eq!(Locale::from_code("EN"), Some(Locale::En));
        assert_eq!(Locale::from_code("ar"), Some(Locale::Ar));
        assert_eq!(Locale::from_code("fr"), None);
    }

    #[test]
    fn test_default_locale_is_arabic() {
        assert_eq!(Locale::default(), Locale::Ar);
        assert_eq!(Locale::Ar.dir(), "rtl");
    }

    #[test]
    fn test_cleaned_includes_count() {
        assert!(Message::Cleaned(3).text(Locale::En).contains('3'));
        assert!(Message::Cleaned(7).text(Locale::Ar).contains('7'));
    }

    #[test]
    fn test_delivery_failures_are_distinct() {
        let messages = [
            Message::DeliveryAuthFailed,
            Message::DeliveryConnectivity,
            Message::DeliveryPayload,
            Message::DeliveryGeneric,
        ];
        for locale in [Locale::En, Locale::Ar] {
            let texts: std::collections::HashSet<_> =
                messages.iter().map(|m| m.text(locale)).collect();
            assert_eq!(texts.len(), messages.len());
        }
    }
}
