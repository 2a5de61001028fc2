//! Form-notification message parsing

use crate::error::{HtmlError, MessageError};
use crate::types::SubmissionKind;
use chrono::{DateTime, Utc};
use mailparse::{MailAddr, MailHeader, ParsedMail};
use tracing::debug;

/// The parts of a notification email the roster needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMessage {
    pub subject: String,

    /// First Reply-To address: the registrant
    pub reply_to: String,

    /// Send time from the Date header
    pub sent_at: DateTime<Utc>,

    /// First `text/html` part, transfer-decoded
    pub html: Option<String>,
}

impl FormMessage {
    /// Which form this notification belongs to
    #[must_use]
    pub fn kind(&self) -> SubmissionKind {
        SubmissionKind::classify(&self.subject)
    }

    /// The HTML body, or why there is none to walk
    pub fn html_body(&self) -> Result<&str, HtmlError> {
        match self.html.as_deref() {
            None => Err(HtmlError::MissingPart),
            Some(html) if html.trim().is_empty() => Err(HtmlError::Empty),
            Some(html) => Ok(html),
        }
    }
}

/// Parse raw message bytes into a [`FormMessage`]
pub fn parse_message(raw: &[u8]) -> Result<FormMessage, MessageError> {
    let parsed =
        mailparse::parse_mail(raw).map_err(|e| MessageError::Structure(e.to_string()))?;

    let subject = header_value(&parsed.headers, "subject")
        .ok_or(MessageError::MissingHeader("Subject"))?;
    let reply_to =
        extract_reply_to(&parsed.headers).ok_or(MessageError::MissingHeader("Reply-To"))?;
    let sent_at = extract_date(&parsed.headers).ok_or(MessageError::MissingHeader("Date"))?;
    let html = extract_html(&parsed);

    debug!("Parsed message: {} from {}", subject, reply_to);

    Ok(FormMessage {
        subject,
        reply_to,
        sent_at,
        html,
    })
}

fn header_value(headers: &[MailHeader], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|h| h.get_key().to_lowercase() == name)
        .map(MailHeader::get_value)
}

fn extract_reply_to(headers: &[MailHeader]) -> Option<String> {
    let header = headers
        .iter()
        .find(|h| h.get_key().to_lowercase() == "reply-to")?;
    let addresses = mailparse::addrparse_header(header).ok()?;

    addresses.iter().find_map(|addr| match addr {
        MailAddr::Single(info) => Some(info.addr.clone()),
        MailAddr::Group(group) => group.addrs.first().map(|info| info.addr.clone()),
    })
}

fn extract_date(headers: &[MailHeader]) -> Option<DateTime<Utc>> {
    let value = header_value(headers, "date")?;

    DateTime::parse_from_rfc2822(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            mailparse::dateparse(&value)
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
        })
}

fn extract_html(parsed: &ParsedMail) -> Option<String> {
    if parsed.subparts.is_empty() {
        return if is_html(parsed) {
            parsed.get_body().ok()
        } else {
            None
        };
    }

    parsed.subparts.iter().find_map(extract_html)
}

fn is_html(part: &ParsedMail) -> bool {
    part.ctype.mimetype.to_lowercase().contains("text/html")
}
