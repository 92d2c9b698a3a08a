use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::config::Colors;
use crate::models::ResponseRecord;
use crate::utils::{format_bytes, format_elapsed};

/// Status code plus message, colored by response class.
pub fn status_tag(response: &ResponseRecord, colors: &Colors) -> Span<'static> {
    let label = match (response.status(), response.status_message.is_empty()) {
        (Some(status), true) => format!(
            " {} {} ",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        ),
        _ => format!(" {} {} ", response.status_code, response.status_message),
    };

    let color = match response.status_code {
        200..=299 => colors.status.success,
        300..=399 => colors.status.redirect,
        _ => colors.status.error,
    };

    Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

pub fn time_tag(response: &ResponseRecord, colors: &Colors) -> Span<'static> {
    Span::styled(
        format!(" {} ", format_elapsed(response.elapsed_time_ms)),
        Style::default().fg(colors.text.default),
    )
}

pub fn size_tag(response: &ResponseRecord, colors: &Colors) -> Span<'static> {
    Span::styled(
        format!(" {} ", format_bytes(response.bytes_read)),
        Style::default().fg(colors.text.default),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_tag_prefers_the_recorded_message() {
        let response = ResponseRecord {
            status_code: 200,
            status_message: "OK LOCAL".to_string(),
            ..ResponseRecord::default()
        };

        let span = status_tag(&response, &Colors::default());

        assert_eq!(span.content.as_ref(), " 200 OK LOCAL ");
    }

    #[test]
    fn status_tag_falls_back_to_canonical_reason() {
        let response = ResponseRecord {
            status_code: 404,
            status_message: String::new(),
            ..ResponseRecord::default()
        };

        let span = status_tag(&response, &Colors::default());

        assert_eq!(span.content.as_ref(), " 404 Not Found ");
    }

    #[test]
    fn tags_format_time_and_size() {
        let response = ResponseRecord {
            elapsed_time_ms: 1511,
            bytes_read: 2048,
            ..ResponseRecord::default()
        };
        let colors = Colors::default();

        assert_eq!(time_tag(&response, &colors).content.as_ref(), " 1.51 s ");
        assert_eq!(size_tag(&response, &colors).content.as_ref(), " 2.0 KB ");
    }
}
