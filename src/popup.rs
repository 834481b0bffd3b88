//! Marker popup content
//!
//! The delete control is a pure function of (sighting, session): it is
//! present iff the signed-in identity reported the sighting. It is only a
//! UI hint; the server enforces ownership.

use crate::config::Messages;
use crate::types::{Session, Sighting};

/// CSS class the page's click handler looks for
pub const DELETE_BUTTON_CLASS: &str = "delete-button";

/// Rendered popup for one marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub html: String,
    pub delete_affordance: bool,
}

/// Whether a popup for `sighting` offers deletion under `session`
pub fn has_delete_affordance(sighting: &Sighting, session: &Session) -> bool {
    session.owns(sighting)
}

pub fn render(sighting: &Sighting, session: &Session, messages: &Messages) -> PopupContent {
    let delete_affordance = has_delete_affordance(sighting, session);

    let mut html = format!(
        "{}<br><br><b>{}</b> {}<br>",
        escape_html(&messages.popup_title),
        escape_html(&messages.popup_reported_at),
        escape_html(&sighting.timestamp),
    );

    if delete_affordance {
        html.push_str(&format!(
            "<button class=\"{}\" data-location-id=\"{}\">{}</button>",
            DELETE_BUTTON_CLASS,
            escape_html(sighting.id.as_str()),
            escape_html(&messages.popup_delete_button),
        ));
    }

    PopupContent {
        html,
        delete_affordance,
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sighting(id: &str, reporter: &str) -> Sighting {
        Sighting {
            id: id.into(),
            lat: 35.0,
            lng: 139.0,
            timestamp: "2025年10月01日 09時15分00秒".into(),
            reporter_id: reporter.into(),
        }
    }

    #[test]
    fn test_owner_gets_delete_button() {
        let popup = render(&sighting("1", "u1"), &Session::signed_in("u1"), &Messages::default());

        assert!(popup.delete_affordance);
        assert!(popup.html.contains("class=\"delete-button\""));
        assert!(popup.html.contains("data-location-id=\"1\""));
        assert!(popup.html.contains("2025年10月01日"));
    }

    #[test]
    fn test_other_reporter_gets_no_button() {
        let popup = render(&sighting("2", "u2"), &Session::signed_in("u1"), &Messages::default());

        assert!(!popup.delete_affordance);
        assert!(!popup.html.contains(DELETE_BUTTON_CLASS));
    }

    #[test]
    fn test_anonymous_gets_no_button() {
        let popup = render(&sighting("1", "u1"), &Session::anonymous(), &Messages::default());
        assert!(!popup.delete_affordance);
    }

    #[test]
    fn test_interpolated_text_is_escaped() {
        let mut hostile = sighting("\"><script>", "u1");
        hostile.timestamp = "<img src=x onerror=alert(1)>".into();

        let popup = render(&hostile, &Session::signed_in("u1"), &Messages::default());

        assert!(!popup.html.contains("<script>"));
        assert!(!popup.html.contains("<img"));
        assert!(popup.html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(popup.html.contains("data-location-id=\"&quot;&gt;&lt;script&gt;\""));
    }

    proptest! {
        #[test]
        fn prop_affordance_iff_reporter_is_viewer(
            reporter in "u[0-9]{1,2}",
            viewer in proptest::option::of("u[0-9]{1,2}"),
        ) {
            let record = sighting("1", &reporter);
            let session = match &viewer {
                Some(user) => Session::signed_in(user.as_str()),
                None => Session::anonymous(),
            };

            let popup = render(&record, &session, &Messages::default());
            let expected = viewer.as_deref() == Some(reporter.as_str());

            prop_assert_eq!(popup.delete_affordance, expected);
            prop_assert_eq!(popup.html.contains(DELETE_BUTTON_CLASS), expected);
        }
    }
}
