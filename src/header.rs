//! Custom header injected into both surfaces.
//!
//! Stateless and purely presentational: a mark-all-read action plus an
//! optional icon. Both consume their clicks so the action never also
//! toggles the popover it lives inside.

use std::rc::Rc;

use serde_json::json;

use crate::config::HeaderTheme;
use crate::host::Cleanup;
use crate::host::arena::{
    create_element, pop_parent_context, push_parent_context, remove_subtree, set_click_handler,
    set_props,
};
use crate::i18n;
use crate::types::{CallbackProp, StyleMap};

/// Inputs for the header, extracted from the surface configuration.
pub(crate) struct HeaderProps {
    pub mark_all_read: Rc<dyn Fn()>,
    pub header_icon_url: Option<String>,
    pub header_icon_click_handler: Option<CallbackProp>,
    pub theme: Option<HeaderTheme>,
}

fn default_mark_all_read_style() -> StyleMap {
    StyleMap::new()
        .with("font-weight", "600")
        .with("color", "#2E70E8")
        .with("font-size", "12px")
        .with("cursor", "pointer")
        .with("margin", "0")
}

fn default_icon_style() -> StyleMap {
    StyleMap::new()
        .with("height", "18px")
        .with("width", "18px")
        .with("cursor", "pointer")
}

/// Render the header-right region under the current parent context.
pub(crate) fn header_right(props: HeaderProps) -> Cleanup {
    let container = create_element("header-right");

    let theme = props.theme.unwrap_or_default();

    push_parent_context(container);

    let text_style = theme
        .mark_all_read_text
        .unwrap_or_default()
        .merged_over(&default_mark_all_read_style());
    let mark_all = create_element("mark-all-read");
    set_props(
        mark_all,
        json!({
            "text": i18n::tr("mark-all-read"),
            "style": text_style,
        }),
    );
    let on_mark_all = props.mark_all_read;
    set_click_handler(
        mark_all,
        Rc::new(move || {
            on_mark_all();
            true
        }),
    );

    if let Some(url) = props.header_icon_url {
        let icon_style = theme
            .header_icon
            .unwrap_or_default()
            .merged_over(&default_icon_style());
        let icon = create_element("header-icon");
        set_props(
            icon,
            json!({
                "src": url,
                "alt": i18n::tr("header-icon-alt"),
                "style": icon_style,
            }),
        );
        let on_icon = props.header_icon_click_handler;
        set_click_handler(
            icon,
            Rc::new(move || {
                if let Some(handler) = &on_icon {
                    handler.call();
                }
                true
            }),
        );
    }

    pop_parent_context();

    Box::new(move || remove_subtree(container))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::host::arena::{
        children_of, push_parent_context, pop_parent_context, reset_host_state, tag_of,
    };
    use crate::host::events::click;

    fn find_child(parent: usize, tag: &str) -> Option<usize> {
        children_of(parent)
            .into_iter()
            .find(|&c| tag_of(c).as_deref() == Some(tag))
    }

    fn render(props: HeaderProps) -> (usize, Cleanup) {
        let popover = create_element("inbox-popover");
        push_parent_context(popover);
        let cleanup = header_right(props);
        pop_parent_context();
        (popover, cleanup)
    }

    #[test]
    fn test_mark_all_read_invokes_callback_and_consumes_click() {
        reset_host_state();
        let calls = Rc::new(Cell::new(0));
        let calls_cb = calls.clone();

        let (popover, _cleanup) = render(HeaderProps {
            mark_all_read: Rc::new(move || calls_cb.set(calls_cb.get() + 1)),
            header_icon_url: None,
            header_icon_click_handler: None,
            theme: None,
        });

        // A toggle on the popover that must NOT fire.
        let toggled = Rc::new(Cell::new(false));
        let toggled_cb = toggled.clone();
        set_click_handler(
            popover,
            Rc::new(move || {
                toggled_cb.set(true);
                false
            }),
        );

        let header = find_child(popover, "header-right").unwrap();
        let mark_all = find_child(header, "mark-all-read").unwrap();
        assert!(click(mark_all));

        assert_eq!(calls.get(), 1);
        assert!(!toggled.get(), "click must not bubble into the popover toggle");
    }

    #[test]
    fn test_icon_rendered_only_when_url_configured() {
        reset_host_state();
        let (popover, _cleanup) = render(HeaderProps {
            mark_all_read: Rc::new(|| {}),
            header_icon_url: None,
            header_icon_click_handler: None,
            theme: None,
        });
        let header = find_child(popover, "header-right").unwrap();
        assert!(find_child(header, "header-icon").is_none());

        reset_host_state();
        let (popover, _cleanup) = render(HeaderProps {
            mark_all_read: Rc::new(|| {}),
            header_icon_url: Some("https://example.com/bell.png".into()),
            header_icon_click_handler: None,
            theme: None,
        });
        let header = find_child(popover, "header-right").unwrap();
        assert!(find_child(header, "header-icon").is_some());
    }

    #[test]
    fn test_icon_click_invokes_handler_and_consumes() {
        reset_host_state();
        let calls = Rc::new(Cell::new(0));
        let calls_cb = calls.clone();

        let (popover, _cleanup) = render(HeaderProps {
            mark_all_read: Rc::new(|| {}),
            header_icon_url: Some("https://example.com/bell.png".into()),
            header_icon_click_handler: Some(CallbackProp::new(move || {
                calls_cb.set(calls_cb.get() + 1);
            })),
            theme: None,
        });

        let header = find_child(popover, "header-right").unwrap();
        let icon = find_child(header, "header-icon").unwrap();
        assert!(click(icon));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_theme_overrides_merge_over_defaults() {
        reset_host_state();
        let (popover, _cleanup) = render(HeaderProps {
            mark_all_read: Rc::new(|| {}),
            header_icon_url: None,
            header_icon_click_handler: None,
            theme: Some(HeaderTheme {
                mark_all_read_text: Some(StyleMap::new().with("color", "#111")),
                header_icon: None,
            }),
        });

        let header = find_child(popover, "header-right").unwrap();
        let mark_all = find_child(header, "mark-all-read").unwrap();
        let props = crate::host::arena::props_of(mark_all).unwrap();
        assert_eq!(props["style"]["color"], "#111");
        assert_eq!(props["style"]["font-size"], "12px");
    }

    #[test]
    fn test_cleanup_removes_header() {
        reset_host_state();
        let (popover, cleanup) = render(HeaderProps {
            mark_all_read: Rc::new(|| {}),
            header_icon_url: None,
            header_icon_click_handler: None,
            theme: None,
        });
        assert_eq!(children_of(popover).len(), 1);
        cleanup();
        assert!(children_of(popover).is_empty());
    }
}
