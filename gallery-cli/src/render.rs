//! Text rendering of gallery frames and parsing of user input

use gallery_core::{GalleryView, ItemStatus};
use std::fmt::Write;

/// A line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Fetch(String),
    Next,
    Prev,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => Input::Empty,
        Some("fetch" | "f") => match parts.next() {
            Some(identity) => Input::Fetch(identity.to_string()),
            None => Input::Unknown(line.trim().to_string()),
        },
        Some("next" | "n") => Input::Next,
        Some("prev" | "p") => Input::Prev,
        Some("help" | "h" | "?") => Input::Help,
        Some("quit" | "q" | "exit") => Input::Quit,
        Some(_) => Input::Unknown(line.trim().to_string()),
    }
}

pub const HELP: &str = "commands: fetch <address> | next | prev | help | quit";

pub fn frame(view: &GalleryView) -> String {
    let mut out = String::new();

    let Some(owner) = &view.owner else {
        if let Some(error) = &view.last_error {
            let _ = writeln!(out, "error: {}", error);
        }
        if view.fetching {
            let _ = writeln!(out, "fetching…");
        }
        return out;
    };

    let _ = writeln!(out, "── {} · page {}/{} ──", owner, view.current_page, view.page_count);
    if let Some(error) = &view.last_error {
        let _ = writeln!(out, "error: {}", error);
    }
    if view.fetching {
        let _ = writeln!(out, "  fetching…");
    }

    if view.loading {
        let _ = writeln!(out, "  loading…");
    } else if view.items.is_empty() {
        let _ = writeln!(out, "  (no items)");
    } else {
        for item in &view.items {
            let marker = match item.status {
                ItemStatus::Ready => "",
                ItemStatus::Failed => " (metadata unavailable)",
                ItemStatus::Pending | ItemStatus::Loading => " (loading)",
            };
            let _ = writeln!(out, "  {}{}", item.name, marker);
            let _ = writeln!(out, "    {}", item.image_url_or_fallback);
        }
    }

    let prev = if view.can_go_prev { "[prev]" } else { " prev " };
    let next = if view.can_go_next { "[next]" } else { " next " };
    let _ = writeln!(out, "  {}  {}", prev, next);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::ItemView;

    fn view() -> GalleryView {
        GalleryView {
            owner: Some("Owner111".into()),
            items: vec![ItemView {
                address: "mint-0".into(),
                name: "Degen #1".into(),
                image_url_or_fallback: "https://example.com/1.png".into(),
                status: ItemStatus::Ready,
            }],
            loading: false,
            fetching: false,
            current_page: 1,
            page_count: 3,
            can_go_prev: false,
            can_go_next: true,
            last_error: None,
        }
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("fetch abc"), Input::Fetch("abc".into()));
        assert_eq!(parse_input("  n "), Input::Next);
        assert_eq!(parse_input("p"), Input::Prev);
        assert_eq!(parse_input(""), Input::Empty);
        assert_eq!(parse_input("q"), Input::Quit);
        assert_eq!(parse_input("fetch"), Input::Unknown("fetch".into()));
        assert_eq!(parse_input("jump 3"), Input::Unknown("jump 3".into()));
    }

    #[test]
    fn test_frame_shows_items_and_controls() {
        let text = frame(&view());
        assert!(text.contains("page 1/3"));
        assert!(text.contains("Degen #1"));
        assert!(text.contains("https://example.com/1.png"));
        assert!(text.contains(" prev   [next]"));
    }

    #[test]
    fn test_frame_hides_items_while_loading() {
        let mut v = view();
        v.loading = true;
        let text = frame(&v);
        assert!(text.contains("loading…"));
        assert!(!text.contains("Degen #1"));
    }

    #[test]
    fn test_frame_without_owner_shows_error_only() {
        let mut v = view();
        v.owner = None;
        v.last_error = Some("Invalid owner identity: \"x\"".into());
        assert_eq!(frame(&v), "error: Invalid owner identity: \"x\"\n");
    }

    #[test]
    fn test_frame_marks_outstanding_fetch_over_old_list() {
        let mut v = view();
        v.fetching = true;
        let text = frame(&v);
        assert!(text.contains("fetching…"));
        assert!(text.contains("Degen #1"));

        v.owner = None;
        assert_eq!(frame(&v), "fetching…\n");
    }
}
