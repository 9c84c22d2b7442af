use crate::tui::app::App;

/// `esc` in the list: clear the bulk selection, then leave search, then
/// close the details popup.
pub(super) fn handle_escape(app: &mut App) {
    if !app.selection.is_empty() || app.anchor.is_some() {
        app.clear_selection();
    } else if app.search.is_some() {
        app.set_search(None);
    } else if app.show_details {
        app.show_details = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::test_support::*;

    #[test]
    fn escape_clears_pending_anchor() {
        let (_tmp, mut app) = app_with(&["a", "b"]);
        app.range_selection();
        app.selection.clear();
        handle_escape(&mut app);
        assert_eq!(app.anchor, None);
    }

    #[test]
    fn escape_leaves_search_before_details() {
        let (_tmp, mut app) = app_with(&["a"]);
        app.show_details = true;
        app.search = Some("zz".into());
        handle_escape(&mut app);
        assert!(app.search.is_none());
        assert!(app.show_details);
    }
}
