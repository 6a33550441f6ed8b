use crate::models::Note;

/// Pure derivations over the current collection and the live search term.
/// Recomputed from scratch in the view on every keystroke; at this data
/// scale no cache is warranted, and keeping these referentially pure keeps
/// them trivially testable.
///
/// The two derivations intentionally match on different fields: filtering
/// looks at title OR content, suggestions at the title only. A note whose
/// body matches is filtered in but never suggested.

/// Notes whose title or content contains `term`, case-insensitive.
/// An empty term yields the whole collection.
pub(crate) fn filtered_notes(notes: &[Note], term: &str) -> Vec<Note> {
    let q = term.to_lowercase();
    notes
        .iter()
        .filter(|n| n.title.to_lowercase().contains(&q) || n.content.to_lowercase().contains(&q))
        .cloned()
        .collect()
}

/// Title-only completion candidates: unique titles (exact string equality)
/// in collection order, capped at 5. An empty term suggests nothing.
pub(crate) fn suggestions(notes: &[Note], term: &str) -> Vec<String> {
    if term.is_empty() {
        return vec![];
    }

    let q = term.to_lowercase();
    let mut out: Vec<String> = Vec::new();
    for n in notes {
        if n.title.to_lowercase().contains(&q) && !out.contains(&n.title) {
            out.push(n.title.clone());
            if out.len() == 5 {
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, title: &str, content: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            is_public: false,
        }
    }

    #[test]
    fn empty_term_filters_nothing_and_suggests_nothing() {
        let notes = vec![note("1", "A", "x"), note("2", "B", "y")];
        assert_eq!(filtered_notes(&notes, ""), notes);
        assert!(suggestions(&notes, "").is_empty());
    }

    #[test]
    fn filtering_matches_title_or_content_case_insensitively() {
        let notes = vec![
            note("1", "Groceries", "milk, eggs"),
            note("2", "Work", "ship the MILK feature"),
            note("3", "Travel", "pack light"),
        ];
        let hits = filtered_notes(&notes, "Milk");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "1");
        assert_eq!(hits[1].id, "2");
    }

    #[test]
    fn content_match_filters_in_but_is_not_suggested() {
        // Term matches the content only: the note appears in results while
        // the suggestion list stays empty.
        let notes = vec![note("1", "Meeting Notes", "agenda")];
        let hits = filtered_notes(&notes, "agenda");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");
        assert!(suggestions(&notes, "agenda").is_empty());
    }

    #[test]
    fn suggestions_keep_collection_order() {
        let notes = vec![note("1", "Plan A", ""), note("2", "Plan B", "")];
        assert_eq!(suggestions(&notes, "plan"), vec!["Plan A", "Plan B"]);
    }

    #[test]
    fn suggestions_deduplicate_exact_titles() {
        let notes = vec![
            note("1", "Todo", ""),
            note("2", "Todo", ""),
            note("3", "todo", ""),
        ];
        // Case-differing titles are distinct strings; exact duplicates fold.
        assert_eq!(suggestions(&notes, "todo"), vec!["Todo", "todo"]);
    }

    #[test]
    fn suggestions_cap_at_five() {
        let notes: Vec<Note> = (0..9)
            .map(|i| note(&i.to_string(), &format!("Daily log {i}"), ""))
            .collect();
        let s = suggestions(&notes, "daily");
        assert_eq!(s.len(), 5);
        assert_eq!(s[0], "Daily log 0");
        assert_eq!(s[4], "Daily log 4");
    }

    #[test]
    fn derivations_leave_inputs_untouched() {
        let notes = vec![note("1", "A", "a")];
        let before = notes.clone();
        let _ = filtered_notes(&notes, "a");
        let _ = suggestions(&notes, "a");
        assert_eq!(notes, before);
    }
}
