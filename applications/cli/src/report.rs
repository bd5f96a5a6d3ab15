//! End-of-run messages for an import

use shelf_importer::ImportOutcome;

/// Lines to print once a run has finished
///
/// An empty run and a run with failures get separate notices; a run can
/// produce both.
pub fn outcome_messages(outcome: &ImportOutcome) -> Vec<String> {
    let mut lines = vec![outcome.summary_text()];

    if outcome.nothing_imported() && !outcome.cancelled {
        lines.push(format!("No new books found under {}", outcome.root.display()));
    }
    if outcome.needs_error_notice() {
        lines.push(format!(
            "{} book(s) could not be imported:",
            outcome.errors.len()
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::ShelfError;
    use std::path::Path;

    fn outcome(imported: usize) -> ImportOutcome {
        let mut outcome = ImportOutcome::new("/media/books");
        outcome.imported = imported;
        outcome.state = shelf_importer::ImportState::Completed;
        outcome
    }

    #[test]
    fn successful_run_prints_summary_only() {
        let lines = outcome_messages(&outcome(3));
        assert_eq!(lines, vec!["Import complete: 3 imported, 0 already in library, 0 failed"]);
    }

    #[test]
    fn empty_run_gets_its_own_notice() {
        let lines = outcome_messages(&outcome(0));

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "No new books found under /media/books");
    }

    #[test]
    fn failures_and_empty_run_are_reported_separately() {
        let mut run = outcome(0);
        run.record_failure(Path::new("/media/books/bad.epub"), &ShelfError::metadata("bad zip"));

        let lines = outcome_messages(&run);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "No new books found under /media/books");
        assert_eq!(lines[2], "1 book(s) could not be imported:");
    }

    #[test]
    fn cancelled_run_has_no_empty_notice() {
        let mut run = outcome(0);
        run.mark_cancelled();

        let lines = outcome_messages(&run);
        assert_eq!(lines, vec![run.summary_text()]);
    }
}
