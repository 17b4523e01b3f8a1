//! Bookkeeper column ordering and header-click sort cycling.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// The single active column sort, if any. Only one bookkeeper column can be
/// sorted at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub bookkeeper: String,
    pub descending: bool,
}

/// Advances the sort state for a header click on `clicked`.
///
/// Clicking the active column cycles ascending → descending → unsorted;
/// clicking any other column resets to ascending on that column.
pub fn toggle_sort(current: Option<SortState>, clicked: &str) -> Option<SortState> {
    match current {
        Some(state) if state.bookkeeper == clicked => {
            if state.descending {
                None
            } else {
                Some(SortState {
                    bookkeeper: state.bookkeeper,
                    descending: true,
                })
            }
        }
        _ => Some(SortState {
            bookkeeper: clicked.to_string(),
            descending: false,
        }),
    }
}

/// Returns the column order for the given sort state.
///
/// With no sort active the builder's first-seen order is returned exactly;
/// otherwise a sorted copy, never mutating the input.
pub fn sorted_bookkeepers(bookkeepers: &[String], sort: Option<&SortState>) -> Vec<String> {
    let mut ordered = bookkeepers.to_vec();
    if let Some(state) = sort {
        ordered.sort_by(|a, b| {
            let ord = compare_natural(a, b);
            if state.descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }
    ordered
}

/// Numeric-aware, case-insensitive string comparison: digit runs compare as
/// integers, so "Bookkeeper 9" sorts before "Bookkeeper 10".
pub fn compare_natural(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ac), Some(bc)) => {
                if ac.is_ascii_digit() && bc.is_ascii_digit() {
                    match compare_digit_runs(&mut ai, &mut bi) {
                        Ordering::Equal => {}
                        decided => return decided,
                    }
                } else {
                    match ac.to_lowercase().cmp(bc.to_lowercase()) {
                        Ordering::Equal => {
                            ai.next();
                            bi.next();
                        }
                        decided => return decided,
                    }
                }
            }
        }
    }
}

/// Compares two digit runs as integers without parsing, so arbitrarily long
/// runs cannot overflow: strip leading zeros, then longer run wins, then
/// lexicographic digits.
fn compare_digit_runs(
    a: &mut std::iter::Peekable<std::str::Chars<'_>>,
    b: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Ordering {
    let run_a = take_digit_run(a);
    let run_b = take_digit_run(b);
    let trimmed_a = run_a.trim_start_matches('0');
    let trimmed_b = run_b.trim_start_matches('0');

    trimmed_a
        .len()
        .cmp(&trimmed_b.len())
        .then_with(|| trimmed_a.cmp(trimmed_b))
}

fn take_digit_run(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(ch) = chars.peek().copied() {
        if !ch.is_ascii_digit() {
            break;
        }
        run.push(ch);
        chars.next();
    }
    run
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn no_sort_state_returns_builder_order_exactly() {
        let bookkeepers = keys(&["B3", "B1", "Bookkeeper 10", "B2"]);
        assert_eq!(sorted_bookkeepers(&bookkeepers, None), bookkeepers);
    }

    #[test]
    fn ascending_sort_is_numeric_aware() {
        let bookkeepers = keys(&["Bookkeeper 10", "Bookkeeper 9", "Bookkeeper 100"]);
        let sorted = sorted_bookkeepers(
            &bookkeepers,
            Some(&SortState {
                bookkeeper: "Bookkeeper 9".to_string(),
                descending: false,
            }),
        );
        assert_eq!(
            sorted,
            keys(&["Bookkeeper 9", "Bookkeeper 10", "Bookkeeper 100"])
        );
    }

    #[test]
    fn descending_sort_reverses_the_comparator() {
        let bookkeepers = keys(&["Bookkeeper 2", "Bookkeeper 11", "Bookkeeper 1"]);
        let sorted = sorted_bookkeepers(
            &bookkeepers,
            Some(&SortState {
                bookkeeper: "Bookkeeper 2".to_string(),
                descending: true,
            }),
        );
        assert_eq!(
            sorted,
            keys(&["Bookkeeper 11", "Bookkeeper 2", "Bookkeeper 1"])
        );
    }

    #[test]
    fn sorting_never_mutates_the_input() {
        let bookkeepers = keys(&["B2", "B1"]);
        let _ = sorted_bookkeepers(
            &bookkeepers,
            Some(&SortState {
                bookkeeper: "B1".to_string(),
                descending: false,
            }),
        );
        assert_eq!(bookkeepers, keys(&["B2", "B1"]));
    }

    #[test]
    fn header_clicks_cycle_unsorted_asc_desc_unsorted() {
        let state = toggle_sort(None, "B1");
        assert_eq!(
            state,
            Some(SortState {
                bookkeeper: "B1".to_string(),
                descending: false,
            })
        );

        let state = toggle_sort(state, "B1");
        assert_eq!(
            state,
            Some(SortState {
                bookkeeper: "B1".to_string(),
                descending: true,
            })
        );

        let state = toggle_sort(state, "B1");
        assert_eq!(state, None);
    }

    #[test]
    fn clicking_a_different_column_resets_to_ascending() {
        let state = toggle_sort(None, "B1");
        let state = toggle_sort(state, "B1");
        assert!(state.as_ref().is_some_and(|s| s.descending));

        let state = toggle_sort(state, "B2");
        assert_eq!(
            state,
            Some(SortState {
                bookkeeper: "B2".to_string(),
                descending: false,
            })
        );
    }

    #[test]
    fn natural_compare_handles_case_zeros_and_prefixes() {
        assert_eq!(compare_natural("bookkeeper 2", "Bookkeeper 10"), Ordering::Less);
        assert_eq!(compare_natural("B007", "B08"), Ordering::Less);
        // Equal numeric value with leading zeros: raw string breaks the tie.
        assert_eq!(compare_natural("B007", "B7"), Ordering::Less);
        assert_eq!(compare_natural("B2", "B2x"), Ordering::Less);
        assert_eq!(compare_natural("alpha", "Beta"), Ordering::Less);
        assert_eq!(compare_natural("B1", "B1"), Ordering::Equal);
    }
}
