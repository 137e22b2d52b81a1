//! Non-interactive page output for `artview page`.

use std::collections::BTreeMap;
use std::io::{self, Write};

use artview_client::Artwork;
use artview_core::{DisplayState, SelectionReconciler};

use crate::util;

const RANK_WIDTH: usize = 6;
const ID_WIDTH: usize = 8;
const CELL_WEIGHTS: [usize; 6] = [5, 2, 5, 3, 1, 1];
const TABLE_WIDTH: usize = 120;

/// Print the committed page as a plain text table: banner, checkbox column,
/// rows, footer with the selection summary.
pub(crate) fn print_plain(rec: &SelectionReconciler<Artwork>) -> io::Result<()> {
    let out = io::stdout();
    let mut w = out.lock();
    let state = rec.display_state();

    writeln!(w, "{}", state.banner())?;

    let fixed = 4 + RANK_WIDTH + 1 + ID_WIDTH + 1 + Artwork::COLUMNS.len();
    let widths = util::split_widths(TABLE_WIDTH.saturating_sub(fixed), &CELL_WEIGHTS, 4);

    // Header
    write!(w, "    {:>rw$} {:>iw$} ", "#", "id", rw = RANK_WIDTH, iw = ID_WIDTH)?;
    for (name, cw) in Artwork::COLUMNS.iter().zip(&widths) {
        write!(w, "{} ", util::fit(name, *cw))?;
    }
    writeln!(w)?;

    // Separator
    writeln!(w, "{}", "-".repeat(fixed + widths.iter().sum::<usize>()))?;

    // Rows
    for row in &state.rows {
        let mark = match (row.selected, row.overridden) {
            (true, false) => "[x]",
            (true, true) => "[X]",
            (false, false) => "[ ]",
            (false, true) => "[-]",
        };
        write!(w, "{} {:>rw$} {:>iw$} ", mark, row.rank, row.record.id, rw = RANK_WIDTH, iw = ID_WIDTH)?;
        for (cell, cw) in row.record.cells().iter().zip(&widths) {
            write!(w, "{} ", util::fit(cell, *cw))?;
        }
        writeln!(w)?;
    }
    if state.rows.is_empty() {
        writeln!(w, "(no records on this page)")?;
    }

    writeln!(w)?;
    writeln!(w, "{}    {}", state.footer, state.selected_summary())?;
    Ok(())
}

/// JSON document describing the page and the selection state.
pub(crate) fn to_json(rec: &SelectionReconciler<Artwork>) -> serde_json::Value {
    let state: DisplayState<'_, Artwork> = rec.display_state();
    let rows: Vec<serde_json::Value> = state
        .rows
        .iter()
        .map(|row| {
            serde_json::json!({
                "rank": row.rank,
                "id": row.record.id,
                "selected": row.selected,
                "overridden": row.overridden,
                "title": row.record.title,
                "place_of_origin": row.record.place_of_origin,
                "artist_display": row.record.artist_display,
                "inscriptions": row.record.inscriptions_display(),
                "date_start": row.record.date_start,
                "date_end": row.record.date_end,
            })
        })
        .collect();

    // Sorted for stable output.
    let overrides: BTreeMap<u64, bool> = rec
        .selection()
        .overrides()
        .iter()
        .map(|(id, forced)| (id.0, *forced))
        .collect();

    serde_json::json!({
        "page": state.page,
        "page_size": rec.navigator().page_size(),
        "page_count": state.page_count,
        "total_count": state.total_count,
        "virtual_count": rec.virtual_count(),
        "total_selected": state.total_selected,
        "footer": state.footer,
        "overrides": overrides,
        "rows": rows,
    })
}
