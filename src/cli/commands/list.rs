//! List artifacts command handler

use crate::cli::commands::{format_date, parse_kind};
use crate::constants::limits::DEFAULT_PAGE_SIZE;
use crate::state::AppState;

pub async fn cmd_list_artifacts(
    state: &AppState,
    kind: &str,
    page: u64,
    search: Option<String>,
) -> anyhow::Result<()> {
    let Some(kind) = parse_kind(kind) else {
        return Ok(());
    };

    let summaries = state
        .artifacts
        .list_artifacts(kind, page, DEFAULT_PAGE_SIZE, search.as_deref())
        .await?;

    if summaries.is_empty() {
        if page == 0 {
            println!("No {kind} artifacts in the library.");
            println!();
            println!("Add one with: kiroku add {kind} \"title\"");
        } else {
            println!("No {kind} artifacts on page {page}.");
        }
        return Ok(());
    }

    println!("{} artifacts (page {})", kind, page);
    println!("{:-<70}", "");
    for summary in summaries {
        println!(
            "{:>5}  {}  [{}]",
            summary.id.value(),
            summary.title,
            format_date(summary.release_date)
        );
    }

    Ok(())
}
