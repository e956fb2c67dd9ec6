//! Subcommand handlers. Each drives the library view and queues notices for
//! its outcome; user output goes to `out`.

use std::io::Write;

use gameshelf_feedback::{Action, NoticeQueue};
use gameshelf_library::{
    EntryId, EntryUpdate, FilterCriteria, LibraryError, LibraryView, PendingWrite,
    ReorderSurface, SortMode,
};
use tracing::debug;

use crate::cli::{AddArgs, Commands, EditArgs, ListArgs, ReorderArgs};
use crate::render;

/// The terminal reorders by explicit id lists passed to `gameshelf reorder`.
pub struct Terminal;

impl ReorderSurface for Terminal {
    fn supports_drag(&self) -> bool {
        true
    }
}

pub async fn run(
    command: Commands,
    view: &mut LibraryView,
    notices: &mut NoticeQueue,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Search(args) => search(&args.query, view, notices, out).await,
        Commands::List(args) => list(args, view, notices, out).await,
        Commands::Add(args) => add(args, view, notices, out).await,
        Commands::Edit(args) => edit(args, view, notices).await,
        Commands::Remove(args) => remove(args.id, view, notices).await,
        Commands::Reorder(args) => reorder(args, view, notices, out).await,
    }
}

/// Loads the library, queuing an error notice on failure.
async fn load(view: &mut LibraryView, notices: &mut NoticeQueue) -> bool {
    let result = view.load().await;
    if result.is_err() {
        notices.report(Action::Load, &result);
    }
    result.is_ok()
}

async fn settle(write: Result<PendingWrite, LibraryError>) -> Result<(), LibraryError> {
    write?.await
}

async fn search(
    query: &str,
    view: &LibraryView,
    notices: &mut NoticeQueue,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match view.search(query).await {
        Ok(hits) if hits.is_empty() => {
            notices.info("No games found");
        }
        Ok(hits) => write!(out, "{}", render::catalog_hits(&hits))?,
        Err(err) => {
            notices.report(Action::Search, &Err::<(), _>(err));
        }
    }
    Ok(())
}

async fn list(
    args: ListArgs,
    view: &mut LibraryView,
    notices: &mut NoticeQueue,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if !load(view, notices).await {
        return Ok(());
    }

    if let Some(sort) = args.sort {
        view.apply_sort_change(sort);
    }
    if !view.genre_options().contains(&args.genre) {
        notices.info(format!("No game in the library has genre {:?}", args.genre.label()));
    }
    view.apply_filter_change(FilterCriteria {
        status: args.status,
        genre: args.genre,
    });

    if args.json {
        let json = render::ListJson {
            sort: view.sort(),
            genres: view.genre_options().iter().map(|g| g.label()).collect(),
            groups: view.display_groups(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        return Ok(());
    }

    writeln!(out, "{}", render::criteria_line(view.filter(), view.sort()))?;
    writeln!(
        out,
        "{}",
        render::genre_line(view.genre_options(), &view.filter().genre)
    )?;
    write!(out, "{}", render::groups(view.display_groups()))?;
    if view.reorder_enabled(&Terminal) {
        writeln!(out, "Manual order: gameshelf reorder <id>...")?;
    }
    Ok(())
}

async fn add(
    args: AddArgs,
    view: &mut LibraryView,
    notices: &mut NoticeQueue,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let hits = match view.search(&args.query).await {
        Ok(hits) => hits,
        Err(err) => {
            notices.report(Action::Search, &Err::<(), _>(err));
            return Ok(());
        }
    };
    let Some(hit) = hits.get(args.pick) else {
        if hits.is_empty() {
            notices.info("No games found");
        } else {
            notices.error_with(
                "Could not add game",
                format!("pick {} is out of range, search returned {} hits", args.pick, hits.len()),
            );
        }
        return Ok(());
    };

    debug!(title = %hit.title, external_id = hit.external_id, "picked catalog hit");
    let fetch = view.submit_create(hit, args.status, args.rating);
    let result = view.complete_fetch(fetch.await);
    notices.report(Action::Add, &result);

    if result.is_ok() {
        write!(out, "{}", render::groups(view.display_groups()))?;
    }
    Ok(())
}

async fn edit(
    args: EditArgs,
    view: &mut LibraryView,
    notices: &mut NoticeQueue,
) -> anyhow::Result<()> {
    if !load(view, notices).await {
        return Ok(());
    }

    let update = match view.entry(args.id) {
        Some(entry) => EntryUpdate {
            id: entry.id,
            status: args.status.unwrap_or(entry.status),
            rating: args.rating.unwrap_or(entry.rating),
        },
        None => {
            notices.report(Action::Edit, &Err::<(), _>(LibraryError::NotFound(args.id)));
            return Ok(());
        }
    };

    let result = settle(view.submit_edit(update)).await;
    notices.report(Action::Edit, &result);
    Ok(())
}

async fn remove(id: EntryId, view: &mut LibraryView, notices: &mut NoticeQueue) -> anyhow::Result<()> {
    if !load(view, notices).await {
        return Ok(());
    }

    let result = settle(view.submit_delete(id)).await;
    notices.report(Action::Remove, &result);
    Ok(())
}

async fn reorder(
    args: ReorderArgs,
    view: &mut LibraryView,
    notices: &mut NoticeQueue,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if !load(view, notices).await {
        return Ok(());
    }
    view.apply_sort_change(SortMode::Custom);
    view.apply_filter_change(FilterCriteria::default());

    let order = visual_order(args.ids, view);
    let result = settle(view.submit_reorder(order)).await;
    notices.report(Action::Reorder, &result);

    write!(out, "{}", render::groups(view.display_groups()))?;
    Ok(())
}

/// The requested ids first, then the rest of the active group in its
/// current manual order.
fn visual_order(requested: Vec<EntryId>, view: &LibraryView) -> Vec<EntryId> {
    let mut order = requested;
    let rest: Vec<EntryId> = view
        .display_groups()
        .active
        .iter()
        .map(|e| e.id)
        .filter(|id| !order.contains(id))
        .collect();
    order.extend(rest);
    order
}
