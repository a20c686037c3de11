//! Flowdeck — collaborative kanban board state sync demo.
//!
//! Runs the whole stack against the in-memory store: an editor applies
//! optimistic moves, a viewer gets rejected and rolled back, and the
//! reconciler converges the editor's view after the debounce window.
//!
//! ```bash
//! cargo run --bin flowdeck
//!
//! # Tighter debounce, verbose logs
//! cargo run --bin flowdeck -- --debounce-ms 100 --log-level debug
//! ```

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use flowdeck::board::BoardHandle;
use flowdeck::config::{CliArgs, ClientConfig};
use flowdeck::optimistic::OptimisticExecutor;
use flowdeck::reconcile::Reconciler;
use flowdeck_core::action::BoardAction;
use flowdeck_core::model::{BoardState, Role};
use flowdeck_core::notify::ChangeNotifier;
use flowdeck_core::store::{BoardStore, StoreError};
use flowdeck_store::MemoryStore;

#[tokio::main]
async fn main() -> Result<(), StoreError> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Logs go to a file so the demo output stays readable.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("flowdeck starting");
    run_demo(&config).await?;
    tracing::info!("flowdeck exiting");
    Ok(())
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure
/// all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let log_path = file_path.map_or_else(
        || std::env::temp_dir().join("flowdeck.log"),
        Path::to_path_buf,
    );
    let appender =
        tracing_appender::rolling::never(log_path.parent()?, log_path.file_name()?);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(level))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Log filter resolution: the `--log-level` flag wins; `RUST_LOG` is
/// consulted only when the flag's value does not parse, and `info` is
/// the last resort.
fn log_filter(level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_new(level)
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

async fn run_demo(config: &ClientConfig) -> Result<(), StoreError> {
    let store = Arc::new(MemoryStore::new());

    // One editor (the board owner) and one read-only collaborator.
    let editor = store.register_user(&config.display_name).await.user_id;
    let viewer = store.register_user("viewer").await.user_id;
    let board_id = store.create_board(editor, "Launch plan").await?;
    store
        .add_member(editor, board_id, viewer, Role::Viewer)
        .await?;

    // Seed a few tasks through the store.
    let initial = store.fetch_board(editor, board_id).await?;
    let todo = column_id_at(&initial, 0)?;
    let doing = column_id_at(&initial, 1)?;
    for title in ["Write release notes", "Fix login flow", "Tag the build"] {
        store.create_task(editor, board_id, todo, title).await?;
    }

    // The editor's view: board handle, executor, and reconciler.
    let board = BoardHandle::new(store.fetch_board(editor, board_id).await?);
    let (notice_tx, _notices) = mpsc::channel(config.notice_buffer);
    let executor = OptimisticExecutor::new(board.clone(), notice_tx);
    let reconciler = Reconciler::spawn(
        board.clone(),
        Arc::clone(&store),
        editor,
        board_id,
        store.notifier().subscribe(board_id),
        config.debounce,
    );

    println!("Initial board:");
    print_board(&board.snapshot());

    // Optimistic move, confirmed by the store.
    let snapshot = board.snapshot();
    let task = snapshot
        .column(todo)
        .and_then(|c| c.tasks.first())
        .ok_or_else(|| StoreError::NotFound("task".to_string()))?
        .clone();
    let forward = BoardAction::MoveTask {
        task_id: task.id,
        from_column: todo,
        to_column: doing,
        from_index: task.position,
        to_index: 0,
    };
    let inverse = BoardAction::MoveTask {
        task_id: task.id,
        from_column: doing,
        to_column: todo,
        from_index: 0,
        to_index: task.position,
    };
    executor
        .execute(
            forward,
            inverse,
            "move task",
            store.move_task(editor, task.id, doing, 0),
        )
        .await?;

    println!("\nAfter the editor moves \"{}\":", task.title);
    print_board(&board.snapshot());

    // The viewer tries the same gesture: locally applied, then rejected
    // by the store and rolled back.
    let viewer_board = BoardHandle::new(store.fetch_board(viewer, board_id).await?);
    let (viewer_tx, mut viewer_notices) = mpsc::channel(config.notice_buffer);
    let viewer_executor = OptimisticExecutor::new(viewer_board.clone(), viewer_tx);
    let viewer_snapshot = viewer_board.snapshot();
    let viewer_task = viewer_snapshot
        .column(todo)
        .and_then(|c| c.tasks.first())
        .ok_or_else(|| StoreError::NotFound("task".to_string()))?
        .clone();
    let result = viewer_executor
        .execute(
            BoardAction::MoveTask {
                task_id: viewer_task.id,
                from_column: todo,
                to_column: doing,
                from_index: viewer_task.position,
                to_index: 0,
            },
            BoardAction::MoveTask {
                task_id: viewer_task.id,
                from_column: doing,
                to_column: todo,
                from_index: 0,
                to_index: viewer_task.position,
            },
            "move task",
            store.move_task(viewer, viewer_task.id, doing, 0),
        )
        .await;

    if let Err(err) = result {
        println!("\nViewer's move was rejected ({err}):");
    }
    if let Ok(notice) = viewer_notices.try_recv() {
        println!("  notice: {}", notice.message);
    }
    print_board(&viewer_board.snapshot());

    // Let the debounce window elapse so the editor's reconciler refetches.
    tokio::time::sleep(config.debounce * 2).await;
    println!("\nEditor's view after reconciliation:");
    print_board(&board.snapshot());

    reconciler.stop().await;
    Ok(())
}

/// Id of the column at a display index.
fn column_id_at(
    state: &BoardState,
    index: usize,
) -> Result<flowdeck_core::id::ColumnId, StoreError> {
    state
        .columns
        .get(index)
        .map(|c| c.id)
        .ok_or_else(|| StoreError::NotFound("column".to_string()))
}

fn print_board(state: &BoardState) {
    for column in &state.columns {
        println!("  {} ({} tasks)", column.title, column.tasks.len());
        for task in &column.tasks {
            println!("    [{}] {}", task.position, task.title);
        }
    }
}
