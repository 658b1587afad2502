/// Board export rendering and file output
///
/// An export is a plain-text report of one board: header, team, lifecycle
/// timestamps, completion count and the tasks grouped by status. Rendering
/// is pure; `write_export` places the result in the export directory through
/// a uniquely named temporary file and a rename, so readers never see a
/// partially written report.

use crate::models::board::Board;
use crate::models::task::{TaskStatus, TaskWithAssignee};
use crate::models::team::Team;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const RULE: &str = "================================================================";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// File name of a board's export inside the export directory
pub fn export_file_name(board_id: i32) -> String {
    format!("board-{}.txt", board_id)
}

/// Renders a board report
///
/// `team` is None only if the owning team vanished between reads.
pub fn render_board(
    board: &Board,
    team: Option<&Team>,
    tasks: &[TaskWithAssignee],
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    // writeln! into a String cannot fail
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Board #{}: {}", board.id, board.name);
    let _ = writeln!(out, "{}", RULE);

    let team_line = match team {
        Some(team) => format!("{} (#{})", team.name, team.id),
        None => format!("#{}", board.team_id),
    };
    let _ = writeln!(out, "Team:        {}", team_line);
    let _ = writeln!(out, "Status:      {}", board.status);
    let _ = writeln!(out, "Created:     {}", board.creation_time.format(TIME_FORMAT));
    let _ = writeln!(
        out,
        "Closed:      {}",
        board
            .end_time
            .map(|t| t.format(TIME_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    let _ = writeln!(out, "Description: {}", or_dash(&board.description));
    let _ = writeln!(out);

    let complete = tasks.iter().filter(|t| t.status.is_complete()).count();
    let _ = writeln!(out, "Progress: {}/{} tasks complete", complete, tasks.len());

    if tasks.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No tasks on this board.");
    } else {
        for status in TaskStatus::ALL {
            let group: Vec<&TaskWithAssignee> =
                tasks.iter().filter(|t| t.status == status).collect();

            let _ = writeln!(out);
            let _ = writeln!(out, "[{}] ({})", status, group.len());
            if group.is_empty() {
                let _ = writeln!(out, "  (none)");
            }
            for task in group {
                let _ = writeln!(out, "  #{} {}", task.id, task.title);
                let _ = writeln!(out, "      Assignee: {} (#{})", task.assignee, task.user_id);
                let _ = writeln!(out, "      Created:  {}", task.creation_time.format(TIME_FORMAT));
                if !task.description.is_empty() {
                    let _ = writeln!(out, "      {}", task.description);
                }
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Exported {}", generated_at.format(TIME_FORMAT));
    out
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Writes a rendered report to `<dir>/board-<id>.txt`
///
/// Creates `dir` if needed. The report is first written to a temporary
/// file in the same directory, then renamed over the final path.
pub async fn write_export(dir: &Path, board_id: i32, contents: &str) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let file_name = export_file_name(board_id);
    let final_path = dir.join(&file_name);
    let tmp_path = dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    tokio::fs::write(&tmp_path, contents).await?;

    if let Err(e) = tokio::fs::rename(&tmp_path, &final_path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e);
    }

    debug!(path = %final_path.display(), bytes = contents.len(), "Wrote board export");
    Ok(final_path)
}
