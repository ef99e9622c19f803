//! Work assignment commands

use std::path::Path;

use crate::cli::output::{assignment_line, emit};
use crate::cli::{AssignmentCommand, Workspace};
use crate::errors::Result;

pub async fn run(cwd: Option<&Path>, json: bool, command: AssignmentCommand) -> Result<()> {
    let ws = Workspace::open(cwd)?;
    let actor = ws.actor().await?;
    let c = &ws.coordinator;

    let assignment = match command {
        AssignmentCommand::Start { id } => c.start_assignment(&actor, id).await?,
        AssignmentCommand::Complete { id } => c.complete_assignment(&actor, id).await?,
        AssignmentCommand::Cancel { id } => c.cancel_assignment(&actor, id).await?,
    };

    emit(json, &assignment, assignment_line)
}
