//! Worker commands - list workers, assign them to a delivery

use std::path::Path;

use crate::cli::output::{assignment_line, emit, profile_line};
use crate::cli::{WorkerText, WorkersCommand, Workspace};
use crate::domain::TaskBrief;
use crate::errors::{InsituError, Result};
use crate::service::WorkerPick;
use uuid::Uuid;

/// Text for `worker_id`: its own entry if given, else the shared one
fn text_for(worker_id: Uuid, own: &[WorkerText], shared: &Option<String>) -> Option<String> {
    own.iter()
        .rev()
        .find(|t| t.worker_id == worker_id)
        .map(|t| t.text.clone())
        .or_else(|| shared.clone())
}

/// Combine shared and per-worker texts into one pick per worker.
///
/// A per-worker entry for someone not selected is a validation error.
fn build_picks(
    workers: Vec<Uuid>,
    instructions: Option<String>,
    safety: Option<String>,
    worker_instructions: &[WorkerText],
    worker_safety: &[WorkerText],
) -> Result<Vec<WorkerPick>> {
    if let Some(stray) = worker_instructions
        .iter()
        .chain(worker_safety)
        .find(|t| !workers.contains(&t.worker_id))
    {
        return Err(InsituError::Validation(format!(
            "worker {} has texts but is not selected with --worker",
            stray.worker_id
        )));
    }

    Ok(workers
        .into_iter()
        .map(|worker_id| WorkerPick {
            worker_id,
            special_instructions: text_for(worker_id, worker_instructions, &instructions),
            safety_requirements: text_for(worker_id, worker_safety, &safety),
        })
        .collect())
}

pub async fn run(cwd: Option<&Path>, json: bool, command: WorkersCommand) -> Result<()> {
    let ws = Workspace::open(cwd)?;
    let actor = ws.actor().await?;
    let c = &ws.coordinator;

    match command {
        WorkersCommand::List => {
            let workers = c.list_workers(&actor).await?;
            emit(json, &workers, |list| list.iter().for_each(profile_line))
        }
        WorkersCommand::Assign {
            delivery,
            workers,
            title,
            description,
            instructions,
            safety,
            worker_instructions,
            worker_safety,
        } => {
            let picks = build_picks(workers, instructions, safety, &worker_instructions, &worker_safety)?;
            let brief = TaskBrief { title, description };
            let assignments = c.assign_workers(&actor, delivery, brief, picks).await?;
            emit(json, &assignments, |list| {
                println!("Created {} assignment(s)", list.len());
                list.iter().for_each(assignment_line);
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_worker_text_overrides_shared() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let own = vec![WorkerText {
            worker_id: b,
            text: "Spotter on the crane".to_string(),
        }];
        let picks = build_picks(vec![a, b], Some("Gate 3".to_string()), None, &own, &[]).unwrap();

        assert_eq!(picks[0].special_instructions.as_deref(), Some("Gate 3"));
        assert_eq!(picks[1].special_instructions.as_deref(), Some("Spotter on the crane"));
        assert!(picks.iter().all(|p| p.safety_requirements.is_none()));
    }

    #[test]
    fn test_text_for_unselected_worker_rejected() {
        let stray = vec![WorkerText {
            worker_id: Uuid::new_v4(),
            text: "Hard hat".to_string(),
        }];
        let err = build_picks(vec![Uuid::new_v4()], None, None, &[], &stray).unwrap_err();
        assert!(matches!(err, InsituError::Validation(_)));
    }
}
