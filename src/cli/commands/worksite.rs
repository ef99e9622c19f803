//! Work site commands

use std::path::Path;

use crate::cli::output::{emit, work_site_line};
use crate::cli::{Workspace, WorksiteCommand};
use crate::errors::Result;
use crate::service::NewWorkSite;

pub async fn run(cwd: Option<&Path>, json: bool, command: WorksiteCommand) -> Result<()> {
    let ws = Workspace::open(cwd)?;
    let actor = ws.actor().await?;
    let c = &ws.coordinator;

    match command {
        WorksiteCommand::Create {
            name,
            address,
            description,
        } => {
            let site = c
                .create_work_site(&actor, NewWorkSite { name, address, description })
                .await?;
            emit(json, &site, work_site_line)
        }
        WorksiteCommand::List => {
            let sites = c.list_work_sites(&actor).await?;
            emit(json, &sites, |list| list.iter().for_each(work_site_line))
        }
    }
}
