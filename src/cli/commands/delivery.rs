//! Delivery commands

use std::path::Path;

use crate::cli::output::{delivery_line, emit, profile_line};
use crate::cli::{DeliveryCommand, Workspace};
use crate::errors::Result;
use crate::service::NewDelivery;

pub async fn run(cwd: Option<&Path>, json: bool, command: DeliveryCommand) -> Result<()> {
    let ws = Workspace::open(cwd)?;
    let actor = ws.actor().await?;
    let c = &ws.coordinator;

    let delivery = match command {
        DeliveryCommand::Create {
            title,
            address,
            description,
            scheduled,
            work_site,
        } => {
            let input = NewDelivery {
                title,
                description,
                delivery_address: address,
                scheduled_date: scheduled,
                work_site_id: work_site,
            };
            c.create_delivery(&actor, input).await?
        }
        DeliveryCommand::Assign { id, transporter } => c.assign_transporter(&actor, id, transporter).await?,
        DeliveryCommand::Start { id } => c.start_transit(&actor, id).await?,
        DeliveryCommand::Deliver { id } => c.mark_delivered(&actor, id).await?,
        DeliveryCommand::Complete { id } => c.complete_delivery(&actor, id).await?,
        DeliveryCommand::Transporters => {
            let transporters = c.list_transporters(&actor).await?;
            return emit(json, &transporters, |list| list.iter().for_each(profile_line));
        }
    };

    emit(json, &delivery, delivery_line)
}
