//! Notification commands

use std::path::Path;

use crate::cli::output::{emit, notification_line};
use crate::cli::{NotificationsCommand, Workspace};
use crate::domain::notification_scope;
use crate::errors::Result;
use crate::schemas::Notification;
use crate::store::{fetch_records, Filter};

pub async fn run(cwd: Option<&Path>, json: bool, command: NotificationsCommand) -> Result<()> {
    let ws = Workspace::open(cwd)?;
    let actor = ws.actor().await?;
    let c = &ws.coordinator;

    match command {
        NotificationsCommand::List { unread } => {
            let mut query = notification_scope(&actor).limit(ws.config.limits.notifications);
            if unread {
                query = query.filter(Filter::eq("read", false));
            }
            let notifications: Vec<Notification> = fetch_records(c.store(), &query).await?;
            emit(json, &notifications, |list| list.iter().for_each(notification_line))
        }
        NotificationsCommand::Read { id } => {
            let notification = c.mark_notification_read(&actor, id).await?;
            emit(json, &notification, notification_line)
        }
        NotificationsCommand::ReadAll => {
            let count = c.mark_all_notifications_read(&actor).await?;
            emit(json, &serde_json::json!({ "marked_read": count }), |_| {
                println!("Marked {} notification(s) as read", count)
            })
        }
    }
}
