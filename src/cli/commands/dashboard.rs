//! Dashboard command - Show the role-scoped dashboard

use std::path::Path;

use crate::cli::output::{
    actions_line, assignment_line, delivery_line, emit, notification_line, request_line,
    work_site_line,
};
use crate::cli::Workspace;
use crate::domain::Tab;
use crate::errors::{InsituError, Result};
use crate::service::DashboardSnapshot;

fn parse_tab(name: &str) -> Result<Tab> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| InsituError::Validation(format!("unknown tab: {}", name)))
}

fn print_tab(snapshot: &DashboardSnapshot, tab: Tab) {
    println!("== {} ==", tab);
    let empty = match tab {
        Tab::Deliveries => {
            for d in &snapshot.deliveries {
                delivery_line(d);
                actions_line(snapshot.actions.for_delivery(d.id));
            }
            snapshot.deliveries.is_empty()
        }
        Tab::Requests => {
            for r in &snapshot.requests {
                request_line(r);
                actions_line(snapshot.actions.for_request(r.id));
            }
            snapshot.requests.is_empty()
        }
        Tab::Assignments => {
            for a in &snapshot.assignments {
                assignment_line(a);
                actions_line(snapshot.actions.for_assignment(a.id));
            }
            snapshot.assignments.is_empty()
        }
        Tab::Worksites => {
            snapshot.work_sites.iter().for_each(work_site_line);
            snapshot.work_sites.is_empty()
        }
        Tab::Notifications => {
            snapshot.notifications.iter().for_each(notification_line);
            snapshot.notifications.is_empty()
        }
    };
    if empty {
        println!("(nothing here)");
    }
}

pub async fn run(cwd: Option<&Path>, json: bool, tab: Option<&str>) -> Result<()> {
    let ws = Workspace::open(cwd)?;
    let actor = ws.actor().await?;
    let snapshot = ws.coordinator.load_dashboard(&actor).await?;

    let only = tab.map(parse_tab).transpose()?;
    if let Some(tab) = only {
        if !snapshot.tabs.contains(&tab) {
            return Err(InsituError::Forbidden(format!(
                "{} has no {} tab",
                snapshot.profile.role, tab
            )));
        }
    }

    emit(json, &snapshot, |s| {
        let stats = &s.stats;
        println!("{} ({})", s.profile.full_name, s.profile.role);
        println!(
            "deliveries: {} total, {} pending, {} completed | assignments pending: {} | unread: {}",
            stats.total_deliveries,
            stats.pending_deliveries,
            stats.completed_deliveries,
            stats.pending_assignments,
            stats.unread_notifications
        );
        match only {
            Some(tab) => print_tab(s, tab),
            None => s.tabs.iter().for_each(|tab| print_tab(s, *tab)),
        }
    })
}
