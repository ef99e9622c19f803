//! Shared printing for command results

use serde::Serialize;

use crate::errors::Result;
use crate::schemas::{Delivery, Notification, UserProfile, WarehouseRequest, WorkAssignment, WorkSite};

/// Print `value` as pretty JSON, or run the human formatter
pub fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}

/// Indented "next:" line listing what the user may do with a record
pub fn actions_line<A: std::fmt::Display>(actions: &[A]) {
    if actions.is_empty() {
        return;
    }
    let names: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
    println!("    next: {}", names.join(", "));
}

pub fn delivery_line(d: &Delivery) {
    let assignee = d.assigned_to.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
    println!(
        "{}  {:<10}  {}  -> {}  (transporter: {})",
        d.id,
        d.status.as_str(),
        d.title,
        d.delivery_address,
        assignee
    );
}

pub fn request_line(r: &WarehouseRequest) {
    println!(
        "{}  {:<9}  {} x{}{}",
        r.id,
        r.status.as_str(),
        r.title,
        r.quantity,
        r.unit.as_deref().map(|u| format!(" {}", u)).unwrap_or_default()
    );
}

pub fn assignment_line(a: &WorkAssignment) {
    println!(
        "{}  {:<11}  [{}] {}  priority {}",
        a.id,
        a.status.as_str(),
        a.assignment_type,
        a.title,
        a.priority
    );
    if let Some(safety) = &a.safety_requirements {
        println!("    safety: {}", safety);
    }
}

pub fn work_site_line(s: &WorkSite) {
    println!("{}  {}  ({})", s.id, s.name, s.address);
}

pub fn notification_line(n: &Notification) {
    let marker = if n.read { " " } else { "*" };
    println!("{} {}  {}: {}", marker, n.id, n.title, n.message);
}

pub fn profile_line(p: &UserProfile) {
    println!("{}  {:<18}  {} <{}>", p.id, p.role.as_str(), p.full_name, p.email);
}
