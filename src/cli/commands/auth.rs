//! Account commands - signup, login, logout, whoami

use std::path::Path;

use crate::cli::output::{emit, profile_line};
use crate::cli::Workspace;
use crate::errors::Result;
use crate::identity::{ensure_profile, IdentityProvider, SignUpData};
use crate::schemas::Role;

/// Register an account, sign in and create its profile
pub async fn signup(
    cwd: Option<&Path>,
    json: bool,
    email: &str,
    password: &str,
    name: &str,
    role: Role,
) -> Result<()> {
    let ws = Workspace::open(cwd)?;
    let data = SignUpData {
        full_name: Some(name.to_string()),
        role: Some(role),
    };
    ws.identity.sign_up(email, password, data).await?;
    let session = ws.identity.sign_in(email, password).await?;
    let profile = ensure_profile(ws.coordinator.store(), &session).await?;
    emit(json, &profile, |p| {
        println!("Registered and signed in as:");
        profile_line(p);
    })
}

pub async fn login(cwd: Option<&Path>, json: bool, email: &str, password: &str) -> Result<()> {
    let ws = Workspace::open(cwd)?;
    let session = ws.identity.sign_in(email, password).await?;
    let profile = ensure_profile(ws.coordinator.store(), &session).await?;
    emit(json, &profile, |p| {
        println!("Signed in as:");
        profile_line(p);
    })
}

pub async fn logout(cwd: Option<&Path>) -> Result<()> {
    let ws = Workspace::open(cwd)?;
    ws.identity.sign_out().await?;
    println!("Signed out");
    Ok(())
}

pub async fn whoami(cwd: Option<&Path>, json: bool) -> Result<()> {
    let ws = Workspace::open(cwd)?;
    let profile = ws.profile().await?;
    emit(json, &profile, profile_line)
}
