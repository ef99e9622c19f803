//! Warehouse request commands

use std::path::Path;

use crate::cli::output::{emit, request_line};
use crate::cli::{RequestCommand, Workspace};
use crate::errors::{InsituError, Result};
use crate::service::{ImageUpload, NewRequest};

/// Guess the MIME type from the file extension
fn content_type_for(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
    .to_string()
}

async fn read_image(path: &Path) -> Result<ImageUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| InsituError::wrap(e, format!("reading {}", path.display())))?;
    Ok(ImageUpload {
        bytes,
        content_type: content_type_for(path),
    })
}

pub async fn run(cwd: Option<&Path>, json: bool, command: RequestCommand) -> Result<()> {
    let ws = Workspace::open(cwd)?;
    let actor = ws.actor().await?;
    let c = &ws.coordinator;

    let request = match command {
        RequestCommand::Create {
            title,
            quantity,
            unit,
            description,
            work_site,
            image,
        } => {
            let image = match image {
                Some(path) => Some(read_image(&path).await?),
                None => None,
            };
            let input = NewRequest {
                title,
                description,
                quantity,
                unit,
                work_site_id: work_site,
                image,
            };
            c.create_request(&actor, input).await?
        }
        RequestCommand::Approve { id } => c.approve_request(&actor, id).await?,
        RequestCommand::Reject { id } => c.reject_request(&actor, id).await?,
        RequestCommand::Complete { id } => c.complete_request(&actor, id).await?,
    };

    emit(json, &request, request_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("a/photo.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("plan.webp")), "image/webp");
        assert_eq!(content_type_for(Path::new("notes.txt")), "application/octet-stream");
    }
}
