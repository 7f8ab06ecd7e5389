use crate::domain::FieldErrors;
use crate::domain::client::Client;
use crate::domain::types::{ClientEmail, ClientId};
use crate::forms::client::ClientForm;
use crate::repository::{ClientReader, ClientWriter};
use crate::services::{ServiceError, ServiceResult};

const EMAIL_TAKEN_MESSAGE: &str = "Este email ya está registrado";

/// Fetches a single client for the edit page.
pub async fn load_client<R>(repo: &R, client_id: ClientId) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    repo.get_client_by_id(client_id)
        .await
        .map_err(|err| {
            log::error!("Failed to load client {client_id}: {err}");
            ServiceError::from(err)
        })?
        .ok_or(ServiceError::NotFound)
}

/// Live email uniqueness check used while the user types.
///
/// Returns `true` when the address is free. A failing check never blocks the
/// form, so backend errors are logged and reported as available.
pub async fn email_available<R>(
    repo: &R,
    email: &str,
    exclude_id: Option<ClientId>,
) -> bool
where
    R: ClientReader + ?Sized,
{
    if !email.contains('@') {
        return true;
    }
    let Ok(email) = ClientEmail::new(email) else {
        return true;
    };

    match repo.email_exists(&email, exclude_id).await {
        Ok(exists) => !exists,
        Err(err) => {
            log::warn!("Email availability check failed: {err}");
            true
        }
    }
}

async fn ensure_email_free<R>(
    repo: &R,
    email: &ClientEmail,
    exclude_id: Option<ClientId>,
) -> ServiceResult<()>
where
    R: ClientReader + ?Sized,
{
    let exists = match repo.email_exists(email, exclude_id).await {
        Ok(exists) => exists,
        Err(err) => {
            log::warn!("Email availability check failed, deferring to backend: {err}");
            false
        }
    };

    if exists {
        return Err(ServiceError::Form(FieldErrors::from([(
            "email".to_string(),
            EMAIL_TAKEN_MESSAGE.to_string(),
        )])));
    }
    Ok(())
}

/// Validates the form and registers a new client.
pub async fn create_client<R>(repo: &R, form: ClientForm) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let new_client = form.into_new_client().map_err(|err| {
        log::error!("Failed to validate form: {err}");
        ServiceError::from(err)
    })?;

    ensure_email_free(repo, &new_client.email, None).await?;

    let client = repo.create_client(&new_client).await.map_err(|err| {
        log::error!("Failed to add a client: {err}");
        ServiceError::from(err)
    })?;

    log::info!("Created client {}", client.id);
    Ok(client)
}

/// Validates the form and applies it to an existing client.
pub async fn update_client<R>(repo: &R, client_id: ClientId, form: ClientForm) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let updates = form.into_update_client().map_err(|err| {
        log::error!("Failed to validate form: {err}");
        ServiceError::from(err)
    })?;

    ensure_email_free(repo, &updates.email, Some(client_id)).await?;

    let client = repo
        .update_client(client_id, &updates)
        .await
        .map_err(|err| {
            log::error!("Failed to update client {client_id}: {err}");
            ServiceError::from(err)
        })?;

    log::info!("Updated client {}", client.id);
    Ok(client)
}
