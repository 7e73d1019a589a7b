// src/services/client_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::ClientRepository,
    models::client::{Client, CreateClientPayload, UpdateClientPayload},
};

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
}

impl ClientService {
    pub fn new(repo: ClientRepository) -> Self {
        Self { repo }
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor).await
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::ClientNotFound)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: CreateClientPayload) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payload = payload.normalized();
        payload.validate()?;

        let id = self.repo.create(executor, &payload).await?;
        tracing::info!(%id, "cliente cadastrado");
        Ok(id)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, payload: UpdateClientPayload) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        check_update(&payload)?;

        match self.repo.update(executor, id, &payload).await? {
            0 => Err(AppError::ClientNotFound),
            _ => Ok(()),
        }
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        match self.repo.delete(executor, id).await? {
            0 => Err(AppError::ClientNotFound),
            _ => Ok(()),
        }
    }
}

// O que o PUT não aceita: corpo sem colunas, nome apagado, créditos negativos
fn check_update(payload: &UpdateClientPayload) -> Result<(), AppError> {
    if payload.is_empty() {
        return Err(AppError::NothingToUpdate);
    }

    let mut errors = ValidationErrors::new();
    if matches!(payload.name.as_ref().map(|n| n.as_deref().map(str::trim)), Some(None | Some(""))) {
        errors.add("name", field_error("length", "O nome é obrigatório."));
    }
    if matches!(payload.credits_remaining, Some(Some(credits)) if credits < 0) {
        errors.add("credits_remaining", field_error("range", "Os créditos não podem ser negativos."));
    }
    if let Some(Some(email)) = &payload.email {
        if !validator::ValidateEmail::validate_email(email) {
            errors.add("email", field_error("email", "E-mail inválido."));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(body: serde_json::Value) -> UpdateClientPayload {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn empty_update_is_nothing_to_update() {
        assert!(matches!(check_update(&update(json!({}))), Err(AppError::NothingToUpdate)));
    }

    #[test]
    fn name_cannot_be_blanked() {
        for name in ["", "   "] {
            let err = check_update(&update(json!({ "name": name }))).unwrap_err();
            let AppError::ValidationError(errors) = err else {
                panic!("esperava erro de validação");
            };
            assert!(errors.field_errors().contains_key("name"));
        }
    }

    #[test]
    fn invalid_email_and_negative_credits_are_reported_together() {
        let err = check_update(&update(json!({ "email": "nope", "credits_remaining": -3 }))).unwrap_err();
        let AppError::ValidationError(errors) = err else {
            panic!("esperava erro de validação");
        };
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("credits_remaining"));
    }

    #[test]
    fn clearing_optional_columns_is_fine() {
        assert!(check_update(&update(json!({ "email": "", "credits_remaining": null }))).is_ok());
        assert!(check_update(&update(json!({ "status": "active" }))).is_ok());
    }
}
