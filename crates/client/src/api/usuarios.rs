//! Facilitator and administrator account management. Admin-only
//! server-side; other roles get a 403 back as a plain `Http` error.

use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiError;

use super::models::{Usuario, UsuarioPayload};

impl ApiClient {
    pub async fn list_usuarios(&self) -> Result<Vec<Usuario>, ApiError> {
        self.get("auth/usuarios/").await
    }

    pub async fn create_usuario(&self, payload: &UsuarioPayload) -> Result<Usuario, ApiError> {
        self.post("auth/usuarios/", payload).await
    }

    pub async fn update_usuario<C: Serialize + ?Sized>(
        &self,
        id: i64,
        cambios: &C,
    ) -> Result<Usuario, ApiError> {
        self.patch(&format!("auth/usuarios/{id}/"), cambios).await
    }

    pub async fn delete_usuario(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("auth/usuarios/{id}/")).await
    }
}
