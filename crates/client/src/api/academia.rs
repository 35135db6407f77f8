//! Courses, schedules, tables, students, attendance and the dashboard.

use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiError;

use super::models::{
    Alumno, AlumnoPayload, Asistencia, AsistenciaUpsert, Curso, CursoPayload, DashboardStats,
    Horario, HorarioPayload, Mesa, MesaPayload,
};

impl ApiClient {
    // ---- cursos ----

    pub async fn list_cursos(&self) -> Result<Vec<Curso>, ApiError> {
        self.get("cursos/").await
    }

    pub async fn get_curso(&self, id: i64) -> Result<Curso, ApiError> {
        self.get(&format!("cursos/{id}/")).await
    }

    pub async fn create_curso(&self, payload: &CursoPayload) -> Result<Curso, ApiError> {
        self.post("cursos/", payload).await
    }

    /// Partial update. Deactivating a course cascades server-side to its
    /// tables and students.
    pub async fn update_curso<C: Serialize + ?Sized>(
        &self,
        id: i64,
        cambios: &C,
    ) -> Result<Curso, ApiError> {
        self.patch(&format!("cursos/{id}/"), cambios).await
    }

    // ---- horarios ----

    /// Schedules, optionally scoped to one course (which then includes the
    /// inactive ones, mirroring the server's filter).
    pub async fn list_horarios(&self, curso: Option<i64>) -> Result<Vec<Horario>, ApiError> {
        match curso {
            Some(id) => self.get(&format!("horarios/?curso={id}")).await,
            None => self.get("horarios/").await,
        }
    }

    pub async fn create_horario(&self, payload: &HorarioPayload) -> Result<Horario, ApiError> {
        self.post("horarios/", payload).await
    }

    pub async fn update_horario<C: Serialize + ?Sized>(
        &self,
        id: i64,
        cambios: &C,
    ) -> Result<Horario, ApiError> {
        self.patch(&format!("horarios/{id}/"), cambios).await
    }

    /// Soft delete server-side: the schedule and its tables are deactivated.
    pub async fn delete_horario(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("horarios/{id}/")).await
    }

    // ---- mesas ----

    pub async fn list_mesas(&self, horario: Option<i64>) -> Result<Vec<Mesa>, ApiError> {
        match horario {
            Some(id) => self.get(&format!("mesas/?horario={id}")).await,
            None => self.get("mesas/").await,
        }
    }

    pub async fn create_mesa(&self, payload: &MesaPayload) -> Result<Mesa, ApiError> {
        self.post("mesas/", payload).await
    }

    pub async fn update_mesa<C: Serialize + ?Sized>(
        &self,
        id: i64,
        cambios: &C,
    ) -> Result<Mesa, ApiError> {
        self.patch(&format!("mesas/{id}/"), cambios).await
    }

    pub async fn delete_mesa(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("mesas/{id}/")).await
    }

    // ---- alumnos ----

    /// Students visible to the session's role: everything for admins, own
    /// tables only for facilitators.
    pub async fn list_alumnos(&self) -> Result<Vec<Alumno>, ApiError> {
        self.get("alumnos/").await
    }

    pub async fn get_alumno(&self, id: i64) -> Result<Alumno, ApiError> {
        self.get(&format!("alumnos/{id}/")).await
    }

    pub async fn create_alumno(&self, payload: &AlumnoPayload) -> Result<Alumno, ApiError> {
        self.post("alumnos/", payload).await
    }

    pub async fn update_alumno<C: Serialize + ?Sized>(
        &self,
        id: i64,
        cambios: &C,
    ) -> Result<Alumno, ApiError> {
        self.patch(&format!("alumnos/{id}/"), cambios).await
    }

    pub async fn delete_alumno(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("alumnos/{id}/")).await
    }

    /// Students with a birthday in the current month, ordered by day.
    pub async fn list_cumpleanos(&self) -> Result<Vec<Alumno>, ApiError> {
        self.get("cumpleanos/").await
    }

    // ---- asistencias ----

    pub async fn list_asistencias(&self) -> Result<Vec<Asistencia>, ApiError> {
        self.get("asistencias/").await
    }

    /// Save a whole attendance sheet in one call. Rows the session's role
    /// may not touch are skipped server-side; the accepted rows come back.
    pub async fn bulk_upsert_asistencias(
        &self,
        rows: &[AsistenciaUpsert],
    ) -> Result<Vec<Asistencia>, ApiError> {
        self.post("asistencias/bulk_upsert/", rows).await
    }

    // ---- dashboard ----

    /// Aggregated attendance statistics for one class session number.
    pub async fn dashboard_stats(&self, clase: u8) -> Result<DashboardStats, ApiError> {
        self.get(&format!("dashboard-stats/?clase={clase}")).await
    }
}
